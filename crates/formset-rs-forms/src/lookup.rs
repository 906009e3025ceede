//! Search lookups for searchable selector widgets.
//!
//! Selectize and dual-selector widgets filter their options server side with a
//! lookup expression written the way ORM filters are written, e.g.
//! `"label__icontains"`: the part before `__` names what is searched, the
//! part after it names the comparison.

use std::fmt;
use std::str::FromStr;

use formset_rs_core::FormsetError;

/// What part of a choice a lookup compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTarget {
    /// The human-readable label.
    Label,
    /// The submitted value (the related object's key).
    Value,
}

/// The comparison a lookup performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOp {
    /// Exact, case-sensitive equality.
    Exact,
    /// Case-insensitive equality.
    IExact,
    /// Case-sensitive substring match.
    Contains,
    /// Case-insensitive substring match.
    IContains,
    /// Case-sensitive prefix match.
    StartsWith,
    /// Case-insensitive prefix match.
    IStartsWith,
}

impl LookupOp {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "exact" => Some(Self::Exact),
            "iexact" => Some(Self::IExact),
            "contains" => Some(Self::Contains),
            "icontains" => Some(Self::IContains),
            "startswith" => Some(Self::StartsWith),
            "istartswith" => Some(Self::IStartsWith),
            _ => None,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::IExact => "iexact",
            Self::Contains => "contains",
            Self::IContains => "icontains",
            Self::StartsWith => "startswith",
            Self::IStartsWith => "istartswith",
        }
    }

    /// Applies the comparison to a candidate string.
    pub fn matches(self, candidate: &str, term: &str) -> bool {
        match self {
            Self::Exact => candidate == term,
            Self::IExact => candidate.to_lowercase() == term.to_lowercase(),
            Self::Contains => candidate.contains(term),
            Self::IContains => candidate.to_lowercase().contains(&term.to_lowercase()),
            Self::StartsWith => candidate.starts_with(term),
            Self::IStartsWith => candidate.to_lowercase().starts_with(&term.to_lowercase()),
        }
    }
}

/// A parsed lookup expression such as `label__icontains`.
///
/// # Examples
///
/// ```
/// use formset_rs_forms::lookup::SearchLookup;
///
/// let lookup: SearchLookup = "label__icontains".parse().unwrap();
/// let choices = vec![
///     ("1".to_string(), "Opinion 1".to_string()),
///     ("12".to_string(), "Opinion 12".to_string()),
///     ("2".to_string(), "Opinion 2".to_string()),
/// ];
/// let hits: Vec<&str> = lookup.filter(&choices, "ION 1").iter().map(|c| c.0.as_str()).collect();
/// assert_eq!(hits, ["1", "12"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLookup {
    /// What is searched.
    pub target: LookupTarget,
    /// How it is compared.
    pub op: LookupOp,
}

impl SearchLookup {
    /// Returns `true` if the choice `(value, label)` matches `term`.
    pub fn matches(&self, value: &str, label: &str, term: &str) -> bool {
        let candidate = match self.target {
            LookupTarget::Label => label,
            LookupTarget::Value => value,
        };
        self.op.matches(candidate, term)
    }

    /// Returns the choices matching `term`, in their original order.
    ///
    /// An empty (or all-whitespace) term matches every choice.
    pub fn filter<'a>(&self, choices: &'a [(String, String)], term: &str) -> Vec<&'a (String, String)> {
        let term = term.trim();
        choices
            .iter()
            .filter(|(value, label)| term.is_empty() || self.matches(value, label, term))
            .collect()
    }
}

impl FromStr for SearchLookup {
    type Err = FormsetError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let (target, op) = expr.split_once("__").unwrap_or((expr, "exact"));

        let target = match target {
            "label" => LookupTarget::Label,
            "value" | "pk" | "id" => LookupTarget::Value,
            other => {
                return Err(FormsetError::ImproperlyConfigured(format!(
                    "Cannot search on '{other}' in lookup '{expr}'; use 'label' or 'value'"
                )))
            }
        };
        let op = LookupOp::parse(op).ok_or_else(|| {
            FormsetError::ImproperlyConfigured(format!(
                "Unsupported lookup '{op}' in '{expr}'"
            ))
        })?;

        Ok(Self { target, op })
    }
}

impl fmt::Display for SearchLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            LookupTarget::Label => "label",
            LookupTarget::Value => "value",
        };
        write!(f, "{target}__{}", self.op.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<(String, String)> {
        vec![
            ("1".into(), "Apple".into()),
            ("2".into(), "pineapple".into()),
            ("3".into(), "Banana".into()),
        ]
    }

    fn values(hits: &[&(String, String)]) -> Vec<String> {
        hits.iter().map(|(v, _)| v.clone()).collect()
    }

    #[test]
    fn test_parse_icontains() {
        let lookup: SearchLookup = "label__icontains".parse().unwrap();
        assert_eq!(lookup.target, LookupTarget::Label);
        assert_eq!(lookup.op, LookupOp::IContains);
        assert_eq!(lookup.to_string(), "label__icontains");
    }

    #[test]
    fn test_parse_defaults_to_exact() {
        let lookup: SearchLookup = "label".parse().unwrap();
        assert_eq!(lookup.op, LookupOp::Exact);
    }

    #[test]
    fn test_parse_pk_alias() {
        let lookup: SearchLookup = "pk__startswith".parse().unwrap();
        assert_eq!(lookup.target, LookupTarget::Value);
    }

    #[test]
    fn test_parse_unknown_op() {
        let err = "label__regex".parse::<SearchLookup>().unwrap_err();
        assert!(matches!(err, FormsetError::ImproperlyConfigured(_)));
        assert!(err.to_string().contains("regex"));
    }

    #[test]
    fn test_parse_unknown_target() {
        let err = "name__icontains".parse::<SearchLookup>().unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn test_icontains_filter() {
        let lookup: SearchLookup = "label__icontains".parse().unwrap();
        let c = choices();
        assert_eq!(values(&lookup.filter(&c, "APPLE")), ["1", "2"]);
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let lookup: SearchLookup = "label__contains".parse().unwrap();
        let c = choices();
        assert_eq!(values(&lookup.filter(&c, "Apple")), ["1"]);
    }

    #[test]
    fn test_istartswith_filter() {
        let lookup: SearchLookup = "label__istartswith".parse().unwrap();
        let c = choices();
        assert_eq!(values(&lookup.filter(&c, "b")), ["3"]);
    }

    #[test]
    fn test_iexact_and_exact() {
        assert!(LookupOp::IExact.matches("Doe", "doe"));
        assert!(!LookupOp::Exact.matches("Doe", "doe"));
    }

    #[test]
    fn test_empty_term_matches_all() {
        let lookup: SearchLookup = "label__icontains".parse().unwrap();
        let c = choices();
        assert_eq!(lookup.filter(&c, "  ").len(), 3);
    }

    #[test]
    fn test_value_target() {
        let lookup: SearchLookup = "value__exact".parse().unwrap();
        let c = choices();
        assert_eq!(values(&lookup.filter(&c, "2")), ["2"]);
    }
}
