//! Submitted form data.
//!
//! [`FormData`] is an ordered multi-value mapping from field names to the raw
//! strings a client submitted. It can be built from a URL-encoded body or from
//! the JSON payload the formset web component posts.

use formset_rs_core::{FormsetError, FormsetResult};

/// Key under which the formset web component nests its field values.
pub const FORMSET_DATA_KEY: &str = "formset_data";

/// Raw submitted values, keyed by HTML field name.
///
/// Keys keep the order in which they were first seen. A key may carry several
/// values (multiple selections); [`get`](FormData::get) returns the last one.
///
/// # Examples
///
/// ```
/// use formset_rs_forms::data::FormData;
///
/// let data = FormData::parse("first_name=John&opinions=3&opinions=1");
/// assert_eq!(data.get("first_name"), Some("John"));
/// assert_eq!(data.get_list("opinions"), ["3", "1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, Vec<String>)>,
}

impl FormData {
    /// Creates an empty `FormData`.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parses an `application/x-www-form-urlencoded` string.
    pub fn parse(encoded: &str) -> Self {
        let mut data = Self::new();
        for (key, value) in url::form_urlencoded::parse(encoded.as_bytes()) {
            data.append(key.into_owned(), value.into_owned());
        }
        data
    }

    /// Builds `FormData` from `(name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = Self::new();
        for (key, value) in pairs {
            data.append(key, value);
        }
        data
    }

    /// Builds `FormData` from a JSON object.
    ///
    /// The object may be the field mapping itself or wrap it under
    /// [`FORMSET_DATA_KEY`]. Strings, numbers and booleans become single
    /// values, arrays of those become multiple values and `null` leaves the key
    /// out.
    ///
    /// # Errors
    ///
    /// Returns [`FormsetError::SerializationError`] if the payload is not an
    /// object or contains nested objects.
    pub fn from_json(payload: &serde_json::Value) -> FormsetResult<Self> {
        let object = payload
            .get(FORMSET_DATA_KEY)
            .unwrap_or(payload)
            .as_object()
            .ok_or_else(|| {
                FormsetError::SerializationError("form data must be a JSON object".to_string())
            })?;

        let mut data = Self::new();
        for (key, value) in object {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Array(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items {
                        values.push(json_scalar(key, item)?);
                    }
                    data.set(key.clone(), values);
                }
                scalar => {
                    let v = json_scalar(key, scalar)?;
                    data.append(key.clone(), v);
                }
            }
        }
        Ok(data)
    }

    /// Appends a value to the list for the given key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Replaces all values for the given key.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    /// Returns the last value for the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_list(key).last().map(String::as_str)
    }

    /// Returns all values for the given key (empty if absent).
    pub fn get_list(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    /// Returns `true` if the key was submitted at all.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates over the submitted keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was submitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn json_scalar(key: &str, value: &serde_json::Value) -> FormsetResult<String> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        _ => Err(FormsetError::SerializationError(format!(
            "unsupported JSON value for field '{key}'"
        ))),
    }
}
