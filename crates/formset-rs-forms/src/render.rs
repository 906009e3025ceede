//! Whole-form rendering for the `<django-formset>` web component.
//!
//! [`BaseForm::render`] emits the form's rows wrapped in a
//! `<django-formset>` element. [`RenderOptions`] controls the endpoint the
//! component posts to and which kinds of client-side feedback it withholds.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use formset_rs_core::FormsetError;

use crate::form::BaseForm;
use crate::widgets::{escape, Attrs};

/// A kind of feedback the web component gives while the user edits a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feedback {
    /// Validation messages below fields.
    Messages,
    /// Error styling on invalid fields.
    Errors,
    /// Warning styling.
    Warnings,
    /// Success styling on valid fields.
    Success,
}

impl Feedback {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Errors => "errors",
            Self::Warnings => "warnings",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feedback {
    type Err = FormsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "messages" => Ok(Self::Messages),
            "errors" => Ok(Self::Errors),
            "warnings" => Ok(Self::Warnings),
            "success" => Ok(Self::Success),
            other => Err(FormsetError::ImproperlyConfigured(format!(
                "Unknown feedback kind '{other}'"
            ))),
        }
    }
}

/// Options for [`BaseForm::render`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// URL the web component posts the form data to.
    pub endpoint: Option<String>,
    /// Feedback kinds the web component should not show.
    pub withhold_feedback: BTreeSet<Feedback>,
}

impl RenderOptions {
    /// Creates default options: no endpoint, all feedback shown.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Withholds one kind of feedback.
    #[must_use]
    pub fn withhold(mut self, feedback: Feedback) -> Self {
        self.withhold_feedback.insert(feedback);
        self
    }

    /// Formats the `<django-formset>` attributes.
    fn formset_attrs(&self) -> String {
        let mut out = String::new();
        if let Some(endpoint) = &self.endpoint {
            out.push_str(&format!(r#" endpoint="{}""#, escape(endpoint)));
        }
        if !self.withhold_feedback.is_empty() {
            let kinds: Vec<&str> = self.withhold_feedback.iter().map(|f| f.as_str()).collect();
            out.push_str(&format!(r#" withhold-feedback="{}""#, kinds.join(" ")));
        }
        out
    }
}

impl BaseForm {
    /// Renders the form inside a `<django-formset>` element.
    ///
    /// Non-field errors come first, followed by one `<django-field-group>`
    /// per field in declaration order.
    pub fn render(&self, options: &RenderOptions) -> String {
        let mut out = format!("<django-formset{}><form>", options.formset_attrs());

        let non_field: String = self
            .errors
            .non_field()
            .iter()
            .map(|e| format!("<li>{}</li>", escape(e)))
            .collect();
        out.push_str(&format!(
            r#"<div class="dj-form-errors"><ul class="dj-errorlist">{non_field}</ul></div>"#
        ));

        for bf in self.bound_fields() {
            out.push_str(&format!(
                r#"<django-field-group>{}{}{}<div role="alert" class="dj-field-errors">{}</div></django-field-group>"#,
                bf.label_tag(),
                bf.render(&Attrs::new()),
                bf.help_text_html(),
                bf.errors_html()
            ));
        }

        out.push_str("</form></django-formset>");
        out
    }
}
