//! Bound fields: form fields paired with data and errors.
//!
//! A [`BoundField`] combines a form field definition, the values currently
//! shown for it (submitted or initial), its validation errors and the widget
//! used for rendering. Form rendering produces one row per bound field.
//!
//! This mirrors Django's `django.forms.boundfield.BoundField`.

use formset_rs_core::Value;

use crate::data::FormData;
use crate::fields::FormFieldDef;
use crate::widgets::{escape, Attrs, Widget};

/// A form field bound to data and validation state.
#[derive(Debug)]
pub struct BoundField<'a> {
    /// The field definition.
    pub field: &'a FormFieldDef,
    /// The field's HTML name attribute (prefix included).
    pub html_name: String,
    /// The values to display: submitted ones when bound, initial ones otherwise.
    pub values: Vec<String>,
    /// Rendered validation error messages for this field.
    pub errors: Vec<String>,
    /// The widget instance used for rendering.
    pub widget: Box<dyn Widget>,
}

impl<'a> BoundField<'a> {
    /// Creates a new `BoundField`.
    ///
    /// When `data` is `None` the field shows its initial value.
    pub fn new(
        field: &'a FormFieldDef,
        html_name: String,
        data: Option<&FormData>,
        errors: Vec<String>,
    ) -> Self {
        let widget = field.build_widget();
        let values = match data {
            Some(data) => widget.value_from_data(data, &html_name),
            None => initial_values(field.initial.as_ref()),
        };
        Self {
            field,
            html_name,
            values,
            errors,
            widget,
        }
    }

    /// Returns the auto-generated HTML `id` for this field.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.html_name)
    }

    /// Renders the widget HTML for this bound field.
    pub fn render(&self, extra_attrs: &Attrs) -> String {
        let mut attrs = extra_attrs.clone();
        attrs.entry("id".to_string()).or_insert_with(|| self.auto_id());
        if self.field.disabled {
            attrs.insert("disabled".to_string(), "disabled".to_string());
        }
        self.widget.render(&self.html_name, &self.values, &attrs)
    }

    /// Renders a `<label>` element for this field.
    pub fn label_tag(&self) -> String {
        let label_id = self.widget.id_for_label(&self.auto_id());
        format!(
            r#"<label for="{}">{}</label>"#,
            escape(&label_id),
            escape(&self.field.label)
        )
    }

    /// Renders the help text, or nothing if the field has none.
    pub fn help_text_html(&self) -> String {
        if self.field.help_text.is_empty() {
            return String::new();
        }
        format!(
            r#"<span class="dj-help-text">{}</span>"#,
            escape(&self.field.help_text)
        )
    }

    /// Returns `true` if this field has any errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Renders the error list as an HTML `<ul>` element.
    pub fn errors_html(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        let items: String = self
            .errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape(e)))
            .collect();
        format!(r#"<ul class="dj-errorlist">{items}</ul>"#)
    }
}

fn initial_values(initial: Option<&Value>) -> Vec<String> {
    match initial {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::List(items)) => items.iter().map(ToString::to_string).collect(),
        Some(other) => vec![other.to_string()],
    }
}
