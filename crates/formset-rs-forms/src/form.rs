//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait is the core abstraction for all form types. A form is
//! bound to submitted [`FormData`], validated with [`Form::is_valid`], and
//! exposes its [`FormErrors`] and [`CleanedData`] afterwards. Concrete forms
//! usually wrap a [`BaseForm`] and override [`Form::clean`] to add
//! cross-field rules.
//!
//! This mirrors Django's `django.forms.Form` and `BaseForm`.

use std::collections::BTreeMap;

use serde::Serialize;

use formset_rs_core::{ValidationError, Value};

use crate::bound_field::BoundField;
use crate::data::FormData;
use crate::fields::FormFieldDef;
use crate::validation;

/// Key under which form-level (non-field) errors are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Cleaned values of the fields that passed validation, keyed by field name.
pub type CleanedData = BTreeMap<String, Value>;

/// Returns the cleaned string for `name`, or `""` if the field is missing or
/// not a string.
///
/// Cross-field rules use this so that a field which already failed its own
/// validation reads as empty instead of aborting the rule.
pub fn cleaned_str<'a>(cleaned_data: &'a CleanedData, name: &str) -> &'a str {
    cleaned_data
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or("")
}

/// Joins a form prefix and a field name the way HTML names are built.
pub fn prefixed_name(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(p) => format!("{p}-{name}"),
        None => name.to_string(),
    }
}

/// Rendered error messages, keyed by field name or [`NON_FIELD_ERRORS`].
///
/// Serializes as `{"field": ["message", ...], "__all__": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// Creates an empty error map.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Appends a message to `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Appends several messages to `field`.
    pub fn extend<I, S>(&mut self, field: impl Into<String>, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .entry(field.into())
            .or_default()
            .extend(messages.into_iter().map(Into::into));
    }

    /// Returns the messages for `field` (empty if none).
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if `field` has at least one message.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the form-level messages.
    pub fn non_field(&self) -> &[String] {
        self.get(NON_FIELD_ERRORS)
    }

    /// Returns `true` if there are no errors at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of keys with errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(key, messages)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Records `error` against `field` (or the whole form when `None`).
///
/// A compound error distributes its per-field messages instead. Every field
/// that receives an error is dropped from `cleaned_data`.
pub(crate) fn record_error(
    errors: &mut FormErrors,
    cleaned_data: &mut CleanedData,
    field: Option<&str>,
    error: &ValidationError,
) {
    if error.has_field_errors() {
        let mut names: Vec<&String> = error.field_errors.keys().collect();
        names.sort();
        for name in names {
            let key = if name == NON_FIELD_ERRORS { None } else { Some(name.as_str()) };
            for sub in &error.field_errors[name] {
                record_error(errors, cleaned_data, key, sub);
            }
        }
        return;
    }

    match field {
        Some(name) => {
            errors.add(name, error.rendered());
            cleaned_data.remove(name);
        }
        None => errors.add(NON_FIELD_ERRORS, error.rendered()),
    }
}

/// The core form trait. All form types implement this.
///
/// Implementors supply [`base`](Form::base) and [`base_mut`](Form::base_mut);
/// everything else has a default that delegates to the wrapped [`BaseForm`].
/// Validation is synchronous.
pub trait Form: Send + Sync {
    /// A name identifying the form in logs.
    fn name(&self) -> &str {
        "Form"
    }

    /// Returns the wrapped base form.
    fn base(&self) -> &BaseForm;

    /// Returns the wrapped base form mutably.
    fn base_mut(&mut self) -> &mut BaseForm;

    /// Cross-field validation hook, run after every field has been cleaned.
    ///
    /// `cleaned_data` holds only the fields that passed their own validation.
    /// The hook may modify it. Returning an error without field errors
    /// records it as a non-field error; field errors land on their fields.
    /// The default implementation accepts the data unchanged.
    fn clean(&self, _cleaned_data: &mut CleanedData) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Returns the form's field definitions.
    fn fields(&self) -> &[FormFieldDef] {
        self.base().fields()
    }

    /// Binds submitted data, clearing any previous validation state.
    fn bind(&mut self, data: FormData) {
        self.base_mut().bind(data);
    }

    /// Returns `true` if the form has been bound to data.
    fn is_bound(&self) -> bool {
        self.base().is_bound()
    }

    /// Validates the form. Returns `true` if valid.
    ///
    /// An unbound form is never valid. After calling this, `errors()` and
    /// `cleaned_data()` are populated.
    fn is_valid(&mut self) -> bool {
        validation::run_validation(self)
    }

    /// Returns the validation errors.
    fn errors(&self) -> &FormErrors {
        &self.base().errors
    }

    /// Returns the cleaned data of the fields that passed validation.
    fn cleaned_data(&self) -> &CleanedData {
        &self.base().cleaned_data
    }

    /// Returns the non-field (form-level) errors.
    fn non_field_errors(&self) -> &[String] {
        self.base().errors.non_field()
    }
}

/// A general-purpose form implementation.
///
/// `BaseForm` holds a list of field definitions and manages binding,
/// errors and cleaned data. The person forms and model forms all wrap one.
#[derive(Debug, Clone, Default)]
pub struct BaseForm {
    fields: Vec<FormFieldDef>,
    prefix: Option<String>,
    pub(crate) data: Option<FormData>,
    pub(crate) errors: FormErrors,
    pub(crate) cleaned_data: CleanedData,
}

impl BaseForm {
    /// Creates a new unbound `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Sets initial values for the named fields; unknown names are ignored.
    #[must_use]
    pub fn with_initial(mut self, initial: &CleanedData) -> Self {
        for field in &mut self.fields {
            if let Some(value) = initial.get(&field.name) {
                field.initial = Some(value.clone());
            }
        }
        self
    }

    /// Sets the form prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Returns the form prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the field definitions in declaration order.
    pub fn fields(&self) -> &[FormFieldDef] {
        &self.fields
    }

    /// Looks up a field definition by name.
    pub fn field(&self, name: &str) -> Option<&FormFieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the bound data, if any.
    pub const fn data(&self) -> Option<&FormData> {
        self.data.as_ref()
    }

    /// Binds submitted data, clearing any previous validation state.
    pub fn bind(&mut self, data: FormData) {
        self.data = Some(data);
        self.errors.clear();
        self.cleaned_data.clear();
    }

    /// Returns `true` if the form has been bound to data.
    pub const fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    /// Returns the HTML name of a field, including the prefix.
    pub fn html_name(&self, field_name: &str) -> String {
        prefixed_name(self.prefix.as_deref(), field_name)
    }

    /// Adds an error to `field`, or to the form when `field` is `None`.
    ///
    /// The field is removed from the cleaned data.
    pub fn add_error(&mut self, field: Option<&str>, error: &ValidationError) {
        record_error(&mut self.errors, &mut self.cleaned_data, field, error);
    }

    /// Returns bound fields for rendering, in declaration order.
    pub fn bound_fields(&self) -> Vec<BoundField<'_>> {
        self.fields
            .iter()
            .map(|field| {
                let html_name = self.html_name(&field.name);
                let errors = self.errors.get(&field.name).to_vec();
                BoundField::new(field, html_name, self.data.as_ref(), errors)
            })
            .collect()
    }
}

impl Form for BaseForm {
    fn name(&self) -> &str {
        "BaseForm"
    }

    fn base(&self) -> &BaseForm {
        self
    }

    fn base_mut(&mut self) -> &mut BaseForm {
        self
    }
}
