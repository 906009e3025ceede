//! Validation pipeline for form processing.
//!
//! This module implements the Django-style validation pipeline:
//! 1. Field-level validation (type coercion + per-field checks)
//! 2. Form-level cross-field validation through [`Form::clean`]
//!
//! Errors accumulate rather than short-circuiting, so all validation
//! issues are reported at once. The form-level step always runs, even when
//! some fields failed; it only sees the fields that passed.
//!
//! This mirrors Django's `BaseForm._clean_fields()` and `BaseForm._clean_form()`.

use tracing::debug;

use formset_rs_core::logging::form_span;
use formset_rs_core::ValidationError;

use crate::data::FormData;
use crate::fields::{clean_field_value, FormFieldDef};
use crate::form::{prefixed_name, record_error, CleanedData, Form, FormErrors};

/// Performs field-level validation for all fields.
///
/// For each field definition:
/// 1. Extracts the raw values from `data` through the field's widget
/// 2. Runs [`clean_field_value`] for type coercion and field-level validation
/// 3. Populates the cleaned data on success or the errors on failure
///
/// Disabled fields skip validation and take their initial value.
pub fn clean_fields(
    fields: &[FormFieldDef],
    data: &FormData,
    prefix: Option<&str>,
) -> (CleanedData, FormErrors) {
    let mut cleaned_data = CleanedData::new();
    let mut errors = FormErrors::new();

    for field in fields {
        if field.disabled {
            if let Some(initial) = &field.initial {
                cleaned_data.insert(field.name.clone(), initial.clone());
            }
            continue;
        }

        let html_name = prefixed_name(prefix, &field.name);
        let values = field.build_widget().value_from_data(data, &html_name);

        match clean_field_value(field, &values) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                let messages: Vec<String> = field_errors.iter().map(ValidationError::rendered).collect();
                debug!(field = %field.name, errors = ?messages, "field failed validation");
                errors.extend(field.name.clone(), messages);
            }
        }
    }

    (cleaned_data, errors)
}

/// Runs the full pipeline on a bound form and stores the outcome in it.
///
/// Returns `false` without touching the form if it is unbound.
pub fn run_validation<F: Form + ?Sized>(form: &mut F) -> bool {
    let span = form_span(form.name());
    let _guard = span.enter();

    let (mut cleaned_data, mut errors) = {
        let base = form.base();
        let Some(data) = base.data() else {
            debug!("form is unbound");
            return false;
        };
        clean_fields(base.fields(), data, base.prefix())
    };

    if let Err(error) = form.clean(&mut cleaned_data) {
        debug!(error = %error, "form-level validation failed");
        record_error(&mut errors, &mut cleaned_data, None, &error);
    }

    let valid = errors.is_empty();
    debug!(valid, error_count = errors.len(), "validation finished");

    let base = form.base_mut();
    base.cleaned_data = cleaned_data;
    base.errors = errors;
    valid
}

/// Validates `form` and returns its cleaned data or its errors.
///
/// # Errors
///
/// Returns the form's [`FormErrors`] when validation fails. An unbound form
/// fails with an empty error map.
pub fn full_clean(form: &mut dyn Form) -> Result<CleanedData, FormErrors> {
    if form.is_valid() {
        Ok(form.cleaned_data().clone())
    } else {
        Err(form.errors().clone())
    }
}
