//! Forms of the demo application.

pub mod person;

use formset_rs_core::{FormsetError, FormsetResult};
use formset_rs_forms::Form;

pub use person::{
    model_person_form_all_fields, model_person_form_config, sample_person_data, ModelPersonForm,
    PersonForm, SimplePersonForm,
};

/// Names accepted by [`form_by_name`].
pub const FORM_NAMES: &[&str] = &["simple", "person", "model"];

/// Instantiates one of the demo forms by its short name.
///
/// # Errors
///
/// Returns [`FormsetError::ConfigurationError`] for an unknown name, and
/// propagates model form generation errors.
pub fn form_by_name(name: &str) -> FormsetResult<Box<dyn Form>> {
    match name {
        "simple" => Ok(Box::new(SimplePersonForm::new())),
        "person" => Ok(Box::new(PersonForm::new())),
        "model" => Ok(Box::new(ModelPersonForm::new()?)),
        other => Err(FormsetError::ConfigurationError(format!(
            "Unknown form '{other}'; expected one of: {}",
            FORM_NAMES.join(", ")
        ))),
    }
}
