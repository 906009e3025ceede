//! Person forms.
//!
//! [`SimplePersonForm`] shows field-level validation and how the
//! `<django-formset>` element can withhold feedback next to the offending
//! fields. [`PersonForm`] adds one cross-field rule on top of the same
//! fields. [`ModelPersonForm`] is generated from
//! [`PERSON_MODEL`](crate::models::PERSON_MODEL) and swaps default widgets
//! for their formset counterparts.

use once_cell::sync::Lazy;
use regex::Regex;

use formset_rs_core::{FormsetResult, ValidationError};
use formset_rs_forms::data::FormData;
use formset_rs_forms::form::{cleaned_str, BaseForm, CleanedData, Form};
use formset_rs_forms::model_form::{ModelForm, ModelFormConfig, ModelFormFields};
use formset_rs_forms::widgets::WidgetType;
use formset_rs_forms::{FormFieldDef, FormFieldType};

use crate::models::PERSON_MODEL;

static FIRST_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z -]*$").expect("valid regex"));

const SEARCH_LOOKUP: &str = "label__icontains";

/// The `last_name` and `first_name` fields shared by both person forms.
fn person_fields() -> Vec<FormFieldDef> {
    vec![
        FormFieldDef::new(
            "last_name",
            FormFieldType::Char {
                min_length: Some(2),
                max_length: Some(50),
                strip: true,
            },
        )
        .label("Last name")
        .help_text("Please enter at least two characters"),
        FormFieldDef::new(
            "first_name",
            FormFieldType::Regex {
                regex: FIRST_NAME_RE.clone(),
                min_length: None,
                max_length: Some(50),
                strip: true,
            },
        )
        .label("First name")
        .error_message("invalid", "A first name must start in upper case.")
        .help_text("Must start in upper case followed by one or more lowercase characters."),
    ]
}

/// A plain two-field person form.
#[derive(Debug, Clone)]
pub struct SimplePersonForm {
    base: BaseForm,
}

impl SimplePersonForm {
    /// Creates an unbound form.
    pub fn new() -> Self {
        Self {
            base: BaseForm::new(person_fields()),
        }
    }
}

impl Default for SimplePersonForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for SimplePersonForm {
    fn name(&self) -> &str {
        "SimplePersonForm"
    }

    fn base(&self) -> &BaseForm {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseForm {
        &mut self.base
    }
}

/// [`SimplePersonForm`] plus a rule rejecting one particular name.
///
/// A first name starting with "john" combined with a last name starting
/// with "doe" (both case-insensitive) is refused as a whole. A field that
/// already failed its own validation counts as empty, so the rule never
/// fires on it.
#[derive(Debug, Clone)]
pub struct PersonForm {
    base: BaseForm,
}

impl PersonForm {
    /// Creates an unbound form.
    pub fn new() -> Self {
        Self {
            base: BaseForm::new(person_fields()),
        }
    }
}

impl Default for PersonForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for PersonForm {
    fn name(&self) -> &str {
        "PersonForm"
    }

    fn base(&self) -> &BaseForm {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseForm {
        &mut self.base
    }

    fn clean(&self, cleaned_data: &mut CleanedData) -> Result<(), ValidationError> {
        let first_name = cleaned_str(cleaned_data, "first_name");
        let last_name = cleaned_str(cleaned_data, "last_name");
        if first_name.to_lowercase().starts_with("john")
            && last_name.to_lowercase().starts_with("doe")
        {
            return Err(ValidationError::new(
                format!("{first_name} {last_name} is persona non grata here!"),
                "persona_non_grata",
            ));
        }
        Ok(())
    }
}

/// The sample submission used to prefill the person forms.
pub fn sample_person_data() -> FormData {
    FormData::from_pairs([("first_name", "John"), ("last_name", "Doe")])
}

fn with_formset_widgets(config: ModelFormConfig) -> ModelFormConfig {
    config
        .with_widget("avatar", WidgetType::UploadedFileInput)
        .with_widget("gender", WidgetType::RadioSelect)
        .with_widget("opinion", WidgetType::selectize(SEARCH_LOOKUP))
        .with_widget("opinions", WidgetType::selectize_multiple(SEARCH_LOOKUP, Some(15)))
        .with_widget("weighted_opinions", WidgetType::dual_sortable_selector(SEARCH_LOOKUP))
}

/// Configuration of [`ModelPersonForm`]: only `weighted_opinions` is a form
/// field, the other overrides stay declared for when more attributes are
/// selected.
pub fn model_person_form_config() -> ModelFormConfig {
    with_formset_widgets(
        ModelFormConfig::new(&PERSON_MODEL)
            .with_fields(ModelFormFields::Include(vec!["weighted_opinions".to_string()])),
    )
}

/// The same overrides applied to every editable attribute of the model.
pub fn model_person_form_all_fields() -> ModelFormConfig {
    with_formset_widgets(ModelFormConfig::new(&PERSON_MODEL))
}

/// The model-bound person form.
#[derive(Debug, Clone)]
pub struct ModelPersonForm {
    inner: ModelForm,
}

impl ModelPersonForm {
    /// Creates an unbound form from [`model_person_form_config`].
    pub fn new() -> FormsetResult<Self> {
        Self::from_config(&model_person_form_config())
    }

    /// Creates an unbound form from any person model configuration.
    pub fn from_config(config: &ModelFormConfig) -> FormsetResult<Self> {
        Ok(Self {
            inner: ModelForm::new(config)?.named("ModelPersonForm"),
        })
    }
}

impl Form for ModelPersonForm {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn base(&self) -> &BaseForm {
        self.inner.base()
    }

    fn base_mut(&mut self) -> &mut BaseForm {
        self.inner.base_mut()
    }
}
