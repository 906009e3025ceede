//! Integration tests for the data -> form -> render pipeline.
//!
//! These tests exercise the public API end to end:
//! 1. Binding JSON and URL-encoded submissions and validating them
//! 2. Cross-field rules through `Form::clean`
//! 3. Model forms with formset widgets, checks and rendering

use formset_rs_core::{ValidationError, Value};
use formset_rs_forms::data::FormData;
use formset_rs_forms::fields::{FormFieldDef, FormFieldType};
use formset_rs_forms::form::{cleaned_str, BaseForm, CleanedData, Form, NON_FIELD_ERRORS};
use formset_rs_forms::model::{ModelFieldDef, ModelFieldType, ModelMeta};
use formset_rs_forms::model_form::{check, ModelForm, ModelFormConfig, ModelFormFields};
use formset_rs_forms::render::{Feedback, RenderOptions};
use formset_rs_forms::validation::full_clean;
use formset_rs_forms::widgets::WidgetType;

use once_cell::sync::Lazy;

// ============================================================================
// Shared helpers
// ============================================================================

/// A signup form whose passwords must match.
struct SignupForm {
    base: BaseForm,
}

impl SignupForm {
    fn new() -> Self {
        let password = || {
            FormFieldDef::new(
                "password",
                FormFieldType::Char {
                    min_length: Some(8),
                    max_length: None,
                    strip: false,
                },
            )
        };
        let mut confirm = password();
        confirm.name = "confirm".to_string();
        confirm.label = "Confirm".to_string();
        Self {
            base: BaseForm::new(vec![
                FormFieldDef::new("email", FormFieldType::Email),
                password(),
                confirm,
            ]),
        }
    }
}

impl Form for SignupForm {
    fn name(&self) -> &str {
        "SignupForm"
    }

    fn base(&self) -> &BaseForm {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseForm {
        &mut self.base
    }

    fn clean(&self, cleaned_data: &mut CleanedData) -> Result<(), ValidationError> {
        if cleaned_str(cleaned_data, "password") != cleaned_str(cleaned_data, "confirm") {
            return Err(ValidationError::new("Passwords do not match.", "mismatch"));
        }
        Ok(())
    }
}

static OPINIONS: &[(&str, &str)] = &[
    ("1", "Opinion 1"),
    ("2", "Opinion 2"),
    ("3", "Opinion 3"),
    ("11", "Opinion 11"),
];

static SURVEY: Lazy<ModelMeta> = Lazy::new(|| {
    ModelMeta::new(
        "survey",
        "Answer",
        vec![
            ModelFieldDef::new("id", ModelFieldType::AutoField).primary_key(),
            ModelFieldDef::new(
                "attachment",
                ModelFieldType::FileField {
                    upload_to: "answers".into(),
                },
            )
            .blank(),
            ModelFieldDef::new(
                "favorite",
                ModelFieldType::ForeignKey {
                    to: "survey.Opinion".into(),
                },
            )
            .nullable()
            .choices(OPINIONS.iter().copied()),
            ModelFieldDef::new(
                "ranking",
                ModelFieldType::ManyToManyField {
                    to: "survey.Opinion".into(),
                    sortable: true,
                },
            )
            .choices(OPINIONS.iter().copied()),
        ],
    )
});

fn survey_config() -> ModelFormConfig {
    ModelFormConfig::new(&SURVEY)
        .with_widget("attachment", WidgetType::UploadedFileInput)
        .with_widget("favorite", WidgetType::selectize("label__icontains"))
        .with_widget("ranking", WidgetType::dual_sortable_selector("label__icontains"))
}

// ============================================================================
// 1. Binding and validation
// ============================================================================

#[test]
fn test_json_submission_validates() {
    let payload = serde_json::json!({
        "formset_data": {
            "email": "jane@example.com",
            "password": "correct horse",
            "confirm": "correct horse"
        }
    });
    let mut form = SignupForm::new();
    form.bind(FormData::from_json(&payload).unwrap());
    assert!(form.is_valid());
    assert_eq!(
        form.cleaned_data().get("email"),
        Some(&Value::from("jane@example.com"))
    );
}

#[test]
fn test_errors_accumulate_across_fields() {
    let mut form = SignupForm::new();
    form.bind(FormData::parse("email=nope&password=short&confirm=short"));
    assert!(!form.is_valid());
    assert_eq!(form.errors().len(), 3);
    assert_eq!(form.errors().get("email"), ["Enter a valid email address."]);
    assert!(form.non_field_errors().is_empty());
}

#[test]
fn test_password_preserves_whitespace() {
    let mut form = SignupForm::new();
    form.bind(FormData::parse(
        "email=a@b.io&password=+spaces++&confirm=spaces++",
    ));
    assert!(!form.is_valid());
    assert_eq!(form.non_field_errors(), ["Passwords do not match."]);
}

// ============================================================================
// 2. Cross-field rules
// ============================================================================

#[test]
fn test_clean_error_serializes_under_all() {
    let mut form = SignupForm::new();
    form.bind(FormData::parse(
        "email=a@b.io&password=aaaaaaaa&confirm=bbbbbbbb",
    ));
    let errors = full_clean(&mut form).unwrap_err();
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json[NON_FIELD_ERRORS][0], "Passwords do not match.");
}

#[test]
fn test_clean_sees_only_valid_fields() {
    let mut form = SignupForm::new();
    // both password fields fail min_length, so the rule compares "" with ""
    form.bind(FormData::parse("email=a@b.io&password=abc&confirm=xyz"));
    assert!(!form.is_valid());
    assert!(!form.errors().contains(NON_FIELD_ERRORS));
    assert!(form.errors().contains("password"));
    assert!(form.errors().contains("confirm"));
}

// ============================================================================
// 3. Model forms
// ============================================================================

#[test]
fn test_survey_config_passes_checks() {
    assert!(check(&survey_config()).iter().all(|m| !m.is_serious()));
}

#[test]
fn test_sortable_ranking_keeps_submission_order() {
    let config = survey_config().with_fields(ModelFormFields::Include(vec!["ranking".into()]));
    let mut form = ModelForm::new(&config).unwrap();
    form.bind(FormData::from_json(&serde_json::json!({"ranking": ["11", "2", "1"]})).unwrap());
    assert!(form.is_valid());
    assert_eq!(
        form.cleaned_data().get("ranking"),
        Some(&Value::from(vec!["11", "2", "1"]))
    );

    let html = form.base().render(&RenderOptions::new());
    let first = html.find(r#"value="11""#).unwrap();
    let last = html.find(r#"value="3""#).unwrap();
    assert!(first < last);
    assert!(html.contains(r#"is="django-dual-sortable-selector""#));
}

#[test]
fn test_optional_foreign_key_and_file() {
    let form_config = survey_config();
    let mut form = ModelForm::new(&form_config).unwrap();
    form.bind(FormData::parse("ranking=3"));
    assert!(form.is_valid());
    assert_eq!(form.cleaned_data().get("favorite"), Some(&Value::Null));
    assert_eq!(form.cleaned_data().get("attachment"), Some(&Value::Null));
}

#[test]
fn test_selectize_search_uses_lookup() {
    let widget = WidgetType::selectize("label__icontains");
    let choices: Vec<(String, String)> = OPINIONS
        .iter()
        .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
        .collect();
    let hits: Vec<&str> = widget
        .search(&choices, "opinion 1")
        .unwrap()
        .iter()
        .map(|(v, _)| v.as_str())
        .collect();
    assert_eq!(hits, ["1", "11"]);
}

#[test]
fn test_render_model_form_with_feedback_withheld() {
    let form = ModelForm::new(&survey_config()).unwrap();
    let html = form.base().render(
        &RenderOptions::new()
            .endpoint("/survey")
            .withhold(Feedback::Warnings)
            .withhold(Feedback::Messages),
    );
    assert!(html.starts_with(
        r#"<django-formset endpoint="/survey" withhold-feedback="messages warnings">"#
    ));
    assert!(html.contains("<django-file-dropzone>"));
    assert!(html.contains(r#"is="django-selectize""#));
    assert!(html.contains(r#"<label for="id_favorite">Favorite</label>"#));
}
