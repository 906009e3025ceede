//! Model-backed forms that generate their fields from model metadata.
//!
//! [`ModelFormConfig`] names a model's [`ModelMeta`], selects which of its
//! attributes become form fields, and overrides their widgets, labels and
//! help texts. [`generate_form_fields`] turns it into [`FormFieldDef`]s and
//! [`ModelForm`] wraps those in a [`Form`].
//!
//! Widget overrides are checked by [`check`]: file attributes need the
//! upload widget, selector widgets need an attribute with choices, and
//! search lookups must parse.
//!
//! This mirrors Django's `django.forms.ModelForm` and `ModelFormOptions`.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use formset_rs_core::checks::CheckMessage;
use formset_rs_core::{FormsetError, FormsetResult, Value};

use crate::fields::{pretty_name, FormFieldDef, FormFieldType};
use crate::form::{BaseForm, Form};
use crate::lookup::SearchLookup;
use crate::model::{ModelFieldDef, ModelFieldType, ModelMeta};
use crate::widgets::WidgetType;

/// Specifies which model fields to include in a `ModelForm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelFormFields {
    /// Include all editable fields, in model order.
    All,
    /// Include only the specified fields, in the listed order.
    Include(Vec<String>),
    /// Include all editable fields except the specified ones.
    Exclude(Vec<String>),
}

/// Configuration for generating a model-backed form.
#[derive(Debug, Clone)]
pub struct ModelFormConfig {
    /// The model metadata to generate fields from.
    pub model: &'static ModelMeta,
    /// Which model fields to include in the form.
    pub fields: ModelFormFields,
    /// Widget overrides in declaration order, keyed by attribute name.
    pub widgets: Vec<(String, WidgetType)>,
    /// Label overrides keyed by attribute name.
    pub labels: HashMap<String, String>,
    /// Help text overrides keyed by attribute name.
    pub help_texts: HashMap<String, String>,
}

impl ModelFormConfig {
    /// Creates a new `ModelFormConfig` with all fields included.
    pub fn new(model: &'static ModelMeta) -> Self {
        Self {
            model,
            fields: ModelFormFields::All,
            widgets: Vec::new(),
            labels: HashMap::new(),
            help_texts: HashMap::new(),
        }
    }

    /// Sets which fields to include.
    #[must_use]
    pub fn with_fields(mut self, fields: ModelFormFields) -> Self {
        self.fields = fields;
        self
    }

    /// Adds a widget override for a specific attribute.
    #[must_use]
    pub fn with_widget(mut self, field_name: impl Into<String>, widget: WidgetType) -> Self {
        let field_name = field_name.into();
        self.widgets.retain(|(name, _)| *name != field_name);
        self.widgets.push((field_name, widget));
        self
    }

    /// Adds a label override for a specific attribute.
    #[must_use]
    pub fn with_label(mut self, field_name: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field_name.into(), label.into());
        self
    }

    /// Adds a help text override for a specific attribute.
    #[must_use]
    pub fn with_help_text(mut self, field_name: impl Into<String>, text: impl Into<String>) -> Self {
        self.help_texts.insert(field_name.into(), text.into());
        self
    }

    /// Returns the widget override for an attribute, if any.
    pub fn widget_for(&self, field_name: &str) -> Option<&WidgetType> {
        self.widgets
            .iter()
            .find(|(name, _)| name == field_name)
            .map(|(_, widget)| widget)
    }

    /// Returns the model attributes that become form fields, in form order.
    ///
    /// # Errors
    ///
    /// Returns [`FormsetError::ImproperlyConfigured`] if an `Include` list
    /// names an attribute the model lacks or one that is not editable.
    pub fn selected_fields(&self) -> FormsetResult<Vec<&'static ModelFieldDef>> {
        let model = self.model;
        match &self.fields {
            ModelFormFields::All => Ok(model.fields.iter().filter(|f| is_form_field(f)).collect()),
            ModelFormFields::Exclude(exclude) => Ok(model
                .fields
                .iter()
                .filter(|f| is_form_field(f) && !exclude.iter().any(|e| e == f.name))
                .collect()),
            ModelFormFields::Include(include) => {
                let unknown: Vec<&str> = include
                    .iter()
                    .filter(|name| model.field(name).is_none())
                    .map(String::as_str)
                    .collect();
                if !unknown.is_empty() {
                    return Err(FormsetError::ImproperlyConfigured(format!(
                        "Unknown field(s) ({}) specified for {}",
                        unknown.join(", "),
                        model.object_name
                    )));
                }
                include
                    .iter()
                    .filter_map(|name| model.field(name))
                    .map(|f| {
                        if is_form_field(f) {
                            Ok(f)
                        } else {
                            Err(FormsetError::ImproperlyConfigured(format!(
                                "'{}' cannot be specified for {} model form as it is a non-editable field",
                                f.name, model.object_name
                            )))
                        }
                    })
                    .collect()
            }
        }
    }
}

fn is_form_field(field: &ModelFieldDef) -> bool {
    field.editable && !field.primary_key && field.field_type != ModelFieldType::AutoField
}

/// Generates form field definitions from a model form configuration.
///
/// Only the selected attributes produce fields. Overrides for attributes
/// outside the selection are ignored.
///
/// # Errors
///
/// Returns [`FormsetError::ImproperlyConfigured`] if the field selection is
/// invalid (see [`ModelFormConfig::selected_fields`]).
pub fn generate_form_fields(config: &ModelFormConfig) -> FormsetResult<Vec<FormFieldDef>> {
    let selected = config.selected_fields()?;
    let mut form_fields = Vec::with_capacity(selected.len());

    for model_field in selected {
        let name = model_field.name;
        let (field_type, default_widget) = model_field_to_form_field_type(model_field);

        let mut form_field = FormFieldDef::new(name, field_type);
        if let Some(widget) = default_widget {
            form_field.widget = widget;
        }

        form_field.required =
            !model_field.blank && !model_field.null && model_field.default.is_none();

        if let Some(widget) = config.widget_for(name) {
            form_field.widget = widget.clone();
        }
        form_field.label = config
            .labels
            .get(name)
            .cloned()
            .unwrap_or_else(|| pretty_name(&model_field.verbose_name));
        form_field.help_text = config
            .help_texts
            .get(name)
            .cloned()
            .unwrap_or_else(|| model_field.help_text.clone());
        form_field.initial.clone_from(&model_field.default);

        form_fields.push(form_field);
    }

    debug!(
        model = %config.model.label(),
        fields = form_fields.len(),
        "generated model form fields"
    );
    Ok(form_fields)
}

/// Converts a model field type to a form field type and, where it differs
/// from the form type's default, a widget.
fn model_field_to_form_field_type(field: &ModelFieldDef) -> (FormFieldType, Option<WidgetType>) {
    let choices = || field.choices.clone().unwrap_or_default();
    match &field.field_type {
        ModelFieldType::CharField | ModelFieldType::IntegerField if field.choices.is_some() => {
            (FormFieldType::Choice { choices: choices() }, None)
        }
        ModelFieldType::CharField | ModelFieldType::AutoField => (
            FormFieldType::Char {
                min_length: None,
                max_length: field.max_length,
                strip: true,
            },
            None,
        ),
        ModelFieldType::TextField => (
            FormFieldType::Char {
                min_length: None,
                max_length: field.max_length,
                strip: true,
            },
            Some(WidgetType::Textarea),
        ),
        ModelFieldType::IntegerField => (
            FormFieldType::Integer {
                min_value: None,
                max_value: None,
            },
            None,
        ),
        ModelFieldType::BooleanField => (FormFieldType::Boolean, None),
        ModelFieldType::EmailField => (FormFieldType::Email, None),
        ModelFieldType::FileField { .. } => (
            FormFieldType::File {
                allowed_extensions: Vec::new(),
            },
            None,
        ),
        ModelFieldType::ImageField { .. } => (FormFieldType::Image, None),
        ModelFieldType::ForeignKey { .. } => (FormFieldType::ModelChoice { choices: choices() }, None),
        ModelFieldType::ManyToManyField { .. } => (
            FormFieldType::ModelMultipleChoice { choices: choices() },
            None,
        ),
    }
}

/// Checks a model form's widget overrides against its model.
///
/// Reports:
/// - `forms.E001`: a selected file or image attribute that does not use
///   [`WidgetType::UploadedFileInput`]
/// - `forms.E002`: a selector widget on an attribute without choices
/// - `forms.E003`: a search lookup that does not parse
/// - `forms.E004`: an invalid field selection
/// - `forms.W001`: an override naming an attribute the model does not have
///
/// Overrides for attributes that exist but are not selected produce nothing.
pub fn check(config: &ModelFormConfig) -> Vec<CheckMessage> {
    let model = config.model;
    let label = model.label();
    let mut messages = Vec::new();

    for (name, _) in &config.widgets {
        if model.field(name).is_none() {
            messages.push(CheckMessage::warning(
                format!("Widget override '{name}' does not name an attribute of {}.", model.object_name),
                Some("Remove the override or fix the attribute name."),
                Some(label.as_str()),
                Some("forms.W001"),
            ));
        }
    }

    let selected = match config.selected_fields() {
        Ok(selected) => selected,
        Err(e) => {
            messages.push(CheckMessage::error(
                e.to_string(),
                None,
                Some(label.as_str()),
                Some("forms.E004"),
            ));
            return messages;
        }
    };

    for field in selected {
        let obj = format!("{label}.{}", field.name);
        let override_widget = config.widget_for(field.name);

        if field.is_file() && override_widget != Some(&WidgetType::UploadedFileInput) {
            messages.push(CheckMessage::error(
                format!("File attribute '{}' must use the UploadedFileInput widget.", field.name),
                Some("Add an UploadedFileInput override for this attribute."),
                Some(obj.as_str()),
                Some("forms.E001"),
            ));
        }

        let Some(widget) = override_widget else {
            continue;
        };

        if widget.is_selector() && !field.has_choices() {
            messages.push(CheckMessage::error(
                format!("{widget} requires '{}' to have choices.", field.name),
                Some("Use a selector only on attributes with choices or relations."),
                Some(obj.as_str()),
                Some("forms.E002"),
            ));
        }

        if let Some(expr) = widget.search_lookup() {
            if let Err(e) = expr.parse::<SearchLookup>() {
                messages.push(CheckMessage::error(
                    e.to_string(),
                    Some("Use a lookup like 'label__icontains'."),
                    Some(obj.as_str()),
                    Some("forms.E003"),
                ));
            }
        }
    }

    messages
}

/// A form generated from model metadata.
#[derive(Debug, Clone)]
pub struct ModelForm {
    name: String,
    model: &'static ModelMeta,
    base: BaseForm,
}

impl ModelForm {
    /// Builds the form described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FormsetError::ImproperlyConfigured`] if the field selection
    /// is invalid.
    pub fn new(config: &ModelFormConfig) -> FormsetResult<Self> {
        Ok(Self {
            name: format!("{}Form", config.model.object_name),
            model: config.model,
            base: BaseForm::new(generate_form_fields(config)?),
        })
    }

    /// Sets the name used in logs.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Uses the values of an existing instance as initial values.
    ///
    /// Attributes the form has no field for are ignored.
    #[must_use]
    pub fn with_instance(mut self, instance: &BTreeMap<String, Value>) -> Self {
        self.base = self.base.with_initial(instance);
        self
    }

    /// Returns the model this form is generated from.
    pub const fn model(&self) -> &'static ModelMeta {
        self.model
    }
}

impl Form for ModelForm {
    fn name(&self) -> &str {
        &self.name
    }

    fn base(&self) -> &BaseForm {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseForm {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FormData;
    use crate::model::ModelFieldDef;
    use formset_rs_core::checks::CheckLevel;
    use once_cell::sync::Lazy;

    static ARTICLE: Lazy<ModelMeta> = Lazy::new(|| {
        ModelMeta::new(
            "blog",
            "Article",
            vec![
                ModelFieldDef::new("id", ModelFieldType::AutoField).primary_key(),
                ModelFieldDef::new("title", ModelFieldType::CharField)
                    .max_length(20)
                    .verbose_name("headline"),
                ModelFieldDef::new("body", ModelFieldType::TextField).blank(),
                ModelFieldDef::new(
                    "cover",
                    ModelFieldType::ImageField {
                        upload_to: "covers".into(),
                    },
                )
                .blank(),
                ModelFieldDef::new("status", ModelFieldType::CharField)
                    .choices([("draft", "Draft"), ("live", "Live")])
                    .default("draft"),
                ModelFieldDef::new(
                    "tags",
                    ModelFieldType::ManyToManyField {
                        to: "blog.Tag".into(),
                        sortable: false,
                    },
                )
                .blank()
                .choices([("1", "rust"), ("2", "django")]),
                ModelFieldDef::new("slug", ModelFieldType::CharField).not_editable(),
            ],
        )
    });

    fn names(fields: &[FormFieldDef]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn ids(messages: &[CheckMessage]) -> Vec<&str> {
        messages.iter().filter_map(|m| m.id.as_deref()).collect()
    }

    #[test]
    fn test_all_skips_pk_and_non_editable() {
        let config = ModelFormConfig::new(&ARTICLE);
        let fields = generate_form_fields(&config).unwrap();
        assert_eq!(names(&fields), ["title", "body", "cover", "status", "tags"]);
    }

    #[test]
    fn test_include_follows_listed_order() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["tags".into(), "title".into()]));
        let fields = generate_form_fields(&config).unwrap();
        assert_eq!(names(&fields), ["tags", "title"]);
    }

    #[test]
    fn test_include_unknown_is_error() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["author".into()]));
        let err = generate_form_fields(&config).unwrap_err();
        assert!(err.to_string().contains("Unknown field(s) (author)"));
    }

    #[test]
    fn test_include_non_editable_is_error() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["slug".into()]));
        assert!(matches!(
            generate_form_fields(&config),
            Err(FormsetError::ImproperlyConfigured(_))
        ));
    }

    #[test]
    fn test_exclude() {
        let config = ModelFormConfig::new(&ARTICLE).with_fields(ModelFormFields::Exclude(vec![
            "body".into(),
            "cover".into(),
            "nonexistent".into(),
        ]));
        let fields = generate_form_fields(&config).unwrap();
        assert_eq!(names(&fields), ["title", "status", "tags"]);
    }

    #[test]
    fn test_type_mapping_and_metadata() {
        let fields = generate_form_fields(&ModelFormConfig::new(&ARTICLE)).unwrap();
        let title = &fields[0];
        assert!(title.required);
        assert_eq!(title.label, "Headline");
        assert!(matches!(
            title.field_type,
            FormFieldType::Char {
                max_length: Some(20),
                ..
            }
        ));
        let body = &fields[1];
        assert!(!body.required);
        assert_eq!(body.widget, WidgetType::Textarea);
        assert!(matches!(fields[2].field_type, FormFieldType::Image));
        let status = &fields[3];
        assert!(matches!(status.field_type, FormFieldType::Choice { .. }));
        assert!(!status.required);
        assert_eq!(status.initial, Some(Value::from("draft")));
        assert!(fields[4].field_type.is_multiple());
    }

    #[test]
    fn test_overrides_apply_only_to_selected() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["tags".into()]))
            .with_widget("tags", WidgetType::dual_selector("label__icontains"))
            .with_widget("status", WidgetType::RadioSelect)
            .with_label("tags", "Keywords");
        let fields = generate_form_fields(&config).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].widget, WidgetType::dual_selector("label__icontains"));
        assert_eq!(fields[0].label, "Keywords");
    }

    #[test]
    fn test_with_widget_replaces_previous_override() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_widget("status", WidgetType::Select)
            .with_widget("status", WidgetType::RadioSelect);
        assert_eq!(config.widgets.len(), 1);
        assert_eq!(config.widget_for("status"), Some(&WidgetType::RadioSelect));
    }

    #[test]
    fn test_check_clean_config() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_widget("cover", WidgetType::UploadedFileInput)
            .with_widget("status", WidgetType::RadioSelect)
            .with_widget("tags", WidgetType::selectize_multiple("label__icontains", Some(3)));
        assert!(check(&config).is_empty());
    }

    #[test]
    fn test_check_file_needs_upload_widget() {
        let messages = check(&ModelFormConfig::new(&ARTICLE));
        assert_eq!(ids(&messages), ["forms.E001"]);
        assert_eq!(messages[0].obj.as_deref(), Some("blog.Article.cover"));
        assert!(messages[0].is_serious());
    }

    #[test]
    fn test_check_selector_without_choices() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["title".into()]))
            .with_widget("title", WidgetType::selectize("label__icontains"));
        assert_eq!(ids(&check(&config)), ["forms.E002"]);
    }

    #[test]
    fn test_check_bad_lookup() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["tags".into()]))
            .with_widget("tags", WidgetType::dual_sortable_selector("label__fuzzy"));
        assert_eq!(ids(&check(&config)), ["forms.E003"]);
    }

    #[test]
    fn test_check_unknown_override_warns() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["title".into()]))
            .with_widget("subtitle", WidgetType::Textarea);
        let messages = check(&config);
        assert_eq!(ids(&messages), ["forms.W001"]);
        assert_eq!(messages[0].level, CheckLevel::Warning);
    }

    #[test]
    fn test_check_ignores_unselected_overrides() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["title".into()]))
            .with_widget("cover", WidgetType::Textarea)
            .with_widget("body", WidgetType::selectize("label__nope"));
        assert!(check(&config).is_empty());
    }

    #[test]
    fn test_check_reports_bad_selection() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["author".into()]));
        assert_eq!(ids(&check(&config)), ["forms.E004"]);
    }

    #[test]
    fn test_model_form_validates() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["title".into(), "tags".into()]));
        let mut form = ModelForm::new(&config).unwrap();
        assert_eq!(form.name(), "ArticleForm");
        form.bind(FormData::parse("title=Hello&tags=2&tags=1"));
        assert!(form.is_valid());
        assert_eq!(
            form.cleaned_data().get("tags"),
            Some(&Value::from(vec!["2", "1"]))
        );

        form.bind(FormData::parse("tags=9"));
        assert!(!form.is_valid());
        assert_eq!(form.errors().get("title"), ["This field is required."]);
        assert!(form.errors().contains("tags"));
    }

    #[test]
    fn test_model_form_with_instance() {
        let config = ModelFormConfig::new(&ARTICLE)
            .with_fields(ModelFormFields::Include(vec!["title".into()]));
        let mut instance = BTreeMap::new();
        instance.insert("title".to_string(), Value::from("Existing"));
        instance.insert("unrelated".to_string(), Value::Int(1));
        let form = ModelForm::new(&config).unwrap().with_instance(&instance);
        assert_eq!(form.fields()[0].initial, Some(Value::from("Existing")));
    }
}
