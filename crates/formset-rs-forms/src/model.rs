//! Model metadata consumed by model forms.
//!
//! A [`ModelMeta`] describes a model's attributes the way a model class
//! declares them: name, type, nullability, choices and so on. Model forms
//! read it to generate their form fields. Nothing here talks to a database;
//! the selectable rows of a relation are supplied through
//! [`ModelFieldDef::choices`].
//!
//! This mirrors the parts of Django's `Model._meta` that `ModelForm` uses.

use formset_rs_core::Value;

/// The type of a model field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelFieldType {
    /// An auto-incrementing integer primary key.
    AutoField,
    /// A bounded string.
    CharField,
    /// An unbounded string.
    TextField,
    /// A 64-bit integer.
    IntegerField,
    /// A boolean.
    BooleanField,
    /// A string holding an email address.
    EmailField,
    /// A stored file, kept below `upload_to`.
    FileField {
        /// Storage subdirectory.
        upload_to: String,
    },
    /// A stored image, kept below `upload_to`.
    ImageField {
        /// Storage subdirectory.
        upload_to: String,
    },
    /// A reference to one row of another model.
    ForeignKey {
        /// Label of the related model, e.g. `testapp.OpinionModel`.
        to: String,
    },
    /// References to several rows of another model.
    ManyToManyField {
        /// Label of the related model.
        to: String,
        /// Whether the relation stores the order items were chosen in.
        sortable: bool,
    },
}

/// Definition of a model attribute.
#[derive(Debug, Clone)]
pub struct ModelFieldDef {
    /// The attribute name.
    pub name: &'static str,
    /// The attribute type.
    pub field_type: ModelFieldType,
    /// Whether this attribute is the primary key.
    pub primary_key: bool,
    /// Whether NULL is allowed.
    pub null: bool,
    /// Whether the attribute may be left blank in forms.
    pub blank: bool,
    /// Maximum character length.
    pub max_length: Option<usize>,
    /// Human-readable name, used as the form label.
    pub verbose_name: String,
    /// Human-readable help text.
    pub help_text: String,
    /// Allowed `(value, label)` pairs; for relations, the selectable rows.
    pub choices: Option<Vec<(String, String)>>,
    /// Whether the attribute is editable in forms.
    pub editable: bool,
    /// Default value for new instances.
    pub default: Option<Value>,
}

impl ModelFieldDef {
    /// Creates a new attribute definition with Django's defaults.
    pub fn new(name: &'static str, field_type: ModelFieldType) -> Self {
        Self {
            name,
            field_type,
            primary_key: false,
            null: false,
            blank: false,
            max_length: None,
            verbose_name: name.replace('_', " "),
            help_text: String::new(),
            choices: None,
            editable: true,
            default: None,
        }
    }

    /// Marks this attribute as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Allows NULL values.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.null = true;
        self
    }

    /// Allows blank form input.
    #[must_use]
    pub const fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Sets the maximum character length.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the verbose (human-readable) name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the allowed choices.
    #[must_use]
    pub fn choices<I, V, L>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        self.choices = Some(
            choices
                .into_iter()
                .map(|(v, l)| (v.into(), l.into()))
                .collect(),
        );
        self
    }

    /// Excludes this attribute from forms.
    #[must_use]
    pub const fn not_editable(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns `true` for file and image attributes.
    pub const fn is_file(&self) -> bool {
        matches!(
            self.field_type,
            ModelFieldType::FileField { .. } | ModelFieldType::ImageField { .. }
        )
    }

    /// Returns `true` for foreign keys and many-to-many relations.
    pub const fn is_relation(&self) -> bool {
        matches!(
            self.field_type,
            ModelFieldType::ForeignKey { .. } | ModelFieldType::ManyToManyField { .. }
        )
    }

    /// Returns `true` if the attribute offers a fixed set of values.
    pub fn has_choices(&self) -> bool {
        self.choices.is_some() || self.is_relation()
    }
}

/// Model-level metadata.
#[derive(Debug, Clone)]
pub struct ModelMeta {
    /// The application label (e.g. "testapp").
    pub app_label: &'static str,
    /// The model's class name (e.g. "PersonModel").
    pub object_name: &'static str,
    /// Human-readable singular name.
    pub verbose_name: String,
    /// Attribute definitions in declaration order.
    pub fields: Vec<ModelFieldDef>,
}

impl ModelMeta {
    /// Creates metadata for `app_label.object_name` with the given attributes.
    pub fn new(app_label: &'static str, object_name: &'static str, fields: Vec<ModelFieldDef>) -> Self {
        Self {
            app_label,
            object_name,
            verbose_name: object_name.to_lowercase(),
            fields,
        }
    }

    /// Sets the verbose name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// The lowercase model name (e.g. "personmodel").
    pub fn model_name(&self) -> String {
        self.object_name.to_lowercase()
    }

    /// The dotted label (e.g. "testapp.PersonModel").
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.object_name)
    }

    /// Looks up an attribute by name.
    pub fn field(&self, name: &str) -> Option<&ModelFieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ModelMeta {
        ModelMeta::new(
            "testapp",
            "PersonModel",
            vec![
                ModelFieldDef::new("id", ModelFieldType::AutoField).primary_key(),
                ModelFieldDef::new("full_name", ModelFieldType::CharField).max_length(50),
                ModelFieldDef::new(
                    "avatar",
                    ModelFieldType::FileField {
                        upload_to: "images".into(),
                    },
                )
                .blank(),
                ModelFieldDef::new(
                    "opinion",
                    ModelFieldType::ForeignKey {
                        to: "testapp.OpinionModel".into(),
                    },
                )
                .nullable(),
            ],
        )
    }

    #[test]
    fn test_labels() {
        let m = meta();
        assert_eq!(m.label(), "testapp.PersonModel");
        assert_eq!(m.model_name(), "personmodel");
        assert_eq!(m.verbose_name, "personmodel");
    }

    #[test]
    fn test_field_lookup_and_defaults() {
        let m = meta();
        let full_name = m.field("full_name").unwrap();
        assert_eq!(full_name.verbose_name, "full name");
        assert_eq!(full_name.max_length, Some(50));
        assert!(full_name.editable);
        assert!(!full_name.null);
        assert!(m.field("missing").is_none());
    }

    #[test]
    fn test_kind_predicates() {
        let m = meta();
        assert!(m.field("avatar").unwrap().is_file());
        assert!(m.field("opinion").unwrap().is_relation());
        assert!(m.field("opinion").unwrap().has_choices());
        assert!(!m.field("full_name").unwrap().has_choices());
    }

    #[test]
    fn test_choices_builder() {
        let f = ModelFieldDef::new("gender", ModelFieldType::CharField)
            .choices([("female", "Female"), ("male", "Male")]);
        assert_eq!(f.choices.as_ref().map(Vec::len), Some(2));
        assert!(f.has_choices());
    }
}
