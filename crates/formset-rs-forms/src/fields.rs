//! Form field definitions and type-level validation.
//!
//! Each [`FormFieldDef`] describes a single form field, including its type,
//! widget, label, help text and overridable error messages. The
//! [`FormFieldType`] enum carries the type-specific constraints, and
//! [`clean_field_value`] turns raw submitted strings into a [`Value`] or a
//! list of [`ValidationError`]s.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use formset_rs_core::{FormsetError, FormsetResult, ValidationError, Value};

use crate::widgets::{Widget, WidgetType};

/// `(value, label)` pairs offered by choice fields.
pub type Choices = Vec<(String, String)>;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").expect("valid regex")
});

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg"];

/// Defines the type of a form field, including type-specific parameters.
#[derive(Debug, Clone)]
pub enum FormFieldType {
    /// A character (string) field.
    Char {
        /// Minimum length in characters.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Whether to strip leading/trailing whitespace.
        strip: bool,
    },
    /// A character field that must also match a regular expression.
    Regex {
        /// The compiled pattern. A match anywhere in the value passes.
        regex: Regex,
        /// Minimum length in characters.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Whether to strip leading/trailing whitespace.
        strip: bool,
    },
    /// An integer field.
    Integer {
        /// Minimum allowed value.
        min_value: Option<i64>,
        /// Maximum allowed value.
        max_value: Option<i64>,
    },
    /// A boolean field. When required, the value must be true.
    Boolean,
    /// An email address field.
    Email,
    /// A single choice among fixed options.
    Choice {
        /// Available choices.
        choices: Choices,
    },
    /// Several choices among fixed options.
    MultipleChoice {
        /// Available choices.
        choices: Choices,
    },
    /// A single related object, identified by its key.
    ModelChoice {
        /// `(key, label)` of the selectable related objects.
        choices: Choices,
    },
    /// Several related objects; the cleaned list keeps the submitted order.
    ModelMultipleChoice {
        /// `(key, label)` of the selectable related objects.
        choices: Choices,
    },
    /// A file upload, identified by its file name.
    File {
        /// Allowed lowercase file extensions; empty allows everything.
        allowed_extensions: Vec<String>,
    },
    /// An image upload.
    Image,
}

impl FormFieldType {
    /// A [`FormFieldType::Regex`] compiled from `pattern`, stripping whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`FormsetError::ImproperlyConfigured`] if the pattern is invalid.
    pub fn regex(pattern: &str, max_length: Option<usize>) -> FormsetResult<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            FormsetError::ImproperlyConfigured(format!("Invalid regex '{pattern}': {e}"))
        })?;
        Ok(Self::Regex {
            regex,
            min_length: None,
            max_length,
            strip: true,
        })
    }

    /// Returns the field's choices, if it is a choice field.
    pub fn choices(&self) -> Option<&Choices> {
        match self {
            Self::Choice { choices }
            | Self::MultipleChoice { choices }
            | Self::ModelChoice { choices }
            | Self::ModelMultipleChoice { choices } => Some(choices),
            _ => None,
        }
    }

    /// Returns `true` if the field accepts several values.
    pub const fn is_multiple(&self) -> bool {
        matches!(
            self,
            Self::MultipleChoice { .. } | Self::ModelMultipleChoice { .. }
        )
    }
}

/// Returns the default widget type for a given form field type.
pub fn default_widget_for_field_type(field_type: &FormFieldType) -> WidgetType {
    match field_type {
        FormFieldType::Char { .. } | FormFieldType::Regex { .. } => WidgetType::TextInput,
        FormFieldType::Integer { .. } => WidgetType::NumberInput,
        FormFieldType::Boolean => WidgetType::CheckboxInput,
        FormFieldType::Email => WidgetType::EmailInput,
        FormFieldType::Choice { .. } | FormFieldType::ModelChoice { .. } => WidgetType::Select,
        FormFieldType::MultipleChoice { .. } | FormFieldType::ModelMultipleChoice { .. } => {
            WidgetType::SelectMultiple
        }
        FormFieldType::File { .. } | FormFieldType::Image => WidgetType::FileInput,
    }
}

/// Turns `last_name` into `Last name`.
pub fn pretty_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Complete definition of a form field.
#[derive(Debug, Clone)]
pub struct FormFieldDef {
    /// The field name (HTML name attribute, before any form prefix).
    pub name: String,
    /// The field type, controlling parsing and constraints.
    pub field_type: FormFieldType,
    /// Whether this field is required.
    pub required: bool,
    /// Value used when an optional field is left empty, and for disabled fields.
    pub initial: Option<Value>,
    /// Help text displayed alongside the field.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// The widget type used for rendering and value extraction.
    pub widget: WidgetType,
    /// Custom error messages keyed by error code.
    pub error_messages: HashMap<String, String>,
    /// Whether the field is disabled (rendered but not editable).
    pub disabled: bool,
}

impl FormFieldDef {
    /// Creates a new required `FormFieldDef` using the default widget for its type.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let widget = default_widget_for_field_type(&field_type);
        let label = pretty_name(&name);
        Self {
            name,
            field_type,
            required: true,
            initial: None,
            help_text: String::new(),
            label,
            widget,
            error_messages: HashMap::new(),
            disabled: false,
        }
    }

    /// Sets whether this field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn initial(mut self, value: Value) -> Self {
        self.initial = Some(value);
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the widget type.
    #[must_use]
    pub fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Sets a custom error message for a given code.
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    /// Sets whether this field is disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Instantiates this field's widget with the field's choices.
    pub fn build_widget(&self) -> Box<dyn Widget> {
        let choices = self.field_type.choices().map_or(&[][..], Vec::as_slice);
        self.widget.build(choices)
    }

    /// Builds an error for `code`, preferring a custom message over `default`.
    fn error(&self, code: &str, default: &str) -> ValidationError {
        let message = self
            .error_messages
            .get(code)
            .map_or(default, String::as_str);
        ValidationError::new(message, code)
    }
}

/// Cleans (validates and coerces) raw submitted values into a typed [`Value`].
///
/// Single-value fields look at the last submitted value. The steps are:
/// 1. whitespace stripping (where the field asks for it)
/// 2. required check
/// 3. empty optional fields yield the initial value or `Null` (`[]` for
///    multi-value fields)
/// 4. type coercion and constraint checks; every failing check is reported
///
/// Returns the cleaned `Value` or all validation errors found.
pub fn clean_field_value(
    field: &FormFieldDef,
    values: &[String],
) -> Result<Value, Vec<ValidationError>> {
    if field.field_type.is_multiple() {
        return clean_multiple(field, values);
    }

    let raw = values.last().map_or("", String::as_str);
    let raw = match &field.field_type {
        FormFieldType::Char { strip: false, .. } | FormFieldType::Regex { strip: false, .. } => raw,
        _ => raw.trim(),
    };

    if field.required && raw.is_empty() && !matches!(field.field_type, FormFieldType::Boolean) {
        return Err(vec![field.error("required", "This field is required.")]);
    }
    if raw.is_empty() && !matches!(field.field_type, FormFieldType::Boolean) {
        return Ok(field.initial.clone().unwrap_or(Value::Null));
    }

    let mut errors = Vec::new();

    let value = match &field.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            ..
        } => {
            check_length(field, raw, *min_length, *max_length, &mut errors);
            Value::String(raw.to_string())
        }

        FormFieldType::Regex {
            regex,
            min_length,
            max_length,
            ..
        } => {
            check_length(field, raw, *min_length, *max_length, &mut errors);
            if !regex.is_match(raw) {
                errors.push(field.error("invalid", "Enter a valid value."));
            }
            Value::String(raw.to_string())
        }

        FormFieldType::Integer {
            min_value,
            max_value,
        } => match raw.parse::<i64>() {
            Ok(n) => {
                if let Some(min) = min_value.filter(|min| n < *min) {
                    errors.push(
                        field
                            .error(
                                "min_value",
                                "Ensure this value is greater than or equal to %(limit_value)s.",
                            )
                            .with_param("limit_value", min.to_string()),
                    );
                }
                if let Some(max) = max_value.filter(|max| n > *max) {
                    errors.push(
                        field
                            .error(
                                "max_value",
                                "Ensure this value is less than or equal to %(limit_value)s.",
                            )
                            .with_param("limit_value", max.to_string()),
                    );
                }
                Value::Int(n)
            }
            Err(_) => {
                errors.push(field.error("invalid", "Enter a whole number."));
                Value::Null
            }
        },

        FormFieldType::Boolean => {
            let checked = matches!(raw.to_lowercase().as_str(), "true" | "1" | "yes" | "on");
            if field.required && !checked {
                errors.push(field.error("required", "This field is required."));
            }
            Value::Bool(checked)
        }

        FormFieldType::Email => {
            if !EMAIL_RE.is_match(raw) {
                errors.push(field.error("invalid", "Enter a valid email address."));
            }
            Value::String(raw.to_string())
        }

        FormFieldType::Choice { choices } => {
            if !choices.iter().any(|(v, _)| v == raw) {
                errors.push(
                    field
                        .error(
                            "invalid_choice",
                            "Select a valid choice. %(value)s is not one of the available choices.",
                        )
                        .with_param("value", raw),
                );
            }
            Value::String(raw.to_string())
        }

        FormFieldType::ModelChoice { choices } => {
            if !choices.iter().any(|(v, _)| v == raw) {
                errors.push(field.error(
                    "invalid_choice",
                    "Select a valid choice. That choice is not one of the available choices.",
                ));
            }
            Value::String(raw.to_string())
        }

        FormFieldType::File { allowed_extensions } => {
            let ext = extension(raw);
            if !allowed_extensions.is_empty()
                && !allowed_extensions.iter().any(|e| e.to_lowercase() == ext)
            {
                errors.push(
                    field
                        .error(
                            "invalid_extension",
                            "File extension \u{201c}%(extension)s\u{201d} is not allowed. Allowed extensions are: %(allowed_extensions)s.",
                        )
                        .with_param("extension", ext)
                        .with_param("allowed_extensions", allowed_extensions.join(", ")),
                );
            }
            Value::String(raw.to_string())
        }

        FormFieldType::Image => {
            if !IMAGE_EXTENSIONS.contains(&extension(raw).as_str()) {
                errors.push(field.error(
                    "invalid_image",
                    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
                ));
            }
            Value::String(raw.to_string())
        }

        FormFieldType::MultipleChoice { .. } | FormFieldType::ModelMultipleChoice { .. } => {
            return clean_multiple(field, values);
        }
    };

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

fn clean_multiple(field: &FormFieldDef, values: &[String]) -> Result<Value, Vec<ValidationError>> {
    let choices = field.field_type.choices().map_or(&[][..], Vec::as_slice);
    let mut selected: Vec<&str> = Vec::new();
    for v in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        if !selected.contains(&v) {
            selected.push(v);
        }
    }

    if selected.is_empty() {
        if field.required {
            return Err(vec![field.error("required", "This field is required.")]);
        }
        return Ok(field.initial.clone().unwrap_or(Value::List(Vec::new())));
    }

    let errors: Vec<ValidationError> = selected
        .iter()
        .filter(|v| !choices.iter().any(|(cv, _)| cv == *v))
        .map(|v| {
            field
                .error(
                    "invalid_choice",
                    "Select a valid choice. %(value)s is not one of the available choices.",
                )
                .with_param("value", *v)
        })
        .collect();

    if errors.is_empty() {
        Ok(Value::List(
            selected.into_iter().map(|v| Value::String(v.to_string())).collect(),
        ))
    } else {
        Err(errors)
    }
}

fn check_length(
    field: &FormFieldDef,
    value: &str,
    min_length: Option<usize>,
    max_length: Option<usize>,
    errors: &mut Vec<ValidationError>,
) {
    let len = value.chars().count();
    if let Some(min) = min_length.filter(|min| len < *min) {
        errors.push(
            field
                .error(
                    "min_length",
                    "Ensure this value has at least %(limit_value)d characters (it has %(show_value)d).",
                )
                .with_param("limit_value", min.to_string())
                .with_param("show_value", len.to_string()),
        );
    }
    if let Some(max) = max_length.filter(|max| len > *max) {
        errors.push(
            field
                .error(
                    "max_length",
                    "Ensure this value has at most %(limit_value)d characters (it has %(show_value)d).",
                )
                .with_param("limit_value", max.to_string())
                .with_param("show_value", len.to_string()),
        );
    }
}

fn extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vals(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    fn messages(errors: &[ValidationError]) -> Vec<String> {
        errors.iter().map(ValidationError::rendered).collect()
    }

    fn char_field(min: Option<usize>, max: Option<usize>) -> FormFieldDef {
        FormFieldDef::new(
            "last_name",
            FormFieldType::Char {
                min_length: min,
                max_length: max,
                strip: true,
            },
        )
    }

    #[test]
    fn test_pretty_name() {
        assert_eq!(pretty_name("last_name"), "Last name");
        assert_eq!(pretty_name("weighted_opinions"), "Weighted opinions");
        assert_eq!(pretty_name(""), "");
    }

    #[test]
    fn test_char_strips_and_passes() {
        let field = char_field(Some(2), Some(50));
        assert_eq!(
            clean_field_value(&field, &vals(&["  Doe  "])),
            Ok(Value::from("Doe"))
        );
    }

    #[test]
    fn test_char_too_short() {
        let field = char_field(Some(2), Some(50));
        let errs = clean_field_value(&field, &vals(&["D"])).unwrap_err();
        assert_eq!(errs[0].code, "min_length");
        assert_eq!(
            messages(&errs),
            ["Ensure this value has at least 2 characters (it has 1)."]
        );
    }

    #[test]
    fn test_char_counts_characters_not_bytes() {
        let field = char_field(None, Some(3));
        assert!(clean_field_value(&field, &vals(&["äöü"])).is_ok());
        let errs = clean_field_value(&field, &vals(&["äöüß"])).unwrap_err();
        assert_eq!(errs[0].code, "max_length");
    }

    #[test]
    fn test_required_missing_and_blank() {
        let field = char_field(None, None);
        let errs = clean_field_value(&field, &[]).unwrap_err();
        assert_eq!(messages(&errs), ["This field is required."]);
        let errs = clean_field_value(&field, &vals(&["   "])).unwrap_err();
        assert_eq!(errs[0].code, "required");
    }

    #[test]
    fn test_optional_empty_yields_initial_or_null() {
        let field = char_field(None, None).required(false);
        assert_eq!(clean_field_value(&field, &[]), Ok(Value::Null));
        let field = field.initial(Value::from("n/a"));
        assert_eq!(clean_field_value(&field, &[]), Ok(Value::from("n/a")));
    }

    #[test]
    fn test_custom_required_message() {
        let field = char_field(None, None).error_message("required", "Tell us your name.");
        let errs = clean_field_value(&field, &[]).unwrap_err();
        assert_eq!(messages(&errs), ["Tell us your name."]);
    }

    #[test]
    fn test_regex_custom_invalid_message() {
        let field = FormFieldDef::new(
            "first_name",
            FormFieldType::regex("^[A-Z][a-z -]*$", Some(50)).unwrap(),
        )
        .error_message("invalid", "A first name must start in upper case.");
        assert!(clean_field_value(&field, &vals(&["John"])).is_ok());
        let errs = clean_field_value(&field, &vals(&["john"])).unwrap_err();
        assert_eq!(messages(&errs), ["A first name must start in upper case."]);
    }

    #[test]
    fn test_regex_reports_length_and_pattern() {
        let field = FormFieldDef::new("code", FormFieldType::regex("^[a-z]+$", Some(3)).unwrap());
        let errs = clean_field_value(&field, &vals(&["ABCD"])).unwrap_err();
        let codes: Vec<&str> = errs.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["max_length", "invalid"]);
    }

    #[test]
    fn test_regex_invalid_pattern() {
        let err = FormFieldType::regex("([a-z", None).unwrap_err();
        assert!(matches!(err, FormsetError::ImproperlyConfigured(_)));
    }

    #[test]
    fn test_integer_bounds() {
        let field = FormFieldDef::new(
            "age",
            FormFieldType::Integer {
                min_value: Some(0),
                max_value: Some(150),
            },
        );
        assert_eq!(clean_field_value(&field, &vals(&["42"])), Ok(Value::Int(42)));
        let errs = clean_field_value(&field, &vals(&["151"])).unwrap_err();
        assert_eq!(
            messages(&errs),
            ["Ensure this value is less than or equal to 150."]
        );
        let errs = clean_field_value(&field, &vals(&["abc"])).unwrap_err();
        assert_eq!(errs[0].code, "invalid");
    }

    #[test]
    fn test_boolean_required_means_checked() {
        let field = FormFieldDef::new("agree", FormFieldType::Boolean);
        assert_eq!(clean_field_value(&field, &vals(&["on"])), Ok(Value::Bool(true)));
        assert!(clean_field_value(&field, &[]).is_err());
        let optional = field.required(false);
        assert_eq!(clean_field_value(&optional, &[]), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_email() {
        let field = FormFieldDef::new("email", FormFieldType::Email);
        assert!(clean_field_value(&field, &vals(&["john@example.com"])).is_ok());
        assert!(clean_field_value(&field, &vals(&["john@"])).is_err());
    }

    #[test]
    fn test_choice() {
        let field = FormFieldDef::new(
            "gender",
            FormFieldType::Choice {
                choices: vec![("female".into(), "Female".into()), ("male".into(), "Male".into())],
            },
        );
        assert_eq!(clean_field_value(&field, &vals(&["male"])), Ok(Value::from("male")));
        let errs = clean_field_value(&field, &vals(&["other"])).unwrap_err();
        assert_eq!(
            messages(&errs),
            ["Select a valid choice. other is not one of the available choices."]
        );
    }

    #[test]
    fn test_model_choice_message() {
        let field = FormFieldDef::new(
            "opinion",
            FormFieldType::ModelChoice {
                choices: vec![("1".into(), "Opinion 1".into())],
            },
        );
        let errs = clean_field_value(&field, &vals(&["9"])).unwrap_err();
        assert_eq!(
            messages(&errs),
            ["Select a valid choice. That choice is not one of the available choices."]
        );
    }

    #[test]
    fn test_model_multiple_keeps_order_and_dedups() {
        let field = FormFieldDef::new(
            "weighted_opinions",
            FormFieldType::ModelMultipleChoice {
                choices: vec![
                    ("1".into(), "Opinion 1".into()),
                    ("2".into(), "Opinion 2".into()),
                    ("3".into(), "Opinion 3".into()),
                ],
            },
        );
        assert_eq!(
            clean_field_value(&field, &vals(&["3", "1", "3", ""])),
            Ok(Value::from(vec!["3", "1"]))
        );
        let errs = clean_field_value(&field, &vals(&["1", "7"])).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].params["value"], "7");
    }

    #[test]
    fn test_multiple_optional_empty() {
        let field = FormFieldDef::new(
            "opinions",
            FormFieldType::MultipleChoice { choices: vec![] },
        )
        .required(false);
        assert_eq!(clean_field_value(&field, &[]), Ok(Value::List(vec![])));
    }

    #[test]
    fn test_file_extensions() {
        let field = FormFieldDef::new(
            "cv",
            FormFieldType::File {
                allowed_extensions: vec!["pdf".into()],
            },
        );
        assert!(clean_field_value(&field, &vals(&["resume.PDF"])).is_ok());
        let errs = clean_field_value(&field, &vals(&["resume.doc"])).unwrap_err();
        assert_eq!(
            messages(&errs),
            ["File extension \u{201c}doc\u{201d} is not allowed. Allowed extensions are: pdf."]
        );
    }

    #[test]
    fn test_image() {
        let field = FormFieldDef::new("avatar", FormFieldType::Image);
        assert!(clean_field_value(&field, &vals(&["me.png"])).is_ok());
        assert_eq!(
            clean_field_value(&field, &vals(&["me.txt"])).unwrap_err()[0].code,
            "invalid_image"
        );
    }

    #[test]
    fn test_default_widgets() {
        assert_eq!(char_field(None, None).widget, WidgetType::TextInput);
        let f = FormFieldDef::new("a", FormFieldType::ModelMultipleChoice { choices: vec![] });
        assert_eq!(f.widget, WidgetType::SelectMultiple);
        assert_eq!(FormFieldDef::new("b", FormFieldType::Image).widget, WidgetType::FileInput);
    }
}
