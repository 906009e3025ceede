//! Widget system for rendering HTML form elements.
//!
//! A [`WidgetType`] is the declarative choice of how a field renders; it is
//! what a model form's widget overrides map attribute names to. Calling
//! [`WidgetType::build`] with the field's choices yields a [`Widget`] that can
//! render itself and extract submitted values.
//!
//! Besides the plain HTML inputs, this module provides the widgets of the
//! formset UI toolkit: [`UploadedFileInput`] for file fields, the searchable
//! [`Selectize`] selector (single or multiple) and the two-pane
//! [`DualSelector`] (optionally sortable).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use formset_rs_core::{FormsetError, FormsetResult, SETTINGS};

use crate::data::FormData;
use crate::lookup::SearchLookup;

/// HTML attributes, kept sorted for deterministic output.
pub type Attrs = BTreeMap<String, String>;

/// The declarative widget choice for a field.
///
/// # Examples
///
/// ```
/// use formset_rs_forms::widgets::WidgetType;
///
/// let w = WidgetType::selectize_multiple("label__icontains", Some(15));
/// assert!(w.is_multiple());
/// assert_eq!(w.search_lookup(), Some("label__icontains"));
/// assert_eq!(w.to_string(), "SelectizeMultiple");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget")]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<textarea>`.
    Textarea,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<select>`.
    Select,
    /// `<select multiple>`.
    SelectMultiple,
    /// A group of `<input type="radio">` elements.
    RadioSelect,
    /// `<input type="file">`.
    FileInput,
    /// A file input backed by the formset upload dropzone.
    UploadedFileInput,
    /// A searchable single-item selector.
    Selectize {
        /// Lookup used to filter options, e.g. `label__icontains`.
        search_lookup: Option<String>,
        /// Text shown while nothing is selected.
        placeholder: Option<String>,
    },
    /// A searchable multi-item selector.
    SelectizeMultiple {
        /// Lookup used to filter options.
        search_lookup: Option<String>,
        /// Upper bound of selectable items; `None` uses the configured default.
        max_items: Option<usize>,
    },
    /// A two-pane selector moving options between "available" and "selected".
    DualSelector {
        /// Lookup used to filter options.
        search_lookup: Option<String>,
    },
    /// A [`WidgetType::DualSelector`] whose selected pane keeps a user-defined order.
    DualSortableSelector {
        /// Lookup used to filter options.
        search_lookup: Option<String>,
    },
}

impl WidgetType {
    /// A single-item [`Selectize`] filtering with `search_lookup`.
    pub fn selectize(search_lookup: &str) -> Self {
        Self::Selectize {
            search_lookup: Some(search_lookup.to_string()),
            placeholder: None,
        }
    }

    /// A multi-item [`Selectize`] filtering with `search_lookup`.
    pub fn selectize_multiple(search_lookup: &str, max_items: Option<usize>) -> Self {
        Self::SelectizeMultiple {
            search_lookup: Some(search_lookup.to_string()),
            max_items,
        }
    }

    /// A [`DualSelector`] filtering with `search_lookup`.
    pub fn dual_selector(search_lookup: &str) -> Self {
        Self::DualSelector {
            search_lookup: Some(search_lookup.to_string()),
        }
    }

    /// A sortable [`DualSelector`] filtering with `search_lookup`.
    pub fn dual_sortable_selector(search_lookup: &str) -> Self {
        Self::DualSortableSelector {
            search_lookup: Some(search_lookup.to_string()),
        }
    }

    /// Returns the widget's search lookup expression, if it has one.
    pub fn search_lookup(&self) -> Option<&str> {
        match self {
            Self::Selectize { search_lookup, .. }
            | Self::SelectizeMultiple { search_lookup, .. }
            | Self::DualSelector { search_lookup }
            | Self::DualSortableSelector { search_lookup } => search_lookup.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if the widget submits several values.
    pub const fn is_multiple(&self) -> bool {
        matches!(
            self,
            Self::SelectMultiple
                | Self::SelectizeMultiple { .. }
                | Self::DualSelector { .. }
                | Self::DualSortableSelector { .. }
        )
    }

    /// Returns `true` if the widget picks among a field's choices.
    pub const fn is_selector(&self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::SelectMultiple
                | Self::RadioSelect
                | Self::Selectize { .. }
                | Self::SelectizeMultiple { .. }
                | Self::DualSelector { .. }
                | Self::DualSortableSelector { .. }
        )
    }

    /// Returns `true` if the widget uploads files.
    pub const fn is_file_upload(&self) -> bool {
        matches!(self, Self::FileInput | Self::UploadedFileInput)
    }

    /// Filters `choices` with this widget's search lookup.
    ///
    /// # Errors
    ///
    /// Returns [`FormsetError::ImproperlyConfigured`] if the widget is not
    /// searchable or its lookup expression does not parse.
    pub fn search<'a>(
        &self,
        choices: &'a [(String, String)],
        term: &str,
    ) -> FormsetResult<Vec<&'a (String, String)>> {
        let expr = self.search_lookup().ok_or_else(|| {
            FormsetError::ImproperlyConfigured(format!("{self} does not support searching"))
        })?;
        let lookup: SearchLookup = expr.parse()?;
        Ok(lookup.filter(choices, term))
    }

    /// Instantiates the widget for a field with the given choices.
    pub fn build(&self, choices: &[(String, String)]) -> Box<dyn Widget> {
        let choices = choices.to_vec();
        match self {
            Self::TextInput => Box::new(Input::new(self.clone(), "text")),
            Self::EmailInput => Box::new(Input::new(self.clone(), "email")),
            Self::NumberInput => Box::new(Input::new(self.clone(), "number")),
            Self::FileInput => Box::new(Input::new(self.clone(), "file")),
            Self::Textarea => Box::new(Textarea),
            Self::CheckboxInput => Box::new(CheckboxInput),
            Self::Select => Box::new(Select::new(choices, false)),
            Self::SelectMultiple => Box::new(Select::new(choices, true)),
            Self::RadioSelect => Box::new(RadioSelect::new(choices)),
            Self::UploadedFileInput => Box::new(UploadedFileInput::new(&SETTINGS.get().media_url)),
            Self::Selectize {
                search_lookup,
                placeholder,
            } => Box::new(Selectize {
                choices,
                search_lookup: search_lookup.clone(),
                placeholder: placeholder.clone(),
                max_items: None,
            }),
            Self::SelectizeMultiple {
                search_lookup,
                max_items,
            } => Box::new(Selectize {
                choices,
                search_lookup: search_lookup.clone(),
                placeholder: None,
                max_items: Some(max_items.unwrap_or(SETTINGS.get().selectize_max_items)),
            }),
            Self::DualSelector { search_lookup } => Box::new(DualSelector {
                choices,
                search_lookup: search_lookup.clone(),
                sortable: false,
            }),
            Self::DualSortableSelector { search_lookup } => Box::new(DualSelector {
                choices,
                search_lookup: search_lookup.clone(),
                sortable: true,
            }),
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::Textarea => "Textarea",
            Self::EmailInput => "EmailInput",
            Self::NumberInput => "NumberInput",
            Self::CheckboxInput => "CheckboxInput",
            Self::Select => "Select",
            Self::SelectMultiple => "SelectMultiple",
            Self::RadioSelect => "RadioSelect",
            Self::FileInput => "FileInput",
            Self::UploadedFileInput => "UploadedFileInput",
            Self::Selectize { .. } => "Selectize",
            Self::SelectizeMultiple { .. } => "SelectizeMultiple",
            Self::DualSelector { .. } => "DualSelector",
            Self::DualSortableSelector { .. } => "DualSortableSelector",
        };
        write!(f, "{name}")
    }
}

/// A trait for HTML form widgets.
///
/// Widgets are responsible for:
/// - Rendering an HTML element for a given field name and current values
/// - Extracting the raw values from submitted [`FormData`]
/// - Generating the `id` attribute for an associated `<label>` element
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type this widget was built from.
    fn widget_type(&self) -> WidgetType;

    /// Renders the widget as an HTML string.
    fn render(&self, name: &str, values: &[String], attrs: &Attrs) -> String;

    /// Returns `true` if the widget submits several values under one name.
    fn is_multiple(&self) -> bool {
        false
    }

    /// Extracts the raw submitted values for `name`.
    ///
    /// Single-value widgets return at most one value (the last one submitted).
    fn value_from_data(&self, data: &FormData, name: &str) -> Vec<String> {
        if self.is_multiple() {
            data.get_list(name).to_vec()
        } else {
            data.get(name).map(String::from).into_iter().collect()
        }
    }

    /// Returns the HTML `id` attribute value for a label targeting this widget.
    fn id_for_label(&self, id: &str) -> String {
        id.to_string()
    }
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats attributes as ` key="value" key2="value2"` (with a leading space).
pub fn render_attrs(attrs: &Attrs) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!(r#" {k}="{}""#, escape(v)))
        .collect()
}

fn render_options(choices: &[(String, String)], selected: &[String]) -> String {
    choices
        .iter()
        .map(|(value, label)| {
            let sel = if selected.contains(value) { " selected" } else { "" };
            format!(
                r#"<option value="{}"{sel}>{}</option>"#,
                escape(value),
                escape(label)
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Plain HTML widgets
// ---------------------------------------------------------------------------

/// An `<input>` of a given type (text, email, number, file).
#[derive(Debug, Clone)]
pub struct Input {
    kind: WidgetType,
    input_type: &'static str,
}

impl Input {
    fn new(kind: WidgetType, input_type: &'static str) -> Self {
        Self { kind, input_type }
    }
}

impl Widget for Input {
    fn widget_type(&self) -> WidgetType {
        self.kind.clone()
    }

    fn render(&self, name: &str, values: &[String], attrs: &Attrs) -> String {
        let value = if self.input_type == "file" {
            String::new()
        } else {
            let v = values.last().map_or("", String::as_str);
            format!(r#" value="{}""#, escape(v))
        };
        format!(
            r#"<input type="{}" name="{name}"{value}{} />"#,
            self.input_type,
            render_attrs(attrs)
        )
    }
}

/// A `<textarea>` widget.
#[derive(Debug, Clone)]
pub struct Textarea;

impl Widget for Textarea {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Textarea
    }

    fn render(&self, name: &str, values: &[String], attrs: &Attrs) -> String {
        let v = values.last().map_or("", String::as_str);
        format!(
            r#"<textarea name="{name}"{}>{}</textarea>"#,
            render_attrs(attrs),
            escape(v)
        )
    }
}

/// A `<input type="checkbox">` widget.
#[derive(Debug, Clone)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CheckboxInput
    }

    fn render(&self, name: &str, values: &[String], attrs: &Attrs) -> String {
        let checked = values
            .last()
            .is_some_and(|v| matches!(v.as_str(), "true" | "on" | "1"));
        let checked_attr = if checked { " checked" } else { "" };
        format!(
            r#"<input type="checkbox" name="{name}"{checked_attr}{} />"#,
            render_attrs(attrs)
        )
    }
}

/// A `<select>` widget, optionally `multiple`.
#[derive(Debug, Clone)]
pub struct Select {
    /// The available choices as `(value, label)` pairs.
    pub choices: Vec<(String, String)>,
    multiple: bool,
}

impl Select {
    /// Creates a new `Select` widget with the given choices.
    pub fn new(choices: Vec<(String, String)>, multiple: bool) -> Self {
        Self { choices, multiple }
    }
}

impl Widget for Select {
    fn widget_type(&self) -> WidgetType {
        if self.multiple {
            WidgetType::SelectMultiple
        } else {
            WidgetType::Select
        }
    }

    fn is_multiple(&self) -> bool {
        self.multiple
    }

    fn render(&self, name: &str, values: &[String], attrs: &Attrs) -> String {
        let multiple = if self.multiple { " multiple" } else { "" };
        format!(
            r#"<select name="{name}"{multiple}{}>{}</select>"#,
            render_attrs(attrs),
            render_options(&self.choices, values)
        )
    }
}

/// A group of radio buttons, one per choice.
#[derive(Debug, Clone)]
pub struct RadioSelect {
    /// The available choices as `(value, label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl RadioSelect {
    /// Creates a new `RadioSelect` widget with the given choices.
    pub fn new(choices: Vec<(String, String)>) -> Self {
        Self { choices }
    }
}

impl Widget for RadioSelect {
    fn widget_type(&self) -> WidgetType {
        WidgetType::RadioSelect
    }

    fn render(&self, name: &str, values: &[String], attrs: &Attrs) -> String {
        let current = values.last().map_or("", String::as_str);
        let base_id = attrs.get("id").cloned();
        let mut out = String::from(r#"<div role="radiogroup">"#);
        for (i, (value, label)) in self.choices.iter().enumerate() {
            let checked = if value == current { " checked" } else { "" };
            let id = base_id
                .as_ref()
                .map(|id| format!(r#" id="{}""#, escape(&format!("{id}_{i}"))))
                .unwrap_or_default();
            out.push_str(&format!(
                r#"<label><input type="radio" name="{name}" value="{}"{id}{checked} />{}</label>"#,
                escape(value),
                escape(label)
            ));
        }
        out.push_str("</div>");
        out
    }

    fn id_for_label(&self, id: &str) -> String {
        format!("{id}_0")
    }
}

// ---------------------------------------------------------------------------
// formset UI toolkit widgets
// ---------------------------------------------------------------------------

/// A file input handled by the formset upload dropzone.
///
/// The submitted value is the stored file name; an already uploaded file is
/// linked below `media_url`.
#[derive(Debug, Clone)]
pub struct UploadedFileInput {
    media_url: String,
}

impl UploadedFileInput {
    /// Creates the widget linking existing uploads below `media_url`.
    pub fn new(media_url: &str) -> Self {
        Self {
            media_url: media_url.to_string(),
        }
    }
}

impl Widget for UploadedFileInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::UploadedFileInput
    }

    fn render(&self, name: &str, values: &[String], attrs: &Attrs) -> String {
        let current = values
            .last()
            .filter(|v| !v.is_empty())
            .map(|v| {
                format!(
                    r#"<a class="dj-current-file" href="{}{}">{}</a>"#,
                    escape(&self.media_url),
                    escape(v),
                    escape(v)
                )
            })
            .unwrap_or_default();
        format!(
            r#"<input type="file" name="{name}" hidden{} /><django-file-dropzone>{current}</django-file-dropzone>"#,
            render_attrs(attrs)
        )
    }
}

/// A searchable selector, single or multiple.
#[derive(Debug, Clone)]
pub struct Selectize {
    /// The available choices as `(value, label)` pairs.
    pub choices: Vec<(String, String)>,
    /// Lookup expression used by [`Selectize::search`].
    pub search_lookup: Option<String>,
    /// Placeholder text (single-item mode only).
    pub placeholder: Option<String>,
    /// `Some(n)` selects multi-item mode with at most `n` items.
    pub max_items: Option<usize>,
}

impl Selectize {
    /// Returns the options matching `term`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup expression is invalid.
    pub fn search(&self, term: &str) -> FormsetResult<Vec<&(String, String)>> {
        search_choices(self.search_lookup.as_deref(), &self.choices, term)
    }
}

impl Widget for Selectize {
    fn widget_type(&self) -> WidgetType {
        match self.max_items {
            Some(n) => WidgetType::SelectizeMultiple {
                search_lookup: self.search_lookup.clone(),
                max_items: Some(n),
            },
            None => WidgetType::Selectize {
                search_lookup: self.search_lookup.clone(),
                placeholder: self.placeholder.clone(),
            },
        }
    }

    fn is_multiple(&self) -> bool {
        self.max_items.is_some()
    }

    fn render(&self, name: &str, values: &[String], attrs: &Attrs) -> String {
        let mut all = attrs.clone();
        if let Some(lookup) = &self.search_lookup {
            all.insert("search-lookup".to_string(), lookup.clone());
        }
        if let Some(placeholder) = &self.placeholder {
            all.insert("placeholder".to_string(), placeholder.clone());
        }
        let multiple = match self.max_items {
            Some(n) => {
                all.insert("max-items".to_string(), n.to_string());
                " multiple"
            }
            None => "",
        };
        format!(
            r#"<select name="{name}" is="django-selectize"{multiple}{}>{}</select>"#,
            render_attrs(&all),
            render_options(&self.choices, values)
        )
    }
}

/// A two-pane selector; when `sortable`, the selected pane is user-ordered.
#[derive(Debug, Clone)]
pub struct DualSelector {
    /// The available choices as `(value, label)` pairs.
    pub choices: Vec<(String, String)>,
    /// Lookup expression used by [`DualSelector::search`].
    pub search_lookup: Option<String>,
    /// Whether the selected items keep their submitted order.
    pub sortable: bool,
}

impl DualSelector {
    /// Returns the options matching `term`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup expression is invalid.
    pub fn search(&self, term: &str) -> FormsetResult<Vec<&(String, String)>> {
        search_choices(self.search_lookup.as_deref(), &self.choices, term)
    }
}

impl Widget for DualSelector {
    fn widget_type(&self) -> WidgetType {
        if self.sortable {
            WidgetType::DualSortableSelector {
                search_lookup: self.search_lookup.clone(),
            }
        } else {
            WidgetType::DualSelector {
                search_lookup: self.search_lookup.clone(),
            }
        }
    }

    fn is_multiple(&self) -> bool {
        true
    }

    fn render(&self, name: &str, values: &[String], attrs: &Attrs) -> String {
        let mut all = attrs.clone();
        if let Some(lookup) = &self.search_lookup {
            all.insert("search-lookup".to_string(), lookup.clone());
        }
        let (element, options) = if self.sortable {
            // Selected options first, in the order they were submitted.
            let mut ordered: Vec<(String, String)> = Vec::new();
            for v in values {
                if ordered.iter().any(|(ov, _)| ov == v) {
                    continue;
                }
                if let Some(choice) = self.choices.iter().find(|(cv, _)| cv == v) {
                    ordered.push(choice.clone());
                }
            }
            ordered.extend(
                self.choices
                    .iter()
                    .filter(|(cv, _)| !values.contains(cv))
                    .cloned(),
            );
            ("django-dual-sortable-selector", render_options(&ordered, values))
        } else {
            ("django-dual-selector", render_options(&self.choices, values))
        };
        format!(
            r#"<select name="{name}" is="{element}" multiple{}>{options}</select>"#,
            render_attrs(&all)
        )
    }
}

fn search_choices<'a>(
    lookup: Option<&str>,
    choices: &'a [(String, String)],
    term: &str,
) -> FormsetResult<Vec<&'a (String, String)>> {
    match lookup {
        Some(expr) => Ok(expr.parse::<SearchLookup>()?.filter(choices, term)),
        None => Ok(choices.iter().collect()),
    }
}
