//! # formset-rs-forms
//!
//! Forms framework for formset-rs. Provides the [`Form`](form::Form) trait,
//! field types with validation, widgets for HTML rendering (including the
//! searchable and dual selectors of the formset UI toolkit), and model-backed
//! forms generated from model metadata.
//!
//! ## Modules
//!
//! - [`data`] - Submitted form data ([`FormData`](data::FormData))
//! - [`fields`] - Field definitions and per-field cleaning
//! - [`lookup`] - Search lookups used by searchable selector widgets
//! - [`widgets`] - Widget configuration and rendering
//! - [`form`] - The `Form` trait, `BaseForm`, errors and cleaned data
//! - [`validation`] - The field-then-form validation pipeline
//! - [`bound_field`] - Fields paired with submitted data for rendering
//! - [`render`] - Whole-form rendering options
//! - [`model`] - Model metadata consumed by model forms
//! - [`model_form`] - Model-bound forms and widget override checks

pub mod bound_field;
pub mod data;
pub mod fields;
pub mod form;
pub mod lookup;
pub mod model;
pub mod model_form;
pub mod render;
pub mod validation;
pub mod widgets;

pub use data::FormData;
pub use fields::{FormFieldDef, FormFieldType};
pub use form::{cleaned_str, BaseForm, CleanedData, Form, FormErrors, NON_FIELD_ERRORS};
pub use widgets::{Widget, WidgetType};
