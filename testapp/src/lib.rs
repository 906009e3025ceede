//! # testapp
//!
//! Demo application for formset-rs.
//!
//! - **Models**: [`models::PERSON_MODEL`], a person record with one attribute
//!   per formset widget, and the sample opinions its relations point to
//! - **Forms**: [`forms::SimplePersonForm`], [`forms::PersonForm`] and the
//!   model-generated [`forms::ModelPersonForm`]
//! - **CLI**: management commands to validate, render and inspect the forms
//!
//! ## Quick Start
//!
//! ```rust
//! use formset_rs_forms::{FormData, Form};
//! use testapp::forms::PersonForm;
//!
//! let mut form = PersonForm::new();
//! form.bind(FormData::from_pairs([("first_name", "Jane"), ("last_name", "Doe")]));
//! assert!(form.is_valid());
//! ```

#![allow(clippy::doc_markdown)]

pub mod command;
pub mod commands;
pub mod forms;
pub mod models;

use std::path::Path;

use formset_rs_core::settings_loader::{from_env, from_toml_file_with_env};
use formset_rs_core::{FormsetResult, Settings};

/// Loads the application settings.
///
/// With a path the TOML file is read and `FORMSET_*` environment variables
/// are layered on top; without one only the environment applies.
pub fn load_settings(path: Option<&Path>) -> FormsetResult<Settings> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings file");
            from_toml_file_with_env(path)
        }
        None => Ok(from_env()),
    }
}
