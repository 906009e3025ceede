//! # formset-rs-core
//!
//! Core types, settings, and error types shared by the formset-rs crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`value`] - The cleaned value representation produced by form fields
//! - [`settings`] - Application settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML and the environment
//! - [`checks`] - Diagnostic messages produced by configuration checks
//! - [`logging`] - Tracing-based logging integration

pub mod checks;
pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod value;

pub use error::{FormsetError, FormsetResult, ValidationError};
pub use settings::{Settings, SETTINGS};
pub use value::Value;
