//! Settings for formset-rs applications.
//!
//! [`Settings`] holds the handful of values the forms layer and demo app read
//! at runtime; [`SETTINGS`] is a globally-accessible, configure-once instance.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The complete set of application settings.
///
/// # Examples
///
/// ```
/// use formset_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.selectize_max_items, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled. Selects pretty log output.
    pub debug: bool,
    /// The log filter directive (e.g. "info", "formset_rs_forms=debug").
    pub log_level: String,
    /// URL prefix for uploaded media, used when rendering file widgets.
    pub media_url: String,
    /// Default `max_items` for multi-item selectize widgets that do not set one.
    pub selectize_max_items: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            media_url: "/media/".to_string(),
            selectize_max_items: 5,
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup, before the first
/// [`get`](LazySettings::get); a `get` on an unconfigured instance pins the defaults.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Returns `false` if they were already set.
    pub fn configure(&self, settings: Settings) -> bool {
        self.inner.set(settings).is_ok()
    }

    /// Returns the configured settings, falling back to defaults.
    pub fn get(&self) -> &Settings {
        self.inner.get_or_init(Settings::default)
    }

    /// Returns `true` if [`configure`](LazySettings::configure) has taken effect.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
