//! # Application Configuration
//!
//! Directory locations for the template and static asset collaborators,
//! loaded from the environment with working-directory defaults.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `MARHABA_TEMPLATES_DIR` | `templates` | root of the template loader |
//! | `MARHABA_STATIC_DIR` | `static` | root of served assets |
//!
//! ```rust
//! use marhaba::config::AppConfig;
//!
//! let config = AppConfig::default().with_templates_dir("tests/templates");
//! assert_eq!(config.templates_dir.to_str(), Some("tests/templates"));
//! ```
//!
//! The URL prefix for static assets is fixed ([`STATIC_PREFIX`]) and not
//! configurable.

use std::env;
use std::path::PathBuf;

use tracing::debug;

/// Requests whose path starts with this prefix are served as static assets
pub const STATIC_PREFIX: &str = "/static";

pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Where the application finds templates and static assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from(DEFAULT_TEMPLATES_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or empty variables fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            templates_dir: dir_from_env("MARHABA_TEMPLATES_DIR").unwrap_or(defaults.templates_dir),
            static_dir: dir_from_env("MARHABA_STATIC_DIR").unwrap_or(defaults.static_dir),
        };
        debug!(
            templates_dir = %config.templates_dir.display(),
            static_dir = %config.static_dir.display(),
            "Application config loaded"
        );
        config
    }

    #[must_use]
    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }
}

fn dir_from_env(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_builders() {
        let config = AppConfig::default()
            .with_templates_dir("/srv/tpl")
            .with_static_dir("/srv/assets");
        assert_eq!(config.templates_dir, PathBuf::from("/srv/tpl"));
        assert_eq!(config.static_dir, PathBuf::from("/srv/assets"));
    }

    #[test]
    fn test_dir_from_env_unset() {
        assert_eq!(dir_from_env("MARHABA_TEST_SURELY_UNSET_VARIABLE"), None);
    }
}
