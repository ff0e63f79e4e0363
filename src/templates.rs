//! Template rendering backed by `minijinja`, loading sources from a directory.
//!
//! ```rust
//! use marhaba::templates::Templates;
//! use serde_json::json;
//!
//! let templates = Templates::new("tests/templates");
//! let html = templates
//!     .render("test_home_page.html", json!({"title": "Hi", "body": "there"}))
//!     .unwrap();
//! assert!(html.contains("<title>Hi</title>"));
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use minijinja::{path_loader, Environment};
use serde::Serialize;
use tracing::debug;

/// Renders named templates found below a root directory.
///
/// Sources are loaded lazily on first use and cached by the environment.
/// HTML templates are auto-escaped.
pub struct Templates {
    root: PathBuf,
    env: Environment<'static>,
}

impl Templates {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        let mut env = Environment::new();
        env.set_loader(path_loader(&root));
        Self { root, env }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Render template `name` (relative to the root) with `context`
    ///
    /// # Errors
    ///
    /// Fails when the template is missing, does not parse or fails to render.
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> anyhow::Result<String> {
        let template = self.env.get_template(name).with_context(|| {
            format!("failed to load template '{}' from {}", name, self.root.display())
        })?;
        let rendered = template
            .render(context)
            .with_context(|| format!("failed to render template '{name}'"))?;
        debug!(template = %name, size = rendered.len(), "Template rendered");
        Ok(rendered)
    }
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
