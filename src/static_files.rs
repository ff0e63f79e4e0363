//! Static asset serving for paths under [`STATIC_PREFIX`].

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::config::STATIC_PREFIX;
use crate::dispatcher::NOT_FOUND_BODY;
use crate::server::Response;

/// Serves files from a directory. The URL `/static/css/site.css` maps to
/// `<base_dir>/css/site.css`.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    base_dir: PathBuf,
}

impl StaticFiles {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base_dir: base.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Whether `path` belongs to the static boundary
    #[must_use]
    pub fn is_static_path(path: &str) -> bool {
        path.starts_with(STATIC_PREFIX)
    }

    /// Map a path below the prefix to a file below `base_dir`.
    ///
    /// Anything other than plain segments (`..`, roots, drive prefixes) is
    /// refused.
    fn map_path(&self, rel_path: &str) -> Option<PathBuf> {
        let mut pb = self.base_dir.clone();
        for comp in Path::new(rel_path.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }

    fn content_type(path: &Path) -> &'static str {
        match path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "html" | "htm" => "text/html; charset=utf-8",
            "css" => "text/css",
            "js" | "mjs" => "application/javascript",
            "json" => "application/json",
            "txt" => "text/plain; charset=utf-8",
            "svg" => "image/svg+xml",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "ico" => "image/x-icon",
            "webp" => "image/webp",
            "woff" => "font/woff",
            "woff2" => "font/woff2",
            "wasm" => "application/wasm",
            _ => "application/octet-stream",
        }
    }

    /// Read the asset for a URL path (with or without the static prefix)
    ///
    /// # Errors
    ///
    /// `NotFound` for paths that escape the base directory, for directories
    /// and for missing files; other I/O errors as reported by the filesystem.
    pub fn load(&self, url_path: &str) -> io::Result<(Vec<u8>, &'static str)> {
        let rel = url_path.strip_prefix(STATIC_PREFIX).unwrap_or(url_path);
        let path = self
            .map_path(rel)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "invalid path"))?;
        if !path.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        }
        let bytes = fs::read(&path)?;
        Ok((bytes, Self::content_type(&path)))
    }

    /// Answer a static request. Failures become `404 Page not found.`.
    #[must_use]
    pub fn serve(&self, url_path: &str) -> Response {
        match self.load(url_path) {
            Ok((bytes, content_type)) => {
                debug!(path = %url_path, size = bytes.len(), content_type, "Static asset served");
                let mut res = Response::new();
                res.set_body(bytes);
                res.set_header("content-type", content_type);
                res
            }
            Err(err) => {
                if err.kind() == io::ErrorKind::NotFound {
                    debug!(path = %url_path, "Static asset not found");
                } else {
                    warn!(path = %url_path, error = %err, "Static asset unreadable");
                }
                Response::with_text(404, NOT_FOUND_BODY)
            }
        }
    }
}
