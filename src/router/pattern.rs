//! Route pattern compilation and matching.
//!
//! A pattern such as `/greet/{name}` is compiled once, at registration, into an
//! anchored regex (`^/greet/([^/]+?)$`) plus the ordered list of placeholder
//! names. Matching a concrete path either fails or yields the captured values
//! keyed by placeholder name.

use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

use super::error::RouteError;

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 placeholders (e.g., /users/{id}/posts/{post_id}).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage.
///
/// Param names use `Arc<str>` because they come from the compiled pattern and
/// are shared by every match; values are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Values captured from a request path, in placeholder order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(ParamVec);

impl PathParams {
    /// Build from `(name, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Arc<str>>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Get a captured value by placeholder name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate `(name, value)` pairs in placeholder order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a `HashMap`
    /// Note: This allocates - use `get()` where a single value is needed
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// A compiled route pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    names: Vec<Arc<str>>,
}

impl PathPattern {
    /// Compile a pattern containing literal text and `{name}` placeholders
    ///
    /// Literal text is matched exactly (regex metacharacters are escaped). Each
    /// placeholder captures one or more characters other than `/`, so a
    /// placeholder never spans segments and the segment count of pattern and
    /// path must agree. Placeholders may share a segment with literal text
    /// (`/files/{stem}.txt`); captures are lazy, so `/{a}-{b}` splits
    /// `/x-y-z` as `a = "x"`, `b = "y-z"`.
    ///
    /// # Errors
    ///
    /// * `RouteError::DuplicatePlaceholder` - a name is used twice
    /// * `RouteError::InvalidPattern` - unbalanced braces or a name that is not
    ///   an identifier (`[A-Za-z_][A-Za-z0-9_]*`)
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut regex_src = String::with_capacity(pattern.len() + 16);
        regex_src.push('^');
        let mut names: Vec<Arc<str>> = Vec::with_capacity(pattern.matches('{').count());

        let mut rest = pattern;
        while let Some(open) = rest.find('{') {
            let (literal, tail) = rest.split_at(open);
            if literal.contains('}') {
                return Err(invalid("unmatched '}'"));
            }
            regex_src.push_str(&regex::escape(literal));

            let close = tail
                .find('}')
                .ok_or_else(|| invalid("unterminated placeholder"))?;
            let name = &tail[1..close];
            if !is_identifier(name) {
                return Err(invalid(&format!(
                    "placeholder name '{name}' is not an identifier"
                )));
            }
            if names.iter().any(|n| n.as_ref() == name) {
                return Err(RouteError::DuplicatePlaceholder {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }

            regex_src.push_str("([^/]+?)");
            names.push(Arc::from(name));
            rest = &tail[close + 1..];
        }
        if rest.contains('}') {
            return Err(invalid("unmatched '}'"));
        }
        regex_src.push_str(&regex::escape(rest));
        regex_src.push('$');

        let regex = Regex::new(&regex_src).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            names,
        })
    }

    /// Match a concrete request path
    ///
    /// Returns `None` when literal text or the number of segments differ.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        let params = self
            .names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                caps.get(i + 1)
                    .map(|m| (Arc::clone(name), m.as_str().to_string()))
            })
            .collect();
        Some(PathParams(params))
    }

    /// The pattern string as registered
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in pattern order
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(AsRef::as_ref)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
