use std::collections::BTreeSet;
use std::fmt;

/// The verbs a function route accepts when registered without an explicit set
pub const STANDARD_METHODS: [&str; 8] = [
    "get", "post", "put", "delete", "patch", "options", "head", "trace",
];

/// Set of HTTP verbs a function route accepts.
///
/// Names are stored lower-cased and compared case-insensitively, so `GET`,
/// `get` and `http::Method::GET` are the same member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedMethods(BTreeSet<String>);

impl AllowedMethods {
    /// Build a set from verb names (any case)
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        methods.into_iter().collect()
    }

    /// Whether `verb` is a member (case-insensitive)
    #[must_use]
    pub fn contains(&self, verb: &str) -> bool {
        if verb.bytes().any(|b| b.is_ascii_uppercase()) {
            self.0.contains(&verb.to_ascii_lowercase())
        } else {
            self.0.contains(verb)
        }
    }

    /// Members in lexical order, lower-cased
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The full standard verb set
impl Default for AllowedMethods {
    fn default() -> Self {
        Self::new(STANDARD_METHODS)
    }
}

impl<S: AsRef<str>> FromIterator<S> for AllowedMethods {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|m| m.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }
}

impl fmt::Display for AllowedMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(", "))
    }
}
