use std::fmt;

/// Route registration error
///
/// Returned by `Router::add_route()` (and the `App` registration helpers) when a
/// pattern cannot be added to the route table. Registration errors are meant to
/// abort application setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// A route with exactly the same pattern string is already registered
    ///
    /// Uniqueness is plain string equality: `/a/{x}` and `/a/{y}` are different
    /// patterns even though they match the same paths.
    DuplicateRoute {
        /// The pattern that was registered twice
        pattern: String,
    },
    /// The same placeholder name appears more than once in one pattern
    DuplicatePlaceholder {
        /// The offending pattern
        pattern: String,
        /// The repeated placeholder name
        name: String,
    },
    /// The pattern is malformed (unbalanced braces, empty or non-identifier names)
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Human readable reason
        reason: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::DuplicateRoute { pattern } => {
                write!(f, "Route error: pattern '{pattern}' is already registered")
            }
            RouteError::DuplicatePlaceholder { pattern, name } => {
                write!(
                    f,
                    "Route error: placeholder '{{{name}}}' appears more than once in '{pattern}'"
                )
            }
            RouteError::InvalidPattern { pattern, reason } => {
                write!(f, "Route error: invalid pattern '{pattern}': {reason}")
            }
        }
    }
}

impl std::error::Error for RouteError {}
