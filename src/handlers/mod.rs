//! # Handlers Module
//!
//! The handler model: what a route entry dispatches to.
//!
//! Two variants exist, fixed at registration time:
//!
//! - **Function handlers** ([`FunctionHandler`]) - a callable receiving the
//!   request, the response and the captured path parameters. Which verbs it
//!   accepts is decided by the route's [`AllowedMethods`].
//! - **Resource handlers** ([`ResourceHandler`]) - a constructor plus a verb
//!   table. A fresh resource value is built per matched request; a verb with
//!   no entry in the table yields `405 Method Not Allowed`. Resource methods
//!   do not receive path parameters.

mod core;
mod methods;
mod resource;

pub use self::core::{FunctionHandler, HandlerFn, HandlerResult, HandlerTarget};
pub use methods::{AllowedMethods, STANDARD_METHODS};
pub use resource::{ResourceHandler, ResourceInstance, ResourceMethod, ResourceTarget};
