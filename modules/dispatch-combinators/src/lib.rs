//! Middleware combinators for Redux-style dispatch pipelines.
//!
//! Turns a small handler into a `store => next => action => result` middleware
//! that runs before, after, or around the rest of the pipeline, optionally
//! gated by a matcher over the action's type.
//!
//! ```ignore
//! let logger = before_matching(["user:login", "user:logout"], |store: &Store, action| {
//!     tracing::info!(?action, "auth action");
//!     Some(action)
//! });
//! ```

pub mod combinators;
pub mod error;
pub mod matcher;
pub mod testing;
pub mod traits;

pub use combinators::{
    after, after_matching, around, around_matching, before, before_matching, with_matching, After,
    Around, Before,
};
pub use error::MatcherError;
pub use matcher::{matching, not, Matched, Matcher, MatcherSpec};
pub use traits::{middleware_fn, Action, Dispatch, FnMiddleware, Middleware, Predicate};
