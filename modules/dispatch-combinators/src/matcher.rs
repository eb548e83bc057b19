//! Action matchers and conditional gating.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::MatcherError;
use crate::traits::{Action, Dispatch, Middleware, Predicate};

/// Which actions a guarded middleware applies to.
pub enum Matcher<A> {
    /// Actions whose type equals this string.
    ByType(String),
    /// Actions whose type is any of these strings.
    ByTypes(Vec<String>),
    /// Arbitrary predicate over the raw action.
    ByPredicate(Predicate<A>),
}

impl<A> Matcher<A> {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&A) -> bool + Send + Sync + 'static,
    {
        Matcher::ByPredicate(Arc::new(f))
    }
}

impl<A: Action + 'static> Matcher<A> {
    /// Resolve this matcher into a single predicate. Called once at setup.
    pub fn into_predicate(self) -> Predicate<A> {
        match self {
            Matcher::ByType(ty) => {
                Arc::new(move |action: &A| typed(action) == Some(ty.as_str()))
            }
            Matcher::ByTypes(types) => Arc::new(move |action: &A| {
                typed(action).is_some_and(|t| types.iter().any(|candidate| candidate == t))
            }),
            Matcher::ByPredicate(f) => f,
        }
    }

    /// One-off check without keeping the resolved predicate around.
    pub fn matches(&self, action: &A) -> bool {
        match self {
            Matcher::ByType(ty) => typed(action) == Some(ty.as_str()),
            Matcher::ByTypes(types) => {
                typed(action).is_some_and(|t| types.iter().any(|candidate| candidate == t))
            }
            Matcher::ByPredicate(f) => f(action),
        }
    }
}

/// An empty type string is as good as no type: it never matches.
fn typed<A: Action>(action: &A) -> Option<&str> {
    action.action_type().filter(|t| !t.is_empty())
}

impl<A> Clone for Matcher<A> {
    fn clone(&self) -> Self {
        match self {
            Matcher::ByType(ty) => Matcher::ByType(ty.clone()),
            Matcher::ByTypes(types) => Matcher::ByTypes(types.clone()),
            Matcher::ByPredicate(f) => Matcher::ByPredicate(Arc::clone(f)),
        }
    }
}

impl<A> fmt::Debug for Matcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::ByType(ty) => f.debug_tuple("ByType").field(ty).finish(),
            Matcher::ByTypes(types) => f.debug_tuple("ByTypes").field(types).finish(),
            Matcher::ByPredicate(_) => f.write_str("ByPredicate(..)"),
        }
    }
}

impl<A> From<&str> for Matcher<A> {
    fn from(ty: &str) -> Self {
        Matcher::ByType(ty.to_string())
    }
}

impl<A> From<String> for Matcher<A> {
    fn from(ty: String) -> Self {
        Matcher::ByType(ty)
    }
}

impl<A> From<Vec<String>> for Matcher<A> {
    fn from(types: Vec<String>) -> Self {
        Matcher::ByTypes(types)
    }
}

impl<A> From<Vec<&str>> for Matcher<A> {
    fn from(types: Vec<&str>) -> Self {
        Matcher::ByTypes(types.into_iter().map(str::to_string).collect())
    }
}

impl<A> From<&[&str]> for Matcher<A> {
    fn from(types: &[&str]) -> Self {
        Matcher::ByTypes(types.iter().map(|t| t.to_string()).collect())
    }
}

impl<A, const N: usize> From<[&str; N]> for Matcher<A> {
    fn from(types: [&str; N]) -> Self {
        Matcher::ByTypes(types.iter().map(|t| t.to_string()).collect())
    }
}

// ---------------------------------------------------------------------------
// Configuration form
// ---------------------------------------------------------------------------

/// Serializable matcher, as written in a config file: `"foo"` or `["foo", "bar"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatcherSpec {
    Type(String),
    Types(Vec<String>),
}

impl<A> From<MatcherSpec> for Matcher<A> {
    fn from(spec: MatcherSpec) -> Self {
        match spec {
            MatcherSpec::Type(ty) => Matcher::ByType(ty),
            MatcherSpec::Types(types) => Matcher::ByTypes(types),
        }
    }
}

impl<A> TryFrom<serde_json::Value> for Matcher<A> {
    type Error = MatcherError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let shown = value.to_string();
        let spec: MatcherSpec =
            serde_json::from_value(value).map_err(|_| MatcherError::InvalidSpec(shown))?;
        Ok(spec.into())
    }
}

impl MatcherSpec {
    pub fn from_json(raw: &str) -> Result<Self, MatcherError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let shown = value.to_string();
        serde_json::from_value(value).map_err(|_| MatcherError::InvalidSpec(shown))
    }
}

// ---------------------------------------------------------------------------
// not / matching
// ---------------------------------------------------------------------------

/// Invert a matcher.
pub fn not<A, M>(matcher: M) -> Matcher<A>
where
    A: Action + 'static,
    M: Into<Matcher<A>>,
{
    let matcher: Matcher<A> = matcher.into();
    let matches = matcher.into_predicate();
    Matcher::ByPredicate(Arc::new(move |action: &A| !matches(action)))
}

/// Middleware gated by a matcher. Non-matching actions go straight to `next`.
pub struct Matched<A, M> {
    matches: Predicate<A>,
    inner: M,
}

/// Run `middleware` only for actions accepted by `matcher`.
///
/// The matcher is resolved here, once, not per action.
pub fn matching<A, M>(matcher: impl Into<Matcher<A>>, middleware: M) -> Matched<A, M>
where
    A: Action + 'static,
{
    let matcher: Matcher<A> = matcher.into();
    Matched {
        matches: matcher.into_predicate(),
        inner: middleware,
    }
}

impl<S, A, R, M> Middleware<S, A, R> for Matched<A, M>
where
    S: 'static,
    A: Action + 'static,
    R: 'static,
    M: Middleware<S, A, R>,
{
    fn wrap(&self, store: S, next: Dispatch<A, R>) -> Dispatch<A, R> {
        let bound = self.inner.wrap(store, Arc::clone(&next));
        let matches = Arc::clone(&self.matches);
        Arc::new(move |action: A| {
            if matches(&action) {
                bound(action)
            } else {
                trace!(action_type = ?action.action_type(), "matcher bypassed middleware");
                next(action)
            }
        })
    }
}
