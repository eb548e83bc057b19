//! Core traits for the dispatch pipeline.

use std::marker::PhantomData;
use std::sync::Arc;

/// The per-action stage of a bound pipeline.
///
/// `None` means the dispatch was short-circuited and produced no result.
pub type Dispatch<A, R> = Arc<dyn Fn(A) -> Option<R> + Send + Sync>;

/// A resolved matcher: decides whether a middleware applies to an action.
pub type Predicate<A> = Arc<dyn Fn(&A) -> bool + Send + Sync>;

/// Actions carry an optional type string used for matching.
pub trait Action {
    /// The action's `type` discriminant, if it has one.
    fn action_type(&self) -> Option<&str>;
}

/// Plain JSON actions (`{"type": "foo", ...}`). Non-string types count as absent.
impl Action for serde_json::Value {
    fn action_type(&self) -> Option<&str> {
        self.get("type").and_then(serde_json::Value::as_str)
    }
}

impl<T: Action + ?Sized> Action for &T {
    fn action_type(&self) -> Option<&str> {
        (**self).action_type()
    }
}

/// A pipeline stage in the `store => next => action => result` shape.
///
/// The host supplies the store reference and the rest of the pipeline once at
/// setup; the returned `Dispatch` is then called once per action.
pub trait Middleware<S, A, R>: Send + Sync {
    fn wrap(&self, store: S, next: Dispatch<A, R>) -> Dispatch<A, R>;
}

// ---------------------------------------------------------------------------
// Arc<M> blanket — lets hosts keep heterogeneous middleware in one list
// ---------------------------------------------------------------------------

impl<S, A, R, M> Middleware<S, A, R> for Arc<M>
where
    M: Middleware<S, A, R> + ?Sized,
{
    fn wrap(&self, store: S, next: Dispatch<A, R>) -> Dispatch<A, R> {
        (**self).wrap(store, next)
    }
}

/// Middleware written by hand as a closure over `(store, next)`.
pub struct FnMiddleware<S, A, R, F> {
    f: F,
    _phantom: PhantomData<fn(S, A) -> R>,
}

/// Adapt a Redux-style `(store, next) -> dispatch` closure into a [`Middleware`].
pub fn middleware_fn<S, A, R, F>(f: F) -> FnMiddleware<S, A, R, F>
where
    F: Fn(S, Dispatch<A, R>) -> Dispatch<A, R> + Send + Sync,
{
    FnMiddleware {
        f,
        _phantom: PhantomData,
    }
}

impl<S, A, R, F> Middleware<S, A, R> for FnMiddleware<S, A, R, F>
where
    F: Fn(S, Dispatch<A, R>) -> Dispatch<A, R> + Send + Sync,
{
    fn wrap(&self, store: S, next: Dispatch<A, R>) -> Dispatch<A, R> {
        (self.f)(store, next)
    }
}
