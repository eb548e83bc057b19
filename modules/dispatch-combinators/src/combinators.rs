//! `before` / `after` / `around`: middleware built from a single handler.
//!
//! Each combinator has an unconditional form and a `*_matching` form that only
//! runs for actions accepted by a [`Matcher`]; everything else passes straight
//! through to `next`.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::matcher::{matching, Matched, Matcher};
use crate::traits::{Action, Dispatch, Middleware};

// ---------------------------------------------------------------------------
// before
// ---------------------------------------------------------------------------

/// Runs its handler before the rest of the pipeline.
pub struct Before<S, A, H> {
    handler: Arc<H>,
    _phantom: PhantomData<fn(&S, A)>,
}

/// Handler sees `(store, action)` and returns the action to forward.
///
/// Returning `None` drops the action: `next` is never called and the dispatch
/// yields `None`, so no downstream middleware or reducer runs.
pub fn before<S, A, H>(handler: H) -> Before<S, A, H>
where
    H: Fn(&S, A) -> Option<A> + Send + Sync + 'static,
{
    Before {
        handler: Arc::new(handler),
        _phantom: PhantomData,
    }
}

impl<S, A, R, H> Middleware<S, A, R> for Before<S, A, H>
where
    S: Send + Sync + 'static,
    A: 'static,
    R: 'static,
    H: Fn(&S, A) -> Option<A> + Send + Sync + 'static,
{
    fn wrap(&self, store: S, next: Dispatch<A, R>) -> Dispatch<A, R> {
        let handler = Arc::clone(&self.handler);
        Arc::new(move |action: A| match handler(&store, action) {
            Some(action) => next(action),
            None => {
                debug!("before handler dropped action");
                None
            }
        })
    }
}

// ---------------------------------------------------------------------------
// after
// ---------------------------------------------------------------------------

/// Runs its handler on the result of the rest of the pipeline.
pub struct After<S, R, H> {
    handler: Arc<H>,
    _phantom: PhantomData<fn(&S, Option<R>)>,
}

/// Handler sees `(store, result_of_next)` and returns the final result.
///
/// `next` always runs first; there is no short-circuit.
pub fn after<S, R, H>(handler: H) -> After<S, R, H>
where
    H: Fn(&S, Option<R>) -> Option<R> + Send + Sync + 'static,
{
    After {
        handler: Arc::new(handler),
        _phantom: PhantomData,
    }
}

impl<S, A, R, H> Middleware<S, A, R> for After<S, R, H>
where
    S: Send + Sync + 'static,
    A: 'static,
    R: 'static,
    H: Fn(&S, Option<R>) -> Option<R> + Send + Sync + 'static,
{
    fn wrap(&self, store: S, next: Dispatch<A, R>) -> Dispatch<A, R> {
        let handler = Arc::clone(&self.handler);
        Arc::new(move |action: A| {
            let result = next(action);
            handler(&store, result)
        })
    }
}

// ---------------------------------------------------------------------------
// around
// ---------------------------------------------------------------------------

/// Hands the handler `(store, next, action)` and returns whatever it returns.
pub struct Around<S, A, R, H> {
    handler: Arc<H>,
    _phantom: PhantomData<fn(&S, A) -> R>,
}

/// Full control: the handler may call `next` zero, one or many times, and may
/// rewrite the action before forwarding it.
pub fn around<S, A, R, H>(handler: H) -> Around<S, A, R, H>
where
    H: Fn(&S, &Dispatch<A, R>, A) -> Option<R> + Send + Sync + 'static,
{
    Around {
        handler: Arc::new(handler),
        _phantom: PhantomData,
    }
}

impl<S, A, R, H> Middleware<S, A, R> for Around<S, A, R, H>
where
    S: Send + Sync + 'static,
    A: 'static,
    R: 'static,
    H: Fn(&S, &Dispatch<A, R>, A) -> Option<R> + Send + Sync + 'static,
{
    fn wrap(&self, store: S, next: Dispatch<A, R>) -> Dispatch<A, R> {
        let handler = Arc::clone(&self.handler);
        Arc::new(move |action: A| handler(&store, &next, action))
    }
}

// ---------------------------------------------------------------------------
// Guarded forms
// ---------------------------------------------------------------------------

/// Build the guarded form of any combinator: `combinator(handler)` gated by `matcher`.
pub fn with_matching<A, H, M>(
    combinator: impl FnOnce(H) -> M,
    matcher: impl Into<Matcher<A>>,
    handler: H,
) -> Matched<A, M>
where
    A: Action + 'static,
{
    matching(matcher, combinator(handler))
}

/// [`before`], only for actions accepted by `matcher`.
pub fn before_matching<S, A, H>(
    matcher: impl Into<Matcher<A>>,
    handler: H,
) -> Matched<A, Before<S, A, H>>
where
    A: Action + 'static,
    H: Fn(&S, A) -> Option<A> + Send + Sync + 'static,
{
    with_matching(before::<S, A, H>, matcher, handler)
}

/// [`after`], only for actions accepted by `matcher`.
pub fn after_matching<S, A, R, H>(
    matcher: impl Into<Matcher<A>>,
    handler: H,
) -> Matched<A, After<S, R, H>>
where
    A: Action + 'static,
    H: Fn(&S, Option<R>) -> Option<R> + Send + Sync + 'static,
{
    with_matching(after::<S, R, H>, matcher, handler)
}

/// [`around`], only for actions accepted by `matcher`.
pub fn around_matching<S, A, R, H>(
    matcher: impl Into<Matcher<A>>,
    handler: H,
) -> Matched<A, Around<S, A, R, H>>
where
    A: Action + 'static,
    H: Fn(&S, &Dispatch<A, R>, A) -> Option<R> + Send + Sync + 'static,
{
    with_matching(around::<S, A, R, H>, matcher, handler)
}
