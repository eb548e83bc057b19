//! In-memory store host for exercising middleware in tests.
//!
//! Mirrors the Redux `createStore(reducer, applyMiddleware(...))` contract:
//! the first registered middleware is outermost, and the terminal dispatch
//! runs the reducer and returns the action it was given.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::traits::{Dispatch, Middleware};

/// Compose middleware around a terminal dispatch, first entry outermost.
pub fn apply_middleware<S, A, R>(
    store: &S,
    middleware: &[Arc<dyn Middleware<S, A, R>>],
    terminal: Dispatch<A, R>,
) -> Dispatch<A, R>
where
    S: Clone,
{
    middleware
        .iter()
        .rev()
        .fold(terminal, |next, layer| layer.wrap(store.clone(), next))
}

/// The store reference handed to middleware: shared access to reducer state.
pub struct StoreHandle<St> {
    state: Arc<Mutex<St>>,
}

impl<St> StoreHandle<St> {
    pub fn new(initial: St) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, St> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<St: Clone> StoreHandle<St> {
    /// Snapshot of the current state.
    pub fn state(&self) -> St {
        self.lock().clone()
    }
}

impl<St> Clone for StoreHandle<St> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

type Reducer<St, A> = Arc<dyn Fn(&St, &A) -> St + Send + Sync>;

/// A store with a reducer and a middleware chain. `dispatch` returns the
/// action that reached the reducer, or `None` if the chain dropped it.
pub struct TestStore<St, A> {
    handle: StoreHandle<St>,
    dispatch: Dispatch<A, A>,
}

impl<St, A> TestStore<St, A>
where
    St: Send + 'static,
    A: 'static,
{
    pub fn builder<F>(initial: St, reducer: F) -> TestStoreBuilder<St, A>
    where
        F: Fn(&St, &A) -> St + Send + Sync + 'static,
    {
        TestStoreBuilder {
            initial,
            reducer: Arc::new(reducer),
            middleware: Vec::new(),
        }
    }

    pub fn dispatch(&self, action: A) -> Option<A> {
        (self.dispatch)(action)
    }

    pub fn handle(&self) -> StoreHandle<St> {
        self.handle.clone()
    }
}

impl<St: Clone, A> TestStore<St, A> {
    pub fn state(&self) -> St {
        self.handle.state()
    }
}

pub struct TestStoreBuilder<St, A> {
    initial: St,
    reducer: Reducer<St, A>,
    middleware: Vec<Arc<dyn Middleware<StoreHandle<St>, A, A>>>,
}

impl<St, A> TestStoreBuilder<St, A>
where
    St: Send + 'static,
    A: 'static,
{
    /// Register the next middleware. Earlier registrations wrap later ones.
    pub fn with<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<StoreHandle<St>, A, A> + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Register an already shared middleware.
    pub fn with_shared(mut self, middleware: Arc<dyn Middleware<StoreHandle<St>, A, A>>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn build(self) -> TestStore<St, A> {
        let handle = StoreHandle::new(self.initial);
        let state = handle.clone();
        let reducer = self.reducer;
        let terminal: Dispatch<A, A> = Arc::new(move |action: A| {
            let mut current = state.lock();
            let next = reducer(&*current, &action);
            *current = next;
            debug!("reducer applied action");
            Some(action)
        });

        let layers = self.middleware.len();
        let dispatch = apply_middleware(&handle, &self.middleware, terminal);
        debug!(layers, "test store built");

        TestStore { handle, dispatch }
    }
}
