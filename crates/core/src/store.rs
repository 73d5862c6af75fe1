//! Snapshot-swapping state container.
//!
//! A [`Store`] owns the current state behind an `Arc` and only ever replaces
//! it wholesale. Every mutation goes through [`Store::dispatch`], which asks
//! the state's [`Reducer`] for a successor and swaps it in. Readers holding an
//! earlier [`Store::snapshot`] keep seeing the state they took; nobody can
//! observe a half-applied action.
//!
//! ```text
//!   dispatch(action)
//!        │
//!        ▼
//!   reduce(&current, action) ──► Err(rejection) ──► state untouched
//!        │
//!        ├──► Ok(None)        ──► no-op (e.g. unknown id)
//!        │
//!        └──► Ok(Some(next))  ──► current = Arc::new(next); revision += 1
//! ```

use std::sync::Arc;

/// A pure state transition function over a closed set of actions.
pub trait Reducer: Sized {
    /// The operations this state accepts.
    type Action;
    /// Why an action was refused. Use [`std::convert::Infallible`] when
    /// every action is accepted.
    type Rejection;

    /// Compute the state that follows `action`.
    ///
    /// Returns `Ok(None)` when the action is accepted but changes nothing.
    ///
    /// # Errors
    ///
    /// Returns the rejection when the action is refused; the caller must keep
    /// the current state.
    fn reduce(&self, action: Self::Action) -> Result<Option<Self>, Self::Rejection>;
}

/// Owner of one reducer-driven state value.
#[derive(Debug)]
pub struct Store<S> {
    state: Arc<S>,
    revision: u64,
}

impl<S: Reducer> Store<S> {
    /// Wrap an existing state (e.g. one restored from a session).
    #[must_use]
    pub fn new(state: S) -> Self {
        Self {
            state: Arc::new(state),
            revision: 0,
        }
    }

    /// Apply an action.
    ///
    /// Returns `Ok(true)` if the state changed and `Ok(false)` for an accepted
    /// no-op.
    ///
    /// # Errors
    ///
    /// Propagates the reducer's rejection; the state is left as it was.
    pub fn dispatch(&mut self, action: S::Action) -> Result<bool, S::Rejection> {
        match self.state.reduce(action)? {
            Some(next) => {
                self.state = Arc::new(next);
                self.revision += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Borrow the current state.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// A cheap handle to the current state that outlives later dispatches.
    #[must_use]
    pub fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.state)
    }

    /// Number of state-changing dispatches applied so far.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

impl<S: Reducer + Clone> Store<S> {
    /// Take the current state out of the store.
    #[must_use]
    pub fn into_state(self) -> S {
        Arc::unwrap_or_clone(self.state)
    }
}

impl<S: Reducer + Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    struct Counter(u8);

    enum Step {
        Up,
        Down,
        Stay,
    }

    impl Reducer for Counter {
        type Action = Step;
        type Rejection = &'static str;

        fn reduce(&self, action: Step) -> Result<Option<Self>, Self::Rejection> {
            match action {
                Step::Up => Ok(Some(Self(self.0 + 1))),
                Step::Down => self.0.checked_sub(1).map(|n| Some(Self(n))).ok_or("floor"),
                Step::Stay => Ok(None),
            }
        }
    }

    #[test]
    fn test_dispatch_swaps_state_and_counts_revisions() {
        let mut store = Store::<Counter>::default();
        assert!(store.dispatch(Step::Up).unwrap());
        assert!(store.dispatch(Step::Up).unwrap());
        assert_eq!(store.state(), &Counter(2));
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_noop_keeps_revision() {
        let mut store = Store::new(Counter(5));
        assert!(!store.dispatch(Step::Stay).unwrap());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let mut store = Store::<Counter>::default();
        assert_eq!(store.dispatch(Step::Down), Err("floor"));
        assert_eq!(store.state(), &Counter(0));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_snapshot_is_stable_across_dispatch() {
        let mut store = Store::<Counter>::default();
        let before = store.snapshot();
        store.dispatch(Step::Up).unwrap();
        assert_eq!(*before, Counter(0));
        assert_eq!(store.into_state(), Counter(1));
    }
}
