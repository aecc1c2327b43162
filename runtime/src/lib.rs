//! # Marquee Runtime
//!
//! Runtime implementation for the Marquee reducer architecture.
//!
//! This crate provides the [`Store`] that owns state, runs the reducer and
//! executes the effects it returns.
//!
//! ## Core Components
//!
//! - **Store**: Owns state behind a mutex and serialises every reduction
//! - **Effect Executor**: Executes effect descriptions and queues the actions they produce
//! - **Feedback Loop**: action → reducer → effects → action, until the queue drains
//!
//! ## Example
//!
//! ```ignore
//! use marquee_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field)?;
//! ```

use marquee_core::{effect::Effect, reducer::Reducer};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Counter names recorded by the store and its reducers
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A reducer panicked while holding the state lock
        ///
        /// The state may be half-updated, so the store refuses further work.
        #[error("Store state is poisoned by an earlier panic")]
        Poisoned,
    }
}

pub use error::StoreError;

/// The Store - owns state and coordinates reducer execution
///
/// Every action is reduced while holding the state mutex, so a reducer's
/// validate-then-mutate sequence is never interleaved with another caller's.
/// Effects run after the lock is released; actions they produce are queued and
/// reduced in FIFO order before [`Store::send`] returns.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Mutex<S>,
    reducer: R,
    environment: E,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub const fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: Mutex::new(initial_state),
            reducer,
            environment,
        }
    }

    /// Send an action to the store
    ///
    /// Reduces the action, executes the returned effects and keeps reducing
    /// the actions those effects produce until none are left.
    ///
    /// Returns the number of actions reduced, the initial one included.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if a previous reduction panicked.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub fn send(&self, action: A) -> Result<usize, StoreError> {
        let mut queue = VecDeque::from([action]);
        let mut processed = 0;

        while let Some(action) = queue.pop_front() {
            let effects = {
                let mut state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
                self.reducer.reduce(&mut state, action, &self.environment)
            };
            processed += 1;
            metrics::counter!(metrics::STORE_ACTIONS_PROCESSED).increment(1);

            for effect in effects {
                Self::execute(effect, &mut queue);
            }
        }

        tracing::trace!(processed, "Store drained action queue");
        Ok(processed)
    }

    /// Read a value out of the current state
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if a previous reduction panicked.
    pub fn state<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&state))
    }

    /// Consume the store and hand back its state
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Poisoned`] if a previous reduction panicked.
    pub fn into_state(self) -> Result<S, StoreError> {
        self.state.into_inner().map_err(|_| StoreError::Poisoned)
    }

    fn execute(effect: Effect<A>, queue: &mut VecDeque<A>) {
        match effect {
            Effect::None => {},
            // Single-threaded: both groupings run in declaration order
            Effect::Parallel(effects) | Effect::Sequential(effects) => {
                for effect in effects {
                    Self::execute(effect, queue);
                }
            },
            Effect::Run(work) => {
                metrics::counter!(metrics::STORE_EFFECTS_EXECUTED).increment(1);
                if let Some(action) = work() {
                    queue.push_back(action);
                }
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use marquee_core::{smallvec, SmallVec};

    #[derive(Clone, Debug, Default)]
    struct TallyState {
        total: u32,
        log: Vec<&'static str>,
    }

    #[derive(Clone, Debug)]
    enum TallyAction {
        Add(u32),
        AddThenEcho(u32),
        Echoed,
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TallyState,
            action: TallyAction,
            _env: &(),
        ) -> SmallVec<[Effect<TallyAction>; 4]> {
            match action {
                TallyAction::Add(n) => {
                    state.total += n;
                    state.log.push("add");
                    SmallVec::new()
                }
                TallyAction::AddThenEcho(n) => {
                    state.total += n;
                    state.log.push("add");
                    smallvec![Effect::chain(vec![
                        Effect::None,
                        Effect::run(|| Some(TallyAction::Echoed)),
                        Effect::run(|| None),
                    ])]
                }
                TallyAction::Echoed => {
                    state.log.push("echo");
                    SmallVec::new()
                }
            }
        }
    }

    #[test]
    fn send_reduces_single_action() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        let processed = store.send(TallyAction::Add(4)).unwrap();

        assert_eq!(processed, 1);
        assert_eq!(store.state(|s| s.total).unwrap(), 4);
    }

    #[test]
    fn effect_feedback_is_reduced_before_send_returns() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        let processed = store.send(TallyAction::AddThenEcho(2)).unwrap();

        assert_eq!(processed, 2);
        let state = store.into_state().unwrap();
        assert_eq!(state.total, 2);
        assert_eq!(state.log, vec!["add", "echo"]);
    }
}
