//! # Seatmap Runtime
//!
//! Store runtime for the seatmap booking engine.
//!
//! The [`Store`] owns a reducer's state, runs the reducer for every action it
//! receives and executes the effects the reducer returns. Actions produced
//! by effects are fed back into the reducer and broadcast to observers, which
//! is how callers receive replies to their commands.
//!
//! ## Example
//!
//! ```ignore
//! use seatmap_runtime::Store;
//!
//! let store = Store::new(BookingState::new(), BookingReducer::new(), env);
//!
//! let reply = store
//!     .send_and_wait_for(command, |a| a.is_reply_to(request_id), timeout)
//!     .await?;
//!
//! let screens = store.state(|s| s.registry.len()).await;
//! ```

use seatmap_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Default capacity of the action broadcast channel
pub const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// The Store and its effect executor
pub mod store {
    use super::{Arc, Effect, Reducer, RwLock, StoreError, DEFAULT_BROADCAST_CAPACITY};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` so concurrent callers serialise at the reducer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a store is cheap; clones share state and the broadcast channel.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        /// Every action produced by an effect is broadcast here before it is
        /// fed back into the reducer.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast channel holds [`DEFAULT_BROADCAST_CAPACITY`]
        /// actions; use [`Store::with_broadcast_capacity`] to change it.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(
                initial_state,
                reducer,
                environment,
                DEFAULT_BROADCAST_CAPACITY,
            )
        }

        /// Create a new store with a custom action broadcast capacity
        ///
        /// A capacity of zero is raised to one.
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// The reducer runs while the write lock is held, so concurrent
        /// `send()` calls never observe a half-applied action. Effects run
        /// after the lock is released; every action they produce is
        /// broadcast and then reduced in turn before `send()` returns.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            let mut pending = VecDeque::from([action]);

            while let Some(action) = pending.pop_front() {
                metrics::counter!("store.commands.total").increment(1);

                let effects = {
                    let mut state = self.state.write().await;
                    tracing::trace!("Acquired write lock on state");

                    let start = std::time::Instant::now();
                    let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                    metrics::histogram!("store.reducer.duration_seconds")
                        .record(start.elapsed().as_secs_f64());

                    tracing::trace!("Reducer completed, returned {} effects", effects.len());
                    effects
                };

                self.execute_effects(effects.into_iter().collect(), &mut pending)
                    .await;
            }

            tracing::debug!("Action processing completed");
            Ok(())
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast before sending, so a reply
        /// produced while `send()` runs is never missed.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid race condition
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let screens = store.state(|s| s.registry.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Stop accepting new actions
        ///
        /// Actions already inside `send()` finish normally.
        pub fn shutdown(&self) {
            tracing::info!("Store shutting down");
            self.shutdown.store(true, Ordering::Release);
        }

        /// Whether [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Execute effects, collecting the actions they produce into `feedback`
        async fn execute_effects(&self, effects: VecDeque<Effect<A>>, feedback: &mut VecDeque<A>) {
            let mut queue = effects;

            while let Some(effect) = queue.pop_front() {
                match effect {
                    Effect::None => {
                        metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                    },
                    Effect::Future(fut) => {
                        metrics::counter!("store.effects.executed", "type" => "future")
                            .increment(1);
                        if let Some(action) = fut.await {
                            self.feed_back(action, feedback);
                        }
                    },
                    Effect::Sequential(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "sequential")
                            .increment(1);
                        // Run nested effects next, in order
                        for effect in effects.into_iter().rev() {
                            queue.push_front(effect);
                        }
                    },
                    Effect::Parallel(effects) => {
                        metrics::counter!("store.effects.executed", "type" => "parallel")
                            .increment(1);
                        let mut futures = Vec::new();
                        for effect in effects {
                            match effect {
                                Effect::Future(fut) => futures.push(fut),
                                other => queue.push_back(other),
                            }
                        }
                        for action in futures::future::join_all(futures).await.into_iter().flatten() {
                            self.feed_back(action, feedback);
                        }
                    },
                }
            }
        }

        fn feed_back(&self, action: A, feedback: &mut VecDeque<A>) {
            // No subscribers is fine; the action is still reduced
            let _ = self.action_broadcast.send(action.clone());
            feedback.push_back(action);
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}
