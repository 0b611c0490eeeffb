//! Deferred tasks - simulated remote calls that resolve after a delay on a
//! background thread.
//!
//! A task never touches the record store itself. The caller joins it, and the
//! join refuses to hand over a result once the token was cancelled, so a
//! superseded request can't overwrite newer state.
//!
//! ## Example
//!
//! ```ignore
//! use std::time::Duration;
//! use tech_tracker::{fetch_roadmap, CancellationToken};
//!
//! let token = CancellationToken::new();
//! let task = fetch_roadmap("https://example.com/roadmaps/frontend", Duration::from_secs(1), token.clone())?;
//!
//! // user navigates away:
//! token.cancel();
//!
//! match task.join() {
//!     Ok(roadmap) => { store.apply_roadmap(roadmap)?; }
//!     Err(TaskError::Cancelled) => {}
//!     Err(err) => return Err(err.into()),
//! }
//! ```

mod resources;
mod roadmap;

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::debug;
use thiserror::Error;

pub use resources::{additional_resources, fetch_additional_resources, ResourceLink};
pub use roadmap::{fetch_roadmap, roadmap_fixture, Roadmap};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task was cancelled")]
    Cancelled,
    #[error("task worker panicked")]
    Panicked,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Default)]
struct TokenState {
    cancelled: Mutex<bool>,
    signal: Condvar,
}

/// Cooperative cancellation flag shared between a caller and its tasks.
///
/// Clones observe the same flag. A poisoned lock reads as cancelled.
#[derive(Clone, Default)]
pub struct CancellationToken {
    state: Arc<TokenState>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if let Ok(mut cancelled) = self.state.cancelled.lock() {
            *cancelled = true;
        }
        self.state.signal.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state
            .cancelled
            .lock()
            .map(|cancelled| *cancelled)
            .unwrap_or(true)
    }

    /// Sleep for `delay` or until cancelled. Returns true if cancelled.
    fn wait(&self, delay: Duration) -> bool {
        let Ok(guard) = self.state.cancelled.lock() else {
            return true;
        };
        match self
            .state
            .signal
            .wait_timeout_while(guard, delay, |cancelled| !*cancelled)
        {
            Ok((cancelled, _)) => *cancelled,
            Err(_) => true,
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Work scheduled to run on a background thread after a delay.
#[derive(Debug)]
pub struct DeferredTask<T> {
    token: CancellationToken,
    handle: JoinHandle<Option<T>>,
}

impl<T: Send + 'static> DeferredTask<T> {
    pub fn spawn<F>(delay: Duration, token: CancellationToken, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let worker_token = token.clone();
        let handle = thread::spawn(move || {
            if worker_token.wait(delay) {
                debug!("deferred task cancelled before running");
                return None;
            }
            Some(work())
        });
        DeferredTask { token, handle }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result. Cancellation observed at any point before the
    /// result is handed over yields `TaskError::Cancelled`.
    pub fn join(self) -> Result<T, TaskError> {
        let outcome = self.handle.join().map_err(|_| TaskError::Panicked)?;
        match outcome {
            Some(value) if !self.token.is_cancelled() => Ok(value),
            _ => Err(TaskError::Cancelled),
        }
    }
}
