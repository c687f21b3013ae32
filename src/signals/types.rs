/*!
 * Signal Types
 * Run state shared with signal context, and signal setup errors
 */

use nix::errno::Errno;
use nix::sys::signal::Signal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Signal operation result
pub type SignalResult<T> = Result<T, SignalError>;

/// Signal errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("could not catch {signal}: {errno}")]
    Install { signal: Signal, errno: Errno },

    #[error("could not ignore {signal}: {errno}")]
    Ignore { signal: Signal, errno: Errno },

    #[error("termination handlers are already bound to a different run state")]
    AlreadyInstalled,
}

/// Process-wide cancellation token
///
/// Starts out running. The only transition is running -> stopped, made from a
/// signal handler or directly by `stop`. Cheap to clone; all clones share the
/// flag.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    stopped: Arc<AtomicBool>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst)
    }

    /// Flip to stopped. Returns `true` for the call that made the transition.
    ///
    /// Async-signal-safe: a single lock-free atomic swap.
    #[inline]
    pub fn stop(&self) -> bool {
        !self.stopped.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn same_as(&self, other: &RunState) -> bool {
        Arc::ptr_eq(&self.stopped, &other.stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_starts_running() {
        assert!(RunState::new().is_running());
    }

    #[test]
    fn test_stop_is_monotonic_and_shared() {
        let state = RunState::new();
        let observer = state.clone();

        assert!(state.stop());
        assert!(!observer.is_running());

        // Second stop is a no-op
        assert!(!observer.stop());
        assert!(!state.is_running());
        assert!(state.same_as(&observer));
        assert!(!state.same_as(&RunState::new()));
    }
}
