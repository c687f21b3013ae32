/*!
 * Supervisor Configuration
 */

use crate::signals::{process_exit, ExitAction};
use nix::sys::signal::Signal;
use std::fmt;
use std::time::Duration;

/// How long the shutdown drain may take before the process is forced out
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Consecutive non-EINTR wait failures tolerated by a wait loop
pub const DEFAULT_MAX_WAIT_FAILURES: u32 = 16;

/// Runtime knobs for [`Supervisor`](super::Supervisor)
#[derive(Clone)]
pub struct SupervisorConfig {
    /// Bound on the final drain; the process exits when it elapses
    pub shutdown_timeout: Duration,
    /// Signal broadcast to start the shutdown cascade
    pub termination_signal: Signal,
    /// Wait loops give up after this many consecutive wait errors
    pub max_wait_failures: u32,
    /// Invoked with the recorded exit code if the shutdown timeout fires
    pub exit_action: ExitAction,
}

impl SupervisorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn with_termination_signal(mut self, signal: Signal) -> Self {
        self.termination_signal = signal;
        self
    }

    pub fn with_max_wait_failures(mut self, failures: u32) -> Self {
        self.max_wait_failures = failures.max(1);
        self
    }

    pub fn with_exit_action(mut self, action: ExitAction) -> Self {
        self.exit_action = action;
        self
    }
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            termination_signal: Signal::SIGTERM,
            max_wait_failures: DEFAULT_MAX_WAIT_FAILURES,
            exit_action: process_exit(),
        }
    }
}

impl fmt::Debug for SupervisorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupervisorConfig")
            .field("shutdown_timeout", &self.shutdown_timeout)
            .field("termination_signal", &self.termination_signal)
            .field("max_wait_failures", &self.max_wait_failures)
            .finish_non_exhaustive()
    }
}
