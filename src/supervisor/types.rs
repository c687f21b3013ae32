/*!
 * Supervisor Types
 */

use crate::signals::SignalError;
use miette::Diagnostic;
use nix::errno::Errno;
use std::fmt;
use thiserror::Error;

/// Exit code for usage, launch and supervision errors
pub const EXIT_FAILURE: i32 = 1;

/// Supervisor result
pub type SupervisorResult<T> = Result<T, SupervisorError>;

/// The three blocking waits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Configure,
    Watch,
    Shutdown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Configure => write!(f, "configure phase"),
            Phase::Watch => write!(f, "watch loop"),
            Phase::Shutdown => write!(f, "shutdown drain"),
        }
    }
}

/// Supervision errors
#[derive(Error, Debug, Diagnostic)]
pub enum SupervisorError {
    #[error("could not set up signal handling")]
    #[diagnostic(
        code(supervisor::signal_setup),
        help("Nothing was launched. Termination signals must be catchable by this process.")
    )]
    SignalSetup(#[from] SignalError),

    #[error("gave up waiting for children in the {phase} after {attempts} consecutive failures: {errno}")]
    #[diagnostic(
        code(supervisor::wait_failed),
        help("A termination signal was still broadcast to the remaining processes.")
    )]
    WaitFailed {
        phase: Phase,
        attempts: u32,
        errno: Errno,
    },
}

/// Consecutive wait-failure budget for one wait loop
#[derive(Debug)]
pub(crate) struct WaitFailures {
    phase: Phase,
    limit: u32,
    consecutive: u32,
}

impl WaitFailures {
    pub(crate) fn new(phase: Phase, limit: u32) -> Self {
        Self {
            phase,
            limit: limit.max(1),
            consecutive: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.consecutive = 0;
    }

    /// Count one failure; errors out once the budget is spent.
    pub(crate) fn record(&mut self, errno: Errno) -> SupervisorResult<()> {
        self.consecutive += 1;
        tracing::warn!(phase = %self.phase, %errno, attempt = self.consecutive, "waitpid failed");

        if self.consecutive >= self.limit {
            return Err(SupervisorError::WaitFailed {
                phase: self.phase,
                attempts: self.consecutive,
                errno,
            });
        }
        Ok(())
    }
}
