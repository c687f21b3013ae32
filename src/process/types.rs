/*!
 * Process Types
 * What a blocking wait can report, and who a broadcast reaches
 */

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use thiserror::Error;

/// Status a command's process is considered to have exited with when it
/// could not be started at all
pub const LAUNCH_FAILURE_STATUS: i32 = 1;

/// Launch result
pub type LaunchResult<T> = Result<T, LaunchError>;

/// Launch errors
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("empty command")]
    EmptyCommand,

    #[error("failed to execute `{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one blocking wait for any child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaped {
    /// Child terminated normally
    Exited { pid: Pid, status: i32 },
    /// Child was killed by a signal
    Signaled { pid: Pid, signal: Signal },
    /// Wait returned without a terminated child (EINTR, or a non-terminal status)
    Interrupted,
    /// No children left (ECHILD)
    NoChildren,
    /// Any other wait failure
    Failed(Errno),
}

impl Reaped {
    /// Pid of the terminated child, if this wait reaped one
    pub fn pid(&self) -> Option<Pid> {
        match self {
            Reaped::Exited { pid, .. } | Reaped::Signaled { pid, .. } => Some(*pid),
            _ => None,
        }
    }
}

/// Recipients of the shutdown broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastTarget {
    /// The supervisor's own process group
    ProcessGroup,
    /// Every process the supervisor may signal (init process only)
    Everything,
}

impl BroadcastTarget {
    /// The pid argument `kill(2)` takes for this target
    pub fn as_kill_pid(&self) -> Pid {
        match self {
            BroadcastTarget::ProcessGroup => Pid::from_raw(0),
            BroadcastTarget::Everything => Pid::from_raw(-1),
        }
    }
}
