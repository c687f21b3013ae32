/*!
 * Process Traits
 * The operating-system seam the supervisor drives
 */

use super::types::{BroadcastTarget, LaunchResult, Reaped};
use crate::signals::{RunState, SignalResult};
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;

/// Everything the supervisor needs from the OS
///
/// [`UnixHost`](super::UnixHost) is the real implementation; tests drive the
/// supervisor with scripted hosts.
pub trait ProcessHost {
    /// Route termination signals into `state`
    fn install_termination_handlers(&mut self, state: &RunState) -> SignalResult<()>;

    /// Stop intercepting termination signals (they become ignored)
    fn ignore_termination_signals(&mut self) -> SignalResult<()>;

    /// Start `arguments[0]` with the rest as its arguments; returns once the
    /// child is running on its own
    fn launch(&mut self, arguments: &[String]) -> LaunchResult<Pid>;

    /// Block until any child changes state
    fn reap(&mut self) -> Reaped;

    /// Send `signal` to every process in `target`
    fn broadcast(&mut self, target: BroadcastTarget, signal: Signal) -> Result<(), Errno>;
}
