/*!
 * Unix Process Host
 * Spawns with std::process, reaps and signals through nix
 */

use super::traits::ProcessHost;
use super::types::{BroadcastTarget, LaunchError, LaunchResult, Reaped};
use crate::signals::{self, RunState, SignalResult};
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{getpid, Pid};
use std::process::Command as OsCommand;
use tracing::{debug, error, trace};

/// Is this process the init process of its pid namespace?
pub fn is_init_process() -> bool {
    getpid() == Pid::from_raw(1)
}

/// The real operating system
#[derive(Debug, Default)]
pub struct UnixHost;

impl UnixHost {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessHost for UnixHost {
    fn install_termination_handlers(&mut self, state: &RunState) -> SignalResult<()> {
        signals::install_termination_handlers(state)
    }

    fn ignore_termination_signals(&mut self) -> SignalResult<()> {
        signals::ignore_termination_signals()
    }

    fn launch(&mut self, arguments: &[String]) -> LaunchResult<Pid> {
        let (program, args) = arguments.split_first().ok_or(LaunchError::EmptyCommand)?;

        let child = OsCommand::new(program).args(args).spawn().map_err(|source| {
            error!("failed to execute `{}': {}", program, source);
            LaunchError::Spawn {
                program: program.clone(),
                source,
            }
        })?;

        let pid = Pid::from_raw(child.id() as i32);
        debug!(%pid, "launched `{}`", program);

        // Dropping the handle neither waits for nor kills the child; it is
        // reaped through waitpid(-1) like every other descendant.
        drop(child);
        Ok(pid)
    }

    fn reap(&mut self) -> Reaped {
        match waitpid(None::<Pid>, None) {
            Ok(WaitStatus::Exited(pid, status)) => Reaped::Exited { pid, status },
            Ok(WaitStatus::Signaled(pid, signal, _)) => Reaped::Signaled { pid, signal },
            Ok(other) => {
                trace!(?other, "non-terminal wait status");
                Reaped::Interrupted
            }
            Err(Errno::EINTR) => {
                debug!("waitpid interrupted by signal");
                Reaped::Interrupted
            }
            Err(Errno::ECHILD) => Reaped::NoChildren,
            Err(errno) => Reaped::Failed(errno),
        }
    }

    fn broadcast(&mut self, target: BroadcastTarget, signal: Signal) -> Result<(), Errno> {
        kill(target.as_kill_pid(), signal)
    }
}
