/*!
 * Main Supervision Loop
 *
 * Launches the main commands, then reaps exits until every watched command
 * has gone. The run state is checked right before and right after each
 * blocking wait; once it is stopped the loop returns whatever code has been
 * recorded so far.
 */

use super::exit_code::ExitCodeTracker;
use super::types::{Phase, SupervisorResult, WaitFailures};
use crate::command::CommandSet;
use crate::process::{ProcessHost, Reaped, LAUNCH_FAILURE_STATUS};
use crate::signals::RunState;
use nix::unistd::Pid;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Start every non-configuring command in command-set order. Returns how
/// many actually started.
pub(crate) fn launch_main_commands<H: ProcessHost>(
    host: &mut H,
    commands: &mut CommandSet,
) -> usize {
    let mut launched = 0;
    for command in commands.main_mut() {
        match host.launch(command.arguments()) {
            Ok(pid) => {
                command.mark_launched(pid);
                launched += 1;
            }
            Err(err) => debug!(%err, "command did not start"),
        }
    }
    launched
}

/// Wait for the watch set to exit and return the aggregate exit code
pub(crate) fn watch_commands<H: ProcessHost>(
    host: &mut H,
    commands: &CommandSet,
    run_state: &RunState,
    max_wait_failures: u32,
) -> SupervisorResult<i32> {
    let mut tracker = ExitCodeTracker::new();
    let mut pending: HashMap<Pid, usize> = HashMap::with_capacity(commands.watched_count());

    for (index, command) in commands.watched() {
        match command.pid() {
            Some(pid) => {
                pending.insert(pid, index);
            }
            None => {
                warn!(
                    index,
                    "watched command `{}` never started; counting it as exited with status {}",
                    command.program(),
                    LAUNCH_FAILURE_STATUS
                );
                tracker.record(index, LAUNCH_FAILURE_STATUS);
            }
        }
    }

    let mut failures = WaitFailures::new(Phase::Watch, max_wait_failures);

    loop {
        if pending.is_empty() {
            info!(exit_code = tracker.code(), "all watched processes exited");
            return Ok(tracker.code());
        }

        if !run_state.is_running() {
            return Ok(stopped(&tracker, pending.len()));
        }
        let reaped = host.reap();
        if !run_state.is_running() {
            return Ok(stopped(&tracker, pending.len()));
        }

        match reaped {
            Reaped::Exited { pid, status } => {
                failures.reset();
                match pending.remove(&pid) {
                    Some(index) => {
                        debug!(%pid, status, left = pending.len(), "watched process exited");
                        tracker.record(index, status);
                    }
                    None => debug!(%pid, status, "process exit: not in watched commands list"),
                }
            }
            Reaped::Signaled { pid, signal } => {
                failures.reset();
                match pending.remove(&pid) {
                    Some(_) => {
                        debug!(%pid, %signal, left = pending.len(), "watched process killed")
                    }
                    None => debug!(%pid, %signal, "process killed: not in watched commands list"),
                }
            }
            Reaped::Interrupted => {}
            Reaped::NoChildren => {
                warn!(
                    left = pending.len(),
                    "no children left while watched commands are outstanding"
                );
                return Ok(tracker.code());
            }
            Reaped::Failed(errno) => failures.record(errno)?,
        }
    }
}

fn stopped(tracker: &ExitCodeTracker, left: usize) -> i32 {
    info!(
        exit_code = tracker.code(),
        left, "termination requested; no longer waiting for watched processes"
    );
    tracker.code()
}
