/*!
 * Shutdown Escalator
 *
 * Order matters:
 * 1. stop intercepting termination signals (we are about to send one to
 *    our own process group)
 * 2. arm the forced-exit timer with the exit code recorded so far
 * 3. broadcast the termination signal
 * 4. reap everything until no children are left
 *
 * If step 4 outlives the timer, the timer ends the process with the code
 * from step 2.
 */

use super::config::SupervisorConfig;
use super::drain::drain_children;
use super::types::Phase;
use crate::process::{BroadcastTarget, ProcessHost};
use crate::signals::ForcedExitTimer;
use nix::errno::Errno;
use tracing::{debug, error, info, warn};

pub(crate) fn escalate<H: ProcessHost>(
    host: &mut H,
    config: &SupervisorConfig,
    target: BroadcastTarget,
    exit_code: i32,
) -> i32 {
    if let Err(err) = host.ignore_termination_signals() {
        warn!(%err, "termination signals are still intercepted during shutdown");
    }

    let timer = match ForcedExitTimer::arm(
        config.shutdown_timeout,
        exit_code,
        config.exit_action.clone(),
    ) {
        Ok(timer) => Some(timer),
        Err(err) => {
            error!(%err, "could not arm the shutdown timeout; the final drain is unbounded");
            None
        }
    };

    info!(?target, signal = %config.termination_signal, exit_code, "shutting down");
    match host.broadcast(target, config.termination_signal) {
        Ok(()) => {}
        Err(Errno::ESRCH) => debug!("no process received the termination signal"),
        Err(errno) => warn!(%errno, "termination broadcast failed"),
    }

    match drain_children(host, Phase::Shutdown, config.max_wait_failures) {
        Ok(reaped) => info!(reaped, "all processes exited cleanly"),
        Err(err) => error!(%err, "abandoning the shutdown drain"),
    }

    if let Some(timer) = timer {
        if timer.disarm() {
            warn!(exit_code, "shutdown timeout fired before the drain finished");
        }
    }

    exit_code
}
