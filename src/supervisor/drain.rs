/*!
 * Child Drain
 * Reap every descendant until the OS reports none are left
 */

use super::types::{Phase, SupervisorResult, WaitFailures};
use crate::process::{ProcessHost, Reaped};
use tracing::trace;

/// Block until ECHILD, discarding every exit status. Returns how many
/// children were reaped.
pub(crate) fn drain_children<H: ProcessHost>(
    host: &mut H,
    phase: Phase,
    max_wait_failures: u32,
) -> SupervisorResult<usize> {
    let mut failures = WaitFailures::new(phase, max_wait_failures);
    let mut reaped = 0;

    loop {
        match host.reap() {
            Reaped::NoChildren => return Ok(reaped),
            Reaped::Exited { pid, status } => {
                trace!(%phase, %pid, status, "reaped");
                reaped += 1;
                failures.reset();
            }
            Reaped::Signaled { pid, signal } => {
                trace!(%phase, %pid, %signal, "reaped");
                reaped += 1;
                failures.reset();
            }
            Reaped::Interrupted => {}
            Reaped::Failed(errno) => failures.record(errno)?,
        }
    }
}
