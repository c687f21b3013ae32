/*!
 * Configure Phase
 *
 * Configuration commands run before anything else and act as a barrier:
 * the phase ends only when the OS reports no children at all. Their exit
 * statuses are discarded. No timeout and no early exit on signals.
 */

use super::drain::drain_children;
use super::types::{Phase, SupervisorResult};
use crate::command::CommandSet;
use crate::process::ProcessHost;
use tracing::{debug, info};

pub(crate) fn run_configure_phase<H: ProcessHost>(
    host: &mut H,
    commands: &mut CommandSet,
    max_wait_failures: u32,
) -> SupervisorResult<()> {
    let mut launched = 0usize;

    for command in commands.configuring_mut() {
        match host.launch(command.arguments()) {
            Ok(pid) => {
                command.mark_launched(pid);
                launched += 1;
            }
            Err(err) => debug!(%err, "configuration command did not start"),
        }
    }

    if launched == 0 {
        return Ok(());
    }

    info!(launched, "waiting for configuration commands to exit");
    let reaped = drain_children(host, Phase::Configure, max_wait_failures)?;
    info!(reaped, "all configuration commands have exited");
    Ok(())
}
