/*!
 * Termination Signal Handlers
 *
 * SIGINT and SIGTERM are caught for the whole supervision run. The handler
 * only stops the registered `RunState`; blocking waits are not restarted
 * (no SA_RESTART), so an in-flight waitpid returns EINTR and the caller
 * re-checks the run state.
 */

use super::types::{RunState, SignalError, SignalResult};
use nix::libc::c_int;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::sync::OnceLock;
use tracing::debug;

/// Signals that ask the supervisor to shut down
pub const TERMINATION_SIGNALS: [Signal; 2] = [Signal::SIGINT, Signal::SIGTERM];

static INSTALLED: OnceLock<RunState> = OnceLock::new();

extern "C" fn on_termination(_signum: c_int) {
    if let Some(state) = INSTALLED.get() {
        state.stop();
    }
}

/// Route SIGINT/SIGTERM into `state`.
///
/// A process has one set of dispositions, so only one run state can ever be
/// bound; re-installing the same state is allowed.
pub fn install_termination_handlers(state: &RunState) -> SignalResult<()> {
    let bound = INSTALLED.get_or_init(|| state.clone());
    if !bound.same_as(state) {
        return Err(SignalError::AlreadyInstalled);
    }

    let action = SigAction::new(
        SigHandler::Handler(on_termination),
        SaFlags::empty(),
        SigSet::empty(),
    );

    for signal in TERMINATION_SIGNALS {
        // SAFETY: the handler performs one atomic swap on a state that lives
        // in a static for the rest of the process.
        unsafe { sigaction(signal, &action) }
            .map_err(|errno| SignalError::Install { signal, errno })?;
    }

    debug!("termination signal handlers installed");
    Ok(())
}

/// Set SIGINT/SIGTERM to ignored, so the supervisor survives its own
/// shutdown broadcast.
pub fn ignore_termination_signals() -> SignalResult<()> {
    let action = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());

    for signal in TERMINATION_SIGNALS {
        // SAFETY: SIG_IGN runs no code in signal context.
        unsafe { sigaction(signal, &action) }
            .map_err(|errno| SignalError::Ignore { signal, errno })?;
    }

    debug!("termination signal handlers removed");
    Ok(())
}
