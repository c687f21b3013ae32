/*!
 * Signals Module
 * Termination signal interception and the forced-exit backstop
 */

mod handler;
mod timer;
pub mod types;

// Re-export public API
pub use handler::{ignore_termination_signals, install_termination_handlers, TERMINATION_SIGNALS};
pub use timer::{process_exit, ExitAction, ForcedExitTimer};
pub use types::{RunState, SignalError, SignalResult};
