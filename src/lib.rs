/*!
 * procwarden
 *
 * Minimal process supervisor meant to be the top process of a container
 * (optionally pid 1):
 * - runs configuration commands to completion first
 * - starts the main commands side by side
 * - waits for the watched ones, then signals and reaps the whole tree
 * - exits with the first (by position) watched failure, or 0
 */

pub mod cli;
pub mod command;
pub mod monitoring;
pub mod process;
pub mod signals;
pub mod supervisor;

// Re-exports
pub use cli::{parse, UsageError, SEPARATOR};
pub use command::{Command, CommandError, CommandSet, Invocation, Options};
pub use monitoring::init_tracing;
pub use process::{is_init_process, BroadcastTarget, ProcessHost, Reaped, UnixHost};
pub use signals::{ForcedExitTimer, RunState, SignalError};
pub use supervisor::{
    ExitCodeTracker, Supervisor, SupervisorConfig, SupervisorError, SupervisorResult,
    EXIT_FAILURE,
};
