/*!
 * Process Module
 * Launching, reaping and signalling OS processes
 */

mod host;
pub mod traits;
pub mod types;

pub use host::{is_init_process, UnixHost};
pub use traits::ProcessHost;
pub use types::{BroadcastTarget, LaunchError, LaunchResult, Reaped, LAUNCH_FAILURE_STATUS};
