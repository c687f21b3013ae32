/*!
 * Forced Exit Timer
 *
 * Last-resort bound on shutdown: once armed, the process exits with the
 * attached code after `delay` unless the timer is disarmed first.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// What to do when the timer fires. Production uses [`process_exit`].
pub type ExitAction = Arc<dyn Fn(i32) + Send + Sync>;

/// Terminate the process immediately with the given code
pub fn process_exit() -> ExitAction {
    Arc::new(|code| std::process::exit(code))
}

/// Armed timer carrying the exit code to use if it fires
pub struct ForcedExitTimer {
    exit_code: i32,
    cancel: Option<flume::Sender<()>>,
    fired: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ForcedExitTimer {
    /// Start counting down. Fails only if the timer thread cannot be spawned.
    pub fn arm(delay: Duration, exit_code: i32, action: ExitAction) -> std::io::Result<Self> {
        let (cancel, cancelled) = flume::bounded::<()>(1);
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let handle = thread::Builder::new()
            .name("forced-exit".to_string())
            .spawn(move || match cancelled.recv_timeout(delay) {
                Err(flume::RecvTimeoutError::Timeout) => {
                    warn!(
                        exit_code,
                        "timeout waiting for child processes to die after {:?}", delay
                    );
                    flag.store(true, Ordering::SeqCst);
                    action(exit_code);
                }
                _ => debug!("forced exit timer disarmed"),
            })?;

        Ok(Self {
            exit_code,
            cancel: Some(cancel),
            fired,
            handle: Some(handle),
        })
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Cancel the timer and wait for its thread. Returns whether it had
    /// already fired.
    pub fn disarm(mut self) -> bool {
        self.cancel.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.fired()
    }
}

impl Drop for ForcedExitTimer {
    fn drop(&mut self) {
        // Disconnecting the channel wakes the timer thread
        self.cancel.take();
    }
}

impl std::fmt::Debug for ForcedExitTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForcedExitTimer")
            .field("exit_code", &self.exit_code)
            .field("fired", &self.fired())
            .finish()
    }
}
