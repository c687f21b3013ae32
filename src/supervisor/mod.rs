/*!
 * Supervisor
 *
 * Two-phase run (configure, then main), the watched-exit wait, and the
 * shutdown cascade. Strictly sequential on one thread; termination signals
 * only flip the run state, which the wait loops poll.
 *
 * ```text
 * install handlers ─► configure phase ─► running? ─no─► exit 0
 *                                           │
 *                                          yes
 *                                           ▼
 *                       launch main ─► watch loop ─► shutdown cascade ─► exit code
 * ```
 */

mod config;
mod configure;
mod drain;
mod exit_code;
mod shutdown;
pub mod types;
mod watch;

pub use config::{SupervisorConfig, DEFAULT_MAX_WAIT_FAILURES, DEFAULT_SHUTDOWN_TIMEOUT};
pub use exit_code::ExitCodeTracker;
pub use types::{Phase, SupervisorError, SupervisorResult, EXIT_FAILURE};

use crate::command::Invocation;
use crate::process::{BroadcastTarget, ProcessHost};
use crate::signals::RunState;
use tracing::{error, info};

/// Runs one invocation to completion over a [`ProcessHost`]
pub struct Supervisor<H: ProcessHost> {
    host: H,
    config: SupervisorConfig,
    run_state: RunState,
}

impl<H: ProcessHost> Supervisor<H> {
    pub fn new(host: H, config: SupervisorConfig) -> Self {
        Self {
            host,
            config,
            run_state: RunState::new(),
        }
    }

    /// Shared run state; stopping it has the same effect as SIGTERM
    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Supervise `invocation` and return the exit code the process should
    /// end with.
    ///
    /// Errors come back only after the shutdown cascade has run (or, for
    /// signal setup, before anything was launched); either way the caller
    /// should exit with [`EXIT_FAILURE`].
    pub fn run(&mut self, invocation: Invocation) -> SupervisorResult<i32> {
        let Invocation {
            mut commands,
            options,
        } = invocation;
        let target = options.broadcast_target();

        info!(
            commands = commands.len(),
            configuring = commands.configuring_count(),
            watched = commands.watched_count(),
            signal_everything = options.signal_everything(),
            "starting supervision"
        );

        self.host.install_termination_handlers(&self.run_state)?;

        if let Err(err) =
            configure::run_configure_phase(&mut self.host, &mut commands, self.config.max_wait_failures)
        {
            return Err(self.abort(target, err));
        }

        if !self.run_state.is_running() {
            info!("termination requested during configuration; main commands not started");
            return Ok(0);
        }

        let launched = watch::launch_main_commands(&mut self.host, &mut commands);
        info!(launched, "main commands started");

        let exit_code = match watch::watch_commands(
            &mut self.host,
            &commands,
            &self.run_state,
            self.config.max_wait_failures,
        ) {
            Ok(code) => code,
            Err(err) => return Err(self.abort(target, err)),
        };

        Ok(shutdown::escalate(
            &mut self.host,
            &self.config,
            target,
            exit_code,
        ))
    }

    fn abort(&mut self, target: BroadcastTarget, err: SupervisorError) -> SupervisorError {
        error!(%err, "supervision failed; shutting everything down");
        shutdown::escalate(&mut self.host, &self.config, target, EXIT_FAILURE);
        err
    }
}
