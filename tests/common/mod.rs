/*!
 * Scripted process host
 * Deterministic stand-in for the OS: launches hand out fake pids, reaps
 * replay a script, and every call is logged for ordering checks.
 */

#![allow(dead_code)]

use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use procwarden::process::{BroadcastTarget, LaunchError, LaunchResult, ProcessHost, Reaped};
use procwarden::signals::{ExitAction, RunState, SignalResult};
use procwarden::{cli, Invocation, SupervisorConfig};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::time::Duration;

const FIRST_PID: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Install,
    Ignore,
    Launch(String),
    Reap,
    Broadcast(BroadcastTarget, Signal),
}

/// One scripted answer to `reap()`
#[derive(Debug, Clone)]
pub enum Step {
    /// Launched program exits normally
    Exit(&'static str, i32),
    /// Launched program is killed by a signal
    Killed(&'static str, Signal),
    /// Some pid we never launched (a reparented grandchild)
    Orphan(i32, i32),
    Interrupt,
    /// A termination signal lands while blocked in the wait
    Terminate,
    NoChildren,
    Fail(Errno),
    /// Block for a while, then report an interruption
    Stall(Duration),
}

#[derive(Debug, Default)]
pub struct ScriptedHost {
    script: VecDeque<Step>,
    pids: HashMap<String, Pid>,
    failing: HashSet<String>,
    next_pid: i32,
    run_state: Option<RunState>,
    pub events: Vec<HostEvent>,
}

impl ScriptedHost {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script: script.into(),
            next_pid: FIRST_PID,
            ..Default::default()
        }
    }

    /// `program` fails to start
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.insert(program.to_string());
        self
    }

    pub fn launched(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Launch(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn broadcasts(&self) -> Vec<(BroadcastTarget, Signal)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Broadcast(t, s) => Some((*t, *s)),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, event: &HostEvent) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }

    fn pid_of(&self, program: &str) -> Pid {
        *self
            .pids
            .get(program)
            .unwrap_or_else(|| panic!("script reaps `{}` which was never launched", program))
    }
}

impl ProcessHost for ScriptedHost {
    fn install_termination_handlers(&mut self, state: &RunState) -> SignalResult<()> {
        self.events.push(HostEvent::Install);
        self.run_state = Some(state.clone());
        Ok(())
    }

    fn ignore_termination_signals(&mut self) -> SignalResult<()> {
        self.events.push(HostEvent::Ignore);
        Ok(())
    }

    fn launch(&mut self, arguments: &[String]) -> LaunchResult<Pid> {
        let program = arguments[0].clone();
        self.events.push(HostEvent::Launch(program.clone()));

        if self.failing.contains(&program) {
            return Err(LaunchError::Spawn {
                program,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let pid = Pid::from_raw(self.next_pid);
        self.next_pid += 1;
        self.pids.insert(program, pid);
        Ok(pid)
    }

    fn reap(&mut self) -> Reaped {
        self.events.push(HostEvent::Reap);

        match self.script.pop_front() {
            None | Some(Step::NoChildren) => Reaped::NoChildren,
            Some(Step::Exit(program, status)) => Reaped::Exited {
                pid: self.pid_of(program),
                status,
            },
            Some(Step::Killed(program, signal)) => Reaped::Signaled {
                pid: self.pid_of(program),
                signal,
            },
            Some(Step::Orphan(pid, status)) => Reaped::Exited {
                pid: Pid::from_raw(pid),
                status,
            },
            Some(Step::Interrupt) => Reaped::Interrupted,
            Some(Step::Terminate) => {
                if let Some(state) = &self.run_state {
                    state.stop();
                }
                Reaped::Interrupted
            }
            Some(Step::Fail(errno)) => Reaped::Failed(errno),
            Some(Step::Stall(duration)) => {
                std::thread::sleep(duration);
                Reaped::Interrupted
            }
        }
    }

    fn broadcast(&mut self, target: BroadcastTarget, signal: Signal) -> Result<(), Errno> {
        self.events.push(HostEvent::Broadcast(target, signal));
        Ok(())
    }
}

/// Exit action that records the code instead of exiting
pub fn recording_exit() -> (ExitAction, Arc<AtomicI32>) {
    let seen = Arc::new(AtomicI32::new(-1));
    let sink = Arc::clone(&seen);
    let action: ExitAction = Arc::new(move |code| sink.store(code, Ordering::SeqCst));
    (action, seen)
}

/// Config that never really exits the test process
pub fn test_config() -> SupervisorConfig {
    let (action, _) = recording_exit();
    SupervisorConfig::default().with_exit_action(action)
}

pub fn invocation(words: &[&str]) -> Invocation {
    invocation_as(words, false)
}

pub fn invocation_as(words: &[&str], is_init: bool) -> Invocation {
    let args: Vec<String> = words.iter().map(|w| w.to_string()).collect();
    cli::parse(&args, is_init).expect("test invocation must parse")
}
