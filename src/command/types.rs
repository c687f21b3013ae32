/*!
 * Command Types
 * What to run, and how the supervisor treats each command
 */

use crate::process::BroadcastTarget;
use nix::unistd::Pid;
use thiserror::Error;

/// Command model result
pub type CommandResult<T> = Result<T, CommandError>;

/// Invocations the command model refuses to build
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("please supply at least one command to run")]
    NoCommands,

    #[error("command {index} has no executable")]
    EmptyCommand { index: usize },

    #[error("command {index} cannot be both configuring (-c) and watched (-f)")]
    ConflictingRoles { index: usize },

    #[error("every command is configuring (-c); nothing is left to watch")]
    NothingToWatch,

    #[error("-a can only be used from the init process (a process with pid 1)")]
    SignalEverythingRequiresInit,
}

/// One requested program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    arguments: Vec<String>,
    watched: bool,
    configuring: bool,
    pid: Option<Pid>,
}

impl Command {
    /// Build a command; `arguments[0]` is the executable.
    ///
    /// `index` is the command's position in the invocation and only feeds
    /// error messages.
    pub fn new(
        index: usize,
        arguments: Vec<String>,
        watched: bool,
        configuring: bool,
    ) -> CommandResult<Self> {
        if arguments.is_empty() {
            return Err(CommandError::EmptyCommand { index });
        }
        if watched && configuring {
            return Err(CommandError::ConflictingRoles { index });
        }

        Ok(Self {
            arguments,
            watched,
            configuring,
            pid: None,
        })
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    pub fn program(&self) -> &str {
        &self.arguments[0]
    }

    pub fn is_watched(&self) -> bool {
        self.watched
    }

    pub fn is_configuring(&self) -> bool {
        self.configuring
    }

    /// OS process id, set once the command has been launched
    pub fn pid(&self) -> Option<Pid> {
        self.pid
    }

    pub(crate) fn mark_launched(&mut self, pid: Pid) {
        debug_assert!(
            self.pid.is_none(),
            "command `{}` launched twice",
            self.program()
        );
        self.pid = Some(pid);
    }
}

/// Every command from one invocation, in invocation order
///
/// Order matters: a lower index wins the exit-code tie-break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    commands: Vec<Command>,
}

impl CommandSet {
    /// Validate the set and apply the default-watch rule: when no command was
    /// explicitly watched, every non-configuring command is.
    pub fn new(mut commands: Vec<Command>) -> CommandResult<Self> {
        if commands.is_empty() {
            return Err(CommandError::NoCommands);
        }

        if !commands.iter().any(Command::is_watched) {
            for command in commands.iter_mut().filter(|c| !c.configuring) {
                command.watched = true;
            }
        }

        if !commands.iter().any(Command::is_watched) {
            return Err(CommandError::NothingToWatch);
        }

        Ok(Self { commands })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// The watch set, with each command's position in the full set
    pub fn watched(&self) -> impl Iterator<Item = (usize, &Command)> {
        self.commands.iter().enumerate().filter(|(_, c)| c.watched)
    }

    pub fn watched_count(&self) -> usize {
        self.commands.iter().filter(|c| c.watched).count()
    }

    pub fn configuring_count(&self) -> usize {
        self.commands.iter().filter(|c| c.configuring).count()
    }

    pub(crate) fn configuring_mut(&mut self) -> impl Iterator<Item = &mut Command> {
        self.commands.iter_mut().filter(|c| c.configuring)
    }

    pub(crate) fn main_mut(&mut self) -> impl Iterator<Item = &mut Command> {
        self.commands.iter_mut().filter(|c| !c.configuring)
    }
}

/// Process-wide options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    signal_everything: bool,
}

impl Options {
    /// `signal_everything` is only honoured for the init process.
    pub fn new(signal_everything: bool, is_init: bool) -> CommandResult<Self> {
        if signal_everything && !is_init {
            return Err(CommandError::SignalEverythingRequiresInit);
        }
        Ok(Self { signal_everything })
    }

    pub fn signal_everything(&self) -> bool {
        self.signal_everything
    }

    /// Who receives the shutdown broadcast
    pub fn broadcast_target(&self) -> BroadcastTarget {
        if self.signal_everything {
            BroadcastTarget::Everything
        } else {
            BroadcastTarget::ProcessGroup
        }
    }
}

/// A fully validated invocation, ready to supervise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub commands: CommandSet,
    pub options: Options,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(index: usize, argv: &[&str], watched: bool, configuring: bool) -> Command {
        Command::new(
            index,
            argv.iter().map(|s| s.to_string()).collect(),
            watched,
            configuring,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_watched_and_configuring() {
        let err = Command::new(3, vec!["true".into()], true, true).unwrap_err();
        assert_eq!(err, CommandError::ConflictingRoles { index: 3 });
    }

    #[test]
    fn test_rejects_empty_arguments() {
        let err = Command::new(0, vec![], false, false).unwrap_err();
        assert_eq!(err, CommandError::EmptyCommand { index: 0 });
    }

    #[test]
    fn test_default_watch_rule() {
        let set = CommandSet::new(vec![
            cmd(0, &["setup"], false, true),
            cmd(1, &["server"], false, false),
            cmd(2, &["worker"], false, false),
        ])
        .unwrap();

        let watched: Vec<usize> = set.watched().map(|(i, _)| i).collect();
        assert_eq!(watched, vec![1, 2]);
    }

    #[test]
    fn test_explicit_watch_disables_default() {
        let set = CommandSet::new(vec![
            cmd(0, &["server"], false, false),
            cmd(1, &["tests"], true, false),
        ])
        .unwrap();

        let watched: Vec<&str> = set.watched().map(|(_, c)| c.program()).collect();
        assert_eq!(watched, vec!["tests"]);
        assert!(!set.get(0).unwrap().is_watched());
    }

    #[test]
    fn test_only_configuring_commands_rejected() {
        let err = CommandSet::new(vec![cmd(0, &["setup"], false, true)]).unwrap_err();
        assert_eq!(err, CommandError::NothingToWatch);
    }

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(CommandSet::new(vec![]).unwrap_err(), CommandError::NoCommands);
    }

    #[test]
    fn test_signal_everything_requires_init() {
        assert_eq!(
            Options::new(true, false).unwrap_err(),
            CommandError::SignalEverythingRequiresInit
        );
        let opts = Options::new(true, true).unwrap();
        assert_eq!(opts.broadcast_target(), BroadcastTarget::Everything);
        assert_eq!(
            Options::new(false, false).unwrap().broadcast_target(),
            BroadcastTarget::ProcessGroup
        );
    }

    #[test]
    fn test_mark_launched_records_pid() {
        let mut command = cmd(0, &["sleep", "1"], true, false);
        assert_eq!(command.pid(), None);
        command.mark_launched(Pid::from_raw(42));
        assert_eq!(command.pid(), Some(Pid::from_raw(42)));
    }
}
