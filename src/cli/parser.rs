/*!
 * Command-Line Parser
 *
 * `procwarden [-a] [-c | -f] cmd args... [--- [-a] [-c | -f] cmd args...]...`
 *
 * Groups are split on the literal `---`. Within a group flags come first;
 * the first word that is not a flag starts the command, and every word after
 * it belongs to the command even if it starts with `-`.
 */

use crate::command::{Command, CommandError, CommandSet, Invocation, Options};
use clap::error::ErrorKind;
use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;

/// Separates command groups
pub const SEPARATOR: &str = "---";

/// Usage result
pub type UsageResult<T> = Result<T, UsageError>;

/// Rejected invocations. Nothing has been launched when one of these is
/// returned.
#[derive(Error, Debug, Diagnostic)]
pub enum UsageError {
    #[error("please supply at least one command to run")]
    #[diagnostic(
        code(usage::no_commands),
        help("usage: procwarden [-a] [-c | -f] command [args...] [--- [-a] [-c | -f] command [args...]]...")
    )]
    NoCommands,

    #[error("command must follow `---'")]
    #[diagnostic(code(usage::missing_command_after_separator))]
    MissingCommandAfterSeparator,

    #[error("command group {group} has flags but no command")]
    #[diagnostic(code(usage::missing_executable))]
    MissingExecutable { group: usize },

    #[error("invalid options in command group {group}: {kind}")]
    #[diagnostic(
        code(usage::invalid_options),
        help("each group accepts -a, -c and -f before its command")
    )]
    InvalidOptions { group: usize, kind: ErrorKind },

    #[error(transparent)]
    #[diagnostic(code(usage::invalid_command))]
    Command(#[from] CommandError),
}

/// Flags and command of one group
#[derive(Parser, Debug)]
#[command(
    name = "procwarden",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct GroupArgs {
    /// Signal every process at shutdown, not just our process group (init only)
    #[arg(short = 'a')]
    signal_everything: bool,

    /// Configuration command: run to completion before the main commands
    #[arg(short = 'c')]
    configure: bool,

    /// Watched command: shutdown begins once all watched commands exit
    #[arg(short = 'f')]
    watch: bool,

    #[arg(required = true, num_args = 1.., trailing_var_arg = true, value_name = "COMMAND")]
    command: Vec<String>,
}

/// Build an invocation from the arguments after the program name.
///
/// `is_init` gates `-a`.
pub fn parse(args: &[String], is_init: bool) -> UsageResult<Invocation> {
    if args.is_empty() {
        return Err(UsageError::NoCommands);
    }

    let mut commands = Vec::new();
    let mut signal_everything = false;

    for (group, words) in args.split(|word| word == SEPARATOR).enumerate() {
        if words.is_empty() {
            return Err(if group == 0 {
                UsageError::NoCommands
            } else {
                UsageError::MissingCommandAfterSeparator
            });
        }

        let parsed = GroupArgs::try_parse_from(words).map_err(|err| match err.kind() {
            ErrorKind::MissingRequiredArgument => UsageError::MissingExecutable { group },
            kind => UsageError::InvalidOptions { group, kind },
        })?;

        if parsed.signal_everything {
            Options::new(true, is_init)?;
            signal_everything = true;
        }

        commands.push(Command::new(
            group,
            parsed.command,
            parsed.watch,
            parsed.configure,
        )?);
    }

    Ok(Invocation {
        commands: CommandSet::new(commands)?,
        options: Options::new(signal_everything, is_init)?,
    })
}
