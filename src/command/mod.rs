/*!
 * Command Module
 * Passive description of the commands one invocation asks for
 */

pub mod types;

pub use types::{Command, CommandError, CommandResult, CommandSet, Invocation, Options};
