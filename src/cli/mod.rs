/*!
 * CLI Module
 * Turns the argument vector into a validated invocation
 */

mod parser;

pub use parser::{parse, UsageError, UsageResult, SEPARATOR};
