/*!
 * procwarden - entry point
 *
 * Exit status: the aggregate code of the watched commands, or 1 for usage
 * and supervision errors (miette reports them on stderr).
 */

use procwarden::{
    cli, init_tracing, is_init_process, Supervisor, SupervisorConfig, UnixHost, EXIT_FAILURE,
};
use std::process::ExitCode;

fn main() -> miette::Result<ExitCode> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = cli::parse(&args, is_init_process())?;

    let mut supervisor = Supervisor::new(UnixHost::new(), SupervisorConfig::default());
    let code = supervisor.run(invocation)?;

    // Wait statuses are 0..=255, anything else is our own failure code
    let code = u8::try_from(code).unwrap_or(EXIT_FAILURE as u8);
    Ok(ExitCode::from(code))
}
