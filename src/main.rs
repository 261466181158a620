use std::process::ExitCode;

use subset_mover::cli::{self, ParseOutcome};
use subset_mover::SubsetError;

fn report(err: &SubsetError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err.exit_code())
}

fn main() -> ExitCode {
    let cli = match cli::parse_args(std::env::args_os()) {
        Ok(ParseOutcome::Run(cli)) => cli,
        Ok(ParseOutcome::Info(info)) => info.exit(),
        Err(e) => return report(&e),
    };
    cli::init_logging(cli.verbose);

    match cli::run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}
