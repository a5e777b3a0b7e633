mod cli;
mod logging;

use crate::cli::Cli;

fn main() {
    logging::init_logging_stderr();

    if let Err(err) = Cli::run_from_args() {
        eprintln!("fixreq error: {:#}", err);
        std::process::exit(1);
    }
}
