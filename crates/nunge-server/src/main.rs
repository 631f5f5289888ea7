mod api;
mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Logging is set up once the config (and its log path) is loaded.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("nunge error: {:#}", err);
        std::process::exit(1);
    }
}
