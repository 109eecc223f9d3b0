//! aws-google-auth - temporary AWS credentials via Google SSO.
//!
//! Responsibilities:
//! - Load `.env`, parse arguments, and install logging.
//! - Run the blocking authentication pipeline off the async runtime.
//! - Translate the outcome into a structured exit code.
//!
//! Does NOT handle:
//! - Configuration resolution or persistence (see `gauth-config`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing and before the env layer is read.
//! - Ctrl+C and aborted prompts exit with 130 and print nothing.
//! - Expected errors print one line; anything else is also logged in full.

use clap::Parser;
use gauth_cli::args::Cli;
use gauth_cli::cancellation::{is_cancelled_error, spawn_interrupt_listener};
use gauth_cli::collaborators::Unlinked;
use gauth_cli::error::{ExitCode, ExitCodeExt};
use gauth_cli::logging;
use gauth_config::ConfigLoader;

#[tokio::main]
async fn main() {
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();
    logging::init(cli.initial_log_level());

    spawn_interrupt_listener();

    let outcome = tokio::task::spawn_blocking(move || {
        let mut provider = Unlinked;
        let mut broker = Unlinked;
        gauth_cli::run(&cli, &mut provider, &mut broker)
    })
    .await;

    let exit_code = match outcome {
        Ok(Ok(())) => ExitCode::Success,
        Ok(Err(e)) if is_cancelled_error(&e) => ExitCode::Interrupted,
        Ok(Err(e)) => {
            if !e.is_expected() {
                tracing::error!(error = ?e, "unexpected failure");
            }
            eprintln!("{:#}", e);
            e.exit_code()
        }
        Err(e) => {
            eprintln!("Internal error: {}", e);
            ExitCode::GeneralError
        }
    };

    std::process::exit(exit_code.as_i32());
}
