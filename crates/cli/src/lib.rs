//! aws-google-auth command-line front end.
//!
//! Responsibilities:
//! - Turn parsed arguments into a resolved `Config` and run the authentication flow.
//! - Print the run summary and, on request, the credential export line.
//!
//! Does NOT handle:
//! - Process exit codes or signal handling (see `main.rs`).
//! - The login protocol or STS calls; callers pass in the collaborators.

pub mod args;
pub mod cancellation;
pub mod collaborators;
pub mod error;
pub mod logging;
pub mod prompter;

use std::io::Write;

use anyhow::{Context, Result};
use gauth_config::{
    AssertionProvider, Collaborators, ConfigError, ConfigLoader, CredentialBroker, ProfileStore,
    Session, SystemKeyring, authenticate,
};

use args::Cli;
use prompter::TerminalPrompter;

/// Resolve configuration for `cli` against the discovered AWS files.
pub fn load_config(cli: &Cli, store: ProfileStore) -> Result<gauth_config::Config, ConfigError> {
    ConfigLoader::new()
        .with_store(store)
        .from_profile()?
        .from_env()?
        .with_cli(cli.to_layer())
        .build()
}

/// Run one invocation end to end.
pub fn run(
    cli: &Cli,
    provider: &mut dyn AssertionProvider,
    broker: &mut dyn CredentialBroker,
) -> Result<()> {
    let store = ProfileStore::discover()
        .map_err(|e| ConfigError::ConfigDirUnavailable(format!("{e:#}")))?;
    let mut config = load_config(cli, store.clone())?;

    let mut prompter = TerminalPrompter;
    let session = authenticate(
        &mut config,
        &store,
        Collaborators {
            provider,
            broker,
            prompter: &mut prompter,
            vault: &SystemKeyring,
        },
    )?;

    let mut stdout = std::io::stdout().lock();
    print_session(&mut stdout, &session, config.quiet, config.print_creds)
        .context("Failed to write output")?;

    let failed = session.report.errors().count();
    if failed > 0 {
        anyhow::bail!("Credentials were issued but {failed} file update(s) failed; see the log above");
    }
    Ok(())
}

/// Write the summary lines for a successful session.
pub fn print_session(
    out: &mut impl Write,
    session: &Session,
    quiet: bool,
    print_creds: bool,
) -> std::io::Result<()> {
    if !quiet {
        writeln!(out, "Assuming {}", session.role.arn)?;
        writeln!(
            out,
            "Credentials Expiration: {}",
            session.credentials.expiration.with_timezone(&chrono::Local)
        )?;
    }
    if print_creds {
        writeln!(out, "{}", session.export_line())?;
    }
    Ok(())
}
