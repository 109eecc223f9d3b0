//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Convert parsed flags into a `ConfigLayer` for the loader.
//!
//! Non-responsibilities:
//! - Does not read environment variables; the loader owns the env layer so
//!   that CLI > env precedence stays visible per field.
//! - Does not resolve defaults (see `gauth_config::resolve`).
//!
//! Invariants:
//! - A flag that was not given contributes `None`, never `Some(false)`.

use clap::Parser;
use gauth_config::{ConfigLayer, ENV_LOG_LEVEL, LogLevel, env_var_or_none};
use secrecy::SecretString;

#[derive(Parser, Debug)]
#[command(name = "aws-google-auth")]
#[command(about = "Acquire temporary AWS credentials via Google SSO", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  aws-google-auth -p dev -u jane@example.com -I C01abc2de -S 123456789012\n  aws-google-auth -p prod --ask-role --resolve-aliases\n  aws-google-auth --print-creds --no-cache\n"
)]
pub struct Cli {
    /// AWS profile to read from and write to (defaults to "sts")
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Log level
    #[arg(short = 'l', long = "log", value_name = "LEVEL", value_parser = ["debug", "info", "warn"])]
    pub log: Option<String>,

    /// Google Apps username (e.g. jane@example.com)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Google SSO IdP identifier
    #[arg(short = 'I', long)]
    pub idp_id: Option<String>,

    /// Google SSO SP identifier
    #[arg(short = 'S', long)]
    pub sp_id: Option<String>,

    /// AWS region endpoint
    #[arg(short = 'R', long)]
    pub region: Option<String>,

    /// Credential duration in seconds
    #[arg(short, long, conflicts_with = "auto_duration")]
    pub duration: Option<u32>,

    /// Use the maximum duration the role allows
    #[arg(long)]
    pub auto_duration: bool,

    /// Filter roles to those in this AWS account
    #[arg(short = 'A', long)]
    pub account: Option<String>,

    /// Disable second-factor prompts during the Google login
    #[arg(short = 'D', long = "disable-u2f")]
    pub disable_u2f: bool,

    /// Quiet output
    #[arg(short, long)]
    pub quiet: bool,

    /// Override the bgresponse challenge token
    #[arg(long)]
    pub bg_response: Option<String>,

    /// Base64 SAML assertion to use instead of logging in
    #[arg(long, value_name = "BASE64")]
    pub saml_assertion: Option<String>,

    /// Do not read or write the cached SAML assertion
    #[arg(long)]
    pub no_cache: bool,

    /// Print credentials as shell export statements
    #[arg(long)]
    pub print_creds: bool,

    /// Show account aliases in the role menu
    #[arg(long)]
    pub resolve_aliases: bool,

    /// Save the login page to a file when the login fails
    #[arg(long)]
    pub save_failure_html: bool,

    /// Save each page of the login flow to a file
    #[arg(long)]
    pub save_saml_flow: bool,

    /// Always prompt for the role to assume
    #[arg(short, long, conflicts_with = "role_arn")]
    pub ask_role: bool,

    /// AWS role ARN to assume
    #[arg(short, long)]
    pub role_arn: Option<String>,

    /// Use the system keyring for the Google password
    #[arg(short, long)]
    pub keyring: bool,
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

impl Cli {
    /// The CLI precedence layer. Boolean flags only ever switch a value on.
    pub fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            profile: self.profile.clone(),
            log_level: self.log_level(),
            username: self.username.clone(),
            idp_id: self.idp_id.clone(),
            sp_id: self.sp_id.clone(),
            region: self.region.clone(),
            duration: self.duration,
            auto_duration: flag(self.auto_duration),
            account: self.account.clone(),
            bg_response: self.bg_response.clone(),
            saml_assertion: self
                .saml_assertion
                .clone()
                .map(|value| SecretString::new(value.into())),
            role_arn: self.role_arn.clone(),
            ask_role: flag(self.ask_role),
            use_cache: self.no_cache.then_some(false),
            print_creds: flag(self.print_creds),
            resolve_aliases: flag(self.resolve_aliases),
            save_failure_html: flag(self.save_failure_html),
            save_saml_flow: flag(self.save_saml_flow),
            keyring: flag(self.keyring),
            disable_second_factor: flag(self.disable_u2f),
            quiet: flag(self.quiet),
            duration_fallback: false,
        }
    }

    fn log_level(&self) -> Option<LogLevel> {
        self.log.as_deref().and_then(|level| level.parse().ok())
    }

    /// Level for the subscriber installed before configuration is resolved:
    /// `--log`, then `SSO_LOG_LEVEL`, then the default.
    pub fn initial_log_level(&self) -> LogLevel {
        self.log_level()
            .or_else(|| env_var_or_none(ENV_LOG_LEVEL).and_then(|level| level.parse().ok()))
            .unwrap_or_default()
    }
}
