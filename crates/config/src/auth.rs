//! Authentication flow over external collaborators.
//!
//! Responsibilities:
//! - Define the seams to the identity provider (`AssertionProvider`) and the
//!   cloud credential service (`CredentialBroker`).
//! - Drive one run: region, assertion (override, cache, or login), role
//!   resolution, role assumption, and persistence.
//!
//! Does NOT handle:
//! - The web login protocol or STS calls themselves; callers supply those.
//! - Terminal output (the CLI prints the session summary).
//!
//! Invariants:
//! - An explicit assertion override bypasses both the cache and the login.
//! - The password is stored in the vault only after a successful login, and
//!   only when it did not come from the vault.
//! - A rejected login re-prompts for the password, at most `MAX_LOGIN_ATTEMPTS` times.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::cache::{self, SamlAssertion};
use crate::constants::EXPIRATION_FORMAT;
use crate::interactive::{PromptError, Prompter, fill_missing, prompt_field};
use crate::persistence::ProfileStore;
use crate::roles::{AliasMap, Role, RoleError, resolve_role};
use crate::types::{Config, IssuedCredentials, PasswordVault};
use crate::validation::{Field, ValidationError, validate};
use crate::writer::{CommitReport, commit};

/// Login attempts allowed before giving up on a rejected password.
pub const MAX_LOGIN_ATTEMPTS: usize = 3;

/// Everything the identity provider needs for one login.
#[derive(Debug)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a SecretString,
    pub idp_id: &'a str,
    pub sp_id: &'a str,
    pub bg_response: Option<&'a str>,
    pub disable_second_factor: bool,
    pub save_failure_html: bool,
    pub save_saml_flow: bool,
}

/// Failures reported by an `AssertionProvider`.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Bad credentials; the password may be retried.
    #[error("Login rejected: {0}")]
    Rejected(String),

    /// A challenge the provider cannot complete (e.g. an unsupported second factor).
    #[error("Unsupported login challenge: {0}")]
    Unsupported(String),

    #[error("Identity provider error: {0}")]
    Internal(String),
}

/// Produces a SAML assertion from an interactive login.
pub trait AssertionProvider {
    fn login(&mut self, request: &LoginRequest<'_>) -> Result<SamlAssertion, ProviderError>;
}

/// Failures reported by a `CredentialBroker`.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Request denied: {0}")]
    Denied(String),

    #[error("Credential service error: {0}")]
    Internal(String),
}

/// Parameters for exchanging an assertion for credentials.
#[derive(Debug)]
pub struct AssumeRoleRequest<'a> {
    pub role: &'a Role,
    pub assertion: &'a SamlAssertion,
    pub region: &'a str,
    pub duration: u32,
}

/// Exchanges a SAML assertion for roles and temporary credentials.
pub trait CredentialBroker {
    /// Roles offered by the assertion, in document order.
    fn roles(&mut self, assertion: &SamlAssertion) -> Result<Vec<Role>, BrokerError>;

    /// Account aliases for the accounts in `roles`.
    fn resolve_aliases(
        &mut self,
        assertion: &SamlAssertion,
        roles: &[Role],
    ) -> Result<AliasMap, BrokerError>;

    fn assume_role(
        &mut self,
        request: &AssumeRoleRequest<'_>,
    ) -> Result<IssuedCredentials, BrokerError>;
}

/// The collaborators one run needs.
pub struct Collaborators<'a> {
    pub provider: &'a mut dyn AssertionProvider,
    pub broker: &'a mut dyn CredentialBroker,
    pub prompter: &'a mut dyn Prompter,
    pub vault: &'a dyn PasswordVault,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("SAML assertion override is not valid base64: {0}")]
    InvalidAssertion(base64::DecodeError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Login rejected {attempts} times, giving up")]
    TooManyAttempts { attempts: usize },

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error(transparent)]
    Role(#[from] RoleError),
}

impl AuthError {
    /// True when the user interrupted a prompt.
    pub fn is_aborted(&self) -> bool {
        matches!(
            self,
            AuthError::Prompt(PromptError::Aborted)
                | AuthError::Role(RoleError::Prompt(PromptError::Aborted))
        )
    }
}

/// Result of a successful run.
#[derive(Debug)]
pub struct Session {
    pub role: Role,
    pub credentials: IssuedCredentials,
    pub report: CommitReport,
}

impl Session {
    /// Shell line exporting the credentials, for `--print-creds`.
    pub fn export_line(&self) -> String {
        format!(
            "export AWS_ACCESS_KEY_ID='{}' AWS_SECRET_ACCESS_KEY='{}' AWS_SESSION_TOKEN='{}' AWS_SESSION_EXPIRATION='{}'",
            self.credentials.access_key_id,
            self.credentials.secret_access_key.expose_secret(),
            self.credentials.session_token.expose_secret(),
            self.credentials.expiration.format(EXPIRATION_FORMAT),
        )
    }
}

/// Where the assertion for this run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionSource {
    Override,
    Cache,
    Login,
}

/// Obtain the assertion: explicit override, then a valid cache, then a login.
pub fn obtain_assertion(
    config: &mut Config,
    store: &ProfileStore,
    deps: &mut Collaborators<'_>,
) -> Result<(SamlAssertion, AssertionSource), AuthError> {
    if let Some(encoded) = config.saml_assertion.as_ref() {
        let assertion = SamlAssertion::from_base64(encoded.expose_secret())
            .map_err(AuthError::InvalidAssertion)?;
        tracing::info!("using SAML assertion override");
        return Ok((assertion, AssertionSource::Override));
    }

    if config.use_cache
        && let Some(idp_id) = config.idp_id.as_deref()
        && let Some(cached) = cache::read(store, idp_id)
    {
        return Ok((cached, AssertionSource::Cache));
    }

    tracing::info!("SAML cache not found, logging in");
    login(config, deps).map(|assertion| (assertion, AssertionSource::Login))
}

fn login(config: &mut Config, deps: &mut Collaborators<'_>) -> Result<SamlAssertion, AuthError> {
    fill_missing(
        config,
        &[Field::Username, Field::IdpId, Field::SpId],
        deps.prompter,
    )?;

    let mut from_vault = false;
    if config.password.is_none() && config.keyring {
        let username = config.username.as_deref().unwrap_or_default();
        match deps.vault.get(username) {
            Ok(Some(password)) => {
                tracing::debug!(username = %username, "password loaded from keyring");
                config.password = Some(password);
                from_vault = true;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "keyring lookup failed"),
        }
    }
    if config.password.is_none() {
        prompt_field(config, Field::Password, deps.prompter)?;
    }
    validate(config)?;

    let mut attempt = 1;
    let assertion = loop {
        let (Some(username), Some(password), Some(idp_id), Some(sp_id)) = (
            config.username.as_deref(),
            config.password.as_ref(),
            config.idp_id.as_deref(),
            config.sp_id.as_deref(),
        ) else {
            return Err(ValidationError::Missing {
                field: Field::Password,
            }
            .into());
        };

        let request = LoginRequest {
            username,
            password,
            idp_id,
            sp_id,
            bg_response: config.bg_response.as_deref(),
            disable_second_factor: config.disable_second_factor,
            save_failure_html: config.save_failure_html,
            save_saml_flow: config.save_saml_flow,
        };

        match deps.provider.login(&request) {
            Ok(assertion) => break assertion,
            Err(ProviderError::Rejected(reason)) => {
                tracing::warn!(attempt, %reason, "login rejected");
                if attempt >= MAX_LOGIN_ATTEMPTS {
                    return Err(AuthError::TooManyAttempts { attempts: attempt });
                }
                attempt += 1;
                from_vault = false;
                prompt_field(config, Field::Password, deps.prompter)?;
            }
            Err(e) => return Err(e.into()),
        }
    };

    if config.keyring
        && !from_vault
        && let (Some(username), Some(password)) =
            (config.username.as_deref(), config.password.as_ref())
    {
        match deps.vault.set(username, password) {
            Ok(()) => tracing::info!(username = %username, "password stored in keyring"),
            Err(e) => tracing::warn!(error = %e, "failed to store password in keyring"),
        }
    }

    Ok(assertion)
}

/// Run the whole flow and persist the outcome.
pub fn authenticate(
    config: &mut Config,
    store: &ProfileStore,
    mut deps: Collaborators<'_>,
) -> Result<Session, AuthError> {
    fill_missing(config, &[Field::Region], deps.prompter)?;

    let (assertion, source) = obtain_assertion(config, store, &mut deps)?;
    tracing::debug!(?source, assertion = ?assertion, "assertion obtained");
    if config.use_cache {
        config.set_saml_cache(Some(assertion.clone()));
    }

    let roles = deps.broker.roles(&assertion)?;
    let aliases = if config.resolve_aliases {
        Some(deps.broker.resolve_aliases(&assertion, &roles)?)
    } else {
        None
    };
    let role = resolve_role(config, &roles, aliases.as_ref(), deps.prompter)?;

    let region = config.region.clone().ok_or(ValidationError::Missing {
        field: Field::Region,
    })?;
    let credentials = deps.broker.assume_role(&AssumeRoleRequest {
        role: &role,
        assertion: &assertion,
        region: &region,
        duration: config.duration,
    })?;
    tracing::info!(
        role_arn = %role.arn,
        expiration = %credentials.expiration,
        "role assumed"
    );

    let report = commit(config, store, Some(&credentials));
    Ok(Session {
        role,
        credentials,
        report,
    })
}
