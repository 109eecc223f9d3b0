//! Placeholder collaborators for builds without a login or STS backend.
//!
//! Responsibilities:
//! - Satisfy `AssertionProvider` and `CredentialBroker` with clear errors so
//!   everything up to the network boundary (configuration, cache, prompts)
//!   still runs.
//!
//! Does NOT handle:
//! - The Google login flow or any AWS API call.

use gauth_config::auth::AssumeRoleRequest;
use gauth_config::{
    AliasMap, AssertionProvider, BrokerError, CredentialBroker, IssuedCredentials, LoginRequest,
    ProviderError, Role, SamlAssertion,
};

const NOT_LINKED: &str = "not linked into this build";

/// Backend that refuses every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlinked;

impl AssertionProvider for Unlinked {
    fn login(&mut self, request: &LoginRequest<'_>) -> Result<SamlAssertion, ProviderError> {
        tracing::debug!(username = request.username, "login requested without a provider");
        Err(ProviderError::Unsupported(format!(
            "Google login is {NOT_LINKED}; pass --saml-assertion instead"
        )))
    }
}

impl CredentialBroker for Unlinked {
    fn roles(&mut self, _assertion: &SamlAssertion) -> Result<Vec<Role>, BrokerError> {
        Err(BrokerError::Internal(format!("AWS STS is {NOT_LINKED}")))
    }

    fn resolve_aliases(
        &mut self,
        _assertion: &SamlAssertion,
        _roles: &[Role],
    ) -> Result<AliasMap, BrokerError> {
        Err(BrokerError::Internal(format!("AWS IAM is {NOT_LINKED}")))
    }

    fn assume_role(
        &mut self,
        _request: &AssumeRoleRequest<'_>,
    ) -> Result<IssuedCredentials, BrokerError> {
        Err(BrokerError::Internal(format!("AWS STS is {NOT_LINKED}")))
    }
}
