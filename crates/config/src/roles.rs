//! Role selection.
//!
//! Responsibilities:
//! - Filter the broker's role list by an account substring.
//! - Enrich roles with account aliases and sort them for presentation.
//! - Resolve one role from a 1-based index or an interactive prompt.
//!
//! Does NOT handle:
//! - Fetching roles or aliases (see `auth::CredentialBroker`).
//!
//! Invariants:
//! - Without aliases, roles keep the broker's insertion order.
//! - With aliases, roles are ordered by `(alias, role path)` ascending.
//! - An out-of-range index is an error, never a silent default.

use std::collections::HashMap;

use thiserror::Error;

use crate::interactive::{PromptError, Prompter};
use crate::types::Config;

/// Account id to account alias.
pub type AliasMap = HashMap<String, String>;

/// An assumable role and the SAML provider that trusts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub arn: String,
    pub principal: String,
}

impl Role {
    pub fn new(arn: impl Into<String>, principal: impl Into<String>) -> Self {
        Self {
            arn: arn.into(),
            principal: principal.into(),
        }
    }

    /// Account number: the fifth `:`-separated field of the ARN.
    pub fn account_id(&self) -> Option<&str> {
        self.arn.split(':').nth(4).filter(|id| !id.is_empty())
    }

    /// Everything after `role/`, or the whole ARN when there is no role path.
    pub fn path(&self) -> &str {
        self.arn
            .split_once("role/")
            .map(|(_, path)| path)
            .unwrap_or(&self.arn)
    }
}

/// A role as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleEntry {
    pub role: Role,
    /// Resolved account alias; `None` when aliases were not requested.
    pub alias: Option<String>,
}

impl RoleEntry {
    pub fn label(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{alias:<24} {}", self.role.path()),
            None => self.role.arn.clone(),
        }
    }
}

/// How to pick among the candidates.
pub enum RoleChoice<'a> {
    /// 1-based position in the presented list.
    Index(usize),
    /// Ask the user.
    Prompt(&'a mut dyn Prompter),
}

#[derive(Error, Debug)]
pub enum RoleError {
    #[error("no roles available{}", filter_suffix(.0))]
    NoMatchingRoles(Option<String>),

    #[error("role choice {index} is out of range (1 - {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

fn filter_suffix(filter: &Option<String>) -> String {
    filter
        .as_ref()
        .map(|f| format!(" matching account filter '{f}'"))
        .unwrap_or_default()
}

/// Filtered and, when `aliases` is given, enriched and sorted candidates.
pub fn candidates(roles: &[Role], aliases: Option<&AliasMap>, account: Option<&str>) -> Vec<RoleEntry> {
    let account = account.filter(|a| !a.is_empty());
    let filtered = roles
        .iter()
        .filter(|role| account.is_none_or(|a| role.arn.contains(a)))
        .cloned();

    match aliases {
        None => filtered.map(|role| RoleEntry { role, alias: None }).collect(),
        Some(aliases) => {
            let mut entries: Vec<RoleEntry> = filtered
                .map(|role| {
                    let account_id = role.account_id().unwrap_or_default();
                    let alias = aliases
                        .get(account_id)
                        .cloned()
                        .unwrap_or_else(|| account_id.to_string());
                    RoleEntry {
                        role,
                        alias: Some(alias),
                    }
                })
                .collect();
            entries.sort_by(|a, b| {
                (a.alias.as_deref(), a.role.path()).cmp(&(b.alias.as_deref(), b.role.path()))
            });
            entries
        }
    }
}

/// Pick one role from the filtered (and possibly enriched) list.
pub fn select_role(
    roles: &[Role],
    aliases: Option<&AliasMap>,
    account: Option<&str>,
    choice: RoleChoice<'_>,
) -> Result<Role, RoleError> {
    let entries = candidates(roles, aliases, account);
    if entries.is_empty() {
        return Err(RoleError::NoMatchingRoles(
            account.filter(|a| !a.is_empty()).map(str::to_string),
        ));
    }

    let count = entries.len();
    let index = match choice {
        RoleChoice::Index(index) => index,
        RoleChoice::Prompt(prompter) => {
            let labels: Vec<String> = entries.iter().map(RoleEntry::label).collect();
            let prompt = format!("Type the number (1 - {count}) of the role to assume");
            prompter.select(&prompt, &labels)? + 1
        }
    };

    index
        .checked_sub(1)
        .and_then(|i| entries.into_iter().nth(i))
        .map(|entry| entry.role)
        .ok_or(RoleError::IndexOutOfRange { index, count })
}

/// Resolve the role to assume and record it on `config`.
///
/// A configured `role_arn` that the broker offers is used directly unless
/// `ask_role` is set. A filter that leaves exactly one role selects it
/// without prompting.
pub fn resolve_role(
    config: &mut Config,
    roles: &[Role],
    aliases: Option<&AliasMap>,
    prompter: &mut dyn Prompter,
) -> Result<Role, RoleError> {
    if !config.ask_role
        && let Some(arn) = config.role_arn.as_deref()
        && let Some(role) = roles.iter().find(|r| r.arn == arn)
    {
        tracing::debug!(role_arn = %arn, "configured role offered by assertion");
        config.provider = Some(role.principal.clone());
        return Ok(role.clone());
    }

    let account = config.account.as_deref();
    let choice = if !config.ask_role && candidates(roles, None, account).len() == 1 {
        RoleChoice::Index(1)
    } else {
        RoleChoice::Prompt(prompter)
    };

    let role = select_role(roles, aliases, account, choice)?;
    tracing::info!(role_arn = %role.arn, "role selected");
    config.role_arn = Some(role.arn.clone());
    config.provider = Some(role.principal.clone());
    Ok(role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::ScriptedPrompter;
    use crate::types::DurationBounds;

    fn roles() -> Vec<Role> {
        vec![
            Role::new(
                "arn:aws:iam::111111111111:role/Admin",
                "arn:aws:iam::111111111111:saml-provider/Google",
            ),
            Role::new(
                "arn:aws:iam::222222222222:role/Dev",
                "arn:aws:iam::222222222222:saml-provider/Google",
            ),
            Role::new(
                "arn:aws:iam::222222222222:role/Admin",
                "arn:aws:iam::222222222222:saml-provider/Google",
            ),
        ]
    }

    fn aliases() -> AliasMap {
        AliasMap::from([
            ("111111111111".to_string(), "zeta-prod".to_string()),
            ("222222222222".to_string(), "alpha-dev".to_string()),
        ])
    }

    fn config() -> Config {
        Config::with_defaults("sts", DurationBounds::default())
    }

    #[test]
    fn test_role_parts() {
        let role = &roles()[1];
        assert_eq!(role.account_id(), Some("222222222222"));
        assert_eq!(role.path(), "Dev");
        assert_eq!(Role::new("arn:aws:iam::1:role/team/Ops", "p").path(), "team/Ops");
    }

    #[test]
    fn test_filter_without_aliases_keeps_insertion_order() {
        let entries = candidates(&roles(), None, Some("222222222222"));
        let arns: Vec<_> = entries.iter().map(|e| e.role.arn.as_str()).collect();
        assert_eq!(
            arns,
            vec![
                "arn:aws:iam::222222222222:role/Dev",
                "arn:aws:iam::222222222222:role/Admin"
            ]
        );
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        assert_eq!(candidates(&roles(), None, Some("")).len(), 3);
        assert_eq!(candidates(&roles(), None, None).len(), 3);
    }

    #[test]
    fn test_aliases_sort_by_alias_then_path() {
        let aliases = aliases();
        let entries = candidates(&roles(), Some(&aliases), None);
        let order: Vec<_> = entries
            .iter()
            .map(|e| (e.alias.clone().unwrap(), e.role.path().to_string()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("alpha-dev".to_string(), "Admin".to_string()),
                ("alpha-dev".to_string(), "Dev".to_string()),
                ("zeta-prod".to_string(), "Admin".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_alias_falls_back_to_account_id() {
        let aliases = AliasMap::new();
        let entries = candidates(&roles()[..1], Some(&aliases), None);
        assert_eq!(entries[0].alias.as_deref(), Some("111111111111"));
    }

    #[test]
    fn test_select_by_index_uses_sorted_list() {
        let aliases = aliases();
        let role = select_role(&roles(), Some(&aliases), None, RoleChoice::Index(3)).unwrap();
        assert_eq!(role.arn, "arn:aws:iam::111111111111:role/Admin");
    }

    #[test]
    fn test_index_out_of_range_is_an_error() {
        assert!(matches!(
            select_role(&roles(), None, None, RoleChoice::Index(4)),
            Err(RoleError::IndexOutOfRange { index: 4, count: 3 })
        ));
        assert!(matches!(
            select_role(&roles(), None, None, RoleChoice::Index(0)),
            Err(RoleError::IndexOutOfRange { index: 0, count: 3 })
        ));
    }

    #[test]
    fn test_no_matching_roles() {
        let err = select_role(&roles(), None, Some("999"), RoleChoice::Index(1)).unwrap_err();
        assert!(matches!(err, RoleError::NoMatchingRoles(Some(_))));
        assert!(err.to_string().contains("999"));
    }

    #[test]
    fn test_prompt_selection_is_one_based_mapping() {
        let mut prompter = ScriptedPrompter::new(["2"]);
        let role = select_role(&roles(), None, None, RoleChoice::Prompt(&mut prompter)).unwrap();
        assert_eq!(role.arn, "arn:aws:iam::222222222222:role/Dev");
        assert_eq!(prompter.selections(), 1);
    }

    #[test]
    fn test_single_filtered_role_is_selected_without_prompt() {
        let roles = vec![
            Role::new("arn:aws:iam::111111111111:role/Admin", "p1"),
            Role::new("arn:aws:iam::222222222222:role/Dev", "p2"),
        ];
        let mut config = config();
        config.account = Some("222222222222".to_string());
        let mut prompter = ScriptedPrompter::new(Vec::<&str>::new());

        let role = resolve_role(&mut config, &roles, None, &mut prompter).unwrap();

        assert_eq!(role, Role::new("arn:aws:iam::222222222222:role/Dev", "p2"));
        assert_eq!(config.provider.as_deref(), Some("p2"));
        assert_eq!(prompter.selections(), 0);
    }

    #[test]
    fn test_configured_role_short_circuits() {
        let mut config = config();
        config.role_arn = Some("arn:aws:iam::111111111111:role/Admin".to_string());
        config.account = Some("222222222222".to_string());
        let mut prompter = ScriptedPrompter::new(Vec::<&str>::new());

        let role = resolve_role(&mut config, &roles(), None, &mut prompter).unwrap();

        assert_eq!(role.arn, "arn:aws:iam::111111111111:role/Admin");
        assert_eq!(
            config.provider.as_deref(),
            Some("arn:aws:iam::111111111111:saml-provider/Google")
        );
        assert_eq!(prompter.selections(), 0);
    }

    #[test]
    fn test_ask_role_forces_prompt() {
        let mut config = config();
        config.role_arn = Some("arn:aws:iam::111111111111:role/Admin".to_string());
        config.ask_role = true;
        let mut prompter = ScriptedPrompter::new(["2"]);

        let role = resolve_role(&mut config, &roles(), None, &mut prompter).unwrap();

        assert_eq!(role.arn, "arn:aws:iam::222222222222:role/Dev");
        assert_eq!(config.role_arn.as_deref(), Some("arn:aws:iam::222222222222:role/Dev"));
        assert_eq!(prompter.selections(), 1);
    }

    #[test]
    fn test_unknown_configured_role_falls_back_to_prompt() {
        let mut config = config();
        config.role_arn = Some("arn:aws:iam::333333333333:role/Gone".to_string());
        let mut prompter = ScriptedPrompter::new(["1"]);

        let role = resolve_role(&mut config, &roles(), None, &mut prompter).unwrap();
        assert_eq!(role.arn, "arn:aws:iam::111111111111:role/Admin");
    }
}
