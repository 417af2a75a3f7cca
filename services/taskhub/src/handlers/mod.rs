use serde::Serialize;
use serde::de::DeserializeOwned;

use taskhub_auth_types::identity::IdentityHeaders;
use taskhub_domain::role::SystemRole;

use crate::domain::types::AssignmentOutcome;
use crate::error::TaskhubError;

pub mod health;
pub mod permissions;
pub mod roles;
pub mod tasks;
pub mod teams;
pub mod users;

/// 403 unless the caller holds at least one of `roles`.
pub fn require_any(identity: &IdentityHeaders, roles: &[SystemRole]) -> Result<(), TaskhubError> {
    if identity.has_any_role(roles) {
        Ok(())
    } else {
        Err(TaskhubError::Forbidden)
    }
}

/// Parse a raw query string with `serde_qs`; an absent query yields `T::default()`.
pub fn parse_query<T>(raw: Option<String>) -> Result<T, TaskhubError>
where
    T: DeserializeOwned + Default,
{
    raw.as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| TaskhubError::validation(format!("invalid query string: {e}")))
        .map(Option::unwrap_or_default)
}

/// Delta sizes reported by the reconciliation endpoints.
#[derive(Debug, Serialize)]
pub struct AssignmentSummary {
    pub removed: usize,
    pub added: usize,
}

impl From<&AssignmentOutcome> for AssignmentSummary {
    fn from(outcome: &AssignmentOutcome) -> Self {
        Self {
            removed: outcome.removed,
            added: outcome.added,
        }
    }
}
