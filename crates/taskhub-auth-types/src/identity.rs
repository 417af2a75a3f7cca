//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use taskhub_domain::id::UserId;
use taskhub_domain::role::{SystemRole, normalize_name};

pub const USER_ID_HEADER: &str = "x-taskhub-user-id";
pub const USER_ROLES_HEADER: &str = "x-taskhub-user-roles";

/// Caller identity injected by the gateway via `x-taskhub-user-id` and
/// `x-taskhub-user-roles` (comma-separated role names).
///
/// Returns 401 if either header is absent or the user id is not a UUID.
/// An empty roles header means the caller holds no role.
/// Role enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone)]
pub struct IdentityHeaders {
    pub user_id: UserId,
    pub roles: Vec<String>,
}

impl IdentityHeaders {
    pub fn has_role(&self, role: SystemRole) -> bool {
        self.roles
            .iter()
            .any(|name| normalize_name(name) == role.normalized_name())
    }

    pub fn has_any_role(&self, roles: &[SystemRole]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }
}

fn parse_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract values synchronously and return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok())
            .map(UserId);

        let roles = parts
            .headers
            .get(USER_ROLES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(parse_roles);

        async move {
            let user_id = user_id.ok_or(StatusCode::UNAUTHORIZED)?;
            let roles = roles.ok_or(StatusCode::UNAUTHORIZED)?;
            Ok(Self { user_id, roles })
        }
    }
}
