//! Mock identity helpers for tests.
//!
//! Services behind the gateway receive `x-taskhub-user-id` + `x-taskhub-user-roles`
//! headers. `MockAuth` produces those headers directly so no gateway is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use taskhub_auth_types::identity::{USER_ID_HEADER, USER_ROLES_HEADER};
use taskhub_domain::id::UserId;
use taskhub_domain::role::SystemRole;
use uuid::Uuid;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: UserId,
    pub roles: Vec<String>,
}

impl MockAuth {
    pub fn new(user_id: UserId, roles: &[SystemRole]) -> Self {
        Self {
            user_id,
            roles: roles.iter().map(|r| r.name().to_owned()).collect(),
        }
    }

    pub fn admin() -> Self {
        Self::new(UserId(Uuid::new_v4()), &[SystemRole::Admin])
    }

    pub fn manager() -> Self {
        Self::new(UserId(Uuid::new_v4()), &[SystemRole::Manager])
    }

    pub fn employee() -> Self {
        Self::new(UserId(Uuid::new_v4()), &[SystemRole::Employee])
    }

    /// Return headers as if the gateway injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        );
        map.insert(
            HeaderName::from_static(USER_ROLES_HEADER),
            HeaderValue::from_str(&self.roles.join(",")).unwrap(),
        );
        map
    }

    /// Empty-bodied request carrying this identity.
    pub fn request(&self, method: &str, uri: &str) -> Request<()> {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in self.headers().iter() {
            builder = builder.header(name, value);
        }
        builder.body(()).unwrap()
    }
}
