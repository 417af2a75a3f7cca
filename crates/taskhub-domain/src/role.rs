//! Built-in role names.

use serde::{Deserialize, Serialize};

/// Roles seeded at startup. `Admin` is the protected role: its membership and
/// name can only be established by seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemRole {
    Admin,
    Manager,
    Employee,
}

impl SystemRole {
    pub const ALL: [SystemRole; 3] = [Self::Admin, Self::Manager, Self::Employee];

    /// Display name stored in `roles.name`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Manager => "Manager",
            Self::Employee => "Employee",
        }
    }

    /// Case-folded name stored in `roles.normalized_name`.
    pub fn normalized_name(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Employee => "EMPLOYEE",
        }
    }

    /// Match a role name case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.normalized_name() == normalize_name(name))
    }
}

/// Case-fold a role name or username for uniqueness comparisons.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// True when `name` refers to the protected Admin role, ignoring case.
pub fn is_admin_name(name: &str) -> bool {
    normalize_name(name) == SystemRole::Admin.normalized_name()
}
