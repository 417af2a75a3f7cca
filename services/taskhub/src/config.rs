use serde::Deserialize;

use taskhub_core::config::Config;

/// Taskhub service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskhubConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server. Env var: `TASKHUB_PORT`.
    #[serde(default = "default_port")]
    pub taskhub_port: u16,
    /// Create built-in roles and accounts at startup. Env var: `SEED_DATA_ON_STARTUP`.
    #[serde(default = "default_true")]
    pub seed_data_on_startup: bool,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    #[serde(default)]
    pub admin_phone_number: Option<String>,

    #[serde(default = "default_manager_username")]
    pub manager_username: String,
    #[serde(default = "default_manager_email")]
    pub manager_email: String,
    #[serde(default)]
    pub manager_phone_number: Option<String>,

    #[serde(default = "default_employee_username")]
    pub employee_username: String,
    #[serde(default = "default_employee_email")]
    pub employee_email: String,
    #[serde(default)]
    pub employee_phone_number: Option<String>,
}

impl Config for TaskhubConfig {}

/// One account created by startup seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl TaskhubConfig {
    pub fn admin_account(&self) -> SeedAccount {
        SeedAccount {
            username: self.admin_username.clone(),
            email: self.admin_email.clone(),
            phone_number: self.admin_phone_number.clone(),
        }
    }

    pub fn manager_account(&self) -> SeedAccount {
        SeedAccount {
            username: self.manager_username.clone(),
            email: self.manager_email.clone(),
            phone_number: self.manager_phone_number.clone(),
        }
    }

    pub fn employee_account(&self) -> SeedAccount {
        SeedAccount {
            username: self.employee_username.clone(),
            email: self.employee_email.clone(),
            phone_number: self.employee_phone_number.clone(),
        }
    }
}

fn default_port() -> u16 {
    3120
}

fn default_true() -> bool {
    true
}

fn default_admin_username() -> String {
    "admin".to_owned()
}

fn default_admin_email() -> String {
    "admin@taskhub.local".to_owned()
}

fn default_manager_username() -> String {
    "manager".to_owned()
}

fn default_manager_email() -> String {
    "manager@taskhub.local".to_owned()
}

fn default_employee_username() -> String {
    "employee".to_owned()
}

fn default_employee_email() -> String {
    "employee@taskhub.local".to_owned()
}
