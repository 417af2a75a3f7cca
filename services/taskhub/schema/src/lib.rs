//! sea-orm entities for the taskhub database.

pub mod roles;
pub mod task_items;
pub mod teams;
pub mod user_roles;
pub mod users;
