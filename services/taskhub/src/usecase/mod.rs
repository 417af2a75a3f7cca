pub mod role;
pub mod role_assignment;
pub mod task;
pub mod team;
pub mod user;
