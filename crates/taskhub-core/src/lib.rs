//! Ambient building blocks shared by Taskhub services: configuration loading,
//! tracing setup, the JSON response envelope, health checks and middleware.

pub mod config;
pub mod envelope;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
