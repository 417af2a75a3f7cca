//! Auth types shared across Taskhub crates.
//!
//! Token issuance happens upstream; services only see the `IdentityHeaders`
//! the gateway injects.

pub mod identity;
