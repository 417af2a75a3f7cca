//! Test utilities for Taskhub services.
//!
//! Provides `MockAuth` for building gateway identity headers.
//! Import from `[dev-dependencies]` only.

pub mod auth;
