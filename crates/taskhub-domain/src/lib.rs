//! Domain types shared across Taskhub crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers as well as in handlers for wire types.

pub mod id;
pub mod pagination;
pub mod role;
pub mod sort;
pub mod task;
