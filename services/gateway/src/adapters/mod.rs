//! services/gateway/src/adapters/mod.rs
//!
//! This module contains the concrete implementations ("adapters") of the
//! service ports defined in the `core` crate.

pub mod backend;
