//! Common library for the DevAnswers platform
//!
//! This crate provides shared infrastructure used by the workspace
//! services: database connectivity, pool configuration, and the
//! infrastructure error taxonomy.

pub mod database;
pub mod error;
