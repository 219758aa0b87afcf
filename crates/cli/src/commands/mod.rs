//! CLI command implementations.

pub mod migrate;
pub mod profile;
pub mod seed;
