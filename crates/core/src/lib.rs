//! Voltlane Core - Shared types library.
//!
//! This crate provides common types used across all Voltlane components:
//! - `admin` - Service layer behind the administration dashboard
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, roles, emails, prices,
//!   and the result envelope every service operation returns
//! - [`slug`] - URL-safe slug derivation from display names

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod slug;
pub mod types;

pub use types::*;
