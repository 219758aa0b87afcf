//! Voltlane Admin - the service layer behind the administration dashboard.
//!
//! This crate is a policy-enforcing data-access layer for the catalog:
//! brands, catalog components, customers with their order history, and
//! discount codes. The dashboard UI calls entity services; each service
//! composes the store gateway, the authorization check, and the slug
//! deriver into entity-specific operations and returns a uniform
//! [`Envelope`](voltlane_core::Envelope) - no failure ever crosses the
//! service boundary as a panic or raw error.
//!
//! # Modules
//!
//! - [`store`] - the gateway abstracting the hosted relational store
//!   (Postgres in production, an in-memory fake for tests)
//! - [`services`] - one service per entity family plus the authorization
//!   check
//! - [`models`] - domain types decoded from gateway rows
//! - [`config`] - environment-driven configuration
//!
//! # Control flow
//!
//! UI action -> entity service method -> (authorization check if mutating)
//! -> store gateway query -> result envelope -> UI. Each operation is a
//! single logical request/response against the store; there is no retry,
//! no cache, and no background work at this layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::{AdminConfig, PoolConfig};
pub use error::ServiceError;
pub use services::{CallerIdentity, RequestContext};
