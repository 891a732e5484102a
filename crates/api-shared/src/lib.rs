//! # API Shared
//!
//! Shared utilities and definitions for the LIMS gateway APIs.
//!
//! Contains:
//! - Shared services like `HealthService`
//! - Authentication utilities (bearer token and actor extractors)
//! - Response envelopes
//!
//! Used by `api-rest` and the `lims-run` binary for common functionality.

pub mod auth;
pub mod envelope;
pub mod health;

pub use auth::{Actor, AuthError, BearerToken};
pub use envelope::{Envelope, ErrorBody};
pub use health::{HealthRes, HealthService};
