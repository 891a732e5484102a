//! # Lab Client
//!
//! HTTP access to the upstream laboratory API (`/v1/...`).
//!
//! - [`LabApiClient`]: bearer-authenticated JSON and raw calls, one method per upstream route
//! - [`HttpMasterRepository`]: the master data [`lims_core::Repository`] backed by that API
//! - [`LabClientError`]: transport and upstream failures, convertible into `LimsError`

pub mod client;
pub mod error;
pub mod master;

pub use client::{LabApiClient, RawResponse};
pub use error::{upstream_message, LabClientError, LabClientResult};
pub use master::HttpMasterRepository;
