//! # LIMS Core
//!
//! Core business logic for the LIMS workflow gateway.
//!
//! This crate contains the workflow model and the rules the dashboard screens consume:
//! - Status vocabularies and chip rendering ([`status`])
//! - Per-row action gating ([`actions`])
//! - Reason-gated mutations and the reason dialog ([`mutation`])
//! - Client-side filtering, sorting, pagination and CSV export ([`listing`])
//! - Repositories, including the in-memory stores and the audit trail ([`repositories`])
//!
//! **No API concerns**: Authentication, HTTP servers, or upstream transport belong in
//! `api-rest`, `api-shared` or `lab-client`.

pub mod actions;
pub mod config;
pub mod constants;
pub mod error;
pub mod listing;
pub mod models;
pub mod mutation;
pub mod repositories;
pub mod status;
pub mod validation;

pub use error::{LimsError, LimsResult};
pub use lims_types::NonEmptyText;

pub use actions::{ActionDispatcher, ActionFlow, RowAction};
pub use config::LimsConfig;
pub use listing::{ListView, Notice, Tabular};
pub use mutation::{Mutation, Reason, ReasonDialog};
pub use repositories::{Applied, AuditLog, InMemoryRepository, Record, Repository};
pub use status::{ChipColor, StatusChip, StatusLabel};
