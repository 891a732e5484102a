//! Repository abstractions.
//!
//! Every entity is mutated only through a [`Repository`]. Rows owned by the laboratory API go
//! through the HTTP repository in `lab-client`; the modules the dashboard historically served
//! from mock arrays (sample registration, methods, auto-approval rules, accreditation,
//! requisitions) use [`InMemoryRepository`], which resets on restart.
//!
//! ## Pure Data Operations
//!
//! This module contains **only** data operations. Session handling, HTTP routing and upstream
//! transport belong in `api-shared`, `api-rest` and `lab-client`.

pub mod audit;
pub mod memory;
pub mod requisitions;
pub mod samples;

pub use audit::AuditLog;
pub use memory::InMemoryRepository;
pub use requisitions::RequisitionService;
pub use samples::send_samples;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::mutation::Mutation;
use crate::LimsResult;

/// A row type that a repository can store.
pub trait Record: Clone + Send + Sync + 'static {
    /// Human-readable entity name used in errors and audit descriptions.
    const KIND: &'static str;

    fn record_id(&self) -> String;

    fn assign_id(&mut self, id: String);

    fn status_label(&self) -> Option<String> {
        None
    }

    /// Field-level checks run before any write is attempted.
    fn validate_record(&self) -> LimsResult<()> {
        Ok(())
    }

    /// Checks a replacement row against the row it replaces. Runs under the write lock.
    fn validate_update(&self, _previous: &Self) -> LimsResult<()> {
        Ok(())
    }

    /// Server-side stamping applied to a newly created row.
    fn on_create(&mut self, _actor: &str, _at: DateTime<Utc>) {}

    /// Server-side stamping applied to a replacement row, given the row it replaces.
    fn on_update(&mut self, _previous: &Self, _actor: &str, _at: DateTime<Utc>) {}
}

/// Outcome of a successfully applied [`Mutation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Applied<T> {
    Created(T),
    Updated(T),
    Deleted { id: String },
}

impl<T> Applied<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Applied::Created(record) | Applied::Updated(record) => Some(record),
            Applied::Deleted { .. } => None,
        }
    }

    pub fn into_record(self) -> Option<T> {
        match self {
            Applied::Created(record) | Applied::Updated(record) => Some(record),
            Applied::Deleted { .. } => None,
        }
    }
}

/// Storage for rows of type `T`.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Returns the full list; there is no server-side paging.
    async fn list(&self) -> LimsResult<Vec<T>>;

    async fn get(&self, id: &str) -> LimsResult<T>;

    /// Applies a create, reason-gated update or reason-gated delete.
    async fn apply(&self, mutation: Mutation<T>, actor: &str) -> LimsResult<Applied<T>>;
}
