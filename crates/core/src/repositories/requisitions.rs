//! Requisition workflow on top of the in-memory store.

use std::sync::Arc;

use chrono::Utc;

use crate::models::{Requisition, RequisitionRow};
use crate::mutation::{Mutation, Reason};
use crate::repositories::{AuditLog, InMemoryRepository, Record, Repository};
use crate::{LimsError, LimsResult};

#[derive(Debug)]
pub struct RequisitionService {
    repo: InMemoryRepository<Requisition>,
}

impl RequisitionService {
    pub fn new(audit: Arc<AuditLog>) -> Self {
        Self {
            repo: InMemoryRepository::new(audit),
        }
    }

    pub fn with_rows(rows: Vec<Requisition>, audit: Arc<AuditLog>) -> Self {
        Self {
            repo: InMemoryRepository::with_rows(rows, audit),
        }
    }

    pub fn repository(&self) -> &InMemoryRepository<Requisition> {
        &self.repo
    }

    /// All requisitions with their rendered status and enabled actions.
    pub async fn list_rows(&self) -> LimsResult<Vec<RequisitionRow>> {
        Ok(self
            .repo
            .list()
            .await?
            .into_iter()
            .map(RequisitionRow::from)
            .collect())
    }

    /// Creates a requisition in `Pending Approval`, whatever status the payload carried.
    pub async fn create(&self, requisition: Requisition, actor: &str) -> LimsResult<RequisitionRow> {
        let applied = self.repo.apply(Mutation::Create(requisition), actor).await?;
        let created = applied.into_record().ok_or_else(|| {
            LimsError::InvalidInput("create did not return a requisition".into())
        })?;
        Ok(RequisitionRow::from(created))
    }

    /// Approves a pending requisition. No reason is captured.
    pub fn approve(&self, id: &str, actor: &str) -> LimsResult<RequisitionRow> {
        let at = Utc::now();
        let approved = self.repo.update_in_place(id, |req| req.approve(actor, at))?;
        self.repo.audit().record(
            id,
            "approve",
            format!("{} approved", Requisition::KIND),
            actor,
            at,
            approved.status_label(),
            None,
        );
        Ok(RequisitionRow::from(approved))
    }

    /// Cancels a pending requisition, recording the reason on the row and in the audit trail.
    pub fn cancel(&self, id: &str, reason: &Reason, actor: &str) -> LimsResult<RequisitionRow> {
        let at = Utc::now();
        let cancelled = self
            .repo
            .update_in_place(id, |req| req.cancel(reason, actor, at))?;
        self.repo.audit().record(
            id,
            "cancel",
            format!("{} cancelled", Requisition::KIND),
            actor,
            at,
            cancelled.status_label(),
            Some(reason.as_str()),
        );
        Ok(RequisitionRow::from(cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::RowAction;
    use crate::status::RequisitionStatus;
    use serde_json::json;

    fn service() -> RequisitionService {
        let rows = vec![
            serde_json::from_value(json!({
                "id": "R1", "sampleId": "S1", "tests": ["CBC"]
            }))
            .expect("R1"),
            serde_json::from_value(json!({
                "id": "R2", "sampleId": "S2", "panels": ["LFT"], "status": "Approved"
            }))
            .expect("R2"),
        ];
        RequisitionService::with_rows(rows, Arc::new(AuditLog::new()))
    }

    #[tokio::test]
    async fn cancel_records_reason_on_row_and_trail() {
        let svc = service();
        let reason = Reason::parse("patient withdrew").expect("reason");
        let row = svc.cancel("R1", &reason, "qa").expect("cancel");

        assert_eq!(row.requisition.status, RequisitionStatus::Cancelled);
        assert_eq!(
            row.requisition.cancellation_reason.as_deref(),
            Some("patient withdrew")
        );
        assert!(!row.available_actions.contains(&RowAction::Approve));

        let trail = svc.repository().audit().for_record("R1");
        assert_eq!(trail.last().map(|e| e.action.as_str()), Some("cancel"));
        assert_eq!(
            trail.last().and_then(|e| e.reason.as_deref()),
            Some("patient withdrew")
        );
    }

    #[tokio::test]
    async fn terminal_requisitions_refuse_transitions() {
        let svc = service();
        let err = svc.approve("R2", "qa").expect_err("already approved");
        assert!(matches!(err, LimsError::InvalidTransition { .. }));

        let stored = svc.repository().get("R2").await.expect("get");
        assert_eq!(stored.status, RequisitionStatus::Approved);
        assert!(svc.repository().audit().for_record("R2").is_empty());
    }

    #[tokio::test]
    async fn create_forces_pending_approval() {
        let svc = service();
        let req: Requisition = serde_json::from_value(json!({
            "sampleId": "S3",
            "tests": ["HB"],
            "status": "Approved"
        }))
        .expect("parse");
        let row = svc.create(req, "clerk").await.expect("create");
        assert_eq!(row.requisition.status, RequisitionStatus::PendingApproval);
        assert_eq!(row.requisition.requested_by.as_deref(), Some("clerk"));
        assert!(row.available_actions.contains(&RowAction::Approve));
        assert_eq!(svc.list_rows().await.expect("list").len(), 3);
    }
}
