//! Test requisitions and their approval state machine.
//!
//! ```text
//! Pending Approval --approve--> Approved
//! Pending Approval --cancel(reason)--> Cancelled
//! ```
//!
//! Approved and Cancelled are terminal. Approve does not take a reason.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::actions::{requisition_actions, RowAction};
use crate::listing::Tabular;
use crate::mutation::Reason;
use crate::repositories::Record;
use crate::status::{RequisitionStatus, StatusChip, StatusLabel};
use crate::{LimsError, LimsResult};

fn pending_approval() -> RequisitionStatus {
    RequisitionStatus::PendingApproval
}

fn validate_requested_items(req: &Requisition) -> Result<(), ValidationError> {
    if req.tests.is_empty() && req.panels.is_empty() {
        let mut err = ValidationError::new("no_tests");
        err.message = Some("a requisition needs at least one test or panel".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_requested_items"))]
pub struct Requisition {
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, message = "sampleId is required"))]
    pub sample_id: String,
    #[serde(default)]
    pub tests: Vec<String>,
    #[serde(default)]
    pub panels: Vec<String>,
    #[serde(default)]
    pub requested_by: Option<String>,
    #[serde(default)]
    pub requested_on: Option<DateTime<Utc>>,
    #[serde(default = "pending_approval")]
    #[schema(value_type = String, example = "Pending Approval")]
    pub status: RequisitionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_on: Option<DateTime<Utc>>,
}

impl Requisition {
    /// # Errors
    ///
    /// Returns [`LimsError::InvalidTransition`] unless the status is exactly `Pending Approval`.
    pub fn approve(&mut self, actor: &str, at: DateTime<Utc>) -> LimsResult<()> {
        self.ensure_pending("approve")?;
        self.status = RequisitionStatus::Approved;
        self.decided_by = Some(actor.to_string());
        self.decided_on = Some(at);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`LimsError::InvalidTransition`] unless the status is exactly `Pending Approval`.
    pub fn cancel(&mut self, reason: &Reason, actor: &str, at: DateTime<Utc>) -> LimsResult<()> {
        self.ensure_pending("cancel")?;
        self.status = RequisitionStatus::Cancelled;
        self.cancellation_reason = Some(reason.as_str().to_string());
        self.decided_by = Some(actor.to_string());
        self.decided_on = Some(at);
        Ok(())
    }

    fn ensure_pending(&self, action: &str) -> LimsResult<()> {
        if self.status != RequisitionStatus::PendingApproval {
            return Err(LimsError::InvalidTransition {
                from: self.status.label().to_string(),
                action: action.to_string(),
            });
        }
        Ok(())
    }
}

impl Record for Requisition {
    const KIND: &'static str = "requisition";

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn status_label(&self) -> Option<String> {
        Some(self.status.label().to_string())
    }

    fn validate_record(&self) -> LimsResult<()> {
        self.validate()?;
        if self.status == RequisitionStatus::Cancelled && self.cancellation_reason.is_none() {
            return Err(LimsError::ReasonRequired);
        }
        Ok(())
    }

    fn on_create(&mut self, actor: &str, at: DateTime<Utc>) {
        self.status = RequisitionStatus::PendingApproval;
        self.cancellation_reason = None;
        self.decided_by = None;
        self.decided_on = None;
        if self.requested_by.is_none() {
            self.requested_by = Some(actor.to_string());
        }
        self.requested_on.get_or_insert(at);
    }
}

impl Tabular for Requisition {
    fn headers() -> Vec<&'static str> {
        vec![
            "Requisition ID",
            "Sample ID",
            "Tests",
            "Panels",
            "Requested By",
            "Status",
            "Cancellation Reason",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.sample_id.clone(),
            self.tests.join("; "),
            self.panels.join("; "),
            self.requested_by.clone().unwrap_or_default(),
            self.status.label().to_string(),
            self.cancellation_reason.clone().unwrap_or_default(),
        ]
    }
}

/// A requisition as listed, with its rendered status and enabled menu.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionRow {
    #[serde(flatten)]
    pub requisition: Requisition,
    pub status_chip: StatusChip,
    pub available_actions: Vec<RowAction>,
}

impl From<Requisition> for RequisitionRow {
    fn from(requisition: Requisition) -> Self {
        Self {
            status_chip: requisition.status.chip(),
            available_actions: requisition_actions(&requisition.status),
            requisition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending() -> Requisition {
        serde_json::from_value(json!({
            "id": "R1",
            "sampleId": "S1",
            "tests": ["CBC"],
        }))
        .expect("parse")
    }

    #[test]
    fn approve_moves_to_terminal_approved() {
        let mut req = pending();
        req.approve("qa", Utc::now()).expect("approve");
        assert_eq!(req.status, RequisitionStatus::Approved);
        assert_eq!(req.decided_by.as_deref(), Some("qa"));

        let reason = Reason::parse("changed mind").expect("reason");
        assert!(matches!(
            req.cancel(&reason, "qa", Utc::now()),
            Err(LimsError::InvalidTransition { .. })
        ));
        assert!(req.approve("qa", Utc::now()).is_err());
    }

    #[test]
    fn cancel_records_reason() {
        let mut req = pending();
        let reason = Reason::parse("  wrong panel ordered ").expect("reason");
        req.cancel(&reason, "qa", Utc::now()).expect("cancel");
        assert_eq!(req.status, RequisitionStatus::Cancelled);
        assert_eq!(req.cancellation_reason.as_deref(), Some("wrong panel ordered"));
        assert!(req.approve("qa", Utc::now()).is_err());
    }

    #[test]
    fn lowercase_pending_is_not_actionable() {
        let mut req: Requisition = serde_json::from_value(json!({
            "id": "R2",
            "sampleId": "S1",
            "tests": ["CBC"],
            "status": "pending approval"
        }))
        .expect("parse");
        assert!(req.approve("qa", Utc::now()).is_err());

        let row = RequisitionRow::from(req.clone());
        assert!(!row.available_actions.contains(&RowAction::Approve));
        assert!(!row.available_actions.contains(&RowAction::Cancel));
    }

    #[test]
    fn row_serialises_flat() {
        let row = RequisitionRow::from(pending());
        let value = serde_json::to_value(&row).expect("render");
        assert_eq!(value["id"], "R1");
        assert_eq!(value["status"], "Pending Approval");
        assert_eq!(value["statusChip"]["color"], "warning");
        assert!(value["availableActions"]
            .as_array()
            .expect("array")
            .contains(&json!("approve")));
        assert!(value.get("cancellationReason").is_none());
    }

    #[test]
    fn requisition_needs_a_test_or_panel() {
        let req: Requisition =
            serde_json::from_value(json!({"sampleId": "S1"})).expect("parse");
        assert!(req.validate_record().is_err());
    }
}
