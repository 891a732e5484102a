//! Per-row action menus and their gating.
//!
//! A row exposes a fixed menu. Whether an entry is enabled depends only on the row's current
//! status, and each entry resolves to one [`ActionFlow`]: fire immediately, ask for
//! confirmation, or capture text first. [`ActionDispatcher`] keeps at most one dialog open per
//! row.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::status::RequisitionStatus;
use crate::{LimsError, LimsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum RowAction {
    ViewDetails,
    PrintBarcode,
    AddRemarks,
    Approve,
    Cancel,
    GenerateTrf,
    ViewAuditTrail,
}

/// What selecting an action does before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFlow {
    /// Fire the request straight away (print, export, view).
    Immediate,
    /// Ask for a yes/no confirmation.
    Confirm,
    /// Capture a non-empty reason.
    Reason,
    /// Capture a non-empty remark.
    Remark,
}

impl RowAction {
    pub const ALL: [RowAction; 7] = [
        RowAction::ViewDetails,
        RowAction::PrintBarcode,
        RowAction::AddRemarks,
        RowAction::Approve,
        RowAction::Cancel,
        RowAction::GenerateTrf,
        RowAction::ViewAuditTrail,
    ];

    pub fn flow(self) -> ActionFlow {
        match self {
            RowAction::ViewDetails
            | RowAction::PrintBarcode
            | RowAction::GenerateTrf
            | RowAction::ViewAuditTrail => ActionFlow::Immediate,
            RowAction::Approve => ActionFlow::Confirm,
            RowAction::Cancel => ActionFlow::Reason,
            RowAction::AddRemarks => ActionFlow::Remark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RowAction::ViewDetails => "View Details",
            RowAction::PrintBarcode => "Print Barcode",
            RowAction::AddRemarks => "Add Remarks",
            RowAction::Approve => "Approve",
            RowAction::Cancel => "Cancel",
            RowAction::GenerateTrf => "Generate TRF",
            RowAction::ViewAuditTrail => "View Audit Trail",
        }
    }
}

/// Whether `action` is enabled for a requisition in `status`.
///
/// Approve and Cancel require exactly `Pending Approval`. Printing and TRF generation are
/// hidden once a requisition is cancelled.
pub fn requisition_action_enabled(action: RowAction, status: &RequisitionStatus) -> bool {
    match action {
        RowAction::Approve | RowAction::Cancel => *status == RequisitionStatus::PendingApproval,
        RowAction::PrintBarcode | RowAction::GenerateTrf => {
            *status != RequisitionStatus::Cancelled
        }
        RowAction::ViewDetails | RowAction::AddRemarks | RowAction::ViewAuditTrail => true,
    }
}

/// Enabled menu entries for a requisition, in menu order.
pub fn requisition_actions(status: &RequisitionStatus) -> Vec<RowAction> {
    RowAction::ALL
        .into_iter()
        .filter(|action| requisition_action_enabled(*action, status))
        .collect()
}

/// Tracks which rows currently have a dialog open.
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    open: HashMap<String, RowAction>,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `action` on `row_id`.
    ///
    /// Immediate actions are not tracked. Dialog actions occupy the row until
    /// [`ActionDispatcher::finish`] is called.
    ///
    /// # Errors
    ///
    /// - [`LimsError::ActionNotAllowed`] when the action is disabled for `status`,
    /// - [`LimsError::DialogAlreadyOpen`] when the row already has a dialog open.
    pub fn begin(
        &mut self,
        row_id: &str,
        action: RowAction,
        status: &RequisitionStatus,
    ) -> LimsResult<ActionFlow> {
        if !requisition_action_enabled(action, status) {
            return Err(LimsError::ActionNotAllowed {
                action: action.label().to_string(),
                status: status.label().to_string(),
            });
        }

        let flow = action.flow();
        if flow == ActionFlow::Immediate {
            return Ok(flow);
        }

        if self.open.contains_key(row_id) {
            return Err(LimsError::DialogAlreadyOpen(row_id.to_string()));
        }
        self.open.insert(row_id.to_string(), action);
        Ok(flow)
    }

    pub fn finish(&mut self, row_id: &str) -> Option<RowAction> {
        self.open.remove(row_id)
    }

    pub fn open_action(&self, row_id: &str) -> Option<RowAction> {
        self.open.get(row_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_and_cancel_only_for_pending_approval() {
        let pending = RequisitionStatus::PendingApproval;
        assert!(requisition_action_enabled(RowAction::Approve, &pending));
        assert!(requisition_action_enabled(RowAction::Cancel, &pending));

        for status in [
            RequisitionStatus::Approved,
            RequisitionStatus::Cancelled,
            RequisitionStatus::Unknown("pending approval".into()),
            RequisitionStatus::Unknown("Pending  Approval".into()),
            RequisitionStatus::Unknown(String::new()),
        ] {
            assert!(!requisition_action_enabled(RowAction::Approve, &status), "{status:?}");
            assert!(!requisition_action_enabled(RowAction::Cancel, &status), "{status:?}");
        }
    }

    #[test]
    fn cancelled_requisition_menu() {
        assert_eq!(
            requisition_actions(&RequisitionStatus::Cancelled),
            vec![
                RowAction::ViewDetails,
                RowAction::AddRemarks,
                RowAction::ViewAuditTrail
            ]
        );
    }

    #[test]
    fn cancel_captures_a_reason_and_approve_only_confirms() {
        assert_eq!(RowAction::Cancel.flow(), ActionFlow::Reason);
        assert_eq!(RowAction::Approve.flow(), ActionFlow::Confirm);
        assert_eq!(RowAction::PrintBarcode.flow(), ActionFlow::Immediate);
    }

    #[test]
    fn one_dialog_per_row() {
        let mut dispatcher = ActionDispatcher::new();
        let pending = RequisitionStatus::PendingApproval;

        assert_eq!(
            dispatcher.begin("R1", RowAction::Cancel, &pending).expect("cancel"),
            ActionFlow::Reason
        );
        let err = dispatcher
            .begin("R1", RowAction::Approve, &pending)
            .expect_err("second dialog");
        assert!(matches!(err, LimsError::DialogAlreadyOpen(row) if row == "R1"));

        assert_eq!(
            dispatcher.begin("R1", RowAction::PrintBarcode, &pending).expect("print"),
            ActionFlow::Immediate
        );
        assert_eq!(
            dispatcher.begin("R2", RowAction::Approve, &pending).expect("other row"),
            ActionFlow::Confirm
        );

        assert_eq!(dispatcher.finish("R1"), Some(RowAction::Cancel));
        assert!(dispatcher.begin("R1", RowAction::Approve, &pending).is_ok());
    }

    #[test]
    fn disabled_action_is_refused() {
        let mut dispatcher = ActionDispatcher::new();
        let err = dispatcher
            .begin("R1", RowAction::Approve, &RequisitionStatus::Approved)
            .expect_err("approved is terminal");
        assert!(matches!(err, LimsError::ActionNotAllowed { .. }));
        assert_eq!(dispatcher.open_action("R1"), None);
    }
}
