//! Reason-gated mutations.
//!
//! Any change that is not a pure create must carry a written justification. For several
//! master records the upstream API hard-deletes the row, so the reason is the only audit
//! artefact left behind.
//!
//! The rule is enforced in two places:
//! - [`Mutation`] cannot express an update or delete without a [`Reason`], and a `Reason`
//!   cannot be built from blank text.
//! - [`ReasonDialog`] models the capture flow (optional confirmation, reason entry, submit) and
//!   refuses to submit while the trimmed draft is empty, so no repository call is issued.

use lims_types::{NonEmptyText, TextError};
use serde::{Deserialize, Serialize};

use crate::listing::{ListView, Tabular};
use crate::repositories::{Applied, Record, Repository};
use crate::{LimsError, LimsResult};

/// A validated, non-empty justification for a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reason(NonEmptyText);

impl Reason {
    /// # Errors
    ///
    /// Returns [`LimsError::ReasonRequired`] when `text` is empty after trimming.
    pub fn parse(text: &str) -> LimsResult<Self> {
        match NonEmptyText::new(text) {
            Ok(inner) => Ok(Self(inner)),
            Err(TextError::Empty) => Err(LimsError::ReasonRequired),
            Err(other) => Err(other.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

/// A change to a record of type `T`, as presented to a [`Repository`].
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation<T> {
    Create(T),
    Update { id: String, payload: T, reason: Reason },
    Delete { id: String, reason: Reason },
}

impl<T> Mutation<T> {
    pub fn update(id: impl Into<String>, payload: T, reason: &str) -> LimsResult<Self> {
        Ok(Mutation::Update {
            id: id.into(),
            payload,
            reason: Reason::parse(reason)?,
        })
    }

    pub fn delete(id: impl Into<String>, reason: &str) -> LimsResult<Self> {
        Ok(Mutation::Delete {
            id: id.into(),
            reason: Reason::parse(reason)?,
        })
    }

    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create(_) => MutationKind::Create,
            Mutation::Update { .. } => MutationKind::Update,
            Mutation::Delete { .. } => MutationKind::Delete,
        }
    }

    pub fn reason(&self) -> Option<&Reason> {
        match self {
            Mutation::Create(_) => None,
            Mutation::Update { reason, .. } | Mutation::Delete { reason, .. } => Some(reason),
        }
    }

    pub fn target_id(&self) -> Option<&str> {
        match self {
            Mutation::Create(_) => None,
            Mutation::Update { id, .. } | Mutation::Delete { id, .. } => Some(id),
        }
    }
}

/// Where a reason dialog currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Confirming,
    AwaitingReason,
    Submitting,
    /// The last submission failed; the dialog stays open with the message.
    Failed(String),
}

/// Capture flow for a reason-gated action on one row.
#[derive(Debug, Clone)]
pub struct ReasonDialog {
    row_id: String,
    needs_confirmation: bool,
    state: DialogState,
    draft: String,
}

impl ReasonDialog {
    pub fn new(row_id: impl Into<String>, needs_confirmation: bool) -> Self {
        Self {
            row_id: row_id.into(),
            needs_confirmation,
            state: DialogState::Closed,
            draft: String::new(),
        }
    }

    pub fn row_id(&self) -> &str {
        &self.row_id
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != DialogState::Closed
    }

    pub fn open(&mut self) -> LimsResult<()> {
        if self.is_open() {
            return Err(LimsError::DialogAlreadyOpen(self.row_id.clone()));
        }
        self.draft.clear();
        self.state = if self.needs_confirmation {
            DialogState::Confirming
        } else {
            DialogState::AwaitingReason
        };
        Ok(())
    }

    pub fn confirm(&mut self) -> LimsResult<()> {
        match self.state {
            DialogState::Confirming => {
                self.state = DialogState::AwaitingReason;
                Ok(())
            }
            _ => Err(LimsError::DialogNotOpen),
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        matches!(
            self.state,
            DialogState::AwaitingReason | DialogState::Failed(_)
        ) && NonEmptyText::is_acceptable(&self.draft)
    }

    /// Validates the draft and moves to `Submitting`.
    ///
    /// # Errors
    ///
    /// - [`LimsError::DialogNotOpen`] when the dialog is not waiting for a reason (this
    ///   includes a submission already in flight),
    /// - [`LimsError::ReasonRequired`] when the trimmed draft is empty; the state is unchanged.
    pub fn begin_submit(&mut self) -> LimsResult<Reason> {
        if !matches!(
            self.state,
            DialogState::AwaitingReason | DialogState::Failed(_)
        ) {
            return Err(LimsError::DialogNotOpen);
        }
        let reason = Reason::parse(&self.draft)?;
        self.state = DialogState::Submitting;
        Ok(reason)
    }

    /// Settles a submission: success closes the dialog, failure keeps it open.
    pub fn resolve<T>(&mut self, outcome: &LimsResult<T>) {
        if self.state != DialogState::Submitting {
            return;
        }
        match outcome {
            Ok(_) => {
                self.state = DialogState::Closed;
                self.draft.clear();
            }
            Err(err) => self.state = DialogState::Failed(err.to_string()),
        }
    }

    pub fn close(&mut self) {
        self.state = DialogState::Closed;
        self.draft.clear();
    }
}

/// Applies `mutation` and refetches the whole list on success.
///
/// On failure the view is left untouched and the error is returned to the caller.
pub async fn submit_mutation<T, R>(
    repo: &R,
    view: &mut ListView<T>,
    mutation: Mutation<T>,
    actor: &str,
) -> LimsResult<Applied<T>>
where
    T: Record + Tabular,
    R: Repository<T> + ?Sized,
{
    let kind = mutation.kind();
    let applied = match repo.apply(mutation, actor).await {
        Ok(applied) => applied,
        Err(e) => {
            tracing::error!("{} {} failed: {:?}", kind.as_str(), T::KIND, e);
            return Err(e);
        }
    };

    if let Some(notice) = view.refresh(repo).await {
        tracing::warn!("refetch after {} failed: {}", kind.as_str(), notice.message);
    }

    Ok(applied)
}

/// Drives a [`ReasonDialog`] through one submission of a reason-gated mutation.
///
/// `build` receives the validated reason and produces the mutation. No repository call is
/// made when the draft is blank.
pub async fn submit_with_reason<T, R, F>(
    dialog: &mut ReasonDialog,
    repo: &R,
    view: &mut ListView<T>,
    actor: &str,
    build: F,
) -> LimsResult<Applied<T>>
where
    T: Record + Tabular,
    R: Repository<T> + ?Sized,
    F: FnOnce(Reason) -> Mutation<T>,
{
    let reason = dialog.begin_submit()?;
    let outcome = submit_mutation(repo, view, build(reason), actor).await;
    dialog.resolve(&outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MasterRecord, Sample};
    use crate::repositories::{AuditLog, InMemoryRepository};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn sample(id: &str, name: &str) -> Sample {
        serde_json::from_value(json!({"sampleId": id, "name": name})).expect("sample")
    }

    /// Repository that counts calls and always fails writes.
    struct RejectingRepo {
        rows: Vec<Sample>,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl Repository<Sample> for RejectingRepo {
        async fn list(&self) -> LimsResult<Vec<Sample>> {
            Ok(self.rows.clone())
        }

        async fn get(&self, id: &str) -> LimsResult<Sample> {
            self.rows
                .iter()
                .find(|s| s.sample_id == id)
                .cloned()
                .ok_or_else(|| LimsError::NotFound {
                    kind: Sample::KIND,
                    id: id.to_string(),
                })
        }

        async fn apply(
            &self,
            _mutation: Mutation<Sample>,
            _actor: &str,
        ) -> LimsResult<Applied<Sample>> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(LimsError::Upstream {
                status: 503,
                message: "backend unavailable".into(),
            })
        }
    }

    #[test]
    fn reason_rejects_blank_and_accepts_any_text() {
        for blank in ["", " ", "\t\n", "   \r\n  "] {
            assert!(matches!(Reason::parse(blank), Err(LimsError::ReasonRequired)));
        }
        for text in ["x", " duplicate entry ", "typo in name", "误录"] {
            let reason = Reason::parse(text).expect("should accept");
            assert_eq!(reason.as_str(), text.trim());
        }
    }

    #[test]
    fn mutation_constructors_enforce_reason() {
        assert!(Mutation::<MasterRecord>::delete("7", "  ").is_err());
        let m = Mutation::<MasterRecord>::delete("7", "retired").expect("delete");
        assert_eq!(m.kind(), MutationKind::Delete);
        assert_eq!(m.target_id(), Some("7"));
        assert_eq!(m.reason().map(Reason::as_str), Some("retired"));
    }

    #[test]
    fn dialog_blocks_submit_until_reason_entered() {
        let mut dialog = ReasonDialog::new("S1", true);
        dialog.open().expect("open");
        assert_eq!(dialog.state(), &DialogState::Confirming);
        assert!(!dialog.can_submit());
        dialog.confirm().expect("confirm");

        dialog.set_draft("   ");
        assert!(!dialog.can_submit());
        assert!(matches!(dialog.begin_submit(), Err(LimsError::ReasonRequired)));
        assert_eq!(dialog.state(), &DialogState::AwaitingReason);

        dialog.set_draft("sample haemolysed");
        assert!(dialog.can_submit());
        let reason = dialog.begin_submit().expect("submit");
        assert_eq!(reason.as_str(), "sample haemolysed");
        assert_eq!(dialog.state(), &DialogState::Submitting);
        assert!(matches!(dialog.begin_submit(), Err(LimsError::DialogNotOpen)));
    }

    #[test]
    fn dialog_cannot_be_opened_twice() {
        let mut dialog = ReasonDialog::new("S1", false);
        dialog.open().expect("open");
        assert!(matches!(dialog.open(), Err(LimsError::DialogAlreadyOpen(row)) if row == "S1"));
    }

    #[tokio::test]
    async fn blank_reason_issues_no_call() {
        let repo = RejectingRepo {
            rows: vec![sample("S1", "Alice")],
            writes: AtomicUsize::new(0),
        };
        let mut view = ListView::default();
        view.refresh(&repo).await;

        let mut dialog = ReasonDialog::new("S1", false);
        dialog.open().expect("open");
        dialog.set_draft(" ");
        let result = submit_with_reason(&mut dialog, &repo, &mut view, "u1", |reason| {
            Mutation::Delete {
                id: "S1".into(),
                reason,
            }
        })
        .await;

        assert!(matches!(result, Err(LimsError::ReasonRequired)));
        assert_eq!(repo.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_write_keeps_dialog_open_and_rows_unchanged() {
        let repo = RejectingRepo {
            rows: vec![sample("S1", "Alice"), sample("S2", "Bob")],
            writes: AtomicUsize::new(0),
        };
        let mut view = ListView::default();
        view.refresh(&repo).await;

        let mut dialog = ReasonDialog::new("S1", false);
        dialog.open().expect("open");
        dialog.set_draft("duplicate registration");
        let result = submit_with_reason(&mut dialog, &repo, &mut view, "u1", |reason| {
            Mutation::Delete {
                id: "S1".into(),
                reason,
            }
        })
        .await;

        assert!(matches!(result, Err(LimsError::Upstream { status: 503, .. })));
        assert_eq!(repo.writes.load(Ordering::SeqCst), 1);
        assert!(matches!(dialog.state(), DialogState::Failed(msg) if msg.contains("backend unavailable")));
        assert!(dialog.can_submit(), "resubmission should be possible");
        assert_eq!(view.len(), 2);
    }

    #[tokio::test]
    async fn successful_delete_closes_dialog_and_refetches() {
        let audit = Arc::new(AuditLog::default());
        let repo = InMemoryRepository::with_rows(
            vec![sample("S1", "Alice"), sample("S2", "Bob")],
            audit.clone(),
        );
        let mut view = ListView::default();
        view.refresh(&repo).await;

        let mut dialog = ReasonDialog::new("S1", true);
        dialog.open().expect("open");
        dialog.confirm().expect("confirm");
        dialog.set_draft("registered twice");
        submit_with_reason(&mut dialog, &repo, &mut view, "u1", |reason| {
            Mutation::Delete {
                id: "S1".into(),
                reason,
            }
        })
        .await
        .expect("delete should succeed");

        assert_eq!(dialog.state(), &DialogState::Closed);
        assert_eq!(view.len(), 1);
        let trail = audit.for_record("S1");
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].reason.as_deref(), Some("registered twice"));
    }
}
