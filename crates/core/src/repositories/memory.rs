//! In-memory repository for the modules without an upstream endpoint.
//!
//! Rows keep insertion order so that repeated reads of an unchanged store return identical
//! lists. Every applied mutation is appended to the shared [`AuditLog`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::mutation::{Mutation, MutationKind};
use crate::repositories::{Applied, AuditLog, Record, Repository};
use crate::validation::validate_record_id;
use crate::{LimsError, LimsResult};

#[derive(Debug)]
pub struct InMemoryRepository<T> {
    rows: RwLock<Vec<T>>,
    audit: Arc<AuditLog>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new(audit: Arc<AuditLog>) -> Self {
        Self::with_rows(Vec::new(), audit)
    }

    /// Seeds the store. Seed rows are not audited.
    pub fn with_rows(rows: Vec<T>, audit: Arc<AuditLog>) -> Self {
        Self {
            rows: RwLock::new(rows),
            audit,
        }
    }

    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.rows.read().clone()
    }

    /// Mutates one row in place.
    ///
    /// `change` works on a copy; the stored row is replaced only when it returns `Ok` and the
    /// result still validates. Auditing is left to the caller.
    pub fn update_in_place<F>(&self, id: &str, change: F) -> LimsResult<T>
    where
        F: FnOnce(&mut T) -> LimsResult<()>,
    {
        let mut rows = self.rows.write();
        let slot = rows
            .iter_mut()
            .find(|r| r.record_id() == id)
            .ok_or_else(|| not_found::<T>(id))?;

        let mut updated = slot.clone();
        change(&mut updated)?;
        updated.validate_record()?;
        updated.validate_update(slot)?;
        *slot = updated.clone();
        Ok(updated)
    }

    /// Mutates several rows under a single write guard.
    ///
    /// Returns one entry per id, `None` where no row is stored. If `change` or validation fails
    /// for any row, no row is replaced. Auditing is left to the caller.
    pub fn update_many<F>(&self, ids: &[&str], mut change: F) -> LimsResult<Vec<Option<T>>>
    where
        F: FnMut(&mut T) -> LimsResult<()>,
    {
        let mut rows = self.rows.write();
        let mut staged: Vec<(usize, T)> = Vec::with_capacity(ids.len());
        let mut results = Vec::with_capacity(ids.len());

        for id in ids {
            let Some(idx) = rows.iter().position(|r| r.record_id() == *id) else {
                results.push(None);
                continue;
            };
            let mut updated = rows[idx].clone();
            change(&mut updated)?;
            updated.validate_record()?;
            updated.validate_update(&rows[idx])?;
            staged.push((idx, updated.clone()));
            results.push(Some(updated));
        }

        for (idx, updated) in staged {
            rows[idx] = updated;
        }
        Ok(results)
    }

    fn create(&self, mut record: T, actor: &str) -> LimsResult<T> {
        record.validate_record()?;
        let at = Utc::now();

        let mut rows = self.rows.write();
        let id = record.record_id();
        if id.trim().is_empty() {
            record.assign_id(uuid::Uuid::new_v4().to_string());
        } else {
            validate_record_id(&id)?;
            if rows.iter().any(|r| r.record_id() == id) {
                return Err(LimsError::AlreadyExists { kind: T::KIND, id });
            }
        }
        record.on_create(actor, at);
        rows.push(record.clone());
        drop(rows);

        self.audit.record(
            &record.record_id(),
            MutationKind::Create.as_str(),
            format!("{} created", T::KIND),
            actor,
            at,
            record.status_label(),
            None,
        );
        Ok(record)
    }
}

fn not_found<T: Record>(id: &str) -> LimsError {
    LimsError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn list(&self) -> LimsResult<Vec<T>> {
        Ok(self.snapshot())
    }

    async fn get(&self, id: &str) -> LimsResult<T> {
        self.rows
            .read()
            .iter()
            .find(|r| r.record_id() == id)
            .cloned()
            .ok_or_else(|| not_found::<T>(id))
    }

    async fn apply(&self, mutation: Mutation<T>, actor: &str) -> LimsResult<Applied<T>> {
        match mutation {
            Mutation::Create(record) => self.create(record, actor).map(Applied::Created),
            Mutation::Update {
                id,
                mut payload,
                reason,
            } => {
                payload.assign_id(id.clone());
                payload.validate_record()?;
                let at = Utc::now();
                {
                    let mut rows = self.rows.write();
                    let slot = rows
                        .iter_mut()
                        .find(|r| r.record_id() == id)
                        .ok_or_else(|| not_found::<T>(&id))?;
                    payload.validate_update(slot)?;
                    payload.on_update(slot, actor, at);
                    *slot = payload.clone();
                }
                self.audit.record(
                    &id,
                    MutationKind::Update.as_str(),
                    format!("{} updated", T::KIND),
                    actor,
                    at,
                    payload.status_label(),
                    Some(reason.as_str()),
                );
                Ok(Applied::Updated(payload))
            }
            Mutation::Delete { id, reason } => {
                let removed = {
                    let mut rows = self.rows.write();
                    let idx = rows
                        .iter()
                        .position(|r| r.record_id() == id)
                        .ok_or_else(|| not_found::<T>(&id))?;
                    rows.remove(idx)
                };
                self.audit.record(
                    &id,
                    MutationKind::Delete.as_str(),
                    format!("{} deleted", T::KIND),
                    actor,
                    Utc::now(),
                    removed.status_label(),
                    Some(reason.as_str()),
                );
                Ok(Applied::Deleted { id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AutoApprovalRule, MasterRecord, Sample};
    use crate::status::SampleStatus;
    use serde_json::json;

    fn repo() -> InMemoryRepository<MasterRecord> {
        let rows = vec![
            MasterRecord::from_value(json!({"id": "M1", "name": "ELISA"})).expect("obj"),
            MasterRecord::from_value(json!({"id": "M2", "name": "PCR"})).expect("obj"),
        ];
        InMemoryRepository::with_rows(rows, Arc::new(AuditLog::new()))
    }

    #[tokio::test]
    async fn create_assigns_id_and_audits() {
        let repo = repo();
        let applied = repo
            .apply(
                Mutation::Create(MasterRecord::from_value(json!({"name": "HPLC"})).expect("obj")),
                "alice",
            )
            .await
            .expect("create");
        let created = applied.into_record().expect("record");
        let id = created.record_id();
        assert!(uuid::Uuid::parse_str(&id).is_ok());
        assert_eq!(repo.list().await.expect("list").len(), 3);

        let trail = repo.audit().for_record(&id);
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].triggered_by, "alice");
        assert_eq!(trail[0].reason, None);
    }

    #[tokio::test]
    async fn duplicate_and_unsafe_ids_are_refused() {
        let repo = repo();
        let dup = MasterRecord::from_value(json!({"id": "M1", "name": "again"})).expect("obj");
        let err = repo
            .apply(Mutation::Create(dup), "alice")
            .await
            .expect_err("duplicate");
        assert!(matches!(err, LimsError::AlreadyExists { .. }));

        let bad = MasterRecord::from_value(json!({"id": "../M3", "name": "x"})).expect("obj");
        assert!(repo.apply(Mutation::Create(bad), "alice").await.is_err());
    }

    #[tokio::test]
    async fn update_replaces_row_and_records_reason() {
        let repo = repo();
        let payload = MasterRecord::from_value(json!({"name": "ELISA v2"})).expect("obj");
        let mutation = Mutation::update("M1", payload, "vendor renamed kit").expect("reason");
        repo.apply(mutation, "bob").await.expect("update");

        let row = repo.get("M1").await.expect("get");
        assert_eq!(row.get("name"), Some(&json!("ELISA v2")));
        assert_eq!(row.record_id(), "M1");

        let trail = repo.audit().for_record("M1");
        assert_eq!(trail[0].action, "update");
        assert_eq!(trail[0].reason.as_deref(), Some("vendor renamed kit"));
    }

    #[tokio::test]
    async fn completed_sample_cannot_move_back_to_pending() {
        let repo: InMemoryRepository<Sample> = InMemoryRepository::new(Arc::new(AuditLog::new()));
        let sample: Sample = serde_json::from_value(json!({
            "sampleId": "S1",
            "name": "Alice",
            "status": "completed"
        }))
        .expect("sample");
        repo.apply(Mutation::Create(sample), "alice").await.expect("create");

        let reopened: Sample =
            serde_json::from_value(json!({"name": "Alice", "status": "pending"})).expect("sample");
        let mutation = Mutation::update("S1", reopened, "re-run").expect("reason");
        let err = repo.apply(mutation, "bob").await.expect_err("backwards move");
        assert!(matches!(err, LimsError::InvalidTransition { .. }));
        assert_eq!(repo.get("S1").await.expect("S1").status, SampleStatus::Completed);
        assert_eq!(repo.audit().for_record("S1").len(), 1);

        let renamed: Sample = serde_json::from_value(json!({
            "name": "Alice B",
            "status": "completed"
        }))
        .expect("sample");
        let mutation = Mutation::update("S1", renamed, "typo").expect("reason");
        repo.apply(mutation, "bob").await.expect("status unchanged");
        assert_eq!(repo.get("S1").await.expect("S1").name, "Alice B");
    }

    #[test]
    fn update_many_replaces_all_rows_or_none() {
        let repo = repo();
        let err = repo
            .update_many(&["M1", "M2"], |row| {
                if row.record_id() == "M2" {
                    return Err(LimsError::InvalidInput("refused".into()));
                }
                row.0.insert("name".into(), json!("changed"));
                Ok(())
            })
            .expect_err("second row refused");
        assert!(matches!(err, LimsError::InvalidInput(_)));
        let names: Vec<_> = repo
            .snapshot()
            .iter()
            .map(|r| r.get("name").cloned())
            .collect();
        assert_eq!(names, vec![Some(json!("ELISA")), Some(json!("PCR"))]);

        let results = repo
            .update_many(&["M1", "M9"], |row| {
                row.0.insert("name".into(), json!("changed"));
                Ok(())
            })
            .expect("update");
        assert!(results[0].is_some());
        assert!(results[1].is_none());
        assert_eq!(
            repo.snapshot()[0].get("name"),
            Some(&json!("changed"))
        );
    }

    #[tokio::test]
    async fn delete_of_missing_row_is_not_found() {
        let repo = repo();
        let mutation = Mutation::delete("M9", "cleanup").expect("reason");
        let err = repo.apply(mutation, "bob").await.expect_err("missing");
        assert!(matches!(err, LimsError::NotFound { id, .. } if id == "M9"));
        assert_eq!(repo.list().await.expect("list").len(), 2);
    }

    #[tokio::test]
    async fn invalid_payload_leaves_store_untouched() {
        let repo: InMemoryRepository<AutoApprovalRule> = InMemoryRepository::new(Arc::new(AuditLog::new()));
        let rule: AutoApprovalRule = serde_json::from_value(json!({
            "testCode": "GLU",
            "lowerLimit": 200.0,
            "upperLimit": 100.0
        }))
        .expect("parse");
        assert!(repo.apply(Mutation::Create(rule), "alice").await.is_err());
        assert!(repo.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let repo: InMemoryRepository<Sample> = InMemoryRepository::new(Arc::new(AuditLog::new()));
        for name in ["Alice", "Bob", "Carol"] {
            let sample: Sample = serde_json::from_value(json!({"name": name})).expect("sample");
            repo.apply(Mutation::Create(sample), "alice").await.expect("create");
        }
        assert_eq!(repo.list().await.expect("first"), repo.list().await.expect("second"));
    }
}
