//! Dispatching registered samples to a laboratory.

use chrono::Utc;
use validator::Validate;

use crate::models::{Sample, SampleSendRequest, SentSample};
use crate::repositories::{InMemoryRepository, Record};
use crate::status::SampleStatus;
use crate::{LimsError, LimsResult};

fn ensure_sendable(sample: &Sample) -> LimsResult<()> {
    if sample.status.can_transition_to(&SampleStatus::Sent) {
        return Ok(());
    }
    Err(LimsError::InvalidTransition {
        from: sample.status.label().to_string(),
        action: "send".into(),
    })
}

/// Marks the requested samples as sent.
///
/// Ids matching a registered sample move that sample to `sent` and stamp `sentBy`/`sentOn`;
/// ids the registry does not know are acknowledged as sent without a stored row. Duplicate ids
/// are acknowledged once. Nothing is written unless every registered sample may be sent.
///
/// # Errors
///
/// - [`LimsError::InvalidInput`] when the request fails validation,
/// - [`LimsError::InvalidTransition`] when a registered sample cannot move to `sent`.
pub fn send_samples(
    registry: &InMemoryRepository<Sample>,
    request: &SampleSendRequest,
) -> LimsResult<Vec<SentSample>> {
    request.validate()?;

    let mut ids: Vec<&str> = Vec::with_capacity(request.sample_ids.len());
    for id in request.sample_ids.iter().map(|id| id.trim()) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    let updated = registry.update_many(&ids, |sample| {
        ensure_sendable(sample)?;
        sample.status = SampleStatus::Sent;
        sample.sent_by = Some(request.sent_by.clone());
        sample.sent_on = Some(request.sent_on);
        sample.lab = Some(request.lab_id.clone());
        Ok(())
    })?;

    let at = Utc::now();
    let mut sent = Vec::with_capacity(ids.len());
    for (id, stored) in ids.into_iter().zip(updated) {
        if let Some(sample) = &stored {
            registry.audit().record(
                id,
                "send",
                format!("sample sent to {}", request.lab_id),
                &request.sent_by,
                at,
                sample.status_label(),
                None,
            );
        }
        sent.push(SentSample {
            id: id.to_string(),
            status: SampleStatus::Sent,
            lab_id: request.lab_id.clone(),
            sent_by: request.sent_by.clone(),
            sent_on: request.sent_on,
            registered: stored.is_some(),
        });
    }

    tracing::info!("{} sample(s) sent to {}", sent.len(), request.lab_id);
    Ok(sent)
}
