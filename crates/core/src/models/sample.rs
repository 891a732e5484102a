//! Samples, their registration and dispatch to a laboratory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::listing::Tabular;
use crate::repositories::Record;
use crate::status::{SampleStatus, StatusChip, StatusLabel};
use crate::LimsResult;

fn pending() -> SampleStatus {
    SampleStatus::Pending
}

/// A registered sample and its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    #[serde(default)]
    pub sample_id: String,
    pub barcode_id: Option<String>,
    #[serde(alias = "subjectId")]
    pub volunteer_id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub gender: Option<String>,
    pub collected_by: Option<String>,
    pub collected_on: Option<DateTime<Utc>>,
    pub sent_by: Option<String>,
    pub sent_on: Option<DateTime<Utc>>,
    pub received_by: Option<String>,
    pub received_on: Option<DateTime<Utc>>,
    pub sample_type: Option<String>,
    pub location: Option<String>,
    pub lab: Option<String>,
    #[serde(default = "pending")]
    #[schema(value_type = String, example = "pending")]
    pub status: SampleStatus,
    pub remarks: Option<String>,
}

impl Record for Sample {
    const KIND: &'static str = "sample";

    fn record_id(&self) -> String {
        self.sample_id.clone()
    }

    fn assign_id(&mut self, id: String) {
        self.sample_id = id;
    }

    fn status_label(&self) -> Option<String> {
        Some(self.status.label().to_string())
    }

    fn validate_record(&self) -> LimsResult<()> {
        self.validate()?;
        if self.name.trim().is_empty() {
            return Err(crate::LimsError::InvalidInput("name is required".into()));
        }
        Ok(())
    }

    fn validate_update(&self, previous: &Self) -> LimsResult<()> {
        if self.status == previous.status || previous.status.can_transition_to(&self.status) {
            return Ok(());
        }
        Err(crate::LimsError::InvalidTransition {
            from: previous.status.label().to_string(),
            action: format!("move to {}", self.status.label()),
        })
    }
}

/// A registered sample as listed, with its rendered status.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SampleRow {
    #[serde(flatten)]
    pub sample: Sample,
    pub status_chip: StatusChip,
}

impl From<Sample> for SampleRow {
    fn from(sample: Sample) -> Self {
        Self {
            status_chip: sample.status.chip(),
            sample,
        }
    }
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn opt_time(value: &Option<DateTime<Utc>>) -> String {
    value.map(|t| t.to_rfc3339()).unwrap_or_default()
}

impl Tabular for Sample {
    fn headers() -> Vec<&'static str> {
        vec![
            "Sample ID",
            "Barcode",
            "Volunteer ID",
            "Name",
            "Gender",
            "Sample Type",
            "Lab",
            "Location",
            "Status",
            "Collected By",
            "Collected On",
            "Sent On",
            "Received On",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.sample_id.clone(),
            opt(&self.barcode_id),
            opt(&self.volunteer_id),
            self.name.clone(),
            opt(&self.gender),
            opt(&self.sample_type),
            opt(&self.lab),
            opt(&self.location),
            self.status.label().to_string(),
            opt(&self.collected_by),
            opt_time(&self.collected_on),
            opt_time(&self.sent_on),
            opt_time(&self.received_on),
        ]
    }
}

#[allow(clippy::ptr_arg)]
fn validate_sample_ids(ids: &Vec<String>) -> Result<(), ValidationError> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        let mut err = ValidationError::new("blank_sample_id");
        err.message = Some("sampleIds must not contain blank ids".into());
        return Err(err);
    }
    Ok(())
}

/// Request to dispatch a batch of samples to a laboratory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SampleSendRequest {
    #[validate(length(min = 1, message = "labId is required"))]
    pub lab_id: String,
    #[validate(
        length(min = 1, message = "sampleIds must contain at least one id"),
        custom(function = "validate_sample_ids")
    )]
    pub sample_ids: Vec<String>,
    #[validate(length(min = 1, message = "sentBy is required"))]
    pub sent_by: String,
    pub sent_on: DateTime<Utc>,
}

/// One acknowledged sample in a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SentSample {
    pub id: String,
    #[schema(value_type = String, example = "sent")]
    pub status: SampleStatus,
    pub lab_id: String,
    pub sent_by: String,
    pub sent_on: DateTime<Utc>,
    /// Whether the id matched a registered sample.
    pub registered: bool,
}
