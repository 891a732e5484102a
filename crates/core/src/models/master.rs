//! Master data: instruments, species, strains, analyte codes and methods.
//!
//! Master records are opaque JSON objects owned by the laboratory API. The only field this
//! service relies on is `id`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::listing::Tabular;
use crate::repositories::Record;
use crate::status::{
    status_chip, RawStatus, RecordStatus, StatusChip, StatusDomain, STATUS_CHIP_FIELD,
};
use crate::{LimsError, LimsResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MasterResource {
    Instrument,
    Species,
    Strain,
    AnalyteCode,
    /// Served from memory; the laboratory API has no method endpoint.
    Method,
}

impl MasterResource {
    pub const ALL: [MasterResource; 5] = [
        MasterResource::Instrument,
        MasterResource::Species,
        MasterResource::Strain,
        MasterResource::AnalyteCode,
        MasterResource::Method,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MasterResource::Instrument => "instrument",
            MasterResource::Species => "species",
            MasterResource::Strain => "strain",
            MasterResource::AnalyteCode => "analyte-code",
            MasterResource::Method => "method",
        }
    }

    /// Upstream collection path, or `None` for resources kept in memory.
    pub fn upstream_path(self) -> Option<&'static str> {
        match self {
            MasterResource::Instrument => Some("/v1/instrument"),
            MasterResource::Species => Some("/v1/species"),
            MasterResource::Strain => Some("/v1/strain"),
            MasterResource::AnalyteCode => Some("/v1/analytecode"),
            MasterResource::Method => None,
        }
    }
}

impl fmt::Display for MasterResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MasterResource {
    type Err = LimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MasterResource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| LimsError::InvalidInput(format!("unknown master resource: {s}")))
    }
}

/// An opaque master data row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct MasterRecord(pub Map<String, Value>);

impl MasterRecord {
    /// # Errors
    ///
    /// Returns [`LimsError::InvalidInput`] unless `value` is a JSON object.
    pub fn from_value(value: Value) -> LimsResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(LimsError::InvalidInput(format!(
                "master record must be a JSON object, got {other}"
            ))),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Returns a copy with `field` set.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn status_chip(&self) -> StatusChip {
        let raw = self.0.get("status").map(RawStatus::from).unwrap_or(RawStatus::Null);
        status_chip(StatusDomain::Record, &raw)
    }

    /// Copy for listing, with the rendered chip under `statusChip`.
    pub fn with_status_chip(self) -> Self {
        let chip = self.status_chip().to_value();
        self.with(STATUS_CHIP_FIELD, chip)
    }

    /// Drops fields this service derives, so a listed row can be written back as-is.
    pub fn without_derived(mut self) -> Self {
        self.0.remove(STATUS_CHIP_FIELD);
        self
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Record for MasterRecord {
    const KIND: &'static str = "master record";

    fn record_id(&self) -> String {
        self.0.get("id").map(scalar_text).unwrap_or_default()
    }

    fn assign_id(&mut self, id: String) {
        self.0.insert("id".into(), Value::String(id));
    }

    fn status_label(&self) -> Option<String> {
        let raw = self.0.get("status")?;
        match RawStatus::from(raw) {
            RawStatus::Null => None,
            RawStatus::Code(code) => Some(RecordStatus::from_code(code).label().to_string()),
            RawStatus::Text(text) => Some(RecordStatus::parse(&text).label().to_string()),
        }
    }

    fn validate_record(&self) -> LimsResult<()> {
        if self.0.is_empty() {
            return Err(LimsError::InvalidInput("master record must not be empty".into()));
        }
        Ok(())
    }
}

impl Tabular for MasterRecord {
    /// Columns vary per resource, so the table shows the generic id/name/status triple.
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.record_id(),
            self.0.get("name").map(scalar_text).unwrap_or_default(),
            self.status_label().unwrap_or_default(),
        ]
    }

    /// The filter also sees every other field.
    fn search_cells(&self) -> Vec<String> {
        let mut cells = self.cells();
        cells.extend(
            self.0
                .iter()
                .filter(|(k, _)| {
                    !matches!(k.as_str(), "id" | "name" | "status" | STATUS_CHIP_FIELD)
                })
                .map(|(_, v)| scalar_text(v)),
        );
        cells
    }
}
