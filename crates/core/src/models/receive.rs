//! Payloads for the sample receipt screen.
//!
//! Every status change on a received sample is reason-gated, whatever the target status.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::test_result::ensure_ids;
use crate::mutation::Reason;
use crate::{LimsError, LimsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveStatusChange {
    pub ids: Vec<String>,
    pub status_id: i64,
    #[serde(default)]
    pub reason: String,
}

impl ReceiveStatusChange {
    /// # Errors
    ///
    /// - [`LimsError::InvalidInput`] when `ids` is empty or contains blanks,
    /// - [`LimsError::ReasonRequired`] when the reason is blank.
    pub fn validated(mut self) -> LimsResult<Self> {
        ensure_ids(&self.ids)?;
        self.reason = Reason::parse(&self.reason)?.as_str().to_string();
        Ok(self)
    }
}

/// Remark attached to one or more rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemarkUpdate {
    pub ids: Vec<String>,
    #[serde(default)]
    pub remark: String,
}

impl RemarkUpdate {
    /// # Errors
    ///
    /// Returns [`LimsError::InvalidInput`] for empty ids or a blank remark.
    pub fn validated(mut self) -> LimsResult<Self> {
        ensure_ids(&self.ids)?;
        let remark = self.remark.trim();
        if remark.is_empty() {
            return Err(LimsError::InvalidInput("remark must not be empty".into()));
        }
        self.remark = remark.to_string();
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeRequest {
    pub ids: Vec<String>,
}

impl BarcodeRequest {
    /// # Errors
    ///
    /// Returns [`LimsError::InvalidInput`] for empty ids.
    pub fn validated(self) -> LimsResult<Self> {
        ensure_ids(&self.ids)?;
        Ok(self)
    }
}

/// File format of a receipt download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ExportFormat {
    #[serde(rename = "CSV", alias = "csv")]
    Csv,
    #[serde(rename = "PDF", alias = "pdf")]
    Pdf,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Pdf => "PDF",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn file_name(self, stem: &str) -> String {
        match self {
            ExportFormat::Csv => format!("{stem}.csv"),
            ExportFormat::Pdf => format!("{stem}.pdf"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadParams {
    #[serde(rename = "fileType")]
    #[param(value_type = String, example = "CSV")]
    pub file_type: ExportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_change_always_needs_reason() {
        let change: ReceiveStatusChange =
            serde_json::from_value(json!({"ids": ["S1"], "statusId": 2})).expect("parse");
        assert!(matches!(change.validated(), Err(LimsError::ReasonRequired)));

        let change: ReceiveStatusChange = serde_json::from_value(
            json!({"ids": ["S1"], "statusId": 2, "reason": " received late "}),
        )
        .expect("parse");
        assert_eq!(change.validated().expect("valid").reason, "received late");
    }

    #[test]
    fn remark_must_not_be_blank() {
        let update = RemarkUpdate {
            ids: vec!["S1".into()],
            remark: "  ".into(),
        };
        assert!(matches!(update.validated(), Err(LimsError::InvalidInput(_))));
    }

    #[test]
    fn download_format_parses_either_case() {
        let csv: ExportFormat = serde_json::from_value(json!("csv")).expect("csv");
        let pdf: ExportFormat = serde_json::from_value(json!("PDF")).expect("pdf");
        assert_eq!(csv, ExportFormat::Csv);
        assert_eq!(pdf.content_type(), "application/pdf");
        assert!(serde_json::from_value::<ExportFormat>(json!("xlsx")).is_err());
        assert_eq!(csv.file_name("received-samples"), "received-samples.csv");
    }
}
