//! Test results and the payloads that change their status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::mutation::Reason;
use crate::status::{AuthorizationStatus, ResultStatus};
use crate::{LimsError, LimsResult};

/// One result row: a single test performed on a single sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: String,
    pub sample_id: String,
    pub test_code: Option<String>,
    pub test_name: Option<String>,
    pub result: Option<String>,
    pub unit: Option<String>,
    pub reference_range: Option<String>,
    pub performed_by: Option<String>,
    pub performed_on: Option<DateTime<Utc>>,
    pub verified_by: Option<String>,
    pub verified_on: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>)]
    pub authorization_status: Option<AuthorizationStatus>,
    #[serde(default, rename = "statusId", alias = "StatusID")]
    #[schema(value_type = Option<i64>)]
    pub status_id: ResultStatus,
    pub remarks: Option<String>,
}

/// Body of a result status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultStatusChange {
    pub ids: Vec<String>,
    #[schema(value_type = Option<i64>)]
    pub status_id: ResultStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub authorization_status: Option<AuthorizationStatus>,
}

impl ResultStatusChange {
    fn needs_reason(&self) -> bool {
        self.status_id.requires_reason()
            || matches!(
                self.authorization_status,
                Some(AuthorizationStatus::Rejected)
            )
    }

    /// Checks the change and returns it with the reason trimmed.
    ///
    /// # Errors
    ///
    /// - [`LimsError::InvalidInput`] when `ids` is empty or the status id is null,
    /// - [`LimsError::ReasonRequired`] when the change rejects results without a reason.
    pub fn validated(mut self) -> LimsResult<Self> {
        ensure_ids(&self.ids)?;
        if self.status_id == ResultStatus::Missing {
            return Err(LimsError::InvalidInput("statusId is required".into()));
        }
        let reason = self.reason.as_deref().map(Reason::parse).transpose();
        match reason {
            Ok(Some(reason)) => self.reason = Some(reason.as_str().to_string()),
            Ok(None) | Err(LimsError::ReasonRequired) if self.needs_reason() => {
                return Err(LimsError::ReasonRequired)
            }
            Ok(None) | Err(LimsError::ReasonRequired) => self.reason = None,
            Err(other) => return Err(other),
        }
        Ok(self)
    }
}

/// Filters accepted by the result listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TestResultQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub sample_id: Option<String>,
    pub status_id: Option<i64>,
}

impl TestResultQuery {
    /// # Errors
    ///
    /// Returns [`LimsError::InvalidInput`] when `fromDate` is after `toDate`.
    pub fn validate_range(&self) -> LimsResult<()> {
        ensure_date_order(self.from_date, self.to_date)
    }

    /// Query pairs to forward upstream, empty values omitted.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from_date {
            pairs.push(("fromDate", from.to_string()));
        }
        if let Some(to) = self.to_date {
            pairs.push(("toDate", to.to_string()));
        }
        if let Some(sample_id) = self.sample_id.as_deref().filter(|s| !s.trim().is_empty()) {
            pairs.push(("sampleId", sample_id.trim().to_string()));
        }
        if let Some(status_id) = self.status_id {
            pairs.push(("statusId", status_id.to_string()));
        }
        pairs
    }
}

pub(crate) fn ensure_ids(ids: &[String]) -> LimsResult<()> {
    if ids.is_empty() {
        return Err(LimsError::InvalidInput("ids must not be empty".into()));
    }
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(LimsError::InvalidInput("ids must not contain blank values".into()));
    }
    Ok(())
}

pub(crate) fn ensure_date_order(from: Option<NaiveDate>, to: Option<NaiveDate>) -> LimsResult<()> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(LimsError::InvalidInput(format!(
            "fromDate {from} is after toDate {to}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn change(value: serde_json::Value) -> ResultStatusChange {
        serde_json::from_value(value).expect("parse")
    }

    #[test]
    fn rejection_requires_reason() {
        let err = change(json!({"ids": ["T1"], "statusId": 5}))
            .validated()
            .expect_err("no reason");
        assert!(matches!(err, LimsError::ReasonRequired));

        let err = change(json!({"ids": ["T1"], "statusId": 5, "reason": "  "}))
            .validated()
            .expect_err("blank reason");
        assert!(matches!(err, LimsError::ReasonRequired));

        let ok = change(json!({"ids": ["T1"], "statusId": 5, "reason": " clotted "}))
            .validated()
            .expect("reason given");
        assert_eq!(ok.reason.as_deref(), Some("clotted"));
    }

    #[test]
    fn authorisation_rejection_requires_reason() {
        let err = change(json!({
            "ids": ["T1"],
            "statusId": 3,
            "authorizationStatus": "Rejected"
        }))
        .validated()
        .expect_err("no reason");
        assert!(matches!(err, LimsError::ReasonRequired));
    }

    #[test]
    fn approval_needs_no_reason() {
        let ok = change(json!({"ids": ["T1", "T2"], "statusId": 4, "reason": ""}))
            .validated()
            .expect("approve");
        assert_eq!(ok.reason, None);
        assert_eq!(ok.status_id, ResultStatus::Approved);
    }

    #[test]
    fn empty_ids_and_null_status_are_refused() {
        assert!(change(json!({"ids": [], "statusId": 4})).validated().is_err());
        assert!(change(json!({"ids": ["T1"], "statusId": null}))
            .validated()
            .is_err());
    }

    #[test]
    fn result_row_accepts_legacy_status_key() {
        let row: TestResult = serde_json::from_value(json!({
            "id": "T1",
            "sampleId": "S1",
            "StatusID": null,
            "authorizationStatus": "approved"
        }))
        .expect("parse");
        assert_eq!(row.status_id, ResultStatus::Missing);
        assert_eq!(row.authorization_status, Some(AuthorizationStatus::Approved));
    }

    #[test]
    fn query_range_and_pairs() {
        let query = TestResultQuery {
            from_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            to_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..TestResultQuery::default()
        };
        assert!(query.validate_range().is_err());

        let query = TestResultQuery {
            from_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            sample_id: Some(" S1 ".into()),
            ..TestResultQuery::default()
        };
        query.validate_range().expect("valid");
        assert_eq!(
            query.to_pairs(),
            vec![
                ("fromDate", "2025-01-01".to_string()),
                ("sampleId", "S1".to_string())
            ]
        );
    }
}
