//! Result auto-approval rules.
//!
//! A rule approves a numeric result automatically when it falls inside `lowerLimit..=upperLimit`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::listing::Tabular;
use crate::repositories::Record;
use crate::LimsResult;

fn enabled() -> bool {
    true
}

fn validate_limits(rule: &AutoApprovalRule) -> Result<(), ValidationError> {
    if !rule.lower_limit.is_finite() || !rule.upper_limit.is_finite() {
        let mut err = ValidationError::new("limits_not_finite");
        err.message = Some("limits must be finite numbers".into());
        return Err(err);
    }
    if rule.lower_limit > rule.upper_limit {
        let mut err = ValidationError::new("limits_out_of_order");
        err.message = Some("lowerLimit must not exceed upperLimit".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_limits"))]
pub struct AutoApprovalRule {
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, message = "testCode is required"))]
    pub test_code: String,
    #[serde(default)]
    pub test_name: Option<String>,
    pub lower_limit: f64,
    pub upper_limit: f64,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl AutoApprovalRule {
    /// Whether `value` would be approved without review.
    pub fn approves(&self, value: f64) -> bool {
        self.enabled && value >= self.lower_limit && value <= self.upper_limit
    }
}

impl Record for AutoApprovalRule {
    const KIND: &'static str = "auto-approval rule";

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn status_label(&self) -> Option<String> {
        Some(if self.enabled { "Active" } else { "Inactive" }.to_string())
    }

    fn validate_record(&self) -> LimsResult<()> {
        Ok(self.validate()?)
    }
}

impl Tabular for AutoApprovalRule {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Test Code", "Test Name", "Lower Limit", "Upper Limit", "Enabled"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.test_code.clone(),
            self.test_name.clone().unwrap_or_default(),
            self.lower_limit.to_string(),
            self.upper_limit.to_string(),
            if self.enabled { "Yes" } else { "No" }.to_string(),
        ]
    }
}
