//! NABL and CAP accreditation scopes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::listing::Tabular;
use crate::models::test_result::ensure_date_order;
use crate::repositories::Record;
use crate::LimsResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccreditationBody {
    Nabl,
    Cap,
}

impl AccreditationBody {
    pub fn as_str(self) -> &'static str {
        match self {
            AccreditationBody::Nabl => "NABL",
            AccreditationBody::Cap => "CAP",
        }
    }
}

/// A test covered by an accreditation scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccreditationTest {
    #[validate(length(min = 1, message = "testCode is required"))]
    pub test_code: String,
    #[serde(default)]
    pub test_name: Option<String>,
    #[serde(default)]
    pub added_by: Option<String>,
    #[serde(default)]
    pub added_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccreditationDetail {
    #[serde(default)]
    pub id: String,
    pub body: AccreditationBody,
    #[validate(length(min = 1, message = "certificateNumber is required"))]
    pub certificate_number: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    #[serde(default)]
    #[validate(nested)]
    pub tests: Vec<AccreditationTest>,
    #[serde(default)]
    pub modified_by: Option<String>,
    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,
}

impl Record for AccreditationDetail {
    const KIND: &'static str = "accreditation";

    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn validate_record(&self) -> LimsResult<()> {
        self.validate()?;
        ensure_date_order(Some(self.from_date), Some(self.to_date))
    }

    fn on_create(&mut self, actor: &str, at: DateTime<Utc>) {
        for test in &mut self.tests {
            test.added_by.get_or_insert_with(|| actor.to_string());
            test.added_on.get_or_insert(at);
            test.modified_by = None;
            test.modified_on = None;
        }
        self.modified_by = None;
        self.modified_on = None;
    }

    /// Tests already present keep their add stamp; new ones are stamped as added now. Tests
    /// whose content changed are stamped as modified.
    fn on_update(&mut self, previous: &Self, actor: &str, at: DateTime<Utc>) {
        for test in &mut self.tests {
            match previous.tests.iter().find(|p| p.test_code == test.test_code) {
                Some(prior) => {
                    test.added_by = prior.added_by.clone();
                    test.added_on = prior.added_on;
                    if prior.test_name != test.test_name {
                        test.modified_by = Some(actor.to_string());
                        test.modified_on = Some(at);
                    } else {
                        test.modified_by = prior.modified_by.clone();
                        test.modified_on = prior.modified_on;
                    }
                }
                None => {
                    test.added_by = Some(actor.to_string());
                    test.added_on = Some(at);
                    test.modified_by = None;
                    test.modified_on = None;
                }
            }
        }
        self.modified_by = Some(actor.to_string());
        self.modified_on = Some(at);
    }
}

impl Tabular for AccreditationDetail {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Body", "Certificate", "From", "To", "Tests"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.body.as_str().to_string(),
            self.certificate_number.clone(),
            self.from_date.to_string(),
            self.to_date.to_string(),
            self.tests.len().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn detail(from: &str, to: &str) -> AccreditationDetail {
        serde_json::from_value(json!({
            "body": "NABL",
            "certificateNumber": "MC-1234",
            "fromDate": from,
            "toDate": to,
            "tests": [{"testCode": "HB"}, {"testCode": "WBC", "testName": "White cells"}]
        }))
        .expect("parse")
    }

    #[test]
    fn date_range_must_be_ordered() {
        assert!(detail("2025-01-01", "2025-12-31").validate_record().is_ok());
        assert!(detail("2025-01-01", "2025-01-01").validate_record().is_ok());
        assert!(detail("2025-12-31", "2025-01-01").validate_record().is_err());
    }

    #[test]
    fn blank_test_code_is_refused() {
        let mut d = detail("2025-01-01", "2025-12-31");
        d.tests.push(AccreditationTest {
            test_code: String::new(),
            test_name: None,
            added_by: None,
            added_on: None,
            modified_by: None,
            modified_on: None,
        });
        assert!(d.validate_record().is_err());
    }

    #[test]
    fn create_and_update_stamp_tests() {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).single().expect("time");
        let updated_at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).single().expect("time");

        let mut original = detail("2025-01-01", "2025-12-31");
        original.on_create("alice", created_at);
        assert!(original
            .tests
            .iter()
            .all(|t| t.added_by.as_deref() == Some("alice") && t.added_on == Some(created_at)));

        let mut edited = original.clone();
        edited.tests[1].test_name = Some("Leukocytes".into());
        edited.tests.push(AccreditationTest {
            test_code: "PLT".into(),
            test_name: None,
            added_by: None,
            added_on: None,
            modified_by: None,
            modified_on: None,
        });
        edited.on_update(&original, "bob", updated_at);

        let codes: Vec<&str> = edited.tests.iter().map(|t| t.test_code.as_str()).collect();
        assert_eq!(codes, vec!["HB", "WBC", "PLT"]);
        assert_eq!(edited.tests[0].modified_by, None);
        assert_eq!(edited.tests[1].added_by.as_deref(), Some("alice"));
        assert_eq!(edited.tests[1].modified_by.as_deref(), Some("bob"));
        assert_eq!(edited.tests[2].added_by.as_deref(), Some("bob"));
        assert_eq!(edited.modified_on, Some(updated_at));
    }
}
