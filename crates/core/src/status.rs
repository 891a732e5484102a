//! Status vocabulary for the sample workflow.
//!
//! Each workflow domain gets one closed status type with an explicit `Unknown` variant, and
//! every status renders to a [`StatusChip`] through [`StatusLabel`]. Raw values coming back from
//! the laboratory API are never trusted to be in range: anything unmapped renders with the raw
//! value as its title and the neutral [`ChipColor::Default`].
//!
//! Domains:
//! - [`SampleStatus`]: collection/send/receive lifecycle, string valued
//! - [`RequisitionStatus`]: `Pending Approval` / `Approved` / `Cancelled`, matched exactly
//! - [`AuthorizationStatus`]: per-test authorisation
//! - [`ResultStatus`]: integer `StatusID` 1..=6 with an explicit `Missing` variant for null
//! - [`RecordStatus`]: master data Active/Inactive

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::constants::PENDING_APPROVAL;

/// Title shown for a status that is null or absent.
pub const MISSING_STATUS_TITLE: &str = "Not Set";

/// Field a rendered chip is attached under on a listed row.
pub const STATUS_CHIP_FIELD: &str = "statusChip";

/// Colour palette understood by the dashboard chip component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChipColor {
    Default,
    Primary,
    Secondary,
    Error,
    Info,
    Success,
    Warning,
}

impl ChipColor {
    pub fn as_str(self) -> &'static str {
        match self {
            ChipColor::Default => "default",
            ChipColor::Primary => "primary",
            ChipColor::Secondary => "secondary",
            ChipColor::Error => "error",
            ChipColor::Info => "info",
            ChipColor::Success => "success",
            ChipColor::Warning => "warning",
        }
    }
}

/// Display pair for a status value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusChip {
    pub title: String,
    pub color: ChipColor,
}

impl StatusChip {
    pub fn new(title: impl Into<String>, color: ChipColor) -> Self {
        Self {
            title: title.into(),
            color,
        }
    }

    /// Chip for a raw value no status map knows about.
    pub fn fallback(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Self::missing();
        }
        Self::new(raw, ChipColor::Default)
    }

    pub fn missing() -> Self {
        Self::new(MISSING_STATUS_TITLE, ChipColor::Default)
    }

    /// JSON form, as serialised on typed rows.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("title".into(), Value::String(self.title.clone()));
        map.insert("color".into(), Value::String(self.color.as_str().into()));
        Value::Object(map)
    }
}

/// Anything that can be rendered as a status chip.
pub trait StatusLabel {
    fn chip(&self) -> StatusChip;
}

/// A status value exactly as it arrived on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStatus {
    Code(i64),
    Text(String),
    Null,
}

impl From<&serde_json::Value> for RawStatus {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => RawStatus::Null,
            serde_json::Value::String(s) => RawStatus::Text(s.clone()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(code) => RawStatus::Code(code),
                None => RawStatus::Text(n.to_string()),
            },
            other => RawStatus::Text(other.to_string()),
        }
    }
}

impl RawStatus {
    fn display(&self) -> String {
        match self {
            RawStatus::Code(code) => code.to_string(),
            RawStatus::Text(text) => text.clone(),
            RawStatus::Null => MISSING_STATUS_TITLE.to_string(),
        }
    }
}

/// Which status vocabulary a raw value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDomain {
    Sample,
    Requisition,
    Authorization,
    Result,
    Record,
}

/// Render any raw status of the given domain. Never fails.
pub fn status_chip(domain: StatusDomain, raw: &RawStatus) -> StatusChip {
    match (domain, raw) {
        (StatusDomain::Result, _) => match ResultStatus::from_raw(raw) {
            Some(status) => status.chip(),
            None => StatusChip::fallback(raw.display()),
        },
        (_, RawStatus::Null) => StatusChip::missing(),
        (StatusDomain::Record, RawStatus::Code(code)) => RecordStatus::from_code(*code).chip(),
        (_, RawStatus::Code(_)) => StatusChip::fallback(raw.display()),
        (StatusDomain::Sample, RawStatus::Text(text)) => SampleStatus::parse(text).chip(),
        (StatusDomain::Requisition, RawStatus::Text(text)) => {
            RequisitionStatus::parse(text).chip()
        }
        (StatusDomain::Authorization, RawStatus::Text(text)) => {
            AuthorizationStatus::parse(text).chip()
        }
        (StatusDomain::Record, RawStatus::Text(text)) => RecordStatus::parse(text).chip(),
    }
}

/// Attaches a [`STATUS_CHIP_FIELD`] to every row of an untyped payload.
///
/// Rows are the items of a top-level array, the items under `data`, or the payload itself when
/// it is a single object. Each row is rendered from the first of `keys` it carries; a row with
/// none of them renders as missing. Values that are not objects are left alone.
pub fn annotate_status_chips(payload: &mut Value, domain: StatusDomain, keys: &[&str]) {
    if let Some(data) = payload.get_mut("data") {
        annotate_status_chips(data, domain, keys);
        return;
    }
    match payload {
        Value::Array(rows) => {
            for row in rows.iter_mut() {
                annotate_row(row, domain, keys);
            }
        }
        other => annotate_row(other, domain, keys),
    }
}

fn annotate_row(row: &mut Value, domain: StatusDomain, keys: &[&str]) {
    let Value::Object(map) = row else {
        return;
    };
    let raw = keys
        .iter()
        .find_map(|key| map.get(*key))
        .map(RawStatus::from)
        .unwrap_or(RawStatus::Null);
    let chip = status_chip(domain, &raw);
    map.insert(STATUS_CHIP_FIELD.to_string(), chip.to_value());
}

fn normalise(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

// ============================================================================
// Sample
// ============================================================================

/// Lifecycle state of a physical sample.
///
/// Backend payloads spell these inconsistently (`In-Progress`, `in progress`, `INPROGRESS`), so
/// parsing ignores case and punctuation. The wire form is the lowercase kebab code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SampleStatus {
    Pending,
    Collected,
    Sent,
    Received,
    InProgress,
    Completed,
    Rejected,
    Outsourced,
    Unknown(String),
}

const SAMPLE_SEQUENCE: [SampleStatus; 6] = [
    SampleStatus::Pending,
    SampleStatus::Collected,
    SampleStatus::Sent,
    SampleStatus::Received,
    SampleStatus::InProgress,
    SampleStatus::Completed,
];

impl SampleStatus {
    pub fn parse(raw: &str) -> Self {
        match normalise(raw).as_str() {
            "pending" => SampleStatus::Pending,
            "collected" => SampleStatus::Collected,
            "sent" => SampleStatus::Sent,
            "received" => SampleStatus::Received,
            "inprogress" => SampleStatus::InProgress,
            "completed" | "complete" => SampleStatus::Completed,
            "rejected" => SampleStatus::Rejected,
            "outsourced" => SampleStatus::Outsourced,
            _ => SampleStatus::Unknown(raw.trim().to_string()),
        }
    }

    /// Wire code, e.g. `in-progress`.
    pub fn code(&self) -> &str {
        match self {
            SampleStatus::Pending => "pending",
            SampleStatus::Collected => "collected",
            SampleStatus::Sent => "sent",
            SampleStatus::Received => "received",
            SampleStatus::InProgress => "in-progress",
            SampleStatus::Completed => "completed",
            SampleStatus::Rejected => "rejected",
            SampleStatus::Outsourced => "outsourced",
            SampleStatus::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SampleStatus::Pending => "Pending",
            SampleStatus::Collected => "Collected",
            SampleStatus::Sent => "Sent",
            SampleStatus::Received => "Received",
            SampleStatus::InProgress => "In Progress",
            SampleStatus::Completed => "Completed",
            SampleStatus::Rejected => "Rejected",
            SampleStatus::Outsourced => "Outsourced",
            SampleStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SampleStatus::Completed | SampleStatus::Rejected | SampleStatus::Outsourced
        )
    }

    fn sequence_index(&self) -> Option<usize> {
        SAMPLE_SEQUENCE.iter().position(|s| s == self)
    }

    /// The next state in the forward sequence, if any.
    pub fn next(&self) -> Option<SampleStatus> {
        let idx = self.sequence_index()?;
        SAMPLE_SEQUENCE.get(idx + 1).cloned()
    }

    /// Whether a sample may move from `self` to `target`.
    ///
    /// Forward moves may skip intermediate states; nothing moves backwards or out of a
    /// terminal state, and unknown states never transition.
    pub fn can_transition_to(&self, target: &SampleStatus) -> bool {
        if self == target || self.is_terminal() {
            return false;
        }
        if matches!(self, SampleStatus::Unknown(_)) {
            return false;
        }
        match target {
            SampleStatus::Rejected => true,
            SampleStatus::Outsourced => {
                matches!(self, SampleStatus::Received | SampleStatus::InProgress)
            }
            SampleStatus::Unknown(_) => false,
            _ => match (self.sequence_index(), target.sequence_index()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        }
    }
}

impl From<String> for SampleStatus {
    fn from(raw: String) -> Self {
        SampleStatus::parse(&raw)
    }
}

impl From<SampleStatus> for String {
    fn from(status: SampleStatus) -> Self {
        status.code().to_string()
    }
}

impl StatusLabel for SampleStatus {
    fn chip(&self) -> StatusChip {
        let color = match self {
            SampleStatus::Pending => ChipColor::Warning,
            SampleStatus::Collected => ChipColor::Info,
            SampleStatus::Sent => ChipColor::Primary,
            SampleStatus::Received => ChipColor::Secondary,
            SampleStatus::InProgress => ChipColor::Info,
            SampleStatus::Completed => ChipColor::Success,
            SampleStatus::Rejected => ChipColor::Error,
            SampleStatus::Outsourced => ChipColor::Secondary,
            SampleStatus::Unknown(raw) => return StatusChip::fallback(raw.as_str()),
        };
        StatusChip::new(self.label(), color)
    }
}

// ============================================================================
// Requisition
// ============================================================================

/// Approval state of a requisition. Matching is exact: `pending approval` is not
/// `Pending Approval`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequisitionStatus {
    PendingApproval,
    Approved,
    Cancelled,
    Unknown(String),
}

impl RequisitionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            PENDING_APPROVAL => RequisitionStatus::PendingApproval,
            "Approved" => RequisitionStatus::Approved,
            "Cancelled" => RequisitionStatus::Cancelled,
            other => RequisitionStatus::Unknown(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RequisitionStatus::PendingApproval => PENDING_APPROVAL,
            RequisitionStatus::Approved => "Approved",
            RequisitionStatus::Cancelled => "Cancelled",
            RequisitionStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequisitionStatus::Approved | RequisitionStatus::Cancelled
        )
    }
}

impl From<String> for RequisitionStatus {
    fn from(raw: String) -> Self {
        RequisitionStatus::parse(&raw)
    }
}

impl From<RequisitionStatus> for String {
    fn from(status: RequisitionStatus) -> Self {
        status.label().to_string()
    }
}

impl std::fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl StatusLabel for RequisitionStatus {
    fn chip(&self) -> StatusChip {
        let color = match self {
            RequisitionStatus::PendingApproval => ChipColor::Warning,
            RequisitionStatus::Approved => ChipColor::Success,
            RequisitionStatus::Cancelled => ChipColor::Error,
            RequisitionStatus::Unknown(raw) => return StatusChip::fallback(raw.as_str()),
        };
        StatusChip::new(self.label(), color)
    }
}

// ============================================================================
// Authorization
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AuthorizationStatus {
    Pending,
    Approved,
    Rejected,
    Unknown(String),
}

impl AuthorizationStatus {
    pub fn parse(raw: &str) -> Self {
        match normalise(raw).as_str() {
            "pending" => AuthorizationStatus::Pending,
            "approved" => AuthorizationStatus::Approved,
            "rejected" => AuthorizationStatus::Rejected,
            _ => AuthorizationStatus::Unknown(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            AuthorizationStatus::Pending => "Pending",
            AuthorizationStatus::Approved => "Approved",
            AuthorizationStatus::Rejected => "Rejected",
            AuthorizationStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for AuthorizationStatus {
    fn from(raw: String) -> Self {
        AuthorizationStatus::parse(&raw)
    }
}

impl From<AuthorizationStatus> for String {
    fn from(status: AuthorizationStatus) -> Self {
        status.label().to_string()
    }
}

impl StatusLabel for AuthorizationStatus {
    fn chip(&self) -> StatusChip {
        let color = match self {
            AuthorizationStatus::Pending => ChipColor::Warning,
            AuthorizationStatus::Approved => ChipColor::Success,
            AuthorizationStatus::Rejected => ChipColor::Error,
            AuthorizationStatus::Unknown(raw) => return StatusChip::fallback(raw.as_str()),
        };
        StatusChip::new(self.label(), color)
    }
}

// ============================================================================
// Result (StatusID)
// ============================================================================

/// Integer `StatusID` carried by test results.
///
/// A null status id is its own variant rather than a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum ResultStatus {
    Missing,
    Pending,
    InProgress,
    Completed,
    Approved,
    Rejected,
    Outsourced,
    Unknown(i64),
}

impl ResultStatus {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            None => ResultStatus::Missing,
            Some(1) => ResultStatus::Pending,
            Some(2) => ResultStatus::InProgress,
            Some(3) => ResultStatus::Completed,
            Some(4) => ResultStatus::Approved,
            Some(5) => ResultStatus::Rejected,
            Some(6) => ResultStatus::Outsourced,
            Some(other) => ResultStatus::Unknown(other),
        }
    }

    /// Text forms are accepted too: `"3"` is a code, `"null"` and blanks are missing.
    /// Returns `None` for text that is not a status id at all.
    pub fn from_raw(raw: &RawStatus) -> Option<Self> {
        match raw {
            RawStatus::Null => Some(ResultStatus::Missing),
            RawStatus::Code(code) => Some(ResultStatus::from_code(Some(*code))),
            RawStatus::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                    return Some(ResultStatus::Missing);
                }
                trimmed
                    .parse::<i64>()
                    .ok()
                    .map(|code| ResultStatus::from_code(Some(code)))
            }
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            ResultStatus::Missing => None,
            ResultStatus::Pending => Some(1),
            ResultStatus::InProgress => Some(2),
            ResultStatus::Completed => Some(3),
            ResultStatus::Approved => Some(4),
            ResultStatus::Rejected => Some(5),
            ResultStatus::Outsourced => Some(6),
            ResultStatus::Unknown(code) => Some(*code),
        }
    }

    /// Moving a result into this status needs a written justification.
    pub fn requires_reason(&self) -> bool {
        matches!(self, ResultStatus::Rejected)
    }
}

impl Default for ResultStatus {
    fn default() -> Self {
        ResultStatus::Missing
    }
}

impl From<Option<i64>> for ResultStatus {
    fn from(code: Option<i64>) -> Self {
        ResultStatus::from_code(code)
    }
}

impl From<ResultStatus> for Option<i64> {
    fn from(status: ResultStatus) -> Self {
        status.code()
    }
}

impl StatusLabel for ResultStatus {
    fn chip(&self) -> StatusChip {
        match self {
            ResultStatus::Missing => StatusChip::missing(),
            ResultStatus::Pending => StatusChip::new("Pending", ChipColor::Warning),
            ResultStatus::InProgress => StatusChip::new("In Progress", ChipColor::Info),
            ResultStatus::Completed => StatusChip::new("Completed", ChipColor::Primary),
            ResultStatus::Approved => StatusChip::new("Approved", ChipColor::Success),
            ResultStatus::Rejected => StatusChip::new("Rejected", ChipColor::Error),
            ResultStatus::Outsourced => StatusChip::new("Outsourced", ChipColor::Secondary),
            ResultStatus::Unknown(code) => StatusChip::fallback(code.to_string()),
        }
    }
}

// ============================================================================
// Master record
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordStatus {
    Active,
    Inactive,
    Unknown(String),
}

impl RecordStatus {
    pub fn parse(raw: &str) -> Self {
        match normalise(raw).as_str() {
            "active" | "1" | "true" => RecordStatus::Active,
            "inactive" | "0" | "false" => RecordStatus::Inactive,
            _ => RecordStatus::Unknown(raw.trim().to_string()),
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            1 => RecordStatus::Active,
            0 => RecordStatus::Inactive,
            other => RecordStatus::Unknown(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RecordStatus::Active => "Active",
            RecordStatus::Inactive => "Inactive",
            RecordStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for RecordStatus {
    fn from(raw: String) -> Self {
        RecordStatus::parse(&raw)
    }
}

impl From<RecordStatus> for String {
    fn from(status: RecordStatus) -> Self {
        status.label().to_string()
    }
}

impl StatusLabel for RecordStatus {
    fn chip(&self) -> StatusChip {
        match self {
            RecordStatus::Active => StatusChip::new("Active", ChipColor::Success),
            RecordStatus::Inactive => StatusChip::new("Inactive", ChipColor::Error),
            RecordStatus::Unknown(raw) => StatusChip::fallback(raw.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALL_DOMAINS: [StatusDomain; 5] = [
        StatusDomain::Sample,
        StatusDomain::Requisition,
        StatusDomain::Authorization,
        StatusDomain::Result,
        StatusDomain::Record,
    ];

    #[test]
    fn unmapped_text_falls_back_to_raw_title() {
        for domain in [
            StatusDomain::Sample,
            StatusDomain::Requisition,
            StatusDomain::Authorization,
            StatusDomain::Record,
        ] {
            let chip = status_chip(domain, &RawStatus::Text("On Hold".into()));
            assert_eq!(chip, StatusChip::new("On Hold", ChipColor::Default));
        }
    }

    #[test]
    fn never_panics_on_odd_wire_values() {
        let values = [
            json!(null),
            json!(""),
            json!("null"),
            json!(0),
            json!(-3),
            json!(99),
            json!(2.5),
            json!(true),
            json!({"nested": 1}),
            json!(["a"]),
            json!("😀"),
        ];
        for domain in ALL_DOMAINS {
            for value in &values {
                let chip = status_chip(domain, &RawStatus::from(value));
                assert!(!chip.title.is_empty(), "{domain:?} {value}");
            }
        }
    }

    #[test]
    fn unknown_result_code_shows_code() {
        let chip = status_chip(StatusDomain::Result, &RawStatus::Code(42));
        assert_eq!(chip, StatusChip::new("42", ChipColor::Default));
    }

    #[test]
    fn null_result_status_is_missing_not_a_lookup() {
        assert_eq!(
            ResultStatus::from_raw(&RawStatus::Null),
            Some(ResultStatus::Missing)
        );
        assert_eq!(
            ResultStatus::from_raw(&RawStatus::Text("null".into())),
            Some(ResultStatus::Missing)
        );
        assert_eq!(
            ResultStatus::from_raw(&RawStatus::Text(" 5 ".into())),
            Some(ResultStatus::Rejected)
        );
        assert_eq!(ResultStatus::from_raw(&RawStatus::Text("done".into())), None);
        assert_eq!(
            status_chip(StatusDomain::Result, &RawStatus::Text("done".into())),
            StatusChip::fallback("done")
        );
        assert_eq!(ResultStatus::Missing.chip(), StatusChip::missing());
    }

    #[test]
    fn result_status_round_trips_through_json() {
        let statuses: Vec<ResultStatus> =
            serde_json::from_value(json!([null, 1, 5, 6, 12])).expect("parse");
        assert_eq!(
            statuses,
            vec![
                ResultStatus::Missing,
                ResultStatus::Pending,
                ResultStatus::Rejected,
                ResultStatus::Outsourced,
                ResultStatus::Unknown(12),
            ]
        );
        assert_eq!(
            serde_json::to_value(&statuses).expect("render"),
            json!([null, 1, 5, 6, 12])
        );
    }

    #[test]
    fn sample_status_parsing_ignores_case_and_punctuation() {
        assert_eq!(SampleStatus::parse("In-Progress"), SampleStatus::InProgress);
        assert_eq!(SampleStatus::parse("in progress"), SampleStatus::InProgress);
        assert_eq!(SampleStatus::parse("SENT"), SampleStatus::Sent);
        assert_eq!(
            SampleStatus::parse(" Lost "),
            SampleStatus::Unknown("Lost".into())
        );
        assert_eq!(String::from(SampleStatus::InProgress), "in-progress");
    }

    #[test]
    fn sample_status_moves_forward_only() {
        use SampleStatus::*;
        assert!(Pending.can_transition_to(&Collected));
        assert!(Pending.can_transition_to(&Sent));
        assert!(Received.can_transition_to(&Outsourced));
        assert!(Collected.can_transition_to(&Rejected));
        assert!(!Sent.can_transition_to(&Collected));
        assert!(!Collected.can_transition_to(&Outsourced));
        assert!(!Completed.can_transition_to(&Rejected));
        assert!(!Sent.can_transition_to(&Sent));
        assert!(!Unknown("x".into()).can_transition_to(&Completed));
        assert_eq!(Received.next(), Some(InProgress));
        assert_eq!(Completed.next(), None);
    }

    #[test]
    fn requisition_status_matches_exactly() {
        assert_eq!(
            RequisitionStatus::parse("Pending Approval"),
            RequisitionStatus::PendingApproval
        );
        assert_eq!(
            RequisitionStatus::parse("pending approval"),
            RequisitionStatus::Unknown("pending approval".into())
        );
        assert_eq!(
            RequisitionStatus::PendingApproval.chip(),
            StatusChip::new("Pending Approval", ChipColor::Warning)
        );
    }

    #[test]
    fn record_status_accepts_numeric_codes() {
        assert_eq!(
            status_chip(StatusDomain::Record, &RawStatus::Code(1)),
            StatusChip::new("Active", ChipColor::Success)
        );
        assert_eq!(
            status_chip(StatusDomain::Record, &RawStatus::Code(7)),
            StatusChip::fallback("7")
        );
    }

    #[test]
    fn annotate_renders_rows_under_data_or_at_top_level() {
        let mut wrapped = json!({
            "success": true,
            "data": [
                {"id": "T1", "StatusID": 4},
                {"id": "T2", "StatusID": null},
                {"id": "T3"},
                "not a row"
            ]
        });
        annotate_status_chips(&mut wrapped, StatusDomain::Result, &["StatusID", "statusId"]);
        let rows = wrapped["data"].as_array().expect("rows");
        assert_eq!(rows[0]["statusChip"], json!({"title": "Approved", "color": "success"}));
        assert_eq!(rows[1]["statusChip"]["title"], MISSING_STATUS_TITLE);
        assert_eq!(rows[2]["statusChip"]["title"], MISSING_STATUS_TITLE);
        assert_eq!(rows[3], json!("not a row"));

        let mut bare = json!([{"status": "In-Progress"}]);
        annotate_status_chips(&mut bare, StatusDomain::Sample, &["status"]);
        assert_eq!(bare[0]["statusChip"], json!({"title": "In Progress", "color": "info"}));
    }

    #[test]
    fn chip_value_matches_serde_form() {
        let chip = StatusChip::new("Sent", ChipColor::Primary);
        assert_eq!(chip.to_value(), serde_json::to_value(&chip).expect("render"));
    }
}
