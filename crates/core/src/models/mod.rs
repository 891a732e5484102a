//! Domain records exchanged with the dashboard and the laboratory API.

pub mod accreditation;
pub mod audit;
pub mod auto_approval;
pub mod master;
pub mod receive;
pub mod requisition;
pub mod sample;
pub mod test_result;

pub use accreditation::{AccreditationBody, AccreditationDetail, AccreditationTest};
pub use audit::AuditEntry;
pub use auto_approval::AutoApprovalRule;
pub use master::{MasterRecord, MasterResource};
pub use receive::{BarcodeRequest, DownloadParams, ExportFormat, ReceiveStatusChange, RemarkUpdate};
pub use requisition::{Requisition, RequisitionRow};
pub use sample::{Sample, SampleRow, SampleSendRequest, SentSample};
pub use test_result::{ResultStatusChange, TestResult, TestResultQuery};
