//! Constants used throughout the LIMS core crate.
//!
//! Wire-level literals live here so that the route layer, the upstream client and the tests
//! agree on them.

/// Default number of rows per page in list views.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default upstream request timeout, in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Default listen address for the REST service.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Actor recorded in audit entries when the caller does not identify itself.
pub const SYSTEM_ACTOR: &str = "system";

/// Requisition status literal that enables the Approve and Cancel actions.
pub const PENDING_APPROVAL: &str = "Pending Approval";

/// Response message for a successful sample dispatch.
pub const SAMPLE_SENT_MESSAGE: &str = "Sample Sent Successfully";

/// Fallback message when an upstream error body carries no usable message.
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "Upstream request failed";

/// Minimum Jaro-Winkler similarity for a typo-tolerant match in list filtering.
pub const SIMILARITY_THRESHOLD: f64 = 0.88;
