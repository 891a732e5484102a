use std::sync::Arc;

use lab_client::LabApiClient;
use lims_core::models::{AccreditationDetail, AutoApprovalRule, MasterRecord, Sample};
use lims_core::repositories::RequisitionService;
use lims_core::{AuditLog, InMemoryRepository, LimsConfig};

/// Application state for the REST API server
///
/// Holds the upstream client and the in-memory stores for the modules the laboratory API does
/// not serve. All stores share one audit log.
#[derive(Clone)]
pub struct AppState {
    pub lab: Arc<LabApiClient>,
    pub audit: Arc<AuditLog>,
    pub samples: Arc<InMemoryRepository<Sample>>,
    pub methods: Arc<InMemoryRepository<MasterRecord>>,
    pub auto_approval: Arc<InMemoryRepository<AutoApprovalRule>>,
    pub accreditation: Arc<InMemoryRepository<AccreditationDetail>>,
    pub requisitions: Arc<RequisitionService>,
    pub page_size: usize,
}

impl AppState {
    pub fn new(lab: LabApiClient, page_size: usize) -> Self {
        let audit = Arc::new(AuditLog::new());
        Self {
            lab: Arc::new(lab),
            samples: Arc::new(InMemoryRepository::new(audit.clone())),
            methods: Arc::new(InMemoryRepository::new(audit.clone())),
            auto_approval: Arc::new(InMemoryRepository::new(audit.clone())),
            accreditation: Arc::new(InMemoryRepository::new(audit.clone())),
            requisitions: Arc::new(RequisitionService::new(audit.clone())),
            audit,
            page_size: page_size.max(1),
        }
    }

    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn from_config(cfg: &LimsConfig) -> Result<Self, lab_client::LabClientError> {
        Ok(Self::new(LabApiClient::from_config(cfg)?, cfg.page_size()))
    }
}
