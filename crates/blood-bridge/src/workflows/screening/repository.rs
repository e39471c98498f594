use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{BloodGroup, DonorId, DonorProfile};

/// Profile store holding donor records and their screening outcomes.
pub trait DonorRepository: Send + Sync {
    fn insert(&self, profile: DonorProfile) -> Result<DonorProfile, RepositoryError>;
    fn update(&self, profile: DonorProfile) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DonorId) -> Result<Option<DonorProfile>, RepositoryError>;
    /// Verified donors currently flagged available, optionally for one blood group.
    fn available(&self, blood_group: Option<BloodGroup>)
        -> Result<Vec<DonorProfile>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("donor already exists")]
    Conflict,
    #[error("donor not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for donor-facing notifications (SMS, push, e-mail adapters).
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, notification: DonorNotification) -> Result<(), DispatchError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorNotification {
    pub template: String,
    pub donor_id: DonorId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
