//! Donor registration, screening-desk workflow and camp roster screening
//! built around the eligibility evaluator.

pub mod domain;
pub mod intake;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BloodGroup, DonorId, DonorProfile, DonorRegistration, DonorStatusView, ScreeningRequest,
};
pub use intake::{AssessmentForm, IntakeGuard, IntakeViolation};
pub use repository::{
    DispatchError, DonorNotification, DonorRepository, NotificationDispatcher, RepositoryError,
};
pub use roster::{CampRosterScreener, RosterImportError, RosterOutcome, RosterSummary};
pub use router::screening_router;
pub use service::{DonorScreeningService, ScreeningServiceError};
