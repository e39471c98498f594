use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use super::domain::{BloodGroup, DonorId, DonorProfile, DonorRegistration, ScreeningRequest};
use super::intake::{IntakeGuard, IntakeViolation};
use super::repository::{
    DispatchError, DonorNotification, DonorRepository, NotificationDispatcher, RepositoryError,
};
use crate::workflows::eligibility::{
    EligibilityEvaluator, EligibilityThresholds, EligibilityVerdict,
};

/// Service composing intake checks, the eligibility evaluator, the profile
/// store and the notification hook.
pub struct DonorScreeningService<R, N> {
    guard: Arc<IntakeGuard>,
    repository: Arc<R>,
    notifications: Arc<N>,
    evaluator: Arc<EligibilityEvaluator>,
}

static DONOR_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_donor_id() -> DonorId {
    let id = DONOR_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DonorId(format!("donor-{id:06}"))
}

impl<R, N> DonorScreeningService<R, N>
where
    R: DonorRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>, thresholds: EligibilityThresholds) -> Self {
        Self::with_guard(IntakeGuard::default(), repository, notifications, thresholds)
    }

    pub fn with_guard(
        guard: IntakeGuard,
        repository: Arc<R>,
        notifications: Arc<N>,
        thresholds: EligibilityThresholds,
    ) -> Self {
        Self {
            guard: Arc::new(guard),
            repository,
            notifications,
            evaluator: Arc::new(EligibilityEvaluator::new(thresholds)),
        }
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    pub fn register(
        &self,
        registration: DonorRegistration,
    ) -> Result<DonorProfile, ScreeningServiceError> {
        self.register_on(registration, Local::now().date_naive())
    }

    /// Register a consenting donor. New donors stay unverified until screened.
    pub fn register_on(
        &self,
        registration: DonorRegistration,
        today: NaiveDate,
    ) -> Result<DonorProfile, ScreeningServiceError> {
        self.guard.check_registration(&registration, today)?;

        let profile = DonorProfile {
            donor_id: next_donor_id(),
            full_name: registration.full_name.trim().to_string(),
            age: registration.age,
            gender: registration.gender,
            blood_group: registration.blood_group,
            location: registration.location,
            last_donation_date: registration.last_donation_date,
            verified: false,
            available: false,
            last_screening: None,
        };

        let stored = self.repository.insert(profile)?;
        info!(donor_id = %stored.donor_id, blood_group = stored.blood_group.label(), "donor registered");
        Ok(stored)
    }

    pub fn screen(
        &self,
        donor_id: &DonorId,
        request: ScreeningRequest,
    ) -> Result<EligibilityVerdict, ScreeningServiceError> {
        self.screen_on(donor_id, request, Local::now().date_naive())
    }

    /// Screen a registered donor and persist the outcome on their profile.
    pub fn screen_on(
        &self,
        donor_id: &DonorId,
        request: ScreeningRequest,
        today: NaiveDate,
    ) -> Result<EligibilityVerdict, ScreeningServiceError> {
        let mut profile = self
            .repository
            .fetch(donor_id)?
            .ok_or(RepositoryError::NotFound)?;

        let assessment = request.to_assessment(&profile);
        self.guard.check_donation_date(assessment.last_donation_date, today)?;
        let verdict = self.evaluator.evaluate_on(&assessment, today);

        profile.verified = verdict.overall_eligible;
        profile.available = verdict.overall_eligible;
        profile.last_donation_date = assessment.last_donation_date;
        profile.last_screening = Some(verdict.clone());
        self.repository.update(profile)?;

        if verdict.overall_eligible {
            info!(%donor_id, "donor cleared to donate");
        } else {
            let failed: Vec<&str> = verdict.failed_criteria().map(|r| r.name()).collect();
            warn!(%donor_id, failed = ?failed, "donor deferred");
        }

        self.notifications.dispatch(notification_for(donor_id, &verdict))?;

        Ok(verdict)
    }

    pub fn get(&self, donor_id: &DonorId) -> Result<DonorProfile, ScreeningServiceError> {
        let profile = self
            .repository
            .fetch(donor_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(profile)
    }

    pub fn available_donors(
        &self,
        blood_group: Option<BloodGroup>,
    ) -> Result<Vec<DonorProfile>, ScreeningServiceError> {
        Ok(self.repository.available(blood_group)?)
    }
}

fn notification_for(donor_id: &DonorId, verdict: &EligibilityVerdict) -> DonorNotification {
    let mut details = BTreeMap::new();
    details.insert("evaluated_on".to_string(), verdict.evaluated_on.to_string());

    let template = if verdict.overall_eligible {
        "donor_eligible"
    } else {
        let failed: Vec<&str> = verdict.failed_criteria().map(|r| r.name()).collect();
        details.insert("failed_criteria".to_string(), failed.join(","));
        if let Some(date) = verdict.next_eligible_date {
            details.insert("next_eligible_date".to_string(), date.to_string());
        }
        "donor_deferred"
    };

    DonorNotification {
        template: template.to_string(),
        donor_id: donor_id.clone(),
        details,
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
