use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::eligibility::{EligibilityThresholds, Gender};
use crate::workflows::screening::domain::{
    BloodGroup, DonorId, DonorProfile, DonorRegistration, ScreeningRequest,
};
use crate::workflows::screening::intake::AssessmentForm;
use crate::workflows::screening::repository::{
    DispatchError, DonorNotification, DonorRepository, NotificationDispatcher, RepositoryError,
};
use crate::workflows::screening::{screening_router, DonorScreeningService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 20).expect("valid date")
}

pub(super) fn registration() -> DonorRegistration {
    DonorRegistration {
        full_name: "Asha Verma".to_string(),
        age: 29,
        gender: Gender::Female,
        blood_group: BloodGroup::ONegative,
        location: Some("Pune".to_string()),
        last_donation_date: None,
        consent_given: true,
    }
}

pub(super) fn healthy_request() -> ScreeningRequest {
    ScreeningRequest {
        weight_kg: Some(58.0),
        height_cm: Some(162),
        hemoglobin_g_dl: Some(13.4),
        rbc_count_million_per_ul: Some(4.5),
        systolic_bp_mm_hg: Some(122),
        diastolic_bp_mm_hg: Some(78),
        pulse_rate_bpm: Some(68),
        ..ScreeningRequest::default()
    }
}

pub(super) fn healthy_form() -> AssessmentForm {
    AssessmentForm {
        age: Some("34".to_string()),
        gender: Some("M".to_string()),
        weight_kg: Some("72.5".to_string()),
        height_cm: Some("175".to_string()),
        hemoglobin_g_dl: Some("14.1".to_string()),
        rbc_count: Some("5.1".to_string()),
        systolic_bp: Some("128".to_string()),
        diastolic_bp: Some("82".to_string()),
        pulse_rate: Some("74".to_string()),
        consent: Some("yes".to_string()),
        ..AssessmentForm::default()
    }
}

pub(super) fn build_service() -> (
    DonorScreeningService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = DonorScreeningService::new(
        repository.clone(),
        notifications.clone(),
        EligibilityThresholds::standard(),
    );
    (service, repository, notifications)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<BTreeMap<DonorId, DonorProfile>>>,
}

impl DonorRepository for MemoryRepository {
    fn insert(&self, profile: DonorProfile) -> Result<DonorProfile, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&profile.donor_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.donor_id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: DonorProfile) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(profile.donor_id.clone(), profile);
        Ok(())
    }

    fn fetch(&self, id: &DonorId) -> Result<Option<DonorProfile>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn available(
        &self,
        blood_group: Option<BloodGroup>,
    ) -> Result<Vec<DonorProfile>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|profile| profile.verified && profile.available)
            .filter(|profile| blood_group.map_or(true, |group| profile.blood_group == group))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<DonorNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<DonorNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationDispatcher for MemoryNotifications {
    fn dispatch(&self, notification: DonorNotification) -> Result<(), DispatchError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl DonorRepository for ConflictRepository {
    fn insert(&self, _profile: DonorProfile) -> Result<DonorProfile, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _profile: DonorProfile) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &DonorId) -> Result<Option<DonorProfile>, RepositoryError> {
        Ok(None)
    }

    fn available(
        &self,
        _blood_group: Option<BloodGroup>,
    ) -> Result<Vec<DonorProfile>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct OfflineDispatcher;

impl NotificationDispatcher for OfflineDispatcher {
    fn dispatch(&self, _notification: DonorNotification) -> Result<(), DispatchError> {
        Err(DispatchError::Transport("sms gateway offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: DonorScreeningService<MemoryRepository, MemoryNotifications>,
) -> axum::Router {
    screening_router(Arc::new(service))
}
