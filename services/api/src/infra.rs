use blood_bridge::workflows::screening::{
    BloodGroup, DispatchError, DonorId, DonorNotification, DonorProfile, DonorRepository,
    NotificationDispatcher, RepositoryError,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDonorRepository {
    records: Arc<Mutex<HashMap<DonorId, DonorProfile>>>,
}

impl DonorRepository for InMemoryDonorRepository {
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
        if guard.contains_key(&profile.donor_id) {
            guard.insert(profile.donor_id.clone(), profile);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
        let mut donors: Vec<DonorProfile> = guard
            .values()
            .filter(|profile| profile.verified && profile.available)
            .filter(|profile| blood_group.map_or(true, |group| profile.blood_group == group))
            .cloned()
            .collect();
        donors.sort_by(|a, b| a.donor_id.cmp(&b.donor_id));
        Ok(donors)
    }
}

/// Records notifications and logs them; stands in for the SMS/push gateway.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationDispatcher {
    events: Arc<Mutex<Vec<DonorNotification>>>,
}

impl NotificationDispatcher for InMemoryNotificationDispatcher {
    fn dispatch(&self, notification: DonorNotification) -> Result<(), DispatchError> {
        info!(
            template = %notification.template,
            donor_id = %notification.donor_id,
            "donor notification queued"
        );
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationDispatcher {
    pub(crate) fn events(&self) -> Vec<DonorNotification> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
