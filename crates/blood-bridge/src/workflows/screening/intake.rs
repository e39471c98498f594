use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::DonorRegistration;
use crate::workflows::eligibility::{DonorAssessmentInput, Gender};

/// Validation errors raised while normalising caller input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("donor consent is required before registration")]
    ConsentRequired,
    #[error("donor name is required")]
    MissingName,
    #[error("age {0} is not plausible")]
    ImplausibleAge(u32),
    #[error("{field} '{value}' is not a valid YYYY-MM-DD date")]
    InvalidDate { field: &'static str, value: String },
    #[error("last donation date {0} is in the future")]
    FutureDonationDate(NaiveDate),
}

const MAX_PLAUSIBLE_AGE: u32 = 130;

/// Raw form or spreadsheet row before normalisation. Field names double as
/// CSV headers for camp rosters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentForm {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub weight_kg: Option<String>,
    pub height_cm: Option<String>,
    pub hemoglobin_g_dl: Option<String>,
    pub rbc_count: Option<String>,
    pub systolic_bp: Option<String>,
    pub diastolic_bp: Option<String>,
    pub pulse_rate: Option<String>,
    pub last_donation_date: Option<String>,
    pub chronic_conditions: Option<String>,
    pub medications: Option<String>,
    pub recent_illness: Option<String>,
    pub recent_surgery: Option<String>,
    pub tattoo_or_piercing: Option<String>,
    pub consent: Option<String>,
}

/// Turns raw caller input into well-typed assessment input.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    require_consent: bool,
}

impl IntakeGuard {
    pub fn new(require_consent: bool) -> Self {
        Self { require_consent }
    }

    pub fn check_registration(
        &self,
        registration: &DonorRegistration,
        today: NaiveDate,
    ) -> Result<(), IntakeViolation> {
        if self.require_consent && !registration.consent_given {
            return Err(IntakeViolation::ConsentRequired);
        }
        if registration.full_name.trim().is_empty() {
            return Err(IntakeViolation::MissingName);
        }
        if registration.age > MAX_PLAUSIBLE_AGE {
            return Err(IntakeViolation::ImplausibleAge(registration.age));
        }
        self.check_donation_date(registration.last_donation_date, today)
    }

    /// A recorded donation must not lie after `today`.
    pub fn check_donation_date(
        &self,
        last_donation_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<(), IntakeViolation> {
        match last_donation_date {
            Some(date) if date > today => Err(IntakeViolation::FutureDonationDate(date)),
            _ => Ok(()),
        }
    }

    pub fn normalize(
        &self,
        form: &AssessmentForm,
        today: NaiveDate,
    ) -> Result<DonorAssessmentInput, IntakeViolation> {
        let consent_given = parse_flag(form.consent.as_deref());
        if self.require_consent && !consent_given {
            return Err(IntakeViolation::ConsentRequired);
        }

        let last_donation_date =
            parse_date("last_donation_date", form.last_donation_date.as_deref())?;
        self.check_donation_date(last_donation_date, today)?;

        Ok(DonorAssessmentInput {
            age: parse_whole(form.age.as_deref()),
            gender: form
                .gender
                .as_deref()
                .map(Gender::parse)
                .unwrap_or_default(),
            weight_kg: parse_decimal(form.weight_kg.as_deref()),
            height_cm: parse_whole(form.height_cm.as_deref()),
            hemoglobin_g_dl: parse_decimal(form.hemoglobin_g_dl.as_deref()),
            rbc_count_million_per_ul: parse_decimal(form.rbc_count.as_deref()),
            systolic_bp_mm_hg: parse_whole(form.systolic_bp.as_deref()),
            diastolic_bp_mm_hg: parse_whole(form.diastolic_bp.as_deref()),
            pulse_rate_bpm: parse_whole(form.pulse_rate.as_deref()),
            last_donation_date,
            has_chronic_medical_conditions: parse_flag(form.chronic_conditions.as_deref()),
            taking_medications: parse_flag(form.medications.as_deref()),
            recent_illness: parse_flag(form.recent_illness.as_deref()),
            recent_surgery: parse_flag(form.recent_surgery.as_deref()),
            has_recent_tattoo_or_piercing: parse_flag(form.tattoo_or_piercing.as_deref()),
            consent_given,
        })
    }
}

impl Default for IntakeGuard {
    fn default() -> Self {
        Self::new(true)
    }
}

fn blank_to_none(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Blank is absent; anything unusable as a measurement reads as `0`.
fn parse_decimal(raw: Option<&str>) -> Option<f64> {
    let value = blank_to_none(raw)?;
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed > 0.0 => Some(parsed),
        _ => Some(0.0),
    }
}

fn parse_whole(raw: Option<&str>) -> Option<u32> {
    parse_decimal(raw).map(|value| value.trunc().min(u32::MAX as f64) as u32)
}

fn parse_flag(raw: Option<&str>) -> bool {
    blank_to_none(raw)
        .map(|value| {
            matches!(
                value.to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "1" | "on"
            )
        })
        .unwrap_or(false)
}

fn parse_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, IntakeViolation> {
    blank_to_none(raw)
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| IntakeViolation::InvalidDate {
                field,
                value: value.to_string(),
            })
        })
        .transpose()
}
