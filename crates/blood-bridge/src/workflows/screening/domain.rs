use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::eligibility::{DonorAssessmentInput, EligibilityVerdict, Gender};

/// Identifier wrapper for registered donors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DonorId(pub String);

impl fmt::Display for DonorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const fn label(self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase().replace(' ', "");
        let group = match normalized.as_str() {
            "A+" | "APOS" => BloodGroup::APositive,
            "A-" | "ANEG" => BloodGroup::ANegative,
            "B+" | "BPOS" => BloodGroup::BPositive,
            "B-" | "BNEG" => BloodGroup::BNegative,
            "AB+" | "ABPOS" => BloodGroup::AbPositive,
            "AB-" | "ABNEG" => BloodGroup::AbNegative,
            "O+" | "OPOS" => BloodGroup::OPositive,
            "O-" | "ONEG" => BloodGroup::ONegative,
            _ => return None,
        };
        Some(group)
    }
}

/// Details captured when a donor signs up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorRegistration {
    pub full_name: String,
    pub age: u32,
    #[serde(default)]
    pub gender: Gender,
    pub blood_group: BloodGroup,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub last_donation_date: Option<NaiveDate>,
    #[serde(default)]
    pub consent_given: bool,
}

/// Stored donor profile, including the last screening outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    pub donor_id: DonorId,
    pub full_name: String,
    pub age: u32,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub location: Option<String>,
    pub last_donation_date: Option<NaiveDate>,
    pub verified: bool,
    pub available: bool,
    pub last_screening: Option<EligibilityVerdict>,
}

/// Measurements and declarations taken at a screening desk. Age and gender
/// come from the donor profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreeningRequest {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<u32>,
    pub hemoglobin_g_dl: Option<f64>,
    #[serde(rename = "rbcCountMillionPerUL")]
    pub rbc_count_million_per_ul: Option<f64>,
    pub systolic_bp_mm_hg: Option<u32>,
    pub diastolic_bp_mm_hg: Option<u32>,
    pub pulse_rate_bpm: Option<u32>,
    /// Overrides the donation date held on the profile.
    pub last_donation_date: Option<NaiveDate>,
    pub has_chronic_medical_conditions: bool,
    pub taking_medications: bool,
    pub recent_illness: bool,
    pub recent_surgery: bool,
    pub has_recent_tattoo_or_piercing: bool,
}

impl ScreeningRequest {
    pub fn to_assessment(&self, profile: &DonorProfile) -> DonorAssessmentInput {
        DonorAssessmentInput {
            age: Some(profile.age),
            gender: profile.gender,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            hemoglobin_g_dl: self.hemoglobin_g_dl,
            rbc_count_million_per_ul: self.rbc_count_million_per_ul,
            systolic_bp_mm_hg: self.systolic_bp_mm_hg,
            diastolic_bp_mm_hg: self.diastolic_bp_mm_hg,
            pulse_rate_bpm: self.pulse_rate_bpm,
            last_donation_date: self.last_donation_date.or(profile.last_donation_date),
            has_chronic_medical_conditions: self.has_chronic_medical_conditions,
            taking_medications: self.taking_medications,
            recent_illness: self.recent_illness,
            recent_surgery: self.recent_surgery,
            has_recent_tattoo_or_piercing: self.has_recent_tattoo_or_piercing,
            consent_given: true,
        }
    }
}

/// Public status of a donor exposed by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorStatusView {
    pub donor_id: DonorId,
    pub blood_group: &'static str,
    pub verified: bool,
    pub available: bool,
    pub screening_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_eligible_date: Option<NaiveDate>,
}

impl DonorProfile {
    pub fn screening_summary(&self) -> String {
        match &self.last_screening {
            Some(verdict) => verdict.summary(),
            None => "awaiting screening".to_string(),
        }
    }

    pub fn status_view(&self) -> DonorStatusView {
        DonorStatusView {
            donor_id: self.donor_id.clone(),
            blood_group: self.blood_group.label(),
            verified: self.verified,
            available: self.available,
            screening_summary: self.screening_summary(),
            next_eligible_date: self
                .last_screening
                .as_ref()
                .and_then(|verdict| verdict.next_eligible_date),
        }
    }
}
