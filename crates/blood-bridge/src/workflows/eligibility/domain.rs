use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Donor gender as captured at registration. Only `Male` and `Female` select
/// a gender-specific RBC band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl Gender {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            "other" | "non-binary" | "nonbinary" => Self::Other,
            _ => Self::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::Unknown => "unknown",
        }
    }
}

impl From<Option<String>> for Gender {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Self::parse).unwrap_or_default()
    }
}

/// Measured and self-reported attributes for a single eligibility check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorAssessmentInput {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Recorded for the donor card only.
    #[serde(default)]
    pub height_cm: Option<u32>,
    #[serde(default)]
    pub hemoglobin_g_dl: Option<f64>,
    #[serde(default, rename = "rbcCountMillionPerUL")]
    pub rbc_count_million_per_ul: Option<f64>,
    #[serde(default)]
    pub systolic_bp_mm_hg: Option<u32>,
    #[serde(default)]
    pub diastolic_bp_mm_hg: Option<u32>,
    #[serde(default)]
    pub pulse_rate_bpm: Option<u32>,
    #[serde(default)]
    pub last_donation_date: Option<NaiveDate>,
    #[serde(default)]
    pub has_chronic_medical_conditions: bool,
    #[serde(default)]
    pub taking_medications: bool,
    #[serde(default)]
    pub recent_illness: bool,
    #[serde(default)]
    pub recent_surgery: bool,
    #[serde(default)]
    pub has_recent_tattoo_or_piercing: bool,
    #[serde(default)]
    pub consent_given: bool,
}

/// Gating checks in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Age,
    Weight,
    Hemoglobin,
    RbcCount,
    BloodPressure,
    PulseRate,
    HealthConditions,
    TattooPiercing,
    DonationInterval,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 9] = [
        CriterionKind::Age,
        CriterionKind::Weight,
        CriterionKind::Hemoglobin,
        CriterionKind::RbcCount,
        CriterionKind::BloodPressure,
        CriterionKind::PulseRate,
        CriterionKind::HealthConditions,
        CriterionKind::TattooPiercing,
        CriterionKind::DonationInterval,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            CriterionKind::Age => "age",
            CriterionKind::Weight => "weight",
            CriterionKind::Hemoglobin => "hemoglobin",
            CriterionKind::RbcCount => "rbc_count",
            CriterionKind::BloodPressure => "blood_pressure",
            CriterionKind::PulseRate => "pulse_rate",
            CriterionKind::HealthConditions => "health_conditions",
            CriterionKind::TattooPiercing => "tattoo_piercing",
            CriterionKind::DonationInterval => "donation_interval",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    Pass,
    Fail,
    /// The measurement was never recorded.
    Indeterminate,
}

/// Outcome of one gating check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionResult {
    #[serde(rename = "criterionName")]
    pub criterion: CriterionKind,
    pub observed_value_display: String,
    pub passed: bool,
    pub status: CriterionStatus,
    pub message: String,
}

impl CriterionResult {
    pub(crate) fn pass(
        criterion: CriterionKind,
        observed: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            criterion,
            observed_value_display: observed.into(),
            passed: true,
            status: CriterionStatus::Pass,
            message: message.into(),
        }
    }

    pub(crate) fn fail(
        criterion: CriterionKind,
        observed: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            criterion,
            observed_value_display: observed.into(),
            passed: false,
            status: CriterionStatus::Fail,
            message: message.into(),
        }
    }

    pub(crate) fn indeterminate(criterion: CriterionKind, message: impl Into<String>) -> Self {
        Self {
            criterion,
            observed_value_display: "not recorded".to_string(),
            passed: false,
            status: CriterionStatus::Indeterminate,
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.criterion.name()
    }
}

/// Complete checklist produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityVerdict {
    pub overall_eligible: bool,
    pub criteria: Vec<CriterionResult>,
    pub evaluated_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_eligible_date: Option<NaiveDate>,
}

impl EligibilityVerdict {
    pub fn criterion(&self, kind: CriterionKind) -> Option<&CriterionResult> {
        self.criteria.iter().find(|result| result.criterion == kind)
    }

    pub fn failed_criteria(&self) -> impl Iterator<Item = &CriterionResult> {
        self.criteria.iter().filter(|result| !result.passed)
    }

    pub fn has_indeterminate(&self) -> bool {
        self.criteria
            .iter()
            .any(|result| result.status == CriterionStatus::Indeterminate)
    }

    pub fn summary(&self) -> String {
        if self.overall_eligible {
            return "eligible to donate".to_string();
        }

        let failed: Vec<&str> = self.failed_criteria().map(CriterionResult::name).collect();
        match self.next_eligible_date {
            Some(date) if failed == [CriterionKind::DonationInterval.name()] => {
                format!("deferred until {date}")
            }
            _ => format!("not eligible: {}", failed.join(", ")),
        }
    }
}
