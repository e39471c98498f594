use crate::infra::parse_date;
use blood_bridge::config::{load_thresholds, AppConfig};
use blood_bridge::error::AppError;
use blood_bridge::workflows::eligibility::{
    CriterionStatus, DonorAssessmentInput, EligibilityEvaluator, EligibilityThresholds,
    EligibilityVerdict, Gender,
};
use blood_bridge::workflows::screening::{
    CampRosterScreener, IntakeGuard, RosterOutcome, RosterSummary,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Donor age in years
    #[arg(long)]
    pub(crate) age: Option<u32>,
    /// male, female, other (anything else is treated as unknown)
    #[arg(long, value_parser = parse_gender, default_value = "unknown")]
    pub(crate) gender: Gender,
    #[arg(long)]
    pub(crate) weight_kg: Option<f64>,
    #[arg(long)]
    pub(crate) height_cm: Option<u32>,
    /// Hemoglobin in g/dL
    #[arg(long)]
    pub(crate) hemoglobin: Option<f64>,
    /// RBC count in million cells/uL
    #[arg(long)]
    pub(crate) rbc: Option<f64>,
    #[arg(long)]
    pub(crate) systolic: Option<u32>,
    #[arg(long)]
    pub(crate) diastolic: Option<u32>,
    /// Pulse rate in beats per minute
    #[arg(long)]
    pub(crate) pulse: Option<u32>,
    /// Date of the most recent donation (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) last_donation: Option<NaiveDate>,
    #[arg(long)]
    pub(crate) chronic_conditions: bool,
    #[arg(long)]
    pub(crate) medications: bool,
    #[arg(long)]
    pub(crate) recent_illness: bool,
    #[arg(long)]
    pub(crate) recent_surgery: bool,
    /// Tattoo or piercing within the look-back window
    #[arg(long)]
    pub(crate) tattoo: bool,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// JSON threshold override file (defaults to APP_ELIGIBILITY_RULES)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Print the verdict as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl CheckArgs {
    fn assessment(&self) -> DonorAssessmentInput {
        DonorAssessmentInput {
            age: self.age,
            gender: self.gender,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            hemoglobin_g_dl: self.hemoglobin,
            rbc_count_million_per_ul: self.rbc,
            systolic_bp_mm_hg: self.systolic,
            diastolic_bp_mm_hg: self.diastolic,
            pulse_rate_bpm: self.pulse,
            last_donation_date: self.last_donation,
            has_chronic_medical_conditions: self.chronic_conditions,
            taking_medications: self.medications,
            recent_illness: self.recent_illness,
            recent_surgery: self.recent_surgery,
            has_recent_tattoo_or_piercing: self.tattoo,
            consent_given: true,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RosterArgs {
    /// Camp roster CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Evaluation date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// JSON threshold override file (defaults to APP_ELIGIBILITY_RULES)
    #[arg(long)]
    pub(crate) rules: Option<PathBuf>,
    /// Print outcomes as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    Ok(Gender::parse(raw))
}

fn resolve_thresholds(rules: Option<&PathBuf>) -> Result<EligibilityThresholds, AppError> {
    match rules {
        Some(path) => Ok(load_thresholds(path)?),
        None => Ok(AppConfig::load()?.eligibility),
    }
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let thresholds = resolve_thresholds(args.rules.as_ref())?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let evaluator = EligibilityEvaluator::new(thresholds);

    let verdict = evaluator.evaluate_on(&args.assessment(), today);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        render_verdict(&verdict);
    }
    Ok(())
}

pub(crate) fn run_roster(args: RosterArgs) -> Result<(), AppError> {
    let thresholds = resolve_thresholds(args.rules.as_ref())?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let evaluator = EligibilityEvaluator::new(thresholds);
    let guard = IntakeGuard::default();

    let outcomes = CampRosterScreener::new(&guard, &evaluator).screen_path(&args.csv, today)?;
    let summary = RosterSummary::from_outcomes(&outcomes);

    if args.json {
        let payload = json!({ "summary": summary, "outcomes": outcomes });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Camp roster screening ({}, evaluated {})", args.csv.display(), today);
    for outcome in &outcomes {
        let status = match outcome {
            RosterOutcome::Screened { verdict, .. } => verdict.summary(),
            RosterOutcome::Rejected { reason, .. } => format!("rejected at intake ({reason})"),
        };
        println!("- {}: {}", outcome.donor_ref(), status);
    }
    println!(
        "\n{} donors: {} eligible, {} deferred, {} rejected",
        summary.total(),
        summary.eligible,
        summary.deferred,
        summary.rejected
    );
    Ok(())
}

pub(crate) fn render_verdict(verdict: &EligibilityVerdict) {
    println!("Eligibility check (evaluated {})", verdict.evaluated_on);
    for criterion in &verdict.criteria {
        let mark = match criterion.status {
            CriterionStatus::Pass => "PASS",
            CriterionStatus::Fail => "FAIL",
            CriterionStatus::Indeterminate => "????",
        };
        println!(
            "  [{}] {:<18} {:<28} {}",
            mark,
            criterion.name(),
            criterion.observed_value_display,
            criterion.message
        );
    }
    println!("Result: {}", verdict.summary());
}

#[cfg(test)]
mod tests {
    use super::*;
    use blood_bridge::workflows::eligibility::CriterionKind;

    fn args() -> CheckArgs {
        CheckArgs {
            age: Some(30),
            gender: Gender::Male,
            weight_kg: Some(70.0),
            height_cm: None,
            hemoglobin: Some(14.0),
            rbc: Some(5.0),
            systolic: Some(120),
            diastolic: Some(80),
            pulse: Some(72),
            last_donation: None,
            chronic_conditions: false,
            medications: false,
            recent_illness: false,
            recent_surgery: false,
            tattoo: true,
            today: None,
            rules: None,
            json: false,
        }
    }

    #[test]
    fn check_args_map_onto_assessment_input() {
        let input = args().assessment();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid");

        let verdict = EligibilityEvaluator::default().evaluate_on(&input, today);

        assert!(input.has_recent_tattoo_or_piercing);
        assert_eq!(input.hemoglobin_g_dl, Some(14.0));
        let failed: Vec<CriterionKind> = verdict.failed_criteria().map(|c| c.criterion).collect();
        assert_eq!(failed, vec![CriterionKind::TattooPiercing]);
    }
}
