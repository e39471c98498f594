use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use super::intake::{AssessmentForm, IntakeGuard};
use crate::workflows::eligibility::{EligibilityEvaluator, EligibilityVerdict};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read camp roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid camp roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

const DONOR_REF_HEADER: &str = "donor_ref";

/// Result for one roster row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RosterOutcome {
    Screened {
        donor_ref: String,
        verdict: EligibilityVerdict,
    },
    Rejected {
        donor_ref: String,
        reason: String,
    },
}

impl RosterOutcome {
    pub fn donor_ref(&self) -> &str {
        match self {
            RosterOutcome::Screened { donor_ref, .. } | RosterOutcome::Rejected { donor_ref, .. } => {
                donor_ref
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSummary {
    pub eligible: usize,
    pub deferred: usize,
    pub rejected: usize,
}

impl RosterSummary {
    pub fn from_outcomes(outcomes: &[RosterOutcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome {
                    RosterOutcome::Screened { verdict, .. } if verdict.overall_eligible => {
                        summary.eligible += 1
                    }
                    RosterOutcome::Screened { .. } => summary.deferred += 1,
                    RosterOutcome::Rejected { .. } => summary.rejected += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.eligible + self.deferred + self.rejected
    }
}

/// Screens every donor on a donation-camp roster export.
pub struct CampRosterScreener<'a> {
    guard: &'a IntakeGuard,
    evaluator: &'a EligibilityEvaluator,
}

impl<'a> CampRosterScreener<'a> {
    pub fn new(guard: &'a IntakeGuard, evaluator: &'a EligibilityEvaluator) -> Self {
        Self { guard, evaluator }
    }

    pub fn screen_path<P: AsRef<Path>>(
        &self,
        path: P,
        today: NaiveDate,
    ) -> Result<Vec<RosterOutcome>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        self.screen_reader(file, today)
    }

    pub fn screen_reader<R: Read>(
        &self,
        reader: R,
        today: NaiveDate,
    ) -> Result<Vec<RosterOutcome>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let ref_column = headers.iter().position(|header| header == DONOR_REF_HEADER);
        let mut outcomes = Vec::new();

        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let form: AssessmentForm = record.deserialize(Some(&headers))?;
            let donor_ref = ref_column
                .and_then(|column| record.get(column))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("row-{}", index + 1));

            let outcome = match self.guard.normalize(&form, today) {
                Ok(input) => RosterOutcome::Screened {
                    donor_ref,
                    verdict: self.evaluator.evaluate_on(&input, today),
                },
                Err(violation) => RosterOutcome::Rejected {
                    donor_ref,
                    reason: violation.to_string(),
                },
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
