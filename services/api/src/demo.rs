use crate::infra::{InMemoryDonorRepository, InMemoryNotificationDispatcher};
use crate::report::render_verdict;
use blood_bridge::error::AppError;
use blood_bridge::workflows::eligibility::{EligibilityThresholds, Gender};
use blood_bridge::workflows::screening::{
    BloodGroup, DonorRegistration, DonorScreeningService, ScreeningRequest,
};
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the screening date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the deferred-donor portion of the demo.
    #[arg(long)]
    pub(crate) skip_deferral: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let repository = Arc::new(InMemoryDonorRepository::default());
    let notifications = Arc::new(InMemoryNotificationDispatcher::default());
    let service = DonorScreeningService::new(
        repository,
        notifications.clone(),
        EligibilityThresholds::standard(),
    );

    println!("Blood Bridge demo (screening date {today})\n");

    let ravi = walk_in("Ravi Kumar", 34, Gender::Male, BloodGroup::BPositive);
    let first = service.register_on(ravi, today)?;
    println!("Registered {} ({})", first.donor_id, first.screening_summary());
    let verdict = service.screen_on(&first.donor_id, desk_readings(None), today)?;
    render_verdict(&verdict);

    if !args.skip_deferral {
        println!();
        let meera = walk_in("Meera Iyer", 27, Gender::Female, BloodGroup::ONegative);
        let second = service.register_on(meera, today)?;
        println!("Registered {} ({})", second.donor_id, second.screening_summary());
        let recent = today - Duration::days(30);
        let verdict = service.screen_on(&second.donor_id, desk_readings(Some(recent)), today)?;
        render_verdict(&verdict);
    }

    println!("\nAvailable donors:");
    for profile in service.available_donors(None)? {
        let view = profile.status_view();
        println!("- {} [{}] {}", view.donor_id, view.blood_group, view.screening_summary);
    }

    println!("\nNotifications queued:");
    for event in notifications.events() {
        let details: Vec<String> = event
            .details
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        println!("- {} -> {} ({})", event.template, event.donor_id, details.join(", "));
    }

    Ok(())
}

fn walk_in(name: &str, age: u32, gender: Gender, blood_group: BloodGroup) -> DonorRegistration {
    DonorRegistration {
        full_name: name.to_string(),
        age,
        gender,
        blood_group,
        location: Some("City Blood Bank".to_string()),
        last_donation_date: None,
        consent_given: true,
    }
}

fn desk_readings(last_donation_date: Option<NaiveDate>) -> ScreeningRequest {
    ScreeningRequest {
        weight_kg: Some(68.0),
        height_cm: Some(170),
        hemoglobin_g_dl: Some(13.8),
        rbc_count_million_per_ul: Some(4.8),
        systolic_bp_mm_hg: Some(124),
        diastolic_bp_mm_hg: Some(80),
        pulse_rate_bpm: Some(72),
        last_donation_date,
        ..ScreeningRequest::default()
    }
}
