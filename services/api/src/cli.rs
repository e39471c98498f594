use crate::demo::{run_demo, DemoArgs};
use crate::report::{run_check, run_roster, CheckArgs, RosterArgs};
use crate::server;
use blood_bridge::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Blood Bridge",
    about = "Screen blood donors and run the Blood Bridge coordination service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check a single donor's eligibility from measured values
    Check(CheckArgs),
    /// Screen every donor on a donation-camp roster CSV
    Roster(RosterArgs),
    /// Walk through registration, screening and deferral end to end
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args),
        Command::Roster(args) => run_roster(args),
        Command::Demo(args) => run_demo(args),
    }
}
