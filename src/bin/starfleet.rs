//! starfleet - personnel and training ledger CLI.
//!
//! Runs contract transactions against a world state snapshot on disk.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use starfleet_ledger::{
    personnel_contract, GatewayConfig, InMemoryWorldState, LocalGateway, Personnel,
    PersonnelClient, TrainingRecord,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "starfleet")]
#[command(version, about, long_about = None)]
struct Cli {
    /// World state snapshot to read and update.
    #[arg(long, env = "STARFLEET_STATE_FILE", default_value = "world_state.bin")]
    state_file: PathBuf,

    #[arg(long, env = "CHANNEL_NAME", default_value = "channel")]
    channel: String,

    #[arg(long, env = "CHAINCODE_NAME", default_value = "chaincode")]
    chaincode: String,

    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show one personnel record.
    GetPersonnel { personnel_id: String },

    /// Enroll a new cadet.
    EnrollCadet {
        personnel_id: String,
        name: String,
        campus: String,
    },

    /// Record a completed training qualification.
    CompleteTraining {
        record_id: String,
        personnel_id: String,
        campus: String,
        training_code: String,
        /// RFC 3339 timestamp, e.g. 2024-06-01T12:00:00Z
        completed_at: String,
        issued_by: String,
    },

    /// Show one training record.
    GetTraining { record_id: String },

    /// List a person's training records by completion time.
    TrainingHistory { personnel_id: String },

    /// List everyone who holds a training code.
    TrainingRoster { training_code: String },

    /// Serve the contract over HTTP.
    #[cfg(feature = "http")]
    Serve {
        #[arg(long, env = "CHAINCODE_ADDRESS", default_value = "127.0.0.1:7052")]
        address: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = GatewayConfig::new(cli.channel, cli.chaincode);
    let gateway = LocalGateway::with_snapshot(config, personnel_contract(), &cli.state_file)
        .with_context(|| format!("failed to open world state {}", cli.state_file.display()))?;

    run(Arc::new(gateway), cli.command)
}

fn run(gateway: Arc<LocalGateway<InMemoryWorldState>>, command: Commands) -> Result<()> {
    let client = PersonnelClient::new(gateway.clone());

    match command {
        Commands::GetPersonnel { personnel_id } => {
            let personnel = client
                .get_personnel(&personnel_id)
                .context("failed to get personnel")?;
            print_personnel("Personnel Info:", &personnel);
        }
        Commands::EnrollCadet {
            personnel_id,
            name,
            campus,
        } => {
            let personnel = client
                .enroll_cadet(&personnel_id, &name, &campus)
                .context("failed to enroll cadet")?;
            print_personnel("Cadet enrolled successfully:", &personnel);
        }
        Commands::CompleteTraining {
            record_id,
            personnel_id,
            campus,
            training_code,
            completed_at,
            issued_by,
        } => {
            let record = client
                .complete_training(
                    &record_id,
                    &personnel_id,
                    &campus,
                    &training_code,
                    &completed_at,
                    &issued_by,
                )
                .context("failed to complete training")?;
            print_training("Training completed successfully:", &record);
        }
        Commands::GetTraining { record_id } => {
            let record = client
                .get_training_record(&record_id)
                .context("failed to get training record")?;
            print_training("Training Record:", &record);
        }
        Commands::TrainingHistory { personnel_id } => {
            let records = client
                .training_history(&personnel_id)
                .context("failed to get training history")?;
            println!("Training history for {personnel_id} ({} records):", records.len());
            print_rows(&records);
        }
        Commands::TrainingRoster { training_code } => {
            let records = client
                .training_roster(&training_code)
                .context("failed to get training roster")?;
            println!("Roster for {training_code} ({} records):", records.len());
            print_rows(&records);
        }
        #[cfg(feature = "http")]
        Commands::Serve { address } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start runtime")?;
            runtime
                .block_on(starfleet_ledger::gateway::http::serve(gateway, &address))
                .with_context(|| format!("failed to serve on {address}"))?;
        }
    }
    Ok(())
}

fn print_personnel(heading: &str, personnel: &Personnel) {
    println!("{heading}");
    println!("  ID:     {}", personnel.personnel_id);
    println!("  Name:   {}", personnel.name);
    println!("  Rank:   {}", personnel.rank);
    println!("  Campus: {}", personnel.campus);
    println!("  Status: {}", personnel.status);
}

fn print_training(heading: &str, record: &TrainingRecord) {
    println!("{heading}");
    println!("  Record ID:     {}", record.record_id);
    println!("  Personnel ID:  {}", record.personnel_id);
    println!("  Campus:        {}", record.campus);
    println!("  Training Code: {}", record.training_code);
    println!("  Completed At:  {}", record.completed_at);
    println!("  Issued By:     {}", record.issued_by);
    println!("  Status:        {}", record.status);
}

fn print_rows(records: &[TrainingRecord]) {
    for record in records {
        println!(
            "  {}  {}  {}  {}  {}",
            record.completed_at, record.record_id, record.personnel_id, record.training_code, record.status
        );
    }
}
