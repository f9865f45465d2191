//! Talent Risk seeding CLI
//!
//! Run with: cargo run -p talentrisk-seed -- generate --count 50 --clear

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use talentrisk_common::RiskLevel;
use talentrisk_config::{Config, StorageBackend};
use talentrisk_db::{EmployeeRepository, EmployeeStore, MemoryStore, MongoStore};
use talentrisk_scorer::{RiskInputs, RiskModel};
use talentrisk_seed::{RiskMix, WorkforceGenerator};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "talentrisk-seed", version, about = "Seed and maintain the Talent Risk employee store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic employees and insert them
    Generate {
        /// Number of employees
        #[arg(long, default_value_t = 50)]
        count: usize,

        /// Delete existing employees first
        #[arg(long)]
        clear: bool,

        /// RNG seed for reproducible batches
        #[arg(long, env = "TALENTRISK_SEED")]
        seed: Option<u64>,

        /// Share of HIGH-risk employees
        #[arg(long, default_value_t = 0.20)]
        high: f64,

        /// Share of MEDIUM-risk employees
        #[arg(long, default_value_t = 0.30)]
        medium: f64,

        /// Print the batch as JSON instead of writing it
        #[arg(long)]
        dry_run: bool,
    },
    /// Rescore every stored employee with the configured model
    Rescore,
    /// Print dashboard metrics for the stored workforce
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    config.log_source();

    let model = Arc::new(RiskModel::from_config(&config.scoring)?);

    match cli.command {
        Commands::Generate { count, clear, seed, high, medium, dry_run } => {
            let mix = RiskMix::new(high, medium, 1.0 - high - medium)?;
            let mut generator = match seed {
                Some(s) => WorkforceGenerator::seeded(s),
                None => WorkforceGenerator::from_entropy(),
            }
            .with_mix(mix);
            let batch = generator.generate(count);

            if dry_run {
                let employees: Vec<_> = batch.into_iter().map(|(_, e)| e).collect();
                print_level_counts(&model, &employees);
                println!("{}", serde_json::to_string_pretty(&employees)?);
                return Ok(());
            }

            let repo = repository(&config, model).await?;
            if clear {
                let removed = repo.delete_all().await?;
                info!(removed, "cleared existing employees");
            }
            let employees = batch.into_iter().map(|(_, e)| e).collect();
            let inserted = repo.create_many(employees).await?;
            println!("Inserted {} employees", inserted);
            print_stats(&repo).await?;
        }
        Commands::Rescore => {
            let repo = repository(&config, model).await?;
            let updated = repo.recalculate_all().await?;
            println!("Rescored {} employees", updated);
        }
        Commands::Stats => {
            let repo = repository(&config, model).await?;
            print_stats(&repo).await?;
        }
    }

    Ok(())
}

async fn repository(config: &Config, model: Arc<RiskModel>) -> anyhow::Result<EmployeeRepository> {
    let store: Arc<dyn EmployeeStore> = match config.storage.backend {
        StorageBackend::Mongo => {
            let store = MongoStore::connect(&config.storage).await?;
            store
                .ping()
                .await
                .with_context(|| format!("MongoDB at {} is unreachable", config.storage.redacted_uri()))?;
            store.ensure_indexes().await?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            warn!("memory backend selected; nothing written by this command will persist");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(EmployeeRepository::new(store, model))
}

fn print_level_counts(model: &RiskModel, employees: &[talentrisk_common::NewEmployee]) {
    let mut counts = [0usize; 3];
    for e in employees {
        match model.assess(&RiskInputs::from(e)).level {
            RiskLevel::High => counts[0] += 1,
            RiskLevel::Medium => counts[1] += 1,
            RiskLevel::Low => counts[2] += 1,
        }
    }
    eprintln!("High: {}  Medium: {}  Low: {}", counts[0], counts[1], counts[2]);
}

async fn print_stats(repo: &EmployeeRepository) -> anyhow::Result<()> {
    let metrics = repo.metrics().await?;
    let d = metrics.risk_distribution;

    println!("\n=== STATISTICS ===");
    println!("Total employees:   {}", metrics.total_employees);
    println!("Average risk:      {:.2}", metrics.avg_risk_score);
    println!("High risk:         {}", d.high);
    println!("Medium risk:       {}", d.medium);
    println!("Low risk:          {}", d.low);
    println!("\n{:<16} {:>6} {:>6} {:>8}", "Department", "Total", "High", "Avg");
    for dept in &metrics.departments {
        println!(
            "{:<16} {:>6} {:>6} {:>8.2}",
            dept.department, dept.total, dept.high, dept.avg_risk_score
        );
    }
    Ok(())
}
