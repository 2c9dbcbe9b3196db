//! plan-day: plan a working day from a JSON job list.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use day_route_planner::geocode_cache::CachedGeocoder;
use day_route_planner::postcodes::{PostcodesClient, PostcodesConfig};
use day_route_planner::{plan_day, JobRequest, PlannerConfig};

#[derive(Parser)]
#[command(name = "plan-day", about = "Plan a field-service day from a list of jobs")]
struct Cli {
    /// JSON array of jobs; `-` reads stdin
    jobs: PathBuf,

    /// Planner config JSON (defaults apply to anything not set)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Indent the plan output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,day_route_planner=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PlannerConfig::from_path(path)
            .with_context(|| format!("loading planner config from {}", path.display()))?,
        None => PlannerConfig::default(),
    };

    let jobs = read_jobs(&cli.jobs)?;
    tracing::info!(jobs = jobs.len(), "planning day");

    let client = PostcodesClient::new(PostcodesConfig::from_env()?)
        .context("building postcode lookup client")?;
    let geocoder = CachedGeocoder::new(client);

    let plan = plan_day(&jobs, &geocoder, &config);
    let output = if cli.pretty {
        serde_json::to_string_pretty(&plan)?
    } else {
        serde_json::to_string(&plan)?
    };
    println!("{output}");

    Ok(())
}

fn read_jobs(path: &Path) -> Result<Vec<JobRequest>> {
    let json = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading jobs from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading jobs from {}", path.display()))?
    };

    serde_json::from_str(&json).context("parsing job list")
}
