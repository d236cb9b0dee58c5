//! Suicide EDA - exploratory analysis of US suicide death rates
//!
//! Loads the CDC death-rate CSV, cleans it, prints summary statistics and a
//! Male vs Female Welch t-test, and renders four charts.

mod charts;
mod config;
mod data;
mod pipeline;
mod stats;

use anyhow::Result;
use clap::Parser;
use config::AnalysisConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "suicide_eda")]
#[command(about = "Exploratory analysis of suicide death rates by sex, race and age")]
#[command(version)]
struct Cli {
    /// CSV file to analyse
    #[arg(long)]
    input: Option<PathBuf>,
    /// Directory for chart images and the summary report
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// JSON config file; flags given here take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// Render charts without opening them
    #[arg(long)]
    no_open: bool,
    /// Skip writing summary.json
    #[arg(long)]
    no_summary_json: bool,
}

impl Cli {
    fn into_config(self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if self.no_open {
            config.open_charts = false;
        }
        if self.no_summary_json {
            config.write_summary_json = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report.
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config()?;
    info!(input = %config.input_path.display(), "starting analysis");

    let charts = pipeline::run(&config)?;
    info!(charts = charts.len(), output = %config.output_dir.display(), "done");
    Ok(())
}
