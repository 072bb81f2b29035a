use anyhow::{Context, Result};
use clap::Parser;
use loanscape_io::DEFAULT_DATA_PATH;
use loanscape_visualization::{run, ViewerConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "loanscape")]
#[command(about = "Explore loan applications as an interactive 3D scatter plot", long_about = None)]
struct Args {
    /// CSV file with one loan application per row
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Hover tolerance in world units
    #[arg(long)]
    threshold: Option<f32>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = ViewerConfig {
        data_path: args.data,
        ..ViewerConfig::default()
    };
    if let Some(threshold) = args.threshold {
        config.picking_threshold = threshold;
    }

    log::info!("Loading loan applications from {}", config.data_path.display());
    run(config).context("viewer exited with an error")?;
    Ok(())
}
