mod analyze;
mod check_image;
mod detection;
mod download;
mod output;
mod patterns;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "qm-cli")]
#[command(about = "Quality Manager: flag listing-quality problems in product catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a CSV product export for vendor info, phone numbers and watermarks
    Analyze {
        /// Path to the CSV file
        csv: PathBuf,

        /// Skip image watermark checks
        #[arg(long)]
        no_images: bool,

        /// Print the full report as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// YAML detection settings (overrides `QM_DETECTION_CONFIG_PATH`)
        #[arg(long)]
        detection_config: Option<PathBuf>,
    },
    /// Check a single image URL for a watermark
    CheckImage {
        url: String,

        #[arg(long, default_value = "adhoc")]
        product_id: String,

        #[arg(long, default_value = "")]
        product_name: String,
    },
    /// Download every product image listed in a CSV export
    DownloadImages {
        /// Path to the CSV file
        csv: PathBuf,

        /// Directory the images and `download_summary.json` are written to
        #[arg(long, default_value = "downloaded_images")]
        out_dir: PathBuf,

        /// 0-based column holding the SKU
        #[arg(long, default_value_t = 2)]
        sku_column: usize,

        /// 0-based column holding the image URL
        #[arg(long, default_value_t = 11)]
        url_column: usize,
    },
    /// Show which custom detection patterns compile
    Patterns {
        /// YAML detection settings (overrides `QM_DETECTION_CONFIG_PATH`)
        #[arg(long)]
        detection_config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = qm_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            csv,
            no_images,
            json,
            detection_config,
        } => {
            let options = analyze::AnalyzeOptions {
                csv,
                no_images,
                json,
                detection_config,
            };
            analyze::run_analyze(&config, &options).await?;
        }
        Commands::CheckImage {
            url,
            product_id,
            product_name,
        } => {
            check_image::run_check_image(&config, &url, &product_id, &product_name).await?;
        }
        Commands::DownloadImages {
            csv,
            out_dir,
            sku_column,
            url_column,
        } => {
            let options = download::DownloadOptions {
                csv,
                out_dir,
                sku_column,
                url_column,
            };
            download::run_download_images(&config, &options).await?;
        }
        Commands::Patterns { detection_config } => {
            patterns::run_patterns(&config, detection_config.as_deref())?;
        }
    }

    Ok(())
}
