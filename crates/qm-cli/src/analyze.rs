//! `analyze` command: full two-phase run over a CSV export.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use qm_core::{AppConfig, Finding, ProductRecord};
use qm_pipeline::{AnalysisEvent, AnalysisReport, Analyzer, CancelFlag, ReviewStore};
use qm_vision::{ImageCheckRequest, ImageChecker, VisionError, WatermarkChecker};
use tokio::sync::mpsc;

use crate::detection::resolve_detection_config;
use crate::output::{format_issue, format_progress, format_summary};

#[derive(Debug)]
pub(crate) struct AnalyzeOptions {
    pub csv: PathBuf,
    pub no_images: bool,
    pub json: bool,
    pub detection_config: Option<PathBuf>,
}

/// Stand-in checker for runs with image scanning switched off. Never called.
struct ImagesDisabled;

impl ImageChecker for ImagesDisabled {
    async fn check_image(
        &self,
        _request: &ImageCheckRequest<'_>,
    ) -> Result<Option<Finding>, VisionError> {
        Ok(None)
    }
}

/// Parses the CSV, runs the analysis and prints the results.
///
/// Progress lines go to stderr so `--json` output on stdout stays clean.
/// Ctrl-C stops further image checks and prints what was found so far.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the detection
/// settings are invalid, or no image checker can be configured.
pub(crate) async fn run_analyze(config: &AppConfig, options: &AnalyzeOptions) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(&options.csv)
        .await
        .with_context(|| format!("failed to read {}", options.csv.display()))?;
    let products = qm_detect::parse_products(&text)?;

    let mut detection = resolve_detection_config(options.detection_config.as_deref(), config)?;
    if options.no_images {
        detection.image_scanning_enabled = false;
    }

    tracing::info!(
        products = products.len(),
        images = detection.image_scanning_enabled,
        "starting analysis"
    );

    let report = if detection.image_scanning_enabled {
        let checker = WatermarkChecker::from_app_config(config)
            .map_err(|e| anyhow::anyhow!("failed to configure image checker: {e}"))?;
        execute(config, &detection, &checker, &products).await?
    } else {
        execute(config, &detection, &ImagesDisabled, &products).await?
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.cancelled {
        println!(
            "analysis cancelled after {} of {} images",
            report.stats.images_processed, report.stats.images_total
        );
    }
    for issue in &report.issues {
        println!("{}", format_issue(issue));
    }
    if report.stats.images_failed > 0 {
        println!(
            "{} image checks failed and were treated as clean; see logs",
            report.stats.images_failed
        );
    }
    let review = ReviewStore::from(report);
    println!("{}", format_summary(&review.summary()));

    Ok(())
}

async fn execute<C: ImageChecker + Sync>(
    config: &AppConfig,
    detection: &qm_core::DetectionConfig,
    checker: &C,
    products: &[ProductRecord],
) -> anyhow::Result<AnalysisReport> {
    let cancel = CancelFlag::new();
    let interrupt = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, finishing current image check");
            interrupt.cancel();
        }
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let AnalysisEvent::ImageProgress {
                processed, total, ..
            } = event
            {
                eprintln!("{}", format_progress(processed, total));
            }
        }
    });

    let result = Analyzer::new(detection, checker)
        .with_updates(tx)
        .with_cancel(cancel)
        .with_inter_request_delay(Duration::from_millis(
            config.vision_inter_request_delay_ms,
        ))
        .run(products)
        .await;

    ctrl_c.abort();
    printer.await?;
    Ok(result?)
}
