//! `download-images` command: fetch every product image listed in a CSV export.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use qm_core::AppConfig;
use reqwest::StatusCode;
use serde::Serialize;

/// Summary file written next to the downloaded images.
const SUMMARY_FILE: &str = "download_summary.json";

#[derive(Debug)]
pub(crate) struct DownloadOptions {
    pub csv: PathBuf,
    pub out_dir: PathBuf,
    pub sku_column: usize,
    pub url_column: usize,
}

/// One row that passed validation and will be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DownloadTarget {
    /// 1-based file row, header included.
    pub row: usize,
    pub sku: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DownloadedImage {
    pub id: usize,
    pub sku: String,
    pub original_url: String,
    pub filename: String,
    pub path: String,
    pub row: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct DownloadSummary {
    pub total_images: usize,
    pub images: Vec<DownloadedImage>,
}

/// Reads the CSV, downloads every listed image and writes the summary.
///
/// # Errors
///
/// Returns an error if the CSV cannot be read or has no data rows, the HTTP
/// client cannot be built, or the output directory or summary cannot be
/// written. Individual rows that fail are logged and skipped.
pub(crate) async fn run_download_images(
    config: &AppConfig,
    options: &DownloadOptions,
) -> anyhow::Result<()> {
    let text = tokio::fs::read_to_string(&options.csv)
        .await
        .with_context(|| format!("failed to read {}", options.csv.display()))?;
    let targets = collect_targets(&text, options.sku_column, options.url_column)?;

    tokio::fs::create_dir_all(&options.out_dir)
        .await
        .with_context(|| format!("failed to create {}", options.out_dir.display()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.vision_request_timeout_secs))
        .user_agent(&config.vision_user_agent)
        .build()
        .context("failed to build HTTP client")?;

    let attempted = targets.len();
    let summary = download_all(&client, &targets, &options.out_dir).await;
    write_summary(&summary, &options.out_dir).await?;

    for image in &summary.images {
        println!("downloaded {} (row {})", image.filename, image.row);
    }
    let failed = attempted - summary.total_images;
    if failed > 0 {
        println!("{failed} downloads failed; see logs");
    }
    println!(
        "{} images downloaded to {}",
        summary.total_images,
        options.out_dir.display()
    );

    Ok(())
}

/// Picks the `(sku, url)` pairs to fetch, skipping rows that lack either.
pub(crate) fn collect_targets(
    text: &str,
    sku_column: usize,
    url_column: usize,
) -> anyhow::Result<Vec<DownloadTarget>> {
    let data_rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .collect();
    if data_rows.is_empty() {
        anyhow::bail!("expected a header row and at least one data row");
    }

    let needed = sku_column.max(url_column);
    let mut targets = Vec::new();
    for (i, line) in data_rows.iter().enumerate() {
        let row = i + 2;
        let values: Vec<&str> = line.split(',').map(str::trim).collect();
        if values.len() <= needed {
            tracing::warn!(row, "missing required columns, skipping");
            continue;
        }
        let (sku, url) = (values[sku_column], values[url_column]);
        if sku.is_empty() || url.is_empty() {
            tracing::warn!(row, "missing SKU or URL, skipping");
            continue;
        }
        targets.push(DownloadTarget {
            row,
            sku: sku.to_string(),
            url: url.to_string(),
        });
    }

    Ok(targets)
}

/// `id_<n>_<sku>_<basename>` for the n-th successful download.
pub(crate) fn image_filename(id: usize, sku: &str, url: &str) -> String {
    let last_segment = url.rsplit('/').next().unwrap_or_default();
    let basename = last_segment.split('?').next().unwrap_or_default();
    let basename = if basename.is_empty() {
        "image.jpg"
    } else {
        basename
    };
    format!("id_{id}_{}_{}", flatten_separators(sku), flatten_separators(basename))
}

// Keeps every file inside the output directory.
fn flatten_separators(value: &str) -> String {
    value.replace(['/', '\\'], "_")
}

async fn fetch_image(client: &reqwest::Client, url: &str) -> anyhow::Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        anyhow::bail!("unexpected HTTP status {status}");
    }
    Ok(response.bytes().await?.to_vec())
}

/// Fetches `targets` one at a time and writes each image into `out_dir`.
///
/// Ids are assigned in order of successful downloads, starting at 1.
pub(crate) async fn download_all(
    client: &reqwest::Client,
    targets: &[DownloadTarget],
    out_dir: &Path,
) -> DownloadSummary {
    let mut images: Vec<DownloadedImage> = Vec::new();

    for target in targets {
        let bytes = match fetch_image(client, &target.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    row = target.row,
                    url = %target.url,
                    sku = %target.sku,
                    error = %e,
                    "image download failed, skipping"
                );
                continue;
            }
        };

        let id = images.len() + 1;
        let filename = image_filename(id, &target.sku, &target.url);
        let path = out_dir.join(&filename);
        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            tracing::warn!(
                row = target.row,
                path = %path.display(),
                error = %e,
                "failed to write image, skipping"
            );
            continue;
        }
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "image downloaded");

        images.push(DownloadedImage {
            id,
            sku: target.sku.clone(),
            original_url: target.url.clone(),
            filename,
            path: path.display().to_string(),
            row: target.row,
        });
    }

    DownloadSummary {
        total_images: images.len(),
        images,
    }
}

/// Writes `summary` as pretty JSON into `out_dir`.
pub(crate) async fn write_summary(summary: &DownloadSummary, out_dir: &Path) -> anyhow::Result<()> {
    let path = out_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(summary)?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
#[path = "download_test.rs"]
mod tests;
