//! Two-phase analysis run: text detectors, then sequential image checks.

use std::time::Duration;

use chrono::{DateTime, Utc};
use qm_core::{DetectionConfig, IssueRecord, ProductRecord};
use qm_detect::DetectorSet;
use qm_vision::{ImageCheckRequest, ImageChecker};
use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::aggregator::IssueAggregator;
use crate::error::PipelineError;
use crate::events::{AnalysisEvent, ImageOutcome};
use crate::progress::{CancelFlag, ImageProgress};

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub products: usize,
    /// Records created by the text phase.
    pub text_issues: usize,
    pub images_total: usize,
    pub images_processed: usize,
    pub images_flagged: usize,
    pub images_clean: usize,
    pub images_failed: usize,
    /// Custom patterns that failed to compile and were left out.
    pub skipped_patterns: usize,
}

/// Result of a completed (or cancelled) run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Text-phase records in input order, then image-only records in input order.
    pub issues: Vec<IssueRecord>,
    pub stats: AnalysisStats,
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Configures and runs one analysis over a batch of products.
///
/// ```ignore
/// let report = Analyzer::new(&config, &checker)
///     .with_updates(tx)
///     .with_cancel(flag.clone())
///     .run(&products)
///     .await?;
/// ```
pub struct Analyzer<'a, C> {
    config: &'a DetectionConfig,
    checker: &'a C,
    updates: Option<UnboundedSender<AnalysisEvent>>,
    cancel: CancelFlag,
    inter_request_delay: Duration,
}

impl<'a, C: ImageChecker + Sync> Analyzer<'a, C> {
    #[must_use]
    pub fn new(config: &'a DetectionConfig, checker: &'a C) -> Self {
        Self {
            config,
            checker,
            updates: None,
            cancel: CancelFlag::default(),
            inter_request_delay: Duration::ZERO,
        }
    }

    /// Streams [`AnalysisEvent`]s to `tx`. A dropped receiver does not stop the run.
    #[must_use]
    pub fn with_updates(mut self, tx: UnboundedSender<AnalysisEvent>) -> Self {
        self.updates = Some(tx);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Pause between consecutive image checks.
    #[must_use]
    pub fn with_inter_request_delay(mut self, delay: Duration) -> Self {
        self.inter_request_delay = delay;
        self
    }

    /// Runs both phases over `products`.
    ///
    /// Image-check failures never fail the run; they are logged and counted
    /// in [`AnalysisStats::images_failed`].
    ///
    /// # Errors
    ///
    /// - [`PipelineError::EmptyBatch`] if `products` is empty.
    /// - [`PipelineError::Detect`] if the phone pattern does not compile.
    pub async fn run(self, products: &[ProductRecord]) -> Result<AnalysisReport, PipelineError> {
        if products.is_empty() {
            return Err(PipelineError::EmptyBatch);
        }
        let detectors = DetectorSet::from_config(self.config)?;
        let started_at = Utc::now();

        let mut stats = AnalysisStats {
            products: products.len(),
            skipped_patterns: detectors.skipped_patterns().len(),
            ..AnalysisStats::default()
        };
        let mut aggregator = IssueAggregator::new();

        for product in products {
            let findings = detectors.detect(product);
            if let Some(record) = aggregator.add(product, findings) {
                tracing::debug!(
                    product_id = %record.id,
                    findings = record.findings.len(),
                    "text issues found"
                );
                self.emit(AnalysisEvent::IssueUpdated(record.clone()));
            }
        }
        stats.text_issues = aggregator.len();
        tracing::info!(
            products = stats.products,
            text_issues = stats.text_issues,
            "text analysis complete"
        );

        let cancelled = if self.config.image_scanning_enabled {
            self.check_images(products, &mut aggregator, &mut stats)
                .await
        } else {
            tracing::debug!("image scanning disabled, skipping image checks");
            false
        };

        Ok(AnalysisReport {
            issues: aggregator.into_records(),
            stats,
            cancelled,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Checks every product image in input order. Returns `true` if cancelled.
    async fn check_images(
        &self,
        products: &[ProductRecord],
        aggregator: &mut IssueAggregator,
        stats: &mut AnalysisStats,
    ) -> bool {
        let targets: Vec<(&ProductRecord, ImageCheckRequest<'_>)> = products
            .iter()
            .filter_map(|p| ImageCheckRequest::from_product(p).map(|req| (p, req)))
            .collect();
        let mut progress = ImageProgress::new(targets.len());
        stats.images_total = progress.total();

        for (position, (product, request)) in targets.iter().enumerate() {
            if self.cancel.is_cancelled() {
                tracing::info!(
                    processed = progress.processed(),
                    total = progress.total(),
                    "analysis cancelled, skipping remaining image checks"
                );
                return true;
            }
            if position > 0 && !self.inter_request_delay.is_zero() {
                tokio::time::sleep(self.inter_request_delay).await;
            }

            let outcome = match self.checker.check_image(request).await {
                Ok(Some(finding)) => {
                    if let Some(record) = aggregator.add(product, vec![finding]) {
                        self.emit(AnalysisEvent::IssueUpdated(record.clone()));
                    }
                    stats.images_flagged += 1;
                    ImageOutcome::Flagged
                }
                Ok(None) => {
                    stats.images_clean += 1;
                    ImageOutcome::Clean
                }
                Err(e) => {
                    tracing::warn!(
                        product_id = %product.id,
                        image_url = %request.image_url,
                        error = %e,
                        "image check failed, treating as no finding"
                    );
                    stats.images_failed += 1;
                    ImageOutcome::Failed
                }
            };

            let processed = progress.advance();
            stats.images_processed = processed;
            self.emit(AnalysisEvent::ImageProgress {
                processed,
                total: progress.total(),
                product_id: product.id.clone(),
                outcome,
            });
        }

        tracing::info!(
            processed = stats.images_processed,
            flagged = stats.images_flagged,
            failed = stats.images_failed,
            "image analysis complete"
        );
        false
    }

    fn emit(&self, event: AnalysisEvent) {
        if let Some(tx) = &self.updates {
            if tx.send(event).is_err() {
                tracing::trace!("analysis event receiver dropped");
            }
        }
    }
}

/// Runs an analysis with default options, streaming to `updates` if given.
///
/// # Errors
///
/// See [`Analyzer::run`].
pub async fn run_analysis<C: ImageChecker + Sync>(
    products: &[ProductRecord],
    config: &DetectionConfig,
    checker: &C,
    updates: Option<UnboundedSender<AnalysisEvent>>,
) -> Result<AnalysisReport, PipelineError> {
    let mut analyzer = Analyzer::new(config, checker);
    if let Some(tx) = updates {
        analyzer = analyzer.with_updates(tx);
    }
    analyzer.run(products).await
}

#[cfg(test)]
#[path = "analyzer_test.rs"]
mod tests;
