//! Analysis orchestration for Quality Manager.
//!
//! [`Analyzer`] runs the text detectors over a batch of products, then checks
//! product images one at a time, merging every finding for a product into a
//! single [`qm_core::IssueRecord`]. Progress is streamed as [`AnalysisEvent`]s
//! while the run is in flight; the finished [`AnalysisReport`] can be handed
//! to a [`ReviewStore`] for triage.

pub mod aggregator;
pub mod analyzer;
pub mod error;
pub mod events;
pub mod progress;
pub mod review;

pub use aggregator::IssueAggregator;
pub use analyzer::{run_analysis, AnalysisReport, AnalysisStats, Analyzer};
pub use error::PipelineError;
pub use events::{AnalysisEvent, ImageOutcome};
pub use progress::CancelFlag;
pub use review::{IssueSummary, ReviewStore};
