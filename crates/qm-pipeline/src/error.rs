use qm_detect::DetectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no products to analyze")]
    EmptyBatch,

    #[error("detector setup failed: {0}")]
    Detect(#[from] DetectError),
}
