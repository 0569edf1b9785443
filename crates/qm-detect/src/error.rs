use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid phone pattern \"{pattern}\": {source}")]
    InvalidPhonePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A single custom pattern failed to compile. Non-fatal: the pattern is
    /// skipped and the rest of the set stays active.
    #[error("invalid custom pattern #{index} \"{pattern}\": {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
