//! Domain error types.
//!
//! The indicator and classification core is total and never produces these;
//! they cover configuration, collaborator feeds, frame construction and report
//! output.

use chrono::NaiveDate;

/// Top-level error type for halvcycle.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("{source_name} feed error: {reason}")]
    Feed { source_name: String, reason: String },

    #[error("price feed returned no observations for {symbol}")]
    EmptyFeed { symbol: String },

    #[error("observations not strictly ascending at {date} (previous {previous})")]
    UnorderedObservations {
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("non-positive close {close} on {date}")]
    NonPositiveClose { date: NaiveDate, close: f64 },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CycleError {
    pub(crate) fn feed(source_name: &str, reason: impl Into<String>) -> Self {
        CycleError::Feed {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&CycleError> for std::process::ExitCode {
    fn from(err: &CycleError) -> Self {
        let code: u8 = match err {
            CycleError::Io(_) => 1,
            CycleError::ConfigParse { .. }
            | CycleError::ConfigMissing { .. }
            | CycleError::ConfigInvalid { .. } => 2,
            CycleError::Feed { .. } | CycleError::EmptyFeed { .. } => 3,
            CycleError::UnorderedObservations { .. } | CycleError::NonPositiveClose { .. } => 5,
            CycleError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
