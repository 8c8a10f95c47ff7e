use thiserror::Error;

/// A recoverable, per-field extraction fault.
///
/// Faults are collected into the snapshot's error log, one entry per field
/// that could not be extracted; they never abort sibling extractors. Every
/// message names the logical field, the structural element that was
/// expected, and why it was missing or invalid.
#[derive(Debug, Error)]
pub enum Fault {
    /// An expected container or element is absent from the tree.
    #[error("{field}: {detail}")]
    StructuralMissing { field: &'static str, detail: String },

    /// The element is present but its text or attribute is empty.
    #[error("{field}: {detail}")]
    EmptyValue { field: &'static str, detail: String },

    /// Text is present but not convertible to the target type.
    #[error("{field}: {detail}")]
    ParseFailure { field: &'static str, detail: String },

    /// The secondary fetch for related listings failed.
    #[error("{field}: {detail}")]
    NetworkFailure { field: &'static str, detail: String },
}

impl Fault {
    pub(crate) fn missing(field: &'static str, detail: impl Into<String>) -> Self {
        Fault::StructuralMissing {
            field,
            detail: detail.into(),
        }
    }

    pub(crate) fn empty(field: &'static str, detail: impl Into<String>) -> Self {
        Fault::EmptyValue {
            field,
            detail: detail.into(),
        }
    }

    pub(crate) fn parse(field: &'static str, detail: impl Into<String>) -> Self {
        Fault::ParseFailure {
            field,
            detail: detail.into(),
        }
    }

    pub(crate) fn network(field: &'static str, detail: impl Into<String>) -> Self {
        Fault::NetworkFailure {
            field,
            detail: detail.into(),
        }
    }
}

/// Per-field extraction outcome. The orchestrator stores the value or
/// appends the fault; neither case stops the pass.
pub type ExtractionOutcome<T> = Result<T, Fault>;

/// Client-level failures: the page (or the related-apps listing) could not
/// be fetched at all.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Errors constructing a [`crate::Crawler`]: a selector in the table does
/// not compile, or the HTTP client cannot be built.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid selector for {name}: \"{selector}\": {reason}")]
    InvalidSelector {
        name: &'static str,
        selector: String,
        reason: String,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
