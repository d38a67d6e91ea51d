//! Source adapter contract and the raw record shape.
//!
//! Adapters never let a transport or parse failure escape as a panic: every
//! failure is a [`SourceError`] and an empty `Vec` means "the source
//! answered but had nothing" — both make the orchestrator fall through to
//! the next source in the chain.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical source identifiers in chain-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// SET internal DR endpoint, rendered through a headless browser.
    SetApi,
    /// ThaiWarrant public listings page, scraped as HTML.
    Thaiwarrant,
    /// Curated in-process dataset, the last resort.
    Dataset,
}

impl SourceId {
    pub const ALL: [Self; 3] = [Self::SetApi, Self::Thaiwarrant, Self::Dataset];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetApi => "set_api",
            Self::Thaiwarrant => "thaiwarrant",
            Self::Dataset => "dataset",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "set_api" => Ok(Self::SetApi),
            "thaiwarrant" => Ok(Self::Thaiwarrant),
            "dataset" => Ok(Self::Dataset),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}

/// Failure classification for a source attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Network failure, anti-bot block, or upstream outage.
    Unavailable,
    /// The request or page load exceeded its budget.
    Timeout,
    /// The source answered with a shape we cannot interpret.
    MalformedPayload,
    Internal,
}

/// Structured source error used by chain fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedPayload,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::MalformedPayload => "source.malformed_payload",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// One DR row as an adapter saw it, numerically normalized but not yet
/// classified. Missing optional figures default to zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDrRecord {
    pub symbol: String,
    pub name: String,
    pub underlying: String,
    pub market: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: f64,
    pub value: f64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub prev_close: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub ratio: String,
    pub market_cap: f64,
    pub pe: f64,
    pub dividend: f64,
}

/// Source adapter contract.
///
/// `fetch` must be total with respect to upstream behavior: transport
/// failures, timeouts and malformed payloads come back as `SourceError`,
/// never as panics. Implementations are `Send + Sync` because refresh
/// cycles and tests share them across tasks.
pub trait DrSource: Send + Sync {
    fn id(&self) -> SourceId;

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawDrRecord>, SourceError>> + Send + 'a>>;
}
