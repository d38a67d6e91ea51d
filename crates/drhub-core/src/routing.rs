//! Priority-chain orchestration over the source adapters.
//!
//! Sources are tried strictly in registration order and the chain stops at
//! the first non-empty batch. An empty batch and a failed fetch are both
//! fall-through conditions; only the failures are carried as diagnostics.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::adapters::{DatasetSource, SetApiSource, ThaiWarrantSource};
use crate::browser::{ChromiumRenderer, PageRenderer, StaticRenderer};
use crate::data_source::{DrSource, RawDrRecord, SourceError, SourceId};
use crate::http_client::{HttpClient, ReqwestHttpClient, StaticHttpClient};

/// Successful chain traversal.
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    pub rows: Vec<RawDrRecord>,
    pub selected_source: SourceId,
    pub source_chain: Vec<SourceId>,
    pub errors: Vec<(SourceId, SourceError)>,
    pub latency_ms: u64,
}

/// Every source either failed or came back empty.
#[derive(Debug, Clone)]
pub struct ChainExhausted {
    pub source_chain: Vec<SourceId>,
    pub errors: Vec<(SourceId, SourceError)>,
    pub latency_ms: u64,
}

impl std::fmt::Display for ChainExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "all {} sources failed or returned nothing",
            self.source_chain.len()
        )
    }
}

impl std::error::Error for ChainExhausted {}

/// Ordered adapter chain.
pub struct SourceChain {
    sources: Vec<Arc<dyn DrSource>>,
}

impl SourceChain {
    pub fn new(sources: Vec<Arc<dyn DrSource>>) -> Self {
        Self { sources }
    }

    pub fn source_ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    /// Walk the chain until a source yields rows.
    pub async fn fetch(&self) -> Result<ChainOutcome, ChainExhausted> {
        let started = Instant::now();
        let mut source_chain = Vec::with_capacity(self.sources.len());
        let mut errors = Vec::new();

        for source in &self.sources {
            let id = source.id();
            source_chain.push(id);

            match source.fetch().await {
                Ok(rows) if rows.is_empty() => {
                    info!(source = %id, "source answered with no rows, falling through");
                }
                Ok(rows) => {
                    if !errors.is_empty() {
                        info!(
                            source = %id,
                            failed_attempts = errors.len(),
                            "fallback source succeeded"
                        );
                    }
                    return Ok(ChainOutcome {
                        rows,
                        selected_source: id,
                        source_chain,
                        errors,
                        latency_ms: elapsed_ms(started),
                    });
                }
                Err(error) => {
                    warn!(source = %id, %error, "source failed, falling through");
                    errors.push((id, error));
                }
            }
        }

        Err(ChainExhausted {
            source_chain,
            errors,
            latency_ms: elapsed_ms(started),
        })
    }

    /// Fetch from one specific source only, no fallback. Used by the
    /// price-only refresh, which must not serve stale tertiary figures.
    pub async fn fetch_only(&self, id: SourceId) -> Result<Vec<RawDrRecord>, SourceError> {
        let source = self
            .sources
            .iter()
            .find(|source| source.id() == id)
            .ok_or_else(|| SourceError::internal(format!("source not registered: {id}")))?;
        source.fetch().await
    }
}

/// Wires the default chain with live transports, or canned ones for
/// offline runs and tests.
#[derive(Default)]
pub struct SourceChainBuilder {
    offline: bool,
    renderer: Option<Arc<dyn PageRenderer>>,
    http: Option<Arc<dyn HttpClient>>,
}

impl SourceChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offline mode: no browser, no network; the live sources replay
    /// empty payloads so every fetch settles on the curated dataset.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn renderer(&self) -> Arc<dyn PageRenderer> {
        if let Some(renderer) = &self.renderer {
            return Arc::clone(renderer);
        }
        if self.offline {
            Arc::new(StaticRenderer::new("[]"))
        } else {
            Arc::new(ChromiumRenderer::new())
        }
    }

    fn http_client(&self) -> Arc<dyn HttpClient> {
        if let Some(http) = &self.http {
            return Arc::clone(http);
        }
        if self.offline {
            Arc::new(StaticHttpClient::ok(
                "<table id=\"MainContent_gvDRSearch\"></table>",
            ))
        } else {
            Arc::new(ReqwestHttpClient::new())
        }
    }

    pub fn build(self) -> SourceChain {
        SourceChain::new(vec![
            Arc::new(SetApiSource::new(self.renderer())),
            Arc::new(ThaiWarrantSource::new(self.http_client())),
            Arc::new(DatasetSource::new()),
        ])
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
