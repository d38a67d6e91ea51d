//! Per-symbol news from the SET news endpoint.
//!
//! Best-effort by contract: any transport or payload problem logs a
//! diagnostic and yields an empty list. News never blocks or fails a
//! caller that mainly wants quotes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::Symbol;
use crate::http_client::{HttpClient, HttpRequest};

const NEWS_REFERER: &str = "https://www.set.or.th/th/market/product/dr/overview";
const DEFAULT_BASE: &str = "https://www.set.or.th/api/set/news";
const NEWS_LIMIT: u8 = 10;

/// One news entry, lenient about upstream field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub symbol: String,
    #[serde(default, alias = "title", alias = "subject")]
    pub headline: String,
    #[serde(default, alias = "datetime", alias = "publishDatetime")]
    pub published_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

pub struct NewsFetcher {
    http: Arc<dyn HttpClient>,
    base: String,
}

impl NewsFetcher {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            base: std::env::var("DRHUB_NEWS_URL").unwrap_or_else(|_| String::from(DEFAULT_BASE)),
        }
    }

    pub fn with_base(http: Arc<dyn HttpClient>, base: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
        }
    }

    /// Latest news for one DR. Empty on any failure.
    pub async fn latest(&self, symbol: &Symbol) -> Vec<NewsItem> {
        let url = format!(
            "{}/{}/list?lang=th&limit={NEWS_LIMIT}",
            self.base,
            urlencoding::encode(symbol.as_str())
        );

        let request = HttpRequest::get(&url)
            .with_browser_user_agent()
            .with_header("referer", NEWS_REFERER);

        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(error) => {
                warn!(symbol = %symbol, %error, "news request failed");
                return Vec::new();
            }
        };
        if !response.is_success() {
            warn!(symbol = %symbol, status = response.status, "news endpoint refused");
            return Vec::new();
        }

        let items = Self::parse_items(&response.body);
        if items.is_empty() {
            debug!(symbol = %symbol, "no news entries");
        }
        items
    }

    /// Accepts either a bare array or an object wrapping a `newsInfoList`.
    fn parse_items(body: &str) -> Vec<NewsItem> {
        let value: serde_json::Value = match serde_json::from_str(body.trim()) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, "news payload is not JSON");
                return Vec::new();
            }
        };

        let rows = match &value {
            serde_json::Value::Array(rows) => rows.as_slice(),
            serde_json::Value::Object(map) => match map.get("newsInfoList").and_then(|v| v.as_array()) {
                Some(rows) => rows.as_slice(),
                None => {
                    warn!("news payload has no recognizable list");
                    return Vec::new();
                }
            },
            _ => return Vec::new(),
        };

        rows.iter()
            .filter_map(|row| serde_json::from_value(row.clone()).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{FailingHttpClient, StaticHttpClient};

    fn fetcher(client: impl HttpClient + 'static) -> NewsFetcher {
        NewsFetcher::with_base(Arc::new(client), "https://example.test/news")
    }

    fn aapl() -> Symbol {
        Symbol::parse("AAPL80").expect("valid symbol")
    }

    #[tokio::test]
    async fn parses_wrapped_news_list() {
        let body = r#"{"newsInfoList":[
            {"id":1,"symbol":"AAPL80","headline":"ประกาศจ่ายปันผล","datetime":"2026-08-26T09:00:00+07:00"},
            {"id":2,"symbol":"AAPL80","title":"Trading halt lifted"}
        ]}"#;
        let items = fetcher(StaticHttpClient::ok(body)).latest(&aapl()).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].headline, "ประกาศจ่ายปันผล");
        assert!(items[0].published_at.is_some());
        // `title` alias accepted.
        assert_eq!(items[1].headline, "Trading halt lifted");
    }

    #[tokio::test]
    async fn parses_bare_array() {
        let items = fetcher(StaticHttpClient::ok(r#"[{"symbol":"AAPL80","headline":"x"}]"#))
            .latest(&aapl())
            .await;
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn transport_failure_yields_empty() {
        assert!(fetcher(FailingHttpClient).latest(&aapl()).await.is_empty());
    }

    #[tokio::test]
    async fn block_page_yields_empty() {
        let items = fetcher(StaticHttpClient::ok("<html>denied</html>"))
            .latest(&aapl())
            .await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_yields_empty() {
        let items = fetcher(StaticHttpClient::new(429, "slow down"))
            .latest(&aapl())
            .await;
        assert!(items.is_empty());
    }
}
