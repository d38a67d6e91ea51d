//! Rendered-page fetching for endpoints behind bot mitigation.
//!
//! The SET data endpoints reject plain HTTP clients, so the primary adapter
//! drives a real headless Chromium session and reads the rendered page text.
//! The renderer sits behind a trait so adapters stay deterministic offline.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetBlockedUrLsParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tracing::{debug, warn};

use crate::http_client::BROWSER_USER_AGENT;

/// Sub-resource patterns blocked during page loads. Images, fonts and
/// stylesheets add nothing to a JSON endpoint and dominate load time.
const BLOCKED_URL_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.svg", "*.webp", "*.ico", "*.css", "*.woff",
    "*.woff2", "*.ttf", "*.otf",
];

/// Error raised by a page render attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    message: String,
    timed_out: bool,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RenderError {}

/// Renders a URL in a browser context and returns the page's text content.
pub trait PageRenderer: Send + Sync {
    fn render<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, RenderError>> + Send + 'a>>;
}

/// Headless Chromium renderer. Each call owns a fresh, short-lived browser
/// session that is closed on every exit path, including timeouts.
#[derive(Debug, Default)]
pub struct ChromiumRenderer {
    executable: Option<String>,
}

impl ChromiumRenderer {
    pub fn new() -> Self {
        Self {
            executable: std::env::var("DRHUB_CHROME_PATH").ok(),
        }
    }

    pub fn with_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: Some(executable.into()),
        }
    }

    async fn launch(&self) -> Result<(Browser, tokio::task::JoinHandle<()>), RenderError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage");
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|message| RenderError::new(format!("browser config: {message}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|error| RenderError::new(format!("browser launch: {error}")))?;

        let driver = tokio::spawn(async move { while handler.next().await.is_some() {} });
        Ok((browser, driver))
    }

    async fn render_on_page(page: &Page, url: &str) -> Result<String, RenderError> {
        page.set_user_agent(BROWSER_USER_AGENT)
            .await
            .map_err(|error| RenderError::new(format!("set user agent: {error}")))?;

        let blocked = BLOCKED_URL_PATTERNS
            .iter()
            .map(|pattern| String::from(*pattern))
            .collect::<Vec<_>>();
        page.execute(SetBlockedUrLsParams::new(blocked))
            .await
            .map_err(|error| RenderError::new(format!("block sub-resources: {error}")))?;

        page.goto(url)
            .await
            .map_err(|error| RenderError::new(format!("navigation: {error}")))?;
        page.wait_for_navigation()
            .await
            .map_err(|error| RenderError::new(format!("navigation wait: {error}")))?;

        let text: String = page
            .evaluate("document.body.innerText")
            .await
            .map_err(|error| RenderError::new(format!("evaluate: {error}")))?
            .into_value()
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        // Fallback read path: chrome wraps raw JSON responses in a <pre>.
        debug!("body text empty, falling back to <pre> content");
        let fallback: String = page
            .evaluate("document.querySelector('pre')?.innerText || document.body.textContent")
            .await
            .map_err(|error| RenderError::new(format!("fallback evaluate: {error}")))?
            .into_value()
            .unwrap_or_default();

        Ok(fallback)
    }
}

impl PageRenderer for ChromiumRenderer {
    fn render<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, RenderError>> + Send + 'a>> {
        Box::pin(async move {
            let (mut browser, driver) = self.launch().await?;

            let outcome = match tokio::time::timeout(timeout, async {
                let page = browser
                    .new_page("about:blank")
                    .await
                    .map_err(|error| RenderError::new(format!("new page: {error}")))?;
                Self::render_on_page(&page, url).await
            })
            .await
            {
                Ok(result) => result,
                Err(_) => Err(RenderError::timeout(format!(
                    "page load exceeded {}s: {url}",
                    timeout.as_secs()
                ))),
            };

            // The session must be released on every path, timeout included.
            if let Err(error) = browser.close().await {
                warn!(%error, "browser close failed");
            }
            let _ = browser.wait().await;
            driver.abort();

            outcome
        })
    }
}

/// Canned renderer for deterministic offline tests.
#[derive(Debug, Clone)]
pub struct StaticRenderer {
    body: String,
}

impl StaticRenderer {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl PageRenderer for StaticRenderer {
    fn render<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, RenderError>> + Send + 'a>> {
        let _ = (url, timeout);
        let body = self.body.clone();
        Box::pin(async move { Ok(body) })
    }
}

/// Renderer that always fails; used to exercise fallback paths.
#[derive(Debug, Default)]
pub struct FailingRenderer;

impl PageRenderer for FailingRenderer {
    fn render<'a>(
        &'a self,
        url: &'a str,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<String, RenderError>> + Send + 'a>> {
        let _ = timeout;
        let url = url.to_owned();
        Box::pin(async move { Err(RenderError::new(format!("render refused: {url}"))) })
    }
}
