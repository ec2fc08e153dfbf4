use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotParams;
use chromiumoxide::page::Page;
use chrono::{DateTime, SecondsFormat, Utc};
use tokio::time::Instant;

use crate::config::E2eConfig;
use crate::interaction::readiness::{self, ReadinessError};
use crate::interaction::wait::{poll_until, ElementProbe, ElementState, POLL_INTERVAL};
use crate::locator::Locator;

/// How long the resource count must stay unchanged to call the network idle.
pub const NETWORK_QUIET_WINDOW: Duration = Duration::from_millis(500);

/// Shared helpers every page object composes.
///
/// Cheap to clone: a page handle plus the shared run configuration.
#[derive(Clone)]
pub struct BasePage {
    page: Page,
    config: Arc<E2eConfig>,
}

impl std::fmt::Debug for BasePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasePage")
            .field("target", &self.page.target_id().as_ref())
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl BasePage {
    pub fn new(page: Page, config: Arc<E2eConfig>) -> Self {
        Self { page, config }
    }

    pub fn config(&self) -> &E2eConfig {
        &self.config
    }

    // ── Locators ────────────────────────────────────────────────────────

    fn root(&self) -> Locator {
        Locator::from_query(self.page.clone(), Default::default())
            .with_action_timeout(self.config.presence_timeout)
    }

    pub fn locator(&self, selector: &str) -> Locator {
        self.root().locator(selector)
    }

    pub fn get_by_text(&self, text: &str) -> Locator {
        self.root().get_by_text(text)
    }

    pub fn get_by_exact_text(&self, text: &str) -> Locator {
        self.root().get_by_exact_text(text)
    }

    pub fn get_by_role(&self, role: &str, name: Option<&str>) -> Locator {
        self.root().get_by_role(role, name)
    }

    pub fn get_by_label(&self, text: &str) -> Locator {
        self.root().get_by_label(text)
    }

    pub fn get_by_placeholder(&self, text: &str) -> Locator {
        self.root().get_by_placeholder(text)
    }

    pub fn get_by_title(&self, text: &str) -> Locator {
        self.root().get_by_title(text)
    }

    pub fn get_by_test_id(&self, id: &str) -> Locator {
        self.root().get_by_test_id(id)
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::info!("Navigating to: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    pub async fn title(&self) -> Result<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    /// Current document URL, including in-page hash navigation.
    pub async fn url(&self) -> Result<String> {
        self.page
            .evaluate("window.location.href")
            .await
            .context("Failed to read location")?
            .into_value()
            .context("Failed to parse location")
    }

    /// Wait for `document.readyState` to reach `complete`.
    pub async fn wait_for_page_load(&self) -> Result<()> {
        let timeout = self.config.navigation_timeout;
        let outcome = poll_until(timeout, || async move {
            let state: String = self
                .page
                .evaluate("document.readyState")
                .await?
                .into_value()?;
            Ok::<_, anyhow::Error>(state == "complete")
        })
        .await;

        if !outcome.is_ready() {
            anyhow::bail!("Page did not finish loading within {}ms", timeout.as_millis());
        }
        Ok(())
    }

    /// Wait for the page load, then for no new resource requests during
    /// [`NETWORK_QUIET_WINDOW`].
    ///
    /// A document that is still loading, or a failed read (the execution
    /// context is torn down while a navigation commits), counts as activity.
    /// Only the navigation timeout fails the wait.
    pub async fn wait_for_network_idle(&self) -> Result<()> {
        self.wait_for_page_load().await?;

        let timeout = self.config.navigation_timeout;
        let deadline = Instant::now() + timeout;
        let mut window = QuietWindow::new(NETWORK_QUIET_WINDOW, Instant::now());

        loop {
            let count = match self.resource_count().await {
                Ok(count) => count,
                Err(e) => {
                    tracing::debug!("Resource count unavailable: {:#}", e);
                    None
                }
            };
            if window.observe(count, Instant::now()) {
                tracing::debug!("Network idle after {:?} resources", count);
                return Ok(());
            }
            if Instant::now() >= deadline {
                anyhow::bail!("Network did not become idle within {}ms", timeout.as_millis());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Resource-timing entry count, or `None` while the document is still loading.
    async fn resource_count(&self) -> Result<Option<u64>> {
        self.page
            .evaluate(
                "document.readyState === 'complete' \
                 ? performance.getEntriesByType('resource').length : null",
            )
            .await
            .context("Failed to read resource timing entries")?
            .into_value()
            .context("Failed to parse resource count")
    }

    // ── Screenshots ─────────────────────────────────────────────────────

    /// Full-page PNG saved as `<screenshot_dir>/<name>-<timestamp>.png`.
    pub async fn take_screenshot(&self, name: &str) -> Result<PathBuf> {
        let path = screenshot_path(&self.config.screenshot_dir, name, Utc::now());
        let bytes = self
            .page
            .screenshot(
                CaptureScreenshotParams::builder()
                    .capture_beyond_viewport(true)
                    .build(),
            )
            .await
            .context("Failed to take full page screenshot")?;

        tokio::fs::create_dir_all(&self.config.screenshot_dir)
            .await
            .with_context(|| {
                format!("Failed to create {}", self.config.screenshot_dir.display())
            })?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!("Saved screenshot {}", path.display());
        Ok(path)
    }

    // ── Element helpers ─────────────────────────────────────────────────

    fn presence_timeout(&self, timeout_ms: Option<u64>) -> Duration {
        timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.config.presence_timeout)
    }

    fn hidden_timeout(&self, timeout_ms: Option<u64>) -> Duration {
        timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.config.hidden_timeout)
    }

    /// Wait for `locator` to become visible; errors on timeout.
    pub async fn wait_for_element(
        &self,
        locator: &Locator,
        timeout_ms: Option<u64>,
    ) -> Result<(), ReadinessError> {
        readiness::assert_element_present(locator, self.presence_timeout(timeout_ms)).await
    }

    pub async fn wait_for_element_hidden(
        &self,
        locator: &Locator,
        timeout_ms: Option<u64>,
    ) -> Result<(), ReadinessError> {
        readiness::wait_for_element_hidden(locator, self.hidden_timeout(timeout_ms)).await
    }

    pub async fn is_element_present(&self, locator: &Locator, timeout_ms: Option<u64>) -> bool {
        readiness::is_element_present(locator, self.presence_timeout(timeout_ms)).await
    }

    pub async fn assert_element_present(
        &self,
        locator: &Locator,
        timeout_ms: Option<u64>,
    ) -> Result<(), ReadinessError> {
        readiness::assert_element_present(locator, self.presence_timeout(timeout_ms)).await
    }

    pub async fn is_element_clickable(&self, locator: &Locator, timeout_ms: Option<u64>) -> bool {
        readiness::is_element_clickable(locator, self.presence_timeout(timeout_ms)).await
    }

    pub async fn assert_element_clickable(
        &self,
        locator: &Locator,
        timeout_ms: Option<u64>,
    ) -> Result<(), ReadinessError> {
        readiness::assert_element_clickable(locator, self.presence_timeout(timeout_ms)).await
    }

    /// Immediate visibility check, no waiting.
    pub async fn is_element_visible(&self, locator: &Locator) -> Result<bool> {
        locator.is_visible().await
    }

    /// Immediate enabled check, no waiting.
    pub async fn is_element_enabled(&self, locator: &Locator) -> Result<bool> {
        locator.is_enabled().await
    }

    pub async fn element_text(&self, locator: &Locator) -> Result<String> {
        Ok(locator.text_content().await?.unwrap_or_default())
    }

    pub async fn scroll_into_view(&self, locator: &Locator) -> Result<()> {
        locator.scroll_into_view_if_needed().await
    }

    /// Wait until `locator` reaches `state` within the presence timeout.
    pub async fn wait_for_state(&self, locator: &Locator, state: ElementState) -> Result<()> {
        let timeout = self.config.presence_timeout;
        if locator.wait_for(state, timeout).await.is_ready() {
            Ok(())
        } else {
            anyhow::bail!(
                "Element {} did not become {} within {}ms",
                locator.description(),
                state,
                timeout.as_millis()
            )
        }
    }
}

/// Tracks how long the resource count has stayed put.
#[derive(Debug)]
struct QuietWindow {
    window: Duration,
    last: Option<u64>,
    quiet_since: Instant,
}

impl QuietWindow {
    fn new(window: Duration, now: Instant) -> Self {
        Self {
            window,
            last: None,
            quiet_since: now,
        }
    }

    /// Record one sample; `None` is activity. True once the same count has
    /// been seen for the whole window.
    fn observe(&mut self, count: Option<u64>, now: Instant) -> bool {
        match count {
            Some(count) if self.last == Some(count) => {
                now.duration_since(self.quiet_since) >= self.window
            }
            other => {
                self.last = other;
                self.quiet_since = now;
                false
            }
        }
    }
}

/// A screen or reusable fragment built on top of [`BasePage`].
#[async_trait]
pub trait PageObject: Send + Sync {
    fn base(&self) -> &BasePage;

    fn page_name(&self) -> &str;

    /// Wait until the elements this object drives are usable.
    async fn wait_until_ready(&self) -> Result<()>;
}

/// `<dir>/<name>-<ISO timestamp with ':' and '.' replaced by '-'>.png`
pub fn screenshot_path(dir: &Path, name: &str, at: DateTime<Utc>) -> PathBuf {
    let timestamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    dir.join(format!("{}-{}.png", name, timestamp))
}
