use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::page::Page;

use crate::interaction::click::{self, ClickMethod};
use crate::interaction::readiness::{self, DEFAULT_PRESENCE_TIMEOUT};
use crate::interaction::wait::{ElementProbe, ElementState};
use crate::interaction::{keyboard, scroll, single_element};
use crate::selectors::runtime::{
    INPUT_VALUE_JS, IS_CHECKED_JS, IS_ENABLED_JS, IS_VISIBLE_JS, TEXT_CONTENT_JS,
};
use crate::selectors::{css, Query, Selector, Step};

/// Lazily resolved handle to the elements matching a query on one page.
///
/// Nothing is looked up until a query or action runs, and every call resolves
/// again, so a locator survives re-renders. Chaining never mutates: each
/// builder returns a new locator.
#[derive(Clone)]
pub struct Locator {
    page: Page,
    query: Query,
    action_timeout: Duration,
}

impl std::fmt::Debug for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locator")
            .field("query", &self.query.describe())
            .field("action_timeout", &self.action_timeout)
            .finish()
    }
}

impl Locator {
    pub fn from_query(page: Page, query: Query) -> Self {
        Self {
            page,
            query,
            action_timeout: DEFAULT_PRESENCE_TIMEOUT,
        }
    }

    /// How long actions wait for the element to become visible and enabled.
    pub fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    fn then(&self, steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            page: self.page.clone(),
            query: self.query.then(steps),
            action_timeout: self.action_timeout,
        }
    }

    // ── Chaining ────────────────────────────────────────────────────────

    /// Descend with a raw selector string (CSS, XPath, `:text-is(...)`, `..`).
    pub fn locator(&self, selector: &str) -> Self {
        self.then(css::parse(selector))
    }

    pub fn get_by_text(&self, text: &str) -> Self {
        self.then([Step::Select(Selector::text(text))])
    }

    pub fn get_by_exact_text(&self, text: &str) -> Self {
        self.then([Step::Select(Selector::exact_text(text))])
    }

    pub fn get_by_role(&self, role: &str, name: Option<&str>) -> Self {
        self.then([Step::Select(Selector::role(role, name))])
    }

    pub fn get_by_label(&self, text: &str) -> Self {
        self.then([Step::Select(Selector::label(text))])
    }

    pub fn get_by_placeholder(&self, text: &str) -> Self {
        self.then([Step::Select(Selector::placeholder(text))])
    }

    pub fn get_by_title(&self, text: &str) -> Self {
        self.then([Step::Select(Selector::title(text))])
    }

    pub fn get_by_test_id(&self, id: &str) -> Self {
        self.then([Step::Select(Selector::test_id(id))])
    }

    pub fn first(&self) -> Self {
        self.nth(0)
    }

    pub fn last(&self) -> Self {
        self.nth(-1)
    }

    pub fn nth(&self, index: i64) -> Self {
        self.then([Step::Nth { index }])
    }

    pub fn filter_has_text(&self, text: &str) -> Self {
        self.then([Step::HasText {
            text: text.to_string(),
            exact: false,
        }])
    }

    /// Keep matches that contain an element matched by `inner` (resolved relative to each match).
    pub fn filter_has(&self, inner: &Locator) -> Self {
        self.then([Step::Has {
            query: inner.query.clone(),
        }])
    }

    pub fn parent(&self) -> Self {
        self.then([Step::Parent])
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub async fn count(&self) -> Result<usize> {
        let js = format!("{}.length", self.query.to_js()?);
        let count: usize = self
            .page
            .evaluate(js)
            .await
            .with_context(|| format!("Failed to count {}", self.query.describe()))?
            .into_value()
            .context("Failed to parse element count")?;
        Ok(count)
    }

    /// Whether the single matched element is rendered; `false` when nothing matches.
    pub async fn is_visible(&self) -> Result<bool> {
        self.eval_single(IS_VISIBLE_JS).await
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        let enabled: Option<bool> = self.eval_single(IS_ENABLED_JS).await?;
        enabled.with_context(|| format!("Element not found: {}", self.query.describe()))
    }

    pub async fn is_checked(&self) -> Result<bool> {
        let checked: Option<bool> = self.eval_single(IS_CHECKED_JS).await?;
        checked.with_context(|| {
            format!("Not a checkbox or radio element: {}", self.query.describe())
        })
    }

    /// Raw `textContent` of the matched element, waiting for it to be attached.
    pub async fn text_content(&self) -> Result<Option<String>> {
        self.ensure_attached().await?;
        self.eval_single(TEXT_CONTENT_JS).await
    }

    pub async fn input_value(&self) -> Result<String> {
        self.ensure_attached().await?;
        let value: Option<String> = self.eval_single(INPUT_VALUE_JS).await?;
        value.with_context(|| format!("Element not found: {}", self.query.describe()))
    }

    // ── Actions ─────────────────────────────────────────────────────────

    pub async fn click(&self) -> Result<ClickMethod> {
        self.ensure_actionable().await?;
        tracing::info!("Clicking {}", self.query.describe());
        click::hybrid_click(&self.page, &self.query).await
    }

    pub async fn fill(&self, text: &str) -> Result<()> {
        self.ensure_actionable().await?;
        tracing::info!("Filling {}", self.query.describe());
        keyboard::fill(&self.page, &self.query, text).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.fill("").await
    }

    pub async fn scroll_into_view_if_needed(&self) -> Result<()> {
        self.ensure_attached().await?;
        scroll::scroll_into_view_if_needed(&self.page, &self.query).await
    }

    // ── Internals ───────────────────────────────────────────────────────

    async fn eval_single<T: serde::de::DeserializeOwned>(&self, body: &str) -> Result<T> {
        let js = self.query.single_element_js(body)?;
        single_element(&self.page, &js, &self.query).await
    }

    async fn ensure_attached(&self) -> Result<()> {
        if self
            .wait_for(ElementState::Attached, self.action_timeout)
            .await
            .is_ready()
        {
            Ok(())
        } else {
            anyhow::bail!(
                "Element {} was not attached within {}ms",
                self.query.describe(),
                self.action_timeout.as_millis()
            )
        }
    }

    async fn ensure_actionable(&self) -> Result<()> {
        readiness::assert_element_clickable(self, self.action_timeout).await?;
        Ok(())
    }
}

#[async_trait]
impl ElementProbe for Locator {
    fn description(&self) -> String {
        self.query.describe()
    }

    async fn is_visible(&self) -> Result<bool> {
        Locator::is_visible(self).await
    }

    async fn is_enabled(&self) -> Result<bool> {
        Locator::is_enabled(self).await
    }

    async fn is_attached(&self) -> Result<bool> {
        Ok(self.count().await? > 0)
    }
}
