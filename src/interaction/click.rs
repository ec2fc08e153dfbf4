use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use serde::Deserialize;

use crate::selectors::Query;

use super::single_element;

/// How [`hybrid_click`] ended up delivering the click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMethod {
    MouseEvents,
    JsClick,
}

#[derive(Debug, Deserialize)]
struct ClickTarget {
    error: Option<String>,
    #[serde(default)]
    visible: bool,
    #[serde(default)]
    unobscured: bool,
}

/// Hybrid click strategy:
/// 1. Resolve the query to exactly one element
/// 2. Scroll into view
/// 3. Check size, visibility and obstruction at the centre point
/// 4. Dispatch mouse events if unobscured, fall back to `el.click()`
pub async fn hybrid_click(page: &Page, query: &Query) -> Result<ClickMethod> {
    let check_js = query.single_element_js(
        r#"(el) => {
            if (!el) return { error: 'Element not found' };
            el.scrollIntoView({ block: 'center', inline: 'center', behavior: 'instant' });

            const rect = el.getBoundingClientRect();
            if (rect.width === 0 && rect.height === 0) {
                return { error: 'Element has zero size' };
            }
            const x = rect.left + rect.width / 2;
            const y = rect.top + rect.height / 2;

            const style = getComputedStyle(el);
            if (style.display === 'none' || style.visibility === 'hidden' || parseFloat(style.opacity) === 0) {
                return { visible: false };
            }

            const topEl = document.elementFromPoint(x, y);
            const unobscured = !!topEl && (el === topEl || el.contains(topEl) || topEl.contains(el));
            return { visible: true, unobscured };
        }"#,
    )?;

    let target: ClickTarget = single_element(page, &check_js, query)
        .await
        .context("Failed to evaluate click check")?;

    if let Some(error) = target.error {
        anyhow::bail!("{}: {}", error, query.describe());
    }

    // Let scroll/layout settle
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    if target.visible && target.unobscured {
        let click_js = query.single_element_js(
            r#"(el) => {
                const rect = el.getBoundingClientRect();
                const x = rect.left + rect.width / 2;
                const y = rect.top + rect.height / 2;
                // Deliver to whatever a real pointer would hit (e.g. the label inside a custom checkbox)
                const hit = document.elementFromPoint(x, y);
                const target = hit && (el === hit || el.contains(hit)) ? hit : el;
                const opts = { bubbles: true, cancelable: true, clientX: x, clientY: y, button: 0 };
                target.dispatchEvent(new MouseEvent('mousemove', opts));
                target.dispatchEvent(new MouseEvent('mousedown', opts));
                if (typeof el.focus === 'function') el.focus();
                target.dispatchEvent(new MouseEvent('mouseup', opts));
                target.dispatchEvent(new MouseEvent('click', opts));
                return true;
            }"#,
        )?;
        let _: bool = single_element(page, &click_js, query)
            .await
            .context("Failed to dispatch mouse events")?;
        tracing::debug!("Clicked {} with mouse events", query.describe());
        Ok(ClickMethod::MouseEvents)
    } else {
        let js_click = query.single_element_js(
            r#"(el) => {
                if (!el) throw new Error('Element not found');
                el.click();
                return true;
            }"#,
        )?;
        let _: bool = single_element(page, &js_click, query)
            .await
            .context("Failed to JS click")?;
        tracing::debug!("Clicked {} with JS fallback", query.describe());
        Ok(ClickMethod::JsClick)
    }
}
