use anyhow::{Context, Result};
use chromiumoxide::page::Page;

use crate::selectors::Query;

use super::single_element;

/// Scroll the element into the middle of the viewport unless it is already fully visible.
pub async fn scroll_into_view_if_needed(page: &Page, query: &Query) -> Result<()> {
    let js = query.single_element_js(
        r#"(el) => {
            if (!el) throw new Error('Element not found');
            const rect = el.getBoundingClientRect();
            const inView = rect.top >= 0 && rect.left >= 0
                && rect.bottom <= window.innerHeight && rect.right <= window.innerWidth;
            if (!inView) el.scrollIntoView({ block: 'center', inline: 'center', behavior: 'instant' });
            return !inView;
        }"#,
    )?;

    let scrolled: bool = single_element(page, &js, query)
        .await
        .context("Failed to scroll element into view")?;

    if scrolled {
        // Wait for scroll to settle
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
    Ok(())
}
