use anyhow::{Context, Result};
use chromiumoxide::page::Page;

use crate::selectors::Query;

use super::single_element;

/// Replace the value of an input, textarea or contenteditable element.
///
/// Uses the native value setter so framework bindings (Angular forms in
/// particular) observe the `input` and `change` events.
pub async fn fill(page: &Page, query: &Query, text: &str) -> Result<()> {
    let fill_js = query.single_element_js(&format!(
        r#"(el) => {{
            if (!el) throw new Error('Element not found');
            const text = {text};
            el.scrollIntoView({{ block: 'center', behavior: 'instant' }});
            el.focus();
            if (el.tagName === 'INPUT' || el.tagName === 'TEXTAREA') {{
                const proto = el.tagName === 'INPUT'
                    ? window.HTMLInputElement.prototype
                    : window.HTMLTextAreaElement.prototype;
                const setter = Object.getOwnPropertyDescriptor(proto, 'value')?.set;
                if (setter) {{
                    setter.call(el, text);
                }} else {{
                    el.value = text;
                }}
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            }} else if (el.isContentEditable) {{
                document.execCommand('selectAll', false, null);
                if (text === '') {{
                    document.execCommand('delete', false, null);
                }} else {{
                    document.execCommand('insertText', false, text);
                }}
            }} else {{
                throw new Error('Element is not an <input>, <textarea> or [contenteditable] element');
            }}
            return true;
        }}"#,
        text = serde_json::to_string(text)?
    ))?;

    let _: bool = single_element(page, &fill_js, query)
        .await
        .with_context(|| format!("Failed to fill {}", query.describe()))?;
    Ok(())
}
