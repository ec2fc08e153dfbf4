pub mod click;
pub mod keyboard;
pub mod readiness;
pub mod scroll;
pub mod wait;

use anyhow::{Context, Result};
use chromiumoxide::page::Page;
use serde::de::DeserializeOwned;

use crate::selectors::Query;

/// Evaluate a script built by [`Query::single_element_js`] and unwrap its
/// `{ ok }` / `{ error }` envelope.
pub(crate) async fn single_element<T: DeserializeOwned>(
    page: &Page,
    js: &str,
    query: &Query,
) -> Result<T> {
    let envelope: serde_json::Value = page
        .evaluate(js)
        .await
        .with_context(|| format!("Failed to evaluate {}", query.describe()))?
        .into_value()
        .context("Failed to parse evaluation result")?;
    unwrap_envelope(envelope)
}

fn unwrap_envelope<T: DeserializeOwned>(mut envelope: serde_json::Value) -> Result<T> {
    if let Some(error) = envelope.get("error").and_then(|e| e.as_str()) {
        anyhow::bail!("{}", error);
    }
    let value = envelope
        .get_mut("ok")
        .map(serde_json::Value::take)
        .unwrap_or(serde_json::Value::Null);
    serde_json::from_value(value).context("Unexpected evaluation result type")
}
