use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::runtime::RESOLVER_JS;
use super::Selector;

/// One step of a locator chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Step {
    /// Replace every element of the set by its matches for `selector`.
    Select(Selector),
    /// Keep a single element; negative indexes count from the end.
    Nth { index: i64 },
    /// Keep elements whose text contains (or, when exact, equals) `text`.
    HasText { text: String, exact: bool },
    /// Keep elements containing a match of the nested query.
    Has { query: Query },
    /// Map each element to its parent.
    Parent,
}

/// Ordered list of steps resolved against `document` inside the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub steps: Vec<Step>,
}

impl Query {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Copy of this query with `steps` appended.
    pub fn then(&self, steps: impl IntoIterator<Item = Step>) -> Self {
        let mut next = self.clone();
        next.steps.extend(steps);
        next
    }

    /// Playwright-style description, e.g. `css=nb-card >> nth=0 >> role=button`.
    pub fn describe(&self) -> String {
        if self.steps.is_empty() {
            return ":root".to_string();
        }
        self.steps
            .iter()
            .map(|step| match step {
                Step::Select(selector) => selector.to_string(),
                Step::Nth { index } => format!("nth={}", index),
                Step::HasText { text, exact: false } => format!("has-text={:?}", text),
                Step::HasText { text, exact: true } => format!("has-text={:?}s", text),
                Step::Has { query } => format!("has=({})", query.describe()),
                Step::Parent => "..".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" >> ")
    }

    /// JS expression evaluating to the array of matched elements.
    pub fn to_js(&self) -> Result<String> {
        Ok(format!(
            "(() => {{ {runtime} return __resolve({steps}, document); }})()",
            runtime = RESOLVER_JS,
            steps = serde_json::to_string(&self.steps)?
        ))
    }

    /// JS expression that runs `body` (an `(el) => ...` function) on the single
    /// match and returns `{ ok: <result> }`, or `{ error }` when more than one
    /// element matches. `el` is `null` when nothing matches.
    pub fn single_element_js(&self, body: &str) -> Result<String> {
        Ok(format!(
            r#"(() => {{
                {runtime}
                const els = __resolve({steps}, document);
                if (els.length > 1) {{
                    return {{ error: 'strict mode violation: ' + {desc} + ' resolved to ' + els.length + ' elements' }};
                }}
                const el = els.length === 1 ? els[0] : null;
                return {{ ok: ({body})(el) }};
            }})()"#,
            runtime = RESOLVER_JS,
            steps = serde_json::to_string(&self.steps)?,
            desc = serde_json::to_string(&self.describe())?,
            body = body
        ))
    }
}
