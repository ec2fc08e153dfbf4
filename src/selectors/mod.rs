pub mod css;
pub mod query;
pub mod runtime;

use serde::{Deserialize, Serialize};

pub use query::{Query, Step};

/// One selector engine invocation, evaluated relative to each element of the
/// current match set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "lowercase")]
pub enum Selector {
    Css { css: String },
    Xpath { xpath: String },
    Text { text: String, exact: bool },
    Role {
        role: String,
        name: Option<String>,
        exact: bool,
    },
    Label { text: String, exact: bool },
    Placeholder { text: String, exact: bool },
    Title { text: String, exact: bool },
    #[serde(rename = "testid")]
    TestId { id: String },
}

impl Selector {
    pub fn css(css: impl Into<String>) -> Self {
        Self::Css { css: css.into() }
    }

    pub fn xpath(xpath: impl Into<String>) -> Self {
        Self::Xpath { xpath: xpath.into() }
    }

    pub fn text(text: impl AsRef<str>) -> Self {
        Self::Text { text: normalize_whitespace(text.as_ref()), exact: false }
    }

    pub fn exact_text(text: impl AsRef<str>) -> Self {
        Self::Text { text: normalize_whitespace(text.as_ref()), exact: true }
    }

    pub fn role(role: impl Into<String>, name: Option<&str>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.map(normalize_whitespace),
            exact: false,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::Label { text: text.into(), exact: false }
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder { text: text.into(), exact: false }
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::Title { text: text.into(), exact: false }
    }

    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId { id: id.into() }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let quote = |text: &str, exact: bool| {
            if exact {
                format!("{:?}s", text)
            } else {
                format!("{:?}i", text)
            }
        };
        match self {
            Self::Css { css } => write!(f, "css={}", css),
            Self::Xpath { xpath } => write!(f, "xpath={}", xpath),
            Self::Text { text, exact } => write!(f, "text={}", quote(text, *exact)),
            Self::Role { role, name, exact } => match name {
                Some(name) => write!(f, "role={}[name={}]", role, quote(name, *exact)),
                None => write!(f, "role={}", role),
            },
            Self::Label { text, exact } => write!(f, "label={}", quote(text, *exact)),
            Self::Placeholder { text, exact } => {
                write!(f, "placeholder={}", quote(text, *exact))
            }
            Self::Title { text, exact } => write!(f, "title={}", quote(text, *exact)),
            Self::TestId { id } => write!(f, "testid={}", id),
        }
    }
}

/// Collapse runs of whitespace and trim, the way matched text is compared in the page.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
