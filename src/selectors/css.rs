use super::{Selector, Step};

/// Parse a raw `locator("...")` string into query steps.
///
/// Plain CSS stays CSS. `xpath=`, `//...` and `(//...` are XPath, `..` is the
/// parent element, `text=` is a text selector (exact when quoted), and the
/// `:text()`, `:text-is()` and `:has-text()` pseudo classes are split off into
/// text selectors or text filters.
pub fn parse(raw: &str) -> Vec<Step> {
    let raw = raw.trim();

    if raw == ".." {
        return vec![Step::Parent];
    }
    if let Some(xpath) = raw.strip_prefix("xpath=") {
        return vec![Step::Select(Selector::xpath(xpath))];
    }
    if raw.starts_with("//") || raw.starts_with("(//") {
        return vec![Step::Select(Selector::xpath(raw))];
    }
    if let Some(rest) = raw.strip_prefix("text=") {
        return vec![Step::Select(match unquote(rest) {
            Some((text, _)) => Selector::exact_text(text),
            None => Selector::text(rest),
        })];
    }
    let raw = raw.strip_prefix("css=").unwrap_or(raw);

    let Some((start, pseudo)) = find_text_pseudo(raw) else {
        return vec![Step::Select(Selector::css(raw))];
    };

    let prefix = &raw[..start];
    let after = &raw[start + pseudo.len()..];
    let Some((text, consumed)) = unquote(after) else {
        return vec![Step::Select(Selector::css(raw))];
    };
    let Some(rest) = after[consumed..].strip_prefix(')') else {
        return vec![Step::Select(Selector::css(raw))];
    };

    let exact = pseudo == ":text-is(";
    let mut steps = Vec::new();
    match pseudo {
        ":has-text(" => {
            steps.push(Step::Select(Selector::css(css_or_any(prefix))));
            steps.push(Step::HasText { text, exact: false });
        }
        _ if prefix.trim().is_empty() => {
            steps.push(Step::Select(text_selector(text, exact)));
        }
        _ if prefix.ends_with(char::is_whitespace) => {
            steps.push(Step::Select(Selector::css(prefix.trim())));
            steps.push(Step::Select(text_selector(text, exact)));
        }
        _ => {
            steps.push(Step::Select(Selector::css(prefix)));
            steps.push(Step::HasText { text, exact });
        }
    }

    if !rest.trim().is_empty() {
        steps.extend(parse(rest));
    }
    steps
}

fn find_text_pseudo(raw: &str) -> Option<(usize, &'static str)> {
    [":text-is(", ":has-text(", ":text("]
        .into_iter()
        .filter_map(|pseudo| raw.find(pseudo).map(|pos| (pos, pseudo)))
        .min_by_key(|(pos, _)| *pos)
}

fn text_selector(text: String, exact: bool) -> Selector {
    if exact {
        Selector::exact_text(text)
    } else {
        Selector::text(text)
    }
}

fn css_or_any(prefix: &str) -> &str {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        "*"
    } else {
        prefix
    }
}

/// Read a leading `"..."` or `'...'` string; returns the text and bytes consumed.
fn unquote(input: &str) -> Option<(String, usize)> {
    let quote = input.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &input[1..];
    let end = body.find(quote)?;
    Some((body[..end].to_string(), end + 2))
}
