//! Inline markup.
//!
//! Cell renderers hand back small HTML-like snippets such as
//! `<span class="badge">回费</span> <b>3</b>`. The parser understands a
//! forgiving subset: nested inline tags with a `class` attribute, `<b>` /
//! `<strong>`, `<i>` / `<em>`, `<br>`, and the common character entities.
//! Unknown tags are dropped but their text is kept; a stray `<` without a
//! closing `>` is literal text.

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub text: String,
    pub classes: Vec<String>,
    pub bold: bool,
    pub italic: bool,
}

impl Fragment {
    fn same_style(&self, other: &Fragment) -> bool {
        self.classes == other.classes && self.bold == other.bold && self.italic == other.italic
    }
}

/// Parsed markup, keeping its source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Markup {
    source: String,
    fragments: Vec<Fragment>,
}

#[derive(Debug, Clone, Default)]
struct Frame {
    name: String,
    classes: Vec<String>,
    bold: bool,
    italic: bool,
}

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "wbr"];

impl Markup {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let fragments = parse_fragments(&source);
        Self { source, fragments }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn plain_text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

impl From<&str> for Markup {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

impl From<String> for Markup {
    fn from(source: String) -> Self {
        Self::parse(source)
    }
}

/// Escape text for safe interpolation into markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn parse_fragments(source: &str) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut rest = source;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            push_text(&mut fragments, &stack, rest);
            break;
        };
        if open > 0 {
            push_text(&mut fragments, &stack, &rest[..open]);
        }
        let after = &rest[open + 1..];
        let Some(close) = after.find('>') else {
            push_text(&mut fragments, &stack, &rest[open..]);
            break;
        };
        apply_tag(&mut fragments, &mut stack, &after[..close]);
        rest = &after[close + 1..];
    }

    fragments
}

fn apply_tag(fragments: &mut Vec<Fragment>, stack: &mut Vec<Frame>, tag: &str) {
    let tag = tag.trim();
    if let Some(name) = tag.strip_prefix('/') {
        let name = name.trim().to_ascii_lowercase();
        if let Some(pos) = stack.iter().rposition(|f| f.name == name) {
            stack.truncate(pos);
        }
        return;
    }
    if tag.starts_with('!') || tag.starts_with('?') {
        return;
    }

    let self_closing = tag.ends_with('/');
    let tag = tag.trim_end_matches('/');
    let (name, attrs) = match tag.find(char::is_whitespace) {
        Some(split) => (&tag[..split], &tag[split..]),
        None => (tag, ""),
    };
    let name = name.to_ascii_lowercase();

    if name == "br" {
        push_raw(fragments, stack, "\n");
        return;
    }
    if self_closing || VOID_TAGS.contains(&name.as_str()) {
        return;
    }

    let parent = stack.last().cloned().unwrap_or_default();
    let mut classes = parent.classes;
    for class in attribute(attrs, "class").unwrap_or_default().split_whitespace() {
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }
    stack.push(Frame {
        bold: parent.bold || matches!(name.as_str(), "b" | "strong"),
        italic: parent.italic || matches!(name.as_str(), "i" | "em"),
        name,
        classes,
    });
}

/// Value of `name="..."` (or single-quoted / bare) in an attribute list.
fn attribute(attrs: &str, name: &str) -> Option<String> {
    let mut rest = attrs;
    while let Some(eq) = rest.find('=') {
        let key = rest[..eq].split_whitespace().last().unwrap_or("");
        let value_start = rest[eq + 1..].trim_start();
        let (value, remaining) = match value_start.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &value_start[1..];
                match body.find(quote) {
                    Some(end) => (&body[..end], &body[end + 1..]),
                    None => (body, ""),
                }
            }
            _ => {
                let end = value_start
                    .find(char::is_whitespace)
                    .unwrap_or(value_start.len());
                (&value_start[..end], &value_start[end..])
            }
        };
        if key.eq_ignore_ascii_case(name) {
            return Some(decode_entities(value));
        }
        rest = remaining;
    }
    None
}

fn push_text(fragments: &mut Vec<Fragment>, stack: &[Frame], raw: &str) {
    push_raw(fragments, stack, &decode_entities(raw));
}

fn push_raw(fragments: &mut Vec<Fragment>, stack: &[Frame], text: &str) {
    if text.is_empty() {
        return;
    }
    let frame = stack.last().cloned().unwrap_or_default();
    let fragment = Fragment {
        text: text.to_string(),
        classes: frame.classes,
        bold: frame.bold,
        italic: frame.italic,
    };
    match fragments.last_mut() {
        Some(last) if last.same_style(&fragment) => last.text.push_str(&fragment.text),
        _ => fragments.push(fragment),
    }
}

fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|end| *end <= 10) {
            Some(end) => match decode_entity(&tail[1..end]) {
                Some(ch) => {
                    out.push(ch);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
