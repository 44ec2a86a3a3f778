//! HTML sanitization for user-supplied text.
//!
//! Markup is filtered against an allow-list of formatting tags. Tags outside
//! the list are neutralized by escaping their angle brackets, so
//! `<script>` becomes `&lt;script&gt;` and the text stays readable. Allowed
//! tags are rebuilt from their allowed attributes only, which drops event
//! handlers such as `onerror` and `onclick`.
//!
//! The filter is idempotent: running it over its own output is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--[\s\S]*?-->").expect("valid comment regex"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:[\s/][^<>]*)?)>").expect("valid tag regex")
});

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#,
    )
    .expect("valid attribute regex")
});

/// URL prefixes accepted in `href` and `src`.
const SAFE_URL_PREFIXES: &[&str] = &[
    "http://", "https://", "ftp://", "mailto:", "tel:", "#", "/", "./", "../",
];

/// Attributes allowed on each permitted tag. `None` means the tag is escaped.
fn allowed_attributes(tag: &str) -> Option<&'static [&'static str]> {
    let attrs: &'static [&'static str] = match tag {
        "a" => &["href", "title", "target"],
        "img" => &["src", "alt", "title", "width", "height"],
        "abbr" => &["title"],
        "blockquote" | "q" => &["cite"],
        "del" | "ins" => &["datetime"],
        "td" | "th" => &["colspan", "rowspan", "align"],
        "b" | "i" | "u" | "s" | "em" | "strong" | "small" | "sub" | "sup" | "mark" | "code"
        | "pre" | "p" | "br" | "hr" | "div" | "span" | "ul" | "ol" | "li" | "h1" | "h2"
        | "h3" | "h4" | "h5" | "h6" | "table" | "thead" | "tbody" | "tr" => &[],
        _ => return None,
    };
    Some(attrs)
}

/// Sanitize a piece of user-supplied text.
pub fn sanitize_html(input: &str) -> String {
    let input = COMMENT_RE.replace_all(input, "");
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in TAG_RE.captures_iter(&input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&escape_brackets(&input[last..whole.start()]));
        last = whole.end();

        let closing = !caps[1].is_empty();
        let name = caps[2].to_ascii_lowercase();

        match allowed_attributes(&name) {
            Some(_) if closing => {
                out.push_str("</");
                out.push_str(&name);
                out.push('>');
            }
            Some(allowed) => out.push_str(&rebuild_tag(&name, &caps[3], allowed)),
            None => out.push_str(&escape_brackets(whole.as_str())),
        }
    }

    out.push_str(&escape_brackets(&input[last..]));
    out
}

fn rebuild_tag(name: &str, raw_attrs: &str, allowed: &[&str]) -> String {
    let mut tag = format!("<{}", name);

    for caps in ATTR_RE.captures_iter(raw_attrs) {
        let attr = caps[1].to_ascii_lowercase();
        if !allowed.contains(&attr.as_str()) {
            continue;
        }

        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str());

        match value {
            Some(value) => {
                if (attr == "href" || attr == "src") && !is_safe_url(value) {
                    continue;
                }
                tag.push_str(&format!(" {}=\"{}\"", attr, value.replace('"', "&quot;")));
            }
            None => {
                tag.push(' ');
                tag.push_str(&attr);
            }
        }
    }

    if raw_attrs.trim_end().ends_with('/') {
        tag.push_str(" /");
    }
    tag.push('>');
    tag
}

fn is_safe_url(value: &str) -> bool {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    SAFE_URL_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}

fn escape_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}
