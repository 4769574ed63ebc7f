//! Display boundary for server-sourced HTML.
//!
//! Post bodies arrive as raw HTML the original site injected into the
//! page unescaped. This client never renders markup: everything that
//! reaches a label goes through [`plain_text`] first, so a hostile or
//! malformed body degrades to visible text rather than structure.

/// Tags that end a run of inline text; their boundary becomes a line
/// break so words from adjacent blocks don't fuse.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "br", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre",
    "tr",
];

/// Strips tags, decodes the common entities, and collapses whitespace.
/// A `<` with no closing `>` swallows the rest of the input, matching
/// how truncated markup should fail: quietly, with nothing rendered as
/// a tag.
pub fn plain_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        decode_entities(&rest[..open], &mut text);
        let tail = &rest[open + 1..];
        match tail.find('>') {
            Some(close) => {
                if is_block_tag(&tail[..close]) {
                    text.push('\n');
                }
                rest = &tail[close + 1..];
            }
            None => {
                rest = "";
            }
        }
    }
    decode_entities(rest, &mut text);

    normalize_whitespace(&text)
}

/// List-view teaser: single line, at most `max_chars` characters, with
/// an ellipsis when the body was cut.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let flat = plain_text(html).replace('\n', " ");
    let mut out: String = flat.chars().take(max_chars).collect();
    if flat.chars().count() > max_chars {
        out.push('…');
    }
    out
}

fn is_block_tag(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("");
    BLOCK_TAGS
        .iter()
        .any(|block| name.eq_ignore_ascii_case(block))
}

fn decode_entities(segment: &str, out: &mut String) {
    let mut rest = segment;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let entity = &tail[..=semi];
            let ch = match entity {
                "&amp;" => '&',
                "&lt;" => '<',
                "&gt;" => '>',
                "&quot;" | "&#34;" => '"',
                "&#39;" | "&apos;" => '\'',
                "&nbsp;" => ' ',
                _ => return None,
            };
            Some((ch, semi))
        });
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
}

fn normalize_whitespace(raw: &str) -> String {
    let mut lines = Vec::new();
    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}
