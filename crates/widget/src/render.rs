//! Text to HTML conversion for message bubbles.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::BotMarkup;

// Statute references such as "Lei nº 8.245/91".
static STATUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Lei\s+nº\s+[\d.]+/\d+)").expect("valid regex"));
// Article references such as "Art. 22".
static ARTICLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(Art\.\s+\d+)").expect("valid regex"));

/// Escapes the five HTML-sensitive characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Converts bot text to bubble markup: line breaks become `<br>` and legal
/// references are wrapped in `<strong>`.
pub fn format_bot_text(text: &str, markup: BotMarkup) -> String {
    let source = match markup {
        BotMarkup::Escaped => escape_html(text),
        BotMarkup::Trusted => text.to_string(),
    };

    let formatted = source.replace('\n', "<br>");
    let formatted = STATUTE_RE.replace_all(&formatted, "<strong>$1</strong>");
    let formatted = ARTICLE_RE.replace_all(&formatted, "<strong>$1</strong>");
    formatted.into_owned()
}

/// Renders the reference list under a bot answer; empty for no citations.
pub fn render_citations(citations: &[String], heading: &str) -> String {
    if citations.is_empty() {
        return String::new();
    }

    let items = citations
        .iter()
        .map(|citation| {
            let citation = escape_html(citation);
            format!(r#"<li><a href="{citation}" target="_blank">{citation}</a></li>"#)
        })
        .collect::<String>();

    format!(
        r#"<div class="citations"><h6>{}</h6><ul>{items}</ul></div>"#,
        escape_html(heading)
    )
}
