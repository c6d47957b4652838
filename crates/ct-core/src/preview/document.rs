//! Markup document helpers.
//!
//! 为 HTML 片段补全完整文档结构，并生成可寻址的 data URL。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::classify::MimeType;

const BASE_FONT_STACK: &str =
    "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif";

/// Whether markup already declares a document type or a root element.
pub fn declares_document(content: &str) -> bool {
    let lower = content.to_ascii_lowercase();
    lower.contains("<!doctype") || lower.contains("<html")
}

/// If the content is itself a remote URL, return it.
///
/// Only the first line counts; leading whitespace is ignored.
pub fn remote_reference(content: &str) -> Option<&str> {
    let first_line = content.trim_start().lines().next()?.trim();
    if first_line.starts_with("http") {
        Some(first_line)
    } else {
        None
    }
}

pub fn escape_html(text: &str) -> String {
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

/// Wrap a markup fragment in a minimal full document.
///
/// Content that already declares a document is returned unchanged.
pub fn ensure_document(content: &str, filename: &str) -> String {
    if declares_document(content) {
        return content.to_string();
    }
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n  \
         <meta charset=\"utf-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n  \
         <title>{title}</title>\n  \
         <style>\n    body {{ font-family: {font}; }}\n  </style>\n\
         </head>\n\
         <body>\n{content}\n</body>\n\
         </html>",
        title = escape_html(filename),
        font = BASE_FONT_STACK,
        content = content,
    )
}

/// Address a document inline so the sandboxed viewer can load it without
/// a network round trip.
pub fn data_url(mime: &MimeType, document: &str) -> String {
    format!(
        "data:{};charset=utf-8;base64,{}",
        mime,
        STANDARD.encode(document.as_bytes())
    )
}

/// Inverse of [`data_url`]; used by tests and by shells that write the
/// document to disk.
pub fn decode_data_url(url: &str) -> Option<String> {
    let (_, encoded) = url.strip_prefix("data:")?.split_once(";base64,")?;
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}
