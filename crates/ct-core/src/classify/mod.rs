//! Source classifier.
//!
//! Maps a filename to a content category and MIME label. Pure and total:
//! unknown extensions fall back to [`FileCategory::Other`] / `text/plain`.
//! 根据文件扩展名判断内容类别与 MIME 类型（纯函数）。

mod mime;

pub use mime::MimeType;

use serde::{Deserialize, Serialize};

/// Content category used for preview routing.
/// 用于预览路由的内容类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Markup,
    Stylesheet,
    Script,
    /// Needs compilation before it can be mounted (tsx/jsx).
    ComponentSource,
    Other,
}

impl FileCategory {
    /// Short label shown in the code view header.
    pub fn display_label(self) -> &'static str {
        match self {
            FileCategory::Markup => "HTML",
            FileCategory::Stylesheet => "CSS",
            FileCategory::Script | FileCategory::ComponentSource => "JavaScript",
            FileCategory::Other => "Code",
        }
    }

    pub fn needs_compilation(self) -> bool {
        matches!(self, FileCategory::ComponentSource)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: FileCategory,
    pub mime: MimeType,
}

/// Lower-cased extension after the last dot, if any.
fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub fn classify(filename: &str) -> Classification {
    let ext = extension(filename);
    let (category, mime) = match ext.as_deref() {
        Some("html") | Some("htm") => (FileCategory::Markup, MimeType::text_html()),
        Some("css") => (FileCategory::Stylesheet, MimeType::text_css()),
        Some("js") | Some("mjs") | Some("cjs") | Some("ts") => {
            (FileCategory::Script, MimeType::application_javascript())
        }
        Some("tsx") | Some("jsx") => (
            FileCategory::ComponentSource,
            MimeType::application_javascript(),
        ),
        Some("json") => (FileCategory::Other, MimeType::from_static("application/json")),
        Some("xml") => (FileCategory::Other, MimeType::from_static("application/xml")),
        Some("svg") => (FileCategory::Other, MimeType::from_static("image/svg+xml")),
        Some("png") => (FileCategory::Other, MimeType::from_static("image/png")),
        Some("jpg") | Some("jpeg") => (FileCategory::Other, MimeType::from_static("image/jpeg")),
        Some("gif") => (FileCategory::Other, MimeType::from_static("image/gif")),
        _ => (FileCategory::Other, MimeType::text_plain()),
    };
    Classification { category, mime }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_known_extensions() {
        assert_eq!(classify("index.html").category, FileCategory::Markup);
        assert_eq!(classify("index.HTM").mime.as_str(), "text/html");
        assert_eq!(classify("style.css").category, FileCategory::Stylesheet);
        assert_eq!(classify("main.js").category, FileCategory::Script);
        assert_eq!(classify("util.ts").mime.as_str(), "application/javascript");
        assert_eq!(classify("App.tsx").category, FileCategory::ComponentSource);
        assert_eq!(classify("App.jsx").category, FileCategory::ComponentSource);
        assert_eq!(classify("logo.svg").mime.as_str(), "image/svg+xml");
        assert_eq!(classify("photo.JPEG").mime.as_str(), "image/jpeg");
        assert_eq!(classify("data.json").mime.as_str(), "application/json");
    }

    #[test]
    fn test_unknown_and_missing_extensions_fall_back() {
        for name in ["README", "notes.md", "archive.tar.zst", "trailing.", ""] {
            let c = classify(name);
            assert_eq!(c.category, FileCategory::Other, "{name}");
            assert_eq!(c.mime.as_str(), "text/plain", "{name}");
        }
    }

    #[test]
    fn test_classification_is_stable() {
        for name in ["a.html", "b.css", "c.tsx", "d.weird", "e"] {
            assert_eq!(classify(name), classify(name));
        }
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(classify("a.html").category.display_label(), "HTML");
        assert_eq!(classify("a.css").category.display_label(), "CSS");
        assert_eq!(classify("a.tsx").category.display_label(), "JavaScript");
        assert_eq!(classify("a.py").category.display_label(), "Code");
    }
}
