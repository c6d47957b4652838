use serde::Serialize;

use crate::classify::{classify, FileCategory, MimeType};
use crate::preview::SandboxPolicy;

/// Read-only view of one file's source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceView {
    pub filename: String,
    pub category: FileCategory,
    pub label: &'static str,
    pub mime: MimeType,
    pub content: String,
}

impl SourceView {
    pub fn new(filename: &str, content: &str) -> Self {
        let classification = classify(filename);
        Self {
            filename: filename.to_string(),
            category: classification.category,
            label: classification.category.display_label(),
            mime: classification.mime,
            content: content.to_string(),
        }
    }

    /// Badge shown next to the label for files that need compilation.
    pub fn badge(&self) -> Option<&'static str> {
        if self.category.needs_compilation() {
            Some("TSX")
        } else {
            None
        }
    }

    /// `a.html - HTML`
    pub fn header(&self) -> String {
        format!("{} - {}", self.filename, self.label)
    }
}

/// What the preview area renders for the selected file.
/// 预览区域针对当前文件的渲染结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewArtifact {
    /// Inline markup addressed as a data URL inside the sandbox.
    SandboxedDocument { url: String, sandbox: SandboxPolicy },
    /// Markup whose content is a remote URL; loaded directly.
    ExternalReference { url: String, sandbox: SandboxPolicy },
    /// Component source is compiling; the preview region shows a loading state.
    CompilePending { source: SourceView },
    /// Compiled component mounted in a sandboxed region, source alongside.
    MountedComponent {
        entry: String,
        mount_url: String,
        sandbox: SandboxPolicy,
        source: SourceView,
    },
    /// Read-only formatted text, optionally with a compile error indicator.
    SourceOnly {
        source: SourceView,
        compile_error: Option<String>,
    },
}

impl PreviewArtifact {
    pub fn uses_frame(&self) -> bool {
        matches!(
            self,
            PreviewArtifact::SandboxedDocument { .. }
                | PreviewArtifact::ExternalReference { .. }
                | PreviewArtifact::MountedComponent { .. }
        )
    }

    pub fn frame_url(&self) -> Option<&str> {
        match self {
            PreviewArtifact::SandboxedDocument { url, .. }
            | PreviewArtifact::ExternalReference { url, .. } => Some(url),
            PreviewArtifact::MountedComponent { mount_url, .. } => Some(mount_url),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<&SourceView> {
        match self {
            PreviewArtifact::CompilePending { source }
            | PreviewArtifact::MountedComponent { source, .. }
            | PreviewArtifact::SourceOnly { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn compile_error(&self) -> Option<&str> {
        match self {
            PreviewArtifact::SourceOnly { compile_error, .. } => compile_error.as_deref(),
            _ => None,
        }
    }
}
