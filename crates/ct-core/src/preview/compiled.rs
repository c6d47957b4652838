use serde::Serialize;

use crate::classify::MimeType;
use crate::preview::document::data_url;

/// Component compilation failure. Non-fatal: the preview degrades to source.
/// 组件编译失败（非致命，预览降级为源码展示）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum CompileError {
    #[error("source is empty")]
    EmptySource,

    #[error("no mountable component: add a default export")]
    NoMountableExport,

    #[error("unsupported import {0}: only react and react-dom are available")]
    UnsupportedImport(String),

    #[error("source is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("compiler task failed: {0}")]
    Internal(String),
}

/// Executable output of a component-source file.
/// 组件源码编译后的可执行产物。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledComponent {
    /// Name of the component that gets mounted.
    pub entry: String,
    /// Self-contained mount document.
    pub document: String,
}

impl CompiledComponent {
    pub fn mount_url(&self) -> String {
        data_url(&MimeType::text_html(), &self.document)
    }

    pub fn size_bytes(&self) -> usize {
        self.entry.len() + self.document.len()
    }
}
