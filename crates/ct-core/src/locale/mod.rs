//! Locale and user-visible messages.
//!
//! Only the handful of strings the feed core itself produces live here;
//! the rest of the UI copy belongs to the shell.
//! 仅包含核心逻辑自身需要展示的少量文案。

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-cn")]
    ZhCn,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhCn => "zh-cn",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh-cn" | "zh_cn" | "zh" => Ok(Locale::ZhCn),
            other => Err(UnsupportedLocale(other.to_string())),
        }
    }
}

/// Messages emitted by the feed core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    Loading,
    ErrorTitle,
    LoadFailed,
    LoadFailedGeneric,
    BackToHome,
    RandomFailed,
    CompileFailed,
    Files,
}

impl Message {
    pub fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Message::Loading, Locale::En) => "Loading...",
            (Message::Loading, Locale::ZhCn) => "加载中...",
            (Message::ErrorTitle, Locale::En) => "Error",
            (Message::ErrorTitle, Locale::ZhCn) => "错误",
            (Message::LoadFailed, Locale::En) => {
                "Failed to load project, please check if the link is correct"
            }
            (Message::LoadFailed, Locale::ZhCn) => "无法加载项目，请检查链接是否正确",
            (Message::LoadFailedGeneric, Locale::En) => "Failed to load project",
            (Message::LoadFailedGeneric, Locale::ZhCn) => "加载项目失败",
            (Message::BackToHome, Locale::En) => "Back to Home",
            (Message::BackToHome, Locale::ZhCn) => "返回首页",
            (Message::RandomFailed, Locale::En) => {
                "Failed to load random project, please try again later"
            }
            (Message::RandomFailed, Locale::ZhCn) => "加载随机项目失败，请稍后再试",
            (Message::CompileFailed, Locale::En) => "Preview unavailable: compilation failed",
            (Message::CompileFailed, Locale::ZhCn) => "预览不可用：编译失败",
            (Message::Files, Locale::En) => "Files",
            (Message::Files, Locale::ZhCn) => "文件",
        }
    }
}
