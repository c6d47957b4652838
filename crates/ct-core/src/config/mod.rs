//! # Pure Data Module / 纯数据模块 - Data Transfer Objects Only
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No default value calculation / 禁止默认值计算**
//!
//! Defaults are resolved by the binary's bootstrap layer.

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
///
/// Missing values are represented as empty strings, zero, `None` or empty
/// lists. Those are facts, not errors.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// UI locale tag, e.g. `en` or `zh-cn`
    pub locale: String,

    /// Base URL of the catalog API (`{base}/api/projects/...`)
    pub api_base_url: String,

    /// Base URL of the site whose views receive prefetch hints
    pub site_base_url: String,

    /// Whether to prefetch the next candidate once a project is ready
    pub prefetch_enabled: Option<bool>,

    /// Vertical swipe threshold in pixels
    pub swipe_threshold_px: Option<f64>,

    /// Compiled component cache limits
    pub compile_cache_entries: u64,
    pub compile_cache_bytes: u64,

    /// Scripts injected into compiled component documents
    pub runtime_scripts: Vec<String>,
}

fn section_str(toml_value: &toml::Value, section: &str, key: &str) -> String {
    toml_value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// **Prohibited / 禁止**: This method must NOT contain any validation
    /// or default value logic.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let feed = toml_value.get("feed");
        let preview = toml_value.get("preview");

        Ok(Self {
            locale: section_str(toml_value, "general", "locale"),
            api_base_url: section_str(toml_value, "api", "base_url"),
            site_base_url: section_str(toml_value, "site", "base_url"),
            prefetch_enabled: feed
                .and_then(|f| f.get("prefetch_enabled"))
                .and_then(|v| v.as_bool()),
            swipe_threshold_px: feed.and_then(|f| f.get("swipe_threshold_px")).and_then(|v| {
                v.as_float().or_else(|| v.as_integer().map(|i| i as f64))
            }),
            compile_cache_entries: preview
                .and_then(|p| p.get("compile_cache_entries"))
                .and_then(|v| v.as_integer())
                .unwrap_or(0) as u64,
            compile_cache_bytes: preview
                .and_then(|p| p.get("compile_cache_bytes"))
                .and_then(|v| v.as_integer())
                .unwrap_or(0) as u64,
            runtime_scripts: preview
                .and_then(|p| p.get("runtime_scripts"))
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|i| i.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig（所有字段为空/默认值）
    pub fn empty() -> Self {
        Self {
            locale: String::new(),
            api_base_url: String::new(),
            site_base_url: String::new(),
            prefetch_enabled: None,
            swipe_threshold_px: None,
            compile_cache_entries: 0,
            compile_cache_bytes: 0,
            runtime_scripts: Vec::new(),
        }
    }
}
