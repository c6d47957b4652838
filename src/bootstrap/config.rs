//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Parse TOML into AppConfig DTO / 将 TOML 解析为 AppConfig DTO
//! - ✅ Resolve defaults for values the file leaves empty / 为缺失值补全默认值
//!
//! Loading accepts whatever is in the file. Defaults and validation happen
//! once, in [`resolve_config`], so the DTO stays a plain record of facts.

use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};

use ct_core::{AppConfig, Locale, DEFAULT_SWIPE_THRESHOLD_PX};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_COMPILE_CACHE_ENTRIES: usize = 64;
pub const DEFAULT_COMPILE_CACHE_BYTES: usize = 8 * 1024 * 1024;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
/// 无法读取文件或内容不是有效 TOML 时返回错误。
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// `<config_dir>/codetok/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("codetok").join("config.toml"))
}

/// Explicit path, else the default path when it exists, else built-in defaults.
/// 显式路径优先；否则使用默认路径（存在时）；否则使用内置默认值。
pub fn load_config_or_default(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => load_config(&path),
        _ => Ok(AppConfig::empty()),
    }
}

/// Settings the feed runs with, every value decided.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub locale: Locale,
    pub api_base_url: String,
    pub site_base_url: String,
    pub prefetch_enabled: bool,
    pub swipe_threshold_px: f64,
    pub compile_cache_entries: usize,
    pub compile_cache_bytes: usize,
    pub runtime_scripts: Vec<String>,
}

/// Fill defaults and reject values the feed cannot run with.
///
/// `locale_override` (from the command line) wins over the file.
pub fn resolve_config(
    config: AppConfig,
    locale_override: Option<Locale>,
) -> anyhow::Result<ResolvedConfig> {
    let locale = match locale_override {
        Some(locale) => locale,
        None if config.locale.trim().is_empty() => Locale::default(),
        None => config
            .locale
            .parse()
            .map_err(|e| anyhow!("[general] locale: {e}"))?,
    };

    let api_base_url = non_empty(&config.api_base_url)
        .unwrap_or(DEFAULT_API_BASE_URL)
        .to_string();
    let site_base_url = non_empty(&config.site_base_url)
        .unwrap_or(&api_base_url)
        .to_string();

    let swipe_threshold_px = config
        .swipe_threshold_px
        .unwrap_or(DEFAULT_SWIPE_THRESHOLD_PX);
    if !swipe_threshold_px.is_finite() || swipe_threshold_px < 0.0 {
        return Err(anyhow!(
            "[feed] swipe_threshold_px must be a non-negative number, got {swipe_threshold_px}"
        ));
    }

    Ok(ResolvedConfig {
        locale,
        api_base_url,
        site_base_url,
        prefetch_enabled: config.prefetch_enabled.unwrap_or(true),
        swipe_threshold_px,
        compile_cache_entries: positive_or(
            config.compile_cache_entries,
            DEFAULT_COMPILE_CACHE_ENTRIES,
        ),
        compile_cache_bytes: positive_or(config.compile_cache_bytes, DEFAULT_COMPILE_CACHE_BYTES),
        runtime_scripts: config.runtime_scripts,
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn positive_or(value: u64, default: usize) -> usize {
    match usize::try_from(value) {
        Ok(0) | Err(_) => default,
        Ok(v) => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    /// Test that valid TOML is parsed correctly
    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let file = write_config(
            r#"
            [general]
            locale = "zh-cn"

            [api]
            base_url = "https://api.codetok.example"

            [feed]
            prefetch_enabled = false
            swipe_threshold_px = 72.5

            [preview]
            compile_cache_entries = 12
            runtime_scripts = ["/vendor/react.js", "/vendor/babel.js"]
        "#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.locale, "zh-cn");
        assert_eq!(config.api_base_url, "https://api.codetok.example");
        assert_eq!(config.prefetch_enabled, Some(false));
        assert_eq!(config.swipe_threshold_px, Some(72.5));
        assert_eq!(config.compile_cache_entries, 12);
        assert_eq!(config.runtime_scripts.len(), 2);
    }

    /// Test that missing values stay empty until resolved
    /// 测试缺失值在解析前保持为空
    #[test]
    fn test_missing_values_resolve_to_defaults() {
        let file = write_config("[general]\n");

        let config = load_config(file.path()).unwrap();
        assert_eq!(config, AppConfig::empty());

        let resolved = resolve_config(config, None).unwrap();
        assert_eq!(resolved.locale, Locale::En);
        assert_eq!(resolved.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(resolved.site_base_url, DEFAULT_API_BASE_URL);
        assert!(resolved.prefetch_enabled);
        assert_eq!(resolved.swipe_threshold_px, DEFAULT_SWIPE_THRESHOLD_PX);
        assert_eq!(resolved.compile_cache_entries, DEFAULT_COMPILE_CACHE_ENTRIES);
        assert_eq!(resolved.compile_cache_bytes, DEFAULT_COMPILE_CACHE_BYTES);
        assert!(resolved.runtime_scripts.is_empty());
    }

    #[test]
    fn test_site_defaults_to_api_base() {
        let mut config = AppConfig::empty();
        config.api_base_url = "https://api.example".into();

        let resolved = resolve_config(config, None).unwrap();

        assert_eq!(resolved.site_base_url, "https://api.example");
    }

    #[test]
    fn test_locale_override_wins() {
        let mut config = AppConfig::empty();
        config.locale = "en".into();

        let resolved = resolve_config(config, Some(Locale::ZhCn)).unwrap();

        assert_eq!(resolved.locale, Locale::ZhCn);
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        let mut config = AppConfig::empty();
        config.locale = "fr".into();

        let err = resolve_config(config, None).unwrap_err();

        assert!(err.to_string().contains("locale"));
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let mut config = AppConfig::empty();
        config.swipe_threshold_px = Some(-1.0);

        assert!(resolve_config(config, None).is_err());
    }

    /// Test that non-existent files return IO error
    /// 测试不存在的文件返回 IO 错误
    #[test]
    fn test_load_config_returns_io_error_on_file_not_found() {
        let result = load_config(Path::new("/this/path/does/not/exist/config.toml"));

        let err = result.unwrap_err();
        assert!(
            err.to_string().to_lowercase().contains("failed to read"),
            "Expected IO error message, got: {err}"
        );
    }

    #[test]
    fn test_explicit_path_must_exist() {
        assert!(load_config_or_default(Some(Path::new("/nope/codetok.toml"))).is_err());
    }
}
