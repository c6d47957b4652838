//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create infra implementations (HTTP catalog, hints, compiler) / 创建 infra 层具体实现
//! - ✅ Inject them into the feed use cases / 将依赖注入到信息流用例
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//! ❌ **No configuration validation / 禁止做配置验证** (done in `config.rs`)
//!
//! > **This is the only place allowed to depend on ct-infra and ct-app simultaneously.**
//! > **这是唯一允许同时依赖 ct-infra 与 ct-app 的地方。**

use std::sync::Arc;

use ct_app::{
    CompileCache, FeedNavigator, FeedNavigatorDeps, PrefetchCache, PreviewCompiler,
    ProgressiveProjectLoader,
};
use ct_core::ports::{
    ComponentCompilerPort, FeedUiPort, HistoryPort, ProjectCatalogPort, ResourceHintPort,
};
use ct_infra::{HttpProjectCatalog, HttpResourceHint, JsxMountCompiler};

use super::config::ResolvedConfig;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Catalog client initialization failed: {0}")]
    CatalogInit(String),

    #[error("Resource hint client initialization failed: {0}")]
    HintInit(String),
}

/// Collaborators supplied by the shell hosting the feed.
/// 由外壳提供的协作者。
pub struct ShellPorts {
    pub ui: Arc<dyn FeedUiPort>,
    pub history: Arc<dyn HistoryPort>,
}

/// Assemble a ready-to-use [`FeedNavigator`].
///
/// 1. Create infrastructure adapters
/// 2. Create the prefetch cache when enabled
/// 3. Create loader and preview compiler
/// 4. Construct the navigator
pub fn wire_feed(config: &ResolvedConfig, shell: ShellPorts) -> WiringResult<Arc<FeedNavigator>> {
    // Step 1: Infrastructure adapters
    // 步骤 1：创建基础设施适配器
    let catalog: Arc<dyn ProjectCatalogPort> = Arc::new(
        HttpProjectCatalog::new(&config.api_base_url)
            .map_err(|e| WiringError::CatalogInit(format!("{e:#}")))?,
    );
    let compiler: Arc<dyn ComponentCompilerPort> =
        Arc::new(JsxMountCompiler::new(config.runtime_scripts.clone()));

    // Step 2: Prefetch cache (optional)
    // 步骤 2：预取缓存（可选）
    let prefetch = if config.prefetch_enabled {
        let hints: Arc<dyn ResourceHintPort> = Arc::new(
            HttpResourceHint::new(&config.site_base_url)
                .map_err(|e| WiringError::HintInit(format!("{e:#}")))?,
        );
        Some(Arc::new(PrefetchCache::new(
            Arc::clone(&catalog),
            Some(hints),
            config.locale,
        )))
    } else {
        None
    };

    // Step 3: Loader and preview compiler
    // 步骤 3：加载器与预览编译器
    let loader = Arc::new(ProgressiveProjectLoader::new(catalog, prefetch.clone()));
    let preview = Arc::new(PreviewCompiler::new(
        compiler,
        Arc::new(CompileCache::new(
            config.compile_cache_entries,
            config.compile_cache_bytes,
        )),
        config.locale,
    ));

    // Step 4: Navigator
    // 步骤 4：导航器
    Ok(Arc::new(FeedNavigator::new(FeedNavigatorDeps {
        loader,
        prefetch,
        preview,
        history: shell.history,
        ui: shell.ui,
        locale: config.locale,
        swipe_threshold: config.swipe_threshold_px,
    })))
}
