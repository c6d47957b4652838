use anyhow::Result;
use async_trait::async_trait;

/// Warms caches for a view the user is likely to open next.
///
/// 资源预取提示端口（仅为优化，失败可忽略）。
#[async_trait]
pub trait ResourceHintPort: Send + Sync {
    async fn hint(&self, path: &str) -> Result<()>;
}
