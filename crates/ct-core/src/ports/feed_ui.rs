use anyhow::Result;

/// Side effects the feed core asks of the surrounding UI shell.
///
/// 由外层界面实现的副作用端口。
#[async_trait::async_trait]
pub trait FeedUiPort: Send + Sync {
    /// Leave the current view entirely (e.g. to the not-found view).
    async fn redirect(&self, path: &str) -> Result<()>;

    /// Show a transient, non-blocking notice (alert/toast).
    async fn notify(&self, message: &str) -> Result<()>;
}
