/// Browser-history style location management.
///
/// 地址栏/历史记录端口：切换作品时更新地址而不整页刷新。
pub trait HistoryPort: Send + Sync {
    /// Push a new entry and make it current.
    fn push(&self, path: &str);

    /// Path of the current entry, if any.
    fn current(&self) -> Option<String>;
}
