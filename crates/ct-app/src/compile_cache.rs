//! In-memory compile cache with bounded size.
//! 具备容量上限的组件编译结果缓存。

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;

use ct_core::preview::{CompileError, CompiledComponent};
use tokio::sync::{Mutex, OnceCell};

/// Identity of one compilation input: `(filename, content)`.
/// 编译输入（文件名 + 内容）的摘要。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompileKey([u8; 32]);

impl CompileKey {
    pub fn new(filename: &str, source: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(filename.len() as u64).to_le_bytes());
        hasher.update(filename.as_bytes());
        hasher.update(source.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }
}

pub type CompileOutcome = Result<Arc<CompiledComponent>, CompileError>;

/// Bounded cache for compile outcomes, failures included.
/// 编译结果（含失败）的有界缓存。
///
/// `Internal` failures (a crashed worker) are never stored.
pub struct CompileCache {
    inner: Mutex<Inner>,
}

type Flight = Arc<OnceCell<CompileOutcome>>;

struct Inner {
    entries: HashMap<CompileKey, CompileOutcome>,
    in_flight: HashMap<CompileKey, Flight>,
    queue: VecDeque<CompileKey>,
    max_entries: usize,
    max_bytes: usize,
    current_bytes: usize,
}

fn outcome_size(outcome: &CompileOutcome) -> usize {
    match outcome {
        Ok(compiled) => compiled.size_bytes(),
        Err(err) => err.to_string().len(),
    }
}

impl CompileCache {
    /// Create a new cache with entry and byte limits.
    /// 创建带有条目数与字节数上限的缓存。
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
                queue: VecDeque::new(),
                max_entries,
                max_bytes,
                current_bytes: 0,
            }),
        }
    }

    /// Put an outcome into cache, evicting least recently used entries if needed.
    /// 放入缓存，必要时驱逐最久未使用的条目。
    pub async fn put(&self, key: CompileKey, outcome: CompileOutcome) {
        self.inner.lock().await.insert(key, outcome);
    }

    /// Get a cached outcome and mark it as recently used.
    /// 获取缓存结果并标记为最近使用。
    pub async fn get(&self, key: &CompileKey) -> Option<CompileOutcome> {
        let mut inner = self.inner.lock().await;
        let outcome = inner.entries.get(key).cloned()?;
        inner.queue.retain(|k| k != key);
        inner.queue.push_back(*key);
        Some(outcome)
    }

    /// Cached outcome for `key`, or the result of `compile`.
    ///
    /// Concurrent callers for the same key share one compilation.
    /// 相同 key 的并发请求只编译一次。
    pub async fn get_or_compile<F, Fut>(&self, key: CompileKey, compile: F) -> CompileOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CompileOutcome>,
    {
        let flight = {
            let mut inner = self.inner.lock().await;
            if let Some(outcome) = inner.entries.get(&key).cloned() {
                inner.queue.retain(|k| k != &key);
                inner.queue.push_back(key);
                return outcome;
            }
            Arc::clone(inner.in_flight.entry(key).or_default())
        };

        let outcome = flight.get_or_init(compile).await.clone();

        let mut inner = self.inner.lock().await;
        if inner
            .in_flight
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, &flight))
        {
            inner.in_flight.remove(&key);
            inner.insert(key, outcome.clone());
        }
        outcome
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.in_flight.clear();
        inner.queue.clear();
        inner.current_bytes = 0;
    }
}

impl Inner {
    fn insert(&mut self, key: CompileKey, outcome: CompileOutcome) {
        self.remove_entry(&key);
        if matches!(outcome, Err(CompileError::Internal(_))) {
            return;
        }

        let entry_size = outcome_size(&outcome);
        if entry_size > self.max_bytes {
            return;
        }
        self.entries.insert(key, outcome);
        self.queue.push_back(key);
        self.current_bytes = self.current_bytes.saturating_add(entry_size);

        self.evict_if_needed();
    }

    fn remove_entry(&mut self, key: &CompileKey) {
        if let Some(outcome) = self.entries.remove(key) {
            self.current_bytes = self.current_bytes.saturating_sub(outcome_size(&outcome));
            self.queue.retain(|k| k != key);
        }
    }

    fn evict_if_needed(&mut self) {
        while self.entries.len() > self.max_entries || self.current_bytes > self.max_bytes {
            match self.queue.pop_front() {
                Some(evicted) => {
                    if let Some(outcome) = self.entries.remove(&evicted) {
                        self.current_bytes =
                            self.current_bytes.saturating_sub(outcome_size(&outcome));
                    }
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(entry: &str, doc: &str) -> CompileOutcome {
        Ok(Arc::new(CompiledComponent {
            entry: entry.to_string(),
            document: doc.to_string(),
        }))
    }

    #[test]
    fn test_key_depends_on_filename_and_content() {
        assert_eq!(CompileKey::new("a.tsx", "x"), CompileKey::new("a.tsx", "x"));
        assert_ne!(CompileKey::new("a.tsx", "x"), CompileKey::new("b.tsx", "x"));
        assert_ne!(CompileKey::new("a.tsx", "x"), CompileKey::new("a.tsx", "y"));
        assert_ne!(CompileKey::new("ab", "c"), CompileKey::new("a", "bc"));
    }

    #[tokio::test]
    async fn test_cache_put_get() {
        let cache = CompileCache::new(10, 10_000);
        let key = CompileKey::new("App.tsx", "src");

        cache.put(key, compiled("App", "<html></html>")).await;

        let hit = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(hit.entry, "App");
    }

    #[tokio::test]
    async fn test_failures_are_cached_too() {
        let cache = CompileCache::new(10, 10_000);
        let key = CompileKey::new("App.tsx", "");

        cache.put(key, Err(CompileError::EmptySource)).await;

        assert_eq!(cache.get(&key).await, Some(Err(CompileError::EmptySource)));
    }

    #[tokio::test]
    async fn test_eviction_when_full_prefers_least_recent() {
        let cache = CompileCache::new(2, 10_000);
        let a = CompileKey::new("a.tsx", "a");
        let b = CompileKey::new("b.tsx", "b");
        let c = CompileKey::new("c.tsx", "c");

        cache.put(a, compiled("A", "a")).await;
        cache.put(b, compiled("B", "b")).await;
        // touch a so b becomes the eviction candidate
        assert!(cache.get(&a).await.is_some());
        cache.put(c, compiled("C", "c")).await;

        assert!(cache.get(&a).await.is_some());
        assert!(cache.get(&b).await.is_none());
        assert!(cache.get(&c).await.is_some());
    }

    #[tokio::test]
    async fn test_eviction_when_bytes_limit() {
        let cache = CompileCache::new(10, 12);
        let a = CompileKey::new("a.tsx", "a");
        let b = CompileKey::new("b.tsx", "b");

        cache.put(a, compiled("A", "aaaaaaa")).await;
        cache.put(b, compiled("B", "bbbbbbb")).await;

        assert!(cache.get(&a).await.is_none());
        assert!(cache.get(&b).await.is_some());
    }

    #[tokio::test]
    async fn test_oversized_entry_is_not_cached() {
        let cache = CompileCache::new(10, 4);
        let key = CompileKey::new("a.tsx", "a");

        cache.put(key, compiled("A", "far too large")).await;

        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_internal_failures_are_not_cached() {
        let cache = CompileCache::new(10, 10_000);
        let key = CompileKey::new("App.tsx", "src");

        cache
            .put(key, Err(CompileError::Internal("worker panicked".into())))
            .await;

        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_retry_after_internal_failure_compiles_again() {
        let cache = CompileCache::new(10, 10_000);
        let key = CompileKey::new("App.tsx", "src");

        let first = cache
            .get_or_compile(key, || async { Err(CompileError::Internal("join".into())) })
            .await;
        assert!(first.is_err());

        let second = cache
            .get_or_compile(key, || async { compiled("App", "<html></html>") })
            .await;
        assert_eq!(second.unwrap().entry, "App");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_share_one_compilation() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;

        let cache = Arc::new(CompileCache::new(10, 10_000));
        let calls = Arc::new(AtomicUsize::new(0));
        let key = CompileKey::new("App.tsx", "src");

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                let calls = calls.clone();
                tokio::spawn(async move {
                    cache
                        .get_or_compile(key, || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            compiled("App", "<html></html>")
                        })
                        .await
                })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap().entry, "App");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }
}
