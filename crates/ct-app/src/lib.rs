//! CodeTok Application Orchestration Layer
//!
//! This crate contains the feed use cases: progressive loading, prefetching,
//! preview compilation and navigation. It depends only on `ct-core` ports.

pub mod compile_cache;
pub mod loader;
pub mod navigator;
pub mod prefetch;
pub mod preview_compiler;

pub use compile_cache::{CompileCache, CompileKey};
pub use loader::{LoaderSnapshot, ProgressiveProjectLoader};
pub use navigator::{FeedNavigator, FeedNavigatorDeps, FeedView, NavigationOutcome};
pub use prefetch::PrefetchCache;
pub use preview_compiler::PreviewCompiler;
