//! Port interfaces for the application layer
//!
//! Ports define the contract between the feed use cases and infrastructure
//! implementations (HTTP catalog, component compiler, browser-side effects).
//! This follows Hexagonal Architecture principles, allowing the core
//! business logic to remain independent of external dependencies.

pub mod catalog;
mod compiler;
mod feed_ui;
mod history;
mod resource_hint;

pub use catalog::{CatalogError, FetchPriority, ProjectCatalogPort};
pub use compiler::ComponentCompilerPort;
pub use feed_ui::FeedUiPort;
pub use history::HistoryPort;
pub use resource_hint::ResourceHintPort;
