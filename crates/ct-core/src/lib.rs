//! # ct-core
//!
//! Core domain models and business logic for CodeTok.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

// Public module exports
pub mod classify;
pub mod config;
pub mod errors;
pub mod gesture;
pub mod ids;
pub mod load;
pub mod locale;
pub mod ports;
pub mod preview;
pub mod project;
pub mod routes;

// Re-export commonly used types at the crate root
pub use classify::{classify, Classification, FileCategory, MimeType};
pub use config::AppConfig;
pub use errors::FeedError;
pub use gesture::{FeedIntent, SwipeGesture, DEFAULT_SWIPE_THRESHOLD_PX};
pub use ids::ProjectId;
pub use load::{LoadError, LoadEvent, LoadState, LoadStateMachine};
pub use locale::{Locale, Message};
pub use preview::{PreviewArtifact, SandboxPolicy};
pub use project::{FileSelection, Project, ProjectPayload};
pub use routes::ViewRoute;
