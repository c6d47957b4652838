//! Feed error taxonomy.
//!
//! Only [`FeedError::NotFound`] and [`FeedError::LoadFailure`] reach the
//! top-level view; every other kind is contained where it is produced.
//! 只有 NotFound 与 LoadFailure 会影响顶层视图，其余错误在产生处消化。

use serde::Serialize;

use crate::ids::ProjectId;
use crate::routes::ViewRoute;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum FeedError {
    /// Terminates the current view and redirects to the not-found view.
    #[error("project {project_id} not found")]
    NotFound { project_id: ProjectId },

    /// Rendered inline with a localized message and an escape link.
    #[error("{message}")]
    LoadFailure { message: String, escape: ViewRoute },

    /// Preview degrades to source-only display.
    #[error("failed to compile {filename}: {reason}")]
    CompileFailure { filename: String, reason: String },

    /// Diagnostic only.
    #[error("prefetch failed: {reason}")]
    PrefetchFailure { reason: String },

    /// Transient notice; navigator state is left untouched.
    #[error("{message}")]
    RandomNavigationFailure { message: String },
}

impl FeedError {
    pub fn reaches_view(&self) -> bool {
        matches!(
            self,
            FeedError::NotFound { .. } | FeedError::LoadFailure { .. }
        )
    }
}
