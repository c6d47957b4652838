//! Load state machine.
//!
//! `Idle → Fetching → {PartiallyReady, Failed} → Ready`
//!
//! Transitions are the only mutation path; the function is pure.

use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;

/// What a fetch is aimed at.
/// 加载目标：指定作品或随机作品。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadTarget {
    Project(ProjectId),
    Random,
}

/// Load failure as seen by callers.
/// 加载失败类型。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LoadError {
    /// The requested project does not exist (HTTP 404 equivalent).
    #[error("project {project_id} not found")]
    NotFound { project_id: ProjectId },

    /// Any other failure; `reason` is diagnostic, not user-facing.
    /// `status` is set when the catalog answered with a non-success code.
    #[error("failed to load project: {reason}")]
    Failure { reason: String, status: Option<u16> },

    /// A newer load started before this one resolved. Never stored as state.
    #[error("load superseded by a newer request")]
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    Idle,
    Fetching { target: LoadTarget },
    /// Metadata is known; file contents may still be arriving.
    PartiallyReady { project_id: ProjectId },
    Ready { project_id: ProjectId },
    Failed { error: LoadError },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadEvent {
    /// A new fetch starts; supersedes whatever came before.
    Start { target: LoadTarget },
    MetadataArrived { project_id: ProjectId },
    /// Full file payload is present.
    ContentArrived { project_id: ProjectId },
    Fail { error: LoadError },
    /// Abandon the in-flight fetch and return to the last settled state.
    Restore { previous: Box<LoadState> },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid load transition: {event:?} in state {state:?}")]
pub struct InvalidTransition {
    pub state: LoadState,
    pub event: LoadEvent,
}

impl LoadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Ready { .. } | LoadState::Failed { .. })
    }

    /// Nothing is known yet about the target: the whole view waits.
    pub fn blocks_view(&self) -> bool {
        matches!(self, LoadState::Fetching { .. })
    }

    /// Metadata is shown; only the content area keeps a loading indicator.
    pub fn content_pending(&self) -> bool {
        matches!(self, LoadState::PartiallyReady { .. })
    }

    pub fn project_id(&self) -> Option<&ProjectId> {
        match self {
            LoadState::PartiallyReady { project_id } | LoadState::Ready { project_id } => {
                Some(project_id)
            }
            LoadState::Fetching {
                target: LoadTarget::Project(id),
            } => Some(id),
            _ => None,
        }
    }

    fn is_restorable(&self) -> bool {
        matches!(
            self,
            LoadState::Idle | LoadState::Ready { .. } | LoadState::Failed { .. }
        )
    }
}

/// Pure load state machine.
///
/// 纯状态机：不包含副作用。
pub struct LoadStateMachine;

impl LoadStateMachine {
    pub fn transition(state: LoadState, event: LoadEvent) -> Result<LoadState, InvalidTransition> {
        match (state, event) {
            (_, LoadEvent::Start { target }) => Ok(LoadState::Fetching { target }),
            (_, LoadEvent::Reset) => Ok(LoadState::Idle),
            (LoadState::Fetching { .. }, LoadEvent::MetadataArrived { project_id }) => {
                Ok(LoadState::PartiallyReady { project_id })
            }
            // Metadata and content may arrive together.
            (LoadState::Fetching { .. }, LoadEvent::ContentArrived { project_id }) => {
                Ok(LoadState::Ready { project_id })
            }
            (
                LoadState::PartiallyReady { project_id },
                LoadEvent::ContentArrived {
                    project_id: arrived,
                },
            ) if project_id == arrived => Ok(LoadState::Ready { project_id }),
            (
                LoadState::Fetching { .. } | LoadState::PartiallyReady { .. },
                LoadEvent::Fail { error },
            ) if error != LoadError::Superseded => Ok(LoadState::Failed { error }),
            (
                LoadState::Fetching { .. } | LoadState::PartiallyReady { .. },
                LoadEvent::Restore { previous },
            ) if previous.is_restorable() =>
            {
                Ok(*previous)
            }
            (state, event) => Err(InvalidTransition { state, event }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ProjectId {
        ProjectId::from(s)
    }

    fn start(s: &str) -> LoadEvent {
        LoadEvent::Start {
            target: LoadTarget::Project(id(s)),
        }
    }

    #[test]
    fn test_progressive_path() {
        let s = LoadStateMachine::transition(LoadState::Idle, start("a")).unwrap();
        assert!(s.blocks_view());

        let s = LoadStateMachine::transition(
            s,
            LoadEvent::MetadataArrived {
                project_id: id("a"),
            },
        )
        .unwrap();
        assert!(s.content_pending());

        let s = LoadStateMachine::transition(
            s,
            LoadEvent::ContentArrived {
                project_id: id("a"),
            },
        )
        .unwrap();
        assert_eq!(
            s,
            LoadState::Ready {
                project_id: id("a")
            }
        );
        assert!(s.is_terminal());
    }

    #[test]
    fn test_content_and_metadata_together() {
        let s = LoadStateMachine::transition(
            LoadState::Fetching {
                target: LoadTarget::Random,
            },
            LoadEvent::ContentArrived {
                project_id: id("r"),
            },
        )
        .unwrap();
        assert_eq!(s.project_id(), Some(&id("r")));
    }

    #[test]
    fn test_start_supersedes_any_state() {
        let ready = LoadState::Ready {
            project_id: id("a"),
        };
        let s = LoadStateMachine::transition(ready, start("b")).unwrap();
        assert_eq!(s.project_id(), Some(&id("b")));
    }

    #[test]
    fn test_failure_from_partial() {
        let s = LoadStateMachine::transition(
            LoadState::PartiallyReady {
                project_id: id("a"),
            },
            LoadEvent::Fail {
                error: LoadError::Failure {
                    reason: "contents missing".into(),
                    status: None,
                },
            },
        )
        .unwrap();
        assert!(matches!(s, LoadState::Failed { .. }));
    }

    #[test]
    fn test_superseded_is_never_stored() {
        let result = LoadStateMachine::transition(
            LoadState::Fetching {
                target: LoadTarget::Random,
            },
            LoadEvent::Fail {
                error: LoadError::Superseded,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_content_for_other_project_rejected() {
        let result = LoadStateMachine::transition(
            LoadState::PartiallyReady {
                project_id: id("a"),
            },
            LoadEvent::ContentArrived {
                project_id: id("b"),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_restore_returns_previous_terminal_state() {
        let previous = LoadState::Ready {
            project_id: id("a"),
        };
        let s = LoadStateMachine::transition(
            LoadState::Fetching {
                target: LoadTarget::Random,
            },
            LoadEvent::Restore {
                previous: Box::new(previous.clone()),
            },
        )
        .unwrap();
        assert_eq!(s, previous);
    }

    #[test]
    fn test_restore_rejects_non_terminal_previous() {
        let result = LoadStateMachine::transition(
            LoadState::Fetching {
                target: LoadTarget::Random,
            },
            LoadEvent::Restore {
                previous: Box::new(LoadState::Fetching {
                    target: LoadTarget::Random,
                }),
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_ready_ignores_late_metadata() {
        let result = LoadStateMachine::transition(
            LoadState::Ready {
                project_id: id("a"),
            },
            LoadEvent::MetadataArrived {
                project_id: id("a"),
            },
        );
        assert!(result.is_err());
    }
}
