use serde::Serialize;

use crate::ids::ProjectId;
use crate::project::Project;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("file {0} is not part of the current project")]
    UnknownFile(String),

    #[error("content of {0} has not arrived yet")]
    ContentUnavailable(String),

    #[error("selection belongs to project {expected}, not {actual}")]
    ProjectMismatch {
        expected: ProjectId,
        actual: ProjectId,
    },
}

/// Active file cursor within a loaded project.
/// 当前作品内被选中的文件。
///
/// UI-local state: not part of the project entity. It always names a file
/// whose content is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSelection {
    project_id: ProjectId,
    file: String,
}

impl FileSelection {
    /// Cursor positioned on the project's entry file.
    pub fn for_project(project: &Project) -> Self {
        Self {
            project_id: project.id().clone(),
            file: project.main_file().to_string(),
        }
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn select(&mut self, project: &Project, name: &str) -> Result<(), SelectionError> {
        if project.id() != &self.project_id {
            return Err(SelectionError::ProjectMismatch {
                expected: self.project_id.clone(),
                actual: project.id().clone(),
            });
        }
        if !project.contains_file(name) {
            return Err(SelectionError::UnknownFile(name.to_string()));
        }
        if project.content(name).is_none() {
            return Err(SelectionError::ContentUnavailable(name.to_string()));
        }
        self.file = name.to_string();
        Ok(())
    }
}
