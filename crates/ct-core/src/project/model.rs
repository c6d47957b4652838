use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::{classify, FileCategory};
use crate::ids::ProjectId;
use crate::project::ProjectPayload;

/// Reasons a catalog payload cannot become a [`Project`].
/// 作品数据不满足不变量的原因。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectValidationError {
    #[error("project {0} has no files")]
    EmptyFileList(ProjectId),

    #[error("project {project_id} lists file {file} more than once")]
    DuplicateFile { project_id: ProjectId, file: String },

    #[error("main file {main_file} is not listed in project {project_id}")]
    MainFileNotListed {
        project_id: ProjectId,
        main_file: String,
    },
}

/// Immutable, validated project.
/// 经过校验的不可变作品。
///
/// Invariants:
/// - `files` is non-empty and free of duplicates
/// - `main_file` is a member of `files`
/// - `file_contents` only holds entries for names in `files`
///
/// Content completeness (an entry for every file) is tracked by
/// [`Project::is_complete`]; a loader only reports `Ready` once it holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    id: ProjectId,
    title: Option<String>,
    description: Option<String>,
    files: Vec<String>,
    main_file: String,
    file_contents: BTreeMap<String, String>,
    has_component_source: bool,
    views: Option<u64>,
    created_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn from_payload(payload: ProjectPayload) -> Result<Self, ProjectValidationError> {
        let ProjectPayload {
            project_id,
            title,
            description,
            files,
            main_file,
            file_contents,
            has_tsx_files,
            views,
            created_at,
        } = payload;

        if files.is_empty() {
            return Err(ProjectValidationError::EmptyFileList(project_id));
        }

        let mut seen = HashSet::with_capacity(files.len());
        for file in &files {
            if !seen.insert(file.as_str()) {
                return Err(ProjectValidationError::DuplicateFile {
                    project_id,
                    file: file.clone(),
                });
            }
        }

        if !seen.contains(main_file.as_str()) {
            return Err(ProjectValidationError::MainFileNotListed {
                project_id,
                main_file,
            });
        }

        // Stray content entries are dropped so lookups stay keyed by `files`.
        let file_contents = file_contents
            .into_iter()
            .filter(|(name, _)| seen.contains(name.as_str()))
            .collect();

        let has_component_source = has_tsx_files.unwrap_or(false)
            || files
                .iter()
                .any(|f| classify(f).category == FileCategory::ComponentSource);

        Ok(Self {
            id: project_id,
            title,
            description,
            files,
            main_file,
            file_contents,
            has_component_source,
            views,
            created_at,
        })
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn main_file(&self) -> &str {
        &self.main_file
    }

    pub fn has_component_source(&self) -> bool {
        self.has_component_source
    }

    pub fn views(&self) -> Option<u64> {
        self.views
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn contains_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    pub fn content(&self, name: &str) -> Option<&str> {
        self.file_contents.get(name).map(String::as_str)
    }

    pub fn main_content(&self) -> Option<&str> {
        self.content(&self.main_file)
    }

    /// Whether every listed file has its content present.
    /// 是否所有文件内容均已到达。
    pub fn is_complete(&self) -> bool {
        self.files.iter().all(|f| self.file_contents.contains_key(f))
    }

    pub fn missing_files(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| !self.file_contents.contains_key(*f))
            .cloned()
            .collect()
    }

    /// The file list is only worth offering when there is a choice to make.
    pub fn offers_file_picker(&self) -> bool {
        self.files.len() > 1
    }

    /// Return a copy with additional file contents merged in.
    /// 合并后续到达的文件内容，返回新的作品。
    ///
    /// Entries for unknown names are ignored; existing entries are not overwritten.
    pub fn with_contents(&self, contents: BTreeMap<String, String>) -> Self {
        let mut merged = self.clone();
        for (name, content) in contents {
            if merged.contains_file(&name) {
                merged.file_contents.entry(name).or_insert(content);
            }
        }
        merged
    }
}
