use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;

/// Wire shape of a project returned by the catalog service.
/// 服务端返回的作品数据结构（未经校验）。
///
/// Every field except identity and entry file is optional on the wire so that
/// a partially populated response can still be decoded; invariants are enforced
/// by [`crate::project::Project::from_payload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub project_id: ProjectId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub files: Vec<String>,
    pub main_file: String,
    #[serde(default)]
    pub file_contents: BTreeMap<String, String>,
    #[serde(default)]
    pub has_tsx_files: Option<bool>,
    #[serde(default)]
    pub views: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
