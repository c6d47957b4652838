use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Opaque project identity assigned by the catalog service.
/// 作品 ID（由服务端分配的不透明字符串）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl_id!(ProjectId);
