//! Project domain module.
//!
//! A project is a named bundle of source files with a designated entry file.
//! 作品：包含若干源文件并指定入口文件的集合。

mod model;
mod payload;
mod selection;

pub use model::{Project, ProjectValidationError};
pub use payload::ProjectPayload;
pub use selection::{FileSelection, SelectionError};
