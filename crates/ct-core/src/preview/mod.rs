//! Preview domain module.
//!
//! Everything needed to describe what the preview area shows for one file:
//! the sandbox capability set, document synthesis for markup fragments,
//! compiled component output and the resulting artifact.
//! 预览领域：沙箱能力、文档补全、组件编译产物与预览结果。

mod artifact;
mod compiled;
pub mod document;
mod sandbox;

pub use artifact::{PreviewArtifact, SourceView};
pub use compiled::{CompileError, CompiledComponent};
pub use sandbox::{SandboxCapability, SandboxPolicy};
