use crate::preview::{CompileError, CompiledComponent};

/// Compiles component-source files into a mountable form.
///
/// 组件源码编译端口。
///
/// Synchronous and CPU-bound; callers must run it off the interaction path.
pub trait ComponentCompilerPort: Send + Sync {
    fn compile(&self, filename: &str, source: &str) -> Result<CompiledComponent, CompileError>;
}
