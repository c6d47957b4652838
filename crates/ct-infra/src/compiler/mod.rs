//! Component source compilers.

mod jsx;

pub use jsx::{JsxMountCompiler, DEFAULT_RUNTIME_SCRIPTS, MAX_SOURCE_BYTES};
