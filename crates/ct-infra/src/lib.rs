pub mod catalog;
pub mod compiler;
pub mod hint;
pub mod history;

pub use catalog::HttpProjectCatalog;
pub use compiler::JsxMountCompiler;
pub use hint::{HttpResourceHint, NoopResourceHint};
pub use history::InMemoryHistory;
