mod http;

pub use http::{HttpResourceHint, NoopResourceHint};
