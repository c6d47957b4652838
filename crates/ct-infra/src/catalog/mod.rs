mod http;

pub use http::HttpProjectCatalog;
