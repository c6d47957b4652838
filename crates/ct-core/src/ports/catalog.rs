//! Catalog port - abstracts the project catalog service
//!
//! `GET project(id)` and `GET project(random)`.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::ids::ProjectId;
use crate::project::ProjectPayload;

/// Scheduling hint forwarded to the transport.
/// 请求优先级提示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPriority {
    #[default]
    Normal,
    /// Background work (prefetch); must never compete with foreground loads.
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The project does not exist (HTTP 404).
    #[error("project not found")]
    NotFound,

    /// Any other non-2xx response.
    #[error("unexpected status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Catalog port
///
/// Implementations must be cancel-safe: dropping the returned future aborts
/// the underlying request.
#[async_trait]
pub trait ProjectCatalogPort: Send + Sync {
    /// Fetch one project by id.
    async fn fetch_project(
        &self,
        id: &ProjectId,
        priority: FetchPriority,
    ) -> Result<ProjectPayload, CatalogError>;

    /// Fetch a project chosen arbitrarily by the backend.
    async fn fetch_random(&self, priority: FetchPriority) -> Result<ProjectPayload, CatalogError>;

    /// Fetch file contents that did not arrive with the metadata.
    ///
    /// The catalog only exposes whole projects, so the default re-fetches
    /// the project and returns its content map.
    async fn fetch_file_contents(
        &self,
        id: &ProjectId,
        priority: FetchPriority,
    ) -> Result<BTreeMap<String, String>, CatalogError> {
        self.fetch_project(id, priority)
            .await
            .map(|payload| payload.file_contents)
    }
}

#[cfg(test)]
mockall::mock! {
    pub Catalog {}

    #[async_trait]
    impl ProjectCatalogPort for Catalog {
        async fn fetch_project(
            &self,
            id: &ProjectId,
            priority: FetchPriority,
        ) -> Result<ProjectPayload, CatalogError>;
        async fn fetch_random(&self, priority: FetchPriority) -> Result<ProjectPayload, CatalogError>;
        async fn fetch_file_contents(
            &self,
            id: &ProjectId,
            priority: FetchPriority,
        ) -> Result<BTreeMap<String, String>, CatalogError>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WholeProjectCatalog;

    #[async_trait]
    impl ProjectCatalogPort for WholeProjectCatalog {
        async fn fetch_project(
            &self,
            id: &ProjectId,
            _priority: FetchPriority,
        ) -> Result<ProjectPayload, CatalogError> {
            let mut contents = BTreeMap::new();
            contents.insert("a.html".to_string(), "<p>a</p>".to_string());
            Ok(ProjectPayload {
                project_id: id.clone(),
                title: None,
                description: None,
                files: vec!["a.html".into()],
                main_file: "a.html".into(),
                file_contents: contents,
                has_tsx_files: None,
                views: None,
                created_at: None,
            })
        }

        async fn fetch_random(
            &self,
            _priority: FetchPriority,
        ) -> Result<ProjectPayload, CatalogError> {
            Err(CatalogError::Status(503))
        }
    }

    #[tokio::test]
    async fn test_default_file_contents_refetches_project() {
        let catalog = WholeProjectCatalog;
        let contents = catalog
            .fetch_file_contents(&ProjectId::from("p1"), FetchPriority::Normal)
            .await
            .unwrap();
        assert_eq!(contents.get("a.html").map(String::as_str), Some("<p>a</p>"));
    }

    #[tokio::test]
    async fn test_mock_catalog_reports_not_found() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_fetch_project()
            .returning(|_, _| Err(CatalogError::NotFound));

        let result = catalog
            .fetch_project(&ProjectId::from("missing"), FetchPriority::Normal)
            .await;

        assert_eq!(result, Err(CatalogError::NotFound));
    }
}
