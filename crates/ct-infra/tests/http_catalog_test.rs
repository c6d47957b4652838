use ct_core::ports::{CatalogError, FetchPriority, ProjectCatalogPort};
use ct_core::{Project, ProjectId};
use ct_infra::HttpProjectCatalog;
use mockito::Server;

#[tokio::test]
async fn partial_payload_is_completed_by_a_contents_fetch() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/api/projects/p1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"projectId":"p1","files":["a.html","b.css"],"mainFile":"a.html",
                "fileContents":{"a.html":"<h1>Hi</h1>"}}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let catalog = HttpProjectCatalog::new(&server.url()).unwrap();
    let id = ProjectId::from("p1");

    let project = Project::from_payload(
        catalog
            .fetch_project(&id, FetchPriority::Normal)
            .await
            .unwrap(),
    )
    .unwrap();
    assert!(!project.is_complete());
    first.assert_async().await;
    first.remove_async().await;

    let second = server
        .mock("GET", "/api/projects/p1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"projectId":"p1","files":["a.html","b.css"],"mainFile":"a.html",
                "fileContents":{"a.html":"<h1>Hi</h1>","b.css":"h1{}"}}"#,
        )
        .create_async()
        .await;

    let contents = catalog
        .fetch_file_contents(&id, FetchPriority::Normal)
        .await
        .unwrap();
    let project = project.with_contents(contents);

    second.assert_async().await;
    assert!(project.is_complete());
    assert_eq!(project.content("b.css"), Some("h1{}"));
}

#[tokio::test]
async fn unreachable_catalog_is_a_transport_error() {
    // Port 9 (discard) is not expected to accept HTTP connections.
    let catalog = HttpProjectCatalog::new("http://127.0.0.1:9").unwrap();

    let err = catalog
        .fetch_random(FetchPriority::Normal)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Transport(_)));
}
