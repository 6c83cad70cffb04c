//! Admin project CRUD and image endpoints.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use folio_database::repositories::ProjectStore;
use folio_entity::project::NewProject;
use helpers::TestApp;

fn new_project(title: &str, sort_order: i32, is_published: bool) -> NewProject {
    NewProject {
        title: title.to_string(),
        description: format!("{title} description"),
        is_published,
        sort_order,
        ..Default::default()
    }
}

fn multipart_upload(path: &str, file_name: &str, content_type: &str, data: &[u8], cookie: &str) -> Request<Body> {
    let boundary = "folio-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// ── Listing ──────────────────────────────────────────────────

#[tokio::test]
async fn test_public_listing_shows_only_published_in_order() {
    let app = TestApp::new();
    app.projects.insert(&new_project("Later", 2, true)).await.unwrap();
    app.projects.insert(&new_project("Draft", 0, false)).await.unwrap();
    app.projects.insert(&new_project("First", 1, true)).await.unwrap();

    let res = app.get("/api/projects", None).await;

    assert_eq!(res.status, StatusCode::OK);
    let titles: Vec<_> = res.body["projects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["First", "Later"]);
}

#[tokio::test]
async fn test_admin_listing_includes_drafts() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);
    app.projects.insert(&new_project("Draft", 0, false)).await.unwrap();
    app.projects.insert(&new_project("Live", 1, true)).await.unwrap();

    let res = app.get("/api/admin/projects", Some(&cookie)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["projects"].as_array().unwrap().len(), 2);
    assert_eq!(res.body["projects"][0]["title"], "Draft");
    assert_eq!(res.body["projects"][0]["is_published"], false);
}

#[tokio::test]
async fn test_admin_projects_page_renders_drafts() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);
    app.projects.insert(&new_project("<Secret>", 0, false)).await.unwrap();

    let res = app.get("/admin/projects", Some(&cookie)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.text.contains("&lt;Secret&gt;"));
    assert!(res.text.contains("(draft)"));
}

// ── Upsert ───────────────────────────────────────────────────

#[tokio::test]
async fn test_create_project() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let res = app
        .request(
            "POST",
            "/api/admin/projects",
            Some(json!({
                "id": null,
                "payload": {
                    "title": "  Folio  ",
                    "description": "Portfolio site",
                    "tags": ["rust", "axum"],
                    "live_url": "https://folio.example.com"
                }
            })),
            Some(&cookie),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{}", res.text);
    assert_eq!(res.body, json!({ "ok": true }));

    let rows = app.projects.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Folio");
    assert_eq!(rows[0].tags, vec!["rust", "axum"]);
    assert!(!rows[0].is_published);
    assert_eq!(rows[0].live_url.as_deref(), Some("https://folio.example.com"));
}

#[tokio::test]
async fn test_create_requires_title_and_description() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let res = app
        .request(
            "POST",
            "/api/admin/projects",
            Some(json!({ "id": null, "payload": { "is_published": true } })),
            Some(&cookie),
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["details"]["title"].is_array());
    assert!(res.body["details"]["description"].is_array());
    assert!(app.projects.rows().is_empty());
}

#[tokio::test]
async fn test_create_rejects_invalid_url_and_unknown_field() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let res = app
        .request(
            "POST",
            "/api/admin/projects",
            Some(json!({
                "id": null,
                "payload": { "title": "T", "description": "D", "repo_url": "not a url" }
            })),
            Some(&cookie),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["details"]["repo_url"].is_array());

    let res = app
        .request(
            "POST",
            "/api/admin/projects",
            Some(json!({
                "id": null,
                "payload": { "title": "T", "description": "D", "owner": "me" }
            })),
            Some(&cookie),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(app.projects.rows().is_empty());
}

#[tokio::test]
async fn test_update_project_fields_and_clear_url() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);
    let mut seed = new_project("Old", 0, false);
    seed.live_url = Some("https://old.example.com".into());
    let project = app.projects.insert(&seed).await.unwrap();

    let res = app
        .request(
            "POST",
            "/api/admin/projects",
            Some(json!({
                "id": project.id.to_string(),
                "payload": { "title": "New", "is_published": true, "live_url": null }
            })),
            Some(&cookie),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{}", res.text);
    let row = &app.projects.rows()[0];
    assert_eq!(row.title, "New");
    assert!(row.is_published);
    assert_eq!(row.live_url, None);
    assert_eq!(row.description, "Old description");
}

#[tokio::test]
async fn test_update_unknown_project_is_not_found() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let res = app
        .request(
            "POST",
            "/api/admin/projects",
            Some(json!({ "id": 404, "payload": { "title": "Ghost" } })),
            Some(&cookie),
        )
        .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_bad_id_and_empty_payload() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);
    let project = app.projects.insert(&new_project("Keep", 0, true)).await.unwrap();

    for id in [json!(0), json!(-3), json!(""), json!("12abc")] {
        let res = app
            .request(
                "POST",
                "/api/admin/projects",
                Some(json!({ "id": id, "payload": { "title": "X" } })),
                Some(&cookie),
            )
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "id {id}");
    }

    let res = app
        .request(
            "POST",
            "/api/admin/projects",
            Some(json!({ "id": project.id, "payload": {} })),
            Some(&cookie),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.projects.rows()[0].title, "Keep");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let req = Request::builder()
        .method("POST")
        .uri("/api/admin/projects")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"id\": null, \"payload\": "))
        .unwrap();
    let res = app.send(req).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body["error"].is_string());
}

// ── Delete ───────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_project_and_its_image() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);
    let upload = app
        .send(multipart_upload("/api/admin/project-image", "cover.png", "image/png", b"png", &cookie))
        .await;
    let image_path = upload.body["path"].as_str().unwrap().to_string();
    let project = app.projects.insert(&new_project("Gone", 0, true)).await.unwrap();

    let res = app
        .request(
            "DELETE",
            &format!("/api/admin/projects?id={}&image_path={image_path}", project.id),
            None,
            Some(&cookie),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "ok": true }));
    assert!(app.projects.rows().is_empty());
    assert!(app.images.get(&image_path).await.is_none());
}

#[tokio::test]
async fn test_delete_requires_id() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let res = app.request("DELETE", "/api/admin/projects", None, Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "missing id");

    let res = app
        .request("DELETE", "/api/admin/projects?id=abc", None, Some(&cookie))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_unknown_project_is_ok() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let res = app
        .request("DELETE", "/api/admin/projects?id=77", None, Some(&cookie))
        .await;

    assert_eq!(res.status, StatusCode::OK);
}

// ── Images ───────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_image_stores_object() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let res = app
        .send(multipart_upload(
            "/api/admin/project-image",
            "Cover.WEBP",
            "image/webp",
            b"\x52\x49\x46\x46",
            &cookie,
        ))
        .await;

    assert_eq!(res.status, StatusCode::OK, "{}", res.text);
    let path = res.body["path"].as_str().unwrap();
    assert!(path.ends_with(".webp"));

    let stored = app.images.get(path).await.unwrap();
    assert_eq!(stored.content_type, "image/webp");
    assert_eq!(&stored.data[..], b"\x52\x49\x46\x46");
}

#[tokio::test]
async fn test_upload_without_file_is_bad_request() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);

    let res = app
        .request("POST", "/api/admin/project-image", Some(json!({})), Some(&cookie))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "missing file");
    assert_eq!(app.images.len().await, 0);
}

#[tokio::test]
async fn test_upload_is_gated() {
    let app = TestApp::new();
    let cookie = app.signed_in(5, false);

    let res = app
        .send(multipart_upload("/api/admin/project-image", "a.png", "image/png", b"x", &cookie))
        .await;

    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(app.images.len().await, 0);
}

#[tokio::test]
async fn test_remove_image() {
    let app = TestApp::new();
    let cookie = app.signed_in(1, true);
    let upload = app
        .send(multipart_upload("/api/admin/project-image", "a.jpg", "image/jpeg", b"jpg", &cookie))
        .await;
    let path = upload.body["path"].as_str().unwrap().to_string();

    let res = app
        .request("DELETE", "/api/admin/project-image", Some(json!({ "path": path })), Some(&cookie))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(app.images.len().await, 0);

    let res = app
        .request("DELETE", "/api/admin/project-image", Some(json!({})), Some(&cookie))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "missing path");
}
