//! JSON/HTTP API for Parley.
//!
//! Exposes an axum [`Router`] backed by any
//! [`parley_core::store::ReviewStore`], serving both the peer-review portal
//! and the relationship-graph app. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", parley_api::api_router(state))
//! ```

pub mod admin;
pub mod auth;
pub mod error;
pub mod graph;
pub mod review;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use parley_core::{session::AdminSecret, store::ReviewStore};
use parley_graph::store::GraphStore;

pub use auth::SessionMap;
pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ReviewStore> {
  pub store:        Arc<S>,
  pub graph:        Arc<GraphStore>,
  pub secret:       Arc<AdminSecret>,
  pub sessions:     SessionMap,
  /// Local project documents referenced from the distribution sheet.
  pub projects_dir: PathBuf,
}

impl<S: ReviewStore> AppState<S> {
  pub fn new(
    store: Arc<S>,
    graph: Arc<GraphStore>,
    secret: AdminSecret,
    projects_dir: PathBuf,
  ) -> Self {
    Self {
      store,
      graph,
      secret: Arc::new(secret),
      sessions: Arc::new(Mutex::new(HashMap::new())),
      projects_dir,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ReviewStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Review portal — public
    .route("/review/reviewers", get(review::list_reviewers::<S>))
    .route("/review/assignments/{reviewer}", get(review::get_assignment::<S>))
    .route(
      "/review/assignments/{reviewer}/project",
      get(review::get_project::<S>),
    )
    .route("/review/submissions", post(review::submit::<S>))
    // Review portal — admin, bearer-token gated
    .route("/admin/login", post(admin::login::<S>))
    .route("/admin/logout", post(admin::logout::<S>))
    .route("/admin/stats", get(admin::stats::<S>))
    .route("/admin/filters", get(admin::filters::<S>))
    .route("/admin/submissions", get(admin::submissions::<S>))
    .route("/admin/export", get(admin::export::<S>))
    .route("/admin/distribution", put(admin::replace_distribution::<S>))
    .route("/admin/log", delete(admin::clear_log::<S>))
    // Relationship graph
    .route(
      "/graph/records",
      get(graph::records::<S>).post(graph::create_record::<S>),
    )
    .route("/graph/catalog", get(graph::catalog::<S>))
    .route("/graph/view", get(graph::view::<S>))
    .route("/graph/communities", get(graph::communities::<S>))
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::body::Body;
  use axum::http::{Request, StatusCode, header};
  use parley_store::{FlatFileStore, StorePaths};
  use tempfile::TempDir;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  const SHEET: &str = "\
Reviewer,Chamber,Profile,Assigned Author,Author Chamber,Project PDF
Alice,A,Senior,Bob,B,bob.pdf
Carol,B,Junior,Dave,A,
";

  const ADMIN_CODE: &str = "orchard-vault";

  fn make_state(dir: &TempDir) -> AppState<FlatFileStore> {
    let paths = StorePaths::under(dir.path());
    std::fs::write(&paths.distribution, SHEET).unwrap();
    let projects_dir = paths.projects_dir.clone();
    let store = FlatFileStore::open(paths).unwrap();
    let graph = GraphStore::new(dir.path().join("records.json"), None);
    AppState::new(
      Arc::new(store),
      Arc::new(graph),
      AdminSecret::new(ADMIN_CODE),
      projects_dir,
    )
  }

  async fn send(
    state: AppState<FlatFileStore>,
    request: Request<Body>,
  ) -> axum::response::Response {
    api_router(state).oneshot(request).await.unwrap()
  }

  async fn send_json(
    state: AppState<FlatFileStore>,
    method: &str,
    uri: &str,
    token: Option<Uuid>,
    body: Option<serde_json::Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
      Some(value) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    send(state, request).await
  }

  async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn login(state: AppState<FlatFileStore>) -> Uuid {
    let response = send_json(
      state,
      "POST",
      "/admin/login",
      None,
      Some(serde_json::json!({ "code": ADMIN_CODE })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["token"].as_str().unwrap().parse().unwrap()
  }

  // Multipart helpers ────────────────────────────────────────────────────

  const BOUNDARY: &str = "parley-test-boundary";

  /// (name, optional filename, bytes)
  fn multipart_body(fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, bytes) in fields {
      body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
      match filename {
        Some(filename) => body.extend_from_slice(
          format!(
            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\r\n"
          )
          .as_bytes(),
        ),
        None => body.extend_from_slice(
          format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
            .as_bytes(),
        ),
      }
      body.extend_from_slice(bytes);
      body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
  }

  async fn send_multipart(
    state: AppState<FlatFileStore>,
    method: &str,
    uri: &str,
    token: Option<Uuid>,
    fields: &[(&str, Option<&str>, &[u8])],
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri).header(
      header::CONTENT_TYPE,
      format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(multipart_body(fields))).unwrap();
    send(state, request).await
  }

  // ── Review: reads ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn reviewers_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_json(state, "GET", "/review/reviewers", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!(["Alice", "Carol"]));
  }

  #[tokio::test]
  async fn assignment_includes_project_availability() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response =
      send_json(state, "GET", "/review/assignments/Alice", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["author"], "Bob");
    assert_eq!(json["project"]["kind"], "file");
    assert_eq!(json["project"]["available"], false);
  }

  #[tokio::test]
  async fn unknown_reviewer_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response =
      send_json(state, "GET", "/review/assignments/Nobody", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn project_download_serves_local_pdf_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    std::fs::write(state.projects_dir.join("bob.pdf"), b"%PDF-1.4 fake").unwrap();

    let response = send_json(
      state,
      "GET",
      "/review/assignments/Alice/project",
      None,
      None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
      .headers()
      .get(header::CONTENT_TYPE)
      .unwrap()
      .to_str()
      .unwrap();
    assert_eq!(content_type, "application/pdf");
  }

  #[tokio::test]
  async fn missing_project_file_gets_a_distinct_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_json(
      state,
      "GET",
      "/review/assignments/Alice/project",
      None,
      None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(
      json["error"].as_str().unwrap().contains("not found on the server"),
      "message: {json}"
    );
  }

  // ── Review: submit ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn text_submission_is_created_and_logged() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);

    let response = send_multipart(
      state.clone(),
      "POST",
      "/review/submissions",
      None,
      &[
        ("reviewer", None, b"Alice"),
        ("acknowledged", None, b"true"),
        ("text", None, b"thorough and fair"),
        ("score", None, b"8"),
      ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["chamber"], "A");
    assert_eq!(json["score"], 8);

    let token = login(state.clone()).await;
    let response =
      send_json(state, "GET", "/admin/submissions", Some(token), None).await;
    let rows = body_json(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn file_submission_stores_the_upload() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);

    let response = send_multipart(
      state,
      "POST",
      "/review/submissions",
      None,
      &[
        ("reviewer", None, b"Alice"),
        ("acknowledged", None, b"true"),
        ("file", Some("review.pdf"), b"%PDF-1.4 body"),
      ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let files = json["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    let path = files[0].as_str().unwrap();
    assert!(path.ends_with("__review.pdf"), "path: {path}");
    assert!(std::path::Path::new(path).exists());
  }

  #[tokio::test]
  async fn submission_without_acknowledgement_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_multipart(
      state,
      "POST",
      "/review/submissions",
      None,
      &[("reviewer", None, b"Alice"), ("text", None, b"fine")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn empty_submission_is_rejected_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_multipart(
      state.clone(),
      "POST",
      "/review/submissions",
      None,
      &[("reviewer", None, b"Alice"), ("acknowledged", None, b"true")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was logged.
    let token = login(state.clone()).await;
    let response =
      send_json(state, "GET", "/admin/submissions", Some(token), None).await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn disallowed_file_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_multipart(
      state,
      "POST",
      "/review/submissions",
      None,
      &[
        ("reviewer", None, b"Alice"),
        ("acknowledged", None, b"true"),
        ("file", Some("malware.exe"), b"MZ"),
      ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn unknown_reviewer_submission_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_multipart(
      state,
      "POST",
      "/review/submissions",
      None,
      &[
        ("reviewer", None, b"Nobody"),
        ("acknowledged", None, b"true"),
        ("text", None, b"fine"),
      ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  // ── Admin auth ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admin_endpoints_require_a_token() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_json(state, "GET", "/admin/stats", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn wrong_code_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_json(
      state,
      "POST",
      "/admin/login",
      None,
      Some(serde_json::json!({ "code": "wrong" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn login_then_stats_then_logout() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let token = login(state.clone()).await;

    let response =
      send_json(state.clone(), "GET", "/admin/stats", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["reviewers_assigned"], 2);
    assert_eq!(stats["submissions"], 0);

    let response =
      send_json(state.clone(), "POST", "/admin/logout", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The token is dead after logout.
    let response =
      send_json(state, "GET", "/admin/stats", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  }

  // ── Admin operations ────────────────────────────────────────────────────

  #[tokio::test]
  async fn submissions_filter_via_query_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    for reviewer in ["Alice", "Carol"] {
      let response = send_multipart(
        state.clone(),
        "POST",
        "/review/submissions",
        None,
        &[
          ("reviewer", None, reviewer.as_bytes()),
          ("acknowledged", None, b"true"),
          ("text", None, b"fine"),
        ],
      )
      .await;
      assert_eq!(response.status(), StatusCode::CREATED);
    }

    let token = login(state.clone()).await;
    let response = send_json(
      state,
      "GET",
      "/admin/submissions?chamber=A",
      Some(token),
      None,
    )
    .await;
    let rows = body_json(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["reviewer"], "Alice");
  }

  #[tokio::test]
  async fn filters_list_chambers_and_authors() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let token = login(state.clone()).await;
    let response =
      send_json(state, "GET", "/admin/filters", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["chambers"], serde_json::json!(["A", "B"]));
    assert_eq!(json["authors"], serde_json::json!(["Bob", "Dave"]));
  }

  #[tokio::test]
  async fn export_is_an_xlsx_download() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let token = login(state.clone()).await;
    let response =
      send_json(state, "GET", "/admin/export", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
      .headers()
      .get(header::CONTENT_TYPE)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(content_type.contains("spreadsheetml"), "{content_type}");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    assert_eq!(&bytes[..2], b"PK");
  }

  #[tokio::test]
  async fn replace_distribution_swaps_the_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let token = login(state.clone()).await;

    let response = send_multipart(
      state.clone(),
      "PUT",
      "/admin/distribution",
      Some(token),
      &[("file", Some("dist.csv"), b"Reviewer,Author\nZed,Bob\n")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rows"], 1);

    let response =
      send_json(state, "GET", "/review/reviewers", None, None).await;
    assert_eq!(body_json(response).await, serde_json::json!(["Zed"]));
  }

  #[tokio::test]
  async fn clear_log_reports_the_backup() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_multipart(
      state.clone(),
      "POST",
      "/review/submissions",
      None,
      &[
        ("reviewer", None, b"Alice"),
        ("acknowledged", None, b"true"),
        ("text", None, b"fine"),
      ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let token = login(state.clone()).await;
    let response =
      send_json(state.clone(), "DELETE", "/admin/log", Some(token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["cleared"], true);
    let backup = json["backup"].as_str().unwrap();
    assert!(std::path::Path::new(backup).exists());

    let response =
      send_json(state, "GET", "/admin/submissions", Some(token), None).await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());
  }

  // ── Graph app ───────────────────────────────────────────────────────────

  async fn register_judo_tag(state: AppState<FlatFileStore>) {
    let response = send_json(
      state,
      "POST",
      "/graph/records",
      None,
      Some(serde_json::json!({
        "style": "Judo",
        "game": "Tag",
        "offensive": ["throw"],
      })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
  }

  #[tokio::test]
  async fn graph_view_renders_the_registered_triangle() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    register_judo_tag(state.clone()).await;

    let response = send_json(state, "GET", "/graph/view", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(json["edges"].as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn mask_parameters_prune_the_view() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    register_judo_tag(state.clone()).await;

    let response = send_json(
      state.clone(),
      "GET",
      "/graph/view?game_skill=false&style_skill=false",
      None,
      None,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(json["edges"].as_array().unwrap().len(), 1);

    let response = send_json(
      state,
      "GET",
      "/graph/view?style_game=false&game_skill=false&style_skill=false",
      None,
      None,
    )
    .await;
    let json = body_json(response).await;
    assert!(json["nodes"].as_array().unwrap().is_empty());
    assert!(json["edges"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn communities_view_assigns_ids() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    register_judo_tag(state.clone()).await;

    let response =
      send_json(state, "GET", "/graph/communities", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    for node in json["nodes"].as_array().unwrap() {
      assert!(node["community"].is_number(), "node: {node}");
    }
  }

  #[tokio::test]
  async fn invalid_graph_record_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_json(
      state.clone(),
      "POST",
      "/graph/records",
      None,
      Some(serde_json::json!({ "style": "  ", "game": "Tag" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send_json(state, "GET", "/graph/records", None, None).await;
    assert!(body_json(response).await.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn catalog_serves_the_builtin_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(&dir);
    let response = send_json(state, "GET", "/graph/catalog", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    for group in ["offensive", "defensive", "tactical"] {
      assert!(
        !json[group].as_array().unwrap().is_empty(),
        "group {group} is empty"
      );
    }
  }
}
