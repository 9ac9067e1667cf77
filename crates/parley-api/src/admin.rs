//! Handlers for the token-gated `/admin` endpoints.
//!
//! One shared secret gates everything; a successful login mints an opaque
//! bearer token whose session expires six hours later (see
//! [`parley_core::session`]).

use axum::{
  Json,
  extract::{Query, State},
  http::header,
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use parley_core::{
  assignment,
  session::SessionGuard,
  store::ReviewStore,
  submission::{ReviewStats, SubmissionFilter, SubmissionRecord},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, auth::AdminToken, error::ApiError};

// ─── Login / logout ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub code: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token:      Uuid,
  pub expires_at: DateTime<Utc>,
}

/// `POST /admin/login` — body: `{"code":"…"}`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut guard = SessionGuard::new();
  if !guard.authenticate(&state.secret, &body.code, Utc::now()) {
    tracing::warn!("admin login rejected");
    return Err(ApiError::Unauthorized);
  }
  let expires_at = match guard.expires_at() {
    Some(t) => t,
    None => return Err(ApiError::Unauthorized),
  };
  let token = Uuid::new_v4();
  state
    .sessions
    .lock()
    .unwrap_or_else(std::sync::PoisonError::into_inner)
    .insert(token, guard);
  tracing::info!(%token, "admin session opened");
  Ok(Json(LoginResponse { token, expires_at }))
}

/// `POST /admin/logout`
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  AdminToken(token): AdminToken,
) -> Json<serde_json::Value>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .sessions
    .lock()
    .unwrap_or_else(std::sync::PoisonError::into_inner)
    .remove(&token);
  tracing::info!(%token, "admin session closed");
  Json(json!({ "logged_out": true }))
}

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /admin/stats`
pub async fn stats<S>(
  State(state): State<AppState<S>>,
  _token: AdminToken,
) -> Result<Json<ReviewStats>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stats = state
    .store
    .stats()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(stats))
}

/// Dropdown options for the submissions view.
#[derive(Debug, Serialize)]
pub struct FilterOptions {
  pub chambers: Vec<String>,
  pub authors:  Vec<String>,
}

/// `GET /admin/filters`
pub async fn filters<S>(
  State(state): State<AppState<S>>,
  _token: AdminToken,
) -> Result<Json<FilterOptions>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = state
    .store
    .distribution()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(FilterOptions {
    chambers: assignment::unique_chambers(&records),
    authors:  assignment::unique_authors(&records),
  }))
}

/// `GET /admin/submissions[?chamber=…][&author=…]`
pub async fn submissions<S>(
  State(state): State<AppState<S>>,
  _token: AdminToken,
  Query(filter): Query<SubmissionFilter>,
) -> Result<Json<Vec<SubmissionRecord>>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = state
    .store
    .submissions(&filter)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(records))
}

/// `GET /admin/export` — the two-sheet XLSX workbook for download.
pub async fn export<S>(
  State(state): State<AppState<S>>,
  _token: AdminToken,
) -> Result<Response, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let bytes = state
    .store
    .export_xlsx()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let filename =
    format!("submissions_{}.xlsx", Utc::now().format("%Y%m%d-%H%M"));
  Ok(
    (
      [
        (
          header::CONTENT_TYPE,
          "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            .to_string(),
        ),
        (
          header::CONTENT_DISPOSITION,
          format!("attachment; filename=\"{filename}\""),
        ),
      ],
      bytes,
    )
      .into_response(),
  )
}

// ─── Writes ──────────────────────────────────────────────────────────────────

/// `PUT /admin/distribution` — multipart with one `file` field replacing
/// the distribution sheet. The new sheet must parse before the old one is
/// touched.
pub async fn replace_distribution<S>(
  State(state): State<AppState<S>>,
  _token: AdminToken,
  mut multipart: axum::extract::Multipart,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let mut bytes: Option<Vec<u8>> = None;
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
  {
    if field.name() == Some("file") {
      let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
      bytes = Some(data.to_vec());
    }
  }
  let bytes = bytes.ok_or_else(|| {
    ApiError::BadRequest("missing \"file\" field".to_string())
  })?;

  let rows = state
    .store
    .replace_distribution(&bytes)
    .await
    .map_err(|e| ApiError::BadRequest(format!("sheet rejected: {e}")))?;
  Ok(Json(json!({ "rows": rows })))
}

/// `DELETE /admin/log` — back up the submission log, then discard it.
pub async fn clear_log<S>(
  State(state): State<AppState<S>>,
  _token: AdminToken,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let backup = state
    .store
    .clear_log()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(json!({
    "cleared": backup.is_some(),
    "backup": backup.map(|p| p.to_string_lossy().into_owned()),
  })))
}
