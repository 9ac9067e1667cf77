//! Handlers for the reviewer-facing `/review` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/review/reviewers` | Sorted unique reviewer names |
//! | `GET`  | `/review/assignments/:reviewer` | 404 if not assigned |
//! | `GET`  | `/review/assignments/:reviewer/project` | PDF bytes or link |
//! | `POST` | `/review/submissions` | Multipart upload, see [`submit`] |

use axum::{
  Json,
  extract::{Multipart, Path, State},
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use parley_core::{
  assignment::{AssignmentRecord, ProjectRef},
  store::{ReviewStore, UploadedFile},
  submission::{NewSubmission, SubmissionRecord},
};
use serde::Serialize;
use serde_json::json;

use crate::{AppState, error::ApiError};

// ─── Reviewers ───────────────────────────────────────────────────────────────

/// `GET /review/reviewers`
pub async fn list_reviewers<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let reviewers = state
    .store
    .reviewers()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(reviewers))
}

// ─── Assignment ──────────────────────────────────────────────────────────────

/// How the project document can be reached, shaped for the client. Server
/// paths are never exposed; file references carry only the name and whether
/// the file is actually present.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectInfo {
  None,
  Url { url: String },
  File { name: String, available: bool },
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
  #[serde(flatten)]
  pub assignment: AssignmentRecord,
  pub project:    ProjectInfo,
}

fn project_info<S: ReviewStore>(
  state: &AppState<S>,
  assignment: &AssignmentRecord,
) -> ProjectInfo {
  match assignment.project_ref(&state.projects_dir) {
    ProjectRef::None => ProjectInfo::None,
    ProjectRef::Url(url) => ProjectInfo::Url { url },
    ProjectRef::File(path) => ProjectInfo::File {
      name:      path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default(),
      available: path.exists(),
    },
  }
}

/// `GET /review/assignments/:reviewer`
pub async fn get_assignment<S>(
  State(state): State<AppState<S>>,
  Path(reviewer): Path<String>,
) -> Result<Json<AssignmentResponse>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let assignment = state
    .store
    .assignment(&reviewer)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("reviewer {reviewer:?} is not in the distribution"))
    })?;
  let project = project_info(&state, &assignment);
  Ok(Json(AssignmentResponse { assignment, project }))
}

/// `GET /review/assignments/:reviewer/project`
///
/// Streams the local project PDF when the reference is a file; answers with
/// the link as JSON when it is a URL. A configured file that is missing on
/// the server gets its own message so the sheet can be fixed.
pub async fn get_project<S>(
  State(state): State<AppState<S>>,
  Path(reviewer): Path<String>,
) -> Result<Response, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let assignment = state
    .store
    .assignment(&reviewer)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("reviewer {reviewer:?} is not in the distribution"))
    })?;

  match assignment.project_ref(&state.projects_dir) {
    ProjectRef::None => Err(ApiError::NotFound(
      "no project reference configured for this author".to_string(),
    )),
    ProjectRef::Url(url) => Ok(Json(json!({ "url": url })).into_response()),
    ProjectRef::File(path) => {
      let bytes = tokio::fs::read(&path).await.map_err(|_| {
        ApiError::NotFound(
          "project file was not found on the server".to_string(),
        )
      })?;
      let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project.pdf".to_string());
      Ok(
        (
          [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
              header::CONTENT_DISPOSITION,
              format!("attachment; filename=\"{name}\""),
            ),
          ],
          bytes,
        )
          .into_response(),
      )
    }
  }
}

// ─── Submit ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SubmitForm {
  reviewer:     String,
  text:         Option<String>,
  score:        Option<u8>,
  acknowledged: bool,
  files:        Vec<UploadedFile>,
}

async fn read_form(mut multipart: Multipart) -> Result<SubmitForm, ApiError> {
  let mut form = SubmitForm::default();
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
  {
    match field.name().unwrap_or_default() {
      "reviewer" => {
        form.reviewer = field
          .text()
          .await
          .map_err(|e| ApiError::BadRequest(e.to_string()))?;
      }
      "text" => {
        let text = field
          .text()
          .await
          .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        form.text = (!text.trim().is_empty()).then_some(text);
      }
      "score" => {
        let raw = field
          .text()
          .await
          .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if !raw.trim().is_empty() {
          let score = raw.trim().parse::<u8>().map_err(|_| {
            ApiError::BadRequest(format!("score {raw:?} is not a number"))
          })?;
          form.score = Some(score);
        }
      }
      "acknowledged" => {
        let raw = field
          .text()
          .await
          .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        form.acknowledged = matches!(raw.trim(), "true" | "on" | "1");
      }
      "file" => {
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
          .bytes()
          .await
          .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        form.files.push(UploadedFile { name, bytes: bytes.to_vec() });
      }
      // Unknown fields are ignored, matching lenient form handling.
      _ => {}
    }
  }
  Ok(form)
}

/// `POST /review/submissions` — multipart form.
///
/// All validation happens before anything is written: acknowledgement
/// first, then structural checks, then the reviewer lookup, then the
/// extension allow-list for every file in the batch.
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  multipart: Multipart,
) -> Result<(StatusCode, Json<SubmissionRecord>), ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let form = read_form(multipart).await?;

  if !form.acknowledged {
    return Err(ApiError::BadRequest(
      "confirm that you read the instructions before submitting".to_string(),
    ));
  }

  // Structural validation, with the client filenames standing in for the
  // uploads that have not been persisted yet.
  let input = NewSubmission {
    reviewer: form.reviewer.clone(),
    text:     form.text,
    score:    form.score,
    files:    form.files.iter().map(|f| f.name.clone()).collect(),
  };
  input.validate()?;

  if state
    .store
    .assignment(&form.reviewer)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_none()
  {
    return Err(ApiError::NotFound(format!(
      "reviewer {:?} is not in the distribution",
      form.reviewer
    )));
  }

  for file in &form.files {
    if !file.extension_allowed() {
      return Err(ApiError::BadRequest(format!(
        "unsupported file type for {:?} (allowed: pdf, docx, zip)",
        file.name
      )));
    }
  }

  let paths = if form.files.is_empty() {
    Vec::new()
  } else {
    state
      .store
      .save_uploads(&form.reviewer, form.files)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
  };

  let record = state
    .store
    .append_submission(NewSubmission { files: paths, ..input })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(record)))
}
