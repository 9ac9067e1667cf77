//! Bearer-token admin session extractor.
//!
//! `POST /admin/login` (in [`crate::admin`]) mints an opaque UUID token and
//! maps it to a [`SessionGuard`]. Admin handlers take [`AdminToken`] as an
//! argument; its presence means the request carried a token whose guard is
//! still active. Expired entries are removed lazily, on the check that
//! observes them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use parley_core::{session::SessionGuard, store::ReviewStore};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Token → session guard map shared across handlers. One entry per
/// logged-in browser session; nothing is shared between users beyond the
/// map itself.
pub type SessionMap = Arc<Mutex<HashMap<Uuid, SessionGuard>>>;

/// Present in a handler's arguments iff the request was authenticated.
pub struct AdminToken(pub Uuid);

/// Pull the UUID out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<Uuid> {
  parts
    .headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .and_then(|v| Uuid::parse_str(v.trim()).ok())
}

/// Check `token` against the session map, expiring lazily.
pub fn check_session(sessions: &SessionMap, token: Uuid) -> bool {
  let mut sessions = sessions
    .lock()
    .unwrap_or_else(std::sync::PoisonError::into_inner);
  match sessions.get_mut(&token) {
    Some(guard) => {
      if guard.is_active(Utc::now()) {
        true
      } else {
        // The guard cleared itself lazily; drop the dead entry too.
        sessions.remove(&token);
        false
      }
    }
    None => false,
  }
}

impl<S> FromRequestParts<AppState<S>> for AdminToken
where
  S: ReviewStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;
    if check_session(&state.sessions, token) {
      Ok(AdminToken(token))
    } else {
      Err(ApiError::Unauthorized)
    }
  }
}
