//! Handlers for the `/graph` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/graph/records` | All registered relationships |
//! | `POST` | `/graph/records` | Register one relationship |
//! | `GET`  | `/graph/catalog` | Skill vocabularies in effect |
//! | `GET`  | `/graph/view` | Styled render payload, mask in query |
//! | `GET`  | `/graph/communities` | Same, colored by community |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
};
use parley_core::store::ReviewStore;
use parley_graph::{
  RelationMask, StyleGraph, StyleRecord,
  catalog::SkillCatalog,
  community::LabelPropagation,
  render::{RenderGraph, render, render_communities},
};

use crate::{AppState, error::ApiError};

/// `GET /graph/records`
pub async fn records<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<StyleRecord>>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(state.graph.records()?))
}

/// `POST /graph/records`
pub async fn create_record<S>(
  State(state): State<AppState<S>>,
  Json(record): Json<StyleRecord>,
) -> Result<(StatusCode, Json<StyleRecord>), ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let stored = state.graph.add_record(record)?;
  Ok((StatusCode::CREATED, Json(stored)))
}

/// `GET /graph/catalog`
pub async fn catalog<S>(
  State(state): State<AppState<S>>,
) -> Json<SkillCatalog>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Json(state.graph.catalog())
}

fn filtered_graph(
  state_records: Vec<StyleRecord>,
  mask: RelationMask,
) -> StyleGraph {
  StyleGraph::build(&state_records).filtered(mask)
}

/// `GET /graph/view[?style_game=…][&game_skill=…][&style_skill=…]`
///
/// Omitted mask flags default to enabled.
pub async fn view<S>(
  State(state): State<AppState<S>>,
  Query(mask): Query<RelationMask>,
) -> Result<Json<RenderGraph>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let graph = filtered_graph(state.graph.records()?, mask);
  Ok(Json(render(&graph)))
}

/// `GET /graph/communities[?…mask…]`
pub async fn communities<S>(
  State(state): State<AppState<S>>,
  Query(mask): Query<RelationMask>,
) -> Result<Json<RenderGraph>, ApiError>
where
  S: ReviewStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let graph = filtered_graph(state.graph.records()?, mask);
  Ok(Json(render_communities(&graph, &LabelPropagation::default())))
}
