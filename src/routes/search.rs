use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    dto::search_dto::{SearchParams, SearchResponse},
    error::{Error, Result},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/search-jobs",
    request_body = SearchParams,
    responses(
        (status = 200, description = "Normalized job listings", body = SearchResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 500, description = "API key not configured or unexpected failure"),
        (status = 504, description = "Upstream search timed out")
    )
)]
#[axum::debug_handler]
pub async fn search_jobs(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SearchParams>, JsonRejection>,
) -> Result<impl IntoResponse> {
    state.search_service.ensure_configured()?;

    let Json(params) = payload.map_err(|rejection| Error::BadRequest(rejection.body_text()))?;
    info!(?params, "Search params received");

    let response = state.search_service.search(&params).await?;
    Ok(Json(response))
}
