use axum::Json;
use utoipa::OpenApi;

use crate::dto::search_dto::{SearchParams, SearchResponse};
use crate::models::job::{Job, JobType, Level, Modality};

#[derive(OpenApi)]
#[openapi(
    paths(crate::routes::search::search_jobs, crate::routes::health::health),
    components(schemas(SearchParams, SearchResponse, Job, JobType, Modality, Level))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
