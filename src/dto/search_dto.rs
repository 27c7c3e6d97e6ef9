use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::job::Job;

/// Free text is never rejected; any input yields a usable search string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub location: String,
    pub types: Option<Vec<String>>,
    pub modalities: Option<Vec<String>>,
    pub levels: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub jobs: Vec<Job>,
    #[schema(value_type = Object)]
    pub search_metadata: serde_json::Value,
    pub total_results: usize,
}
