use tracing::{info, instrument};

use crate::dto::search_dto::{SearchParams, SearchResponse};
use crate::error::Result;
use crate::services::{normalizer, query_builder, serpapi_service::SerpApiService};
use crate::utils::time;

#[derive(Clone)]
pub struct SearchService {
    serpapi: SerpApiService,
}

impl SearchService {
    pub fn new(serpapi: SerpApiService) -> Self {
        Self { serpapi }
    }

    /// Fails fast when the upstream credential is missing.
    pub fn ensure_configured(&self) -> Result<()> {
        self.serpapi.ensure_configured().map(|_| ())
    }

    #[instrument(skip(self, params), fields(query = %params.query, location = %params.location))]
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        let search_query = query_builder::build_search_query(params);
        info!(%search_query, "Constructed search query");

        let location = params.location.trim();
        let location = (!location.is_empty()).then_some(location);
        let upstream = self.serpapi.search(&search_query, location).await?;

        let posted_fallback = time::to_iso_date(time::today());
        let jobs = normalizer::normalize_results(&upstream.jobs_results, &posted_fallback);
        info!(jobs = jobs.len(), "Transformed jobs");

        Ok(SearchResponse {
            total_results: jobs.len(),
            jobs,
            search_metadata: upstream.search_metadata,
        })
    }
}
