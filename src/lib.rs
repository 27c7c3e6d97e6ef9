pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::services::{search_service::SearchService, serpapi_service::SerpApiService};

#[derive(Clone)]
pub struct AppState {
    pub search_service: SearchService,
}

impl AppState {
    pub fn new() -> Result<Self> {
        Self::from_config(crate::config::get_config())
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http_client =
            SerpApiService::build_client(Duration::from_secs(config.upstream_timeout_secs))?;

        let serpapi_service = SerpApiService::new(
            http_client,
            config.serpapi_base_url.clone(),
            config.serpapi_key.clone(),
        );
        let search_service = SearchService::new(serpapi_service);

        Ok(Self { search_service })
    }
}
