pub mod classifier;
pub mod fallback_service;
pub mod jobs_client;
pub mod normalizer;
pub mod query_builder;
pub mod search_service;
pub mod serpapi_service;
