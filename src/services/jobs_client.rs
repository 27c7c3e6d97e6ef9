//! Client side of the search flow: talks to the proxy endpoint, retries once,
//! caches recent results and optionally degrades to the fallback dataset.
//! Identical searches issued while one is in flight share its outcome.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use crate::config::ClientConfig;
use crate::models::job::Job;
use crate::services::fallback_service::{FallbackDataset, JobFilters};

pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);
pub const MAX_ATTEMPTS: usize = 2;
const MISSING_CREDENTIAL_ERROR: &str = "API key not configured";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search endpoint returned {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// User-facing failure categories, each with its own guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    CredentialMissing,
    BackendUnreachable,
    Generic,
}

impl SearchFailure {
    pub fn classify(err: &ClientError) -> Self {
        match err {
            ClientError::Status { message, .. } if message.contains(MISSING_CREDENTIAL_ERROR) => {
                SearchFailure::CredentialMissing
            }
            ClientError::Transport(e) if e.is_connect() || e.is_timeout() => {
                SearchFailure::BackendUnreachable
            }
            _ => SearchFailure::Generic,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            SearchFailure::CredentialMissing => {
                "A chave da API de busca não está configurada no servidor. Configure SERPAPI_KEY e tente novamente."
            }
            SearchFailure::BackendUnreachable => {
                "O servidor de busca está iniciando ou indisponível. Aguarde 30 segundos e tente novamente."
            }
            SearchFailure::Generic => "Ocorreu um erro ao buscar as vagas. Tente novamente.",
        }
    }

    /// Every failure can be retried manually by the user.
    pub fn can_retry(&self) -> bool {
        true
    }
}

impl std::fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}

impl std::error::Error for SearchFailure {}

/// Per-request lifecycle: `Idle -> Loading -> (Success | Error)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success { count: usize, from_fallback: bool },
    Error(SearchFailure),
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }
}

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    #[serde(default)]
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
struct ProxyError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedResult {
    fetched_at: Instant,
    jobs: Vec<Job>,
}

#[derive(Debug, Clone)]
struct SearchOutcome {
    jobs: Vec<Job>,
    from_fallback: bool,
}

type InFlight = Arc<OnceCell<Result<SearchOutcome, SearchFailure>>>;

#[derive(Clone)]
pub struct JobsClient {
    client: Client,
    api_url: String,
    fallback: Option<FallbackDataset>,
    stale_after: Duration,
    cache: Arc<Mutex<HashMap<JobFilters, CachedResult>>>,
    inflight: Arc<Mutex<HashMap<JobFilters, InFlight>>>,
    state: Arc<Mutex<SearchState>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl JobsClient {
    pub fn new(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            fallback: None,
            stale_after: DEFAULT_STALE_AFTER,
            cache: Arc::new(Mutex::new(HashMap::new())),
            inflight: Arc::new(Mutex::new(HashMap::new())),
            state: Arc::new(Mutex::new(SearchState::Idle)),
        }
    }

    pub fn from_config(config: &ClientConfig) -> crate::error::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let mut jobs_client = Self::new(client, config.api_url.clone());
        if config.fallback_enabled {
            let dataset = match &config.fallback_path {
                Some(path) => FallbackDataset::from_path(path)?,
                None => FallbackDataset::builtin()?,
            };
            jobs_client = jobs_client
                .with_fallback(dataset.with_description_match(config.fallback_match_description));
        }
        Ok(jobs_client)
    }

    /// Enables degrading to `dataset` once the proxy fails twice.
    pub fn with_fallback(mut self, dataset: FallbackDataset) -> Self {
        self.fallback = Some(dataset);
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn state(&self) -> SearchState {
        lock(&self.state).clone()
    }

    fn set_state(&self, state: SearchState) {
        *lock(&self.state) = state;
    }

    fn cached(&self, filters: &JobFilters) -> Option<Vec<Job>> {
        let cache = lock(&self.cache);
        cache
            .get(filters)
            .filter(|entry| entry.fetched_at.elapsed() < self.stale_after)
            .map(|entry| entry.jobs.clone())
    }

    fn store(&self, filters: &JobFilters, jobs: &[Job]) {
        lock(&self.cache).insert(
            filters.clone(),
            CachedResult {
                fetched_at: Instant::now(),
                jobs: jobs.to_vec(),
            },
        );
    }

    pub fn invalidate(&self) {
        lock(&self.cache).clear();
    }

    async fn fetch(&self, filters: &JobFilters) -> Result<Vec<Job>, ClientError> {
        let response = self
            .client
            .post(&self.api_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&serde_json::json!({
                "query": filters.query,
                "location": filters.location,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProxyError>(&body)
                .ok()
                .and_then(|e| e.detail.or(e.error))
                .unwrap_or(body);
            return Err(ClientError::Status { status, message });
        }

        let parsed: ProxyResponse = response.json().await?;
        Ok(parsed.jobs)
    }

    /// Runs one search. Fresh cached results skip the network entirely, and a
    /// search identical to one already in flight waits for that one instead of
    /// sending its own request.
    #[instrument(skip(self), fields(api_url = %self.api_url))]
    pub async fn search(&self, filters: &JobFilters) -> Result<Vec<Job>, SearchFailure> {
        self.set_state(SearchState::Loading);

        if let Some(jobs) = self.cached(filters) {
            info!(jobs = jobs.len(), "Serving search from cache");
            self.set_state(SearchState::Success {
                count: jobs.len(),
                from_fallback: false,
            });
            return Ok(jobs);
        }

        let cell = lock(&self.inflight)
            .entry(filters.clone())
            .or_default()
            .clone();
        let outcome = cell
            .get_or_init(|| self.fetch_with_retry(filters))
            .await
            .clone();

        {
            let mut inflight = lock(&self.inflight);
            if inflight
                .get(filters)
                .is_some_and(|current| Arc::ptr_eq(current, &cell))
            {
                inflight.remove(filters);
            }
        }

        match outcome {
            Ok(SearchOutcome {
                jobs,
                from_fallback,
            }) => {
                self.set_state(SearchState::Success {
                    count: jobs.len(),
                    from_fallback,
                });
                Ok(jobs)
            }
            Err(failure) => {
                self.set_state(SearchState::Error(failure));
                Err(failure)
            }
        }
    }

    async fn fetch_with_retry(&self, filters: &JobFilters) -> Result<SearchOutcome, SearchFailure> {
        let mut last_error = None;
        for attempt in 1..=MAX_ATTEMPTS {
            match self.fetch(filters).await {
                Ok(jobs) => {
                    info!(attempt, jobs = jobs.len(), "Jobs received");
                    self.store(filters, &jobs);
                    return Ok(SearchOutcome {
                        jobs,
                        from_fallback: false,
                    });
                }
                Err(err) => {
                    warn!(attempt, error = %err, "Search request failed");
                    last_error = Some(err);
                }
            }
        }

        if let Some(dataset) = &self.fallback {
            let jobs = dataset.search(filters);
            warn!(jobs = jobs.len(), "Backend unavailable, serving fallback dataset");
            return Ok(SearchOutcome {
                jobs,
                from_fallback: true,
            });
        }

        Err(last_error
            .as_ref()
            .map(SearchFailure::classify)
            .unwrap_or(SearchFailure::Generic))
    }
}
