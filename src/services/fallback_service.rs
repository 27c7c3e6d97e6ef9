use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::job::Job;
use crate::utils::text::fold;

const BUILTIN_JOBS: &str = include_str!("../../data/fallback_jobs.json");

/// The `{query, location}` pair a client searches with. Also the results cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobFilters {
    pub query: String,
    pub location: String,
}

impl JobFilters {
    pub fn new(query: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: location.into(),
        }
    }
}

/// Read-only sample listings served when the search backend cannot be reached.
#[derive(Debug, Clone, Default)]
pub struct FallbackDataset {
    jobs: Vec<Job>,
    match_description: bool,
}

impl FallbackDataset {
    pub fn new(jobs: Vec<Job>) -> Self {
        Self {
            jobs,
            match_description: false,
        }
    }

    pub fn builtin() -> Result<Self> {
        Ok(Self::new(serde_json::from_str(BUILTIN_JOBS)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&raw)?))
    }

    /// Also match the query against descriptions, not just title and company.
    pub fn with_description_match(mut self, enabled: bool) -> Self {
        self.match_description = enabled;
        self
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn search(&self, filters: &JobFilters) -> Vec<Job> {
        let by_query = filter_by_query(self.jobs.iter(), &filters.query, self.match_description);
        filter_by_location(by_query, &filters.location)
            .cloned()
            .collect()
    }
}

/// An empty (or blank) query keeps every job.
pub fn filter_by_query<'a>(
    jobs: impl Iterator<Item = &'a Job> + 'a,
    query: &str,
    match_description: bool,
) -> impl Iterator<Item = &'a Job> + 'a {
    let needle = fold(query.trim());
    jobs.filter(move |job| {
        needle.is_empty()
            || fold(&job.title).contains(&needle)
            || fold(&job.company).contains(&needle)
            || (match_description && fold(&job.description).contains(&needle))
    })
}

/// An empty (or blank) location keeps every job.
pub fn filter_by_location<'a>(
    jobs: impl Iterator<Item = &'a Job> + 'a,
    location: &str,
) -> impl Iterator<Item = &'a Job> + 'a {
    let needle = fold(location.trim());
    jobs.filter(move |job| needle.is_empty() || fold(&job.location).contains(&needle))
}
