use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::models::job::Job;
use crate::services::classifier;
use crate::services::serpapi_service::SerpApiJob;
use crate::utils::text::fold;

pub const FEATURED_COUNT: usize = 3;

const DEFAULT_TITLE: &str = "Vaga sem título";
const DEFAULT_COMPANY: &str = "Empresa não informada";
const DEFAULT_LOCATION: &str = "Localização não informada";
const DEFAULT_DESCRIPTION: &str = "Descrição não disponível";
const DEFAULT_SOURCE: &str = "Google Jobs";
const PLACEHOLDER_URL: &str = "#";
const REQUIREMENTS_HIGHLIGHT: &str = "Qualificações";
const BENEFITS_HIGHLIGHT: &str = "Benefícios";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Generated avatar built from the first two characters of the company name.
pub fn avatar_url(company_name: Option<&str>) -> String {
    let initials: String = company_name.unwrap_or("E").chars().take(2).collect();
    format!(
        "https://ui-avatars.com/api/?name={}&background=random",
        urlencoding::encode(&initials)
    )
}

/// Stable across identical searches: derived from what the listing is, not where it landed.
pub fn stable_id(title: &str, company: &str, source: &str, location: &str) -> String {
    let mut hasher = Sha256::new();
    for part in [title, company, source, location] {
        hasher.update(part.as_bytes());
        hasher.update([0x1f]);
    }
    let digest = hex::encode(hasher.finalize());
    format!("serpapi-{}", &digest[..16])
}

fn highlight_items(job: &SerpApiJob, title: &str) -> Option<Vec<String>> {
    job.job_highlights
        .iter()
        .find(|h| h.title.as_deref() == Some(title))
        .map(|h| h.items.clone())
}

/// Maps one upstream item to a canonical record. `index` is its batch position.
pub fn normalize_job(job: &SerpApiJob, index: usize, posted_fallback: &str) -> Job {
    let raw_description = job.description.as_deref().unwrap_or_default();
    let folded = fold(raw_description);

    let company_name = non_empty(&job.company_name);
    let title = non_empty(&job.title).unwrap_or(DEFAULT_TITLE).to_string();
    let company = company_name.unwrap_or(DEFAULT_COMPANY).to_string();
    let location = non_empty(&job.location)
        .unwrap_or(DEFAULT_LOCATION)
        .to_string();
    let source = non_empty(&job.via)
        .unwrap_or(DEFAULT_SOURCE)
        .replacen("via ", "", 1);

    let detected = job.detected_extensions.as_ref();
    let requirements = highlight_items(job, REQUIREMENTS_HIGHLIGHT)
        .or_else(|| detected.map(|d| d.qualifications.clone()))
        .unwrap_or_default();
    let benefits = highlight_items(job, BENEFITS_HIGHLIGHT).unwrap_or_default();

    let posted_at = detected
        .and_then(|d| non_empty(&d.posted_at))
        .unwrap_or(posted_fallback)
        .to_string();

    let application_url = job
        .apply_options
        .first()
        .and_then(|opt| non_empty(&opt.link))
        .or_else(|| non_empty(&job.share_link))
        .unwrap_or(PLACEHOLDER_URL)
        .to_string();

    let has_direct_apply = job.apply_options.iter().any(|opt| opt.is_direct);

    Job {
        id: stable_id(&title, &company, &source, &location),
        company_logo: non_empty(&job.thumbnail)
            .map(str::to_string)
            .unwrap_or_else(|| avatar_url(company_name)),
        job_type: classifier::classify_type(&folded),
        modality: classifier::classify_modality(&folded),
        level: classifier::classify_level(&folded),
        salary: classifier::extract_salary(raw_description),
        description: if raw_description.trim().is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            raw_description.to_string()
        },
        requirements,
        benefits,
        posted_at,
        is_urgent: classifier::is_urgent(&folded),
        is_featured: index < FEATURED_COUNT,
        is_simplified: classifier::is_simplified(&folded, &job.extensions, has_direct_apply),
        title,
        company,
        location,
        source,
        application_url,
    }
}

/// Normalizes a whole batch. Ids that collide within the batch get the index appended.
pub fn normalize_results(results: &[SerpApiJob], posted_fallback: &str) -> Vec<Job> {
    let mut seen = HashSet::with_capacity(results.len());
    results
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let mut job = normalize_job(raw, index, posted_fallback);
            if !seen.insert(job.id.clone()) {
                job.id = format!("{}-{}", job.id, index);
                seen.insert(job.id.clone());
            }
            job
        })
        .collect()
}
