use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, instrument, warn};

use crate::error::{Error, Result};

/// SerpApi sometimes sends a list of strings and sometimes a single string.
fn deserialize_string_list_flexible<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrString {
        List(Vec<String>),
        String(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<ListOrString>::deserialize(deserializer)? {
        Some(ListOrString::List(items)) => items,
        Some(ListOrString::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

/// Explicit `null` is treated like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One unparseable result must not sink the batch; it degrades to an empty item.
fn deserialize_jobs_lenient<'de, D>(deserializer: D) -> std::result::Result<Vec<SerpApiJob>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).unwrap_or_else(|e| {
                warn!(index, error = %e, "Unparseable job result; using defaults");
                SerpApiJob::default()
            })
        })
        .collect())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobHighlight {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list_flexible")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyOption {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_direct: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectedExtensions {
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub schedule_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list_flexible")]
    pub qualifications: Vec<String>,
}

/// One entry of `jobs_results` as returned by the Google Jobs engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerpApiJob {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub via: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "deserialize_string_list_flexible")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub detected_extensions: Option<DetectedExtensions>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_highlights: Vec<JobHighlight>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub apply_options: Vec<ApplyOption>,
    #[serde(default)]
    pub share_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerpApiResponse {
    #[serde(default)]
    pub search_metadata: serde_json::Value,
    #[serde(default, deserialize_with = "deserialize_jobs_lenient")]
    pub jobs_results: Vec<SerpApiJob>,
}

#[derive(Clone)]
pub struct SerpApiService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl SerpApiService {
    pub const ENGINE: &'static str = "google_jobs";
    pub const LANGUAGE: &'static str = "pt-br";
    pub const COUNTRY: &'static str = "br";

    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("SERPAPI_KEY not configured; searches will fail until it is set");
        }
        Self {
            client,
            base_url,
            api_key,
        }
    }

    pub fn build_client(timeout: Duration) -> Result<Client> {
        Ok(Client::builder().timeout(timeout).build()?)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn ensure_configured(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            error!("SERPAPI_KEY not configured");
            Error::MissingCredential
        })
    }

    #[instrument(skip(self), fields(engine = "google_jobs"))]
    pub async fn search(&self, query: &str, location: Option<&str>) -> Result<SerpApiResponse> {
        let api_key = self.ensure_configured()?;

        let mut params: Vec<(&str, &str)> = vec![
            ("engine", Self::ENGINE),
            ("q", query),
            ("hl", Self::LANGUAGE),
            ("gl", Self::COUNTRY),
        ];
        if let Some(location) = location.filter(|l| !l.is_empty()) {
            params.push(("location", location));
        }

        let redacted = url::Url::parse_with_params(&self.base_url, &params)
            .map(|u| format!("{}&api_key=[REDACTED]", u))
            .unwrap_or_else(|_| self.base_url.clone());
        info!(url = %redacted, "Calling SerpApi");

        params.push(("api_key", api_key));
        let response = self.client.get(&self.base_url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %details, "SerpApi error");
            return Err(Error::Upstream {
                status: status.as_u16(),
                details,
            });
        }

        let body = response.text().await?;
        let parsed: SerpApiResponse = serde_json::from_str(&body)?;
        info!(
            jobs_count = parsed.jobs_results.len(),
            "SerpApi response received"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sparse_and_rich_results() {
        let raw = json!({
            "search_metadata": { "id": "abc", "status": "Success" },
            "jobs_results": [
                {},
                {
                    "title": "Dev Rust",
                    "company_name": "Ferrugem SA",
                    "extensions": ["há 2 dias", "Candidatura simplificada"],
                    "detected_extensions": { "posted_at": "há 2 dias", "qualifications": "Sem diploma" },
                    "job_highlights": [{ "title": "Qualificações", "items": ["Rust", "Tokio"] }],
                    "apply_options": [{ "title": "Gupy", "link": "https://gupy.io/x", "is_direct": true }]
                }
            ]
        });

        let parsed: SerpApiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.jobs_results.len(), 2);
        assert!(parsed.jobs_results[0].title.is_none());

        let rich = &parsed.jobs_results[1];
        assert_eq!(rich.extensions.len(), 2);
        let detected = rich.detected_extensions.as_ref().unwrap();
        assert_eq!(detected.qualifications, vec!["Sem diploma".to_string()]);
        assert!(rich.apply_options[0].is_direct);
    }

    #[test]
    fn null_fields_do_not_sink_the_batch() {
        let raw = json!({
            "jobs_results": [
                { "title": "Boa vaga", "description": "remoto" },
                {
                    "title": null,
                    "job_highlights": null,
                    "apply_options": [{ "link": "https://x", "is_direct": null }]
                },
                { "job_highlights": [{ "title": "Benefícios", "items": null }] },
                { "title": 42 }
            ]
        });

        let parsed: SerpApiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.jobs_results.len(), 4);
        assert_eq!(parsed.jobs_results[0].title.as_deref(), Some("Boa vaga"));

        let nulls = &parsed.jobs_results[1];
        assert!(nulls.job_highlights.is_empty());
        assert_eq!(nulls.apply_options[0].link.as_deref(), Some("https://x"));
        assert!(!nulls.apply_options[0].is_direct);

        assert!(parsed.jobs_results[2].job_highlights[0].items.is_empty());
        assert!(parsed.jobs_results[3].title.is_none());
    }

    #[test]
    fn null_results_list_is_empty() {
        let parsed: SerpApiResponse = serde_json::from_str(r#"{"jobs_results":null}"#).unwrap();
        assert!(parsed.jobs_results.is_empty());
    }

    #[test]
    fn missing_results_default_to_empty() {
        let parsed: SerpApiResponse = serde_json::from_str(r#"{"search_metadata":{}}"#).unwrap();
        assert!(parsed.jobs_results.is_empty());
    }

    #[test]
    fn unconfigured_service_reports_missing_credential() {
        let service = SerpApiService::new(Client::new(), "http://localhost".into(), Some("  ".into()));
        assert!(!service.is_configured());
        assert!(matches!(service.ensure_configured(), Err(Error::MissingCredential)));
    }
}
