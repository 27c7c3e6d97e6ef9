use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum JobType {
    #[default]
    #[serde(rename = "CLT")]
    Clt,
    #[serde(rename = "PJ")]
    Pj,
    #[serde(rename = "Estágio")]
    Estagio,
    #[serde(rename = "Temporário")]
    Temporario,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum Modality {
    #[serde(rename = "Remoto")]
    Remoto,
    #[serde(rename = "Híbrido")]
    Hibrido,
    #[default]
    #[serde(rename = "Presencial")]
    Presencial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum Level {
    #[serde(rename = "Júnior")]
    Junior,
    #[default]
    #[serde(rename = "Pleno")]
    Pleno,
    #[serde(rename = "Sênior")]
    Senior,
}

/// Canonical job record returned by the search endpoint.
///
/// Every field is populated, even when upstream data is sparse. The
/// classification fields are keyword heuristics and may be wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub company_logo: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub modality: Modality,
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub posted_at: String,
    pub source: String,
    pub application_url: String,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_simplified: bool,
}
