//! Keyword heuristics that infer structured attributes from a job description.
//!
//! Every classifier takes text already passed through
//! [`fold`](crate::utils::text::fold), except
//! [`extract_salary`] which works on the raw description. Rules are checked in
//! table order and the first match wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::job::{JobType, Level, Modality};

pub const JOB_TYPE_RULES: &[(JobType, &[&str])] = &[
    (JobType::Pj, &["pj", "pessoa juridica"]),
    (JobType::Estagio, &["estagio", "estagiario"]),
    (JobType::Temporario, &["temporario"]),
];

pub const MODALITY_RULES: &[(Modality, &[&str])] = &[
    (
        Modality::Remoto,
        &["remoto", "remota", "home office", "trabalho remoto"],
    ),
    (Modality::Hibrido, &["hibrido", "hibrida"]),
];

pub const LEVEL_RULES: &[(Level, &[&str])] = &[
    (Level::Junior, &["junior", "jr"]),
    (Level::Senior, &["senior", "sr"]),
];

pub const URGENCY_KEYWORDS: &[&str] = &["urgente", "imediato"];

pub const SIMPLIFIED_MARKER: &str = "candidatura simplificada";

static SALARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)R\$\s*[\d.,]+(?:\s*[-–a-zA-Z]+\s*R\$\s*[\d.,]+)?")
        .expect("salary pattern is valid")
});

fn first_match<T: Copy>(rules: &[(T, &[&str])], folded: &str) -> Option<T> {
    rules
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k)))
        .map(|(value, _)| *value)
}

pub fn classify_type(folded: &str) -> JobType {
    first_match(JOB_TYPE_RULES, folded).unwrap_or_default()
}

pub fn classify_modality(folded: &str) -> Modality {
    first_match(MODALITY_RULES, folded).unwrap_or_default()
}

pub fn classify_level(folded: &str) -> Level {
    first_match(LEVEL_RULES, folded).unwrap_or_default()
}

pub fn extract_salary(description: &str) -> Option<String> {
    SALARY_RE
        .find(description)
        .map(|m| m.as_str().to_string())
}

pub fn is_urgent(folded: &str) -> bool {
    URGENCY_KEYWORDS.iter().any(|k| folded.contains(k))
}

/// `extensions` are the provider's badge strings; `has_direct_apply` is true
/// when any apply option is flagged as a direct link.
pub fn is_simplified(folded: &str, extensions: &[String], has_direct_apply: bool) -> bool {
    extensions
        .iter()
        .any(|ext| ext.trim().eq_ignore_ascii_case(SIMPLIFIED_MARKER))
        || folded.contains(SIMPLIFIED_MARKER)
        || has_direct_apply
}
