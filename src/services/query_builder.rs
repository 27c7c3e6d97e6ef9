use crate::dto::search_dto::SearchParams;

pub const FALLBACK_QUERY: &str = "vagas de emprego Brasil";
pub const LOCATION_ONLY_PREFIX: &str = "vagas de emprego";

/// Search terms appended for each modality filter. Unknown modalities pass through.
pub const MODALITY_SYNONYMS: &[(&str, &str)] = &[
    ("Remoto", "remoto trabalho remoto"),
    ("Híbrido", "híbrido"),
    ("Presencial", "presencial"),
];

fn modality_terms(modality: &str) -> &str {
    MODALITY_SYNONYMS
        .iter()
        .find(|(name, _)| *name == modality)
        .map(|(_, terms)| *terms)
        .unwrap_or(modality)
}

/// Builds the provider-facing search string from free text and category filters.
pub fn build_search_query(params: &SearchParams) -> String {
    let query = params.query.trim();
    let location = params.location.trim();

    let mut search = match (query.is_empty(), location.is_empty()) {
        (true, true) => FALLBACK_QUERY.to_string(),
        (true, false) => format!("{} {}", LOCATION_ONLY_PREFIX, location),
        (false, true) => query.to_string(),
        (false, false) => format!("{} {}", query, location),
    };

    if let Some(types) = params.types.as_deref().filter(|t| !t.is_empty()) {
        search.push(' ');
        search.push_str(&types.join(" "));
    }

    if let Some(modalities) = params.modalities.as_deref().filter(|m| !m.is_empty()) {
        let terms: Vec<&str> = modalities.iter().map(|m| modality_terms(m)).collect();
        search.push(' ');
        search.push_str(&terms.join(" "));
    }

    if let Some(levels) = params.levels.as_deref().filter(|l| !l.is_empty()) {
        search.push(' ');
        search.push_str(&levels.join(" "));
    }

    search
}
