use unicode_normalization::UnicodeNormalization;

/// Lower-cases `input` and strips combining diacritical marks (U+0300..=U+036F)
/// after NFD decomposition, so "São Paulo" and "sao paulo" compare equal.
pub fn fold(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Substring containment over folded text. An empty needle always matches.
pub fn folded_contains(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(fold("São Paulo"), "sao paulo");
        assert_eq!(fold("HÍBRIDO"), "hibrido");
        assert_eq!(fold("Estágio / Estagiário"), "estagio / estagiario");
    }

    #[test]
    fn fold_is_idempotent() {
        for s in ["Sênior", "Ação Çedilha", "İstanbul", "plain ascii", "", "Ñandú ÅÉÎ"] {
            let once = fold(s);
            assert_eq!(fold(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn contains_ignores_diacritics() {
        assert!(folded_contains("Florianópolis, SC", "florianopolis"));
        assert!(folded_contains("anything", ""));
        assert!(!folded_contains("Recife", "olinda"));
    }
}
