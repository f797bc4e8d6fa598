//! Rule-based auto-categorization.

use crate::types::CategoryRule;

/// Strips leading whitespace and trailing non-alphanumerics, then
/// lowercases. Used to clean tokens before scoring against keyword rules.
fn clean_token(token: &str) -> String {
    let trimmed = token.trim_start();
    let trimmed = trimmed.trim_end_matches(|c: char| !c.is_alphanumeric());
    trimmed.to_lowercase()
}

/// Assigns a category to `message` by scoring cleaned, deduplicated
/// tokens against each rule's keyword set; the highest-scoring rule that
/// meets its threshold wins (ties go to the earliest rule in
/// configuration order). Falls back to `"error"` / `"uncategorized"`.
pub fn categorize(message: &str, rules: &[CategoryRule]) -> String {
    let mut seen = std::collections::HashSet::new();
    let mut cleaned_tokens = Vec::new();
    for token in message.split(' ') {
        let cleaned = clean_token(token);
        if cleaned.is_empty() {
            continue;
        }
        if seen.insert(cleaned.clone()) {
            cleaned_tokens.push(cleaned);
        }
    }

    let mut best: Option<(usize, usize)> = None; // (rule index, score)
    for (idx, rule) in rules.iter().enumerate() {
        let score = cleaned_tokens
            .iter()
            .filter(|t| rule.keywords.contains(t.as_str()))
            .count();
        if score < rule.threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }

    if let Some((idx, _)) = best {
        return rules[idx].category.clone();
    }

    if message.contains("error") || message.contains("fail") {
        "error".to_string()
    } else {
        "uncategorized".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn rule(category: &str, keywords: &[&str], threshold: usize) -> CategoryRule {
        CategoryRule {
            category: category.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            threshold,
        }
    }

    #[test]
    fn meets_threshold_wins() {
        let rules = vec![rule("security", &["auth", "breach", "malware"], 2)];
        let cat = categorize(
            "User auth breach detected from 192.168.1.100",
            &rules,
        );
        assert_eq!(cat, "security");
    }

    #[test]
    fn below_threshold_falls_back_to_uncategorized() {
        let rules = vec![rule("security", &["auth", "breach", "malware"], 2)];
        let cat = categorize("Request took 350ms", &rules);
        assert_eq!(cat, "uncategorized");
    }

    #[test]
    fn below_threshold_falls_back_to_error_on_keyword() {
        let rules = vec![rule("security", &["auth", "breach", "malware"], 2)];
        let cat = categorize("operation failed unexpectedly", &rules);
        assert_eq!(cat, "error");
    }

    #[test]
    fn ties_go_to_earliest_rule() {
        let rules = vec![
            rule("first", &["alpha", "beta"], 1),
            rule("second", &["alpha", "beta"], 1),
        ];
        let cat = categorize("alpha beta", &rules);
        assert_eq!(cat, "first");
    }

    #[test]
    fn empty_message_is_uncategorized() {
        assert_eq!(categorize("", &[]), "uncategorized");
    }
}
