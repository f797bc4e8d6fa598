//! Variable extraction: rule match first, heuristic fallback.

use crate::types::{RegexKey, Variable, VariableRule, VariableType};

/// Checks whether `token` matches the fixed regex behind `key`.
fn matches_key(key: RegexKey, token: &str) -> bool {
    match key {
        RegexKey::Ipv4 => {
            let parts: Vec<&str> = token.split('.').collect();
            parts.len() == 4
                && parts.iter().all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        }
        RegexKey::Digits => !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()),
        RegexKey::Uuid => {
            token.len() == 36
                && token.as_bytes()[8] == b'-'
                && token.as_bytes()[13] == b'-'
                && token.as_bytes()[18] == b'-'
                && token.as_bytes()[23] == b'-'
                && token
                    .char_indices()
                    .all(|(i, c)| matches!(i, 8 | 13 | 18 | 23) || c.is_ascii_hexdigit())
        }
        RegexKey::Email => {
            if let Some(at) = token.find('@') {
                at > 0 && at < token.len() - 1
            } else {
                false
            }
        }
    }
}

/// Heuristic classification used when no [`VariableRule`] matches a
/// token: digit-leading -> number, exactly three dots -> ip_address,
/// contains `@` -> email, else not a variable.
///
/// `ipv4_rule_rejected` suppresses the dots-based ip_address guess: if
/// an `Ipv4`-keyed rule is configured and already evaluated this token
/// without matching, a three-dot token should not be reclassified as an
/// address behind that rule's back.
fn heuristic_classify(token: &str, ipv4_rule_rejected: bool) -> Option<VariableType> {
    if token.is_empty() {
        return None;
    }
    if token.as_bytes()[0].is_ascii_digit() {
        return Some(VariableType::Number);
    }
    if !ipv4_rule_rejected && token.bytes().filter(|&b| b == b'.').count() == 3 {
        return Some(VariableType::IpAddress);
    }
    if token.contains('@') {
        return Some(VariableType::Email);
    }
    None
}

/// Splits `message` on ASCII spaces and classifies each token in order,
/// rules first then heuristic fallback. Token order is preserved; a
/// token never classified produces no variable.
pub fn extract_variables(message: &str, rules: &[VariableRule]) -> Vec<Variable> {
    let mut variables = Vec::new();

    for (position, token) in message.split(' ').enumerate() {
        if token.is_empty() {
            continue;
        }

        let mut classified: Option<VariableType> = None;
        let mut ipv4_rule_rejected = false;
        for rule in rules {
            if matches_key(rule.regex_key, token) {
                classified = Some(rule.var_type);
                break;
            }
            if rule.regex_key == RegexKey::Ipv4 {
                ipv4_rule_rejected = true;
            }
        }
        if classified.is_none() {
            classified = heuristic_classify(token, ipv4_rule_rejected);
        }

        if let Some(var_type) = classified {
            variables.push(Variable {
                position,
                var_type,
                seen_values: vec![token.to_string()],
            });
        }
    }

    variables
}
