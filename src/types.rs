//! Shared value types.

/// Immutable metadata attached to a log record, when enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMetadata {
    /// Epoch seconds.
    pub timestamp: i64,
    pub thread_id: u64,
    pub file: String,
    pub line: u32,
    pub function: String,
}

/// Coarse classification assigned to a newly discovered [`Pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternType {
    Message,
    Err,
    Metric,
    Event,
    Custom,
}

/// Kind of data a token was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    String,
    Number,
    Date,
    Uuid,
    Email,
    IpAddress,
    Path,
    Url,
    Custom,
}

/// One recognized, positional token within a pattern's template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Token index within the template, not byte offset.
    pub position: usize,
    pub var_type: VariableType,
    pub seen_values: Vec<String>,
}

/// Mutable bookkeeping carried alongside a [`Pattern`]'s template.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMetadata {
    pub first_seen: i64,
    pub last_seen: i64,
    pub frequency: u32,
    pub confidence: f32,
}

/// A recognized recurring message template plus its extracted structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// The original message that seeded this pattern.
    pub template: String,
    pub pattern_type: PatternType,
    /// Wyhash of `template`, seed 0.
    pub hash: u64,
    pub variables: Vec<Variable>,
    pub category: String,
    pub metadata: PatternMetadata,
}

/// One of the fixed regex keys recognized by variable rules. Any other
/// key is rejected at registration time and never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegexKey {
    Ipv4,
    Digits,
    Uuid,
    Email,
}

impl RegexKey {
    /// Looks up a regex key by its canonical pattern string. Returns
    /// `None` for anything outside the closed set — the caller should
    /// treat that as a configuration error at registration time.
    pub fn lookup(pattern: &str) -> Option<RegexKey> {
        match pattern {
            r"^\d+\.\d+\.\d+\.\d+$" => Some(RegexKey::Ipv4),
            r"^\d+$" => Some(RegexKey::Digits),
            r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$" => {
                Some(RegexKey::Uuid)
            }
            r"^[\w\.]+@[\w\.]+$" => Some(RegexKey::Email),
            _ => None,
        }
    }
}

/// Configuration rule mapping a fixed regex key to a [`VariableType`].
#[derive(Debug, Clone)]
pub struct VariableRule {
    pub name: String,
    pub regex_key: RegexKey,
    pub var_type: VariableType,
}

/// Configuration rule scoring tokens against a keyword set for
/// auto-categorization.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: std::collections::HashSet<String>,
    pub threshold: usize,
}
