//! Pattern analyzer: template identity, similarity fallback, variable
//! extraction, auto-categorization, and age/size-based eviction.

mod categorize;
mod similarity;
mod variables;

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::error::Result;
use crate::types::{CategoryRule, Pattern, PatternMetadata, PatternType, VariableRule};

pub use similarity::{similarity as jaccard_similarity, wyhash};

/// Tunables for [`PatternAnalyzer`].
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub similarity_threshold: f32,
    /// Seconds; 0 means "age out at next cleanup".
    pub max_pattern_age: i64,
    pub max_patterns: usize,
    pub variable_rules: Vec<VariableRule>,
    pub category_rules: Vec<CategoryRule>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            similarity_threshold: 0.85,
            max_pattern_age: 86_400,
            max_patterns: 1000,
            variable_rules: Vec::new(),
            category_rules: Vec::new(),
        }
    }
}

/// Classifies a raw message's pattern type by keyword scan, first match
/// wins.
fn classify_type(message: &str) -> PatternType {
    if message.starts_with("CUSTOM_TYPE:") {
        PatternType::Custom
    } else if message.contains("error") || message.contains("fail") {
        PatternType::Err
    } else if message.contains("metric") || message.contains("measure") {
        PatternType::Metric
    } else if message.contains("event") {
        PatternType::Event
    } else {
        PatternType::Message
    }
}

/// Concurrent, bounded map of message templates keyed by hash, with
/// approximate-match fallback. A single mutex serializes all analyzer
/// state.
pub struct PatternAnalyzer {
    config: AnalyzerConfig,
    store: Mutex<AHashMap<u64, Pattern>>,
}

impl PatternAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        PatternAnalyzer {
            config,
            store: Mutex::new(AHashMap::new()),
        }
    }

    /// Analyzes `message`, returning the pattern it resolved to — an
    /// existing one (hash or similarity match) or a freshly created one.
    pub fn analyze(&self, message: &str) -> Result<Pattern> {
        let now = crate::clock::now_epoch_seconds();
        let hash = wyhash(message.as_bytes(), 0);

        let mut store = self.store.lock();

        if let Some(pattern) = store.get_mut(&hash) {
            pattern.metadata.frequency += 1;
            pattern.metadata.last_seen = now;
            let result = pattern.clone();
            self.evict(&mut store, now);
            return Ok(result);
        }

        let mut best: Option<(u64, f32)> = None;
        for (h, pattern) in store.iter() {
            let score = jaccard_similarity(message, &pattern.template);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((*h, score)),
            }
        }
        if let Some((h, score)) = best {
            if score > self.config.similarity_threshold {
                let pattern = store.get_mut(&h).expect("matched hash exists in store");
                pattern.metadata.frequency += 1;
                pattern.metadata.last_seen = now;
                let result = pattern.clone();
                self.evict(&mut store, now);
                return Ok(result);
            }
        }

        let pattern_type = classify_type(message);
        let variables = variables::extract_variables(message, &self.config.variable_rules);
        let category = categorize::categorize(message, &self.config.category_rules);

        let pattern = Pattern {
            template: message.to_string(),
            pattern_type,
            hash,
            variables,
            category,
            metadata: PatternMetadata {
                first_seen: now,
                last_seen: now,
                frequency: 1,
                confidence: 1.0,
            },
        };
        store.insert(hash, pattern.clone());

        self.evict(&mut store, now);
        Ok(pattern)
    }

    /// Removes patterns older than `max_pattern_age` (strict), then
    /// trims to `max_patterns` by evicting the oldest `last_seen`
    /// entries.
    fn evict(&self, store: &mut AHashMap<u64, Pattern>, now: i64) {
        store.retain(|_, p| now - p.metadata.last_seen <= self.config.max_pattern_age);

        if store.len() > self.config.max_patterns {
            let mut by_age: Vec<(u64, i64)> =
                store.iter().map(|(h, p)| (*h, p.metadata.last_seen)).collect();
            by_age.sort_by_key(|(_, last_seen)| *last_seen);
            let excess = store.len() - self.config.max_patterns;
            for (h, _) in by_age.into_iter().take(excess) {
                store.remove(&h);
            }
        }
    }

    /// Current number of stored patterns. Takes the analyzer's lock.
    pub fn pattern_count(&self) -> usize {
        self.store.lock().len()
    }

    /// Releases all stored patterns.
    pub fn close(&self) {
        self.store.lock().clear();
    }
}
