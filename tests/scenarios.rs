//! End-to-end scenarios exercising the dispatcher, sinks, and pattern
//! analyzer together.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cratebox::{
    AnalyzerConfig, CategoryRule, LogBuilder, LogError, Logger, PatternAnalyzer, PatternType,
    RegexKey, Sink, VariableRule, VariableType,
};
use cratebox::{Level, LogMetadata};
use tempfile::tempdir;

struct CountingSink {
    count: Arc<AtomicUsize>,
    last_message: std::sync::Mutex<Option<String>>,
}

impl Sink for CountingSink {
    fn write(
        &self,
        _level: Level,
        message: &str,
        _metadata: Option<&LogMetadata>,
    ) -> Result<(), LogError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().unwrap() = Some(message.to_string());
        Ok(())
    }
    fn flush(&self) -> Result<(), LogError> {
        Ok(())
    }
    fn close(&self) {}
}

// Scenario 1: level gating.
#[test]
fn level_gating_writes_only_records_at_or_above_minimum() {
    let config = LogBuilder::new()
        .enable_console(false)
        .min_level(Level::Warn)
        .build()
        .unwrap();
    let logger = Logger::init(config).unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    let last_message = std::sync::Mutex::new(None);
    logger.add_sink(Box::new(CountingSink {
        count: count.clone(),
        last_message,
    }));

    logger.log(Level::Info, "hello", None).unwrap();
    logger.log(Level::Warn, "world", None).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

// Scenario 2: rotation.
#[test]
fn rotation_promotes_active_file_and_discards_oldest_sibling() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("app.log");
    let config = LogBuilder::new()
        .enable_console(false)
        .enable_file_logging(true)
        .file_path(&path)
        .max_file_size(100)
        .enable_rotation(true)
        .max_rotated_files(3)
        .buffer_size(4096)
        .build()
        .unwrap();
    let logger = Logger::init(config).unwrap();

    for _ in 0..20 {
        logger.log(Level::Info, "0123456789", None).unwrap();
    }
    logger.flush().unwrap();

    assert!(path.exists());
    let sibling = dir.path().join("app.log.1");
    assert!(sibling.exists());
    let sibling_content = std::fs::read_to_string(&sibling).unwrap();
    assert!(sibling_content.len() >= 100);

    // Rotate three more times; the fourth rotation discards the
    // original app.log.3 generated along the way.
    for _round in 0..3 {
        for _ in 0..10 {
            logger.log(Level::Info, "0123456789", None).unwrap();
        }
        logger.flush().unwrap();
    }

    assert!(dir.path().join("app.log").exists());
    assert!(dir.path().join("app.log.1").exists());
    assert!(dir.path().join("app.log.2").exists());
    assert!(dir.path().join("app.log.3").exists());
    logger.close();
}

// Scenario 3: pattern identity via similarity.
#[test]
fn similar_messages_resolve_to_the_same_pattern_hash() {
    let analyzer = PatternAnalyzer::new(AnalyzerConfig::default());
    let p1 = analyzer
        .analyze("User admin logged in from 192.168.1.1")
        .unwrap();
    let p2 = analyzer
        .analyze("User john logged in from 192.168.1.2")
        .unwrap();
    assert_eq!(p1.hash, p2.hash);
    assert_eq!(p2.metadata.frequency, 2);
}

// Scenario 4: variable extraction by rule, with a matching category.
#[test]
fn variable_extraction_by_rule_assigns_security_category() {
    let mut config = AnalyzerConfig::default();
    config.variable_rules = vec![
        VariableRule {
            name: "ip".into(),
            regex_key: RegexKey::Ipv4,
            var_type: VariableType::IpAddress,
        },
        VariableRule {
            name: "number".into(),
            regex_key: RegexKey::Digits,
            var_type: VariableType::Number,
        },
    ];
    config.category_rules = vec![CategoryRule {
        category: "security".into(),
        keywords: ["auth", "breach", "malware"]
            .iter()
            .map(|s| s.to_string())
            .collect::<HashSet<_>>(),
        threshold: 2,
    }];
    let analyzer = PatternAnalyzer::new(config);
    let pattern = analyzer
        .analyze("User auth breach detected from 192.168.1.100")
        .unwrap();

    assert_eq!(pattern.category, "security");
    assert_eq!(pattern.variables.len(), 1);
    assert_eq!(pattern.variables[0].var_type, VariableType::IpAddress);
    assert_eq!(pattern.variables[0].seen_values[0], "192.168.1.100");
}

// Scenario 5: category threshold miss.
#[test]
fn category_threshold_miss_falls_back_to_uncategorized() {
    let mut config = AnalyzerConfig::default();
    config.category_rules = vec![CategoryRule {
        category: "security".into(),
        keywords: ["auth", "breach", "malware"]
            .iter()
            .map(|s| s.to_string())
            .collect::<HashSet<_>>(),
        threshold: 2,
    }];
    let analyzer = PatternAnalyzer::new(config);
    let pattern = analyzer.analyze("Request took 350ms").unwrap();

    assert_eq!(pattern.category, "uncategorized");
    assert_eq!(pattern.variables.len(), 1);
    assert_eq!(pattern.variables[0].var_type, VariableType::Number);
    assert_eq!(pattern.variables[0].seen_values[0], "350ms");
}

// Scenario 6: eviction under pressure.
#[test]
fn eviction_keeps_pattern_count_at_max_after_three_distinct_messages() {
    let config = AnalyzerConfig {
        max_patterns: 2,
        max_pattern_age: 0,
        ..AnalyzerConfig::default()
    };
    let analyzer = PatternAnalyzer::new(config);
    analyzer.analyze("zqx kvw jpl").unwrap();
    analyzer.analyze("bdr fgh mnc").unwrap();
    analyzer.analyze("wxy ztu qop").unwrap();
    assert_eq!(analyzer.pattern_count(), 2);
}

// Scenario 7: custom type detection.
#[test]
fn custom_type_prefix_yields_custom_pattern_type() {
    let analyzer = PatternAnalyzer::new(AnalyzerConfig::default());
    let pattern = analyzer.analyze("CUSTOM_TYPE: Special message").unwrap();
    assert_eq!(pattern.pattern_type, PatternType::Custom);
}

// Dispatcher + analyzer wired together through one logger: analysis is
// an independent path alongside dispatch, not gated by it.
#[test]
fn logger_with_analyzer_dispatches_and_analyzes_independently() {
    let config = LogBuilder::new()
        .enable_console(false)
        .analyzer_config(AnalyzerConfig::default())
        .build()
        .unwrap();
    let logger = Logger::init(config).unwrap();
    let count = Arc::new(AtomicUsize::new(0));
    logger.add_sink(Box::new(CountingSink {
        count: count.clone(),
        last_message: std::sync::Mutex::new(None),
    }));

    logger.log(Level::Info, "disk usage at 80%", None).unwrap();
    let pattern = logger
        .analyzer()
        .expect("analyzer configured")
        .analyze("disk usage at 80%")
        .unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(pattern.metadata.frequency >= 1);
}
