//! Shared line-format helper used by both sinks.

use crate::levels::{Level, COLOR_RESET};
use crate::types::LogMetadata;

/// Renders one record as `[<epoch_seconds>] <colorcode?>[<LEVEL>]<reset?> [<file>:<line>]? <message>\n`.
pub fn format_line(
    level: Level,
    message: &str,
    metadata: Option<&LogMetadata>,
    colors: bool,
) -> String {
    let timestamp = metadata
        .map(|m| m.timestamp)
        .unwrap_or_else(crate::clock::now_epoch_seconds);

    let mut line = String::with_capacity(message.len() + 32);
    line.push('[');
    line.push_str(&timestamp.to_string());
    line.push_str("] ");

    if colors {
        line.push_str(level.color_escape());
    }
    line.push('[');
    line.push_str(level.display_name());
    line.push(']');
    if colors {
        line.push_str(COLOR_RESET);
    }

    if let Some(m) = metadata {
        line.push_str(" [");
        line.push_str(&m.file);
        line.push(':');
        line.push_str(&m.line.to_string());
        line.push(']');
    }

    line.push(' ');
    line.push_str(message);
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line_has_no_escapes() {
        let line = format_line(Level::Info, "hello", None, false);
        assert!(!line.contains('\x1b'));
        assert!(line.contains("[INFO]"));
        assert!(line.ends_with("hello\n"));
    }

    #[test]
    fn colored_line_wraps_level_with_escapes() {
        let line = format_line(Level::Err, "oops", None, true);
        assert!(line.contains("\x1b[31m[ERROR]\x1b[0m"));
    }

    #[test]
    fn metadata_adds_file_and_line() {
        let meta = LogMetadata {
            timestamp: 42,
            thread_id: 1,
            file: "main.rs".into(),
            line: 10,
            function: "run".into(),
        };
        let line = format_line(Level::Debug, "m", Some(&meta), false);
        assert!(line.contains("[main.rs:10]"));
        assert!(line.starts_with("[42] "));
    }
}
