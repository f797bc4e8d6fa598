//! Configuration assembly: [`LogConfig`] plus its fluent [`LogBuilder`].

use std::path::PathBuf;

use crate::analyzer::AnalyzerConfig;
use crate::backend::{ConsoleSink, FileSink, Stream};
use crate::error::{LogError, Result};
use crate::levels::Level;
use crate::sink::Sink;

/// Recognized logger options.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub min_level: Level,
    pub enable_colors: bool,
    pub enable_console: bool,
    pub enable_file_logging: bool,
    pub file_path: Option<PathBuf>,
    pub max_file_size: u64,
    pub enable_rotation: bool,
    pub max_rotated_files: usize,
    pub buffer_size: usize,
    pub async_mode: bool,
    pub enable_metadata: bool,
    /// Periodic flush deadline for the file sink only. The dispatcher's
    /// own async drain cadence is fixed and does not read this field.
    pub flush_interval_ms: u64,
    pub analyzer_config: Option<AnalyzerConfig>,
}

impl LogConfig {
    /// Instantiates the sinks this config describes, in a fixed
    /// console-then-file order (the order records are delivered in).
    pub(crate) fn build_sinks(&self) -> Result<Vec<Box<dyn Sink>>> {
        let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
        if self.enable_console {
            sinks.push(Box::new(ConsoleSink::new(Stream::Stderr, self.enable_colors)));
        }
        if self.enable_file_logging {
            let path = self.file_path.as_ref().ok_or_else(|| {
                LogError::InvalidConfiguration(
                    "file logging enabled with no file_path".to_string(),
                )
            })?;
            sinks.push(Box::new(FileSink::new(
                path,
                self.buffer_size,
                self.max_file_size,
                self.enable_rotation,
                self.max_rotated_files,
                self.flush_interval_ms,
            )?));
        }
        Ok(sinks)
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            min_level: Level::Info,
            enable_colors: true,
            enable_console: true,
            enable_file_logging: false,
            file_path: None,
            max_file_size: 10 * 1024 * 1024,
            enable_rotation: true,
            max_rotated_files: 5,
            buffer_size: 64 * 1024,
            async_mode: false,
            enable_metadata: false,
            flush_interval_ms: 1_000,
            analyzer_config: None,
        }
    }
}

/// Fluent assembler for [`LogConfig`]. Mirrors the config fields 1:1;
/// `build()` is where contradictions are caught and rejected as
/// `InvalidConfiguration`.
#[derive(Debug, Clone, Default)]
pub struct LogBuilder {
    config: LogConfig,
}

impl LogBuilder {
    pub fn new() -> Self {
        LogBuilder::default()
    }

    pub fn min_level(mut self, level: Level) -> Self {
        self.config.min_level = level;
        self
    }

    pub fn enable_colors(mut self, enable: bool) -> Self {
        self.config.enable_colors = enable;
        self
    }

    pub fn enable_console(mut self, enable: bool) -> Self {
        self.config.enable_console = enable;
        self
    }

    pub fn enable_file_logging(mut self, enable: bool) -> Self {
        self.config.enable_file_logging = enable;
        self
    }

    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.file_path = Some(path.into());
        self
    }

    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    pub fn enable_rotation(mut self, enable: bool) -> Self {
        self.config.enable_rotation = enable;
        self
    }

    pub fn max_rotated_files(mut self, count: usize) -> Self {
        self.config.max_rotated_files = count;
        self
    }

    pub fn buffer_size(mut self, bytes: usize) -> Self {
        self.config.buffer_size = bytes;
        self
    }

    pub fn async_mode(mut self, enable: bool) -> Self {
        self.config.async_mode = enable;
        self
    }

    pub fn enable_metadata(mut self, enable: bool) -> Self {
        self.config.enable_metadata = enable;
        self
    }

    pub fn flush_interval_ms(mut self, ms: u64) -> Self {
        self.config.flush_interval_ms = ms;
        self
    }

    pub fn analyzer_config(mut self, config: AnalyzerConfig) -> Self {
        self.config.analyzer_config = Some(config);
        self
    }

    /// Validates the assembled config, rejecting contradictions.
    pub fn build(self) -> Result<LogConfig> {
        let config = self.config;
        if config.enable_file_logging && config.file_path.is_none() {
            return Err(LogError::InvalidConfiguration(
                "file logging enabled with no file_path".to_string(),
            ));
        }
        if config.buffer_size == 0 {
            return Err(LogError::InvalidConfiguration(
                "buffer_size must be greater than zero".to_string(),
            ));
        }
        if let Some(analyzer) = &config.analyzer_config {
            if !(0.0..=1.0).contains(&analyzer.similarity_threshold) {
                return Err(LogError::InvalidConfiguration(
                    "similarity_threshold must be in (0, 1]".to_string(),
                ));
            }
        }
        Ok(config)
    }
}
