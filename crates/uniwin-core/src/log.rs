//! File-based `log` backend with size-based rotation.
//!
//! Logs are written to `~/.config/uniwin/logs/uniwin.log`. When the file
//! exceeds the configured max size, it is rotated to `uniwin.log.1` (one
//! backup kept).

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{LevelFilter, Metadata, Record};
use serde::{Deserialize, Serialize};

use crate::{WindowError, WindowResult};

const LOG_FILE_NAME: &str = "uniwin.log";
const BACKUP_FILE_NAME: &str = "uniwin.log.1";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled. Defaults to `false`.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

impl LogConfig {
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        }
    }
}

struct LogFile {
    file: File,
    path: PathBuf,
    max_bytes: u64,
    written: u64,
}

impl LogFile {
    fn open(dir: &Path, max_bytes: u64) -> std::io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            file,
            path,
            max_bytes,
            written,
        })
    }

    fn write_line(&mut self, line: &str) {
        let _ = self.file.write_all(line.as_bytes());
        self.written += line.len() as u64;

        if self.max_bytes > 0 && self.written >= self.max_bytes {
            self.rotate();
        }
    }

    fn rotate(&mut self) {
        let backup = self.path.with_file_name(BACKUP_FILE_NAME);
        let _ = fs::rename(&self.path, &backup);
        if let Ok(f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            self.file = f;
        }
        self.written = 0;
    }
}

struct FileLogger {
    level: LevelFilter,
    out: Mutex<LogFile>,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        let line = format_line(record);
        out.write_line(&line);
    }

    fn flush(&self) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.file.flush();
        }
    }
}

fn format_line(record: &Record<'_>) -> String {
    format!(
        "{} [{}] {}: {}\n",
        timestamp(),
        record.level(),
        record.target(),
        record.args()
    )
}

/// Installs the file logger as the global `log` backend.
///
/// Does nothing if `config.enabled` is `false`. Call once at startup.
pub fn init(config: &LogConfig) -> WindowResult<()> {
    if !config.enabled {
        return Ok(());
    }
    let dir = crate::config::config_dir()
        .ok_or_else(|| WindowError::Config("could not determine log directory".into()))?
        .join("logs");
    init_in(config, &dir)
}

/// Like [`init`], writing into `dir`.
pub fn init_in(config: &LogConfig, dir: &Path) -> WindowResult<()> {
    let out = LogFile::open(dir, config.max_file_mb * 1024 * 1024)
        .map_err(|e| WindowError::os("opening log file", e))?;
    let level = config.level_filter();
    log::set_boxed_logger(Box::new(FileLogger {
        level,
        out: Mutex::new(out),
    }))
    .map_err(|e| WindowError::os("installing logger", e))?;
    log::set_max_level(level);
    Ok(())
}

fn timestamp() -> String {
    // UTC wall-clock time of day.
    let dur = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = dur.as_secs();
    let (h, m, s) = (secs / 3600 % 24, secs / 60 % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}.{:03}", dur.subsec_millis())
}
