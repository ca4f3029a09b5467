//! Process-wide file logging.
//!
//! One rolling `flexi_logger` backend serves the whole process. Repeating
//! [`init_logging`] with equal settings is a no-op and different settings
//! are rejected, so hosts that call it from several entry points stay
//! consistent. Panics are recorded as single-line `panic_captured` events.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "forum_core";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEPT_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Validated logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub log_dir: PathBuf,
}

impl LogSettings {
    /// Parses a level name (`trace` to `error`, `warning` accepted) and an
    /// absolute directory.
    pub fn parse(level: &str, log_dir: &str) -> Result<Self, LoggingError> {
        let level = match level.trim().to_ascii_lowercase().as_str() {
            "warning" => LevelFilter::Warn,
            "off" => return Err(LoggingError::InvalidLevel(level.to_string())),
            other => other
                .parse::<LevelFilter>()
                .map_err(|_| LoggingError::InvalidLevel(level.to_string()))?,
        };

        let trimmed = log_dir.trim();
        if trimmed.is_empty() || !Path::new(trimmed).is_absolute() {
            return Err(LoggingError::InvalidLogDir(log_dir.to_string()));
        }

        Ok(Self {
            level,
            log_dir: PathBuf::from(trimmed),
        })
    }
}

#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    /// Empty or relative directory.
    InvalidLogDir(String),
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
    /// Logging already runs with other settings.
    Reconfigure {
        active: LogSettings,
        requested: LogSettings,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidLogDir(dir) => {
                write!(f, "log directory must be a non-empty absolute path, got `{dir}`")
            }
            Self::CreateDir { path, source } => {
                write!(f, "failed to create log directory `{}`: {source}", path.display())
            }
            Self::Backend(err) => write!(f, "failed to start logger: {err}"),
            Self::Reconfigure { active, requested } => write!(
                f,
                "logging already active at level {} in `{}`; refusing level {} in `{}`",
                active.level,
                active.log_dir.display(),
                requested.level,
                requested.log_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let requested = LogSettings::parse(level, log_dir)?;
    let active = ACTIVE.get_or_try_init(|| start(requested.clone()))?;
    if active.settings != requested {
        return Err(LoggingError::Reconfigure {
            active: active.settings.clone(),
            requested,
        });
    }
    Ok(())
}

/// Settings of the running logger, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE.get().map(|active| active.settings.clone())
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(settings: LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.log_dir).map_err(|source| LoggingError::CreateDir {
        path: settings.log_dir.clone(),
        source,
    })?;

    let spec = settings.level.to_string().to_ascii_lowercase();
    let handle = Logger::try_with_str(&spec)
        .map_err(LoggingError::Backend)?
        .log_to_file(
            FileSpec::default()
                .directory(&settings.log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_hook();
    info!(
        "event=core_init module=core status=ok version={} level={spec} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        settings.log_dir.display()
    );

    Ok(ActiveLogger {
        settings,
        _handle: handle,
    })
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        error!(
            "event=panic_captured module=core status=error location={location} payload={}",
            one_line(&panic_payload(panic_info.payload()), PANIC_PAYLOAD_LIMIT)
        );
        previous(panic_info);
    }));
}

fn panic_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// Payloads may carry post or comment text.
fn one_line(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let mut truncated: String = flattened.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, one_line, panic_payload, LogSettings, LoggingError};
    use log::LevelFilter;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "forum-core-logging-{suffix}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn settings_accept_level_aliases() {
        let dir = unique_temp_dir("parse");
        let dir = dir.to_str().unwrap();
        assert_eq!(LogSettings::parse("INFO", dir).unwrap().level, LevelFilter::Info);
        assert_eq!(
            LogSettings::parse(" warning ", dir).unwrap().level,
            LevelFilter::Warn
        );
        assert!(matches!(
            LogSettings::parse("loud", dir),
            Err(LoggingError::InvalidLevel(_))
        ));
        assert!(matches!(
            LogSettings::parse("off", dir),
            Err(LoggingError::InvalidLevel(_))
        ));
    }

    #[test]
    fn settings_reject_relative_and_empty_dirs() {
        assert!(matches!(
            LogSettings::parse("info", "logs/dev"),
            Err(LoggingError::InvalidLogDir(_))
        ));
        assert!(matches!(
            LogSettings::parse("info", "  "),
            Err(LoggingError::InvalidLogDir(_))
        ));
    }

    #[test]
    fn one_line_flattens_and_truncates() {
        assert_eq!(one_line("line1\nline2\rline3", 8), "line1 li...");
        assert_eq!(one_line("short", 8), "short");
    }

    #[test]
    fn panic_payload_handles_str_and_string() {
        assert_eq!(panic_payload(&"boom"), "boom");
        assert_eq!(panic_payload(&String::from("bang")), "bang");
        assert_eq!(panic_payload(&42_u8), "non-string panic payload");
    }

    #[test]
    fn init_logging_is_idempotent_and_rejects_reconfiguration() {
        let log_dir = unique_temp_dir("active");
        let log_dir_str = log_dir.to_str().unwrap().to_string();
        let other_dir = unique_temp_dir("other");

        init_logging("info", &log_dir_str).unwrap();
        init_logging("INFO", &log_dir_str).unwrap();

        assert!(matches!(
            init_logging("debug", &log_dir_str),
            Err(LoggingError::Reconfigure { .. })
        ));
        assert!(matches!(
            init_logging("info", other_dir.to_str().unwrap()),
            Err(LoggingError::Reconfigure { .. })
        ));

        let active = logging_status().unwrap();
        assert_eq!(active.level, LevelFilter::Info);
        assert_eq!(active.log_dir, log_dir);
    }
}
