//! Logging bootstrap for the blogline session.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process: rolling files in the
//!   configured directory, optionally mirrored to stderr.
//! - Capture panics into the log before the previous hook runs.
//! - Flush buffered entries on demand before the process exits.
//!
//! # Invariants
//! - Init is idempotent for identical settings.
//! - Init with settings that differ from the active ones is rejected.
//! - Init never panics; failures come back as readable strings.

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "blogline";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;
const KNOWN_LEVELS: &str = "trace|debug|info|warn|error";

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Validated logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: &'static str,
    pub log_dir: PathBuf,
    pub echo_to_stderr: bool,
}

impl LogSettings {
    /// Normalizes `level` and checks that `log_dir` is a usable absolute path.
    pub fn new(level: &str, log_dir: &Path, echo_to_stderr: bool) -> Result<Self, String> {
        Ok(Self {
            level: normalize_level(level)?,
            log_dir: normalize_log_dir(log_dir)?,
            echo_to_stderr,
        })
    }

    fn ensure_matches(&self, requested: &Self) -> Result<(), String> {
        if self == requested {
            return Ok(());
        }
        Err(format!(
            "logging already initialized with level `{}` at `{}` (stderr={}); refusing to switch to level `{}` at `{}` (stderr={})",
            self.level,
            self.log_dir.display(),
            self.echo_to_stderr,
            requested.level,
            requested.log_dir.display(),
            requested.echo_to_stderr
        ))
    }
}

struct ActiveLogger {
    settings: LogSettings,
    handle: LoggerHandle,
}

/// Initializes logging for the process.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error` (`warning` accepted).
/// - `log_dir` is empty, relative, or cannot be created.
/// - logging was already started with different settings.
/// - the backend fails to start.
pub fn init_logging(level: &str, log_dir: &Path, echo_to_stderr: bool) -> Result<(), String> {
    let requested = LogSettings::new(level, log_dir, echo_to_stderr)?;

    if let Some(active) = ACTIVE.get() {
        return active.settings.ensure_matches(&requested);
    }

    let active = ACTIVE.get_or_try_init(|| start_backend(requested.clone()))?;
    active.settings.ensure_matches(&requested)
}

/// Writes buffered log entries to the log files.
///
/// The logger handle lives in a static that is never dropped, so callers
/// must flush before the process exits. No-op when logging is not active.
pub fn flush_logging() {
    if let Some(active) = ACTIVE.get() {
        active.handle.flush();
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_backend(settings: LogSettings) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&settings.log_dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            settings.log_dir.display()
        )
    })?;

    let duplicate = if settings.echo_to_stderr {
        Duplicate::Warn
    } else {
        Duplicate::None
    };

    let handle = Logger::try_with_str(settings.level)
        .map_err(|err| format!("invalid log level `{}`: {err}", settings.level))?
        .log_to_file(
            FileSpec::default()
                .directory(settings.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .duplicate_to_stderr(duplicate)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        // [YYYY-MM-DD HH:MM:SS.ffffff TZ] LEVEL [module] file:line: message
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stderr(flexi_logger::default_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook();

    info!(
        "event=logging_init module=logging status=ok platform={} level={} log_dir={} stderr={}",
        std::env::consts::OS,
        settings.level,
        settings.log_dir.display(),
        settings.echo_to_stderr
    );

    Ok(ActiveLogger {
        settings,
        handle,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected {KNOWN_LEVELS}"
        )),
    }
}

fn normalize_log_dir(log_dir: &Path) -> Result<PathBuf, String> {
    if log_dir.as_os_str().is_empty() {
        return Err("log directory cannot be empty".to_string());
    }
    if !log_dir.is_absolute() {
        return Err(format!(
            "log directory must be an absolute path, got `{}`",
            log_dir.display()
        ));
    }
    Ok(log_dir.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info.location().map_or_else(
            || "unknown".to_string(),
            |loc| format!("{}:{}", loc.file(), loc.line()),
        );
        // Payload may echo blog/post text typed by the user.
        error!(
            "event=panic_captured module=logging status=error location={location} payload={}",
            panic_summary(panic_info)
        );
        previous_hook(panic_info);
    }));
}

fn panic_summary(info: &PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| info.payload().downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");

    single_line(payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn single_line(value: &str, max_chars: usize) -> String {
    let mut line: String = value
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r') { ' ' } else { ch })
        .take(max_chars)
        .collect();
    if value.chars().count() > max_chars {
        line.push_str("...");
    }
    line
}
