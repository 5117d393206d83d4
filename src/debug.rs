//! Debug logging infrastructure for chatiq.
//!
//! Controlled by the DEBUG_LEVEL environment variable:
//! - 0 or unset: No debugging
//! - 1: Errors only
//! - 2: Info level (widget lifecycle, storage, sound)
//! - 3: Debug level (conversation pipeline, timers)
//! - 4: Trace level (every event emitted)
//!
//! All output goes to `chatiq_debug.log` in the system temp directory so that
//! an interactive host (such as the demo REPL) keeps stdout clean.
//! [`init_log_bridge`] additionally routes records from the `log` facade into
//! the same file and mirrors them to stderr when `RUST_LOG` is set.

use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Self {
        match std::env::var("DEBUG_LEVEL") {
            Ok(val) => Self::from_number(val.trim().parse::<u8>().unwrap_or(0)),
            Err(_) => DebugLevel::Off,
        }
    }

    fn from_number(n: u8) -> Self {
        match n {
            1 => DebugLevel::Error,
            2 => DebugLevel::Info,
            3 => DebugLevel::Debug,
            4 => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }

    fn from_log_level(level: log::Level) -> Self {
        match level {
            log::Level::Error | log::Level::Warn => DebugLevel::Error,
            log::Level::Info => DebugLevel::Info,
            log::Level::Debug => DebugLevel::Debug,
            log::Level::Trace => DebugLevel::Trace,
        }
    }

    fn to_level_filter(self) -> log::LevelFilter {
        match self {
            DebugLevel::Off => log::LevelFilter::Off,
            DebugLevel::Error => log::LevelFilter::Warn,
            DebugLevel::Info => log::LevelFilter::Info,
            DebugLevel::Debug => log::LevelFilter::Debug,
            DebugLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for DebugLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "0" => Ok(DebugLevel::Off),
            "error" | "1" => Ok(DebugLevel::Error),
            "info" | "2" => Ok(DebugLevel::Info),
            "debug" | "3" => Ok(DebugLevel::Debug),
            "trace" | "4" => Ok(DebugLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Global debug logger
struct DebugLogger {
    level: DebugLevel,
    file: Option<std::fs::File>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new() -> Self {
        let mut logger = DebugLogger {
            level: DebugLevel::from_env(),
            file: None,
            mirror_stderr: std::env::var_os("RUST_LOG").is_some(),
        };
        logger.open_file();
        logger
    }

    fn open_file(&mut self) {
        if self.level == DebugLevel::Off || self.file.is_some() {
            return;
        }
        let log_path = std::env::temp_dir().join("chatiq_debug.log");
        // Silently run without a file if it can't be opened
        if let Ok(f) = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&log_path)
        {
            self.file = Some(f);
            self.write_raw(&format!(
                "\n{}\nchatiq debug session started at {} (level={:?})\n{}\n",
                "=".repeat(80),
                get_timestamp(),
                self.level,
                "=".repeat(80)
            ));
        }
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
        if self.mirror_stderr {
            eprint!("{msg}");
        }
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if level <= self.level {
            let level_str = match level {
                DebugLevel::Error => "ERROR",
                DebugLevel::Info => "INFO ",
                DebugLevel::Debug => "DEBUG",
                DebugLevel::Trace => "TRACE",
                DebugLevel::Off => return,
            };
            self.write_raw(&format!(
                "[{}] [{}] [{}] {}\n",
                get_timestamp(),
                level_str,
                category,
                msg
            ));
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new()))
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Check if debugging is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    let logger = get_logger().lock();
    level <= logger.level
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    let mut logger = get_logger().lock();
    logger.log(level, category, msg);
}

/// Log formatted message
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

/// Bridges the `log` facade into the debug log file.
struct LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        is_enabled(DebugLevel::from_log_level(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            logf(
                DebugLevel::from_log_level(record.level()),
                record.target(),
                *record.args(),
            );
        }
    }

    fn flush(&self) {}
}

static LOG_BRIDGE: LogBridge = LogBridge;

/// Install the `log` bridge.
///
/// `level_override` (from the CLI) takes precedence over DEBUG_LEVEL.
/// Calling this more than once is harmless; only the first call installs
/// the bridge.
pub fn init_log_bridge(level_override: Option<DebugLevel>) {
    let level = {
        let mut logger = get_logger().lock();
        if let Some(level) = level_override {
            logger.level = level;
            logger.open_file();
        }
        logger.level
    };

    if log::set_logger(&LOG_BRIDGE).is_ok() {
        log::set_max_level(level.to_level_filter());
    }
}

// Convenience macros for logging
#[macro_export]
macro_rules! debug_error {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Error, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}
