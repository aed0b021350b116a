use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{mpsc, Mutex, OnceLock};
use chrono::Local;

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

struct Logger {
    file: File,
    tui_tx: Option<mpsc::Sender<Record>>,
    prefixes: HashMap<String, u8>, // prefix -> color index
}

// Color indices for TUI rendering (mapped in ui.rs)
pub const COLOR_GRAY: u8 = 1;
pub const COLOR_BLUE: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// One log line as delivered to the TUI.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub prefix: String,
    pub color: u8,
    pub timestamp: String,
    pub message: String,
}

/// Initialize the global logger, truncating `mouseinfo.log` in `log_dir`.
/// Calls made before this are dropped.
pub fn init(log_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_dir.join("mouseinfo.log"))?;

    LOGGER
        .set(Mutex::new(Logger { file, tui_tx: None, prefixes: HashMap::new() }))
        .ok();
    Ok(())
}

/// Wire the TUI log channel.
pub fn set_tui_sender(tx: mpsc::Sender<Record>) {
    if let Some(mut l) = LOGGER.get().and_then(|l| l.lock().ok()) {
        l.tui_tx = Some(tx);
    }
}

/// Register a prefix with a color for the `*_p` helpers.
pub fn register_prefix(prefix: &str, color: u8) {
    if let Some(mut l) = LOGGER.get().and_then(|l| l.lock().ok()) {
        l.prefixes.insert(prefix.to_string(), color);
    }
}

fn write_log(level: Level, prefix: &str, msg: &str) {
    let Some(mut l) = LOGGER.get().and_then(|l| l.lock().ok()) else { return };
    let ts = Local::now().format("%H:%M:%S").to_string();

    let file_line = if prefix.is_empty() {
        format!("[{}] [{}] {}", ts, level.tag(), msg)
    } else {
        format!("[{}] [{}] [{}] {}", ts, level.tag(), prefix, msg)
    };
    writeln!(l.file, "{}", file_line).ok();

    let color = l.prefixes.get(prefix).copied().unwrap_or(0);
    if let Some(tx) = &l.tui_tx {
        tx.send(Record {
            level,
            prefix: prefix.to_string(),
            color,
            timestamp: ts,
            message: msg.to_string(),
        })
        .ok();
    }
}

pub fn info(msg: &str) {
    write_log(Level::Info, "", msg);
}

pub fn warn(msg: &str) {
    write_log(Level::Warn, "", msg);
}

pub fn error(msg: &str) {
    write_log(Level::Error, "", msg);
}

/// Log with a registered prefix.
pub fn info_p(prefix: &str, msg: &str) {
    write_log(Level::Info, prefix, msg);
}

pub fn warn_p(prefix: &str, msg: &str) {
    write_log(Level::Warn, prefix, msg);
}

pub fn error_p(prefix: &str, msg: &str) {
    write_log(Level::Error, prefix, msg);
}
