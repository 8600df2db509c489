//! Rolling Logger
//!
//! Daily log files under an app log directory, plus a circular buffer of the
//! most recent lines so a host can show them without touching the disk.
//!
//! Library code logs through the `log` facade; `init_logger` installs a
//! `tracing-subscriber` fmt subscriber that also picks up `log` records.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

/// Lines kept in memory for `recent_lines`
pub const RING_CAPACITY: usize = 500;

/// Daily files kept on disk, older ones are removed on rotation
pub const RETAINED_FILES: usize = 7;

static RING: OnceLock<Mutex<VecDeque<String>>> = OnceLock::new();
static INITIALIZED: OnceLock<String> = OnceLock::new();

fn ring() -> &'static Mutex<VecDeque<String>> {
    RING.get_or_init(|| Mutex::new(VecDeque::with_capacity(RING_CAPACITY)))
}

fn push_lines(text: &str) {
    let Ok(mut buf) = ring().lock() else {
        return;
    };
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        if buf.len() == RING_CAPACITY {
            buf.pop_front();
        }
        buf.push_back(line.to_string());
    }
}

/// Most recent log lines, oldest first
pub fn recent_lines() -> Vec<String> {
    ring()
        .lock()
        .map(|buf| buf.iter().cloned().collect())
        .unwrap_or_default()
}

/// File writer that switches to a new file when the local date changes
pub struct RollingWriter {
    dir: PathBuf,
    app_name: String,
    current_date: String,
    file: Option<File>,
}

impl RollingWriter {
    pub fn new(dir: PathBuf, app_name: &str) -> Self {
        Self {
            dir,
            app_name: app_name.to_string(),
            current_date: String::new(),
            file: None,
        }
    }

    /// File name for a given date, e.g. `MemoryTrigger-2026-10-19.log`
    pub fn file_name(&self, date: &str) -> String {
        format!("{}-{}.log", self.app_name, date)
    }

    fn ensure_file(&mut self) -> io::Result<&mut File> {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        if self.file.is_none() || self.current_date != today {
            fs::create_dir_all(&self.dir)?;
            let path = self.dir.join(self.file_name(&today));
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            self.file = Some(file);
            self.current_date = today;
            // Rotation already succeeded, a failed cleanup only leaves extra files
            let _ = prune_old_files(&self.dir, &self.app_name, RETAINED_FILES);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file not open"))
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        push_lines(&String::from_utf8_lossy(buf));
        let file = self.ensure_file()?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Remove the oldest `<app_name>-*.log` files so at most `keep` remain.
/// Returns how many files were removed.
pub fn prune_old_files(dir: &Path, app_name: &str, keep: usize) -> io::Result<usize> {
    let prefix = format!("{}-", app_name);
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(&prefix) && n.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    if logs.len() <= keep {
        return Ok(0);
    }

    // Dates are zero-padded so name order is chronological
    logs.sort();
    let excess = logs.len() - keep;
    for path in logs.iter().take(excess) {
        fs::remove_file(path)?;
    }
    Ok(excess)
}

/// Initialize logging into `log_dir`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    fs::create_dir_all(&log_dir).map_err(|e| format!("Failed to create log dir: {}", e))?;

    init_platform(&log_dir, app_name)?;

    let _ = INITIALIZED.set(app_name.to_string());
    log::info!("[{}] Logger initialized at {}", app_name, log_dir.display());
    Ok(())
}

#[cfg(not(target_os = "android"))]
fn init_platform(log_dir: &Path, app_name: &str) -> Result<(), String> {
    let writer = RollingWriter::new(log_dir.to_path_buf(), app_name);

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .with_target(true)
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))
}

#[cfg(target_os = "android")]
fn init_platform(_log_dir: &Path, app_name: &str) -> Result<(), String> {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag(app_name),
    );
    Ok(())
}

fn ensure_initialized() -> Result<(), String> {
    if INITIALIZED.get().is_none() {
        return Err("Logger not initialized".to_string());
    }
    Ok(())
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::error!("{}", msg);
    Ok(())
}
