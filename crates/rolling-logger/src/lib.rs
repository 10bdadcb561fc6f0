//! Rolling Logger
//!
//! Installs a `tracing` subscriber that writes to a size-rotated log file
//! and keeps the most recent lines in a circular buffer. Records emitted
//! through the `log` facade are forwarded to the same subscriber.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Rotate once the active file grows past this size.
pub const MAX_FILE_BYTES: u64 = 1024 * 1024;
/// Active file plus rotated generations kept on disk.
pub const MAX_FILES: usize = 3;
/// Lines kept in memory for `recent_lines`.
pub const RING_CAPACITY: usize = 200;

static RECENT: OnceLock<Mutex<VecDeque<String>>> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("failed to open log file in {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("a global logger is already installed")]
    AlreadyInstalled,
}

/// Log file that rotates `<stem>.log` → `<stem>.1.log` → ... when full.
pub struct RollingFile {
    dir: PathBuf,
    stem: String,
    file: File,
    written: u64,
    max_bytes: u64,
    max_files: usize,
}

impl RollingFile {
    pub fn open(dir: &Path, stem: &str) -> io::Result<Self> {
        Self::with_limits(dir, stem, MAX_FILE_BYTES, MAX_FILES)
    }

    pub fn with_limits(dir: &Path, stem: &str, max_bytes: u64, max_files: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = generation_path(dir, stem, 0);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir: dir.to_path_buf(),
            stem: stem.to_string(),
            file,
            written,
            max_bytes,
            max_files: max_files.max(1),
        })
    }

    pub fn path(&self) -> PathBuf {
        generation_path(&self.dir, &self.stem, 0)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        for generation in (1..self.max_files).rev() {
            let from = generation_path(&self.dir, &self.stem, generation - 1);
            let to = generation_path(&self.dir, &self.stem, generation);
            if from.exists() {
                let _ = fs::remove_file(&to);
                fs::rename(&from, &to)?;
            }
        }
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        remember(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn generation_path(dir: &Path, stem: &str, generation: usize) -> PathBuf {
    if generation == 0 {
        dir.join(format!("{}.log", stem))
    } else {
        dir.join(format!("{}.{}.log", stem, generation))
    }
}

fn remember(buf: &[u8]) {
    let ring = RECENT.get_or_init(|| Mutex::new(VecDeque::with_capacity(RING_CAPACITY)));
    let Ok(mut ring) = ring.lock() else {
        return;
    };
    for line in String::from_utf8_lossy(buf).lines() {
        if line.trim().is_empty() {
            continue;
        }
        if ring.len() == RING_CAPACITY {
            ring.pop_front();
        }
        ring.push_back(line.to_string());
    }
}

/// Most recent log lines, oldest first.
pub fn recent_lines() -> Vec<String> {
    RECENT
        .get()
        .and_then(|ring| ring.lock().ok().map(|ring| ring.iter().cloned().collect()))
        .unwrap_or_default()
}

/// Install the global subscriber writing to `<log_dir>/<app_name>.log`.
///
/// Verbosity comes from `RUST_LOG`, defaulting to `info`.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    let log_dir = log_dir.as_ref();
    let writer = RollingFile::open(log_dir, app_name).map_err(|source| LoggerError::Io {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(writer))
        .try_init()
        .map_err(|_| LoggerError::AlreadyInstalled)?;

    tracing::info!(
        "=== {} started {} ===",
        app_name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

pub fn info(message: &str) {
    log::info!("{}", message);
}

pub fn error(message: &str) {
    log::error!("{}", message);
}
