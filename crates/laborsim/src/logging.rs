use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

/// Trim `log_path` to its last `keep` bytes once it grows past `max`.
fn rotate_log_if_needed(log_path: &Path, max: u64, keep: u64) -> io::Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let file_size = fs::metadata(log_path)?.len();
    if file_size <= max {
        return Ok(());
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(file_size.saturating_sub(keep)))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    drop(file);

    // Skip to the first newline to avoid partial lines
    let skip = buffer
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(b"--- Log rotated (older entries removed) ---\n")?;
    file.write_all(&buffer[skip..])?;

    Ok(())
}

/// Hands out writers to one shared log file
#[derive(Clone)]
struct LogWriterFactory {
    file: Arc<Mutex<File>>,
}

struct LogWriter {
    file: Arc<Mutex<File>>,
}

impl LogWriter {
    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: self.file.clone(),
        }
    }
}

/// Initialize logging to stderr, or to `log_file` when given.
///
/// File logs are rotated by size: past 5MB only the last 1MB is kept.
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> color_eyre::Result<()> {
    let default_filter = format!("laborsim={level},laborsim_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_file {
        Some(log_path) => {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            if let Err(e) = rotate_log_if_needed(log_path, MAX_LOG_SIZE, KEEP_SIZE) {
                eprintln!("Warning: Failed to rotate log file: {}", e);
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;
            let writer_factory = LogWriterFactory {
                file: Arc::new(Mutex::new(file)),
            };

            registry
                .with(
                    fmt::layer()
                        .with_writer(writer_factory)
                        .with_ansi(false)
                        .with_target(true),
                )
                .init();
            tracing::info!("logging initialized (log_path={})", log_path.display());
        }
        None => {
            registry
                .with(fmt::layer().with_writer(io::stderr).with_target(false))
                .init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_small_log_left_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("laborsim.log");
        fs::write(&path, "one\ntwo\n").unwrap();

        rotate_log_if_needed(&path, 100, 10).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");

        // Missing files are not an error
        rotate_log_if_needed(&dir.path().join("absent.log"), 100, 10).unwrap();
    }

    #[test]
    fn test_rotation_keeps_recent_whole_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("laborsim.log");
        let content: String = (0..100).map(|i| format!("line {i:03}\n")).collect();
        fs::write(&path, &content).unwrap();

        rotate_log_if_needed(&path, 500, 50).unwrap();

        let rotated = fs::read_to_string(&path).unwrap();
        let mut lines = rotated.lines();
        assert_eq!(
            lines.next(),
            Some("--- Log rotated (older entries removed) ---")
        );
        let kept: Vec<&str> = lines.collect();
        assert!(!kept.is_empty());
        assert!(kept.iter().all(|l| l.starts_with("line ")));
        assert_eq!(kept.last(), Some(&"line 099"));
        assert!(rotated.len() < 100);
    }
}
