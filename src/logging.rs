//! env_logger setup with an optional log file.
use crate::error::{CrateError, Result};
use chrono::Local;
use env_logger::{Builder, Target};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

pub const TIMESTAMP_FORMAT: &str = "%y/%m/%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: log::LevelFilter,
    /// Write log lines here instead of stderr.
    pub file: Option<PathBuf>,
    /// Append to `file` rather than truncating it.
    pub append: bool,
    /// With a file, echo each line to stderr as well.
    pub echo: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: log::LevelFilter::Info,
            file: None,
            append: false,
            echo: true,
        }
    }
}

// Copies every write to the log file and, optionally, stderr.
struct TeeWriter {
    file: File,
    echo: bool,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        if self.echo {
            io::stderr().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

pub fn open_log_file(config: &LogConfig) -> Result<Option<File>> {
    let Some(path) = &config.file else {
        return Ok(None);
    };
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(config.append)
        .truncate(!config.append)
        .open(path)?;
    Ok(Some(file))
}

pub fn format_line(level: log::Level, message: &str) -> String {
    format!(
        "[{}] {}: {}",
        Local::now().format(TIMESTAMP_FORMAT),
        level,
        message
    )
}

/// Installs the global logger. `RUST_LOG` still overrides `config.level`.
pub fn init(config: &LogConfig) -> Result<()> {
    let mut builder = Builder::new();
    builder
        .filter_level(config.level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", format_line(record.level(), &record.args().to_string())));

    if let Some(file) = open_log_file(config)? {
        builder.target(Target::Pipe(Box::new(TeeWriter {
            file,
            echo: config.echo,
        })));
    }

    builder
        .try_init()
        .map_err(|e| CrateError::LoggerInit(e.to_string()))?;
    log::info!("Logging initialised at level {}", config.level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn formats_with_short_timestamp() {
        let line = format_line(log::Level::Warn, "Closing file.");
        assert!(line.starts_with('['));
        assert!(line.ends_with("] WARN: Closing file."));
        // "[yy/mm/dd HH:MM:SS]"
        assert_eq!(line.find(']'), Some(18));
    }

    #[test]
    fn truncates_or_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, "old\n").unwrap();

        let mut config = LogConfig {
            file: Some(path.clone()),
            append: true,
            ..LogConfig::default()
        };
        let mut file = open_log_file(&config).unwrap().unwrap();
        writeln!(file, "new").unwrap();
        drop(file);
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");

        config.append = false;
        let mut file = open_log_file(&config).unwrap().unwrap();
        writeln!(file, "fresh").unwrap();
        drop(file);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn no_file_without_path() {
        assert!(open_log_file(&LogConfig::default()).unwrap().is_none());
    }

    #[test]
    fn tee_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tee.log");
        let file = File::create(&path).unwrap();
        let mut tee = TeeWriter { file, echo: false };
        tee.write_all(b"line\n").unwrap();
        tee.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "line\n");
    }
}
