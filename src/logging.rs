use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use chrono::Local;
use log::{LevelFilter, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

/// Appends timestamped records to a file.
pub struct FileLogger {
    file: Mutex<std::fs::File>,
    level: LevelFilter,
}

impl FileLogger {
    pub fn new(log_file: &str, level: LevelFilter) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;

        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let _ = writeln!(
                file,
                "{} [{}] {}: {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

pub fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim())
        .map_err(|_| Error::ConfigError(format!("Unknown log level: {}", level)))
}

/// Installs the global logger: the file logger when a file is configured,
/// env_logger otherwise (`RUST_LOG` still wins over the configured level).
pub fn init(config: &LoggingConfig, debug: bool) -> Result<()> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        parse_level(&config.level)?
    };

    match &config.file {
        Some(path) => {
            let logger = FileLogger::new(path, level)?;
            log::set_boxed_logger(Box::new(logger))
                .map_err(|e| Error::InternalError(e.to_string()))?;
            log::set_max_level(level);
        }
        None => {
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(level.to_string().to_lowercase()),
            )
            .try_init()
            .map_err(|e| Error::InternalError(e.to_string()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::Warn);
        assert!(parse_level("loud").is_err());
    }

    #[test]
    fn test_file_logger_filters_by_level() {
        let path = std::env::temp_dir().join(format!("pump-gateway-log-{}.log", std::process::id()));
        let logger = FileLogger::new(path.to_str().unwrap(), LevelFilter::Info).unwrap();

        logger.log(
            &Record::builder()
                .level(log::Level::Info)
                .target("gateway")
                .args(format_args!("kept"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(log::Level::Debug)
                .target("gateway")
                .args(format_args!("dropped"))
                .build(),
        );
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(contents.contains("[INFO] gateway: kept"));
        assert!(!contents.contains("dropped"));
    }
}
