use chrono::{DateTime, Local};
use log::{Level, LevelFilter, Metadata, Record};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

/// Bounded in-memory log shown in the log panel
#[derive(Clone)]
pub struct AppLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
    max_entries: usize,
    level: Arc<Mutex<LevelFilter>>,
}

impl AppLogger {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            max_entries,
            level: Arc::new(Mutex::new(LevelFilter::Info)),
        }
    }

    pub fn init(self, level: LevelFilter) -> Result<(), log::SetLoggerError> {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner) = level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn entries(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.entries().clone()
    }

    /// Most recent warning or error, for the status bar
    pub fn latest_problem(&self) -> Option<String> {
        self.entries()
            .iter()
            .rev()
            .find(|entry| entry.level <= Level::Warn)
            .map(|entry| entry.message.clone())
    }

    pub fn clear(&self) {
        self.entries().clear();
    }
}

impl log::Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= *self.level.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let entry = LogEntry {
                timestamp: Local::now(),
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            };

            let mut entries = self.entries();
            entries.push(entry);

            if entries.len() > self.max_entries {
                let excess = entries.len() - self.max_entries;
                entries.drain(0..excess);
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    fn record(logger: &AppLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("pdf_sign")
                .args(format_args!("{message}"))
                .build(),
        );
    }

    #[test]
    fn keeps_only_most_recent_entries() {
        let logger = AppLogger::new(2);
        record(&logger, Level::Info, "one");
        record(&logger, Level::Info, "two");
        record(&logger, Level::Info, "three");
        let messages: Vec<_> = logger.get_entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, ["two", "three"]);
    }

    #[test]
    fn filters_below_level_and_reports_problems() {
        let logger = AppLogger::new(10);
        record(&logger, Level::Debug, "hidden");
        record(&logger, Level::Warn, "font missing");
        record(&logger, Level::Info, "loaded");
        assert_eq!(logger.get_entries().len(), 2);
        assert_eq!(logger.latest_problem().as_deref(), Some("font missing"));
        logger.clear();
        assert!(logger.latest_problem().is_none());
    }
}
