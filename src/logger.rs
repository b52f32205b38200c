//! The diagnostic logger.
//!
//! Messages go to the diagnostic stream (stderr), colored by severity. The
//! threshold comes from the `LOG_LEVEL` environment variable (`DEBUG`,
//! `WARNING` or `ERROR`, default `ERROR`).

use std::{
    str::FromStr,
    sync::{LazyLock, Mutex},
};

use colored::Colorize;

#[derive(PartialEq, PartialOrd)]
pub enum LogLevel {
    Debug = 0,
    Warning = 1,
    Error = 2,
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {s}")),
        }
    }
}

/// A very simple logger.
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    fn new() -> Self {
        let level = std::env::var("LOG_LEVEL")
            .unwrap_or_else(|_| "ERROR".into())
            .parse()
            .unwrap_or(LogLevel::Error);
        Logger { level }
    }

    fn set_log_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    fn debug(&mut self, msg: String) {
        if self.level <= LogLevel::Debug {
            eprintln!("{}", format!("[DEBUG] {msg}").blue());
        }
    }

    fn warning(&mut self, msg: String) {
        if self.level <= LogLevel::Warning {
            eprintln!("{}", format!("[WARNING] {msg}").yellow());
        }
    }

    fn error(&mut self, msg: String) {
        if self.level <= LogLevel::Error {
            eprintln!("{}", format!("[ERROR] {msg}").red());
        }
    }
}

pub static LOGGER: LazyLock<Mutex<Logger>> = LazyLock::new(|| Mutex::new(Logger::new()));

pub fn log_debug<T>(msg: T)
where
    T: ToString,
{
    LOGGER.lock().unwrap().debug(msg.to_string());
}

pub fn log_warning<T>(msg: T)
where
    T: ToString,
{
    LOGGER.lock().unwrap().warning(msg.to_string());
}

pub fn log_error<T>(msg: T)
where
    T: ToString,
{
    LOGGER.lock().unwrap().error(msg.to_string());
}

pub fn set_log_level(level: LogLevel) {
    LOGGER.lock().unwrap().set_log_level(level);
}

/// Report a fatal condition and terminate with a failure status. Every error
/// the interpreter detects ends up here; there is no recovery.
pub fn fatal<T>(msg: T) -> !
where
    T: ToString,
{
    log_error(msg);
    std::process::exit(1);
}

#[test]
fn test_logger() {
    let mut logger = Logger::new();
    logger.set_log_level(LogLevel::Debug);
    logger.debug("This is a debug message".to_string());
    logger.warning("This is a warning message".to_string());
    logger.error("This is an error message".to_string());
    logger.set_log_level(LogLevel::Warning);
    logger.debug("This debug message should not be printed".to_string());
    logger.warning("This is another warning message".to_string());
}
