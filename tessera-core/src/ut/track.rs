// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

use chrono;
use colored::*;
use kdam::{Bar, tqdm};

use crate::error::TesseraError;

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Verbosity levels for console logging, ordered from least to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    fn tag(&self) -> ColoredString {
        match self {
            LogLevel::Error => "ERROR".red().bold(),
            LogLevel::Warning => "WARNING".yellow().bold(),
            LogLevel::Info => "INFO".normal(),
            LogLevel::Debug => "DEBUG".dimmed(),
        }
    }

    fn from_u8(value: u8) -> LogLevel {
        match value {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

impl FromStr for LogLevel {
    type Err = TesseraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" | "critical" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "info" | "success" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(TesseraError::ConfigError(format!(
                "Unknown log level {}",
                other
            ))),
        }
    }
}

/// Set the process-wide logging level
pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Current process-wide logging level
pub fn log_level() -> LogLevel {
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Check if messages at a given level are currently emitted
pub fn enabled(level: LogLevel) -> bool {
    level <= log_level()
}

/// A basic progress bar for tracking iterations
pub fn progress_bar(n: usize, desc: &str, verbose: bool) -> Bar {
    if !verbose {
        return tqdm!(disable = true);
    }

    let pb = tqdm!(
        total = n,
        force_refresh = false,
        desc = progress_timestamp(desc),
        bar_format =
            "{desc suffix=' '}[{percentage:.0}%] ({rate:.1}/s, eta: {remaining human=true})"
    );
    pb
}

/// A progress bar with a standardized timestamp for tracking time
pub fn progress_timestamp(desc: &str) -> String {
    let time = chrono::Local::now();
    let ymd = time.format("%Y-%m-%dT").to_string();
    let ymd = &ymd[..ymd.len() - 1];
    let hms = time.format("%H:%M:%S").to_string();
    let time = format!("{} | {}", ymd, hms);

    format!(
        "{} {} {} {} {} {}",
        "[".bold(),
        time,
        "|".bold(),
        "tessera".truecolor(103, 194, 69).bold(),
        "]".bold(),
        desc,
    )
}

/// Print timestamped statements to console
pub fn progress_log(desc: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", progress_timestamp(desc));
}

/// Print a timestamped statement if its level passes the current filter
///
/// Errors and warnings go to stderr so they survive redirected output.
pub fn log(level: LogLevel, desc: &str) {
    if !enabled(level) {
        return;
    }

    let line = progress_timestamp(&format!("{} {}", level.tag(), desc));

    match level {
        LogLevel::Error | LogLevel::Warning => eprintln!("{}", line),
        LogLevel::Info | LogLevel::Debug => println!("{}", line),
    }
}

pub fn error(desc: &str) {
    log(LogLevel::Error, desc);
}

pub fn warning(desc: &str) {
    log(LogLevel::Warning, desc);
}

pub fn info(desc: &str) {
    log(LogLevel::Info, desc);
}

pub fn debug(desc: &str) {
    log(LogLevel::Debug, desc);
}

/// Format numbers to readaable thousands format
pub fn thousands_format<T>(number: T) -> String
where
    T: std::fmt::Display,
{
    let number = number.to_string();
    if number.len() > 4 {
        number
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(std::str::from_utf8)
            .collect::<Result<Vec<&str>, _>>()
            .unwrap_or_default()
            .join(",")
    } else {
        number.to_string()
    }
}
