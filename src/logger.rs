//! log4rs setup.
//!
//! Stdout carries the tool protocol, so logs go either to rolling files or to stderr, never to
//! stdout. Tool invocations are recorded under the `movielite::audit` target.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::append::rolling_file::policy::compound::{
    CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
};
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::path::Path;

use crate::utils::devlog::DEV6_TARGET;

pub const AUDIT_TARGET: &str = "movielite::audit";
const ENC_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
const ROLL_SIZE: u64 = 10 * 1024 * 1024;

#[must_use]
pub fn parse_level(level: Option<&str>) -> LevelFilter {
    match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn rolling(
    dir: &Path,
    stem: &str,
    keep: u32,
) -> Result<RollingFileAppender, Box<dyn std::error::Error>> {
    let roller = FixedWindowRoller::builder()
        .build(&format!("{}", dir.join(format!("{stem}.{{}}.log")).display()), keep)?;
    let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(ROLL_SIZE)), Box::new(roller));
    Ok(RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(ENC_PATTERN)))
        .build(dir.join(format!("{stem}.log")), Box::new(policy))?)
}

/// Builds the logging configuration without installing it.
/// - dir: base directory for `app.log`/`audit.log`; if None, everything goes to stderr.
/// - level: off|error|warn|info|debug|trace
/// - retention: number of rolled files to keep (default 7)
/// - `enable_dev6`: route query timing lines to the app output at trace level
///
/// # Errors
/// Returns an error if the log directory cannot be created or an appender fails to build.
pub fn build_config(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
    enable_dev6: bool,
) -> Result<Config, Box<dyn std::error::Error>> {
    let lvl = parse_level(level);
    let dev6_level = if enable_dev6 { LevelFilter::Trace } else { LevelFilter::Off };
    let mut builder = Config::builder();
    let mut audit = Logger::builder();
    if let Some(dir) = dir {
        std::fs::create_dir_all(dir)?;
        let keep = u32::try_from(retention.unwrap_or(7)).unwrap_or(7);
        builder = builder
            .appender(Appender::builder().build("app", Box::new(rolling(dir, "app", keep)?)))
            .appender(Appender::builder().build("audit", Box::new(rolling(dir, "audit", keep)?)));
        audit = audit.appender("audit").additive(false);
    } else {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new(ENC_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("app", Box::new(stderr)));
    }
    let config = builder
        .logger(audit.build(AUDIT_TARGET, lvl))
        .logger(Logger::builder().build(DEV6_TARGET, dev6_level))
        .build(Root::builder().appender("app").build(lvl))?;
    Ok(config)
}

/// Configure logging globally for the process. Later calls are ignored once a logger is set.
///
/// # Errors
/// Returns an error if the configuration cannot be built.
pub fn configure_logging(
    dir: Option<&Path>,
    level: Option<&str>,
    retention: Option<usize>,
    enable_dev6: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(dir, level, retention, enable_dev6)?;
    let _ = log4rs::init_config(config);
    Ok(())
}

/// Rolled-file count from `MOVIELITE_LOG_RETENTION`; unset or unparsable values fall back to
/// the default.
#[must_use]
pub fn retention_from_env() -> Option<usize> {
    parse_retention(std::env::var("MOVIELITE_LOG_RETENTION").ok().as_deref())
}

fn parse_retention(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok()).filter(|n| *n > 0)
}

#[must_use]
pub fn dev6_from_env() -> bool {
    std::env::var("MOVIELITE_DEV6")
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level(None), LevelFilter::Info);
        assert_eq!(parse_level(Some("DEBUG")), LevelFilter::Debug);
        assert_eq!(parse_level(Some("bogus")), LevelFilter::Info);
    }

    #[test]
    fn retention_values() {
        assert_eq!(parse_retention(Some("3")), Some(3));
        assert_eq!(parse_retention(Some(" 12 ")), Some(12));
        assert_eq!(parse_retention(Some("0")), None);
        assert_eq!(parse_retention(Some("many")), None);
        assert_eq!(parse_retention(None), None);
    }

    #[test]
    fn file_config_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let cfg = build_config(Some(&logs), Some("warn"), Some(3), false).unwrap();
        assert!(logs.is_dir());
        assert_eq!(cfg.appenders().len(), 2);
        assert_eq!(cfg.root().level(), LevelFilter::Warn);
    }

    #[test]
    fn stderr_config_without_directory() {
        let cfg = build_config(None, None, None, true).unwrap();
        assert_eq!(cfg.appenders().len(), 1);
        assert!(cfg.loggers().iter().any(|l| l.name() == DEV6_TARGET));
    }
}
