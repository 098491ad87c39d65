//! Logger initialization.
//!
//! Logs always go to stderr so the JSON report on stdout stays machine-readable.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};
use colored::*;
use log::{Level, LevelFilter};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies clamped regardless of the requested level: the HTML parser and
/// the HTTP stack log per element / per connection at debug.
const QUIET_MODULES: &[(&str, LevelFilter)] = &[
    ("html5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first; `level` then overrides it, so `RUST_LOG=debug` works for
/// quick debugging while `--log-level` keeps explicit control.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a global logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug seo_audit https://example.com
/// seo_audit https://example.com --log-level debug --log-format json
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, cap) in QUIET_MODULES {
        builder.filter_module(module, (*cap).min(level));
    }
    builder.filter_module("seo_audit", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let message = record.args().to_string();
                let line = json_line(Utc::now(), record.level(), record.target(), &message);
                writeln!(buf, "{line}")
            });
        }
        LogFormat::Plain => {
            // stdout is usually piped into a file or jq; stderr is still a terminal
            colored::control::set_override(true);
            builder.format(|buf, record| {
                let message = record.args().to_string();
                writeln!(buf, "{}", plain_line(record.level(), record.target(), &message))
            });
        }
    }

    builder.target(env_logger::Target::Stderr);
    builder.try_init().map_err(InitializationError::from)?;
    Ok(())
}

/// One JSON object per line; `ts` is RFC 3339 with milliseconds, like report timestamps.
fn json_line(ts: DateTime<Utc>, level: Level, target: &str, message: &str) -> String {
    serde_json::json!({
        "ts": ts.to_rfc3339_opts(SecondsFormat::Millis, true),
        "level": level.as_str(),
        "target": target,
        "msg": message,
    })
    .to_string()
}

/// `LEVEL module: message`, with the crate prefix dropped from this crate's targets.
fn plain_line(level: Level, target: &str, message: &str) -> String {
    let tag = format!("{:<5}", level.as_str());
    let tag = match level {
        Level::Error => tag.red().bold(),
        Level::Warn => tag.yellow(),
        Level::Info => tag.green(),
        Level::Debug => tag.blue(),
        Level::Trace => tag.purple(),
    };
    let module = target.strip_prefix("seo_audit::").unwrap_or(target);
    format!("{} {}: {}", tag, module.cyan(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_json_line_uses_iso_timestamp_and_escapes_message() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let target = "seo_audit::analysis::stages";
        let line = json_line(ts, Level::Warn, target, "robots \"degraded\"\n");
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["ts"], "2023-11-14T22:13:20.123Z");
        assert_eq!(parsed["level"], "WARN");
        assert_eq!(parsed["target"], target);
        assert_eq!(parsed["msg"], "robots \"degraded\"\n");
        assert!(!line.contains('\n'));
    }

    fn strip_ansi(line: &str) -> String {
        regex::Regex::new("\x1b\\[[0-9;]*m")
            .unwrap()
            .replace_all(line, "")
            .into_owned()
    }

    #[test]
    fn test_plain_line_shortens_own_targets() {
        assert_eq!(
            strip_ansi(&plain_line(Level::Info, "seo_audit::analysis::analyzer", "Cache hit")),
            "INFO  analysis::analyzer: Cache hit"
        );
        assert_eq!(
            strip_ansi(&plain_line(Level::Error, "hyper_util::client", "boom")),
            "ERROR hyper_util::client: boom"
        );
    }

    // env_logger installs a process-wide logger, so only the first call can succeed.
    #[test]
    fn test_second_initialization_is_an_error_not_a_panic() {
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Json);
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Plain);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}
