use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

static INIT: OnceCell<()> = OnceCell::new();

const DEFAULT_FILTER: &str = "warn";
const DEFAULT_LOG_FILE: &str = "uigen.logs.jsonl";

fn parse_bool_env(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "enabled" => Some(true),
        "0" | "false" | "no" | "off" | "disabled" => Some(false),
        _ => None,
    }
}

/// Logging settings resolved from `UIGEN_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub enabled: bool,
    /// `EnvFilter` directive; `None` defers to `RUST_LOG`, then `warn`.
    pub filter: Option<String>,
    /// JSONL destination; `None` logs compact lines to stderr.
    pub json_log_path: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = ["UIGEN_OBSERVABILITY_ENABLED", "UIGEN_OBSERVABILITY"]
            .into_iter()
            .find_map(|key| lookup(key))
            .map_or(true, |value| parse_bool_env(&value).unwrap_or(true));
        Self {
            enabled,
            filter: lookup("UIGEN_LOG_LEVEL").filter(|v| !v.trim().is_empty()),
            json_log_path: lookup("UIGEN_JSON_LOG_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        if let Some(level) = &self.filter
            && let Ok(filter) = tracing_subscriber::EnvFilter::try_new(level)
        {
            return filter;
        }
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize tracing once per process from the environment.
///
/// Environment variables:
/// - `UIGEN_OBSERVABILITY_ENABLED` / `UIGEN_OBSERVABILITY`: optional enable/disable flag (default enabled).
/// - `UIGEN_LOG_LEVEL`: optional level/filter override (`info`, `debug`, etc.).
/// - `UIGEN_JSON_LOG_PATH`: optional log file path. If set, logs are JSONL in that file.
///   If unset, logs go to stderr so stdout stays free for command output.
/// - `RUST_LOG`: optional filter override.
pub fn init_observability() {
    init_with(&LogConfig::from_env());
}

/// Like [`init_observability`] with explicit settings. Later calls are no-ops.
pub fn init_with(config: &LogConfig) {
    INIT.get_or_init(|| {
        if !config.enabled {
            return;
        }

        let env_filter = config.env_filter();
        match &config.json_log_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    let _ = std::fs::create_dir_all(parent);
                }
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(DEFAULT_LOG_FILE);
                let writer = tracing_appender::rolling::never(dir, file_name);
                let json_layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(false)
                    .with_writer(writer);
                let _ = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(json_layer)
                    .try_init();
            }
            None => {
                let console_layer = tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr);
                let _ = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(console_layer)
                    .try_init();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn parses_common_boolean_spellings() {
        assert_eq!(parse_bool_env(" Yes "), Some(true));
        assert_eq!(parse_bool_env("off"), Some(false));
        assert_eq!(parse_bool_env("maybe"), None);
    }

    #[test]
    fn defaults_to_enabled_console_logging() {
        assert_eq!(
            config(&[]),
            LogConfig {
                enabled: true,
                filter: None,
                json_log_path: None,
            }
        );
    }

    #[test]
    fn reads_uigen_variables() {
        let cfg = config(&[
            ("UIGEN_OBSERVABILITY", "off"),
            ("UIGEN_LOG_LEVEL", "debug"),
            ("UIGEN_JSON_LOG_PATH", "logs/run.jsonl"),
        ]);
        assert!(!cfg.enabled);
        assert_eq!(cfg.filter.as_deref(), Some("debug"));
        assert_eq!(cfg.json_log_path, Some(PathBuf::from("logs/run.jsonl")));
    }

    #[test]
    fn unparseable_flag_keeps_logging_on() {
        assert!(config(&[("UIGEN_OBSERVABILITY_ENABLED", "sometimes")]).enabled);
    }
}
