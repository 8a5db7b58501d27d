//! Runner configuration
//!
//! Sources, later ones winning:
//! 1. `RunnerConfig::default()`
//! 2. JSON file named by `TIMESHIFT_CONFIG`
//! 3. `TIMESHIFT_*` environment variables
//!
//! The environment is passed in as a lookup function so callers (and tests)
//! decide where values come from.

use serde::Deserialize;
use std::fs;
use std::str::FromStr;
use timeshift_instrument::{LoggedCallConfig, ProfilingThresholds};

use crate::error::{RunnerError, RunnerResult};

pub const CONFIG_FILE_VAR: &str = "TIMESHIFT_CONFIG";
pub const START_AT_VAR: &str = "TIMESHIFT_START_AT";
pub const OFFSET_VAR: &str = "TIMESHIFT_OFFSET_MS";
pub const EXPIRES_AT_VAR: &str = "TIMESHIFT_EXPIRES_AT";
pub const SLOW_VAR: &str = "TIMESHIFT_SLOW_MS";
pub const POTENTIAL_ISSUE_VAR: &str = "TIMESHIFT_POTENTIAL_ISSUE_MS";
pub const NEEDS_ATTENTION_VAR: &str = "TIMESHIFT_NEEDS_ATTENTION_MS";

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// ISO-like start time (`2024-01-15T10:30:00`, `10:30:00` or `2024-01-15`)
    pub start_at: Option<String>,
    /// Shift from real time, used when `start_at` is not set
    pub offset_millis: Option<i64>,
    /// RFC 3339 expiry instant for the sample expiry check
    pub expires_at: Option<String>,
    /// Profiler thresholds
    pub profiling: ProfilingThresholds,
    /// Logged call settings
    pub logged: LoggedCallConfig,
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            start_at: None,
            offset_millis: None,
            expires_at: None,
            profiling: ProfilingThresholds::default(),
            logged: LoggedCallConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> RunnerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load defaults, then the config file, then the environment overrides
    pub fn load<F>(lookup: F) -> RunnerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_FILE_VAR) {
            Some(path) => Self::from_json(&fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Apply `TIMESHIFT_*` overrides
    pub fn apply_overrides<F>(&mut self, lookup: F) -> RunnerResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(start_at) = lookup(START_AT_VAR) {
            self.start_at = Some(start_at);
        }
        if let Some(expires_at) = lookup(EXPIRES_AT_VAR) {
            self.expires_at = Some(expires_at);
        }
        if let Some(offset) = parse_var(&lookup, OFFSET_VAR)? {
            self.offset_millis = Some(offset);
        }
        if let Some(slow) = parse_var(&lookup, SLOW_VAR)? {
            self.profiling.slow_millis = slow;
        }
        if let Some(potential) = parse_var(&lookup, POTENTIAL_ISSUE_VAR)? {
            self.profiling.potential_issue_millis = potential;
        }
        if let Some(attention) = parse_var(&lookup, NEEDS_ATTENTION_VAR)? {
            self.profiling.needs_attention_millis = attention;
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> RunnerResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RunnerError::InvalidValue {
                key: key.to_string(),
                value,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::load(env(&[])).unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.profiling.slow_millis, 5);
    }

    #[test]
    fn test_env_overrides() {
        let config = RunnerConfig::load(env(&[
            (START_AT_VAR, "2024-01-15"),
            (OFFSET_VAR, "-86400000"),
            (SLOW_VAR, " 7 "),
            (NEEDS_ATTENTION_VAR, "900"),
        ]))
        .unwrap();

        assert_eq!(config.start_at.as_deref(), Some("2024-01-15"));
        assert_eq!(config.offset_millis, Some(-86_400_000));
        assert_eq!(config.profiling.slow_millis, 7);
        assert_eq!(config.profiling.potential_issue_millis, 100);
        assert_eq!(config.profiling.needs_attention_millis, 900);
    }

    #[test]
    fn test_bad_number_is_reported() {
        let err = RunnerConfig::load(env(&[(OFFSET_VAR, "soon")])).unwrap_err();
        match err {
            RunnerError::InvalidValue { key, value } => {
                assert_eq!(key, OFFSET_VAR);
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_then_env() {
        let path = std::env::temp_dir()
            .join(format!("timeshift-config-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{ "start_at": "10:30:00", "profiling": {{ "slow_millis": 2 }}, "logged": {{ "level": "info" }} }}"#
        )
        .unwrap();
        drop(file);

        let path_str = path.to_string_lossy().to_string();
        let config = RunnerConfig::load(env(&[
            (CONFIG_FILE_VAR, path_str.as_str()),
            (START_AT_VAR, "2024-01-15T10:30:00"),
        ]))
        .unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.start_at.as_deref(), Some("2024-01-15T10:30:00"));
        assert_eq!(config.profiling.slow_millis, 2);
        assert_eq!(config.logged.level, timeshift_instrument::CallLogLevel::Info);
    }

    #[test]
    fn test_missing_file() {
        let err = RunnerConfig::load(env(&[(CONFIG_FILE_VAR, "/nonexistent/timeshift.json")]))
            .unwrap_err();
        assert!(matches!(err, RunnerError::Io(_)));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            RunnerConfig::from_json("{ not json"),
            Err(RunnerError::Json(_))
        ));
    }
}
