//! CLI configuration.
//!
//! Settings that apply to every subcommand and are read from the
//! environment. Command-line flags take precedence over these.

use tracing_subscriber::EnvFilter;

/// Environment variable naming the algorithm used when `--algorithm` is
/// not given.
pub const DEFAULT_ALGORITHM_VAR: &str = "TUFSIG_DEFAULT_ALGORITHM";

/// Environment variable holding a tracing filter directive, used when no
/// `-v` flag is given.
pub const LOG_VAR: &str = "TUFSIG_LOG";

/// Environment-derived settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Algorithm name to use when none is given on the command line. When
    /// unset, the algorithm is inferred from the key record.
    pub default_algorithm: Option<String>,
    /// Tracing filter directive, e.g. `"tufsig_crypto=debug"`.
    pub log_filter: Option<String>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TUFSIG_DEFAULT_ALGORITHM` (optional, must not be blank)
    /// - `TUFSIG_LOG` (optional, must be a valid filter directive)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_algorithm = match lookup(DEFAULT_ALGORITHM_VAR) {
            Some(name) if name.trim().is_empty() => {
                return Err(ConfigError::Blank(DEFAULT_ALGORITHM_VAR));
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };

        let log_filter = match lookup(LOG_VAR) {
            Some(directive) => {
                EnvFilter::try_new(&directive).map_err(|e| ConfigError::InvalidLogFilter {
                    directive: directive.clone(),
                    reason: e.to_string(),
                })?;
                Some(directive)
            }
            None => None,
        };

        Ok(Self {
            default_algorithm,
            log_filter,
        })
    }

    /// The tracing filter for the given `-v` count. Any `-v` overrides
    /// `TUFSIG_LOG`; with neither, only warnings are shown.
    pub fn env_filter(&self, verbose: u8) -> EnvFilter {
        match (verbose, &self.log_filter) {
            (0, Some(directive)) => {
                EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"))
            }
            (0, None) => EnvFilter::new("warn"),
            (1, _) => EnvFilter::new("info"),
            (2, _) => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is set but empty")]
    Blank(&'static str),
    #[error("invalid TUFSIG_LOG directive {directive:?}: {reason}")]
    InvalidLogFilter { directive: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tracing_subscriber::filter::LevelFilter;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, CliConfig::default());
    }

    #[test]
    fn default_algorithm_is_trimmed() {
        let cfg =
            CliConfig::from_lookup(lookup(&[(DEFAULT_ALGORITHM_VAR, " ecdsa-sha2-nistp256\n")]))
                .unwrap();
        assert_eq!(cfg.default_algorithm.as_deref(), Some("ecdsa-sha2-nistp256"));
    }

    #[test]
    fn blank_default_algorithm_rejected() {
        let err = CliConfig::from_lookup(lookup(&[(DEFAULT_ALGORITHM_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Blank(DEFAULT_ALGORITHM_VAR)));
    }

    #[test]
    fn log_filter_accepted() {
        let cfg = CliConfig::from_lookup(lookup(&[(LOG_VAR, "tufsig_crypto=debug")])).unwrap();
        assert_eq!(cfg.log_filter.as_deref(), Some("tufsig_crypto=debug"));
    }

    #[test]
    fn invalid_log_filter_rejected() {
        let err = CliConfig::from_lookup(lookup(&[(LOG_VAR, "tufsig_crypto=loud")])).unwrap_err();
        assert!(err.to_string().contains(LOG_VAR));
    }

    #[test]
    fn verbosity_overrides_log_filter() {
        let cfg = CliConfig {
            default_algorithm: None,
            log_filter: Some("error".to_string()),
        };
        assert_eq!(cfg.env_filter(0).max_level_hint(), Some(LevelFilter::ERROR));
        assert_eq!(cfg.env_filter(2).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            CliConfig::default().env_filter(0).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }
}
