//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// What to do with the rest of a batch once one session is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first violation in any session.
    #[default]
    Abort,
    /// Report every session on its own.
    Isolate,
}

impl FailurePolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Isolate => "isolate",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "isolate" => Ok(Self::Isolate),
            _ => Err(format!("invalid failure policy: {s}")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Batch behaviour when a session fails verification.
    pub failure_policy: FailurePolicy,

    /// Rebuild isolated sessions on the rayon thread pool.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Abort,
            parallel: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (RUMCHECK_*)
        figment = figment.merge(Env::prefixed("RUMCHECK_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for rumcheck.
///
/// On Linux: `~/.config/rumcheck`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("rumcheck"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_rumcheck() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "rumcheck");
    }

    #[test]
    fn test_default_config_aborts_and_runs_parallel() {
        let config = Config::default();
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert!(config.parallel);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("rumcheck.toml");
        std::fs::write(&path, "failure_policy = \"isolate\"\nparallel = false\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
        assert!(!config.parallel);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("rumcheck.toml");
        std::fs::write(&path, "failure_policy = \"retry\"\n").unwrap();

        assert!(Config::load_from(Some(&path)).is_err());
    }

    #[test]
    fn test_failure_policy_from_str() {
        assert_eq!("abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::Abort);
        assert_eq!(
            "isolate".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Isolate
        );
        assert!("skip".parse::<FailurePolicy>().is_err());
    }
}
