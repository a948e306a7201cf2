//! Repository configuration (`.restash.toml`).
//!
//! Defines the typed configuration read from the repository root, covering
//! the git invocation deadline, default save layers, and confirmation
//! behavior. Missing file → all defaults (no error); unknown fields are
//! rejected with line-level detail.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// File name probed at the repository root.
pub const CONFIG_FILE: &str = ".restash.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level restash configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestashConfig {
    /// Git invocation settings.
    #[serde(default)]
    pub git: GitConfig,

    /// Save defaults.
    #[serde(default)]
    pub save: SaveConfig,

    /// Prompt before destructive or multi-step operations (drop, merge).
    /// Default: true.
    #[serde(default = "default_confirm")]
    pub confirm: bool,
}

impl Default for RestashConfig {
    fn default() -> Self {
        Self {
            git: GitConfig::default(),
            save: SaveConfig::default(),
            confirm: default_confirm(),
        }
    }
}

const fn default_confirm() -> bool {
    true
}

// ---------------------------------------------------------------------------
// GitConfig
// ---------------------------------------------------------------------------

/// Git invocation settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitConfig {
    /// Hard deadline for each git invocation, in seconds (default: 60).
    /// A child that outlives it is killed and the operation fails.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

const fn default_timeout_seconds() -> u64 {
    60
}

impl GitConfig {
    /// The deadline as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

// ---------------------------------------------------------------------------
// SaveConfig
// ---------------------------------------------------------------------------

/// Save defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveConfig {
    /// Capture untracked files by default (default: true). The `-u` flag on
    /// `restash save` forces it on for one invocation.
    #[serde(default = "default_include_untracked")]
    pub include_untracked: bool,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            include_untracked: default_include_untracked(),
        }
    }
}

const fn default_include_untracked() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Error loading a restash configuration file.
#[derive(Debug)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<std::path::PathBuf>,
    /// Human-readable message with line-level detail when possible.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl RestashConfig {
    /// Load configuration from `<repo_root>/.restash.toml`.
    ///
    /// # Errors
    /// Returns `ConfigError` on I/O errors (other than not-found) or parse
    /// errors; a missing file yields all defaults.
    pub fn load(repo_root: &Path) -> Result<Self, ConfigError> {
        let path = repo_root.join(CONFIG_FILE);
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError {
                    path: Some(path),
                    message: format!("could not read file: {e}"),
                });
            }
        };
        Self::parse(&contents).map_err(|mut e| {
            e.path = Some(path);
            e
        })
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML or unknown fields.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start]
                    .chars()
                    .filter(|&c| c == '\n')
                    .count()
                    + 1;
                message = format!("line {line}: {message}");
            }
            ConfigError {
                path: None,
                message,
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
