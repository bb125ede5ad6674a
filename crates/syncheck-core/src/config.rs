//! Configuration for query evaluation and verdict output.
//!
//! Load order: explicit path or `.syncheck/config.toml` → environment variables → defaults.
//! Command-line flags are applied on top by the caller.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const CONFIG_DIR: &str = ".syncheck";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncheckConfig {
    pub evaluation: EvaluationConfig,
    pub output: OutputConfig,
}

/// Query evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Query blocks at least this large are evaluated on the rayon pool.
    /// 0 keeps every block sequential.
    pub parallel_threshold: usize,
}

/// Verdict output settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// How verdicts are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One bare `synonyms` / `different` per line.
    #[default]
    Text,
    /// One JSON object per query.
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "jsonl" | "json" => Ok(Self::Jsonl),
            other => Err(format!(
                "unknown output format '{}' (expected text or jsonl)",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Jsonl => "jsonl",
        })
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 4096,
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl SyncheckConfig {
    /// Load config from `explicit` if given (it must exist), otherwise from
    /// `.syncheck/config.toml` under `root`, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                anyhow::ensure!(path.exists(), "config file {} not found", path.display());
                path.to_path_buf()
            }
            None => root.join(CONFIG_DIR).join(CONFIG_FILE),
        };

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config {}", config_path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("invalid config {}", config_path.display()))?
        } else {
            Self::default()
        };

        env_override(
            "SYNCHECK_PARALLEL_THRESHOLD",
            &mut config.evaluation.parallel_threshold,
        );
        env_override("SYNCHECK_OUTPUT_FORMAT", &mut config.output.format);

        Ok(config)
    }
}
