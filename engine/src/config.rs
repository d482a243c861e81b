use serde::Deserialize;
use std::{env, path::Path, path::PathBuf, time::Duration};
use thiserror::Error;

/// Environment variable that overrides [`SolverConfig::seed`].
pub const SEED_ENV: &str = "SWITCHYARD_SEED";

/// Tuning for the counter optimizer.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change:
///
/// ```toml
/// seed = 42
///
/// [randomized]
/// attempts = 16
///
/// [deepening]
/// per_depth_timeout_ms = 500
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Seed for retraction and the randomized strategies. `None` draws a
    /// fresh seed for every solve.
    pub seed: Option<u64>,
    /// Keep running randomized strategies after a deterministic one has
    /// already solved the system, looking for fewer presses.
    pub refine: bool,
    pub greedy: GreedyConfig,
    pub weights: ScoreWeights,
    pub randomized: RandomizedConfig,
    pub deepening: DeepeningConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GreedyConfig {
    pub iteration_base: u64,
    /// Extra iterations allowed per unit of total target.
    pub iteration_per_unit: u64,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            iteration_base: 10_000,
            iteration_per_unit: 50,
        }
    }
}

impl GreedyConfig {
    /// Iterations (presses plus retractions) one attempt may spend.
    #[must_use]
    pub fn iteration_cap(&self, target_total: u64) -> u64 {
        self.iteration_base
            .saturating_add(self.iteration_per_unit.saturating_mul(target_total))
    }
}

/// Empirically tuned scoring constants. They are defaults, not derived
/// optima.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Subtracted per touched counter whose need is exactly 1.
    pub tight_penalty: f64,
    /// Subtracted per counter that would be left with positive need and no
    /// usable button after the press.
    pub strand_penalty: f64,
    /// Exponent applied to a counter's remaining fraction in the ratio rule.
    pub ratio_exponent: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            tight_penalty: 5.0,
            strand_penalty: 20.0,
            ratio_exponent: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RandomizedConfig {
    /// Attempts per randomized strategy in the first escalation round.
    pub attempts: u32,
    /// Attempt multiplier between escalation rounds.
    pub escalation_factor: u32,
    pub escalation_rounds: u32,
    /// Attempts per strategy in the final intensive pass.
    pub intensive_attempts: u32,
    /// Noise amplitude, as a fraction of the best score.
    pub noise: f64,
    /// Exploration probability for epsilon-greedy selection.
    pub epsilon: f64,
    /// Every this many dead ends, the backtracking rule retracts
    /// `backtrack_depth` presses instead of one.
    pub backtrack_period: u32,
    pub backtrack_depth: u32,
    pub initial_temperature: f64,
    /// Multiplicative cooling applied after every press.
    pub cooling: f64,
    pub min_temperature: f64,
    /// Iterations in a row that fail to lower the remaining need before the
    /// restart rule starts over.
    pub restart_window: u64,
    /// Random presses made right after a restart.
    pub restart_prefix: u32,
}

impl Default for RandomizedConfig {
    fn default() -> Self {
        Self {
            attempts: 8,
            escalation_factor: 4,
            escalation_rounds: 2,
            intensive_attempts: 64,
            noise: 0.35,
            epsilon: 0.15,
            backtrack_period: 4,
            backtrack_depth: 3,
            initial_temperature: 4.0,
            cooling: 0.995,
            min_temperature: 0.05,
            restart_window: 200,
            restart_prefix: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeepeningConfig {
    pub per_depth_timeout_ms: u64,
    /// Hard ceiling on the search depth.
    pub max_depth: usize,
    /// Nodes visited between clock checks.
    pub poll_interval: u64,
}

impl Default for DeepeningConfig {
    fn default() -> Self {
        Self {
            per_depth_timeout_ms: 2_000,
            max_depth: 200,
            poll_interval: 1_024,
        }
    }
}

impl DeepeningConfig {
    #[must_use]
    pub fn per_depth_timeout(&self) -> Duration {
        Duration::from_millis(self.per_depth_timeout_ms)
    }
}

impl SolverConfig {
    /// Load `~/.switchyard/config.toml`. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    /// Apply `SWITCHYARD_SEED` if it is set. An unparsable value is ignored
    /// with a warning.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        let raw = env::var(SEED_ENV).ok();
        self.with_seed_override(raw.as_deref())
    }

    fn with_seed_override(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            match raw.trim().parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(err) => tracing::warn!(value = %raw, "Ignoring {SEED_ENV}: {err}"),
            }
        }
        self
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".switchyard").join("config.toml"))
}
