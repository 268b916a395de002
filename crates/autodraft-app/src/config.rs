// Configuration loading and validation.

use autodraft_core::api::PredictionSettings;
use autodraft_core::draft::RosterRequirements;
use autodraft_core::simulation::SimulationConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error in {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to copy default config: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Public config
// ---------------------------------------------------------------------------

/// Fully loaded server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub ws_port: u16,
    pub simulation: SimulationSettings,
    /// Roster shape used for sample drafts.
    pub roster: RosterRequirements,
    pub data_paths: DataPaths,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    pub default_trials: u32,
    pub max_trials: u32,
    pub default_team_variability: f64,
    pub max_simulated_picks: u32,
    /// Fixed RNG seed. Entropy is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationSettings {
    pub fn prediction_settings(&self) -> PredictionSettings {
        PredictionSettings {
            default_trials: self.default_trials,
            max_trials: self.max_trials,
            simulation: SimulationConfig {
                max_picks: self.max_simulated_picks,
                default_team_variability: self.default_team_variability,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataPaths {
    /// Rankings CSV for sample drafts, relative to the working directory.
    #[serde(default)]
    pub rankings: Option<String>,
}

// ---------------------------------------------------------------------------
// server.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ServerFile {
    server: ServerSection,
    simulation: SimulationSettings,
    #[serde(default)]
    roster: RosterRequirements,
    #[serde(default)]
    data_paths: DataPaths,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    port: u16,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/server.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let server_path = base_dir.join("config").join("server.toml");
    let text = read_file(&server_path)?;
    let file: ServerFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: server_path.clone(),
        source: e,
    })?;

    let config = Config {
        ws_port: file.server.port,
        simulation: file.simulation,
        roster: file.roster,
        data_paths: file.data_paths,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/` from the shipped `defaults/` directory.
///
/// Each regular file in `defaults/` without a counterpart in `config/` is
/// copied across, in file-name order. Existing files are left untouched and
/// `.example` templates are skipped. Returns the paths that were created.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            debug!("No defaults/ in {}; using config/ as is", base_dir.display());
            return Ok(Vec::new());
        }
        return Err(copy_error(format!(
            "neither defaults/ nor config/ directory found in {}; \
             run from the crate root or ensure defaults/ is present",
            base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_error(format!("failed to create config directory: {e}")))?;

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(&defaults_dir)
        .map_err(|e| copy_error(format!("failed to read defaults directory: {e}")))?
    {
        let path = entry
            .map_err(|e| copy_error(format!("failed to read defaults entry: {e}")))?
            .path();
        let is_template = path.extension().is_some_and(|ext| ext == "example");
        if path.is_file() && !is_template {
            sources.push(path);
        }
    }
    sources.sort();

    let mut copied = Vec::new();
    for source in sources {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);
        if copy_if_missing(&source, &target)? {
            info!("Created {} from {}", target.display(), source.display());
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Copy `source` to `target` unless `target` already exists. Returns whether
/// a copy was made.
fn copy_if_missing(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(copy_error(format!(
                "failed to create {}: {e}",
                target.display()
            )))
        }
    };
    let mut src = std::fs::File::open(source)
        .map_err(|e| copy_error(format!("failed to read {}: {e}", source.display())))?;
    std::io::copy(&mut src, &mut dest)
        .map_err(|e| copy_error(format!("failed to write {}: {e}", target.display())))?;
    Ok(true)
}

/// Load config relative to the current working directory, copying defaults
/// into `config/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn copy_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.ws_port == 0 {
        return Err(invalid("server.port", "must be greater than 0".into()));
    }

    let sim = &config.simulation;
    if sim.default_trials == 0 {
        return Err(invalid("simulation.default_trials", "must be > 0".into()));
    }
    if sim.default_trials > sim.max_trials {
        return Err(invalid(
            "simulation.default_trials",
            format!(
                "must not exceed max_trials ({}), got {}",
                sim.max_trials, sim.default_trials
            ),
        ));
    }
    let v = sim.default_team_variability;
    if !(0.0..=1.0).contains(&v) {
        return Err(invalid(
            "simulation.default_team_variability",
            format!("must be between 0.0 and 1.0 inclusive, got {v}"),
        ));
    }
    if sim.max_simulated_picks == 0 {
        return Err(invalid("simulation.max_simulated_picks", "must be > 0".into()));
    }

    if config.roster.total() == 0 {
        return Err(invalid("roster", "must define at least one slot".into()));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
