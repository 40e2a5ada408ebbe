//! Run configuration.
//!
//! Everything a dataset release needs (grid file, tracer sources, unit
//! scales, sediment parameters, provenance) lives in one explicit
//! [`RunConfig`] record, read from TOML and passed down to the pipeline.
//!
//! # Example
//!
//! ```
//! use bgc_inputs::config::RunConfig;
//!
//! let config = RunConfig::from_toml_str(r#"
//!     [grid]
//!     path = "grid.nc"
//!     name = "gx1v7"
//!
//!     [output]
//!     path = "ic.nc"
//!
//!     [[tracers]]
//!     name = "NO3"
//!     source_path = "woa18_n.nc"
//!     source_variable = "n_an"
//!     units = "mmol/m^3"
//!     scale = 1.026
//! "#)?;
//!
//! assert_eq!(config.tracers[0].name, "NO3");
//! assert_eq!(config.fill.max_sweeps, 1000);
//! # Ok::<(), bgc_inputs::config::ConfigError>(())
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sediment::SedimentConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values are syntactically fine but unusable
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub grid: GridInput,
    pub output: OutputConfig,
    #[serde(default)]
    pub provenance: ProvenanceConfig,
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub tracers: Vec<TracerSpec>,
    #[serde(default)]
    pub sediment: Option<SedimentInput>,
}

/// Destination grid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridInput {
    /// Path to the grid NetCDF file
    pub path: PathBuf,
    /// Grid name used in metadata and messages
    #[serde(default = "default_grid_name")]
    pub name: String,
    /// Tripolar flag; read from the grid file when absent
    #[serde(default)]
    pub tripolar: Option<bool>,
}

/// Output dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file path
    pub path: PathBuf,
    /// Title attribute
    #[serde(default)]
    pub title: Option<String>,
    /// Institution attribute
    #[serde(default)]
    pub institution: Option<String>,
    /// Free-form comment attribute
    #[serde(default)]
    pub comment: Option<String>,
}

/// Provenance recorded in the output `history` attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvenanceConfig {
    /// Source repository identifier
    pub source_repo: String,
    /// Commit hash of the generating code
    pub commit: String,
}

impl Default for ProvenanceConfig {
    fn default() -> Self {
        Self {
            source_repo: env!("CARGO_PKG_NAME").to_string(),
            commit: "unknown".to_string(),
        }
    }
}

/// Lateral fill settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Maximum lateral fill sweeps per level
    pub max_sweeps: usize,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self { max_sweeps: 1000 }
    }
}

/// One tracer to regrid and fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracerSpec {
    /// Output variable name
    pub name: String,
    /// Source climatology file
    pub source_path: PathBuf,
    /// Variable name in the source file
    pub source_variable: String,
    /// Output units
    pub units: String,
    /// Long name attribute
    #[serde(default)]
    pub long_name: Option<String>,
    /// Multiplicative unit conversion applied after regridding
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl TracerSpec {
    /// Create a tracer spec with unit scale 1.
    pub fn new(
        name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        source_variable: impl Into<String>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
            source_variable: source_variable.into(),
            units: units.into(),
            long_name: None,
            scale: 1.0,
        }
    }

    /// Set the unit conversion factor.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the long name attribute.
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }
}

/// Precomputed sediment fraction input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SedimentInput {
    /// Sediment fraction file on the destination grid
    pub path: PathBuf,
    /// Variable name in that file
    #[serde(default = "default_sedfrac_variable")]
    pub variable: String,
    #[serde(flatten)]
    pub params: SedimentConfig,
}

fn default_grid_name() -> String {
    "unnamed".to_string()
}

fn default_scale() -> f64 {
    1.0
}

fn default_sedfrac_variable() -> String {
    "sedfrac".to_string()
}

impl RunConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check values the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for tracer in &self.tracers {
            if tracer.name.is_empty() {
                return Err(ConfigError::Invalid("tracer with empty name".to_string()));
            }
            if !seen.insert(tracer.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate tracer '{}'", tracer.name)));
            }
            if !tracer.scale.is_finite() || tracer.scale == 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "tracer '{}' has unusable scale {}",
                    tracer.name, tracer.scale
                )));
            }
        }

        if let Some(sediment) = &self.sediment {
            let floor = sediment.params.land_adj_sedfrac_min;
            if !(0.0..=1.0).contains(&floor) {
                return Err(ConfigError::Invalid(format!(
                    "land_adj_sedfrac_min must lie in [0, 1], got {floor}"
                )));
            }
        }

        if self.fill.max_sweeps == 0 {
            return Err(ConfigError::Invalid("fill.max_sweeps must be positive".to_string()));
        }

        Ok(())
    }

    /// Every input file the run reads, in reading order.
    pub fn input_files(&self) -> Vec<PathBuf> {
        let mut files = vec![self.grid.path.clone()];
        files.extend(self.tracers.iter().map(|t| t.source_path.clone()));
        if let Some(sediment) = &self.sediment {
            files.push(sediment.path.clone());
        }
        files
    }
}
