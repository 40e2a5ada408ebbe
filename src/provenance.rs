//! Provenance metadata for generated datasets.
//!
//! Every output file carries a `history` attribute naming the generating
//! repository, its commit and a UTC timestamp, and an `input_files`
//! attribute listing what was read.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::ProvenanceConfig;

/// Where a dataset came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    /// Source repository identifier
    pub source_repo: String,
    /// Commit hash of the generating code
    pub commit: String,
    /// Generation time
    pub generated_at: DateTime<Utc>,
    /// Input files in reading order
    pub input_files: Vec<String>,
}

impl Provenance {
    /// Provenance stamped with the current time.
    pub fn new(source_repo: impl Into<String>, commit: impl Into<String>) -> Self {
        Self::at(source_repo, commit, Utc::now())
    }

    /// Provenance stamped with a given time.
    pub fn at(source_repo: impl Into<String>, commit: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        Self {
            source_repo: source_repo.into(),
            commit: commit.into(),
            generated_at,
            input_files: Vec::new(),
        }
    }

    /// Provenance from the run configuration, stamped now.
    pub fn from_config(config: &ProvenanceConfig) -> Self {
        Self::new(config.source_repo.clone(), config.commit.clone())
    }

    /// Record an input file.
    pub fn with_input(mut self, path: impl AsRef<Path>) -> Self {
        self.add_input(path);
        self
    }

    /// Record an input file.
    pub fn add_input(&mut self, path: impl AsRef<Path>) {
        self.input_files.push(path.as_ref().display().to_string());
    }

    /// Value of the `history` attribute.
    pub fn history(&self) -> String {
        format!(
            "{}: Created by {} (commit {})",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.source_repo,
            self.commit
        )
    }

    /// Value of the `input_files` attribute.
    pub fn input_files_attribute(&self) -> String {
        self.input_files.join(", ")
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.history())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_history_string() {
        let when = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let prov = Provenance::at("github.com/ocean/bgc-inputs", "1a2b3c4", when);
        assert_eq!(
            prov.history(),
            "2024-03-01 12:30:00 UTC: Created by github.com/ocean/bgc-inputs (commit 1a2b3c4)"
        );
    }

    #[test]
    fn test_input_files() {
        let prov = Provenance::new("repo", "abc")
            .with_input("grid.nc")
            .with_input("woa18_n.nc");
        assert_eq!(prov.input_files, vec!["grid.nc", "woa18_n.nc"]);
        assert_eq!(prov.input_files_attribute(), "grid.nc, woa18_n.nc");
    }

    #[test]
    fn test_from_config_defaults() {
        let prov = Provenance::from_config(&ProvenanceConfig::default());
        assert_eq!(prov.commit, "unknown");
        assert!(prov.input_files.is_empty());
    }
}
