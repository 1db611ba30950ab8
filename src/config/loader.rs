//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading scheme
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{CareCostBand, CareCostConfig, RateTable, SchemeConfig, SchemeMetadata};

/// Loads and provides access to the scheme configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query rate tables by assessment year.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/csa/
/// ├── scheme.yaml     # Scheme metadata
/// ├── care_cost.yaml  # Care % to cost % conversion bands
/// └── rates/
///     ├── 2025.yaml   # Rate table for the 2025 assessment year
///     └── 2026.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use assessment_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/csa").unwrap();
///
/// let table = loader.rate_table(2026).unwrap();
/// println!("Self-support amount: ${}", table.self_support_amount);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SchemeConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/csa")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any required field is missing from the configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use assessment_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/csa")?;
    /// # Ok::<(), assessment_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        // Load scheme.yaml
        let scheme_path = path.join("scheme.yaml");
        let metadata = Self::load_yaml::<SchemeMetadata>(&scheme_path)?;

        // Load care_cost.yaml
        let care_cost_path = path.join("care_cost.yaml");
        let care_cost = Self::load_yaml::<CareCostConfig>(&care_cost_path)?;

        // Load all rate tables from the rates directory
        let rates_dir = path.join("rates");
        let rate_tables = Self::load_rate_tables(&rates_dir)?;

        let config = SchemeConfig::new(metadata, care_cost.bands, rate_tables);

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all rate-table files from the rates directory.
    fn load_rate_tables(rates_dir: &Path) -> EngineResult<Vec<RateTable>> {
        let rates_dir_str = rates_dir.display().to_string();

        if !rates_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: rates_dir_str,
            });
        }

        let entries = fs::read_dir(rates_dir).map_err(|_| EngineError::ConfigNotFound {
            path: rates_dir_str.clone(),
        })?;

        let mut tables = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: rates_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let table = Self::load_yaml::<RateTable>(&path)?;
                tables.push(table);
            }
        }

        if tables.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate tables found)", rates_dir_str),
            });
        }

        Ok(tables)
    }

    /// Returns the underlying scheme configuration.
    pub fn config(&self) -> &SchemeConfig {
        &self.config
    }

    /// Returns the scheme metadata.
    pub fn scheme(&self) -> &super::types::SchemeMetadata {
        self.config.scheme()
    }

    /// Returns the care-cost conversion bands.
    pub fn care_cost_bands(&self) -> &[CareCostBand] {
        self.config.care_cost_bands()
    }

    /// Gets the rate table for an assessment year.
    ///
    /// # Arguments
    ///
    /// * `year` - The assessment year (e.g., 2026)
    ///
    /// # Returns
    ///
    /// Returns the rate table if found, or a `YearNotFound` error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use assessment_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/csa")?;
    /// let table = loader.rate_table(2026)?;
    /// println!("Fixed annual rate: ${}", table.fixed_annual_rate);
    /// # Ok::<(), assessment_engine::error::EngineError>(())
    /// ```
    pub fn rate_table(&self, year: u16) -> EngineResult<&RateTable> {
        self.config
            .rate_tables()
            .iter()
            .find(|t| t.year == year)
            .ok_or(EngineError::YearNotFound { year })
    }

    /// Returns the most recent assessment year available.
    pub fn latest_year(&self) -> Option<u16> {
        self.config.rate_tables().last().map(|t| t.year)
    }
}
