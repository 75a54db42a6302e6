//! Cluster worker configuration.

use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroU32;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Thresholds of the low-mass candidate and pair selection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowMassCuts {
    /// Clusters above this energy are not candidates (GeV).
    pub max_cluster_energy: f64,
    /// Minimum energy of the matched seed hit (GeV).
    pub min_seed_energy: f64,
    /// Maximum seed-hit to cluster energy ratio.
    pub max_seed_fraction: f64,
    /// Minimum transverse momentum of the pair (GeV).
    pub min_pair_pt: f64,
    /// Radius of the isolation cone in η-φ.
    pub isolation_cone: f64,
    /// Maximum transverse energy inside the isolation cone (GeV).
    pub max_isolation: f64,
}

impl Default for LowMassCuts {
    fn default() -> Self {
        Self {
            max_cluster_energy: 10.0,
            min_seed_energy: 0.5,
            max_seed_fraction: 0.95,
            min_pair_pt: 2.5,
            isolation_cone: 0.2,
            max_isolation: 0.5,
        }
    }
}

impl LowMassCuts {
    /// Set the candidate energy ceiling.
    #[must_use]
    pub fn with_max_cluster_energy(mut self, energy: f64) -> Self {
        self.max_cluster_energy = energy;
        self
    }

    /// Set the seed-hit energy floor.
    #[must_use]
    pub fn with_min_seed_energy(mut self, energy: f64) -> Self {
        self.min_seed_energy = energy;
        self
    }

    /// Set the seed-hit fraction ceiling.
    #[must_use]
    pub fn with_max_seed_fraction(mut self, fraction: f64) -> Self {
        self.max_seed_fraction = fraction;
        self
    }

    /// Set the pair transverse momentum floor.
    #[must_use]
    pub fn with_min_pair_pt(mut self, pt: f64) -> Self {
        self.min_pair_pt = pt;
        self
    }

    /// Set the isolation cone radius and ceiling.
    #[must_use]
    pub fn with_isolation(mut self, cone: f64, max_isolation: f64) -> Self {
        self.isolation_cone = cone;
        self.max_isolation = max_isolation;
        self
    }
}

/// Configuration of [`ClusterTask`](crate::ClusterTask).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterTaskConfig {
    /// Events between pair reconstruction passes; must be nonzero.
    pub mass_calc_prescale: u32,
    /// Low-mass selection thresholds.
    #[serde(default)]
    pub low_mass: LowMassCuts,
}

impl ClusterTaskConfig {
    /// Creates a configuration with default cuts.
    #[must_use]
    pub fn new(mass_calc_prescale: u32) -> Self {
        Self {
            mass_calc_prescale,
            low_mass: LowMassCuts::default(),
        }
    }

    /// Set the low-mass cuts.
    #[must_use]
    pub fn with_low_mass_cuts(mut self, cuts: LowMassCuts) -> Self {
        self.low_mass = cuts;
        self
    }

    /// Checks the configuration and returns the prescale.
    pub fn validate(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.mass_calc_prescale).ok_or_else(|| {
            calomon_core::Error::InvalidConfiguration(
                "mass calculation prescale is zero".to_string(),
            )
            .into()
        })
    }

    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}
