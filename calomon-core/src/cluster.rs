//! Reconstructed cluster types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::CellId;
use crate::position::Position;

/// Trait for reconstructed energy clusters.
///
/// Provides the quantities the monitoring workers need from both basic
/// clusters and superclusters.
pub trait Cluster {
    /// Energy-weighted position of the cluster.
    fn position(&self) -> Position;

    /// Total cluster energy (GeV).
    fn energy(&self) -> f64;

    /// Number of cells in the cluster.
    fn size(&self) -> u32;

    /// Seed cell recorded by the reconstruction, if any.
    fn seed(&self) -> Option<CellId>;

    /// Pseudorapidity of the cluster position.
    #[inline]
    fn eta(&self) -> f64 {
        self.position().eta()
    }

    /// Azimuth of the cluster position.
    #[inline]
    fn phi(&self) -> f64 {
        self.position().phi()
    }

    /// Transverse energy, `E sin θ`.
    #[inline]
    fn transverse_energy(&self) -> f64 {
        self.energy() * self.position().theta().sin()
    }
}

/// A localized energy deposit built from neighbouring cells.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicCluster {
    /// Energy-weighted position.
    pub position: Position,
    /// Cluster energy (GeV).
    pub energy: f64,
    /// Number of cells.
    pub size: u32,
    /// Seed cell, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Option<CellId>,
}

impl BasicCluster {
    /// Creates a basic cluster without a seed cell.
    #[must_use]
    pub fn new(position: Position, energy: f64, size: u32) -> Self {
        Self {
            position,
            energy,
            size,
            seed: None,
        }
    }

    /// Sets the seed cell.
    #[must_use]
    pub fn with_seed(mut self, seed: CellId) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Cluster for BasicCluster {
    #[inline]
    fn position(&self) -> Position {
        self.position
    }

    #[inline]
    fn energy(&self) -> f64 {
        self.energy
    }

    #[inline]
    fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    fn seed(&self) -> Option<CellId> {
        self.seed
    }
}

/// An aggregate of basic clusters treated as one object.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SuperCluster {
    /// Energy-weighted position.
    pub position: Position,
    /// Supercluster energy (GeV).
    pub energy: f64,
    /// Number of cells over all constituents.
    pub size: u32,
    /// Number of constituent basic clusters.
    pub cluster_count: u32,
    /// Seed cell of the seed basic cluster, when known.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Option<CellId>,
}

impl SuperCluster {
    /// Creates a supercluster without a seed cell.
    #[must_use]
    pub fn new(position: Position, energy: f64, size: u32, cluster_count: u32) -> Self {
        Self {
            position,
            energy,
            size,
            cluster_count,
            seed: None,
        }
    }

    /// Sets the seed cell.
    #[must_use]
    pub fn with_seed(mut self, seed: CellId) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Cluster for SuperCluster {
    #[inline]
    fn position(&self) -> Position {
        self.position
    }

    #[inline]
    fn energy(&self) -> f64 {
        self.energy
    }

    #[inline]
    fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    fn seed(&self) -> Option<CellId> {
        self.seed
    }
}
