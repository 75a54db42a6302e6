//! Event records and run types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cell::Region;
use crate::cluster::{BasicCluster, SuperCluster};
use crate::hit::HitRecord;

/// Run type reported by a readout unit at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RunType {
    Cosmic,
    Mtcc,
    Laser,
    TestPulse,
    Pedestal,
    Led,
    PhysicsGlobal,
    CosmicsGlobal,
    HaloGlobal,
    PhysicsLocal,
    CosmicsLocal,
    HaloLocal,
    CalibLocal,
}

impl RunType {
    /// Returns true for run types that produce particle clusters.
    #[must_use]
    pub fn is_physics_or_cosmic(self) -> bool {
        matches!(
            self,
            RunType::Cosmic
                | RunType::Mtcc
                | RunType::CosmicsGlobal
                | RunType::PhysicsGlobal
                | RunType::CosmicsLocal
                | RunType::PhysicsLocal
        )
    }
}

/// Collections reconstructed in one region for one event.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegionData {
    /// Calibrated cell hits.
    pub hits: Vec<HitRecord>,
    /// Basic clusters.
    pub basic_clusters: Vec<BasicCluster>,
    /// Superclusters.
    pub super_clusters: Vec<SuperCluster>,
}

/// All inputs of one event, split by region.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EventRecord {
    /// Barrel collections.
    pub barrel: RegionData,
    /// Endcap collections.
    pub endcap: RegionData,
}

impl EventRecord {
    /// Returns the collections of `region`.
    #[must_use]
    pub fn region(&self, region: Region) -> &RegionData {
        match region {
            Region::Barrel => &self.barrel,
            Region::Endcap => &self.endcap,
        }
    }

    /// Returns the collections of `region` for modification.
    pub fn region_mut(&mut self, region: Region) -> &mut RegionData {
        match region {
            Region::Barrel => &mut self.barrel,
            Region::Endcap => &mut self.endcap,
        }
    }
}
