//! Metric identifiers and the static name ordering table.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Every metric filled by the cluster worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    /// Basic-cluster energy map.
    BcEnergyMap,
    /// Basic-cluster energy map, η projection.
    BcEnergyMapProjEta,
    /// Basic-cluster energy map, φ projection.
    BcEnergyMapProjPhi,
    /// Basic-cluster occupancy.
    BcOccupancy,
    /// Basic-cluster occupancy, η projection.
    BcOccupancyProjEta,
    /// Basic-cluster occupancy, φ projection.
    BcOccupancyProjPhi,
    /// Basic-cluster size map.
    BcSizeMap,
    /// Basic-cluster size map, η projection.
    BcSizeMapProjEta,
    /// Basic-cluster size map, φ projection.
    BcSizeMapProjPhi,
    /// Basic-cluster energy per cell.
    BcEnergy,
    /// Basic-cluster multiplicity per region/side bin.
    BcNum,
    /// Basic-cluster size per cell.
    BcSize,
    /// Supercluster energy.
    ScEnergy,
    /// Supercluster energy, low range.
    ScEnergyLow,
    /// Supercluster seed-cell energy.
    ScSeedEnergy,
    /// Supercluster energy against seed energy.
    ScClusterVsSeed,
    /// Supercluster seed occupancy.
    ScSeedOccupancy,
    /// Seed of the only supercluster in the event.
    SingleCrystalCluster,
    /// Supercluster multiplicity per region bin.
    ScNum,
    /// Number of basic clusters per supercluster.
    ScNumBasicClusters,
    /// Number of cells per supercluster.
    ScNumCrystals,
    /// 3x3 energy over supercluster energy.
    ScR9,
    /// Low-mass pair spectrum.
    Pi0,
    /// Mid-mass pair spectrum.
    JPsi,
    /// Two-body spectrum around the top of the range.
    Z,
    /// Two-body spectrum, wide range.
    HighMass,
}

impl Metric {
    /// Number of metrics.
    pub const COUNT: usize = 26;

    /// All metrics in index order.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::BcEnergyMap,
        Metric::BcEnergyMapProjEta,
        Metric::BcEnergyMapProjPhi,
        Metric::BcOccupancy,
        Metric::BcOccupancyProjEta,
        Metric::BcOccupancyProjPhi,
        Metric::BcSizeMap,
        Metric::BcSizeMapProjEta,
        Metric::BcSizeMapProjPhi,
        Metric::BcEnergy,
        Metric::BcNum,
        Metric::BcSize,
        Metric::ScEnergy,
        Metric::ScEnergyLow,
        Metric::ScSeedEnergy,
        Metric::ScClusterVsSeed,
        Metric::ScSeedOccupancy,
        Metric::SingleCrystalCluster,
        Metric::ScNum,
        Metric::ScNumBasicClusters,
        Metric::ScNumCrystals,
        Metric::ScR9,
        Metric::Pi0,
        Metric::JPsi,
        Metric::Z,
        Metric::HighMass,
    ];

    /// Position of the metric in [`Metric::ALL`].
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Configuration name of the metric.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Metric::BcEnergyMap => "BCEMap",
            Metric::BcEnergyMapProjEta => "BCEMapProjEta",
            Metric::BcEnergyMapProjPhi => "BCEMapProjPhi",
            Metric::BcOccupancy => "BCOccupancy",
            Metric::BcOccupancyProjEta => "BCOccupancyProjEta",
            Metric::BcOccupancyProjPhi => "BCOccupancyProjPhi",
            Metric::BcSizeMap => "BCSizeMap",
            Metric::BcSizeMapProjEta => "BCSizeMapProjEta",
            Metric::BcSizeMapProjPhi => "BCSizeMapProjPhi",
            Metric::BcEnergy => "BCE",
            Metric::BcNum => "BCNum",
            Metric::BcSize => "BCSize",
            Metric::ScEnergy => "SCE",
            Metric::ScEnergyLow => "SCELow",
            Metric::ScSeedEnergy => "SCSeedEnergy",
            Metric::ScClusterVsSeed => "SCClusterVsSeed",
            Metric::ScSeedOccupancy => "SCSeedOccupancy",
            Metric::SingleCrystalCluster => "SingleCrystalCluster",
            Metric::ScNum => "SCNum",
            Metric::ScNumBasicClusters => "SCNBCs",
            Metric::ScNumCrystals => "SCNcrystals",
            Metric::ScR9 => "SCR9",
            Metric::Pi0 => "Pi0",
            Metric::JPsi => "JPsi",
            Metric::Z => "Z",
            Metric::HighMass => "HighMass",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name() == s)
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

/// Builds the name -> metric table consumed by the registration layer.
#[must_use]
pub fn build_metric_ordering() -> BTreeMap<&'static str, Metric> {
    Metric::ALL
        .into_iter()
        .map(|metric| (metric.name(), metric))
        .collect()
}

/// Bins of the multiplicity metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionBin {
    /// Whole barrel.
    Barrel,
    /// Both endcaps.
    Endcap,
    /// Minus-side endcap.
    EndcapMinus,
    /// Plus-side endcap.
    EndcapPlus,
}

impl RegionBin {
    /// One-based bin number.
    #[must_use]
    pub fn bin(self) -> u32 {
        match self {
            RegionBin::Barrel => 1,
            RegionBin::Endcap => 2,
            RegionBin::EndcapMinus => 3,
            RegionBin::EndcapPlus => 4,
        }
    }
}
