//! Detector cell identifiers and region tags.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of barrel eta rings on each side of the detector.
pub const BARREL_MAX_IETA: i32 = 85;
/// Number of barrel cells around the azimuth.
pub const BARREL_MAX_IPHI: i32 = 360;
/// Endcap grid extent along x and y (cells are numbered from 1).
pub const ENDCAP_MAX_IXY: i32 = 100;

/// One of the two mutually exclusive detector halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Region {
    /// Central cylinder.
    Barrel,
    /// Forward disks, split into a minus and a plus side.
    Endcap,
}

impl Region {
    /// Both regions, barrel first.
    pub const ALL: [Region; 2] = [Region::Barrel, Region::Endcap];

    /// Short label used in logs and summaries.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Region::Barrel => "EB",
            Region::Endcap => "EE",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Detector side along the beam axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    /// z <= 0.
    Minus,
    /// z > 0.
    Plus,
}

impl Side {
    /// Side of a point with the given longitudinal coordinate.
    #[inline]
    #[must_use]
    pub fn from_z(z: f64) -> Self {
        if z > 0.0 {
            Side::Plus
        } else {
            Side::Minus
        }
    }
}

/// Identifier of a single readout cell.
///
/// Barrel cells are addressed by `(ieta, iphi)` with `ieta` in
/// `[-85, -1] ∪ [1, 85]` and `iphi` in `[1, 360]`. Endcap cells are
/// addressed by `(ix, iy)` in `[1, 100]` plus the side of the disk.
/// An unresolved cell is represented as `Option::<CellId>::None`.
///
/// Deserialized identifiers go through the same range checks as
/// [`CellId::barrel`] and [`CellId::endcap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCellId"))]
pub struct CellId {
    /// Region the cell belongs to.
    pub region: Region,
    /// Side of the detector.
    pub side: Side,
    /// First coordinate (ieta or ix).
    pub u: i32,
    /// Second coordinate (iphi or iy).
    pub v: i32,
}

impl CellId {
    /// Creates a cell identifier without range checks.
    #[inline]
    #[must_use]
    pub const fn new(region: Region, side: Side, u: i32, v: i32) -> Self {
        Self { region, side, u, v }
    }

    /// Creates a barrel cell, validating the index ranges.
    pub fn barrel(ieta: i32, iphi: i32) -> Result<Self> {
        if ieta == 0 || ieta.abs() > BARREL_MAX_IETA || !(1..=BARREL_MAX_IPHI).contains(&iphi) {
            return Err(Error::InvalidCell {
                region: Region::Barrel,
                u: ieta,
                v: iphi,
            });
        }
        let side = if ieta > 0 { Side::Plus } else { Side::Minus };
        Ok(Self::new(Region::Barrel, side, ieta, iphi))
    }

    /// Creates an endcap cell, validating the index ranges.
    pub fn endcap(ix: i32, iy: i32, side: Side) -> Result<Self> {
        if !(1..=ENDCAP_MAX_IXY).contains(&ix) || !(1..=ENDCAP_MAX_IXY).contains(&iy) {
            return Err(Error::InvalidCell {
                region: Region::Endcap,
                u: ix,
                v: iy,
            });
        }
        Ok(Self::new(Region::Endcap, side, ix, iy))
    }

    /// Returns true if the cell is tagged for `region`.
    #[inline]
    #[must_use]
    pub fn is_in(&self, region: Region) -> bool {
        self.region == region
    }
}

/// Unvalidated wire form of a [`CellId`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawCellId {
    region: Region,
    side: Side,
    u: i32,
    v: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCellId> for CellId {
    type Error = Error;

    fn try_from(raw: RawCellId) -> Result<Self> {
        let cell = match raw.region {
            Region::Barrel => CellId::barrel(raw.u, raw.v)?,
            Region::Endcap => CellId::endcap(raw.u, raw.v, raw.side)?,
        };
        // barrel side follows the sign of ieta
        if cell.side != raw.side {
            return Err(Error::InvalidCell {
                region: raw.region,
                u: raw.u,
                v: raw.v,
            });
        }
        Ok(cell)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.region {
            Region::Barrel => write!(f, "EB({}, {})", self.u, self.v),
            Region::Endcap => {
                let sign = match self.side {
                    Side::Minus => '-',
                    Side::Plus => '+',
                };
                write!(f, "EE{sign}({}, {})", self.u, self.v)
            }
        }
    }
}
