//! Uniform reference geometry.
//!
//! A simplified detector layout used for replaying recorded events and in
//! tests: the barrel is a regular η-φ grid of 2 × 85 × 360 cells and each
//! endcap is a 100 × 100 x-y grid projected onto the disk face.
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use std::f64::consts::{PI, TAU};

use crate::cell::{CellId, Region, Side, BARREL_MAX_IETA, BARREL_MAX_IPHI, ENDCAP_MAX_IXY};
use crate::geometry::{GeometryResolver, Topology};
use crate::position::Position;

/// Barrel cell pitch in both η and φ.
pub const BARREL_CELL_WIDTH: f64 = PI / 180.0;
/// Distance of the endcap face from the interaction point (cm).
pub const ENDCAP_FACE_Z: f64 = 315.4;
/// Endcap cell pitch on the face (cm).
pub const ENDCAP_CELL_PITCH: f64 = 2.862;

/// Barrel geometry: nearest η-φ cell, clamped to the outermost ring.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarrelGrid;

impl GeometryResolver for BarrelGrid {
    fn resolve_cell(&self, position: &Position) -> Option<CellId> {
        let eta = position.eta();
        if !eta.is_finite() {
            return None;
        }
        let ring = ((eta.abs() / BARREL_CELL_WIDTH).floor() as i32 + 1).min(BARREL_MAX_IETA);
        let ieta = if eta > 0.0 { ring } else { -ring };
        let iphi = ((position.phi().rem_euclid(TAU) / BARREL_CELL_WIDTH).floor() as i32 + 1)
            .min(BARREL_MAX_IPHI);
        CellId::barrel(ieta, iphi).ok()
    }
}

/// Endcap geometry: the position is projected along its line of flight onto
/// the disk face and binned on the x-y grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndcapGrid;

impl GeometryResolver for EndcapGrid {
    fn resolve_cell(&self, position: &Position) -> Option<CellId> {
        if position.z == 0.0 {
            return None;
        }
        let scale = ENDCAP_FACE_Z / position.z.abs();
        let ix = Self::grid_index(position.x * scale)?;
        let iy = Self::grid_index(position.y * scale)?;
        CellId::endcap(ix, iy, Side::from_z(position.z)).ok()
    }
}

impl EndcapGrid {
    /// One-based grid index of a face coordinate, `None` off the grid.
    fn grid_index(coordinate: f64) -> Option<i32> {
        let index = (coordinate / ENDCAP_CELL_PITCH).floor() + f64::from(ENDCAP_MAX_IXY / 2) + 1.0;
        (1.0..=f64::from(ENDCAP_MAX_IXY))
            .contains(&index)
            .then_some(index as i32)
    }
}

/// Neighbourhood queries on the reference grid.
///
/// Barrel windows skip the non-existent ring `ieta = 0` and wrap around in
/// φ; endcap windows are clipped at the grid edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridTopology;

impl GridTopology {
    fn step_ieta(ieta: i32, delta: i32) -> Option<i32> {
        let mut stepped = ieta.checked_add(delta)?;
        if ieta > 0 && stepped <= 0 {
            stepped -= 1;
        } else if ieta < 0 && stepped >= 0 {
            stepped += 1;
        }
        (-BARREL_MAX_IETA..=BARREL_MAX_IETA)
            .contains(&stepped)
            .then_some(stepped)
    }

    fn wrap_iphi(iphi: i32, delta: i32) -> Option<i32> {
        let shifted = iphi.checked_sub(1)?.checked_add(delta)?;
        Some(shifted.rem_euclid(BARREL_MAX_IPHI) + 1)
    }
}

impl Topology for GridTopology {
    fn window(&self, center: CellId, half_width: u32) -> Vec<CellId> {
        let h = half_width as i32;
        let mut cells = Vec::with_capacity(((2 * h + 1) * (2 * h + 1)) as usize);
        for du in -h..=h {
            for dv in -h..=h {
                let cell = match center.region {
                    Region::Barrel => Self::step_ieta(center.u, du)
                        .zip(Self::wrap_iphi(center.v, dv))
                        .and_then(|(ieta, iphi)| CellId::barrel(ieta, iphi).ok()),
                    Region::Endcap => center
                        .u
                        .checked_add(du)
                        .zip(center.v.checked_add(dv))
                        .and_then(|(ix, iy)| CellId::endcap(ix, iy, center.side).ok()),
                };
                cells.extend(cell);
            }
        }
        cells
    }
}
