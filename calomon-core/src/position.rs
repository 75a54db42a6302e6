//! Cartesian positions and their collider coordinates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in detector space (cm), with z along the beam axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate (beam axis).
    pub z: f64,
}

impl Position {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Builds a position from pseudorapidity, azimuth and transverse radius.
    #[must_use]
    pub fn from_eta_phi(eta: f64, phi: f64, rho: f64) -> Self {
        Self {
            x: rho * phi.cos(),
            y: rho * phi.sin(),
            z: rho * eta.sinh(),
        }
    }

    /// Distance from the beam axis.
    #[inline]
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Polar angle measured from +z, in `[0, π]`.
    #[inline]
    #[must_use]
    pub fn theta(&self) -> f64 {
        self.rho().atan2(self.z)
    }

    /// Azimuthal angle in `(-π, π]`.
    #[inline]
    #[must_use]
    pub fn phi(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Pseudorapidity. Points on the beam axis map to ±infinity.
    #[must_use]
    pub fn eta(&self) -> f64 {
        let rho = self.rho();
        if rho == 0.0 {
            return if self.z >= 0.0 {
                f64::INFINITY
            } else {
                f64::NEG_INFINITY
            };
        }
        (self.z / rho).asinh()
    }
}

/// Wraps an azimuthal difference into `[-π, π]`.
#[inline]
#[must_use]
pub fn delta_phi(a: f64, b: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let mut d = (a - b) % TAU;
    if d > PI {
        d -= TAU;
    } else if d < -PI {
        d += TAU;
    }
    d
}
