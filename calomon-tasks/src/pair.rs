//! Pair reconstruction.
//!
//! Clusters are treated as massless objects: a cluster of energy `E` at
//! polar angle `θ` and azimuth `φ` carries
//! `p = E (sin θ cos φ, sin θ sin φ, cos θ)`.
//!
//! Two searches are provided:
//! - [`low_mass_pairs`] - every ordered pair of distinct candidates, with a
//!   transverse momentum floor and an isolation cone around the pair
//! - [`LeadingPair`] - the two highest transverse energy clusters, folded
//!   over a collection, combined without further cuts

use std::ops::Add;

use log::trace;

use calomon_core::position::delta_phi;
use calomon_core::Cluster;

use crate::config::LowMassCuts;

/// Margin by which the pair energy must exceed `|pz|`.
const RAPIDITY_EPSILON: f64 = 1e-10;

/// Energy-momentum four-vector (GeV).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FourMomentum {
    /// Energy.
    pub e: f64,
    /// Momentum along x.
    pub px: f64,
    /// Momentum along y.
    pub py: f64,
    /// Momentum along z.
    pub pz: f64,
}

impl FourMomentum {
    /// Creates a four-vector from its components.
    #[must_use]
    pub const fn new(e: f64, px: f64, py: f64, pz: f64) -> Self {
        Self { e, px, py, pz }
    }

    /// Massless four-vector of a cluster.
    #[must_use]
    pub fn from_cluster<C: Cluster + ?Sized>(cluster: &C) -> Self {
        let position = cluster.position();
        let e = cluster.energy();
        let (sin_theta, cos_theta) = position.theta().sin_cos();
        let (sin_phi, cos_phi) = position.phi().sin_cos();
        Self {
            e,
            px: e * sin_theta * cos_phi,
            py: e * sin_theta * sin_phi,
            pz: e * cos_theta,
        }
    }

    /// Transverse momentum.
    #[inline]
    #[must_use]
    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Azimuth of the momentum.
    #[inline]
    #[must_use]
    pub fn phi(&self) -> f64 {
        self.py.atan2(self.px)
    }

    /// Rapidity, or `None` when `E` does not exceed `|pz|`.
    #[must_use]
    pub fn rapidity(&self) -> Option<f64> {
        if self.e < self.pz.abs() + RAPIDITY_EPSILON {
            return None;
        }
        Some(0.5 * ((self.e + self.pz) / (self.e - self.pz)).ln())
    }

    /// Invariant mass. Negative `m²` from rounding is clamped to zero.
    #[must_use]
    pub fn mass(&self) -> f64 {
        let m2 = self.e * self.e - self.px * self.px - self.py * self.py - self.pz * self.pz;
        m2.max(0.0).sqrt()
    }
}

impl Add for FourMomentum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            e: self.e + rhs.e,
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
        }
    }
}

/// Transverse energy of all clusters within `cone` of `(eta, phi)`.
///
/// No cluster is excluded; the pair constituents count if they fall inside
/// the cone.
pub fn isolation<'a, C, I>(clusters: I, eta: f64, phi: f64, cone: f64) -> f64
where
    C: Cluster + 'a,
    I: IntoIterator<Item = &'a C>,
{
    clusters
        .into_iter()
        .filter(|cluster| {
            let d_eta = cluster.eta() - eta;
            let d_phi = delta_phi(cluster.phi(), phi);
            d_eta.hypot(d_phi) < cone
        })
        .map(Cluster::transverse_energy)
        .sum()
}

/// Masses of every accepted ordered pair of distinct candidates.
///
/// Both `(i, j)` and `(j, i)` are evaluated, so an accepted physical pair
/// yields its mass twice. `all` is the full, unfiltered collection used for
/// the isolation sum.
///
/// The isolation cone is centred on the pair's own direction: rapidity from
/// the signed `pz` and azimuth `atan2(py, px)`, so pairs in the negative-η
/// half look for neighbours on their own side. Pairs with `E <= |pz|` are
/// rejected before any mass is computed.
pub fn low_mass_pairs<C: Cluster>(candidates: &[&C], all: &[C], cuts: &LowMassCuts) -> Vec<f64> {
    let momenta: Vec<FourMomentum> = candidates
        .iter()
        .map(|cluster| FourMomentum::from_cluster(*cluster))
        .collect();

    let mut masses = Vec::new();
    for (i, p1) in momenta.iter().enumerate() {
        for (j, p2) in momenta.iter().enumerate() {
            if i == j {
                continue;
            }
            let pair = *p1 + *p2;
            if pair.pt() < cuts.min_pair_pt {
                continue;
            }
            let Some(rapidity) = pair.rapidity() else {
                trace!("pair ({i}, {j}) rejected: E <= |pz|");
                continue;
            };
            let iso = isolation(all, rapidity, pair.phi(), cuts.isolation_cone);
            if iso > cuts.max_isolation {
                trace!("pair ({i}, {j}) rejected: isolation {iso:.3}");
                continue;
            }
            masses.push(pair.mass());
        }
    }
    masses
}

/// The two highest transverse energy clusters seen so far.
///
/// Built as a fold with [`LeadingPair::push`]: a cluster replaces the
/// leading slot only with strictly greater `E_T`, so ties keep the first
/// cluster seen.
#[derive(Debug)]
pub struct LeadingPair<'a, C> {
    leading: Option<(&'a C, f64)>,
    sub_leading: Option<(&'a C, f64)>,
}

impl<C> Clone for LeadingPair<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for LeadingPair<'_, C> {}

impl<C> Default for LeadingPair<'_, C> {
    fn default() -> Self {
        Self {
            leading: None,
            sub_leading: None,
        }
    }
}

impl<'a, C: Cluster> LeadingPair<'a, C> {
    /// Creates an empty pair.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a cluster to the pair.
    #[must_use]
    pub fn push(self, cluster: &'a C) -> Self {
        let et = cluster.transverse_energy();
        match (self.leading, self.sub_leading) {
            (Some((_, lead_et)), _) if et <= lead_et => match self.sub_leading {
                Some((_, sub_et)) if et <= sub_et => self,
                _ => Self {
                    sub_leading: Some((cluster, et)),
                    ..self
                },
            },
            _ => Self {
                leading: Some((cluster, et)),
                sub_leading: self.leading,
            },
        }
    }

    /// Highest transverse energy cluster.
    #[must_use]
    pub fn leading(&self) -> Option<&'a C> {
        self.leading.map(|(cluster, _)| cluster)
    }

    /// Second highest transverse energy cluster.
    #[must_use]
    pub fn sub_leading(&self) -> Option<&'a C> {
        self.sub_leading.map(|(cluster, _)| cluster)
    }

    /// Invariant mass of the two clusters, if both slots are filled.
    #[must_use]
    pub fn mass(&self) -> Option<f64> {
        let leading = self.leading()?;
        let sub_leading = self.sub_leading()?;
        Some((FourMomentum::from_cluster(leading) + FourMomentum::from_cluster(sub_leading)).mass())
    }
}

impl<'a, C: Cluster> FromIterator<&'a C> for LeadingPair<'a, C> {
    fn from_iter<I: IntoIterator<Item = &'a C>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), LeadingPair::push)
    }
}
