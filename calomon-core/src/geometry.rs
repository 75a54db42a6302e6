//! Geometry and topology contracts, and the run context that provides them.

use std::sync::Arc;

use crate::cell::{CellId, Region};
use crate::position::Position;

/// Maps a point to the nearest readout cell of one region.
///
/// Implementations may return a cell tagged for another region, or `None`
/// when the point cannot be resolved; callers decide how to treat both.
pub trait GeometryResolver: Send + Sync {
    /// Returns the cell closest to `position`.
    fn resolve_cell(&self, position: &Position) -> Option<CellId>;
}

impl<F> GeometryResolver for F
where
    F: Fn(&Position) -> Option<CellId> + Send + Sync,
{
    fn resolve_cell(&self, position: &Position) -> Option<CellId> {
        self(position)
    }
}

/// Cell neighbourhood queries.
pub trait Topology: Send + Sync {
    /// Returns the valid cells in the square window of half-width
    /// `half_width` centred on `center`, including `center` itself.
    fn window(&self, center: CellId, half_width: u32) -> Vec<CellId>;
}

/// Run-scoped resources handed to a worker at the start of each run.
pub trait RunContext {
    /// Cell topology service.
    fn topology(&self) -> Option<Arc<dyn Topology>>;

    /// Geometry service for `region`.
    fn geometry(&self, region: Region) -> Option<Arc<dyn GeometryResolver>>;
}

/// A [`RunContext`] holding fixed services.
#[derive(Clone, Default)]
pub struct StaticRunContext {
    topology: Option<Arc<dyn Topology>>,
    barrel: Option<Arc<dyn GeometryResolver>>,
    endcap: Option<Arc<dyn GeometryResolver>>,
}

impl StaticRunContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context backed by the uniform reference grid for both regions.
    #[must_use]
    pub fn uniform_grid() -> Self {
        Self::new()
            .with_topology(Arc::new(crate::grid::GridTopology))
            .with_geometry(Region::Barrel, Arc::new(crate::grid::BarrelGrid))
            .with_geometry(Region::Endcap, Arc::new(crate::grid::EndcapGrid))
    }

    /// Sets the topology service.
    #[must_use]
    pub fn with_topology(mut self, topology: Arc<dyn Topology>) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Sets the geometry service of `region`.
    #[must_use]
    pub fn with_geometry(mut self, region: Region, geometry: Arc<dyn GeometryResolver>) -> Self {
        match region {
            Region::Barrel => self.barrel = Some(geometry),
            Region::Endcap => self.endcap = Some(geometry),
        }
        self
    }
}

impl RunContext for StaticRunContext {
    fn topology(&self) -> Option<Arc<dyn Topology>> {
        self.topology.clone()
    }

    fn geometry(&self, region: Region) -> Option<Arc<dyn GeometryResolver>> {
        match region {
            Region::Barrel => self.barrel.clone(),
            Region::Endcap => self.endcap.clone(),
        }
    }
}
