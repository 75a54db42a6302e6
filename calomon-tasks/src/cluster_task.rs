//! Cluster monitoring worker.
//!
//! For every event the worker resolves each basic cluster and supercluster
//! to a detector cell and fills per-cell energy, occupancy and shape
//! metrics. On every `prescale`-th event it additionally searches basic
//! clusters for low-mass pairs and combines the two leading superclusters
//! into a two-body mass.
//!
//! Hits are borrowed per event through [`ClusterEvent`], which holds the
//! worker mutably for its whole lifetime:
//!
//! ```
//! # use calomon_core::{HitIndex, Region, StaticRunContext};
//! # use calomon_tasks::{ClusterTask, ClusterTaskConfig, MemorySink, Worker};
//! let mut task = ClusterTask::new(ClusterTaskConfig::new(1))?;
//! task.begin_run(&StaticRunContext::uniform_grid())?;
//!
//! let hits = HitIndex::default();
//! let mut sink = MemorySink::new();
//! let mut event = task.begin_event()?;
//! event.ingest_hits(&hits, Region::Barrel);
//! event.analyze_basic_clusters(&[], Region::Barrel, &mut sink);
//! # Ok::<(), calomon_tasks::Error>(())
//! ```

use std::num::NonZeroU32;
use std::sync::Arc;

use log::{debug, info, trace};

use calomon_core::{
    BasicCluster, CellId, Cluster, EventRecord, GeometryResolver, HitIndex, Region, RunContext,
    RunType, Side, SuperCluster, Topology,
};

use crate::collection::{order_collections, Collection, Dependency};
use crate::config::{ClusterTaskConfig, LowMassCuts};
use crate::error::Result;
use crate::metrics::{Metric, RegionBin};
use crate::pair::{self, LeadingPair};
use crate::sink::{Fill, MetricSink};
use crate::worker::Worker;

/// Half-width of the shape window around the seed (3x3).
const SHAPE_WINDOW_HALF_WIDTH: u32 = 1;

/// Run-scoped geometry services.
struct RunResources {
    topology: Arc<dyn Topology>,
    barrel: Arc<dyn GeometryResolver>,
    endcap: Arc<dyn GeometryResolver>,
}

impl RunResources {
    fn acquire(context: &dyn RunContext) -> Result<Self> {
        let topology = context.topology().ok_or_else(|| {
            calomon_core::Error::Setup("calorimeter topology missing".to_string())
        })?;
        let barrel = context.geometry(Region::Barrel);
        let endcap = context.geometry(Region::Endcap);
        match (barrel, endcap) {
            (Some(barrel), Some(endcap)) => Ok(Self {
                topology,
                barrel,
                endcap,
            }),
            _ => Err(calomon_core::Error::Setup("subdetector geometry missing".to_string()).into()),
        }
    }

    fn geometry(&self, region: Region) -> &dyn GeometryResolver {
        match region {
            Region::Barrel => self.barrel.as_ref(),
            Region::Endcap => self.endcap.as_ref(),
        }
    }
}

/// Per-event cluster analysis worker.
pub struct ClusterTask {
    prescale: NonZeroU32,
    cuts: LowMassCuts,
    run: Option<RunResources>,
    events: u64,
}

impl ClusterTask {
    /// Registered worker name.
    pub const NAME: &'static str = "ClusterTask";

    /// Collections consumed by the worker, in default processing order.
    pub const COLLECTIONS: &'static [Collection] = &[
        Collection::Run,
        Collection::RecHits(Region::Barrel),
        Collection::RecHits(Region::Endcap),
        Collection::BasicClusters(Region::Barrel),
        Collection::BasicClusters(Region::Endcap),
        Collection::SuperClusters(Region::Barrel),
        Collection::SuperClusters(Region::Endcap),
    ];

    /// Creates a worker; fails if the prescale is zero.
    pub fn new(config: ClusterTaskConfig) -> Result<Self> {
        let prescale = config.validate()?;
        debug!(
            "{}: mass calculation prescale {prescale}, cuts {:?}",
            Self::NAME,
            config.low_mass
        );
        Ok(Self {
            prescale,
            cuts: config.low_mass,
            run: None,
            events: 0,
        })
    }

    /// Events between pair reconstruction passes.
    #[must_use]
    pub fn prescale(&self) -> NonZeroU32 {
        self.prescale
    }

    /// Low-mass selection thresholds.
    #[must_use]
    pub fn cuts(&self) -> &LowMassCuts {
        &self.cuts
    }

    /// Events started since the beginning of the run.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.events
    }

    /// Starts a new event.
    ///
    /// Increments the event counter and returns a scope with empty hit
    /// buffers. Fails if no run has been started.
    pub fn begin_event<'h>(&mut self) -> Result<ClusterEvent<'_, 'h>> {
        let Some(run) = self.run.as_ref() else {
            return Err(calomon_core::Error::Setup("no run in progress".to_string()).into());
        };
        self.events += 1;
        let mass_pass = self.events % u64::from(self.prescale.get()) == 0;
        Ok(ClusterEvent {
            run,
            cuts: &self.cuts,
            mass_pass,
            barrel_hits: None,
            endcap_hits: None,
        })
    }
}

impl Worker for ClusterTask {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn collections(&self) -> &'static [Collection] {
        Self::COLLECTIONS
    }

    fn dependencies(&self) -> Vec<Dependency> {
        Region::ALL
            .into_iter()
            .map(|region| {
                Dependency::new(Collection::SuperClusters(region), Collection::RecHits(region))
            })
            .collect()
    }

    fn filter_run_type(&self, run_types: &[RunType]) -> bool {
        run_types.iter().any(|run_type| run_type.is_physics_or_cosmic())
    }

    fn begin_run(&mut self, context: &dyn RunContext) -> Result<()> {
        self.run = Some(RunResources::acquire(context)?);
        self.events = 0;
        info!("{}: run resources acquired", Self::NAME);
        Ok(())
    }

    fn process_event(&mut self, event: &EventRecord, sink: &mut dyn MetricSink) -> Result<()> {
        let barrel_hits: HitIndex = event.barrel.hits.iter().copied().collect();
        let endcap_hits: HitIndex = event.endcap.hits.iter().copied().collect();
        let order = order_collections(self.collections(), &self.dependencies());

        let mut scope = self.begin_event()?;
        for collection in order {
            match collection {
                Collection::Run => {}
                Collection::RecHits(Region::Barrel) => {
                    scope.ingest_hits(&barrel_hits, Region::Barrel);
                }
                Collection::RecHits(Region::Endcap) => {
                    scope.ingest_hits(&endcap_hits, Region::Endcap);
                }
                Collection::BasicClusters(region) => {
                    scope.analyze_basic_clusters(&event.region(region).basic_clusters, region, sink);
                }
                Collection::SuperClusters(region) => {
                    scope.analyze_super_clusters(&event.region(region).super_clusters, region, sink);
                }
            }
        }
        Ok(())
    }
}

/// Analysis scope of one event.
///
/// Holds the hit buffers ingested for this event; they cannot outlive it.
pub struct ClusterEvent<'t, 'h> {
    run: &'t RunResources,
    cuts: &'t LowMassCuts,
    mass_pass: bool,
    barrel_hits: Option<&'h HitIndex>,
    endcap_hits: Option<&'h HitIndex>,
}

impl<'h> ClusterEvent<'_, 'h> {
    /// Returns true if pair reconstruction runs on this event.
    #[must_use]
    pub fn is_mass_pass(&self) -> bool {
        self.mass_pass
    }

    /// Sets the hits of `region` for this event, replacing earlier ones.
    pub fn ingest_hits(&mut self, hits: &'h HitIndex, region: Region) {
        match region {
            Region::Barrel => self.barrel_hits = Some(hits),
            Region::Endcap => self.endcap_hits = Some(hits),
        }
    }

    fn hits(&self, region: Region) -> Option<&'h HitIndex> {
        match region {
            Region::Barrel => self.barrel_hits,
            Region::Endcap => self.endcap_hits,
        }
    }

    /// Resolves a cluster to a cell of `region`: the stored seed if any,
    /// otherwise the nearest cell from the region's geometry.
    fn resolve<C: Cluster>(&self, cluster: &C, region: Region) -> Option<CellId> {
        let cell = match cluster.seed() {
            Some(seed) => seed,
            None => self.run.geometry(region).resolve_cell(&cluster.position())?,
        };
        cell.is_in(region).then_some(cell)
    }

    fn is_low_mass_candidate(&self, cluster: &BasicCluster, cell: CellId, region: Region) -> bool {
        if cluster.energy > self.cuts.max_cluster_energy {
            return false;
        }
        let Some(hit) = self.hits(region).and_then(|hits| hits.lookup(&cell)) else {
            return false;
        };
        hit.energy >= self.cuts.min_seed_energy
            && hit.energy / cluster.energy <= self.cuts.max_seed_fraction
    }

    /// Fills basic-cluster metrics for one region and, on mass passes,
    /// the low-mass pair spectra.
    pub fn analyze_basic_clusters(
        &self,
        clusters: &[BasicCluster],
        region: Region,
        sink: &mut dyn MetricSink,
    ) {
        let mut minus = 0u32;
        let mut plus = 0u32;
        let mut candidates: Vec<&BasicCluster> = Vec::new();

        for cluster in clusters {
            let Some(cell) = self.resolve(cluster, region) else {
                trace!("{region} basic cluster at {:?} not resolved in region", cluster.position);
                continue;
            };

            let energy = cluster.energy;
            let eta = cluster.eta();
            sink.fill_cell_value(Metric::BcEnergy, cell, energy);

            sink.fill_cell_value(Metric::BcEnergyMap, cell, energy);
            sink.fill(Metric::BcEnergyMapProjEta, Fill::AxisValue(eta, energy));
            sink.fill_cell_value(Metric::BcEnergyMapProjPhi, cell, energy);

            sink.fill_cell(Metric::BcOccupancy, cell);
            sink.fill(Metric::BcOccupancyProjEta, Fill::Axis(eta));
            sink.fill_cell(Metric::BcOccupancyProjPhi, cell);

            let size = f64::from(cluster.size);
            sink.fill_cell_value(Metric::BcSize, cell, size);

            sink.fill_cell_value(Metric::BcSizeMap, cell, size);
            sink.fill(Metric::BcSizeMapProjEta, Fill::AxisValue(eta, size));
            sink.fill_cell_value(Metric::BcSizeMapProjPhi, cell, size);

            match Side::from_z(cluster.position.z) {
                Side::Minus => minus += 1,
                Side::Plus => plus += 1,
            }

            if self.mass_pass && self.is_low_mass_candidate(cluster, cell, region) {
                candidates.push(cluster);
            }
        }

        match region {
            Region::Barrel => {
                sink.fill_bin(Metric::BcNum, RegionBin::Barrel.bin(), f64::from(minus + plus));
            }
            Region::Endcap => {
                sink.fill_bin(Metric::BcNum, RegionBin::EndcapMinus.bin(), f64::from(minus));
                sink.fill_bin(Metric::BcNum, RegionBin::EndcapPlus.bin(), f64::from(plus));
            }
        }

        if !self.mass_pass {
            return;
        }

        let masses = pair::low_mass_pairs(&candidates, clusters, self.cuts);
        debug!(
            "{region}: {} low-mass candidates, {} accepted ordered pairs",
            candidates.len(),
            masses.len()
        );
        for mass in masses {
            sink.fill_value(Metric::Pi0, mass);
            sink.fill_value(Metric::JPsi, mass);
        }
    }

    /// Fills supercluster metrics for one region and, on mass passes, the
    /// two-body spectra of the leading pair.
    pub fn analyze_super_clusters(
        &self,
        clusters: &[SuperCluster],
        region: Region,
        sink: &mut dyn MetricSink,
    ) {
        let hits = self.hits(region);
        let mut matched = 0u32;
        let mut leading = LeadingPair::new();

        for cluster in clusters {
            let Some(cell) = self.resolve(cluster, region) else {
                trace!("{region} supercluster at {:?} not resolved in region", cluster.position);
                continue;
            };

            let energy = cluster.energy;
            sink.fill_cell_value(Metric::ScEnergy, cell, energy);
            sink.fill_cell_value(Metric::ScEnergyLow, cell, energy);

            sink.fill_cell_value(Metric::ScNumBasicClusters, cell, f64::from(cluster.cluster_count));
            sink.fill_cell_value(Metric::ScNumCrystals, cell, f64::from(cluster.size));

            let Some(hits) = hits else {
                continue;
            };
            let Some(seed) = hits.lookup(&cell) else {
                trace!("{region} supercluster seed {cell} has no hit");
                continue;
            };

            sink.fill_cell_value(Metric::ScSeedEnergy, cell, seed.energy);
            sink.fill(Metric::ScClusterVsSeed, Fill::CellPair(cell, seed.energy, energy));

            sink.fill_cell(Metric::ScSeedOccupancy, cell);

            if clusters.len() == 1 {
                sink.fill_cell(Metric::SingleCrystalCluster, cell);
            }

            if energy > 0.0 {
                let window = self.run.topology.window(cell, SHAPE_WINDOW_HALF_WIDTH);
                let e3x3 = hits.energy_sum(&window);
                sink.fill_cell_value(Metric::ScR9, cell, e3x3 / energy);
            }

            matched += 1;

            if self.mass_pass {
                leading = leading.push(cluster);
            }
        }

        let bin = match region {
            Region::Barrel => RegionBin::Barrel,
            Region::Endcap => RegionBin::Endcap,
        };
        sink.fill_bin(Metric::ScNum, bin.bin(), f64::from(matched));

        if !self.mass_pass {
            return;
        }

        if let Some(mass) = leading.mass() {
            debug!("{region}: leading pair mass {mass:.2}");
            sink.fill_value(Metric::Z, mass);
            sink.fill_value(Metric::HighMass, mass);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::sink::MemorySink;
    use calomon_core::{HitRecord, Position, StaticRunContext};

    fn started_task(prescale: u32) -> ClusterTask {
        let mut task = ClusterTask::new(ClusterTaskConfig::new(prescale)).unwrap();
        task.begin_run(&StaticRunContext::uniform_grid()).unwrap();
        task
    }

    #[test]
    fn test_zero_prescale_rejected() {
        let err = ClusterTask::new(ClusterTaskConfig::new(0)).err().unwrap();
        assert!(err.is_invalid_configuration());
        assert!(ClusterTask::new(ClusterTaskConfig::new(1)).is_ok());
        assert!(ClusterTask::new(ClusterTaskConfig::new(1000)).is_ok());
    }

    #[test]
    fn test_begin_run_requires_all_services() {
        let mut task = ClusterTask::new(ClusterTaskConfig::new(1)).unwrap();

        let no_topology = StaticRunContext::new()
            .with_geometry(Region::Barrel, Arc::new(calomon_core::BarrelGrid))
            .with_geometry(Region::Endcap, Arc::new(calomon_core::EndcapGrid));
        assert!(task.begin_run(&no_topology).unwrap_err().is_setup());

        let no_endcap = StaticRunContext::new()
            .with_topology(Arc::new(calomon_core::GridTopology))
            .with_geometry(Region::Barrel, Arc::new(calomon_core::BarrelGrid));
        assert!(task.begin_run(&no_endcap).unwrap_err().is_setup());

        assert!(task.begin_run(&StaticRunContext::uniform_grid()).is_ok());
    }

    #[test]
    fn test_begin_event_requires_run() {
        let mut task = ClusterTask::new(ClusterTaskConfig::new(1)).unwrap();
        assert!(task.begin_event().err().unwrap().is_setup());
    }

    #[test]
    fn test_event_counter_and_prescale_gate() {
        let mut task = started_task(3);
        let passes: Vec<bool> = (0..6)
            .map(|_| task.begin_event().unwrap().is_mass_pass())
            .collect();
        assert_eq!(passes, vec![false, false, true, false, false, true]);
        assert_eq!(task.event_count(), 6);

        task.begin_run(&StaticRunContext::uniform_grid()).unwrap();
        assert_eq!(task.event_count(), 0);
    }

    #[test]
    fn test_dependencies_and_collections() {
        let task = started_task(1);
        let deps = task.dependencies();
        assert_eq!(deps.len(), 2);
        assert!(deps.contains(&Dependency::new(
            Collection::SuperClusters(Region::Endcap),
            Collection::RecHits(Region::Endcap),
        )));
        assert_eq!(task.collections().len(), 7);
        assert_eq!(task.name(), "ClusterTask");
    }

    #[test]
    fn test_run_type_filter() {
        let task = started_task(1);
        assert!(task.filter_run_type(&[RunType::Pedestal, RunType::PhysicsGlobal]));
        assert!(!task.filter_run_type(&[RunType::Laser, RunType::TestPulse]));
        assert!(!task.filter_run_type(&[]));
    }

    #[test]
    fn test_r9_uses_three_by_three_window() {
        let mut task = started_task(1);
        let seed = CellId::barrel(10, 100).unwrap();
        let hits = HitIndex::new(vec![
            HitRecord::new(seed, 6.0),
            HitRecord::new(CellId::barrel(11, 101).unwrap(), 1.0),
            HitRecord::new(CellId::barrel(9, 99).unwrap(), 1.0),
            // outside the window
            HitRecord::new(CellId::barrel(12, 100).unwrap(), 5.0),
        ]);
        let sc = SuperCluster::new(Position::from_eta_phi(0.18, 1.74, 129.0), 10.0, 12, 2)
            .with_seed(seed);

        let mut sink = MemorySink::new();
        let mut event = task.begin_event().unwrap();
        event.ingest_hits(&hits, Region::Barrel);
        event.analyze_super_clusters(&[sc], Region::Barrel, &mut sink);

        assert_eq!(sink.values(Metric::ScR9).collect::<Vec<_>>(), vec![0.8]);
        assert_eq!(sink.values(Metric::ScSeedEnergy).collect::<Vec<_>>(), vec![6.0]);
        assert_eq!(sink.count(Metric::SingleCrystalCluster), 1);
        assert_eq!(sink.fills(Metric::ScNum), &[Fill::Bin(RegionBin::Barrel.bin(), 1.0)]);
    }

    #[test]
    fn test_supercluster_without_seed_hit_keeps_energy_metrics() {
        let mut task = started_task(1);
        let seed = CellId::barrel(-20, 7).unwrap();
        let hits = HitIndex::default();
        let sc = SuperCluster::new(Position::from_eta_phi(-0.34, 0.1, 129.0), 30.0, 20, 3)
            .with_seed(seed);

        let mut sink = MemorySink::new();
        let mut event = task.begin_event().unwrap();
        event.ingest_hits(&hits, Region::Barrel);
        event.analyze_super_clusters(&[sc], Region::Barrel, &mut sink);

        assert_eq!(sink.count(Metric::ScEnergy), 1);
        assert_eq!(sink.count(Metric::ScEnergyLow), 1);
        assert_eq!(sink.fills(Metric::ScNumBasicClusters), &[Fill::CellValue(seed, 3.0)]);
        assert_eq!(sink.fills(Metric::ScNumCrystals), &[Fill::CellValue(seed, 20.0)]);
        assert_eq!(sink.count(Metric::ScSeedEnergy), 0);
        assert_eq!(sink.count(Metric::ScR9), 0);
        assert_eq!(sink.fills(Metric::ScNum), &[Fill::Bin(RegionBin::Barrel.bin(), 0.0)]);
    }
}
