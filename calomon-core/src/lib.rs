//! calomon-core: Core types and contracts for calorimeter cluster monitoring.
//!
//! This crate provides the detector data model (cells, regions, hits and
//! reconstructed clusters) together with the geometry and topology contracts
//! that monitoring workers query while analyzing an event.
//!

pub mod cell;
pub mod cluster;
pub mod error;
pub mod event;
pub mod geometry;
pub mod grid;
pub mod hit;
pub mod position;

pub use cell::{CellId, Region, Side};
pub use cluster::{BasicCluster, Cluster, SuperCluster};
pub use error::{Error, Result};
pub use event::{EventRecord, RegionData, RunType};
pub use geometry::{GeometryResolver, RunContext, StaticRunContext, Topology};
pub use grid::{BarrelGrid, EndcapGrid, GridTopology};
pub use hit::{HitIndex, HitRecord};
pub use position::Position;
