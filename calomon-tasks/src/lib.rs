//! calomon-tasks: Cluster monitoring workers.
//!
//! This crate provides the per-event cluster analysis worker:
//! - **Cell metrics** - energy, occupancy and size maps per resolved cell
//! - **Supercluster shape** - seed energy, cluster-vs-seed and R9
//! - **Pair reconstruction** - prescaled low-mass and two-body mass search
//! - **Registry** - name-based construction for the external scheduler
//!
#![warn(missing_docs)]

mod cluster_task;
pub mod collection;
pub mod config;
mod error;
pub mod metrics;
pub mod pair;
mod registry;
pub mod sink;
mod worker;

pub use cluster_task::{ClusterEvent, ClusterTask};
pub use collection::{order_collections, Collection, Dependency};
pub use config::{ClusterTaskConfig, LowMassCuts};
pub use error::{Error, Result};
pub use metrics::{build_metric_ordering, Metric, RegionBin};
pub use pair::{FourMomentum, LeadingPair};
pub use registry::{WorkerFactory, WorkerRegistry};
pub use sink::{Fill, MemorySink, MetricSink, MetricSummary};
pub use worker::Worker;

// Re-export core types for convenience
pub use calomon_core::{CellId, Region, RunContext, RunType};
