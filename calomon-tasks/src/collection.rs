//! Input collections and the ordering contract with the scheduler.

use log::warn;
use serde::{Deserialize, Serialize};

use calomon_core::Region;

/// An event input a worker can consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    /// Run-level information (run types).
    Run,
    /// Calibrated cell hits of a region.
    RecHits(Region),
    /// Basic clusters of a region.
    BasicClusters(Region),
    /// Superclusters of a region.
    SuperClusters(Region),
}

/// `consumer` must be processed after `producer` within an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Collection that reads state left by the producer.
    pub consumer: Collection,
    /// Collection that must be handled first.
    pub producer: Collection,
}

impl Dependency {
    /// Creates a dependency of `consumer` on `producer`.
    #[must_use]
    pub const fn new(consumer: Collection, producer: Collection) -> Self {
        Self { consumer, producer }
    }
}

/// Orders `collections` so that every dependency is honoured.
///
/// The order is stable: collections without pending producers keep their
/// relative input order. Producers missing from `collections` are ignored.
/// On a dependency cycle the remaining collections are appended in input
/// order.
#[must_use]
pub fn order_collections(collections: &[Collection], dependencies: &[Dependency]) -> Vec<Collection> {
    let mut pending: Vec<Collection> = collections.to_vec();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let ready = pending.iter().position(|candidate| {
            dependencies
                .iter()
                .filter(|dep| dep.consumer == *candidate)
                .all(|dep| !pending.contains(&dep.producer) || dep.producer == *candidate)
        });
        match ready {
            Some(idx) => ordered.push(pending.remove(idx)),
            None => {
                warn!("dependency cycle among {pending:?}; keeping input order");
                ordered.append(&mut pending);
            }
        }
    }
    ordered
}
