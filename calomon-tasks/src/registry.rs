//! Name-based worker construction.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::cluster_task::ClusterTask;
use crate::config::ClusterTaskConfig;
use crate::error::{Error, Result};
use crate::worker::Worker;

/// Builds a worker from its JSON parameters.
pub type WorkerFactory = fn(&serde_json::Value) -> Result<Box<dyn Worker>>;

/// Mapping from worker names to factories, filled at process start and
/// read by the scheduler.
#[derive(Clone, Default)]
pub struct WorkerRegistry {
    factories: BTreeMap<String, WorkerFactory>,
}

impl fmt::Debug for WorkerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

impl WorkerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every worker of this crate.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ClusterTask::NAME, create_cluster_task);
        registry
    }

    /// Registers `factory` under `name`, returning the factory it replaced.
    pub fn register(&mut self, name: &str, factory: WorkerFactory) -> Option<WorkerFactory> {
        self.factories.insert(name.to_string(), factory)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Constructs the worker registered under `name`.
    pub fn create(&self, name: &str, params: &serde_json::Value) -> Result<Box<dyn Worker>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::UnknownWorker(name.to_string()))?;
        debug!("creating worker {name}");
        factory(params)
    }
}

fn create_cluster_task(params: &serde_json::Value) -> Result<Box<dyn Worker>> {
    let config = ClusterTaskConfig::from_value(params.clone())?;
    Ok(Box::new(ClusterTask::new(config)?))
}
