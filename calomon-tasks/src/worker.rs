//! Worker trait used by the scheduler.

use calomon_core::{EventRecord, RunContext, RunType};

use crate::collection::{Collection, Dependency};
use crate::error::Result;
use crate::sink::MetricSink;

/// Trait for per-event monitoring workers.
///
/// The scheduler calls [`Worker::begin_run`] once per run and
/// [`Worker::process_event`] once per event, serially for a given worker
/// instance.
pub trait Worker: Send {
    /// Registered worker name.
    fn name(&self) -> &'static str;

    /// Collections the worker consumes.
    fn collections(&self) -> &'static [Collection];

    /// Ordering constraints between consumed collections.
    fn dependencies(&self) -> Vec<Dependency> {
        Vec::new()
    }

    /// Returns true if the worker should run for a run reporting
    /// `run_types`, one entry per readout unit.
    fn filter_run_type(&self, run_types: &[RunType]) -> bool {
        let _ = run_types;
        true
    }

    /// Acquires run-scoped resources.
    fn begin_run(&mut self, context: &dyn RunContext) -> Result<()>;

    /// Analyzes one event, filling `sink`.
    fn process_event(&mut self, event: &EventRecord, sink: &mut dyn MetricSink) -> Result<()>;
}
