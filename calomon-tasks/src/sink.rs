//! Metric fill interface and an in-memory recorder.

use serde::Serialize;

use calomon_core::CellId;

use crate::metrics::Metric;

/// A single fill operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Fill {
    /// Occupancy of a cell.
    Cell(CellId),
    /// Value keyed by cell.
    CellValue(CellId, f64),
    /// Two values keyed by cell (x, y).
    CellPair(CellId, f64, f64),
    /// Value in a numbered bin.
    Bin(u32, f64),
    /// Unkeyed value.
    Axis(f64),
    /// Weighted entry at an axis coordinate (coordinate, weight).
    AxisValue(f64, f64),
}

impl Fill {
    /// Cell the fill is keyed by, if any.
    #[must_use]
    pub fn cell(&self) -> Option<CellId> {
        match *self {
            Fill::Cell(cell) | Fill::CellValue(cell, _) | Fill::CellPair(cell, _, _) => Some(cell),
            Fill::Bin(..) | Fill::Axis(_) | Fill::AxisValue(..) => None,
        }
    }

    /// The filled quantity: 1 for occupancy, the y value of a pair, the
    /// weight of an axis entry, the value otherwise.
    #[must_use]
    pub fn value(&self) -> f64 {
        match *self {
            Fill::Cell(_) => 1.0,
            Fill::CellValue(_, value)
            | Fill::CellPair(_, _, value)
            | Fill::Bin(_, value)
            | Fill::Axis(value)
            | Fill::AxisValue(_, value) => value,
        }
    }
}

/// Destination of metric fills.
///
/// Fills are fire-and-forget; a sink must accept every fill.
pub trait MetricSink {
    /// Records one fill of `metric`.
    fn fill(&mut self, metric: Metric, fill: Fill);

    /// Records cell occupancy.
    fn fill_cell(&mut self, metric: Metric, cell: CellId) {
        self.fill(metric, Fill::Cell(cell));
    }

    /// Records a value keyed by cell.
    fn fill_cell_value(&mut self, metric: Metric, cell: CellId, value: f64) {
        self.fill(metric, Fill::CellValue(cell, value));
    }

    /// Records a value in a numbered bin.
    fn fill_bin(&mut self, metric: Metric, bin: u32, value: f64) {
        self.fill(metric, Fill::Bin(bin, value));
    }

    /// Records an unkeyed value.
    fn fill_value(&mut self, metric: Metric, value: f64) {
        self.fill(metric, Fill::Axis(value));
    }
}

impl<S: MetricSink + ?Sized> MetricSink for &mut S {
    fn fill(&mut self, metric: Metric, fill: Fill) {
        (**self).fill(metric, fill);
    }
}

/// Sink that keeps every fill in memory, one list per metric.
#[derive(Debug, Clone)]
pub struct MemorySink {
    fills: [Vec<Fill>; Metric::COUNT],
}

impl Default for MemorySink {
    fn default() -> Self {
        Self {
            fills: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills recorded for `metric`, in fill order.
    #[must_use]
    pub fn fills(&self, metric: Metric) -> &[Fill] {
        &self.fills[metric.index()]
    }

    /// Number of fills recorded for `metric`.
    #[must_use]
    pub fn count(&self, metric: Metric) -> usize {
        self.fills[metric.index()].len()
    }

    /// Filled values of `metric` (see [`Fill::value`]).
    pub fn values(&self, metric: Metric) -> impl Iterator<Item = f64> + '_ {
        self.fills[metric.index()].iter().map(Fill::value)
    }

    /// Total number of fills over all metrics.
    #[must_use]
    pub fn total_fills(&self) -> usize {
        self.fills.iter().map(Vec::len).sum()
    }

    /// Moves all fills of `other` into this sink.
    pub fn merge(&mut self, other: MemorySink) {
        for (mine, theirs) in self.fills.iter_mut().zip(other.fills) {
            mine.extend(theirs);
        }
    }

    /// Drops all recorded fills.
    pub fn clear(&mut self) {
        self.fills.iter_mut().for_each(Vec::clear);
    }

    /// Per-metric totals in index order.
    #[must_use]
    pub fn summary(&self) -> Vec<MetricSummary> {
        Metric::ALL
            .into_iter()
            .map(|metric| {
                let values = self.values(metric);
                let (sum, min, max) = values.fold((0.0, None, None), |(sum, min, max), v| {
                    (
                        sum + v,
                        Some(min.map_or(v, |m: f64| m.min(v))),
                        Some(max.map_or(v, |m: f64| m.max(v))),
                    )
                });
                MetricSummary {
                    name: metric.name(),
                    fills: self.count(metric),
                    sum,
                    min,
                    max,
                }
            })
            .collect()
    }
}

impl MetricSink for MemorySink {
    fn fill(&mut self, metric: Metric, fill: Fill) {
        self.fills[metric.index()].push(fill);
    }
}

/// Totals of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    /// Metric name.
    pub name: &'static str,
    /// Number of fills.
    pub fills: usize,
    /// Sum of filled values.
    pub sum: f64,
    /// Smallest filled value.
    pub min: Option<f64>,
    /// Largest filled value.
    pub max: Option<f64>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_memory_sink_records_per_metric() {
        let cell = CellId::barrel(1, 1).unwrap();
        let mut sink = MemorySink::new();
        sink.fill_cell(Metric::BcOccupancy, cell);
        sink.fill_cell_value(Metric::BcEnergy, cell, 2.5);
        sink.fill_value(Metric::Pi0, 0.135);
        sink.fill_value(Metric::Pi0, 0.140);

        assert_eq!(sink.count(Metric::BcOccupancy), 1);
        assert_eq!(sink.count(Metric::Pi0), 2);
        assert_eq!(sink.count(Metric::Z), 0);
        assert_eq!(sink.total_fills(), 4);
        assert_eq!(sink.fills(Metric::BcEnergy)[0].cell(), Some(cell));
    }

    #[test]
    fn test_summary_and_merge() {
        let mut a = MemorySink::new();
        a.fill_bin(Metric::BcNum, 1, 3.0);
        let mut b = MemorySink::new();
        b.fill_bin(Metric::BcNum, 1, 5.0);
        a.merge(b);

        let summary = a.summary();
        assert_eq!(summary.len(), Metric::COUNT);
        let bc_num = &summary[Metric::BcNum.index()];
        assert_eq!(bc_num.name, "BCNum");
        assert_eq!(bc_num.fills, 2);
        assert_eq!(bc_num.sum, 8.0);
        assert_eq!(bc_num.min, Some(3.0));
        assert_eq!(bc_num.max, Some(5.0));
        assert_eq!(summary[Metric::Z.index()].min, None);

        a.clear();
        assert_eq!(a.total_fills(), 0);
    }

    #[test]
    fn test_fill_through_trait_object() {
        let mut sink = MemorySink::new();
        {
            let dyn_sink: &mut dyn MetricSink = &mut sink;
            dyn_sink.fill(
                Metric::ScClusterVsSeed,
                Fill::CellPair(CellId::barrel(2, 2).unwrap(), 1.0, 4.0),
            );
        }
        assert_eq!(sink.values(Metric::ScClusterVsSeed).collect::<Vec<_>>(), vec![4.0]);
    }
}
