//! 2D (reference date × forecast time) coordinates.

use std::fmt;

use itertools::Itertools;
use vec1::Vec1;

use super::{RunDate, RuntimeAxis, TimeAxis, TimeUnit, TimeValue};

/// One explicit (reference date, forecast time) pair. Pairs order by date,
/// then by forecast time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time2DValue {
    pub ref_date: RunDate,
    pub time: TimeValue,
}

impl Time2DValue {
    pub fn new(ref_date: RunDate, time: TimeValue) -> Time2DValue {
        Time2DValue { ref_date, time }
    }
}

/// The compact representation chosen for a [`MergedTime2D`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Time2DShape {
    /// A single axis reused by every run.
    Orthogonal(TimeAxis),

    /// One axis per hour-of-day model cycle, ordered by hour. Every run issued
    /// at that hour reuses the cycle's axis. The reference date attached to
    /// each axis is that of one of the cycle's runs; only its hour matters.
    Regular(Vec1<TimeAxis>),

    /// Each run keeps its own axis, in run order.
    General(Vec<TimeAxis>),
}

impl Time2DShape {
    pub fn name(&self) -> &'static str {
        match self {
            Time2DShape::Orthogonal(_) => "orthogonal",
            Time2DShape::Regular(_) => "regular",
            Time2DShape::General(_) => "general",
        }
    }
}

/// Anything that can contribute a set of runs to a union: a single partition's
/// coordinate, or an already-merged one.
pub trait Time2DSource {
    /// Whether the forecast times are intervals rather than point offsets.
    fn is_interval(&self) -> bool;

    /// The time axis of every run, in any order.
    fn run_axes(&self) -> Vec<TimeAxis>;
}

/// The 2D time coordinate of a single partition, as handed over by whatever
/// decoded the partition's grid records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTime2D {
    pub is_interval: bool,
    pub axes: Vec<TimeAxis>,
}

impl PartitionTime2D {
    pub fn new(is_interval: bool, axes: Vec<TimeAxis>) -> PartitionTime2D {
        PartitionTime2D { is_interval, axes }
    }
}

impl Time2DSource for PartitionTime2D {
    fn is_interval(&self) -> bool {
        self.is_interval
    }

    fn run_axes(&self) -> Vec<TimeAxis> {
        self.axes.clone()
    }
}

/// The union of many partitions' 2D time coordinates.
///
/// The explicit pairs are the canonical content of the coordinate; `shape` is
/// the cheapest representation found that reproduces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTime2D {
    unit: TimeUnit,
    code: i32,
    is_interval: bool,
    runtime: RuntimeAxis,
    /// Every (run, forecast time) pair, sorted. Empty if the union was told
    /// not to materialise them.
    values: Vec<Time2DValue>,
    shape: Time2DShape,
}

impl MergedTime2D {
    pub(crate) fn new(
        unit: TimeUnit,
        code: i32,
        is_interval: bool,
        runtime: RuntimeAxis,
        values: Vec<Time2DValue>,
        shape: Time2DShape,
    ) -> MergedTime2D {
        MergedTime2D {
            unit,
            code,
            is_interval,
            runtime,
            values,
            shape,
        }
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn runtime(&self) -> &RuntimeAxis {
        &self.runtime
    }

    pub fn values(&self) -> &[Time2DValue] {
        &self.values
    }

    pub fn shape(&self) -> &Time2DShape {
        &self.shape
    }

    pub fn is_orthogonal(&self) -> bool {
        matches!(self.shape, Time2DShape::Orthogonal(_))
    }

    pub fn is_regular(&self) -> bool {
        matches!(self.shape, Time2DShape::Regular(_))
    }

    pub fn n_runs(&self) -> usize {
        self.runtime.len()
    }

    pub fn ref_date(&self, run: usize) -> Option<RunDate> {
        self.runtime.get(run)
    }

    /// The forecast times of run `run`, resolved from whichever shape is in
    /// use and tagged with that run's reference date.
    pub fn time_axis(&self, run: usize) -> Option<TimeAxis> {
        let ref_date = self.runtime.get(run)?;
        match &self.shape {
            Time2DShape::Orthogonal(axis) => Some(axis.with_ref_date(ref_date)),
            Time2DShape::Regular(axes) => {
                let hour = ref_date.hour_of_day();
                axes.iter()
                    .find(|axis| axis.ref_date().hour_of_day() == hour)
                    .map(|axis| axis.with_ref_date(ref_date))
            }
            Time2DShape::General(axes) => axes.get(run).cloned(),
        }
    }

    /// The number of forecast times of the longest run.
    pub fn max_times(&self) -> usize {
        match &self.shape {
            Time2DShape::Orthogonal(axis) => axis.len(),
            Time2DShape::Regular(axes) => axes.iter().map(TimeAxis::len).max().unwrap_or(0),
            Time2DShape::General(axes) => axes.iter().map(TimeAxis::len).max().unwrap_or(0),
        }
    }
}

impl Time2DSource for MergedTime2D {
    fn is_interval(&self) -> bool {
        self.is_interval
    }

    /// Each run's own times, rebuilt from the explicit pairs. A shared axis
    /// may hold times some of its runs never had, so the shape is only used
    /// when no pairs were listed.
    fn run_axes(&self) -> Vec<TimeAxis> {
        if self.values.is_empty() {
            return (0..self.n_runs())
                .filter_map(|run| self.time_axis(run))
                .collect();
        }

        let mut by_run = self
            .values
            .iter()
            .map(|value| (value.ref_date, value.time))
            .into_group_map();
        self.runtime
            .iter()
            .map(|ref_date| {
                let values = by_run.remove(&ref_date).unwrap_or_default();
                TimeAxis::from_values(ref_date, self.unit, self.code, self.is_interval, values)
            })
            .collect()
    }
}

impl fmt::Display for MergedTime2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_interval { "intervals" } else { "offsets" };
        writeln!(
            f,
            "{} time2D: {} runs, {} {kind} in units of {} (code {})",
            self.shape.name(),
            self.n_runs(),
            self.values.len(),
            self.unit,
            self.code
        )?;
        if let (Some(first), Some(last)) = (self.runtime.first(), self.runtime.last()) {
            writeln!(f, "  runs: {first} to {last}")?;
        }
        match &self.shape {
            Time2DShape::Orthogonal(axis) => write_axis(f, "shared", axis)?,
            Time2DShape::Regular(axes) => {
                for axis in axes {
                    let label = format!("{:02}Z", axis.ref_date().hour_of_day());
                    write_axis(f, &label, axis)?;
                }
            }
            Time2DShape::General(axes) => {
                for axis in axes {
                    write_axis(f, &axis.ref_date().to_string(), axis)?;
                }
            }
        }
        Ok(())
    }
}

fn write_axis(f: &mut fmt::Formatter<'_>, label: &str, axis: &TimeAxis) -> fmt::Result {
    writeln!(f, "  {label}: [{}]", axis.values().iter().join(", "))
}
