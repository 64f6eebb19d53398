//! Merge the 2D time coordinates of many partitions into one.
//!
//! A [`Unionizer`] collects the time axis of every run it is shown, keyed by
//! the run's reference date, and then picks the cheapest representation of
//! the result: a single shared axis (orthogonal), one shared axis per
//! hour-of-day model cycle (regular), or every run's own axis (general).

mod orthogonal;
mod regular;

use std::collections::{btree_map::Entry, BTreeMap};

use itertools::Itertools;
use log::{debug, trace, warn};

pub use orthogonal::test_orthogonal;
pub use regular::test_regular;

use crate::{
    coord::{
        MergedTime2D, RunDate, RuntimeAxis, Time2DShape, Time2DSource, Time2DValue, TimeAxis,
        TimeUnit,
    },
    error::UnionError,
};

/// Settings fixed for the lifetime of a [`Unionizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnionConfig {
    /// Whether forecast times are intervals rather than point offsets. Every
    /// absorbed partition must agree.
    pub is_interval: bool,

    /// The unit given to the merged coordinate and to the empty axes made up
    /// for runs without any times.
    pub time_unit: TimeUnit,

    /// The coordinate-type code given to the merged coordinate and to made-up
    /// empty axes.
    pub code: i32,

    /// Whether to list every (run, forecast time) pair in the merged
    /// coordinate.
    pub make_vals: bool,
}

impl UnionConfig {
    pub fn new(is_interval: bool) -> UnionConfig {
        UnionConfig {
            is_interval,
            ..Default::default()
        }
    }

    pub fn with_time_unit(self, time_unit: TimeUnit) -> UnionConfig {
        UnionConfig { time_unit, ..self }
    }

    pub fn with_code(self, code: i32) -> UnionConfig {
        UnionConfig { code, ..self }
    }

    pub fn with_make_vals(self, make_vals: bool) -> UnionConfig {
        UnionConfig { make_vals, ..self }
    }
}

impl Default for UnionConfig {
    fn default() -> Self {
        UnionConfig {
            is_interval: false,
            time_unit: TimeUnit::default(),
            code: 0,
            make_vals: true,
        }
    }
}

/// Accumulates run time axes from any number of partitions and builds their
/// union.
///
/// A `Unionizer` is used for a single merge: absorb partitions, optionally
/// declare the complete set of runtimes, then [`build`](Unionizer::build).
#[derive(Debug)]
pub struct Unionizer {
    config: UnionConfig,
    time_map: BTreeMap<RunDate, TimeAxis>,
}

impl Unionizer {
    pub fn new(config: UnionConfig) -> Unionizer {
        Unionizer {
            config,
            time_map: BTreeMap::new(),
        }
    }

    /// The number of distinct runs accumulated so far.
    pub fn n_runs(&self) -> usize {
        self.time_map.len()
    }

    /// Take every run of `partition`. A run that was already absorbed from an
    /// earlier partition is replaced.
    ///
    /// Fails without changing anything if the partition's kind of forecast
    /// time (point or interval) doesn't match this union's.
    pub fn absorb<S: Time2DSource + ?Sized>(&mut self, partition: &S) -> Result<(), UnionError> {
        let expected = self.config.is_interval;
        if partition.is_interval() != expected {
            return Err(UnionError::IntervalMismatch {
                expected,
                found: partition.is_interval(),
                run: None,
            });
        }
        let axes = partition.run_axes();
        if let Some(axis) = axes.iter().find(|axis| axis.is_interval() != expected) {
            return Err(UnionError::IntervalMismatch {
                expected,
                found: axis.is_interval(),
                run: Some(axis.ref_date()),
            });
        }

        debug!("Absorbing {} runs", axes.len());
        for axis in axes {
            if axis.unit() != self.config.time_unit {
                warn!(
                    "Run {} counts forecast times in {}, but the union uses {}",
                    axis.ref_date(),
                    axis.unit(),
                    self.config.time_unit
                );
            }
            if let Some(old) = self.time_map.insert(axis.ref_date(), axis) {
                trace!(
                    "Replaced the {} previously absorbed times of run {}",
                    old.len(),
                    old.ref_date()
                );
            }
        }
        Ok(())
    }

    /// Declare the complete set of runtimes. Any runtime that hasn't been
    /// absorbed gets an empty time axis; absorbed runs are left alone.
    pub fn declare_runtimes<I: IntoIterator<Item = RunDate>>(&mut self, runtimes: I) {
        let UnionConfig {
            is_interval,
            time_unit,
            code,
            ..
        } = self.config;
        for runtime in runtimes {
            if let Entry::Vacant(entry) = self.time_map.entry(runtime) {
                debug!("Run {runtime} has no times; adding an empty axis");
                entry.insert(TimeAxis::empty(runtime, time_unit, code, is_interval));
            }
        }
    }

    /// Build the union of everything absorbed.
    pub fn build(self) -> MergedTime2D {
        let UnionConfig {
            is_interval,
            time_unit,
            code,
            make_vals,
        } = self.config;
        let runtime = RuntimeAxis::new(self.time_map.keys().copied(), time_unit);

        let values = if make_vals {
            self.time_map
                .values()
                .flat_map(|axis| {
                    axis.values()
                        .iter()
                        .map(move |&time| Time2DValue::new(axis.ref_date(), time))
                })
                .sorted()
                .collect()
        } else {
            vec![]
        };

        let shape = if let Some(axis) = test_orthogonal(self.time_map.values()).cloned() {
            Time2DShape::Orthogonal(axis)
        } else if let Some(axes) =
            test_regular(self.time_map.values()).map(|axes| axes.mapped(|axis| axis.clone()))
        {
            Time2DShape::Regular(axes)
        } else {
            Time2DShape::General(self.time_map.into_values().collect())
        };
        debug!(
            "Built a {} time2D with {} runs and {} values",
            shape.name(),
            runtime.len(),
            values.len()
        );

        MergedTime2D::new(time_unit, code, is_interval, runtime, values, shape)
    }
}

#[cfg(test)]
mod tests {
    use vec1::vec1;

    use super::*;
    use crate::{
        coord::{PartitionTime2D, TimeValue},
        testing::{intervals, offsets, run},
    };

    fn partition(axes: Vec<TimeAxis>) -> PartitionTime2D {
        PartitionTime2D::new(false, axes)
    }

    #[test]
    fn test_later_partition_wins() {
        let mut union = Unionizer::new(UnionConfig::default());
        union
            .absorb(&partition(vec![offsets(run(22, 0), &[0, 6])]))
            .unwrap();
        union
            .absorb(&partition(vec![offsets(run(22, 0), &[0, 6, 12, 18])]))
            .unwrap();
        assert_eq!(union.n_runs(), 1);

        let merged = union.build();
        assert_eq!(
            merged.time_axis(0).unwrap(),
            offsets(run(22, 0), &[0, 6, 12, 18])
        );
        assert_eq!(merged.values().len(), 4);
    }

    #[test]
    fn test_later_partition_wins_even_if_smaller() {
        let mut union = Unionizer::new(UnionConfig::default());
        union
            .absorb(&partition(vec![offsets(run(22, 0), &[0, 6, 12])]))
            .unwrap();
        union
            .absorb(&partition(vec![offsets(run(22, 0), &[3])]))
            .unwrap();
        let merged = union.build();
        assert_eq!(merged.time_axis(0).unwrap().values(), &[TimeValue::Offset(3)]);
    }

    #[test]
    fn test_declare_runtimes_fills_gaps() {
        let mut union = Unionizer::new(UnionConfig::default().with_code(4));
        union
            .absorb(&partition(vec![offsets(run(22, 0), &[0, 6])]))
            .unwrap();
        union.declare_runtimes([run(22, 0), run(22, 12)]);
        assert_eq!(union.n_runs(), 2);

        let merged = union.build();
        assert_eq!(merged.n_runs(), 2);
        assert_eq!(merged.ref_date(1), Some(run(22, 12)));
        assert_eq!(merged.values().len(), 2);
        assert!(merged
            .values()
            .iter()
            .all(|value| value.ref_date == run(22, 0)));
    }

    #[test]
    fn test_declare_runtimes_is_idempotent() {
        let mut union = Unionizer::new(UnionConfig::default());
        union
            .absorb(&partition(vec![offsets(run(22, 0), &[0, 6])]))
            .unwrap();
        union.declare_runtimes([run(22, 0), run(22, 12)]);
        union.declare_runtimes([run(22, 12), run(23, 0), run(22, 0)]);
        assert_eq!(union.n_runs(), 3);

        let merged = union.build();
        let runtimes: Vec<RunDate> = merged.runtime().iter().collect();
        assert_eq!(runtimes, vec![run(22, 0), run(22, 12), run(23, 0)]);
        assert_eq!(merged.values().len(), 2);
    }

    #[test]
    fn test_empty_axis_uses_config() {
        let config = UnionConfig::new(true).with_code(9);
        let mut union = Unionizer::new(config);
        union.declare_runtimes([run(22, 0)]);
        let merged = union.build();
        let axis = merged.time_axis(0).unwrap();
        assert!(axis.is_empty());
        assert!(axis.is_interval());
        assert_eq!(axis.code(), 9);
    }

    #[test]
    fn test_interval_mismatch_fails_fast() {
        let mut union = Unionizer::new(UnionConfig::default());
        let result = union.absorb(&PartitionTime2D::new(
            true,
            vec![intervals(run(22, 0), &[(0, 6)])],
        ));
        assert!(matches!(
            result,
            Err(UnionError::IntervalMismatch {
                expected: false,
                found: true,
                run: None
            })
        ));
        assert_eq!(union.n_runs(), 0);
    }

    #[test]
    fn test_interval_axis_in_point_partition_fails() {
        let mut union = Unionizer::new(UnionConfig::default());
        let result = union.absorb(&partition(vec![
            offsets(run(22, 0), &[0, 6]),
            intervals(run(22, 12), &[(0, 6)]),
        ]));
        match result {
            Err(UnionError::IntervalMismatch { run: Some(r), .. }) => assert_eq!(r, run(22, 12)),
            _ => panic!("expected an interval mismatch"),
        }
        // Nothing from the failed partition was kept.
        assert_eq!(union.n_runs(), 0);
    }

    #[test]
    fn test_orthogonal_shape() {
        let mut union = Unionizer::new(UnionConfig::default());
        union
            .absorb(&partition(vec![
                offsets(run(22, 0), &[0, 6]),
                offsets(run(22, 6), &[0, 6, 12]),
                offsets(run(22, 12), &[0, 6]),
            ]))
            .unwrap();
        let merged = union.build();
        assert_eq!(
            merged.shape(),
            &Time2DShape::Orthogonal(offsets(run(22, 6), &[0, 6, 12]))
        );
        assert_eq!(merged.values().len(), 7);
    }

    #[test]
    fn test_regular_shape() {
        let mut union = Unionizer::new(UnionConfig::default());
        union
            .absorb(&partition(vec![
                offsets(run(22, 0), &[0, 6, 12]),
                offsets(run(22, 12), &[0, 6, 12, 18]),
            ]))
            .unwrap();
        union
            .absorb(&partition(vec![
                offsets(run(23, 0), &[0, 6, 12]),
                offsets(run(23, 12), &[0, 6, 12, 18]),
            ]))
            .unwrap();
        let merged = union.build();
        assert_eq!(
            merged.shape(),
            &Time2DShape::Regular(vec1![
                offsets(run(22, 0), &[0, 6, 12]),
                offsets(run(22, 12), &[0, 6, 12, 18]),
            ])
        );
    }

    #[test]
    fn test_general_shape() {
        let mut union = Unionizer::new(UnionConfig::default());
        union
            .absorb(&partition(vec![
                offsets(run(22, 0), &[0, 6]),
                offsets(run(23, 0), &[12, 18]),
            ]))
            .unwrap();
        let merged = union.build();
        assert_eq!(
            merged.shape(),
            &Time2DShape::General(vec![
                offsets(run(22, 0), &[0, 6]),
                offsets(run(23, 0), &[12, 18]),
            ])
        );
        assert_eq!(merged.values().len(), 4);
    }

    #[test]
    fn test_values_sorted() {
        let mut union = Unionizer::new(UnionConfig::default());
        union
            .absorb(&partition(vec![
                offsets(run(23, 0), &[6, 0]),
                offsets(run(22, 0), &[12, 0]),
            ]))
            .unwrap();
        let merged = union.build();
        let values: Vec<(RunDate, i32)> = merged
            .values()
            .iter()
            .map(|v| (v.ref_date, v.time.end()))
            .collect();
        assert_eq!(
            values,
            vec![
                (run(22, 0), 0),
                (run(22, 0), 12),
                (run(23, 0), 0),
                (run(23, 0), 6)
            ]
        );
    }

    #[test]
    fn test_without_vals() {
        let mut union = Unionizer::new(UnionConfig::default().with_make_vals(false));
        union
            .absorb(&partition(vec![offsets(run(22, 0), &[0, 6])]))
            .unwrap();
        let merged = union.build();
        assert!(merged.values().is_empty());
        assert!(merged.is_orthogonal());
    }

    #[test]
    fn test_build_nothing() {
        let merged = Unionizer::new(UnionConfig::default()).build();
        assert!(merged.runtime().is_empty());
        assert!(merged.values().is_empty());
        assert_eq!(merged.shape(), &Time2DShape::General(vec![]));
    }
}
