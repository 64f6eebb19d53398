//! Union 2D (run × forecast time) coordinates of partitioned forecast
//! collections.
//!
//! Every partition of a collection (e.g. one per model run, or one per day of
//! runs) knows the forecast times of the runs it holds. A [`Unionizer`] merges
//! these into a single [`MergedTime2D`] and picks its cheapest valid
//! representation ([`Time2DShape`]).

pub mod coord;
pub mod error;
pub mod read;
pub mod union;

#[cfg(test)]
pub(crate) mod testing;

pub use coord::{
    MergedTime2D, PartitionTime2D, PeriodField, RunDate, RuntimeAxis, Time2DShape, Time2DSource,
    Time2DValue, TimeAxis, TimeInterval, TimeUnit, TimeValue,
};
pub use error::UnionError;
pub use union::{test_orthogonal, test_regular, UnionConfig, Unionizer};
