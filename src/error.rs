use thiserror::Error;

use crate::coord::RunDate;

#[derive(Error, Debug)]
pub enum UnionError {
    /// A partition (or one of its runs) holds a different kind of forecast
    /// time than the union was configured for. The union is left untouched.
    #[error("{} forecast times can't be merged into a union of {} forecast times{}", kind(*found), kind(*expected), at_run(run))]
    IntervalMismatch {
        expected: bool,
        found: bool,
        run: Option<RunDate>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("couldn't parse '{0}' as a time unit")]
pub struct ParseTimeUnitError(pub String);

fn kind(is_interval: bool) -> &'static str {
    if is_interval {
        "interval"
    } else {
        "point"
    }
}

fn at_run(run: &Option<RunDate>) -> String {
    match run {
        Some(run) => format!(" (run {run})"),
        None => String::new(),
    }
}
