use hifitime::Epoch;

use crate::coord::{RunDate, TimeAxis, TimeInterval, TimeUnit};

/// A run issued on the given day of November 2014, at the given UTC hour.
pub(crate) fn run(day: u8, hour: u8) -> RunDate {
    RunDate::new(Epoch::from_gregorian_utc_hms(2014, 11, day, hour, 0, 0))
}

pub(crate) fn offsets(ref_date: RunDate, offsets: &[i32]) -> TimeAxis {
    TimeAxis::offsets(ref_date, TimeUnit::default(), 0, offsets.to_vec())
}

pub(crate) fn intervals(ref_date: RunDate, bounds: &[(i32, i32)]) -> TimeAxis {
    TimeAxis::intervals(
        ref_date,
        TimeUnit::default(),
        0,
        bounds
            .iter()
            .map(|&(start, end)| TimeInterval::new(start, end))
            .collect(),
    )
}
