//! Time coordinates of gridded forecast collections.
//!
//! Each model run is identified by its reference date ([`RunDate`]) and owns a
//! [`TimeAxis`] of forecast offsets measured from that date. The sorted set of
//! reference dates forms a [`RuntimeAxis`]. The 2D (run × forecast time)
//! coordinates built out of these live in [`time2d`].

pub mod time2d;

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use hifitime::{Duration, Epoch};
use itertools::Itertools;

use crate::error::ParseTimeUnitError;

pub use time2d::{MergedTime2D, PartitionTime2D, Time2DShape, Time2DSource, Time2DValue};

/// The reference (issue) date of a single model run.
///
/// Ordering, equality and hashing all use the date's TAI nanoseconds, so two
/// [`Epoch`]s describing the same instant in different time scales are the
/// same run.
#[derive(Debug, Clone, Copy)]
pub struct RunDate(Epoch);

impl RunDate {
    pub fn new(epoch: Epoch) -> RunDate {
        RunDate(epoch)
    }

    pub fn epoch(self) -> Epoch {
        self.0
    }

    /// The UTC hour of the day (0 to 23) this run was issued at. This
    /// identifies the run's model cycle.
    pub fn hour_of_day(self) -> u8 {
        let (_, _, _, hour, ..) = self.0.to_gregorian_utc();
        hour
    }

    fn tai_nanoseconds(self) -> i128 {
        self.0.to_tai_duration().total_nanoseconds()
    }
}

impl From<Epoch> for RunDate {
    fn from(epoch: Epoch) -> RunDate {
        RunDate(epoch)
    }
}

impl PartialEq for RunDate {
    fn eq(&self, other: &Self) -> bool {
        self.tai_nanoseconds() == other.tai_nanoseconds()
    }
}

impl Eq for RunDate {}

impl PartialOrd for RunDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RunDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tai_nanoseconds().cmp(&other.tai_nanoseconds())
    }
}

impl Hash for RunDate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tai_nanoseconds().hash(state);
    }
}

impl fmt::Display for RunDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A forecast interval, e.g. an accumulation between two offsets. Intervals
/// order by `start`, then by `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeInterval {
    pub start: i32,
    pub end: i32,
}

impl TimeInterval {
    pub fn new(start: i32, end: i32) -> TimeInterval {
        TimeInterval { start, end }
    }
}

/// A single forecast time, in units of the owning axis' [`TimeUnit`].
///
/// Point offsets and intervals are never mixed inside one axis or one union,
/// so the derived ordering (all offsets before all intervals) never has to
/// compare the two kinds against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeValue {
    Offset(i32),
    Interval(TimeInterval),
}

impl TimeValue {
    pub fn is_interval(&self) -> bool {
        matches!(self, TimeValue::Interval(_))
    }

    /// The offset at which this forecast time is valid. Intervals are valid at
    /// their end.
    pub fn end(&self) -> i32 {
        match self {
            TimeValue::Offset(o) => *o,
            TimeValue::Interval(i) => i.end,
        }
    }
}

impl From<i32> for TimeValue {
    fn from(offset: i32) -> TimeValue {
        TimeValue::Offset(offset)
    }
}

impl From<TimeInterval> for TimeValue {
    fn from(interval: TimeInterval) -> TimeValue {
        TimeValue::Interval(interval)
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeValue::Offset(o) => write!(f, "{o}"),
            TimeValue::Interval(i) => write!(f, "({},{})", i.start, i.end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodField {
    Second,
    Minute,
    Hour,
    Day,
}

impl PeriodField {
    fn seconds(self) -> u64 {
        match self {
            PeriodField::Second => 1,
            PeriodField::Minute => 60,
            PeriodField::Hour => 3600,
            PeriodField::Day => 86400,
        }
    }

    fn name(self) -> &'static str {
        match self {
            PeriodField::Second => "second",
            PeriodField::Minute => "minute",
            PeriodField::Hour => "hour",
            PeriodField::Day => "day",
        }
    }
}

/// The unit that forecast offsets are counted in, e.g. "1 hour" or "15
/// minutes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeUnit {
    pub count: u32,
    pub field: PeriodField,
}

impl TimeUnit {
    pub fn new(count: u32, field: PeriodField) -> TimeUnit {
        TimeUnit { count, field }
    }

    pub fn to_duration(self) -> Duration {
        Duration::from_seconds((u64::from(self.count) * self.field.seconds()) as f64)
    }
}

impl Default for TimeUnit {
    fn default() -> Self {
        TimeUnit::new(1, PeriodField::Hour)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.count == 1 { "" } else { "s" };
        write!(f, "{} {}{plural}", self.count, self.field.name())
    }
}

impl FromStr for TimeUnit {
    type Err = ParseTimeUnitError;

    /// Parses strings like "hour", "6 hours", "15 min" or "1 d".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeUnitError(s.to_string());
        let mut words = s.split_whitespace();
        let (count, field) = match (words.next(), words.next(), words.next()) {
            (Some(field), None, None) => (1, field),
            (Some(count), Some(field), None) => (count.parse::<u32>().map_err(|_| err())?, field),
            _ => return Err(err()),
        };
        let field = field.to_lowercase();
        let singular = field.strip_suffix('s').filter(|f| !f.is_empty());
        let field = match singular.unwrap_or(field.as_str()) {
            "sec" | "second" | "s" => PeriodField::Second,
            "min" | "minute" | "m" => PeriodField::Minute,
            "hr" | "hour" | "h" => PeriodField::Hour,
            "day" | "d" => PeriodField::Day,
            _ => return Err(err()),
        };
        if count == 0 {
            return Err(err());
        }
        Ok(TimeUnit::new(count, field))
    }
}

/// The forecast times of a single model run.
///
/// A `TimeAxis` is never edited after construction; a newer axis for the same
/// run replaces it wholesale. It may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAxis {
    ref_date: RunDate,
    unit: TimeUnit,
    /// The coordinate-type code of the producing grid format, carried through
    /// untouched.
    code: i32,
    is_interval: bool,
    values: Vec<TimeValue>,
}

impl TimeAxis {
    /// An axis of point forecast offsets.
    pub fn offsets(ref_date: RunDate, unit: TimeUnit, code: i32, offsets: Vec<i32>) -> TimeAxis {
        TimeAxis {
            ref_date,
            unit,
            code,
            is_interval: false,
            values: offsets.into_iter().map(TimeValue::Offset).collect(),
        }
    }

    /// An axis of forecast intervals.
    pub fn intervals(
        ref_date: RunDate,
        unit: TimeUnit,
        code: i32,
        intervals: Vec<TimeInterval>,
    ) -> TimeAxis {
        TimeAxis {
            ref_date,
            unit,
            code,
            is_interval: true,
            values: intervals.into_iter().map(TimeValue::Interval).collect(),
        }
    }

    /// An axis with no forecast times, for a run that is known to exist but
    /// contributed nothing.
    pub fn empty(ref_date: RunDate, unit: TimeUnit, code: i32, is_interval: bool) -> TimeAxis {
        TimeAxis::from_values(ref_date, unit, code, is_interval, vec![])
    }

    pub(crate) fn from_values(
        ref_date: RunDate,
        unit: TimeUnit,
        code: i32,
        is_interval: bool,
        values: Vec<TimeValue>,
    ) -> TimeAxis {
        TimeAxis {
            ref_date,
            unit,
            code,
            is_interval,
            values,
        }
    }

    /// The same forecast times, attached to another run.
    pub fn with_ref_date(&self, ref_date: RunDate) -> TimeAxis {
        TimeAxis {
            ref_date,
            ..self.clone()
        }
    }

    pub fn ref_date(&self) -> RunDate {
        self.ref_date
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn is_interval(&self) -> bool {
        self.is_interval
    }

    pub fn values(&self) -> &[TimeValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The absolute time at which `value` is valid for this run.
    pub fn valid_time(&self, value: &TimeValue) -> Epoch {
        self.ref_date.epoch() + self.unit.to_duration() * f64::from(value.end())
    }
}

/// The sorted, de-duplicated reference dates of a 2D time coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeAxis {
    dates: Vec<RunDate>,
    unit: TimeUnit,
}

impl RuntimeAxis {
    pub fn new<I: IntoIterator<Item = RunDate>>(dates: I, unit: TimeUnit) -> RuntimeAxis {
        RuntimeAxis {
            dates: dates.into_iter().sorted().dedup().collect(),
            unit,
        }
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<RunDate> {
        self.dates.get(index).copied()
    }

    pub fn first(&self) -> Option<RunDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<RunDate> {
        self.dates.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = RunDate> + '_ {
        self.dates.iter().copied()
    }

    pub fn index_of(&self, date: RunDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Each run's offset from the first run, in units of this axis' time unit.
    pub fn offsets(&self) -> Vec<f64> {
        let first = match self.first() {
            Some(first) => first.epoch(),
            None => return vec![],
        };
        let unit_seconds = self.unit.to_duration().to_seconds();
        self.dates
            .iter()
            .map(|d| (d.epoch() - first).to_seconds() / unit_seconds)
            .collect()
    }
}
