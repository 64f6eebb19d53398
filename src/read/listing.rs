//! JSON listings of a partition's run times.
//!
//! A listing looks like:
//!
//! ```json
//! {
//!   "interval": false,
//!   "unit": "1 hour",
//!   "code": 0,
//!   "runs": [
//!     { "ref_date": "2014-11-22T00:00:00 UTC", "offsets": [0, 6, 12] },
//!     { "ref_date": "2014-11-22T12:00:00 UTC", "offsets": [] }
//!   ]
//! }
//! ```
//!
//! Interval listings give `"intervals": [[0, 6], [6, 12]]` for each run
//! instead.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    str::FromStr,
};

use hifitime::Epoch;
use log::debug;
use serde::Deserialize;

use super::ReadError;
use crate::coord::{PartitionTime2D, RunDate, TimeAxis, TimeInterval, TimeUnit};

#[derive(Deserialize)]
struct Listing {
    #[serde(default)]
    interval: bool,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    code: i32,
    runs: Vec<ListedRun>,
}

#[derive(Deserialize)]
struct ListedRun {
    ref_date: String,
    #[serde(default)]
    offsets: Option<Vec<i32>>,
    #[serde(default)]
    intervals: Option<Vec<[i32; 2]>>,
}

pub struct ListingReader {
    /// Where the listing came from, if it was read from disk.
    pub path: Option<PathBuf>,

    pub partition: PartitionTime2D,

    /// The unit the listing counts forecast times in. Defaults to 1 hour.
    pub unit: TimeUnit,

    pub code: i32,
}

impl ListingReader {
    pub fn new<P: AsRef<Path>>(listing: P) -> Result<ListingReader, ReadError> {
        let listing = listing.as_ref();
        debug!("Reading partition listing: {}", listing.display());
        let file = File::open(listing)?;
        let parsed: Listing = serde_json::from_reader(BufReader::new(file))?;
        let mut reader = ListingReader::from_listing(parsed)?;
        reader.path = Some(listing.to_path_buf());
        Ok(reader)
    }

    pub fn from_json(json: &str) -> Result<ListingReader, ReadError> {
        ListingReader::from_listing(serde_json::from_str(json)?)
    }

    fn from_listing(listing: Listing) -> Result<ListingReader, ReadError> {
        let unit = match listing.unit {
            Some(unit) => unit.parse::<TimeUnit>()?,
            None => TimeUnit::default(),
        };
        let code = listing.code;

        let axes = listing
            .runs
            .into_iter()
            .map(|run| {
                let ref_date = parse_run_date(&run.ref_date)?;
                match (run.offsets, run.intervals) {
                    (Some(offsets), None) if !listing.interval => {
                        Ok(TimeAxis::offsets(ref_date, unit, code, offsets))
                    }
                    (None, Some(bounds)) if listing.interval => {
                        let intervals = bounds
                            .into_iter()
                            .map(|[start, end]| TimeInterval::new(start, end))
                            .collect();
                        Ok(TimeAxis::intervals(ref_date, unit, code, intervals))
                    }
                    (Some(_), Some(_)) | (None, None) => Err(ReadError::AmbiguousRun(ref_date)),
                    _ => Err(ReadError::WrongTimeKind {
                        run: ref_date,
                        interval: listing.interval,
                    }),
                }
            })
            .collect::<Result<Vec<_>, ReadError>>()?;
        debug!("Listing has {} runs ({unit}, code {code})", axes.len());

        Ok(ListingReader {
            path: None,
            partition: PartitionTime2D::new(listing.interval, axes),
            unit,
            code,
        })
    }
}

/// Parse a reference date such as "2014-11-22T06:00:00 UTC".
pub fn parse_run_date(s: &str) -> Result<RunDate, ReadError> {
    Epoch::from_str(s.trim())
        .map(RunDate::new)
        .map_err(|e| ReadError::BadDate {
            date: s.to_string(),
            reason: format!("{e:?}"),
        })
}
