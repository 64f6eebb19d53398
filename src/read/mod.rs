pub mod listing;

use thiserror::Error;

use crate::{coord::RunDate, error::ParseTimeUnitError};

pub use listing::{parse_run_date, ListingReader};

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("couldn't read listing: {0}")]
    Io(#[from] std::io::Error),

    #[error("couldn't parse listing: {0}")]
    Json(#[from] serde_json::Error),

    #[error("couldn't parse '{date}' as a reference date: {reason}")]
    BadDate { date: String, reason: String },

    #[error(transparent)]
    BadUnit(#[from] ParseTimeUnitError),

    #[error("run {0} must list exactly one of 'offsets' or 'intervals'")]
    AmbiguousRun(RunDate),

    #[error("run {run} lists the wrong kind of forecast time; the listing has interval = {interval}")]
    WrongTimeKind { run: RunDate, interval: bool },
}
