//! Synthetic time-series generator
//!
//! Produces a `timestamp` column sampled at a fixed interval over an inclusive
//! date range, plus `data0..dataN` columns drawn from a standard normal
//! distribution.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

use crate::error::{Error, Result};
use crate::table::{Column, Table};

pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Name of the i-th generated data column
pub fn data_column_name(i: usize) -> String {
    format!("data{i}")
}

/// Generator parameters
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub start: NaiveDateTime,
    /// Inclusive; an end before `start` yields an empty table
    pub end: NaiveDateTime,
    pub interval: TimeDelta,
    pub column_n: usize,
}

impl Default for GeneratorConfig {
    /// One minute of one-second samples starting at the epoch (61 rows)
    fn default() -> Self {
        let start = DateTime::<Utc>::UNIX_EPOCH.naive_utc();
        GeneratorConfig {
            start,
            end: start + TimeDelta::minutes(1),
            interval: TimeDelta::seconds(1),
            column_n: 1,
        }
    }
}

/// Parse an interval such as `"1s"`, `"500ms"`, `"2m"`, `"1h"`, `"1d"`
///
/// Supported units: `ns`, `us`, `ms`, `s`, `m`, `h`, `d`, `w`.
pub fn parse_interval(s: &str) -> Result<TimeDelta> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| Error::invalid("interval", format!("'{s}' has no unit")))?;
    let (digits, unit) = s.split_at(split);

    let value: i64 = digits
        .parse()
        .map_err(|_| Error::invalid("interval", format!("'{s}' has no leading count")))?;
    if value <= 0 {
        return Err(Error::invalid("interval", format!("'{s}' must be positive")));
    }

    let delta = match unit {
        "ns" => Some(TimeDelta::nanoseconds(value)),
        "us" => Some(TimeDelta::microseconds(value)),
        "ms" => TimeDelta::try_milliseconds(value),
        "s" => TimeDelta::try_seconds(value),
        "m" => TimeDelta::try_minutes(value),
        "h" => TimeDelta::try_hours(value),
        "d" => TimeDelta::try_days(value),
        "w" => TimeDelta::try_weeks(value),
        other => {
            return Err(Error::invalid(
                "interval",
                format!("unknown unit '{other}' in '{s}'"),
            ))
        }
    };
    delta.ok_or_else(|| Error::invalid("interval", format!("'{s}' is out of range")))
}

/// Number of rows covering [start, end] inclusive at `interval`
fn row_count(config: &GeneratorConfig) -> Result<usize> {
    let step = config
        .interval
        .num_nanoseconds()
        .filter(|ns| *ns > 0)
        .ok_or_else(|| Error::invalid("interval", "must be positive and below ~292 years"))?;

    if config.end < config.start {
        return Ok(0);
    }
    let span = (config.end - config.start)
        .num_nanoseconds()
        .ok_or_else(|| Error::invalid("end", "date range too wide for nanosecond timestamps"))?;

    usize::try_from(span / step + 1)
        .map_err(|_| Error::invalid("end", "date range produces too many rows"))
}

/// Generate a series using the supplied random source
pub fn generate_series<R: Rng + ?Sized>(config: &GeneratorConfig, rng: &mut R) -> Result<Table> {
    if config.column_n == 0 {
        return Err(Error::invalid("column_n", "at least one data column is required"));
    }

    let n = row_count(config)?;
    let start_ns = config
        .start
        .and_utc()
        .timestamp_nanos_opt()
        .ok_or_else(|| Error::invalid("start", "outside the nanosecond timestamp range"))?;
    let step = config.interval.num_nanoseconds().unwrap_or_default();

    let mut timestamps = Vec::with_capacity(n);
    for i in 0..n as i64 {
        let ts = step
            .checked_mul(i)
            .and_then(|off| start_ns.checked_add(off))
            .ok_or_else(|| Error::invalid("end", "outside the nanosecond timestamp range"))?;
        timestamps.push(ts);
    }

    let mut names = Vec::with_capacity(config.column_n + 1);
    let mut columns = Vec::with_capacity(config.column_n + 1);
    names.push(TIMESTAMP_COLUMN.to_string());
    columns.push(Column::new_timestamp(timestamps));

    for i in 0..config.column_n {
        let data: Vec<f64> = (0..n).map(|_| rng.sample(StandardNormal)).collect();
        names.push(data_column_name(i));
        columns.push(Column::new_f64(data));
    }

    debug!(rows = n, columns = config.column_n, "generated synthetic series");
    Table::try_new(names, columns)
}

/// Generate a series from the thread-local random source
pub fn generate_data(config: &GeneratorConfig) -> Result<Table> {
    generate_series(config, &mut rand::thread_rng())
}

/// Reproducible variant of [`generate_data`]
pub fn generate_data_seeded(config: &GeneratorConfig, seed: u64) -> Result<Table> {
    generate_series(config, &mut StdRng::seed_from_u64(seed))
}
