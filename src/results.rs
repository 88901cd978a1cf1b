//! Timing results table and its CSV form
//!
//! One row per benchmarked strategy:
//!
//! ```text
//! moving_averages_calculation_method,elapsed_time,system_user_time
//! by_for_loop,0.81,0.80
//! by_eval_string_query,0.12,0.93
//! ```

use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::moving_averages::Strategy;

/// Best-case timings of one strategy, in seconds
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimingRow {
    #[serde(rename = "moving_averages_calculation_method")]
    pub method: Strategy,
    pub elapsed_time: f64,
    pub system_user_time: f64,
}

impl TimingRow {
    pub fn new(method: Strategy, elapsed: Duration, system_user: Duration) -> Self {
        TimingRow {
            method,
            elapsed_time: elapsed.as_secs_f64(),
            system_user_time: system_user.as_secs_f64(),
        }
    }
}

/// Write rows to `path`, creating parent directories as needed
pub fn write_results(path: &Path, rows: &[TimingRow]) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| Error::resource(dir, e))?;
    }
    let file = File::create(path).map_err(|e| Error::resource(path, e))?;

    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| Error::resource(path, e))?;

    info!(path = %path.display(), rows = rows.len(), "wrote timing results");
    Ok(())
}

/// Read rows previously written by [`write_results`]
pub fn read_results(path: &Path) -> Result<Vec<TimingRow>> {
    let file = File::open(path).map_err(|e| Error::resource(path, e))?;
    let mut reader = csv::Reader::from_reader(file);

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<TimingRow>, csv::Error>>()?;
    Ok(rows)
}
