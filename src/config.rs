//! Benchmark constants and output locations

use std::env;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{Error, Result};
use crate::generator::{data_column_name, parse_interval, GeneratorConfig};

pub const RESULTS_FILE: &str = "results.csv";
pub const ELAPSED_PLOT_FILE: &str = "elapsed_time_plot.png";
pub const ALL_TIMES_PLOT_FILE: &str = "all_times_plot.png";

/// Parameters of one benchmark run
#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Sampling interval in `parse_interval` syntax
    pub interval: String,
    pub data_column_n: usize,
    /// Column the moving averages are computed over
    pub data_column: String,
    pub window_sizes: Vec<usize>,
    pub repeat_n: usize,
}

impl Default for BenchConfig {
    /// January 2020 at one-second resolution, widths 1..=199, 400 repeats
    fn default() -> Self {
        BenchConfig {
            start: midnight(2020, 1, 1),
            end: midnight(2020, 2, 1),
            interval: "1s".to_string(),
            data_column_n: 1,
            data_column: data_column_name(0),
            window_sizes: (1..200).collect(),
            repeat_n: 400,
        }
    }
}

impl BenchConfig {
    pub fn interval(&self) -> Result<TimeDelta> {
        parse_interval(&self.interval)
    }

    pub fn generator(&self) -> Result<GeneratorConfig> {
        if self.end < self.start {
            return Err(Error::invalid("end", "date range ends before it starts"));
        }
        Ok(GeneratorConfig {
            start: self.start,
            end: self.end,
            interval: self.interval()?,
            column_n: self.data_column_n,
        })
    }
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Where results and charts are written
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub results_dir: PathBuf,
    /// Charts are duplicated here for the notebook
    pub notebook_img_dir: PathBuf,
}

impl OutputPaths {
    /// `<root>/results` and `<root>/notebook/img`
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        OutputPaths {
            results_dir: root.join("results"),
            notebook_img_dir: root.join("notebook").join("img"),
        }
    }

    /// Rooted at the current working directory
    pub fn from_cwd() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| Error::resource(".", e))?;
        Ok(Self::from_root(cwd))
    }

    pub fn results_csv(&self) -> PathBuf {
        self.results_dir.join(RESULTS_FILE)
    }
}
