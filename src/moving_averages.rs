//! Moving-average strategies
//!
//! Every strategy takes a table, the name of a numeric column and an ordered
//! list of window widths, and returns a new table with one `ma_<width>`
//! column appended per width. The input table is never modified.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builtins::rolling_mean_f64;
use crate::error::{Error, Result};
use crate::pipeline::{self, moving_average_name, Expr, Projection};
use crate::table::{Column, Table};

/// Reference implementation with the widths 1, 2 and 3 spelled out
///
/// Only used to check the other strategies.
pub fn moving_averages_hard_coded(df: &Table, data_colname: &str) -> Result<Table> {
    let projection = Projection {
        exprs: vec![
            Expr::rolling_mean(data_colname, 1).alias("ma_1"),
            Expr::rolling_mean(data_colname, 2).alias("ma_2"),
            Expr::rolling_mean(data_colname, 3).alias("ma_3"),
        ],
    };
    pipeline::project(df, &projection)
}

/// One column at a time: compute each width's column in turn, then
/// concatenate them after the original columns
pub fn moving_averages_loop(
    df: &Table,
    data_colname: &str,
    window_sizes: &[usize],
) -> Result<Table> {
    let data = df.f64_column(data_colname)?;
    validate_window_sizes(window_sizes)?;

    let mut mas = Vec::with_capacity(window_sizes.len());
    for &w in window_sizes {
        mas.push((moving_average_name(w), Column::F64(rolling_mean_f64(data, w))));
    }

    df.hstack(mas)
}

/// All widths submitted to the projection engine as one request
///
/// The engine plans every derived column together and may compute them in
/// parallel. Output is identical to [`moving_averages_loop`].
pub fn moving_averages_batch(
    df: &Table,
    data_colname: &str,
    window_sizes: &[usize],
) -> Result<Table> {
    df.f64_column(data_colname)?;
    validate_window_sizes(window_sizes)?;

    pipeline::project(df, &Projection::rolling_means(data_colname, window_sizes))
}

/// Reject widths below 1 and repeated widths
pub fn validate_window_sizes(window_sizes: &[usize]) -> Result<()> {
    let mut seen = HashSet::with_capacity(window_sizes.len());
    for &w in window_sizes {
        if w < 1 {
            return Err(Error::invalid(
                "window_sizes",
                format!("window size must be >= 1, got {w}"),
            ));
        }
        if !seen.insert(w) {
            return Err(Error::invalid(
                "window_sizes",
                format!("window size {w} appears more than once"),
            ));
        }
    }
    Ok(())
}

/// The two benchmarked strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "by_for_loop")]
    Loop,
    #[serde(rename = "by_eval_string_query")]
    Batch,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::Loop, Strategy::Batch];

    /// Identifier written to the results file
    pub fn id(self) -> &'static str {
        match self {
            Strategy::Loop => "by_for_loop",
            Strategy::Batch => "by_eval_string_query",
        }
    }

    /// Human-readable chart label
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Loop => "Loop One-by-One",
            Strategy::Batch => "String Query, Eval Function",
        }
    }

    pub fn run(self, df: &Table, data_colname: &str, window_sizes: &[usize]) -> Result<Table> {
        match self {
            Strategy::Loop => moving_averages_loop(df, data_colname, window_sizes),
            Strategy::Batch => moving_averages_batch(df, data_colname, window_sizes),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
