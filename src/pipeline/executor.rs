//! Plan executor
//!
//! Evaluates a whole [`ExecutionPlan`] as one operation. Derived columns are
//! independent of each other, so they are computed on the rayon pool and
//! appended in plan order.

use rayon::prelude::*;
use tracing::debug;

use super::planner::{ExecutionPlan, PlannedColumn};
use crate::builtins::rolling_mean_into;
use crate::error::{Error, Result};
use crate::table::{Column, Table};

/// How the executor schedules derived columns
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One rayon task per derived column
    #[default]
    Parallel,
    /// Evaluate derived columns one after another on the calling thread
    Sequential,
}

/// Execution statistics for performance measurement
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Number of expressions evaluated
    pub exprs_evaluated: usize,

    /// Number of distinct source columns read
    pub sources_read: usize,

    /// Number of column allocations
    pub allocations: usize,
}

/// Plan executor
pub struct Executor {
    mode: ExecutionMode,
    stats: ExecutionStats,
}

impl Executor {
    pub fn new() -> Self {
        Self::with_mode(ExecutionMode::default())
    }

    pub fn with_mode(mode: ExecutionMode) -> Self {
        Executor {
            mode,
            stats: ExecutionStats::default(),
        }
    }

    /// Execute a plan on `input`, returning a new table
    ///
    /// The output holds every input column followed by the planned columns.
    pub fn execute(&mut self, plan: &ExecutionPlan, input: &Table) -> Result<ExecutionResult> {
        let rows = input.row_count();
        debug!(
            outputs = plan.len(),
            sources = plan.source_count(),
            rows,
            mode = ?self.mode,
            "executing projection plan"
        );

        let sources: Vec<&[f64]> = plan
            .outputs
            .iter()
            .map(|planned| {
                input.columns[planned.source]
                    .as_f64_slice()
                    .ok_or_else(|| Error::TypeMismatch {
                        name: input.names[planned.source].clone(),
                        expected: "f64",
                        found: input.columns[planned.source].type_name(),
                    })
            })
            .collect::<Result<_>>()?;

        let compute = |(planned, src): (&PlannedColumn, &&[f64])| -> (String, Column) {
            let mut out = vec![0.0; rows];
            rolling_mean_into(&mut out, src, planned.window);
            (planned.name.clone(), Column::F64(out))
        };

        let derived: Vec<(String, Column)> = match self.mode {
            ExecutionMode::Parallel => plan
                .outputs
                .par_iter()
                .zip(sources.par_iter())
                .map(compute)
                .collect(),
            ExecutionMode::Sequential => plan
                .outputs
                .iter()
                .zip(sources.iter())
                .map(compute)
                .collect(),
        };

        self.stats.exprs_evaluated += plan.len();
        self.stats.sources_read += plan.source_count();
        self.stats.allocations += derived.len();

        let table = input.hstack(derived)?;

        Ok(ExecutionResult {
            table,
            stats: self.stats.clone(),
        })
    }

    /// Get execution statistics
    pub fn stats(&self) -> &ExecutionStats {
        &self.stats
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of plan execution
#[derive(Debug)]
pub struct ExecutionResult {
    pub table: Table,
    pub stats: ExecutionStats,
}
