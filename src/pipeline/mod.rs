//! Batched projection engine
//!
//! Derived columns are described as expressions, planned once against the
//! input schema and evaluated as a single operation:
//!
//! ```text
//! Projection: [RollingMean(data, 1) as ma_1, RollingMean(data, 2) as ma_2, ...]
//!     ↓ Planner::plan  (resolve columns, validate windows and names)
//! ExecutionPlan: [PlannedColumn { source: 1, window: 1 }, ...]
//!     ↓ Executor::execute  (one rayon task per derived column)
//! Table: input columns ++ derived columns
//! ```

pub mod executor;
pub mod ir;
pub mod planner;

pub use executor::{ExecutionMode, ExecutionResult, ExecutionStats, Executor};
pub use ir::{moving_average_name, Expr, Projection};
pub use planner::{ExecutionPlan, PlannedColumn, Planner};

use crate::error::Result;
use crate::table::Table;

/// Plan and execute a projection in one call
pub fn project(table: &Table, projection: &Projection) -> Result<Table> {
    let plan = Planner::plan(projection, table)?;
    Ok(Executor::new().execute(&plan, table)?.table)
}
