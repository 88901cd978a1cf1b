//! Projection planner
//!
//! Resolves every expression of a [`Projection`] against a table schema and
//! produces an [`ExecutionPlan`]. All validation happens here, so execution
//! never sees a bad window or an unknown column.

use std::collections::HashSet;

use super::ir::{Expr, Projection};
use crate::error::{Error, Result};
use crate::table::{Column, Table};

/// One derived column to compute
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedColumn {
    /// Index of the source column in the input table
    pub source: usize,
    pub window: usize,
    pub name: String,
}

/// Resolved projection, outputs in request order
#[derive(Clone, Debug, Default)]
pub struct ExecutionPlan {
    pub outputs: Vec<PlannedColumn>,
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Distinct source columns read by the plan
    pub fn source_count(&self) -> usize {
        self.outputs
            .iter()
            .map(|o| o.source)
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Projection planner
pub struct Planner;

impl Planner {
    /// Plan a projection against `table`
    ///
    /// Fails with `MissingColumn` for an unknown source, `TypeMismatch` for a
    /// non-numeric source, and `InvalidParameter` for a window below 1 or an
    /// output name that is already taken.
    pub fn plan(projection: &Projection, table: &Table) -> Result<ExecutionPlan> {
        let mut taken: HashSet<&str> = table.names.iter().map(String::as_str).collect();
        let mut outputs = Vec::with_capacity(projection.len());

        for expr in &projection.exprs {
            match expr {
                Expr::RollingMean {
                    source,
                    window,
                    alias,
                } => {
                    let idx = table.position(source).ok_or_else(|| Error::MissingColumn {
                        name: source.clone(),
                    })?;
                    if !matches!(table.columns[idx], Column::F64(_)) {
                        return Err(Error::TypeMismatch {
                            name: source.clone(),
                            expected: "f64",
                            found: table.columns[idx].type_name(),
                        });
                    }
                    if *window < 1 {
                        return Err(Error::invalid(
                            "window_sizes",
                            format!("window size must be >= 1, got {window}"),
                        ));
                    }
                    if !taken.insert(alias.as_str()) {
                        return Err(Error::invalid(
                            "window_sizes",
                            format!("output column '{alias}' would be produced twice"),
                        ));
                    }
                    outputs.push(PlannedColumn {
                        source: idx,
                        window: *window,
                        name: alias.clone(),
                    });
                }
            }
        }

        Ok(ExecutionPlan { outputs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(
            vec!["timestamp".to_string(), "data".to_string()],
            vec![
                Column::new_timestamp(vec![0, 1, 2]),
                Column::new_f64(vec![1.0, 2.0, 3.0]),
            ],
        )
    }

    #[test]
    fn test_plan_in_request_order() {
        let proj = Projection::rolling_means("data", &[2, 1]);
        let plan = Planner::plan(&proj, &table()).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.outputs[0].window, 2);
        assert_eq!(plan.outputs[0].name, "ma_2");
        assert_eq!(plan.outputs[1].source, 1);
        assert_eq!(plan.source_count(), 1);
    }

    #[test]
    fn test_interleaved_sources_not_regrouped() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![Column::new_f64(vec![1.0, 2.0]), Column::new_f64(vec![3.0, 4.0])],
        );
        let mut proj = Projection::new();
        proj.push(Expr::rolling_mean("b", 1).alias("b1"));
        proj.push(Expr::rolling_mean("a", 1).alias("a1"));
        proj.push(Expr::rolling_mean("b", 2).alias("b2"));

        let plan = Planner::plan(&proj, &table).unwrap();
        let order: Vec<(usize, &str)> = plan
            .outputs
            .iter()
            .map(|o| (o.source, o.name.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "b1"), (0, "a1"), (1, "b2")]);
        assert_eq!(plan.source_count(), 2);
    }

    #[test]
    fn test_missing_column() {
        let proj = Projection::rolling_means("nope", &[1]);
        let err = Planner::plan(&proj, &table()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { name } if name == "nope"));
    }

    #[test]
    fn test_non_numeric_source() {
        let proj = Projection::rolling_means("timestamp", &[1]);
        let err = Planner::plan(&proj, &table()).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_zero_window() {
        let proj = Projection::rolling_means("data", &[1, 0]);
        let err = Planner::plan(&proj, &table()).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_duplicate_window() {
        let proj = Projection::rolling_means("data", &[2, 2]);
        let err = Planner::plan(&proj, &table()).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_alias_collides_with_existing_column() {
        let mut proj = Projection::new();
        proj.push(Expr::rolling_mean("data", 2).alias("data"));
        let err = Planner::plan(&proj, &table()).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_empty_projection() {
        let plan = Planner::plan(&Projection::new(), &table()).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.source_count(), 0);
    }
}
