//! Core table and column types

pub mod column;

pub use column::{Column, NULL_TIMESTAMP};

use crate::error::{Error, Result};

/// A table is a collection of named, typed columns
///
/// All columns share one row count and are aligned by position.
#[derive(Debug, Clone)]
pub struct Table {
    pub names: Vec<String>,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(names: Vec<String>, columns: Vec<Column>) -> Self {
        assert_eq!(names.len(), columns.len());
        Self { names, columns }
    }

    /// Checked constructor: equal column lengths and unique names
    pub fn try_new(names: Vec<String>, columns: Vec<Column>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(Error::LengthMismatch {
                expected: names.len(),
                found: columns.len(),
            });
        }
        let expected = columns.first().map(|c| c.len()).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
            return Err(Error::LengthMismatch {
                expected,
                found: bad.len(),
            });
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(Error::invalid(
                    "names",
                    format!("duplicate column name '{name}'"),
                ));
            }
        }
        Ok(Self { names, columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.position(name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| Error::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Borrow a numeric column's data by name
    pub fn f64_column(&self, name: &str) -> Result<&[f64]> {
        let col = self.column(name)?;
        col.as_f64_slice().ok_or_else(|| Error::TypeMismatch {
            name: name.to_string(),
            expected: "f64",
            found: col.type_name(),
        })
    }

    /// Horizontal concatenation: a new table with `extra` appended after the
    /// existing columns. `self` is left untouched.
    pub fn hstack(&self, extra: Vec<(String, Column)>) -> Result<Table> {
        let rows = self.row_count();
        let mut names = self.names.clone();
        let mut columns = self.columns.clone();
        names.reserve(extra.len());
        columns.reserve(extra.len());

        for (name, col) in extra {
            if !columns.is_empty() && col.len() != rows {
                return Err(Error::LengthMismatch {
                    expected: rows,
                    found: col.len(),
                });
            }
            if names.contains(&name) {
                return Err(Error::invalid(
                    "names",
                    format!("duplicate column name '{name}'"),
                ));
            }
            names.push(name);
            columns.push(col);
        }

        Ok(Table { names, columns })
    }

    /// Same column names in the same order with identical values (nulls equal)
    pub fn same_as(&self, other: &Table) -> bool {
        self.names == other.names
            && self.columns.len() == other.columns.len()
            && self
                .columns
                .iter()
                .zip(&other.columns)
                .all(|(a, b)| a.same_values(b))
    }
}
