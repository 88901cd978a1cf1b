//! Typed column with embedded null sentinels (kdb-style)

/// Null sentinel for Timestamp columns (i64 nanoseconds since epoch)
///
/// Using i64::MIN as the null timestamp sentinel, similar to kdb's type-specific nulls.
pub const NULL_TIMESTAMP: i64 = i64::MIN;

/// A typed column of data with type-specific null representation (kdb-style)
///
/// All nulls are embedded as sentinel values in the data vector:
/// - F64: f64::NAN
/// - Timestamp: NULL_TIMESTAMP (i64::MIN)
#[derive(Clone, Debug)]
pub enum Column {
    /// F64 column: data with embedded NaN for missing values
    ///
    /// Rolling outputs use NaN for the warm-up rows that lack a full window.
    F64(Vec<f64>),

    /// Timestamp column: nanoseconds since epoch (1970-01-01 00:00:00) as i64
    ///
    /// Missing values represented as NULL_TIMESTAMP (i64::MIN).
    Timestamp(Vec<i64>),
}

impl Column {
    pub fn new_f64(data: Vec<f64>) -> Self {
        Column::F64(data)
    }

    pub fn new_timestamp(data: Vec<i64>) -> Self {
        Column::Timestamp(data)
    }

    pub fn len(&self) -> usize {
        match self {
            Column::F64(data) => data.len(),
            Column::Timestamp(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Column::F64(_) => "f64",
            Column::Timestamp(_) => "timestamp",
        }
    }

    /// Get raw F64 slice for monomorphic kernels
    #[inline(always)]
    pub fn as_f64_slice(&self) -> Option<&[f64]> {
        match self {
            Column::F64(data) => Some(data),
            _ => None,
        }
    }

    /// Get raw Timestamp slice
    #[inline(always)]
    pub fn as_timestamp_slice(&self) -> Option<&[i64]> {
        match self {
            Column::Timestamp(data) => Some(data),
            _ => None,
        }
    }

    /// Count null sentinels in the column
    pub fn null_count(&self) -> usize {
        match self {
            Column::F64(data) => data.iter().filter(|x| x.is_nan()).count(),
            Column::Timestamp(data) => data.iter().filter(|x| **x == NULL_TIMESTAMP).count(),
        }
    }

    pub fn has_nulls(&self) -> bool {
        self.null_count() > 0
    }

    /// Exact equality where two nulls compare equal
    ///
    /// F64 values are compared by value, so `0.0` and `-0.0` are equal and
    /// every NaN matches every other NaN.
    pub fn same_values(&self, other: &Column) -> bool {
        match (self, other) {
            (Column::F64(a), Column::F64(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b)
                        .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
            }
            (Column::Timestamp(a), Column::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}
