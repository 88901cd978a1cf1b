//! Expression IR for derived columns
//!
//! A [`Projection`] is an ordered list of expressions that is submitted to the
//! engine as one request, as opposed to one request per derived column.

/// Derived-column expression
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Trailing rolling mean of `source` over `window` rows, named `alias`
    RollingMean {
        source: String,
        window: usize,
        alias: String,
    },
}

impl Expr {
    /// Rolling mean with the conventional `ma_<window>` output name
    pub fn rolling_mean(source: impl Into<String>, window: usize) -> Self {
        Expr::RollingMean {
            source: source.into(),
            window,
            alias: moving_average_name(window),
        }
    }

    /// Replace the output name
    pub fn alias(self, name: impl Into<String>) -> Self {
        match self {
            Expr::RollingMean { source, window, .. } => Expr::RollingMean {
                source,
                window,
                alias: name.into(),
            },
        }
    }

    pub fn output_name(&self) -> &str {
        match self {
            Expr::RollingMean { alias, .. } => alias,
        }
    }
}

/// Output column name for a moving average of the given width
pub fn moving_average_name(window: usize) -> String {
    format!("ma_{window}")
}

/// Ordered set of expressions evaluated together
#[derive(Clone, Debug, Default)]
pub struct Projection {
    pub exprs: Vec<Expr>,
}

impl Projection {
    pub fn new() -> Self {
        Projection { exprs: Vec::new() }
    }

    /// One rolling mean per window, in the order given
    pub fn rolling_means(source: &str, windows: &[usize]) -> Self {
        Projection {
            exprs: windows
                .iter()
                .map(|&w| Expr::rolling_mean(source, w))
                .collect(),
        }
    }

    pub fn push(&mut self, expr: Expr) {
        self.exprs.push(expr);
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}
