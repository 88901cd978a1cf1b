//! Trailing rolling-window kernels
//!
//! Window for row i is [i-window+1, i] inclusive. Rows 0..window-1 have no
//! full window and are written as NaN. A NaN inside the window makes the
//! output NaN for every row whose window covers it. Infinite inputs give the
//! IEEE mean while they are in the window: +inf or -inf, NaN when both signs
//! are present.

/// Compensated running sum (Kahan-Babuska), keeps long rolling passes from drifting
///
/// Only finite values are added. If the sum overflows it stays non-finite
/// until rebuilt with [`RunningSum::over`].
#[derive(Debug, Clone, Copy, Default)]
struct RunningSum {
    sum: f64,
    comp: f64,
}

impl RunningSum {
    fn over(values: &[f64]) -> Self {
        let mut s = RunningSum::default();
        for &v in values {
            s.add(v);
        }
        s
    }

    #[inline(always)]
    fn add(&mut self, v: f64) {
        let t = self.sum + v;
        if self.sum.abs() >= v.abs() {
            self.comp += (self.sum - t) + v;
        } else {
            self.comp += (v - t) + self.sum;
        }
        self.sum = t;
    }

    #[inline(always)]
    fn value(&self) -> f64 {
        self.sum + self.comp
    }

    #[inline(always)]
    fn is_finite(&self) -> bool {
        self.sum.is_finite() && self.comp.is_finite() && self.value().is_finite()
    }
}

/// Non-finite inputs currently inside the window
#[derive(Debug, Clone, Copy, Default)]
struct NonFinite {
    nan: usize,
    pos_inf: usize,
    neg_inf: usize,
}

impl NonFinite {
    /// Count `v` if it is not finite; returns whether it was counted
    #[inline(always)]
    fn enter(&mut self, v: f64) -> bool {
        if v.is_finite() {
            return false;
        }
        if v.is_nan() {
            self.nan += 1;
        } else if v > 0.0 {
            self.pos_inf += 1;
        } else {
            self.neg_inf += 1;
        }
        true
    }

    #[inline(always)]
    fn leave(&mut self, v: f64) -> bool {
        if v.is_finite() {
            return false;
        }
        if v.is_nan() {
            self.nan -= 1;
        } else if v > 0.0 {
            self.pos_inf -= 1;
        } else {
            self.neg_inf -= 1;
        }
        true
    }

    /// Mean forced by the non-finite values, if any are present
    #[inline(always)]
    fn mean(&self) -> Option<f64> {
        match (self.nan, self.pos_inf, self.neg_inf) {
            (0, 0, 0) => None,
            (0, _, 0) => Some(f64::INFINITY),
            (0, 0, _) => Some(f64::NEG_INFINITY),
            _ => Some(f64::NAN),
        }
    }
}

/// Trailing simple moving average
///
/// # Arguments
/// * `x` - Input data (NaN = missing)
/// * `window` - Window width, must be >= 1
///
/// # Returns
/// Vector of `x.len()` values; first `window - 1` entries are NaN.
pub fn rolling_mean_f64(x: &[f64], window: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; x.len()];
    rolling_mean_into(&mut out, x, window);
    out
}

/// Same as [`rolling_mean_f64`], writing into a caller-provided buffer
///
/// Every element of `out` is written.
pub fn rolling_mean_into(out: &mut [f64], x: &[f64], window: usize) {
    debug_assert!(window >= 1, "window must be >= 1");
    debug_assert_eq!(out.len(), x.len());

    // Width 1 is the identity; copying keeps it bit-exact.
    if window == 1 {
        out.copy_from_slice(x);
        return;
    }

    let n = x.len();
    let w = window as f64;
    let mut sum = RunningSum::default();
    let mut non_finite = NonFinite::default();

    for i in 0..n {
        let incoming = x[i];
        if !non_finite.enter(incoming) {
            sum.add(incoming);
        }

        if i >= window {
            let outgoing = x[i - window];
            if !non_finite.leave(outgoing) {
                sum.add(-outgoing);
            }
        }

        if i + 1 < window {
            out[i] = f64::NAN;
            continue;
        }

        out[i] = match non_finite.mean() {
            Some(mean) => mean,
            None if sum.is_finite() => sum.value() / w,
            None => {
                // Overflowed at some point: rebuild from the window itself.
                let values = &x[i + 1 - window..=i];
                sum = RunningSum::over(values);
                if sum.is_finite() {
                    sum.value() / w
                } else {
                    scaled_mean(values, w)
                }
            }
        };
    }
}

/// Mean of finite values whose plain sum overflows
fn scaled_mean(values: &[f64], w: f64) -> f64 {
    let mut s = RunningSum::default();
    for &v in values {
        s.add(v / w);
    }
    s.value()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            if e.is_nan() {
                assert!(a.is_nan(), "row {i}: expected NaN, got {a}");
            } else {
                assert!((a - e).abs() < 1e-12, "row {i}: expected {e}, got {a}");
            }
        }
    }

    #[test]
    fn test_window_one_is_identity() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(rolling_mean_f64(&data, 1), data);
    }

    #[test]
    fn test_trailing_window() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let nan = f64::NAN;
        assert_close(&rolling_mean_f64(&data, 2), &[nan, 1.5, 2.5, 3.5, 4.5]);
        assert_close(&rolling_mean_f64(&data, 3), &[nan, nan, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_window_longer_than_input() {
        let out = rolling_mean_f64(&[1.0, 2.0], 5);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_window_equal_to_input() {
        let out = rolling_mean_f64(&[2.0, 4.0, 6.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!((out[2] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_nan_poisons_covering_windows_only() {
        let nan = f64::NAN;
        let data = vec![1.0, nan, 3.0, 4.0, 5.0, 6.0];
        let out = rolling_mean_f64(&data, 2);

        // Rows 1 and 2 see the NaN; row 3 onwards has left it behind.
        assert_close(&out, &[nan, nan, nan, 3.5, 4.5, 5.5]);
    }

    #[test]
    fn test_infinity_leaves_window() {
        let inf = f64::INFINITY;
        let nan = f64::NAN;
        let out = rolling_mean_f64(&[inf, 1.0, 2.0, 3.0, 4.0], 2);

        assert!(out[0].is_nan());
        assert_eq!(out[1], inf);
        assert_close(&out[2..], &[1.5, 2.5, 3.5]);

        let out = rolling_mean_f64(&[1.0, -inf, 2.0, inf, 3.0, 5.0], 2);
        assert_eq!(out[1], -inf);
        assert_eq!(out[2], -inf);
        assert_eq!(out[3], inf);
        assert_eq!(out[4], inf);
        assert_close(&out[5..], &[4.0]);

        // Both signs in one window
        let out = rolling_mean_f64(&[inf, -inf, 1.0, 2.0], 2);
        assert!(out[1].is_nan());
        assert_eq!(out[2], -inf);
        assert_eq!(out[3], 1.5);

        // NaN wins over infinity
        let out = rolling_mean_f64(&[nan, inf, 1.0], 2);
        assert!(out[1].is_nan());
        assert_eq!(out[2], inf);
    }

    #[test]
    fn test_overflowing_sum_recovers() {
        let out = rolling_mean_f64(&[1e308, 1e308, 1.0, 2.0], 2);

        assert!(out[0].is_nan());
        assert_eq!(out[1], 1e308);
        assert_eq!(out[2], 5e307);
        assert_eq!(out[3], 1.5);
    }

    #[test]
    fn test_overflow_then_long_finite_tail() {
        let mut data = vec![1e308, 1e308, 1e308];
        data.extend((0..50).map(|i| i as f64));
        let out = rolling_mean_f64(&data, 3);

        assert!((out[2] / 1e308 - 1.0).abs() < 1e-12);
        assert!((out[3] / (1e308 / 3.0 * 2.0) - 1.0).abs() < 1e-12);
        for i in 6..data.len() {
            let direct = (data[i - 2] + data[i - 1] + data[i]) / 3.0;
            assert!((out[i] - direct).abs() < 1e-12, "row {i}: {}", out[i]);
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(rolling_mean_f64(&[], 3).is_empty());
    }

    #[test]
    fn test_long_series_matches_direct_mean() {
        let data: Vec<f64> = (0..10_000).map(|i| ((i * 37) % 101) as f64 * 0.1 - 5.0).collect();
        let window = 17;
        let out = rolling_mean_f64(&data, window);

        for i in (window - 1..data.len()).step_by(997) {
            let direct: f64 = data[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
            assert!((out[i] - direct).abs() < 1e-9, "row {i}");
        }
    }
}
