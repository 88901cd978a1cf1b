//! Minimum-over-repeats timing harness
//!
//! A target is invoked `repeat_n` times back to back. Each invocation is
//! bracketed by two reads of a [`Clock`] and the smallest difference is
//! returned as the estimate of the target's intrinsic cost.
//!
//! Progress is reported every `max(1, repeat_n / 10)` iterations. The report
//! is emitted before the clock is read, so it never falls inside a sample.

use std::hint::black_box;
use std::time::{Duration, Instant};

use cpu_time::ProcessTime;
use tracing::info;

use crate::error::{Error, Result};

/// Monotonically non-decreasing time source
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time from a monotonic `Instant`
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock {
            origin: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// User + system CPU time consumed by the whole process
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuClock;

impl Clock for CpuClock {
    #[inline]
    fn now(&self) -> Duration {
        ProcessTime::now().as_duration()
    }
}

/// Adapter turning any `Fn() -> Duration` into a clock
pub struct FnClock<F>(pub F);

impl<F: Fn() -> Duration> Clock for FnClock<F> {
    fn now(&self) -> Duration {
        (self.0)()
    }
}

/// Which clock a measurement used
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockKind {
    Wall,
    Cpu,
}

impl ClockKind {
    pub fn describe(self) -> &'static str {
        match self {
            ClockKind::Wall => "elapsed time",
            ClockKind::Cpu => "system+user time",
        }
    }
}

/// Format seconds as `H:MM:SS.ss`
pub fn format_elapsed(seconds: f64) -> String {
    let hour = (seconds / 3600.0) as u64;
    let minute = ((seconds % 3600.0) / 60.0) as u64;
    let second = seconds % 60.0;
    format!("{hour}:{minute:02}:{second:05.2}")
}

/// Progress reporter for a fixed-length loop
#[derive(Debug)]
pub struct Progress {
    total: usize,
    every_nth: usize,
    started: Instant,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Progress {
            total,
            every_nth: (total / 10).max(1),
            started: Instant::now(),
        }
    }

    /// Whether iteration `idx` (0-based) gets a report
    pub fn is_due(&self, idx: usize) -> bool {
        idx % self.every_nth == 0
    }

    pub fn report(&self, idx: usize) {
        if !self.is_due(idx) {
            return;
        }
        let percent = 100.0 * (idx + 1) as f64 / self.total as f64;
        let elapsed = format_elapsed(self.started.elapsed().as_secs_f64());
        info!(
            iteration = idx + 1,
            total = self.total,
            percent = format_args!("{percent:.1}"),
            at = %chrono::Local::now().format("%a %b %e %H:%M:%S %Y"),
            elapsed = %elapsed,
            "Processing loop iteration {} of {}", idx + 1, self.total
        );
    }
}

/// Time a fallible target; the first error aborts the run
///
/// Returns the minimum of `repeat_n` samples. `repeat_n == 0` is rejected
/// before the target is ever called.
pub fn time_fallible<C, F, T>(repeat_n: usize, clock: &C, func: F) -> Result<Duration>
where
    C: Clock + ?Sized,
    F: FnMut() -> Result<T>,
{
    if repeat_n == 0 {
        return Err(Error::invalid(
            "repeat_n",
            "at least one repetition is required",
        ));
    }

    let progress = Progress::new(repeat_n);
    sample_min(repeat_n, clock, func, |idx| progress.report(idx))
}

/// Core loop: `before_sample` runs ahead of each sample's first clock read
fn sample_min<C, F, T, P>(
    repeat_n: usize,
    clock: &C,
    mut func: F,
    mut before_sample: P,
) -> Result<Duration>
where
    C: Clock + ?Sized,
    F: FnMut() -> Result<T>,
    P: FnMut(usize),
{
    let mut min_time = Duration::MAX;

    for idx in 0..repeat_n {
        before_sample(idx);

        let start = clock.now();
        let result = func();
        let end = clock.now();

        black_box(result?);
        min_time = min_time.min(end.saturating_sub(start));
    }

    Ok(min_time)
}

/// Time an infallible target, see [`time_fallible`]
pub fn time_function<C, F, T>(repeat_n: usize, clock: &C, mut func: F) -> Result<Duration>
where
    C: Clock + ?Sized,
    F: FnMut() -> T,
{
    time_fallible(repeat_n, clock, || Ok(func()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0), "0:00:00.00");
        assert_eq!(format_elapsed(3725.5), "1:02:05.50");
        assert_eq!(format_elapsed(59.994), "0:00:59.99");
        assert_eq!(format_elapsed(36_000.0), "10:00:00.00");
    }

    #[test]
    fn test_progress_cadence() {
        let p = Progress::new(400);
        assert!(p.is_due(0));
        assert!(!p.is_due(1));
        assert!(p.is_due(40));
        assert!(p.is_due(360));

        // Fewer than ten iterations: report every one
        let p = Progress::new(7);
        assert!((0..7).all(|i| p.is_due(i)));
    }

    #[test]
    fn test_zero_repeats_never_calls_target() {
        let calls = Cell::new(0);
        let err = time_function(0, &WallClock::new(), || calls.set(calls.get() + 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { parameter: "repeat_n", .. }));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_calls_target_repeat_n_times() {
        let calls = Cell::new(0);
        time_function(13, &WallClock::new(), || calls.set(calls.get() + 1)).unwrap();
        assert_eq!(calls.get(), 13);
    }

    #[test]
    fn test_minimum_of_scripted_samples() {
        // Each read advances the fake clock; sample k costs costs[k] ms.
        let costs = [5u64, 3, 9, 4];
        let reads = Cell::new(0usize);
        let now = Cell::new(Duration::ZERO);
        let clock = FnClock(|| {
            let r = reads.get();
            reads.set(r + 1);
            if r % 2 == 1 {
                now.set(now.get() + Duration::from_millis(costs[r / 2]));
            }
            now.get()
        });

        let min = time_function(costs.len(), &clock, || ()).unwrap();
        assert_eq!(min, Duration::from_millis(3));
        assert_eq!(reads.get(), 2 * costs.len());
    }

    #[test]
    fn test_error_from_target_propagates() {
        let calls = Cell::new(0);
        let err = time_fallible(10, &WallClock::new(), || -> Result<()> {
            calls.set(calls.get() + 1);
            Err(Error::MissingColumn {
                name: "data0".to_string(),
            })
        })
        .unwrap_err();

        assert!(matches!(err, Error::MissingColumn { .. }));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_progress_stays_outside_samples() {
        let events = RefCell::new(Vec::new());
        let progress = Progress::new(20);
        let clock = FnClock(|| {
            events.borrow_mut().push("clock");
            Duration::ZERO
        });

        sample_min(
            20,
            &clock,
            || -> Result<()> {
                events.borrow_mut().push("call");
                Ok(())
            },
            |idx| {
                if progress.is_due(idx) {
                    events.borrow_mut().push("progress");
                }
            },
        )
        .unwrap();

        let events = events.take();
        assert_eq!(events.iter().filter(|e| **e == "progress").count(), 10);

        // Every sample is exactly clock, call, clock with nothing in between.
        let samples: Vec<&[&str]> = events
            .split(|e| *e == "progress")
            .flat_map(|run| run.chunks(3))
            .filter(|chunk| !chunk.is_empty())
            .collect();
        assert_eq!(samples.len(), 20);
        assert!(samples.iter().all(|s| *s == ["clock", "call", "clock"]));
    }

    #[test]
    fn test_backwards_clock_saturates_to_zero() {
        let reads = Cell::new(0u64);
        let clock = FnClock(|| {
            let r = reads.get();
            reads.set(r + 1);
            Duration::from_secs(100 - r)
        });
        assert_eq!(time_function(3, &clock, || ()).unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_cpu_clock_is_non_decreasing() {
        let clock = CpuClock;
        let a = clock.now();
        black_box((0..100_000u64).sum::<u64>());
        let b = clock.now();
        assert!(b >= a);
    }
}
