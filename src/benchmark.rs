//! Generate → benchmark → write pipeline

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::config::{BenchConfig, OutputPaths};
use crate::error::Result;
use crate::generator::generate_data;
use crate::moving_averages::Strategy;
use crate::results::{write_results, TimingRow};
use crate::table::Table;
use crate::timing::{time_fallible, Clock, ClockKind, CpuClock, WallClock};

/// Best-case time of one strategy under one clock
pub fn time_strategy<C: Clock + ?Sized>(
    strategy: Strategy,
    clock: &C,
    clock_kind: ClockKind,
    df: &Table,
    config: &BenchConfig,
) -> Result<Duration> {
    info!(
        "Recording {} of calculating moving averages {}",
        clock_kind.describe(),
        strategy
    );
    let best = time_fallible(config.repeat_n, clock, || {
        strategy.run(df, &config.data_column, &config.window_sizes)
    })?;
    info!(%strategy, clock = clock_kind.describe(), seconds = best.as_secs_f64(), "best time");
    Ok(best)
}

/// Time every strategy under the wall clock, then under the CPU clock
///
/// Returns one row per strategy in [`Strategy::ALL`] order.
pub fn run_benchmark(df: &Table, config: &BenchConfig) -> Result<Vec<TimingRow>> {
    let wall = WallClock::new();
    let cpu = CpuClock;

    let mut elapsed = Vec::with_capacity(Strategy::ALL.len());
    for strategy in Strategy::ALL {
        elapsed.push(time_strategy(strategy, &wall, ClockKind::Wall, df, config)?);
    }

    let mut rows = Vec::with_capacity(Strategy::ALL.len());
    for (strategy, elapsed) in Strategy::ALL.into_iter().zip(elapsed) {
        let system_user = time_strategy(strategy, &cpu, ClockKind::Cpu, df, config)?;
        rows.push(TimingRow::new(strategy, elapsed, system_user));
    }

    Ok(rows)
}

/// Full run: synthesize data, time both strategies, write the results file
///
/// Nothing is written unless every measurement succeeds.
pub fn run(config: &BenchConfig, paths: &OutputPaths) -> Result<PathBuf> {
    let df = generate_data(&config.generator()?)?;
    info!(
        rows = df.row_count(),
        windows = config.window_sizes.len(),
        repeats = config.repeat_n,
        "generated benchmark data"
    );

    let rows = run_benchmark(&df, config)?;

    let path = paths.results_csv();
    write_results(&path, &rows)?;
    Ok(path)
}
