//! Times the loop and batched moving-average strategies and writes
//! `results/results.csv` under the current directory.

use rollbench::{benchmark, BenchConfig, OutputPaths};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rollbench=info,time_moving_averages=info")),
        )
        .init();

    let config = BenchConfig::default();
    let paths = OutputPaths::from_cwd()?;

    let path = benchmark::run(&config, &paths)?;
    info!(path = %path.display(), "benchmark complete");
    Ok(())
}
