//! Reads `results/results.csv` under the current directory and renders the
//! timing charts.

use rollbench::{plot, read_results, OutputPaths};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rollbench=info,plot_timings=info")),
        )
        .init();

    let paths = OutputPaths::from_cwd()?;
    let rows = read_results(&paths.results_csv())?;

    let written = plot::render_charts(&rows, &paths)?;
    info!(files = written.len(), "charts written");
    Ok(())
}
