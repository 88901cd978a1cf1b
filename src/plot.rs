//! Horizontal bar charts of benchmark timings
//!
//! Two PNGs are produced from the results table: elapsed time per strategy,
//! and elapsed next to system+user time. Each file is written to the results
//! directory and copied into the notebook image directory.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use tracing::{debug, info};

use crate::config::{OutputPaths, ALL_TIMES_PLOT_FILE, ELAPSED_PLOT_FILE};
use crate::error::{Error, Result};
use crate::moving_averages::Strategy;
use crate::results::TimingRow;
use crate::timing::ClockKind;

const DARK_ORANGE: RGBColor = RGBColor(255, 140, 0);
const GRAY: RGBColor = RGBColor(128, 128, 128);
const GRID: RGBColor = RGBColor(200, 200, 200);

const CHART_SIZE: (u32, u32) = (1000, 480);
const LABEL_AREA: u32 = 320;
const X_DESC: &str = "Run time (sec)";

static SANS: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// One horizontal bar
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub seconds: f64,
    pub color: RGBColor,
}

fn strategy_color(strategy: Strategy) -> RGBColor {
    match strategy {
        Strategy::Loop => BLUE,
        Strategy::Batch => DARK_ORANGE,
    }
}

fn bar_label(strategy: Strategy, clock: ClockKind) -> String {
    let suffix = match clock {
        ClockKind::Wall => "Elapsed Time",
        ClockKind::Cpu => "System+User Time",
    };
    format!("{}\n{}", strategy.label(), suffix)
}

fn bar(row: &TimingRow, clock: ClockKind) -> Bar {
    Bar {
        label: bar_label(row.method, clock),
        seconds: match clock {
            ClockKind::Wall => row.elapsed_time,
            ClockKind::Cpu => row.system_user_time,
        },
        color: strategy_color(row.method),
    }
}

/// Bars for the elapsed-time chart, top to bottom
pub fn elapsed_bars(rows: &[TimingRow]) -> Vec<Bar> {
    rows.iter().map(|r| bar(r, ClockKind::Wall)).collect()
}

/// Bars for the combined chart: elapsed group, blank spacer, CPU group
pub fn all_times_bars(rows: &[TimingRow]) -> Vec<Bar> {
    let mut bars = elapsed_bars(rows);
    bars.push(Bar {
        label: String::new(),
        seconds: 0.0,
        color: GRAY,
    });
    bars.extend(rows.iter().map(|r| bar(r, ClockKind::Cpu)));
    bars
}

fn plot_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Text is drawn with an embedded font, so no system fonts are needed
fn register_fonts() -> Result<()> {
    plotters::style::register_font("sans-serif", FontStyle::Normal, SANS)
        .map_err(|_| Error::Plot("embedded font rejected".to_string()))
}

/// Render bars to a PNG, first bar at the top, label on the left
pub fn render_bar_chart(path: &Path, bars: &[Bar]) -> Result<()> {
    register_fonts()?;

    let longest = bars.iter().map(|b| b.seconds).fold(0.0, f64::max);
    let x_max = if longest.is_finite() && longest > 0.0 {
        longest * 1.1
    } else {
        1.0
    };
    // Segment `top` is the first bar.
    let top = bars.len().max(1) as u32 - 1;
    let labels: Vec<String> = bars.iter().map(|b| b.label.replace('\n', " ")).collect();
    let label_of = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(k) | SegmentValue::Exact(k) if *k <= top => labels
            .get((top - k) as usize)
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    };

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(LABEL_AREA)
        .build_cartesian_2d(0.0..x_max, (0u32..top).into_segmented())
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(GRID)
        .y_labels(bars.len().max(1))
        .y_label_formatter(&label_of)
        .x_desc(X_DESC)
        .label_style(("sans-serif", 14))
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, b)| {
            let seg = top - i as u32;
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(seg)),
                    (b.seconds, SegmentValue::Exact(seg + 1)),
                ],
                b.color.filled(),
            );
            bar.set_margin(6, 6, 0, 0);
            bar
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Render both charts and copy them into the notebook directory
///
/// Returns every file written.
pub fn render_charts(rows: &[TimingRow], paths: &OutputPaths) -> Result<Vec<PathBuf>> {
    for dir in [&paths.results_dir, &paths.notebook_img_dir] {
        fs::create_dir_all(dir).map_err(|e| Error::resource(dir, e))?;
    }

    let charts = [
        (ELAPSED_PLOT_FILE, elapsed_bars(rows)),
        (ALL_TIMES_PLOT_FILE, all_times_bars(rows)),
    ];

    let mut written = Vec::with_capacity(2 * charts.len());
    for (file, bars) in &charts {
        for b in bars.iter().filter(|b| !b.label.is_empty()) {
            debug!(
                chart = *file,
                label = %b.label.replace('\n', " "),
                seconds = b.seconds,
                "bar"
            );
        }

        let primary = paths.results_dir.join(file);
        render_bar_chart(&primary, bars)?;

        let copy = paths.notebook_img_dir.join(file);
        fs::copy(&primary, &copy).map_err(|e| Error::resource(&copy, e))?;

        info!(path = %primary.display(), copy = %copy.display(), "rendered chart");
        written.push(primary);
        written.push(copy);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<TimingRow> {
        vec![
            TimingRow {
                method: Strategy::Loop,
                elapsed_time: 2.0,
                system_user_time: 1.9,
            },
            TimingRow {
                method: Strategy::Batch,
                elapsed_time: 0.5,
                system_user_time: 3.0,
            },
        ]
    }

    #[test]
    fn test_elapsed_bars() {
        let bars = elapsed_bars(&rows());
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].label, "Loop One-by-One\nElapsed Time");
        assert_eq!(bars[0].color, BLUE);
        assert_eq!(bars[1].seconds, 0.5);
        assert_eq!(bars[1].color, DARK_ORANGE);
    }

    #[test]
    fn test_all_times_layout() {
        let bars = all_times_bars(&rows());
        let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Loop One-by-One\nElapsed Time",
                "String Query, Eval Function\nElapsed Time",
                "",
                "Loop One-by-One\nSystem+User Time",
                "String Query, Eval Function\nSystem+User Time",
            ]
        );
        assert_eq!(bars[2].seconds, 0.0);
        assert_eq!(bars[2].color, GRAY);
        assert_eq!(bars[4].seconds, 3.0);
    }

    #[test]
    fn test_embedded_font_registers() {
        register_fonts().unwrap();
    }
}
