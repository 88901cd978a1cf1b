//! rollbench: rolling-mean strategy benchmark on a small columnar engine
//!
//! Compares computing many moving-average columns one at a time against
//! submitting them to the projection engine as one batched request, and
//! charts the best-case timings.

pub mod benchmark;
pub mod builtins;
pub mod config;
pub mod error;
pub mod generator;
pub mod moving_averages;
pub mod pipeline;
pub mod plot;
pub mod results;
pub mod table;
pub mod timing;

pub use config::{BenchConfig, OutputPaths};
pub use error::{Error, Result};
pub use generator::{generate_data, generate_data_seeded, parse_interval, GeneratorConfig};
pub use moving_averages::{
    moving_averages_batch, moving_averages_hard_coded, moving_averages_loop, Strategy,
};
pub use results::{read_results, write_results, TimingRow};
pub use table::{Column, Table, NULL_TIMESTAMP};
pub use timing::{time_fallible, time_function, Clock, CpuClock, FnClock, WallClock};
