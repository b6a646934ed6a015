//! metricharts
//!
//! A Rust library for composing chart models from data series descriptors
//! and raw query results. Pairs with the `metricharts` CLI.
//!
//! ### Features
//! - Group series onto shared value axes by unit, scale, and stacking
//! - Deterministic palette cycling with user color overrides
//! - Top-N summarization with an aggregated remainder slice
//! - Least-squares trend lines with R-squared reporting
//! - Render to Plotly- or Highcharts-shaped JSON via pluggable adapters
//!
//! ### Example
//! ```no_run
//! use metricharts::adapter::{PlotlyAdapter, RenderAdapter};
//! use metricharts::models::BuildRequest;
//!
//! let text = std::fs::read_to_string("request.json")?;
//! let request: BuildRequest = serde_json::from_str(&text)?;
//! let chart = metricharts::compose(&request)?;
//! let rendered = PlotlyAdapter.render(&chart);
//! metricharts::storage::save_rendered_json(&rendered, "chart.json")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod adapter;
pub mod axis;
pub mod color;
pub mod compose;
pub mod encode;
pub mod models;
pub mod overrides;
pub mod restrictions;
pub mod storage;
pub mod summarize;
pub mod trend;

pub use compose::{ChartComposer, ChartSpec, ComposeError, compose};
pub use models::{BuildRequest, DataSeriesDescriptor, RawDataset};
