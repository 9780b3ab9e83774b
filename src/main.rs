mod app;
mod board;
mod radar;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::board::BoardSource;
use crate::radar::ChartRadius;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Board JSON file; the bundled demo board is used when omitted.
    #[arg(long)]
    board: Option<PathBuf>,
    /// Id of the chart to open first.
    #[arg(long)]
    chart: Option<String>,
    /// Outer radius of the radar in pixels.
    #[arg(long, default_value_t = ChartRadius::DEFAULT_PX)]
    radius: f32,
    /// Artificial delay added to every cross-reference lookup.
    #[arg(long, default_value_t = 0)]
    lookup_latency_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let args = Args::parse();
    let radius = ChartRadius::new(args.radius).context("invalid --radius")?;
    let settings = app::ViewSettings {
        initial_chart: args.chart,
        radius,
        lookup_latency: Duration::from_millis(args.lookup_latency_ms),
    };
    let source = args.board.map_or(BoardSource::Demo, BoardSource::File);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };

    eframe::run_native(
        "radar-board",
        options,
        Box::new(move |cc| Ok(Box::new(app::RadarBoardApp::new(cc, source, settings)))),
    )
    .map_err(|error| anyhow!("radar-board exited with an error: {error}"))
}
