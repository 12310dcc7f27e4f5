//! Render a star chart from a catalogue directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use firmament::{ChartConfig, Color, Firmament, RenderMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "starchart")]
#[command(about = "Project a constellation catalogue onto a star chart")]
#[command(version)]
struct Cli {
    /// Directory holding the stellar, vectoral and aggregational catalogues
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// 0 true color, 1 constellation color, 2 designation highlight,
    /// 3 preset page, 4 preset page with constellation lines
    #[arg(long, default_value_t = 0)]
    mode: u8,

    /// Constellation id (modes 0-2) or preset orientation 0-15 (modes 3-4);
    /// negative draws nothing
    #[arg(long, allow_hyphen_values = true)]
    reference: i64,

    /// Output image; the format follows the extension
    #[arg(long, default_value = "out.png")]
    output: PathBuf,

    /// Background color as 6 hex digits
    #[arg(long, default_value = "000000")]
    background: Color,

    /// Constellation line width in pixels
    #[arg(long, default_value_t = 1)]
    line_width: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mode = RenderMode::try_from(cli.mode)?;
    let config = ChartConfig {
        background: cli.background,
        line_width: cli.line_width,
        ..Default::default()
    };

    let mut sky = Firmament::load(&cli.data)?;
    if !sky.render(mode, cli.reference, &cli.output, &config)? {
        info!("Reference {} is negative; no chart written", cli.reference);
    }
    Ok(())
}
