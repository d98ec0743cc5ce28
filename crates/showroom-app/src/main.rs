//! `showroom` command-line renderer.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use showroom_app::{render_sequence, RenderScript, Selection, ShowroomConfig};
use showroom_core::{ProductState, StateConfig};
use showroom_diagnostic::{CannedService, DiagnosticService, UnavailableService};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "showroom", version, about = "Interactive product showroom, rendered offline")]
struct Cli {
    /// Log filter, used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a frame sequence with a manifest
    Render(RenderArgs),
    /// Print the product catalog as JSON
    Catalog,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial product (EYEWEAR, APPAREL, TIMEPIECE, HEADSET)
    #[arg(long)]
    product: Option<ProductState>,

    #[arg(long)]
    frames: Option<u32>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(short = 'W', long)]
    width: Option<u32>,

    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Select a product at a point in time, e.g. HEADSET@2.5
    #[arg(long = "select", value_name = "ID@SECONDS", value_parser = parse_selection)]
    selections: Vec<Selection>,

    /// Start a diagnostic scan at this time, in seconds
    #[arg(long, value_name = "SECONDS")]
    scan_at: Option<f32>,

    /// How long the diagnostic service takes to answer, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 1.5)]
    scan_latency: f32,

    /// Raw diagnostic service response; without it the service is unavailable
    #[arg(long, value_name = "FILE")]
    diagnostic_response: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "showroom-frames")]
    out: PathBuf,
}

fn parse_selection(text: &str) -> Result<Selection, String> {
    let (id, at) = text.split_once('@').ok_or_else(|| format!("expected ID@SECONDS, got '{text}'"))?;
    let product = id.parse::<ProductState>().map_err(|e| e.to_string())?;
    let at = at.trim().parse::<f32>().map_err(|e| format!("invalid time '{at}': {e}"))?;
    Ok(Selection { product, at })
}

#[derive(Serialize)]
struct CatalogEntry {
    id: &'static str,
    #[serde(flatten)]
    config: &'static StateConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match cli.command {
        Command::Render(args) => render(args).await,
        Command::Catalog => catalog(),
    }
}

fn catalog() -> Result<()> {
    let entries: Vec<CatalogEntry> = ProductState::ALL
        .into_iter()
        .map(|state| CatalogEntry { id: state.id(), config: state.config() })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn load_config(args: &RenderArgs) -> Result<ShowroomConfig> {
    let mut config = match &args.config {
        Some(path) => ShowroomConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => ShowroomConfig::default(),
    };

    if let Some(product) = args.product {
        config.scene.initial_product = product;
    }
    let render = &mut config.render;
    render.frames = args.frames.unwrap_or(render.frames);
    render.fps = args.fps.unwrap_or(render.fps);
    render.width = args.width.unwrap_or(render.width);
    render.height = args.height.unwrap_or(render.height);
    Ok(config)
}

async fn render(args: RenderArgs) -> Result<()> {
    let config = load_config(&args)?;

    let service: Arc<dyn DiagnosticService> = match &args.diagnostic_response {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading diagnostic response {}", path.display()))?;
            Arc::new(CannedService::new(text))
        }
        None => Arc::new(UnavailableService),
    };

    let script = RenderScript {
        selections: args.selections,
        scan_at: args.scan_at,
        scan_latency: args.scan_latency,
    };
    render_sequence(&config, &script, service, &args.out)
        .await
        .with_context(|| format!("rendering into {}", args.out.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        let selection = parse_selection("headset@2.5").unwrap();
        assert_eq!(selection.product, ProductState::Headset);
        assert_eq!(selection.at, 2.5);

        assert!(parse_selection("HEADSET").is_err());
        assert!(parse_selection("HOVERBOARD@1").unwrap_err().contains("HOVERBOARD"));
        assert!(parse_selection("APPAREL@soon").is_err());
    }

    #[test]
    fn test_cli_parses_render() {
        let cli = Cli::try_parse_from([
            "showroom", "render", "--product", "TIMEPIECE", "--select", "APPAREL@1", "--select", "EYEWEAR@0.5",
            "--scan-at", "2", "-W", "64", "-H", "48",
        ])
        .unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.product, Some(ProductState::Timepiece));
        assert_eq!(args.selections.len(), 2);
        assert_eq!(args.scan_at, Some(2.0));
        assert_eq!(args.width, Some(64));
    }

    #[test]
    fn test_cli_rejects_unknown_product() {
        assert!(Cli::try_parse_from(["showroom", "render", "--product", "HOVERBOARD"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
