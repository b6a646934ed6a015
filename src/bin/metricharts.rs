use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use metricharts::adapter::{HighchartsAdapter, PlotlyAdapter, RenderAdapter, export_json_store};
use metricharts::models::BuildRequest;
use metricharts::{compose, storage};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "metricharts",
    version,
    about = "Compose backend-agnostic chart models from series descriptors & datasets"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a chart from a build request and render it.
    Compose(ComposeArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum Backend {
    Plotly,
    Highcharts,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Build request JSON file (descriptors, datasets, axis data, overrides).
    #[arg(short, long)]
    input: PathBuf,
    /// Chart backend to render for.
    #[arg(long, value_enum, default_value = "plotly")]
    backend: Backend,
    /// Write rendered backend JSON to this path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Wrap the output in the JSON store envelope.
    #[arg(long, default_value_t = false)]
    store: bool,
    /// Also save the resolved chart model (pre-adapter) to this path.
    #[arg(long)]
    model: Option<PathBuf>,
    /// Also save the traces as CSV to this path.
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.input)?;
    let request: BuildRequest = serde_json::from_str(&text)?;
    let chart = compose(&request)?;

    if let Some(path) = args.model.as_ref() {
        storage::save_spec_json(&chart, path)?;
        eprintln!("Saved chart model to {}", path.display());
    }
    if let Some(path) = args.csv.as_ref() {
        storage::save_traces_csv(&chart, path)?;
        eprintln!("Saved {} traces to {}", chart.series.len(), path.display());
    }

    let adapter: &dyn RenderAdapter = match args.backend {
        Backend::Plotly => &PlotlyAdapter,
        Backend::Highcharts => &HighchartsAdapter,
    };
    let rendered = if args.store {
        export_json_store(&chart, adapter)
    } else {
        adapter.render(&chart)
    };

    match args.out.as_ref() {
        Some(path) => {
            storage::save_rendered_json(&rendered, path)?;
            eprintln!(
                "Rendered {} chart ({} series) to {}",
                adapter.name(),
                chart.series.len(),
                path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&rendered)?),
    }
    Ok(())
}
