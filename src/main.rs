mod app;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;

use gtex_plot::GroupCounts;
use gtex_plot::data::loader::{load_reads, load_samples};
use gtex_plot::query::{QueryConfig, apply_min_mean, run_query};
use gtex_plot::render::{PlotOptions, render_box_plot};
use gtex_plot::report::{read_json_report, write_report};

use crate::state::AppState;

/// Box plots of one gene's read counts across GTEx tissue groups.
#[derive(Parser, Debug)]
#[command(name = "gtex-plot", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join sample attributes to gene read counts and plot one gene
    Query(QueryArgs),
    /// Re-plot a JSON report written by `query --report`
    Replot(ReplotArgs),
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Gzip-compressed gene read counts (GCT)
    #[arg(short = 'r', long)]
    gene_reads: PathBuf,

    /// Tab-separated sample attributes
    #[arg(short = 's', long)]
    sample_attributes: PathBuf,

    /// Gene of interest
    #[arg(short, long)]
    gene: String,

    /// JSON file with column names and options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Column samples are grouped by [default: SMTS]
    #[arg(long)]
    group_column: Option<String>,

    /// Sample id column [default: SAMPID]
    #[arg(long)]
    sample_id_column: Option<String>,

    /// Gene name column of the read counts [default: Description]
    #[arg(long)]
    gene_column: Option<String>,

    /// Drop groups whose mean count is below this
    #[arg(long)]
    min_mean: Option<f64>,

    /// Write grouped counts (.tsv, .json or .parquet)
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(flatten)]
    figure: FigureArgs,
}

#[derive(Args, Debug)]
struct ReplotArgs {
    /// JSON report, `[[label, [counts...]], ...]`
    #[arg(short, long)]
    input: PathBuf,

    /// Gene name for the title
    #[arg(short, long)]
    gene: String,

    /// X-axis title
    #[arg(long, default_value = "SMTS")]
    group_column: String,

    /// Drop groups whose mean count is below this
    #[arg(long, default_value_t = 0.0)]
    min_mean: f64,

    #[command(flatten)]
    figure: FigureArgs,
}

#[derive(Args, Debug)]
struct FigureArgs {
    /// Box plot image (.png or .svg)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Figure width in inches
    #[arg(long, default_value_t = 10.0)]
    fig_width: f64,

    /// Figure height in inches
    #[arg(long, default_value_t = 4.0)]
    fig_height: f64,

    /// Open the interactive viewer
    #[arg(long)]
    view: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Query(args) => query(args),
        Command::Replot(args) => replot(args),
    }
}

fn query(args: QueryArgs) -> Result<()> {
    if args.figure.output.is_none() && !args.figure.view && args.report.is_none() {
        bail!("nothing to write: pass --output, --report or --view");
    }

    let mut config = match &args.config {
        Some(path) => QueryConfig::from_json_file(path)?,
        None => QueryConfig::default(),
    };
    if let Some(col) = args.group_column {
        config.group_column = col;
    }
    if let Some(col) = args.sample_id_column {
        config.sample_id_column = col;
    }
    if let Some(col) = args.gene_column {
        config.gene_column = col;
    }
    if args.min_mean.is_some() {
        config.min_mean = args.min_mean;
    }

    let samples = load_samples(&args.sample_attributes)?;
    info!("Loaded {} samples from {}", samples.len(), args.sample_attributes.display());
    let reads = load_reads(&args.gene_reads, config.preamble_lines)?;
    info!("Loaded {} genes from {}", reads.len(), args.gene_reads.display());

    let grouped = run_query(&samples, &reads, &args.gene, &config)
        .with_context(|| format!("collecting read counts of {}", args.gene))?;
    let grouped = apply_min_mean(grouped, &config)?;

    if let Some(path) = &args.report {
        write_report(path, &grouped)?;
    }

    finish(grouped, &args.gene, &config.group_column, config.min_mean.unwrap_or(0.0), &args.figure)
}

fn replot(args: ReplotArgs) -> Result<()> {
    if args.figure.output.is_none() && !args.figure.view {
        bail!("nothing to write: pass --output or --view");
    }

    let grouped = read_json_report(&args.input, args.min_mean)?;
    info!("Read {} groups from {}", grouped.len(), args.input.display());

    finish(grouped, &args.gene, &args.group_column, args.min_mean, &args.figure)
}

fn finish(grouped: Vec<GroupCounts>, gene: &str, group_column: &str, threshold: f64, figure: &FigureArgs) -> Result<()> {
    if let Some(path) = &figure.output {
        let options = PlotOptions {
            width_in: figure.fig_width,
            height_in: figure.fig_height,
            ..PlotOptions::new(gene, group_column)
        };
        render_box_plot(path, &grouped, &options)?;
    }

    if figure.view {
        app::run_viewer(AppState::new(grouped, gene, group_column, threshold))?;
    }

    info!("Analysis complete!");
    Ok(())
}
