// ABOUTME: CLI that annotates a package listing page with price-per-gigabyte values.
// ABOUTME: Reads HTML from a URL, file or stdin and prints annotated HTML or a JSON report.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use gigprice_page::{annotate_html, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Annotate package listings with their cost per gigabyte.
#[derive(Parser, Debug)]
#[command(name = "gigprice")]
#[command(about = "Add price-per-gigabyte values to package listing pages", long_about = None)]
struct Args {
    /// Page URL (http/https) or local file path. Use "-" to read from stdin.
    input: String,

    /// JSON config file overriding locators, unit vocabulary or fragment text.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the package container selector.
    #[arg(long)]
    container: Option<String>,

    /// Override the price selector.
    #[arg(long)]
    price: Option<String>,

    /// Override the size selector.
    #[arg(long)]
    size: Option<String>,

    /// Sort each listing cheapest-per-gigabyte first.
    #[arg(long, default_value_t = false)]
    sort: bool,

    /// Print a JSON report instead of the annotated HTML.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Output file path (default: stdout).
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Log skipped packages and guessed units to stderr.
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let html = load_html(&args.input)?;

    let annotated = annotate_html(&html, &config, args.sort)?;
    let summary = annotated.report.summary;
    info!(
        augmented = summary.augmented,
        skipped = summary.skipped,
        already_processed = summary.already_processed,
        "annotated {}",
        args.input
    );

    let output = if args.json {
        if args.compact {
            serde_json::to_string(&annotated.report)?
        } else {
            serde_json::to_string_pretty(&annotated.report)?
        }
    } else {
        annotated.html
    };

    match &args.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", output),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "gigprice_page=debug,gigprice_engine=trace"
    } else {
        "gigprice_page=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    if let Some(css) = &args.container {
        config.locators.container = css.clone();
    }
    if let Some(css) = &args.price {
        config.locators.price = css.clone();
    }
    if let Some(css) = &args.size {
        config.locators.size = css.clone();
    }

    config.validate()?;
    Ok(config)
}

fn load_html(target: &str) -> Result<String> {
    if target == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    if target.starts_with("http://") || target.starts_with("https://") {
        let resp = reqwest::blocking::get(target)?.error_for_status()?;
        return Ok(resp.text()?);
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    fs::read_to_string(&path).with_context(|| format!("failed to read {}", target))
}
