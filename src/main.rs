use anyhow::{bail, Context, Result};
use clap::Parser;
use gdpmap::{
    config::GdpInfo, identifiers::load_identifiers, pipeline::render_years, render::Format,
};
use std::{fs, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Render per-country log(GDP) maps for one or more years.
#[derive(Parser, Debug)]
#[clap(name = "gdpmap")]
struct Args {
    /// GDP info file (.json or .yaml)
    #[clap(long, value_name = "FILE")]
    config: PathBuf,

    /// Country code → name mapping (.json, .yaml or a delimited table)
    #[clap(long, value_name = "FILE")]
    identifiers: PathBuf,

    /// Year column to map; repeat for several. Defaults to min_year..=max_year.
    #[clap(long = "year", value_name = "YEAR")]
    years: Vec<String>,

    #[clap(long, default_value = ".")]
    out_dir: PathBuf,

    #[clap(long, value_enum, default_value = "json")]
    format: Format,

    /// Artifact file name prefix
    #[clap(long, default_value = "World_GDP")]
    prefix: String,

    /// Code column when --identifiers is a delimited table
    #[clap(long, default_value = "code")]
    code_column: String,

    /// Name column when --identifiers is a delimited table
    #[clap(long, default_value = "name")]
    name_column: String,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();
    info!(?args, "startup");

    // ─── 2) load config + identifiers ────────────────────────────────
    let info = GdpInfo::from_path(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;
    let identifiers = load_identifiers(&args.identifiers, &args.code_column, &args.name_column)
        .with_context(|| format!("loading identifiers {}", args.identifiers.display()))?;
    info!("{} identifiers", identifiers.len());

    let years = if args.years.is_empty() {
        info.years()
    } else {
        args.years.clone()
    };
    if years.is_empty() {
        bail!("no --year given and config has no min_year/max_year range");
    }

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output directory {}", args.out_dir.display()))?;

    // ─── 3) render each year ─────────────────────────────────────────
    let renderer = args.format.renderer();
    let results = render_years(
        &info,
        &identifiers,
        &years,
        renderer.as_ref(),
        &args.out_dir,
        &args.prefix,
    );

    let mut failed = 0;
    for (year, res) in &results {
        match res {
            Ok(report) => println!("{}", report.summary()),
            Err(e) => {
                error!("{} failed: {}", year, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} years failed", failed, results.len());
    }
    info!("all done");
    Ok(())
}
