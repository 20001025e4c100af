// src/pipeline.rs

use rayon::prelude::*;
use serde::Serialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, info, warn};

use crate::{
    config::GdpInfo,
    error::Result,
    identifiers::IdentifierSet,
    reconcile::values::{classify, Outcome, ValueMapping},
    render::{Chart, Renderer},
    table::{load_gdp_table, Dataset},
};

/// Everything one (table, year) request produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapReport {
    pub year: String,
    /// Identifier → log10 of the year's value.
    pub values: BTreeMap<String, f64>,
    /// Identifiers whose name is not in the table.
    pub not_found: BTreeSet<String>,
    /// Identifiers found in the table with an empty field for the year.
    pub no_data: BTreeSet<String>,
}

impl MapReport {
    pub fn chart(&self) -> Chart {
        Chart::for_year(&self.year, self.values.clone())
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} mapped, {} not found, {} without data",
            self.year,
            self.values.len(),
            self.not_found.len(),
            self.no_data.len()
        )
    }
}

/// Map an already loaded table for `year`.
pub fn map_dataset(identifiers: &IdentifierSet, dataset: &Dataset, year: &str) -> Result<MapReport> {
    let outcomes = classify(identifiers, dataset, year)?;
    let not_found = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, Outcome::Unmatched))
        .map(|(code, _)| code.clone())
        .collect();
    let mapping = ValueMapping::from_outcomes(&outcomes);
    Ok(MapReport {
        year: year.to_string(),
        values: mapping.values,
        not_found,
        no_data: mapping.no_data,
    })
}

/// Load the table described by `info` and map it for `year`.
#[tracing::instrument(level = "info", skip(info, identifiers), fields(gdpfile = %info.gdpfile.display()))]
pub fn build_map(info: &GdpInfo, identifiers: &IdentifierSet, year: &str) -> Result<MapReport> {
    let dataset = load_gdp_table(info)?;
    let report = map_dataset(identifiers, &dataset, year)?;
    info!("{}", report.summary());
    Ok(report)
}

/// Build the map for `year` and hand it to `renderer`, writing `out`.
pub fn render_map(
    info: &GdpInfo,
    identifiers: &IdentifierSet,
    year: &str,
    renderer: &dyn Renderer,
    out: &Path,
) -> Result<MapReport> {
    let report = build_map(info, identifiers, year)?;
    renderer.render(&report.chart(), out)?;
    info!(year, path = %out.display(), "rendered");
    Ok(report)
}

/// Where [`render_years`] writes the artifact for `year`.
pub fn output_path(out_dir: &Path, prefix: &str, year: &str, renderer: &dyn Renderer) -> PathBuf {
    out_dir.join(format!("{}_{}.{}", prefix, year, renderer.extension()))
}

/// Render several years in parallel.
///
/// Every year loads its own copy of the table. A failing year does not stop
/// the others; results come back in the order of `years`. Repeated years are
/// rendered once, since they would write the same file.
pub fn render_years(
    info: &GdpInfo,
    identifiers: &IdentifierSet,
    years: &[String],
    renderer: &dyn Renderer,
    out_dir: &Path,
    prefix: &str,
) -> Vec<(String, Result<MapReport>)> {
    let start = Instant::now();

    let mut seen = BTreeSet::new();
    let unique: Vec<&String> = years.iter().filter(|y| seen.insert(y.as_str())).collect();
    if unique.len() < years.len() {
        debug!(dropped = years.len() - unique.len(), "skipping repeated years");
    }

    let results: Vec<(String, Result<MapReport>)> = unique
        .par_iter()
        .map(|year| {
            let out = output_path(out_dir, prefix, year, renderer);
            let res = render_map(info, identifiers, year, renderer, &out);
            if let Err(e) = &res {
                warn!(year = %year, error = %e, "year failed");
            }
            (year.to_string(), res)
        })
        .collect();

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    info!(
        years = results.len(),
        failed,
        elapsed = ?start.elapsed(),
        "batch finished"
    );
    results
}
