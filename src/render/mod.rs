// src/render/mod.rs
pub mod json;
pub mod parquet;

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

use crate::error::Result;

pub use self::json::JsonRenderer;
pub use self::parquet::ParquetRenderer;

/// What a renderer draws: a title, one series label and the values.
/// Identifiers missing from `values` are simply not drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub label: String,
    pub values: BTreeMap<String, f64>,
}

impl Chart {
    /// The world GDP chart for one year column.
    pub fn for_year(year: &str, values: BTreeMap<String, f64>) -> Self {
        Self {
            title: format!("GDP by Country in {}", year),
            label: format!("In {}", year),
            values,
        }
    }
}

/// Writes a [`Chart`] to disk.
pub trait Renderer: Sync {
    /// File extension of the artifact, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, chart: &Chart, out: &Path) -> Result<()>;
}

/// Output formats known to the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Json,
    Parquet,
}

impl Format {
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Format::Json => Box::new(JsonRenderer::default()),
            Format::Parquet => Box::new(ParquetRenderer::default()),
        }
    }
}
