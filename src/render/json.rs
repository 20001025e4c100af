// src/render/json.rs

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::debug;

use super::{Chart, Renderer};
use crate::error::{MapError, Result};

/// Writes the chart as a JSON document.
#[derive(Debug, Clone, Copy)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, chart: &Chart, out: &Path) -> Result<()> {
        let file = File::create(out).map_err(|e| MapError::file_access(out, e))?;
        let mut w = BufWriter::new(file);

        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut w, chart)
        } else {
            serde_json::to_writer(&mut w, chart)
        };
        written.map_err(|e| MapError::render(out, "serializing chart", e))?;
        w.flush().map_err(|e| MapError::file_access(out, e))?;

        debug!(path = %out.display(), entries = chart.values.len(), "wrote json chart");
        Ok(())
    }
}
