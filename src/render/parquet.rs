// src/render/parquet.rs

use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{
    arrow::ArrowWriter,
    basic::Compression,
    file::properties::WriterProperties,
    format::KeyValue,
};
use std::{collections::HashMap, fs::File, path::Path, sync::Arc};
use tracing::debug;

use super::{Chart, Renderer};
use crate::error::{MapError, Result};

/// Writes the chart as a two-column Parquet table (`code`, `value`).
/// Title and label go into the file's key-value metadata.
#[derive(Debug, Clone, Copy)]
pub struct ParquetRenderer {
    pub compression: Compression,
}

impl Default for ParquetRenderer {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetRenderer {
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("code", DataType::Utf8, false),
            Field::new("value", DataType::Float64, false),
        ])
    }

    fn to_batch(chart: &Chart) -> std::result::Result<RecordBatch, arrow::error::ArrowError> {
        let codes: Vec<&str> = chart.values.keys().map(String::as_str).collect();
        let values: Vec<f64> = chart.values.values().copied().collect();

        let metadata = HashMap::from([
            ("title".to_string(), chart.title.clone()),
            ("label".to_string(), chart.label.clone()),
        ]);
        let schema = Arc::new(Self::schema().with_metadata(metadata));

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(codes)) as ArrayRef,
                Arc::new(Float64Array::from(values)) as ArrayRef,
            ],
        )
    }
}

impl Renderer for ParquetRenderer {
    fn extension(&self) -> &'static str {
        "parquet"
    }

    fn render(&self, chart: &Chart, out: &Path) -> Result<()> {
        let batch =
            Self::to_batch(chart).map_err(|e| MapError::render(out, "building record batch", e))?;

        let file = File::create(out).map_err(|e| MapError::file_access(out, e))?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_key_value_metadata(Some(vec![
                KeyValue::new("title".to_string(), chart.title.clone()),
                KeyValue::new("label".to_string(), chart.label.clone()),
            ]))
            .build();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
            .map_err(|e| MapError::render(out, "creating parquet writer", e))?;
        writer
            .write(&batch)
            .map_err(|e| MapError::render(out, "writing chart batch", e))?;
        writer
            .close()
            .map_err(|e| MapError::render(out, "closing parquet writer", e))?;

        debug!(path = %out.display(), rows = batch.num_rows(), "wrote parquet chart");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn writes_codes_and_values() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("World_GDP_1980.parquet");
        let chart = Chart::for_year(
            "1980",
            BTreeMap::from([("fr".to_string(), 11.8), ("us".to_string(), 12.4)]),
        );

        ParquetRenderer::default().render(&chart, &out)?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&out)?)?;
        let kv = builder
            .metadata()
            .file_metadata()
            .key_value_metadata()
            .cloned()
            .unwrap_or_default();
        assert!(kv
            .iter()
            .any(|e| e.key == "title" && e.value.as_deref() == Some("GDP by Country in 1980")));

        let batches: Vec<RecordBatch> = builder.build()?.collect::<std::result::Result<_, _>>()?;
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.num_rows(), 2);

        let codes = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("code column is utf8");
        let values = batch
            .column(1)
            .as_any()
            .downcast_ref::<Float64Array>()
            .expect("value column is f64");
        assert_eq!(codes.value(0), "fr");
        assert_eq!(codes.value(1), "us");
        assert_eq!(values.value(1), 12.4);
        assert_eq!(values.null_count(), 0);
        Ok(())
    }

    #[test]
    fn empty_chart_still_writes_a_file() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("empty.parquet");
        ParquetRenderer::default().render(&Chart::for_year("1960", BTreeMap::new()), &out)?;
        assert!(out.exists());
        Ok(())
    }
}
