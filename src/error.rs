// src/error.rs

use std::{num::ParseFloatError, path::PathBuf};
use thiserror::Error;

/// Everything that can go wrong while loading, mapping or rendering a table.
///
/// Unmatched identifiers and empty fields are not errors; they are reported
/// through [`crate::reconcile::Reconciliation`] and
/// [`crate::reconcile::values::ValueMapping`].
#[derive(Error, Debug)]
pub enum MapError {
    /// The input or output path could not be opened.
    #[error("cannot access {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited reader rejected the input.
    #[error("malformed table {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("key column {column:?} not found in header of {path:?}")]
    MissingKeyColumn { path: PathBuf, column: String },

    /// A reconciled name has no row in the dataset being mapped.
    #[error("no record named {name:?} in the dataset")]
    MissingRecord { name: String },

    /// A matched record has no field for the requested column.
    #[error("record {name:?} has no column {column:?}")]
    MissingColumn { name: String, column: String },

    /// A non-empty field is not a numeric literal.
    #[error("{identifier}: field {column:?} = {raw:?} is not a number: {source}")]
    Parse {
        identifier: String,
        column: String,
        raw: String,
        #[source]
        source: ParseFloatError,
    },

    /// log10 is only defined for finite, strictly positive magnitudes.
    #[error("{identifier}: field {column:?} = {value} has no logarithm")]
    NonPositiveMagnitude {
        identifier: String,
        column: String,
        value: f64,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("render failed for {path:?}: {message}")]
    Render {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl MapError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MapError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn render<E>(path: impl Into<PathBuf>, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        MapError::Render {
            path: path.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
