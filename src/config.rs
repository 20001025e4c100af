// src/config.rs

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::{MapError, Result};

fn default_separator() -> char {
    ','
}

fn default_quote() -> char {
    '"'
}

/// Describes how to read one GDP table.
///
/// Passed explicitly to every stage; nothing here is global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdpInfo {
    /// Location of the input table.
    pub gdpfile: PathBuf,
    #[serde(default = "default_separator")]
    pub separator: char,
    #[serde(default = "default_quote")]
    pub quote: char,
    /// Column holding the entity display name, used as the join key.
    pub country_name: String,
    #[serde(default)]
    pub country_code: Option<String>,
    /// Informational bounds, not enforced when mapping.
    #[serde(default)]
    pub min_year: Option<i32>,
    #[serde(default)]
    pub max_year: Option<i32>,
}

impl GdpInfo {
    pub fn new(gdpfile: impl Into<PathBuf>, country_name: impl Into<String>) -> Self {
        Self {
            gdpfile: gdpfile.into(),
            separator: default_separator(),
            quote: default_quote(),
            country_name: country_name.into(),
            country_code: None,
            min_year: None,
            max_year: None,
        }
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    ///
    /// A relative `gdpfile` is resolved against the config file's directory.
    #[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MapError::file_access(path, e))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let mut info: GdpInfo = match ext.as_deref() {
            Some("json") => serde_json::from_str(&text)
                .map_err(|e| MapError::InvalidConfig(format!("{}: {}", path.display(), e)))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .map_err(|e| MapError::InvalidConfig(format!("{}: {}", path.display(), e)))?,
            other => {
                return Err(MapError::InvalidConfig(format!(
                    "unsupported config format {:?} for {}",
                    other,
                    path.display()
                )))
            }
        };

        if info.gdpfile.is_relative() {
            if let Some(dir) = path.parent() {
                info.gdpfile = dir.join(&info.gdpfile);
            }
        }
        info.validate()?;
        debug!(gdpfile = %info.gdpfile.display(), key = %info.country_name, "loaded config");
        Ok(info)
    }

    pub fn validate(&self) -> Result<()> {
        ascii_byte("separator", self.separator)?;
        ascii_byte("quote", self.quote)?;
        if self.separator == self.quote {
            return Err(MapError::InvalidConfig(format!(
                "separator and quote are both {:?}",
                self.separator
            )));
        }
        if self.country_name.is_empty() {
            return Err(MapError::InvalidConfig("country_name is empty".into()));
        }
        if let (Some(lo), Some(hi)) = (self.min_year, self.max_year) {
            if lo > hi {
                return Err(MapError::InvalidConfig(format!(
                    "min_year {} is after max_year {}",
                    lo, hi
                )));
            }
        }
        Ok(())
    }

    /// Year column labels between `min_year` and `max_year`, or empty if
    /// either bound is unset.
    pub fn years(&self) -> Vec<String> {
        match (self.min_year, self.max_year) {
            (Some(lo), Some(hi)) => (lo..=hi).map(|y| y.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

pub(crate) fn ascii_byte(what: &str, c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(MapError::InvalidConfig(format!(
            "{} {:?} is not a single ASCII character",
            what, c
        )))
    }
}
