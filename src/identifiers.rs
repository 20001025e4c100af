// src/identifiers.rs

use std::{collections::BTreeMap, fs, path::Path};
use tracing::{debug, warn};

use crate::{
    error::{MapError, Result},
    table::{load_table, Dataset},
};

/// Short canonical code → display name, e.g. `"us" → "United States"`.
pub type IdentifierSet = BTreeMap<String, String>;

/// Load an identifier set.
///
/// `.json` and `.yaml`/`.yml` files hold a single `{code: name}` mapping.
/// Anything else is read as a comma separated table whose `code_column` and
/// `name_column` give the pairs.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_identifiers<P: AsRef<Path>>(
    path: P,
    code_column: &str,
    name_column: &str,
) -> Result<IdentifierSet> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let ids: IdentifierSet = match ext.as_deref() {
        Some("json") => {
            let text = fs::read_to_string(path).map_err(|e| MapError::file_access(path, e))?;
            serde_json::from_str(&text)
                .map_err(|e| MapError::InvalidConfig(format!("{}: {}", path.display(), e)))?
        }
        Some("yaml") | Some("yml") => {
            let text = fs::read_to_string(path).map_err(|e| MapError::file_access(path, e))?;
            serde_yaml::from_str(&text)
                .map_err(|e| MapError::InvalidConfig(format!("{}: {}", path.display(), e)))?
        }
        _ => {
            let table = load_table(path, code_column, ',', '"')?;
            identifiers_from_table(&table, name_column)
        }
    };

    debug!(count = ids.len(), "loaded identifiers");
    Ok(ids)
}

/// Build an identifier set from a table keyed by code.
/// Rows without a `name_column` field are skipped.
pub fn identifiers_from_table(table: &Dataset, name_column: &str) -> IdentifierSet {
    table
        .iter()
        .filter_map(|(code, record)| match record.get(name_column) {
            Some(name) => Some((code.clone(), name.clone())),
            None => {
                warn!(code = %code, column = name_column, "identifier row has no name");
                None
            }
        })
        .collect()
}
