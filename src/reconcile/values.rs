// src/reconcile/values.rs

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

use super::{reconcile, Reconciliation};
use crate::{
    error::{MapError, Result},
    identifiers::IdentifierSet,
    table::Dataset,
};

/// What became of one identifier for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// log10 of the field's magnitude.
    Value(f64),
    /// Matched, but the field was empty.
    NoData,
    /// The display name is not in the dataset.
    Unmatched,
}

impl Outcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            Outcome::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// Values for the matched identifiers of one column.
///
/// Each matched identifier is in exactly one of `values` and `no_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValueMapping {
    pub values: BTreeMap<String, f64>,
    pub no_data: BTreeSet<String>,
}

impl ValueMapping {
    /// Collapse per-identifier outcomes. `Unmatched` entries are dropped.
    pub fn from_outcomes(outcomes: &BTreeMap<String, Outcome>) -> Self {
        let mut out = ValueMapping::default();
        for (code, outcome) in outcomes {
            match outcome {
                Outcome::Value(v) => {
                    out.values.insert(code.clone(), *v);
                }
                Outcome::NoData => {
                    out.no_data.insert(code.clone());
                }
                Outcome::Unmatched => {}
            }
        }
        out
    }

    /// True if the two sets split exactly the matched identifiers.
    pub fn covers(&self, reconciliation: &Reconciliation) -> bool {
        self.values.len() + self.no_data.len() == reconciliation.matched.len()
            && reconciliation
                .matched
                .keys()
                .all(|code| self.values.contains_key(code) != self.no_data.contains(code))
    }
}

/// Interpret a raw field. `Ok(None)` means the cell was empty.
///
/// Surrounding whitespace is tolerated by the parse, but a field made only of
/// whitespace is not empty and fails to parse.
pub fn log_magnitude(identifier: &str, column: &str, raw: &str) -> Result<Option<f64>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let magnitude: f64 = raw.trim().parse().map_err(|source| MapError::Parse {
        identifier: identifier.to_string(),
        column: column.to_string(),
        raw: raw.to_string(),
        source,
    })?;

    if !magnitude.is_finite() || magnitude <= 0.0 {
        return Err(MapError::NonPositiveMagnitude {
            identifier: identifier.to_string(),
            column: column.to_string(),
            value: magnitude,
        });
    }

    Ok(Some(magnitude.log10()))
}

/// Raw field `column` of the row named `name`.
fn field<'a>(dataset: &'a Dataset, name: &str, column: &str) -> Result<&'a str> {
    let record = dataset.get(name).ok_or_else(|| MapError::MissingRecord {
        name: name.to_string(),
    })?;
    record
        .get(column)
        .map(String::as_str)
        .ok_or_else(|| MapError::MissingColumn {
            name: name.to_string(),
            column: column.to_string(),
        })
}

/// Compute log10 values for every matched identifier of `reconciliation`.
///
/// Unmatched identifiers are left out entirely; the caller reports them
/// from the reconciliation.
pub fn map_values(
    identifiers: &IdentifierSet,
    dataset: &Dataset,
    reconciliation: &Reconciliation,
    column: &str,
) -> Result<ValueMapping> {
    let mut out = ValueMapping::default();

    for (code, name) in &reconciliation.matched {
        debug_assert!(identifiers.contains_key(code));

        match log_magnitude(code, column, field(dataset, name, column)?)? {
            Some(v) => {
                out.values.insert(code.clone(), v);
            }
            None => {
                trace!(code = %code, column, "no data");
                out.no_data.insert(code.clone());
            }
        }
    }

    debug!(
        column,
        values = out.values.len(),
        no_data = out.no_data.len(),
        "mapped values"
    );
    Ok(out)
}

/// Reconcile then map in one step.
pub fn build_value_mapping(
    identifiers: &IdentifierSet,
    dataset: &Dataset,
    column: &str,
) -> Result<(Reconciliation, ValueMapping)> {
    let reconciliation = reconcile(identifiers, dataset);
    let mapping = map_values(identifiers, dataset, &reconciliation, column)?;
    debug_assert!(mapping.covers(&reconciliation));
    Ok((reconciliation, mapping))
}

/// Per-identifier view over the whole identifier set.
pub fn classify(
    identifiers: &IdentifierSet,
    dataset: &Dataset,
    column: &str,
) -> Result<BTreeMap<String, Outcome>> {
    let reconciliation = reconcile(identifiers, dataset);

    identifiers
        .keys()
        .map(|code| -> Result<(String, Outcome)> {
            let outcome = match reconciliation.matched.get(code) {
                None => Outcome::Unmatched,
                Some(name) => match log_magnitude(code, column, field(dataset, name, column)?)? {
                    Some(v) => Outcome::Value(v),
                    None => Outcome::NoData,
                },
            };
            Ok((code.clone(), outcome))
        })
        .collect()
}
