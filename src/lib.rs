//! Reconcile a GDP-style table against a set of country codes and produce
//! per-code `log10` values for a choropleth.
//!
//! The pipeline is `table` → `reconcile` → `reconcile::values` → `render`,
//! driven per year by `pipeline`.

pub mod config;
pub mod error;
pub mod identifiers;
pub mod pipeline;
pub mod reconcile;
pub mod render;
pub mod table;

pub use config::GdpInfo;
pub use error::{MapError, Result};
pub use identifiers::IdentifierSet;
pub use pipeline::{build_map, render_map, render_years, MapReport};
pub use reconcile::{
    reconcile,
    values::{build_value_mapping, classify, map_values, Outcome, ValueMapping},
    Reconciliation,
};
pub use table::{load_table, Dataset, Record};
