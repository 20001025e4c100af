// src/table/mod.rs
pub mod loader;

use std::collections::HashMap;

pub use loader::{load_gdp_table, load_table, load_table_from_reader};

/// One row of the table: column name → raw field value.
/// An empty string means the cell held no data.
pub type Record = HashMap<String, String>;

/// All rows of a table, keyed by the value of the key column.
/// Row order is not kept.
pub type Dataset = HashMap<String, Record>;
