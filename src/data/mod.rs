//! Data module - CSV loading and column classification

pub mod classifier;
mod loader;
mod table;

pub use loader::TableLoader;
pub use table::{ColumnInfo, ColumnKind, Table};
