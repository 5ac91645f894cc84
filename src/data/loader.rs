//! CSV Table Loader Module
//! Turns an uploaded byte stream into a `Table` using Polars.

use crate::data::Table;
use crate::error::Result;
use polars::prelude::*;
use std::io::Cursor;

/// Handles CSV parsing with full-column schema inference.
pub struct TableLoader;

impl TableLoader {
    fn read_options() -> CsvReadOptions {
        // Scan every row so a late non-numeric value turns the column into text
        // instead of failing the parse.
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
    }

    /// Parse uploaded CSV bytes. Malformed input is returned as an error.
    pub fn load_bytes(bytes: Vec<u8>) -> Result<Table> {
        let df = Self::read_options()
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        Ok(Table::new(df))
    }
}
