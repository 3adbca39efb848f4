//! Local file writers
//!
//! Writes a table to a Parquet file or to JSON lines.

use crate::error::{Error, Result};
use crate::table::Table;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Write a table to a Parquet file, returning the number of rows written.
///
/// An empty table still produces a file carrying its column schema.
pub fn write_parquet(
    path: impl AsRef<Path>,
    table: &Table,
    config: Option<&ParquetWriterConfig>,
) -> Result<usize> {
    let default_config = ParquetWriterConfig::default();
    let config = config.unwrap_or(&default_config);

    let batch = table.to_record_batch()?;
    let file = File::create(path.as_ref())
        .map_err(|e| Error::output(format!("Failed to create file: {e}")))?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(config.build_properties()))
        .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;
    writer
        .write(&batch)
        .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;
    writer
        .close()
        .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;

    Ok(batch.num_rows())
}

/// Write a table as JSON lines, one dense object per row
pub fn write_json<W: Write>(writer: W, table: &Table) -> Result<usize> {
    let mut writer = BufWriter::new(writer);
    for record in table.to_records() {
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(table.len())
}

/// Write a table as JSON lines to a file
pub fn write_json_file(path: impl AsRef<Path>, table: &Table) -> Result<usize> {
    let file = File::create(path.as_ref())
        .map_err(|e| Error::output(format!("Failed to create file: {e}")))?;
    write_json(file, table)
}
