//! Generate Go model structs from MySQL schema metadata.
//!
//! One run reads `INFORMATION_SCHEMA.COLUMNS` for the tables matching a
//! name filter and writes one `<table>.go` file per table:
//!
//! ```ignore
//! let config = Config::from_options(Options {
//!     database: "shop".to_string(),
//!     ..Options::default()
//! })?;
//! let formatter = config.formatter.build();
//! let written = automodel::generate(&config, formatter.as_ref()).await?;
//! ```
//!
//! Existing files are never overwritten: generating into a directory that
//! already holds a model for one of the tables fails on that table.

use automodel_schema::ColumnDescriptor;
use camino::Utf8PathBuf;
use futures::{Stream, TryStreamExt};
use tracing::{debug, trace};

pub mod config;
mod emit;
mod error;
mod format;
mod reader;

pub use config::{
    Config, ConnectionDescriptor, FormatterChoice, NameFilter, Options, OutputOptions, Transport,
    mask_password,
};
pub use emit::{Emitter, create_new_file};
pub use error::Error;
pub use format::{Formatter, GoFmt, NoopFormatter};
pub use reader::{COLUMNS_SQL, SchemaReader};

pub use automodel_schema as schema;

/// Result type for auto-model operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Read the catalog and write one model file per matching table.
///
/// Returns the paths written, in catalog order. The connection is closed on
/// every exit path.
pub async fn generate(config: &Config, formatter: &dyn Formatter) -> Result<Vec<Utf8PathBuf>> {
    let mut reader = SchemaReader::connect(&config.connection).await?;
    let written = emit_stream(reader.columns(&config.filter), &config.output, formatter).await?;
    reader.close().await?;
    Ok(written)
}

/// Drive an [`Emitter`] from a stream of catalog rows.
///
/// The first error, from the stream or from the emitter, stops the run;
/// tables flushed before it stay on disk.
pub async fn emit_stream<S>(
    rows: S,
    output: &OutputOptions,
    formatter: &dyn Formatter,
) -> Result<Vec<Utf8PathBuf>>
where
    S: Stream<Item = Result<ColumnDescriptor>>,
{
    let mut rows = std::pin::pin!(rows);
    let mut emitter = Emitter::new(output, formatter);
    let mut count = 0usize;

    while let Some(column) = rows.try_next().await? {
        trace!(
            table = %column.key(),
            column = %column.column_name,
            declared_type = %column.declared_type,
            nullable = column.is_nullable,
            raw_type = %column.raw_column_type,
            "catalog row"
        );
        emitter.push(&column)?;
        count += 1;
    }

    debug!(columns = count, "catalog exhausted");
    emitter.finish()
}

#[cfg(test)]
mod tests;
