//! Catalog reader.
//!
//! Opens a single connection to `INFORMATION_SCHEMA` and streams the rows of
//! `COLUMNS` that match the name filters.

use automodel_schema::ColumnDescriptor;
use futures::{Stream, StreamExt};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, Row};
use tracing::{debug, info};

use crate::config::{ConnectionDescriptor, NameFilter, Transport};
use crate::{Error, Result};

/// The one query the generator runs.
///
/// Rows come back grouped by table and in column order; the emitter relies on
/// this and never re-sorts.
pub const COLUMNS_SQL: &str = "SELECT TABLE_SCHEMA, TABLE_NAME, COLUMN_NAME, DATA_TYPE, IS_NULLABLE, COLUMN_TYPE \
     FROM COLUMNS \
     WHERE TABLE_SCHEMA LIKE ? AND TABLE_NAME LIKE ? \
     ORDER BY TABLE_SCHEMA, TABLE_NAME, ORDINAL_POSITION";

/// Owns the catalog connection for the duration of a run.
///
/// Dropping the reader closes the connection; [`SchemaReader::close`] does
/// the same but waits for the server to acknowledge.
pub struct SchemaReader {
    conn: MySqlConnection,
}

impl SchemaReader {
    pub async fn connect(descriptor: &ConnectionDescriptor) -> Result<Self> {
        info!(%descriptor, "connecting to catalog");
        let conn = MySqlConnection::connect_with(&connect_options(descriptor))
            .await
            .map_err(Error::Connection)?;
        Ok(Self { conn })
    }

    /// Stream the column descriptors matching `filter`.
    ///
    /// Lazy: nothing is sent to the server until the stream is polled. To
    /// read the catalog again, call this again.
    pub fn columns<'a>(
        &'a mut self,
        filter: &'a NameFilter,
    ) -> impl Stream<Item = Result<ColumnDescriptor>> + 'a {
        debug!(
            sql = COLUMNS_SQL,
            database = %filter.database,
            table = %filter.table,
            "querying catalog"
        );
        sqlx::query(COLUMNS_SQL)
            .bind(filter.database.as_str())
            .bind(filter.table.as_str())
            .fetch(&mut self.conn)
            .map(|row| {
                row.map_err(Error::from_stream)
                    .and_then(|row| decode_row(&row))
            })
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await.map_err(Error::Close)
    }
}

fn connect_options(descriptor: &ConnectionDescriptor) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .username(&descriptor.user)
        .database(ConnectionDescriptor::DATABASE)
        .charset(ConnectionDescriptor::CHARSET);

    let options = if descriptor.password.is_empty() {
        options
    } else {
        options.password(&descriptor.password)
    };

    match &descriptor.transport {
        Transport::Tcp { host, port } => options.host(host).port(*port),
        Transport::Socket { path } => options.socket(path),
    }
}

fn decode_row(row: &MySqlRow) -> Result<ColumnDescriptor> {
    Ok(ColumnDescriptor {
        schema_name: text(row, 0)?,
        table_name: text(row, 1)?,
        column_name: text(row, 2)?,
        declared_type: text(row, 3)?,
        is_nullable: text(row, 4)? == "YES",
        raw_column_type: text(row, 5)?,
    })
}

/// Read a catalog column as text.
///
/// Depending on the server version some `INFORMATION_SCHEMA` columns are
/// reported as binary strings, so fall back to raw bytes.
fn text(row: &MySqlRow, index: usize) -> Result<String> {
    match row.try_get::<String, _>(index) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let bytes: Vec<u8> = row.try_get(index).map_err(Error::from_stream)?;
            String::from_utf8(bytes)
                .map_err(|e| Error::RowDecode(format!("column {index} is not utf-8: {e}")))
        }
        Err(err) => Err(Error::from_stream(err)),
    }
}
