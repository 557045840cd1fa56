use automodel_schema::UnsupportedType;
use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("can't connect to mysql ({0})")]
    Connection(#[source] sqlx::Error),

    #[error("closing mysql connection failed ({0})")]
    Close(#[source] sqlx::Error),

    #[error("query sql failed ({0})")]
    Query(#[source] sqlx::Error),

    #[error("row scan failed ({0})")]
    RowDecode(String),

    #[error("column `{table}.{column}`: {source}")]
    UnsupportedType {
        table: String,
        column: String,
        #[source]
        source: UnsupportedType,
    },

    #[error("refusing to overwrite existing file \"{path}\"")]
    FileExists { path: Utf8PathBuf },

    #[error("writing \"{path}\" failed ({source})")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("formatting \"{path}\" failed ({message})")]
    Formatter { path: Utf8PathBuf, message: String },
}

impl Error {
    /// Classify an error coming out of the catalog row stream.
    pub(crate) fn from_stream(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => Error::RowDecode(err.to_string()),
            other => Error::Query(other),
        }
    }
}
