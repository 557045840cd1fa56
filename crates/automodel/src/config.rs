//! Run configuration.
//!
//! [`Options`] is the raw, unvalidated input (usually straight from the command
//! line). [`Config::from_options`] validates it once and produces the
//! [`Config`] that the reader and emitter borrow for the rest of the run.

use automodel_schema::sql_pattern;
use camino::Utf8PathBuf;
use std::fmt;
use std::path::PathBuf;

use crate::{Error, Result};

/// Raw generator options.
#[derive(Clone)]
pub struct Options {
    /// Database name filter, `*` is a wildcard. Required.
    pub database: String,
    /// Table name filter, `*` is a wildcard.
    pub table: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Unix socket path; when set, host and port are ignored.
    pub socket: Option<String>,
    /// Directory the model files are written to.
    pub dir: String,
    /// Go package name for the generated files.
    pub package: String,
    pub formatter: FormatterChoice,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            database: String::new(),
            table: "*".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            socket: None,
            dir: "./".to_string(),
            package: "model".to_string(),
            formatter: FormatterChoice::default(),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("database", &self.database)
            .field("table", &self.table)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &mask_password(&self.password))
            .field("socket", &self.socket)
            .field("dir", &self.dir)
            .field("package", &self.package)
            .field("formatter", &self.formatter)
            .finish()
    }
}

/// `***` for any non-empty password, so options and descriptors can be logged.
pub fn mask_password(password: &str) -> &'static str {
    if password.is_empty() { "" } else { "***" }
}

/// Which formatter runs over each written file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatterChoice {
    /// Run `gofmt -w`, optionally with an explicit binary.
    GoFmt { program: Option<PathBuf> },
    /// Leave files as rendered.
    Skip,
}

impl Default for FormatterChoice {
    fn default() -> Self {
        FormatterChoice::GoFmt { program: None }
    }
}

/// How to reach the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Tcp { host: String, port: u16 },
    Socket { path: String },
}

/// Everything needed to open the catalog connection.
///
/// The connection always targets `INFORMATION_SCHEMA` with the `utf8`
/// charset.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub user: String,
    pub password: String,
    pub transport: Transport,
}

impl ConnectionDescriptor {
    pub const DATABASE: &'static str = "INFORMATION_SCHEMA";
    pub const CHARSET: &'static str = "utf8";
}

/// Masks the password so the descriptor can be logged.
impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user)?;
        if !self.password.is_empty() {
            write!(f, ":{}", mask_password(&self.password))?;
        }
        match &self.transport {
            Transport::Tcp { host, port } => write!(f, "@tcp({host}:{port})")?,
            Transport::Socket { path } => write!(f, "@unix({path})")?,
        }
        write!(f, "/{}?charset={}", Self::DATABASE, Self::CHARSET)
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// `LIKE` patterns for the catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    pub database: String,
    pub table: String,
}

/// Where and how model files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    /// Always ends with `/`.
    pub dir: Utf8PathBuf,
    pub package: String,
}

impl OutputOptions {
    /// `<dir><table>.go`
    pub fn model_path(&self, table_name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}{}.go", self.dir, table_name))
    }
}

/// Validated configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: ConnectionDescriptor,
    pub filter: NameFilter,
    pub output: OutputOptions,
    pub formatter: FormatterChoice,
}

impl Config {
    pub fn from_options(options: Options) -> Result<Self> {
        if options.database.is_empty() {
            return Err(Error::Config(
                "database name not set, please use -d=dbname".to_string(),
            ));
        }
        if options.package.is_empty() {
            return Err(Error::Config("package name must not be empty".to_string()));
        }

        let transport = match options.socket {
            Some(path) if !path.is_empty() => Transport::Socket { path },
            _ => Transport::Tcp {
                host: options.host,
                port: options.port,
            },
        };

        let mut dir = options.dir;
        if !dir.ends_with('/') {
            dir.push('/');
        }

        Ok(Self {
            connection: ConnectionDescriptor {
                user: options.user,
                password: options.password,
                transport,
            },
            filter: NameFilter {
                database: sql_pattern(&options.database),
                table: sql_pattern(&options.table),
            },
            output: OutputOptions {
                dir: Utf8PathBuf::from(dir),
                package: options.package,
            },
            formatter: options.formatter,
        })
    }
}
