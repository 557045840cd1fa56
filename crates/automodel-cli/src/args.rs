//! Command-line flags.
//!
//! Short flags follow the MySQL client conventions, so `-h` is the host and
//! help is only available as `--help`.

use automodel::{FormatterChoice, Options, mask_password};
use clap::{ArgAction, Parser};
use std::fmt;
use std::path::PathBuf;

/// Generate Go model structs from MySQL INFORMATION_SCHEMA.
#[derive(Parser)]
#[command(name = "auto-model", version, disable_help_flag = true)]
pub struct Cli {
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Database name, `*` matches anything
    #[arg(short = 'd', value_name = "DATABASE", default_value = "")]
    pub database: String,

    /// Table name, `*` matches anything
    #[arg(short = 't', value_name = "TABLE", default_value = "*")]
    pub table: String,

    /// Database host
    #[arg(short = 'h', value_name = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Database port
    #[arg(short = 'P', value_name = "PORT", default_value_t = 3306)]
    pub port: u16,

    /// Database user
    #[arg(short = 'u', value_name = "USER", default_value = "root")]
    pub user: String,

    /// Database password
    #[arg(
        short = 'p',
        value_name = "PASSWORD",
        env = "MYSQL_PWD",
        hide_env_values = true,
        default_value = ""
    )]
    pub password: String,

    /// Unix socket file, used instead of host and port
    #[arg(short = 'S', value_name = "SOCKET")]
    pub socket: Option<String>,

    /// Destination directory
    #[arg(short = 'D', value_name = "DIR", default_value = "./")]
    pub dir: String,

    /// Go package name of the generated files
    #[arg(long, default_value = "model")]
    pub package: String,

    /// gofmt binary (default: $GOROOT/bin/gofmt, then gofmt from PATH)
    #[arg(long, value_name = "PATH")]
    pub gofmt: Option<PathBuf>,

    /// Write files without running gofmt
    #[arg(long, conflicts_with = "gofmt")]
    pub no_fmt: bool,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("database", &self.database)
            .field("table", &self.table)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &mask_password(&self.password))
            .field("socket", &self.socket)
            .field("dir", &self.dir)
            .field("package", &self.package)
            .field("gofmt", &self.gofmt)
            .field("no_fmt", &self.no_fmt)
            .finish()
    }
}

impl Cli {
    pub fn into_options(self) -> Options {
        let formatter = if self.no_fmt {
            FormatterChoice::Skip
        } else {
            FormatterChoice::GoFmt {
                program: self.gofmt,
            }
        };

        Options {
            database: self.database,
            table: self.table,
            host: self.host,
            port: self.port,
            user: self.user,
            password: self.password,
            socket: self.socket,
            dir: self.dir,
            package: self.package,
            formatter,
        }
    }
}
