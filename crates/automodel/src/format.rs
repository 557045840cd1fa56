//! Formatters run over each generated file.

use camino::Utf8Path;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::config::FormatterChoice;
use crate::{Error, Result};

/// Rewrites a freshly written model file in place.
pub trait Formatter {
    fn format(&self, path: &Utf8Path) -> Result<()>;
}

/// Runs `gofmt -w <file>`.
#[derive(Debug, Clone)]
pub struct GoFmt {
    program: PathBuf,
}

impl GoFmt {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `$GOROOT/bin/gofmt` when `GOROOT` is set, otherwise `gofmt` from `PATH`.
    pub fn locate() -> Self {
        Self::from_goroot(std::env::var_os("GOROOT"))
    }

    fn from_goroot(goroot: Option<OsString>) -> Self {
        match goroot {
            Some(root) if !root.is_empty() => Self::new(PathBuf::from(root).join("bin").join("gofmt")),
            _ => Self::new("gofmt"),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Formatter for GoFmt {
    fn format(&self, path: &Utf8Path) -> Result<()> {
        debug!(program = %self.program.display(), %path, "running formatter");

        let output = Command::new(&self.program)
            .arg("-w")
            .arg(path)
            .output()
            .map_err(|e| Error::Formatter {
                path: path.to_owned(),
                message: format!("{}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            return Err(Error::Formatter {
                path: path.to_owned(),
                message: format!(
                    "{} -w {path} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(())
    }
}

/// Leaves files untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl Formatter for NoopFormatter {
    fn format(&self, _path: &Utf8Path) -> Result<()> {
        Ok(())
    }
}

impl FormatterChoice {
    pub fn build(&self) -> Box<dyn Formatter> {
        match self {
            FormatterChoice::GoFmt {
                program: Some(program),
            } => Box::new(GoFmt::new(program.clone())),
            FormatterChoice::GoFmt { program: None } => Box::new(GoFmt::locate()),
            FormatterChoice::Skip => Box::new(NoopFormatter),
        }
    }
}
