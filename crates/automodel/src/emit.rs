//! Groups catalog rows into tables and writes one Go file per table.

use automodel_schema::{ColumnDescriptor, FieldSpec, ModelDefinition};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::OpenOptions;
use std::io::{self, Write};
use tracing::{debug, info};

use crate::config::OutputOptions;
use crate::format::Formatter;
use crate::{Error, Result};

/// Model emitter.
///
/// Rows must arrive grouped by `(schema, table)`: a row for a different table
/// closes the open model, writes it out and starts a new one. Rows that are
/// not contiguous split a table into several models, and the second one
/// collides with the first file on disk.
pub struct Emitter<'a> {
    output: &'a OutputOptions,
    formatter: &'a dyn Formatter,
    /// `None` while idle, otherwise the table being accumulated.
    open: Option<ModelDefinition>,
    written: Vec<Utf8PathBuf>,
}

impl<'a> Emitter<'a> {
    pub fn new(output: &'a OutputOptions, formatter: &'a dyn Formatter) -> Self {
        Self {
            output,
            formatter,
            open: None,
            written: Vec::new(),
        }
    }

    pub fn push(&mut self, column: &ColumnDescriptor) -> Result<()> {
        if self
            .open
            .as_ref()
            .is_some_and(|model| !model.key().contains(column))
        {
            self.flush()?;
        }

        let field = FieldSpec::from_column(column).map_err(|source| Error::UnsupportedType {
            table: column.table_name.clone(),
            column: column.column_name.clone(),
            source,
        })?;

        let model = self.open.get_or_insert_with(|| {
            debug!(table = %column.key(), "starting model");
            ModelDefinition::new(column.key())
        });
        model.push(field);
        Ok(())
    }

    /// Write out the open model, if any, and return every file written.
    pub fn finish(mut self) -> Result<Vec<Utf8PathBuf>> {
        self.flush()?;
        Ok(self.written)
    }

    fn flush(&mut self) -> Result<()> {
        let Some(model) = self.open.take() else {
            return Ok(());
        };

        let path = self.output.model_path(&model.key().table_name);
        create_new_file(&path, &model.render(&self.output.package))?;
        self.formatter.format(&path)?;

        info!(
            %path,
            table = %model.key(),
            fields = model.fields().len(),
            "wrote model"
        );
        self.written.push(path);
        Ok(())
    }
}

/// Create `path` and write `contents` to it, synced to disk.
///
/// Fails with [`Error::FileExists`] instead of overwriting.
pub fn create_new_file(path: &Utf8Path, contents: &str) -> Result<()> {
    let io_err = |source: io::Error| Error::Io {
        path: path.to_owned(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => Error::FileExists {
                path: path.to_owned(),
            },
            _ => io_err(source),
        })?;

    file.write_all(contents.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recording(RefCell<Vec<Utf8PathBuf>>);

    impl Formatter for Recording {
        fn format(&self, path: &Utf8Path) -> Result<()> {
            self.0.borrow_mut().push(path.to_owned());
            Ok(())
        }
    }

    fn output(dir: &tempfile::TempDir) -> OutputOptions {
        OutputOptions {
            dir: Utf8PathBuf::from(format!("{}/", dir.path().display())),
            package: "model".to_string(),
        }
    }

    fn col(table: &str, name: &str, declared: &str, nullable: bool, raw: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            schema_name: "db".to_string(),
            table_name: table.to_string(),
            column_name: name.to_string(),
            declared_type: declared.to_string(),
            is_nullable: nullable,
            raw_column_type: raw.to_string(),
        }
    }

    #[test]
    fn test_create_new_file_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = output(&dir).model_path("user");
        std::fs::write(&path, "keep me").unwrap();

        let err = create_new_file(&path, "package model\n").unwrap_err();
        assert!(matches!(err, Error::FileExists { .. }), "{err}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_create_new_file_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from(format!("{}/missing/user.go", dir.path().display()));
        let err = create_new_file(&path, "").unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "{err}");
    }

    #[test]
    fn test_one_file_per_table_in_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let output = output(&dir);
        let formatter = Recording(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new(&output, &formatter);

        for column in [
            col("order", "id", "bigint", false, "bigint(20) unsigned"),
            col("order", "user_id", "int", false, "int(11)"),
            col("order", "total", "decimal", false, "decimal(10,2)"),
            col("user", "id", "int", false, "int(11) unsigned"),
            col("user", "email", "varchar", false, "varchar(255)"),
            col("user", "deleted_at", "timestamp", true, "timestamp"),
        ] {
            emitter.push(&column).unwrap();
        }
        let written = emitter.finish().unwrap();

        assert_eq!(
            written,
            [output.model_path("order"), output.model_path("user")]
        );
        assert_eq!(*formatter.0.borrow(), written);

        let order = std::fs::read_to_string(output.model_path("order")).unwrap();
        let fields: Vec<_> = order
            .lines()
            .filter(|l| l.starts_with('\t') && !l.contains('"'))
            .map(str::trim)
            .collect();
        assert_eq!(fields, ["Id uint64", "User_id int", "Total float64"]);

        let user = std::fs::read_to_string(output.model_path("user")).unwrap();
        assert!(user.contains("type User struct {"));
        assert!(user.contains("\tDeleted_at sql.NullString\n"));
        assert!(user.contains("\t\"database/sql\"\n"));
    }

    #[test]
    fn test_finish_without_rows_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = output(&dir);
        let emitter = Emitter::new(&output, &crate::NoopFormatter);
        assert!(emitter.finish().unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_unsupported_type_aborts_before_writing_that_table() {
        let dir = tempfile::tempdir().unwrap();
        let output = output(&dir);
        let mut emitter = Emitter::new(&output, &crate::NoopFormatter);

        emitter.push(&col("t1", "id", "int", false, "int(11)")).unwrap();
        emitter.push(&col("t2", "id", "int", false, "int(11)")).unwrap();
        let err = emitter
            .push(&col("t2", "payload", "json", true, "json"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "column `t2.payload`: unsupported database column type `json`"
        );
        assert!(output.model_path("t1").exists());
        assert!(!output.model_path("t2").exists());
    }

    #[test]
    fn test_formatter_failure_is_fatal() {
        struct Failing;
        impl Formatter for Failing {
            fn format(&self, path: &Utf8Path) -> Result<()> {
                Err(Error::Formatter {
                    path: path.to_owned(),
                    message: "syntax error".to_string(),
                })
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let output = output(&dir);
        let mut emitter = Emitter::new(&output, &Failing);
        emitter.push(&col("t1", "id", "int", false, "int(11)")).unwrap();

        let err = emitter
            .push(&col("t2", "id", "int", false, "int(11)"))
            .unwrap_err();
        assert!(matches!(err, Error::Formatter { .. }));
    }

    #[test]
    fn test_same_table_in_two_schemas_collides() {
        let dir = tempfile::tempdir().unwrap();
        let output = output(&dir);
        let mut emitter = Emitter::new(&output, &crate::NoopFormatter);

        let mut other = col("user", "id", "int", false, "int(11)");
        other.schema_name = "db2".to_string();

        emitter.push(&col("user", "id", "int", false, "int(11)")).unwrap();
        // Switching schemas only flushes `db.user`; `db2.user` is still open.
        emitter.push(&other).unwrap();
        let first = std::fs::read_to_string(output.model_path("user")).unwrap();

        let err = emitter.finish().unwrap_err();
        assert!(matches!(err, Error::FileExists { .. }), "{err}");
        assert_eq!(
            std::fs::read_to_string(output.model_path("user")).unwrap(),
            first
        );
    }

    #[test]
    fn test_non_contiguous_rows_split_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let output = output(&dir);
        let mut emitter = Emitter::new(&output, &crate::NoopFormatter);

        emitter.push(&col("t1", "id", "int", false, "int(11)")).unwrap();
        emitter.push(&col("t2", "id", "int", false, "int(11)")).unwrap();
        emitter.push(&col("t1", "name", "char", false, "char(8)")).unwrap();
        let err = emitter.finish().unwrap_err();

        assert!(matches!(err, Error::FileExists { .. }), "{err}");
        let t1 = std::fs::read_to_string(output.model_path("t1")).unwrap();
        assert!(t1.contains("\tId int\n"));
        assert!(!t1.contains("Name"));
    }
}
