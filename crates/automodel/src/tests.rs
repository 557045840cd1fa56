use super::*;
use automodel_schema::ColumnDescriptor;
use camino::Utf8Path;
use futures::stream;
use std::cell::RefCell;

fn row(table: &str, column: &str, declared: &str, nullable: &str, raw: &str) -> ColumnDescriptor {
    ColumnDescriptor {
        schema_name: "db".to_string(),
        table_name: table.to_string(),
        column_name: column.to_string(),
        declared_type: declared.to_string(),
        is_nullable: nullable == "YES",
        raw_column_type: raw.to_string(),
    }
}

fn scenario() -> Vec<ColumnDescriptor> {
    vec![
        row("t1", "id", "int", "NO", "int(11)"),
        row("t1", "name", "varchar", "YES", "varchar(32)"),
        row("t2", "x", "bigint", "NO", "bigint(20) unsigned"),
    ]
}

fn output_in(dir: &tempfile::TempDir) -> OutputOptions {
    let config = Config::from_options(Options {
        database: "db".to_string(),
        dir: dir.path().display().to_string(),
        ..Options::default()
    })
    .unwrap();
    config.output
}

struct Recording(RefCell<Vec<String>>);

impl Formatter for Recording {
    fn format(&self, path: &Utf8Path) -> Result<()> {
        self.0
            .borrow_mut()
            .push(path.file_name().unwrap_or_default().to_string());
        Ok(())
    }
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_in(&dir);
    let formatter = Recording(RefCell::new(Vec::new()));

    let rows = stream::iter(scenario().into_iter().map(Ok));
    let written = emit_stream(rows, &output, &formatter).await.unwrap();

    assert_eq!(written, [output.model_path("t1"), output.model_path("t2")]);
    assert_eq!(*formatter.0.borrow(), ["t1.go", "t2.go"]);

    let t1 = std::fs::read_to_string(output.model_path("t1")).unwrap();
    insta::assert_snapshot!(t1, @r#"
// Code generated by auto-model. DO NOT EDIT.

package model

import (
	"database/sql"
)

type T1 struct {
	Id int
	Name sql.NullString
}
"#);

    let t2 = std::fs::read_to_string(output.model_path("t2")).unwrap();
    insta::assert_snapshot!(t2, @r#"
// Code generated by auto-model. DO NOT EDIT.

package model

import (
)

type T2 struct {
	X uint64
}
"#);
}

#[tokio::test]
async fn test_rerun_fails_on_first_collision() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_in(&dir);

    emit_stream(stream::iter(scenario().into_iter().map(Ok)), &output, &NoopFormatter)
        .await
        .unwrap();
    let before = std::fs::read_to_string(output.model_path("t1")).unwrap();

    let formatter = Recording(RefCell::new(Vec::new()));
    let err = emit_stream(stream::iter(scenario().into_iter().map(Ok)), &output, &formatter)
        .await
        .unwrap_err();

    match err {
        Error::FileExists { path } => assert_eq!(path, output.model_path("t1")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(formatter.0.borrow().is_empty());
    assert_eq!(
        std::fs::read_to_string(output.model_path("t1")).unwrap(),
        before
    );
}

#[tokio::test]
async fn test_stream_error_stops_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_in(&dir);

    let rows = stream::iter(vec![
        Ok(row("t1", "id", "int", "NO", "int(11)")),
        Ok(row("t2", "id", "int", "NO", "int(11)")),
        Err(Error::RowDecode("column 3 is not utf-8".to_string())),
        Ok(row("t3", "id", "int", "NO", "int(11)")),
    ]);
    let err = emit_stream(rows, &output, &NoopFormatter).await.unwrap_err();

    assert!(matches!(err, Error::RowDecode(_)));
    assert!(output.model_path("t1").exists());
    assert!(!output.model_path("t2").exists());
    assert!(!output.model_path("t3").exists());
}

#[tokio::test]
async fn test_empty_catalog_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = output_in(&dir);

    let rows = stream::iter(Vec::<Result<ColumnDescriptor>>::new());
    let written = emit_stream(rows, &output, &NoopFormatter).await.unwrap();

    assert!(written.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_connection_and_close_errors_read_differently() {
    let connect = Error::Connection(sqlx::Error::Protocol("handshake".to_string())).to_string();
    assert!(connect.starts_with("can't connect to mysql ("), "{connect}");
    assert!(connect.ends_with("handshake)"), "{connect}");

    let close = Error::Close(sqlx::Error::Protocol("broken pipe".to_string())).to_string();
    assert!(close.starts_with("closing mysql connection failed ("), "{close}");
    assert!(close.ends_with("broken pipe)"), "{close}");
    assert!(!close.contains("can't connect"), "{close}");
}

#[test]
fn test_columns_query_shape() {
    assert!(COLUMNS_SQL.contains("FROM COLUMNS"));
    assert!(COLUMNS_SQL.contains("TABLE_SCHEMA LIKE ? AND TABLE_NAME LIKE ?"));
    assert!(COLUMNS_SQL.ends_with("ORDER BY TABLE_SCHEMA, TABLE_NAME, ORDINAL_POSITION"));
}
