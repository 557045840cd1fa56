//! Schema metadata types for auto-model.
//!
//! This crate contains everything that does not touch the database or the
//! filesystem: the column descriptors read from `INFORMATION_SCHEMA`, the
//! MySQL to Go type mapping, and the Go source rendering of a table model.

use indexmap::IndexSet;
use std::fmt;

mod render;
mod types;

pub use types::{GoImport, GoType, UnsupportedType, is_unsigned, map_type};

/// One row of `INFORMATION_SCHEMA.COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// `TABLE_SCHEMA`
    pub schema_name: String,
    /// `TABLE_NAME`
    pub table_name: String,
    /// `COLUMN_NAME`
    pub column_name: String,
    /// `DATA_TYPE`, e.g. `int`
    pub declared_type: String,
    /// `IS_NULLABLE = 'YES'`
    pub is_nullable: bool,
    /// `COLUMN_TYPE`, e.g. `int(11) unsigned`
    pub raw_column_type: String,
}

impl ColumnDescriptor {
    /// The table this column belongs to.
    pub fn key(&self) -> TableKey {
        TableKey {
            schema_name: self.schema_name.clone(),
            table_name: self.table_name.clone(),
        }
    }
}

/// Identity of a table batch: a `(schema, table)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableKey {
    pub schema_name: String,
    pub table_name: String,
}

impl TableKey {
    /// Whether `column` belongs to this table.
    pub fn contains(&self, column: &ColumnDescriptor) -> bool {
        self.schema_name == column.schema_name && self.table_name == column.table_name
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema_name, self.table_name)
    }
}

/// A single struct field derived from a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Go field name (`first_upper` of the column name)
    pub field_name: String,
    /// Go field type
    pub field_type: GoType,
}

impl FieldSpec {
    /// Build the field for a column, failing on column types with no mapping.
    pub fn from_column(column: &ColumnDescriptor) -> Result<Self, UnsupportedType> {
        let field_type = map_type(
            &column.declared_type,
            column.is_nullable,
            &column.raw_column_type,
        )?;
        Ok(Self {
            field_name: first_upper(&column.column_name),
            field_type,
        })
    }

    /// The import this field's type needs, if any.
    pub fn import(&self) -> Option<GoImport> {
        self.field_type.import()
    }
}

/// The Go struct generated for one table.
///
/// Fields keep the order in which they were pushed, which is the column
/// ordinal order as long as the catalog rows arrive sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefinition {
    key: TableKey,
    type_name: String,
    fields: Vec<FieldSpec>,
    imports: IndexSet<GoImport>,
}

impl ModelDefinition {
    /// Start an empty model for a table.
    pub fn new(key: TableKey) -> Self {
        let type_name = first_upper(&key.table_name);
        Self {
            key,
            type_name,
            fields: Vec::new(),
            imports: IndexSet::new(),
        }
    }

    /// Append a field, recording the import its type needs.
    pub fn push(&mut self, field: FieldSpec) {
        if let Some(import) = field.import() {
            self.imports.insert(import);
        }
        self.fields.push(field);
    }

    pub fn key(&self) -> &TableKey {
        &self.key
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Deduplicated imports, in first-use order.
    pub fn imports(&self) -> impl Iterator<Item = GoImport> + '_ {
        self.imports.iter().copied()
    }

    /// Render this model as the contents of a Go source file.
    pub fn render(&self, package: &str) -> String {
        render::render_model(self, package)
    }
}

/// Upper-case the first character of `name` if it is ASCII.
///
/// `first_upper("user_id")` is `"User_id"`: only the first character changes,
/// no other identifier cleanup is done.
pub fn first_upper(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(name.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Turn a shell-style name filter into a SQL `LIKE` pattern (`*` becomes `%`).
pub fn sql_pattern(filter: &str) -> String {
    filter.replace('*', "%")
}
