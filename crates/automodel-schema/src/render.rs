//! Go source rendering for a table model.
//!
//! Fields are not aligned here; the formatter that runs on the written file
//! lines up the columns.

use crate::ModelDefinition;

const GENERATED_HEADER: &str = "// Code generated by auto-model. DO NOT EDIT.";

pub(crate) fn render_model(model: &ModelDefinition, package: &str) -> String {
    let mut out = String::new();

    out.push_str(GENERATED_HEADER);
    out.push_str("\n\n");
    out.push_str(&format!("package {package}\n\n"));

    // The block is kept even when empty, `import ()` is valid Go.
    out.push_str("import (\n");
    for import in model.imports() {
        out.push_str(&format!("\t\"{}\"\n", import.path()));
    }
    out.push_str(")\n\n");

    out.push_str(&format!("type {} struct {{\n", model.type_name()));
    for field in model.fields() {
        out.push_str(&format!("\t{} {}\n", field.field_name, field.field_type));
    }
    out.push_str("}\n");

    out
}
