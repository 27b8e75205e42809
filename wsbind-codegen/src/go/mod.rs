//! Go code generation modules.

pub mod composites;
pub mod enums;
pub mod interfaces;
pub mod methods;
pub mod naming;

pub use composites::CompositeGenerator;
pub use enums::EnumGenerator;
pub use interfaces::InterfaceGenerator;
pub use methods::MethodGenerator;

use crate::error::CodegenError;
use std::collections::HashMap;
use wsbind_schema::TargetPolicy;

/// Marker line recognised by Go tooling as generated code.
pub const GENERATED_NOTICE: &str = "// Code generated by wsbind. DO NOT EDIT.";

/// Generates the file header: license block, generated-code marker and
/// package clause.
#[must_use]
pub fn header(license: &str, package: &str) -> String {
    let mut output = String::new();

    let license = license.trim();
    if !license.is_empty() {
        output.push_str("/*\n");
        output.push_str(license);
        output.push_str("\n*/\n\n");
    }

    output.push_str(GENERATED_NOTICE);
    output.push_str("\n\n");
    output.push_str(&format!("package {package}\n\n"));
    output
}

/// Generates an import declaration.
///
/// Standard library packages come first, then a blank line, then everything
/// else; each group is sorted.
#[must_use]
pub fn import_block(imports: &[String]) -> String {
    let (mut stdlib, mut others): (Vec<&str>, Vec<&str>) = imports
        .iter()
        .map(String::as_str)
        .partition(|path| !path.contains('.'));
    stdlib.sort_unstable();
    stdlib.dedup();
    others.sort_unstable();
    others.dedup();

    match (stdlib.as_slice(), others.as_slice()) {
        ([], []) => String::new(),
        ([single], []) | ([], [single]) => format!("import \"{single}\"\n\n"),
        _ => {
            let mut output = String::from("import (\n");
            for path in &stdlib {
                output.push_str(&format!("\t\"{path}\"\n"));
            }
            if !stdlib.is_empty() && !others.is_empty() {
                output.push('\n');
            }
            for path in &others {
                output.push_str(&format!("\t\"{path}\"\n"));
            }
            output.push_str(")\n\n");
            output
        }
    }
}

/// Lays out rows of cells in columns the way gofmt aligns them.
///
/// Every cell but the last in a row is padded to the widest cell of its
/// column plus one space. Rows are tab-indented.
#[must_use]
pub fn align(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(row.len().saturating_sub(1)) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    for row in rows {
        output.push('\t');
        let last = row.len().saturating_sub(1);
        for (i, cell) in row.iter().enumerate() {
            output.push_str(cell);
            if i < last {
                let pad = widths[i] - cell.chars().count() + 1;
                output.push_str(&" ".repeat(pad));
            }
        }
        output.push('\n');
    }
    output
}

/// Records that `wire` maps to the Go identifier `ident` within `scope`.
///
/// `seen` maps each identifier claimed so far to the wire name it came from.
///
/// # Errors
/// Returns `CodegenError::Generation` if a different wire name already maps
/// to the same identifier.
pub(crate) fn claim_identifier(
    seen: &mut HashMap<String, String>,
    scope: &str,
    ident: &str,
    wire: &str,
) -> Result<(), CodegenError> {
    match seen.get(ident) {
        Some(previous) => Err(CodegenError::generation(format!(
            "{scope}: '{previous}' and '{wire}' both map to Go identifier {ident}"
        ))),
        None => {
            seen.insert(ident.to_string(), wire.to_string());
            Ok(())
        }
    }
}

/// Generates the `init` block registering a type.
///
/// The root package owns the type table `t` and writes to it directly; other
/// targets register through the root package's `types.Add`.
#[must_use]
pub fn init_block(policy: &TargetPolicy, type_name: &str) -> String {
    let key = policy.registration_key(type_name);
    let reflected = format!("reflect.TypeOf((*{type_name})(nil)).Elem()");

    let mut output = String::new();
    output.push_str("func init() {\n");
    if policy.is_root {
        output.push_str(&format!("\tt[\"{key}\"] = {reflected}\n"));
    } else {
        output.push_str(&format!("\ttypes.Add(\"{key}\", {reflected})\n"));
    }
    output.push_str("}\n\n");
    output
}
