//! Shell text generation: assignments, error exits and the wrapper functions.

use crate::parser::{Bindings, EvalError, Value};
use crate::table::{OptionTable, TableError};
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Environment variable carrying the serialized option table between calls.
pub const TABLE_ENV: &str = "BASH_OPTS_TABLE";

/// Name of the variable holding positional arguments.
pub const ARGS_VAR: &str = "args";

/// Escape a string for use inside shell double quotes.
///
/// Escapes: $, `, \ and ". Everything else is literal inside double quotes.
pub fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '$' => escaped.push_str("\\$"),
            '`' => escaped.push_str("\\`"),
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap a value in escaped double quotes.
pub fn double_quote(value: &str) -> String {
    format!("\"{}\"", escape_double_quoted(value))
}

/// Wrap a value in single quotes, which keep everything but `'` literal.
pub fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Convert an option name to a valid shell variable name.
///
/// Replaces hyphens with underscores.
pub fn to_shell_var_name(name: &str) -> String {
    name.replace('-', "_")
}

fn render_value(var: &str, value: &Value) -> String {
    match value {
        Value::Flag(b) => format!("{}={}\n", var, b),
        Value::Scalar(s) => format!("{}={}\n", var, double_quote(s)),
        Value::Array(items) => format!("{}={}\n", var, render_array(items)),
    }
}

fn render_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| double_quote(item)).collect();
    format!("({})", quoted.join(" "))
}

/// Generate assignments for every declared binding and the positional args.
///
/// Bindings appear in declaration order; a binding missing from `bindings`
/// is rendered with its default.
pub fn generate_bindings_string(table: &OptionTable, bindings: &Bindings) -> String {
    let mut output = String::new();

    for spec in table.specs() {
        let var = to_shell_var_name(&spec.name);
        let value = bindings
            .get(&spec.name)
            .cloned()
            .unwrap_or_else(|| Value::default_for(&spec.kind));
        output.push_str(&render_value(&var, &value));
    }

    output.push_str(&format!("{}={}\n", ARGS_VAR, render_array(bindings.args())));
    output
}

/// Generate the output of the declaration call.
///
/// Establishes every default binding and exports the serialized table.
pub fn generate_declaration_string(table: &OptionTable) -> Result<String, TableError> {
    let mut output = String::new();

    for spec in table.specs() {
        let var = to_shell_var_name(&spec.name);
        output.push_str(&render_value(&var, &Value::default_for(&spec.kind)));
    }

    output.push_str(&format!(
        "export {}={}\n",
        TABLE_ENV,
        single_quote(&table.to_json()?)
    ));
    Ok(output)
}

/// Generate an error exit as a string.
///
/// When evaluated, prints the diagnostic to stderr and exits 1.
pub fn generate_error_string(error: &EvalError) -> String {
    format!("echo {} >&2\nexit 1\n", double_quote(&error.to_string()))
}

/// Generate the shell functions `opts`, `opts_eval` and `opt`.
///
/// `bin` is the command used to reach this executable.
pub fn generate_init_string(bin: &str) -> String {
    let bin = single_quote(bin);
    format!(
        r#"opts() {{
  eval "$(command {bin} declare -- "$@")"
}}

opts_eval() {{
  eval "$(command {bin} parse -- "$@")"
}}

opt() {{
  local __opts_var="${{1//-/_}}"
  eval "set -- \"\$1\" \${{${{__opts_var}}[@]+\"\${{${{__opts_var}}[@]}}\"}}"
  command {bin} opt -- "$@"
}}
"#
    )
}

/// Write content to a temporary file and return its path.
///
/// The file persists after the process exits.
pub fn write_temp_file(content: &str) -> Result<PathBuf> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    let path = file.into_temp_path().keep()?;
    Ok(path)
}
