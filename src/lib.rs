//! bash-opts - Declarative option parsing for shell scripts.
//!
//! A script declares its options once as definition tokens (`--[d]ebug`,
//! `--file=`, `--names[]=`), evaluates its arguments against them, and can
//! serialize any binding back into option syntax to forward it.

pub mod context;
pub mod definition;
pub mod output;
pub mod parser;
pub mod serialize;
pub mod table;

pub use context::OptsContext;
pub use definition::{parse_definition, OptionKind, OptionSpec};
pub use output::{
    generate_bindings_string, generate_declaration_string, generate_error_string,
    generate_init_string, TABLE_ENV,
};
pub use parser::{evaluate, Bindings, EvalError, Value};
pub use serialize::opt;
pub use table::{OptionTable, TableError};
