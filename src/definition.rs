//! Definition token compiler.
//!
//! Each definition token declares one option:
//!
//! - `--name` or `--[x]name`: a boolean flag, optionally with short alias `x`
//! - `--name=` or `--[x]name=`: an option taking a single value
//! - `--names[]=`: an array option, filled one element at a time via `--name=value`

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Prefix that negates a flag on the command line.
pub const NEGATION_PREFIX: &str = "no-";

/// The kind of a declared option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OptionKind {
    /// A boolean flag (e.g., --debug), implicitly negatable via --no-debug
    Flag,
    /// An option that takes one value (e.g., --file=path)
    Scalar,
    /// An option collecting every occurrence of its singular token
    Array {
        /// Command-line token name used to append one element
        singular: String,
    },
}

/// One declared option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Declared name, also the name of the output binding
    pub name: String,
    /// Single-character alias (e.g., 'd' for -d)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// How the option is parsed and stored
    pub kind: OptionKind,
}

impl OptionSpec {
    /// The long token name used on the command line.
    ///
    /// For arrays this is the singular form, for everything else the declared name.
    pub fn token_name(&self) -> &str {
        match &self.kind {
            OptionKind::Array { singular } => singular.as_str(),
            OptionKind::Flag | OptionKind::Scalar => self.name.as_str(),
        }
    }

    pub fn is_flag(&self) -> bool {
        self.kind == OptionKind::Flag
    }
}

/// Compile a single definition token into an [`OptionSpec`].
///
/// Malformed tokens are not rejected: whatever remains after stripping the
/// recognized decorations becomes the option name.
pub fn parse_definition(token: &str) -> OptionSpec {
    let body = token.strip_prefix("--").unwrap_or(token);
    let (short, body) = split_alias(body);

    let spec = if let Some(name) = body.strip_suffix("[]=") {
        OptionSpec {
            name: name.to_string(),
            short,
            kind: OptionKind::Array {
                singular: singularize(name).to_string(),
            },
        }
    } else if let Some(name) = body.strip_suffix('=') {
        OptionSpec {
            name: name.to_string(),
            short,
            kind: OptionKind::Scalar,
        }
    } else {
        // `--no-debug` declares the flag `debug`
        let name = body.strip_prefix(NEGATION_PREFIX).unwrap_or(body.as_str());
        OptionSpec {
            name: name.to_string(),
            short,
            kind: OptionKind::Flag,
        }
    };

    trace!(
        token = %token,
        name = %spec.name,
        short = ?spec.short,
        kind = ?spec.kind,
        "compiled definition"
    );
    spec
}

/// Split a leading `[x]` alias off a definition body, keeping `x` in the name.
///
/// `[d]ebug` becomes `('d', "debug")`.
fn split_alias(body: &str) -> (Option<char>, String) {
    let mut chars = body.chars();
    if chars.next() == Some('[') {
        if let (Some(c), Some(']')) = (chars.next(), chars.next()) {
            if c != ']' {
                return (Some(c), format!("{}{}", c, chars.as_str()));
            }
        }
    }
    (None, body.to_string())
}

/// Derive the per-element token of an array by dropping one trailing `s`.
///
/// Names without a trailing `s` are used unchanged.
pub fn singularize(name: &str) -> &str {
    name.strip_suffix('s').unwrap_or(name)
}
