//! The compiled option table shared by evaluation and serialization.

use crate::definition::{parse_definition, OptionKind, OptionSpec, NEGATION_PREFIX};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when restoring a serialized table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to parse option table: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Declared options in declaration order.
///
/// Long names are unique, as are short aliases. The table serializes as a
/// plain JSON array of specs so it can be carried between separate calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionTable {
    specs: Vec<OptionSpec>,
}

impl OptionTable {
    /// Compile a sequence of definition tokens into a fresh table.
    pub fn compile<I, S>(definitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = OptionTable::default();
        for token in definitions {
            table.insert(parse_definition(token.as_ref()));
        }
        debug!(options = table.len(), "compiled option table");
        table
    }

    /// Install a spec.
    ///
    /// A spec with an already declared name replaces the earlier one in place.
    /// A short alias already held by another spec moves to the new one.
    pub fn insert(&mut self, spec: OptionSpec) {
        if let Some(short) = spec.short {
            for other in self.specs.iter_mut() {
                if other.short == Some(short) && other.name != spec.name {
                    debug!(
                        alias = %short,
                        from = %other.name,
                        to = %spec.name,
                        "short alias reassigned"
                    );
                    other.short = None;
                }
            }
        }

        match self.specs.iter_mut().find(|s| s.name == spec.name) {
            Some(existing) => {
                debug!(name = %spec.name, "option redeclared");
                *existing = spec;
            }
            None => self.specs.push(spec),
        }
    }

    /// Restore a table from its JSON form.
    pub fn from_json(json: &str) -> Result<OptionTable, TableError> {
        let table: OptionTable = serde_json::from_str(json)?;
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, TableError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Look up a spec by its declared name.
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    /// Look up a spec by its short alias.
    pub fn by_short(&self, short: char) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.short == Some(short))
    }

    /// Look up the spec a long command-line token (`--<name>`) refers to.
    ///
    /// Flags and scalars match on their declared name, arrays on their
    /// singular token. A declared name wins over an array's singular token.
    pub fn by_token(&self, name: &str) -> Option<&OptionSpec> {
        self.specs
            .iter()
            .find(|s| !matches!(s.kind, OptionKind::Array { .. }) && s.name == name)
            .or_else(|| {
                self.specs
                    .iter()
                    .find(|s| matches!(&s.kind, OptionKind::Array { singular } if singular == name))
            })
    }

    /// Look up a flag that `--no-<name>` negates.
    pub fn negated_flag(&self, token_name: &str) -> Option<&OptionSpec> {
        let name = token_name.strip_prefix(NEGATION_PREFIX)?;
        self.get(name).filter(|s| s.is_flag())
    }

    /// The derived mapping from short alias to declared name.
    pub fn short_names(&self) -> HashMap<char, &str> {
        self.specs
            .iter()
            .filter_map(|s| s.short.map(|c| (c, s.name.as_str())))
            .collect()
    }
}
