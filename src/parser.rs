//! Argument evaluation against a compiled option table.

use crate::definition::{OptionKind, OptionSpec};
use crate::table::OptionTable;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur during argument evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// An option-looking token matched no declared option. Carries the token verbatim.
    #[error("Unknown option: {0}")]
    UnknownOption(String),
}

/// The current value of one output binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Flag(bool),
    Scalar(String),
    Array(Vec<String>),
}

impl Value {
    /// The value a binding holds before any argument sets it.
    pub fn default_for(kind: &OptionKind) -> Self {
        match kind {
            OptionKind::Flag => Value::Flag(false),
            OptionKind::Scalar => Value::Scalar(String::new()),
            OptionKind::Array { .. } => Value::Array(Vec::new()),
        }
    }

    /// Rebuild a value from the raw word(s) a shell variable expands to.
    ///
    /// A flag is true only for the exact word `true`.
    pub fn from_words(kind: &OptionKind, words: &[String]) -> Self {
        match kind {
            OptionKind::Flag => Value::Flag(words.first().map(String::as_str) == Some("true")),
            OptionKind::Scalar => Value::Scalar(words.first().cloned().unwrap_or_default()),
            OptionKind::Array { .. } => Value::Array(words.to_vec()),
        }
    }
}

/// Output bindings plus the collected positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: HashMap<String, Value>,
    args: Vec<String>,
}

impl Bindings {
    /// Bindings holding the default for every declared option and no args.
    pub fn defaults(table: &OptionTable) -> Self {
        let values = table
            .specs()
            .iter()
            .map(|spec| (spec.name.clone(), Value::default_for(&spec.kind)))
            .collect();
        Self {
            values,
            args: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Overwrite a binding, as a script would by assigning its variable.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.values.get(name)? {
            Value::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn scalar(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            Value::Scalar(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn array(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name)? {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Positional arguments in their original relative order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn push(&mut self, name: &str, item: String) {
        match self.values.get_mut(name) {
            Some(Value::Array(items)) => items.push(item),
            _ => {
                self.values.insert(name.to_string(), Value::Array(vec![item]));
            }
        }
    }
}

/// Evaluate raw arguments against the table, writing into `bindings`.
///
/// Stops at the first unknown option. Bindings set by earlier tokens are kept.
pub fn evaluate(
    table: &OptionTable,
    bindings: &mut Bindings,
    args: &[String],
) -> Result<(), EvalError> {
    let mut evaluator = Evaluator::new(table, bindings);
    evaluator.evaluate(args)
}

/// Internal evaluator state.
struct Evaluator<'a> {
    table: &'a OptionTable,
    bindings: &'a mut Bindings,
}

impl<'a> Evaluator<'a> {
    fn new(table: &'a OptionTable, bindings: &'a mut Bindings) -> Self {
        Self { table, bindings }
    }

    fn evaluate(&mut self, args: &[String]) -> Result<(), EvalError> {
        let mut args_iter = args.iter();

        while let Some(arg) = args_iter.next() {
            if arg == "--" {
                // Everything after the separator is positional
                let rest: Vec<String> = args_iter.by_ref().cloned().collect();
                debug!(remaining = rest.len(), "separator reached");
                self.bindings.args.extend(rest);
                break;
            }

            if let Some(body) = arg.strip_prefix("--") {
                self.evaluate_long(arg, body, &mut args_iter)?;
            } else if let Some(body) = arg.strip_prefix('-') {
                self.evaluate_short(arg, body, &mut args_iter)?;
            } else {
                trace!(arg = %arg, "positional");
                self.bindings.args.push(arg.clone());
            }
        }

        Ok(())
    }

    fn evaluate_long(
        &mut self,
        arg: &str,
        body: &str,
        args_iter: &mut std::slice::Iter<String>,
    ) -> Result<(), EvalError> {
        let table = self.table;
        let (name, inline_value) = split_value(body);

        if let Some(spec) = table.by_token(name) {
            return self.apply(arg, spec, inline_value, args_iter);
        }

        if inline_value.is_none() {
            if let Some(spec) = table.negated_flag(name) {
                trace!(arg = %arg, name = %spec.name, "negated flag");
                self.bindings.set(spec.name.clone(), Value::Flag(false));
                return Ok(());
            }
        }

        Err(unknown_option(arg))
    }

    fn evaluate_short(
        &mut self,
        arg: &str,
        body: &str,
        args_iter: &mut std::slice::Iter<String>,
    ) -> Result<(), EvalError> {
        let table = self.table;
        let (alias, inline_value) = split_value(body);

        let mut chars = alias.chars();
        let spec = match (chars.next(), chars.next()) {
            (Some(c), None) => table.by_short(c),
            _ => None,
        }
        .ok_or_else(|| unknown_option(arg))?;

        self.apply(arg, spec, inline_value, args_iter)
    }

    fn apply(
        &mut self,
        arg: &str,
        spec: &OptionSpec,
        inline_value: Option<&str>,
        args_iter: &mut std::slice::Iter<String>,
    ) -> Result<(), EvalError> {
        match &spec.kind {
            OptionKind::Flag => {
                if inline_value.is_some() {
                    // flags never take a value
                    return Err(unknown_option(arg));
                }
                trace!(arg = %arg, name = %spec.name, "flag");
                self.bindings.set(spec.name.clone(), Value::Flag(true));
            }
            OptionKind::Scalar => {
                let value = take_value(inline_value, args_iter);
                trace!(arg = %arg, name = %spec.name, value = %value, "scalar");
                self.bindings.set(spec.name.clone(), Value::Scalar(value));
            }
            OptionKind::Array { .. } => {
                let value = take_value(inline_value, args_iter);
                trace!(arg = %arg, name = %spec.name, value = %value, "array element");
                self.bindings.push(&spec.name, value);
            }
        }
        Ok(())
    }
}

/// Split `name=value` at the first `=`.
fn split_value(body: &str) -> (&str, Option<&str>) {
    match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    }
}

/// The attached value, or else the next token. A trailing option without a
/// following token receives the empty string.
fn take_value(inline_value: Option<&str>, args_iter: &mut std::slice::Iter<String>) -> String {
    match inline_value {
        Some(v) => v.to_string(),
        None => args_iter.next().cloned().unwrap_or_default(),
    }
}

fn unknown_option(arg: &str) -> EvalError {
    debug!(arg = %arg, "unknown option");
    EvalError::UnknownOption(arg.to_string())
}
