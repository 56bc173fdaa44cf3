//! Declare/evaluate/serialize state owned by the caller.

use crate::parser::{evaluate, Bindings, EvalError, Value};
use crate::serialize;
use crate::table::OptionTable;

/// An option table together with the bindings evaluated against it.
///
/// ```
/// use bash_opts::OptsContext;
///
/// let mut ctx = OptsContext::new();
/// ctx.declare(["--[d]ebug", "--names[]="]);
/// ctx.evaluate(["-d", "--name=a", "file"]).unwrap();
///
/// assert_eq!(ctx.bindings().flag("debug"), Some(true));
/// assert_eq!(ctx.bindings().args(), ["file"]);
/// assert_eq!(ctx.opt("names").as_deref(), Some(r#"--name="a""#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OptsContext {
    table: OptionTable,
    bindings: Bindings,
}

impl OptsContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already compiled table, with default bindings.
    pub fn with_table(table: OptionTable) -> Self {
        let bindings = Bindings::defaults(&table);
        Self { table, bindings }
    }

    /// Replace the table with one compiled from `definitions` and reset
    /// every binding to its default.
    pub fn declare<I, S>(&mut self, definitions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        *self = Self::with_table(OptionTable::compile(definitions));
    }

    /// Evaluate arguments against the current table.
    ///
    /// Bindings and positional args start over from their defaults, so one
    /// table can be evaluated against several argument lists in turn. On an
    /// unknown option the bindings set before it remain readable.
    pub fn evaluate<I, S>(&mut self, args: I) -> Result<(), EvalError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        self.bindings = Bindings::defaults(&self.table);
        evaluate(&self.table, &mut self.bindings, &args)
    }

    /// Serialize the current value of binding `name`.
    ///
    /// Returns `None` when no option of that name is declared.
    pub fn opt(&self, name: &str) -> Option<String> {
        let spec = self.table.get(name)?;
        let value = self
            .bindings
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::default_for(&spec.kind));
        Some(serialize::opt(spec, &value))
    }

    pub fn table(&self) -> &OptionTable {
        &self.table
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }
}
