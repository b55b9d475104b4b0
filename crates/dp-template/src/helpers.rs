//! Helper functions callable from templates.

use std::collections::HashMap;
use std::fmt;

use crate::error::HelperError;
use crate::value::Value;

/// Signature of a helper function.
pub type HelperFn<'a> = dyn Fn(&CallArgs) -> Result<Value, HelperError> + 'a;

/// Arguments of a helper call: positional values, then keyword options in
/// call order.
///
/// # Example
///
/// ```
/// use dp_template::{CallArgs, Value};
///
/// let args = CallArgs::new()
///     .with_positional("diagram.png")
///     .with_option("size", "640x480");
///
/// assert_eq!(args.str_arg(0).unwrap(), "diagram.png");
/// assert_eq!(args.option("size"), Some(&Value::from("640x480")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallArgs {
    positional: Vec<Value>,
    options: Vec<(String, Value)>,
}

impl CallArgs {
    /// Create empty arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    #[must_use]
    pub fn with_positional(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword option. A repeated key replaces the earlier value.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_option(key.into(), value.into());
        self
    }

    pub(crate) fn push_positional(&mut self, value: Value) {
        self.positional.push(value);
    }

    pub(crate) fn set_option(&mut self, key: String, value: Value) {
        match self.options.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.options.push((key, value)),
        }
    }

    /// Positional arguments.
    #[must_use]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Positional argument at `index`, if passed.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Required positional string argument.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::MissingArgument`] when absent and
    /// [`HelperError::InvalidArgument`] for other value kinds.
    pub fn str_arg(&self, index: usize) -> Result<&str, HelperError> {
        match self.positional.get(index) {
            Some(Value::Str(s)) => Ok(s),
            Some(other) => Err(HelperError::InvalidArgument(format!(
                "argument {index} must be a string, got {}",
                other.kind()
            ))),
            None => Err(HelperError::MissingArgument { index }),
        }
    }

    /// Keyword options in call order.
    #[must_use]
    pub fn options(&self) -> &[(String, Value)] {
        &self.options
    }

    /// Keyword option by name.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}

/// Named helper functions available to a template.
///
/// The table is the complete surface a template can call: names that are not
/// registered here fail evaluation.
///
/// # Example
///
/// ```
/// use dp_template::{HelperTable, Value};
///
/// let helpers = HelperTable::new()
///     .with("year", |_| Ok(Value::Int(2024)));
///
/// assert!(helpers.contains("year"));
/// assert!(!helpers.contains("month"));
/// ```
#[derive(Default)]
pub struct HelperTable<'a> {
    helpers: HashMap<String, Box<HelperFn<'a>>>,
}

impl<'a> HelperTable<'a> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a helper, replacing any helper with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, helper: F)
    where
        F: Fn(&CallArgs) -> Result<Value, HelperError> + 'a,
    {
        self.helpers.insert(name.into(), Box::new(helper));
    }

    /// Register a helper (builder form).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, helper: F) -> Self
    where
        F: Fn(&CallArgs) -> Result<Value, HelperError> + 'a,
    {
        self.register(name, helper);
        self
    }

    /// Look up a helper by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&HelperFn<'a>> {
        self.helpers.get(name).map(AsRef::as_ref)
    }

    /// Whether a helper with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Registered helper names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.helpers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for HelperTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperTable")
            .field("helpers", &self.names())
            .finish()
    }
}
