//! Template evaluation.

use std::fmt::Write;

use crate::error::TemplateError;
use crate::expr::Expr;
use crate::helpers::{CallArgs, HelperTable};
use crate::parse::{Node, parse_template};
use crate::value::Value;

/// Evaluates templates against a [`HelperTable`].
///
/// The evaluator keeps no state between calls; variables bound by `for`
/// loops and locals live only for one evaluation.
///
/// # Example
///
/// ```
/// use dp_template::{Evaluator, HelperTable, Value};
///
/// let helpers = HelperTable::new().with("greeting", |_| Ok(Value::from("Hello")));
/// let evaluator = Evaluator::new(&helpers);
///
/// assert_eq!(evaluator.evaluate("<%= greeting %>, world").unwrap(), "Hello, world");
/// assert!(evaluator.evaluate("<%= farewell %>").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'t, 'a> {
    helpers: &'t HelperTable<'a>,
}

impl<'t, 'a> Evaluator<'t, 'a> {
    /// Create an evaluator over a helper table.
    #[must_use]
    pub fn new(helpers: &'t HelperTable<'a>) -> Self {
        Self { helpers }
    }

    /// Evaluate template source to text.
    ///
    /// The whole template is parsed before any helper runs, so syntax errors
    /// never leave helpers half-applied.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] on syntax errors, undefined names and
    /// failing helpers.
    pub fn evaluate(&self, source: &str) -> Result<String, TemplateError> {
        self.evaluate_with_locals(source, Vec::new())
    }

    /// Evaluate template source with pre-bound variables.
    ///
    /// # Errors
    ///
    /// Same as [`Evaluator::evaluate`].
    pub fn evaluate_with_locals(
        &self,
        source: &str,
        locals: Vec<(String, Value)>,
    ) -> Result<String, TemplateError> {
        let nodes = parse_template(source)?;
        let mut scope = Scope { vars: locals };
        let mut out = String::with_capacity(source.len());
        self.render_nodes(&nodes, &mut scope, &mut out)?;
        Ok(out)
    }

    fn render_nodes(
        &self,
        nodes: &[Node<'_>],
        scope: &mut Scope,
        out: &mut String,
    ) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output { expr, line } => {
                    let value = self.eval_expr(expr, scope, *line)?;
                    write!(out, "{value}").unwrap();
                }
                Node::Eval { expr, line } => {
                    self.eval_expr(expr, scope, *line)?;
                }
                Node::If {
                    branches,
                    otherwise,
                } => {
                    let mut taken = None;
                    for branch in branches {
                        if self.eval_expr(&branch.cond, scope, branch.line)?.is_truthy() {
                            taken = Some(&branch.body);
                            break;
                        }
                    }
                    self.render_nodes(taken.unwrap_or(otherwise), scope, out)?;
                }
                Node::For {
                    var,
                    iterable,
                    body,
                    line,
                } => {
                    let items = match self.eval_expr(iterable, scope, *line)? {
                        Value::List(items) => items,
                        other => {
                            return Err(TemplateError::Type {
                                line: *line,
                                message: format!("cannot iterate over {}", other.kind()),
                            });
                        }
                    };
                    for item in items {
                        scope.vars.push((var.clone(), item));
                        let result = self.render_nodes(body, scope, out);
                        scope.vars.pop();
                        result?;
                    }
                }
            }
        }
        Ok(())
    }

    fn eval_expr(&self, expr: &Expr, scope: &Scope, line: usize) -> Result<Value, TemplateError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::List(items) => items
                .iter()
                .map(|item| self.eval_expr(item, scope, line))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::Name(name) => match scope.lookup(name) {
                Some(value) => Ok(value.clone()),
                None => self.call(name, CallArgs::new(), line),
            },
            Expr::Call {
                name,
                args,
                options,
            } => {
                let mut call_args = CallArgs::new();
                for arg in args {
                    call_args.push_positional(self.eval_expr(arg, scope, line)?);
                }
                for (key, value) in options {
                    call_args.set_option(key.clone(), self.eval_expr(value, scope, line)?);
                }
                self.call(name, call_args, line)
            }
        }
    }

    fn call(&self, name: &str, args: CallArgs, line: usize) -> Result<Value, TemplateError> {
        let Some(helper) = self.helpers.get(name) else {
            return Err(TemplateError::Undefined {
                line,
                name: name.to_owned(),
            });
        };
        tracing::trace!(helper = name, line, "Calling template helper");
        helper(&args).map_err(|source| TemplateError::Helper {
            line,
            name: name.to_owned(),
            source,
        })
    }
}

/// Variables visible to the expression being evaluated. Later entries shadow
/// earlier ones.
struct Scope {
    vars: Vec<(String, Value)>,
}

impl Scope {
    fn lookup(&self, name: &str) -> Option<&Value> {
        self.vars
            .iter()
            .rev()
            .find_map(|(k, v)| (k == name).then_some(v))
    }
}
