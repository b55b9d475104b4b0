//! Embedded-expression templates evaluated against an explicit helper table.
//!
//! Templates are plain text with ERB-style tags:
//!
//! | Tag            | Meaning                                          |
//! |----------------|--------------------------------------------------|
//! | `<%= expr %>`  | Insert the value of `expr` (not escaped)         |
//! | `<% stmt %>`   | `if`, `elsif`, `else`, `for x in expr`, `end`, or an expression whose value is discarded |
//! | `<%# note %>`  | Comment                                          |
//! | `<%%`          | Literal `<%`                                     |
//! | `-%>`          | Close a tag and drop the newline that follows it |
//!
//! Expressions are literals (`"text"`, `'text'`, `42`, `true`, `false`,
//! `nil`, `[a, b]`), variables bound by `for` loops or locals, and helper
//! calls. Helpers take positional arguments followed by keyword options, with
//! or without parentheses: `image("a.png", size: "10x20")` and
//! `image "a.png", size: "10x20"` are the same call.
//!
//! Double-quoted strings do not interpolate. `#{` inside one is a syntax error;
//! write `\#{` for the literal text.
//!
//! Templates can only reach behaviour through the [`HelperTable`] they are
//! evaluated with. Referencing a name that is neither a bound variable nor a
//! registered helper fails with [`TemplateError::Undefined`].
//!
//! # Example
//!
//! ```
//! use dp_template::{Evaluator, HelperTable, Value};
//!
//! let helpers = HelperTable::new().with("shout", |args| {
//!     Ok(Value::from(args.str_arg(0)?.to_uppercase()))
//! });
//!
//! let output = Evaluator::new(&helpers)
//!     .evaluate("<% for w in [\"a\", \"b\"] %><%= shout(w) %><% end %>")
//!     .unwrap();
//! assert_eq!(output, "AB");
//! ```

mod error;
mod eval;
mod expr;
mod helpers;
mod lex;
mod parse;
mod value;

pub use error::{HelperError, TemplateError};
pub use eval::Evaluator;
pub use helpers::{CallArgs, HelperFn, HelperTable};
pub use value::Value;
