//! Template evaluation errors.

/// Error returned when a template cannot be parsed or evaluated.
///
/// Every variant carries the 1-based line of the tag that failed.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Malformed tag, expression, or block structure.
    #[error("Syntax error on line {line}: {message}")]
    Syntax {
        /// Line of the offending tag.
        line: usize,
        /// What was wrong.
        message: String,
    },
    /// Name is neither a bound variable nor a registered helper.
    #[error("Undefined helper or variable `{name}` on line {line}")]
    Undefined {
        /// Line of the offending tag.
        line: usize,
        /// The unresolved name.
        name: String,
    },
    /// Value used where a different kind of value is required.
    #[error("Type error on line {line}: {message}")]
    Type {
        /// Line of the offending tag.
        line: usize,
        /// What was wrong.
        message: String,
    },
    /// A helper rejected its call.
    #[error("Helper `{name}` failed on line {line}: {source}")]
    Helper {
        /// Line of the offending tag.
        line: usize,
        /// Helper name.
        name: String,
        /// Error returned by the helper.
        #[source]
        source: HelperError,
    },
}

impl TemplateError {
    /// Line of the tag that failed.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Syntax { line, .. }
            | Self::Undefined { line, .. }
            | Self::Type { line, .. }
            | Self::Helper { line, .. } => *line,
        }
    }

    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// Error returned by a helper function.
#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    /// Required positional argument was not passed.
    #[error("missing argument {index}")]
    MissingArgument {
        /// Zero-based argument position.
        index: usize,
    },
    /// Argument has the wrong kind or an unusable value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Partial template could not be found.
    #[error("partial not found: {0}")]
    PartialNotFound(String),
    /// Partials include each other deeper than allowed.
    #[error("partials nested deeper than {0} levels")]
    PartialDepth(usize),
    /// Partial template failed to evaluate.
    #[error("in partial {path}: {source}")]
    Partial {
        /// Logical path of the partial.
        path: String,
        /// Error raised while evaluating it.
        #[source]
        source: Box<TemplateError>,
    },
}
