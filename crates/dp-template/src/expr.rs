//! Expression tokenizer and parser.

use std::fmt;

use crate::error::TemplateError;
use crate::value::Value;

/// A parsed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expr {
    /// Literal value.
    Literal(Value),
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// Bare name: a bound variable or a helper called without arguments.
    Name(String),
    /// Helper call with arguments or explicit parentheses.
    Call {
        name: String,
        args: Vec<Expr>,
        options: Vec<(String, Expr)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    /// `name:` keyword option key
    Key(String),
    /// `:name` symbol, used as `:name => value`
    Symbol(String),
    Str(String),
    Int(i64),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    FatArrow,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "`{name}`"),
            Self::Key(name) => write!(f, "`{name}:`"),
            Self::Symbol(name) => write!(f, "`:{name}`"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Int(n) => write!(f, "`{n}`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::LBracket => f.write_str("`[`"),
            Self::RBracket => f.write_str("`]`"),
            Self::Comma => f.write_str("`,`"),
            Self::FatArrow => f.write_str("`=>`"),
        }
    }
}

/// Parse the code of a tag into an expression.
///
/// At the top level a helper may be called without parentheses:
/// `image "a.png", width: 10`.
pub(crate) fn parse_expr(code: &str, line: usize) -> Result<Expr, TemplateError> {
    let tokens = tokenize(code, line)?;
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        line,
    };
    let expr = parser.parse_top()?;
    match parser.peek() {
        Some(token) => Err(TemplateError::syntax(
            line,
            format!("unexpected {token} after expression"),
        )),
        None => Ok(expr),
    }
}

/// Whether `name` is a valid identifier (variable or helper name).
pub(crate) fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn tokenize(code: &str, line: usize) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut chars = code.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '=' if chars.next_if(|&(_, c)| c == '>').is_some() => Token::FatArrow,
            '"' | '\'' => Token::Str(read_string(&mut chars, c, line)?),
            ':' if chars.peek().is_some_and(|&(_, c)| is_ident_start(c)) => {
                let name = read_while(code, &mut chars, start + 1, is_ident_char);
                Token::Symbol(name.to_owned())
            }
            c if c.is_ascii_digit()
                || (c == '-' && chars.peek().is_some_and(|&(_, d)| d.is_ascii_digit())) =>
            {
                let digits = read_while(code, &mut chars, start, |c| c.is_ascii_digit());
                let n = digits.parse().map_err(|_| {
                    TemplateError::syntax(line, format!("integer `{digits}` is out of range"))
                })?;
                Token::Int(n)
            }
            c if is_ident_start(c) => {
                let mut name = read_while(code, &mut chars, start, is_ident_char).to_owned();
                if let Some((_, suffix)) = chars.next_if(|&(_, c)| c == '?' || c == '!') {
                    name.push(suffix);
                }
                let is_key = chars.peek().is_some_and(|&(_, c)| c == ':')
                    && !code[start + name.len()..].starts_with("::");
                if is_key {
                    chars.next();
                    Token::Key(name)
                } else {
                    Token::Ident(name)
                }
            }
            other => {
                return Err(TemplateError::syntax(
                    line,
                    format!("unexpected character `{other}`"),
                ));
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Consume characters matching `pred` and return the slice from `start`.
fn read_while<'c>(
    code: &'c str,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    start: usize,
    pred: impl Fn(char) -> bool,
) -> &'c str {
    let mut end = code.len();
    while let Some(&(i, c)) = chars.peek() {
        if !pred(c) {
            end = i;
            break;
        }
        chars.next();
    }
    &code[start..end]
}

fn read_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
    line: usize,
) -> Result<String, TemplateError> {
    let mut value = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            c if c == quote => return Ok(value),
            '#' if quote == '"' && matches!(chars.peek(), Some((_, '{'))) => {
                return Err(TemplateError::syntax(
                    line,
                    "string interpolation `#{...}` is not supported",
                ));
            }
            '\\' => {
                let Some((_, escaped)) = chars.next() else { break };
                match (quote, escaped) {
                    ('"', 'n') => value.push('\n'),
                    ('"', 't') => value.push('\t'),
                    ('"', '#') => value.push('#'),
                    (_, c) if c == quote || c == '\\' => value.push(c),
                    (_, c) => {
                        value.push('\\');
                        value.push(c);
                    }
                }
            }
            c => value.push(c),
        }
    }
    Err(TemplateError::syntax(line, "unterminated string literal"))
}

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn error(&self, message: impl Into<String>) -> TemplateError {
        TemplateError::syntax(self.line, message)
    }

    fn parse_top(&mut self) -> Result<Expr, TemplateError> {
        if let Some(Token::Ident(name)) = self.peek()
            && keyword_literal(name).is_none()
            && matches!(
                self.tokens.get(self.pos + 1),
                Some(
                    Token::Str(_)
                        | Token::Int(_)
                        | Token::Ident(_)
                        | Token::Key(_)
                        | Token::Symbol(_)
                        | Token::LBracket
                )
            )
        {
            let name = name.clone();
            self.pos += 1;
            let (args, options) = self.parse_args(None)?;
            return Ok(Expr::Call {
                name,
                args,
                options,
            });
        }
        self.parse_expr()
    }

    fn parse_expr(&mut self) -> Result<Expr, TemplateError> {
        match self.next() {
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Token::Int(n)) => Ok(Expr::Literal(Value::Int(n))),
            Some(Token::Ident(name)) => {
                if let Some(literal) = keyword_literal(&name) {
                    return Ok(Expr::Literal(literal));
                }
                if self.peek() != Some(&Token::LParen) {
                    return Ok(Expr::Name(name));
                }
                self.pos += 1;
                let (args, options) = self.parse_args(Some(&Token::RParen))?;
                Ok(Expr::Call {
                    name,
                    args,
                    options,
                })
            }
            Some(Token::LBracket) => self.parse_list(),
            Some(token) => Err(self.error(format!("unexpected {token}"))),
            None => Err(self.error("expected an expression")),
        }
    }

    fn parse_list(&mut self) -> Result<Expr, TemplateError> {
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(&Token::RBracket) {
                self.pos += 1;
                return Ok(Expr::List(items));
            }
            items.push(self.parse_expr()?);
            match self.next() {
                Some(Token::Comma) => {}
                Some(Token::RBracket) => return Ok(Expr::List(items)),
                Some(token) => return Err(self.error(format!("expected `,` or `]`, got {token}"))),
                None => return Err(self.error("unclosed list, expected `]`")),
            }
        }
    }

    /// Parse call arguments up to `close`, or to the end of input when `close`
    /// is `None`.
    #[allow(clippy::type_complexity)]
    fn parse_args(
        &mut self,
        close: Option<&Token>,
    ) -> Result<(Vec<Expr>, Vec<(String, Expr)>), TemplateError> {
        let mut args = Vec::new();
        let mut options: Vec<(String, Expr)> = Vec::new();

        loop {
            match (self.peek(), close) {
                (None, None) => break,
                (None, Some(close)) => return Err(self.error(format!("expected {close}"))),
                (Some(token), Some(close)) if token == close => {
                    self.pos += 1;
                    break;
                }
                _ => {}
            }

            match self.peek().cloned() {
                Some(Token::Key(key)) => {
                    self.pos += 1;
                    options.push((key, self.parse_expr()?));
                }
                Some(Token::Symbol(key)) => {
                    self.pos += 1;
                    if self.next() != Some(Token::FatArrow) {
                        return Err(self.error(format!("expected `=>` after `:{key}`")));
                    }
                    options.push((key, self.parse_expr()?));
                }
                _ if !options.is_empty() => {
                    return Err(self.error("positional argument after keyword options"));
                }
                _ => args.push(self.parse_expr()?),
            }

            match self.peek() {
                Some(Token::Comma) => self.pos += 1,
                None if close.is_none() => break,
                Some(token) if Some(token) == close => {}
                Some(token) => return Err(self.error(format!("expected `,`, got {token}"))),
                None => {}
            }
        }

        Ok((args, options))
    }
}

fn keyword_literal(name: &str) -> Option<Value> {
    match name {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "nil" => Some(Value::Nil),
        _ => None,
    }
}
