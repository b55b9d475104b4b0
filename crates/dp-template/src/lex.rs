//! Splits template source into text and tag segments.

use crate::error::TemplateError;

const BEGIN_TAG: &str = "<%";
const END_TAG: &str = "%>";

/// A chunk of template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'s> {
    /// Raw text copied to the output.
    Text(&'s str),
    /// `<%= code %>`
    Output { code: &'s str, line: usize },
    /// `<% code %>`
    Statement { code: &'s str, line: usize },
}

/// A lexer over template source.
///
/// Tracks the current line so every tag segment knows where it started.
/// Comments are dropped here and never reach the parser.
pub(crate) struct Lexer<'s> {
    source: &'s str,
    cursor: usize,
    line: usize,
}

impl<'s> Lexer<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Self {
            source,
            cursor: 0,
            line: 1,
        }
    }

    /// Split the whole source into segments.
    pub(crate) fn tokenize(mut self) -> Result<Vec<Segment<'s>>, TemplateError> {
        let source = self.source;
        let mut segments = Vec::new();
        let mut trim_newline = false;

        loop {
            if trim_newline {
                trim_newline = false;
                let rest = &source[self.cursor..];
                if rest.starts_with("\r\n") {
                    self.advance(2);
                } else if rest.starts_with('\n') {
                    self.advance(1);
                }
            }

            let rest = &source[self.cursor..];
            let Some(open) = rest.find(BEGIN_TAG) else {
                if !rest.is_empty() {
                    segments.push(Segment::Text(rest));
                }
                return Ok(segments);
            };

            if open > 0 {
                segments.push(Segment::Text(&rest[..open]));
            }
            self.advance(open + BEGIN_TAG.len());
            let line = self.line;

            let rest = &source[self.cursor..];
            if rest.starts_with('%') {
                segments.push(Segment::Text(BEGIN_TAG));
                self.advance(1);
                continue;
            }

            let Some(close) = rest.find(END_TAG) else {
                return Err(TemplateError::syntax(line, "unclosed tag, expected `%>`"));
            };
            let inner = &rest[..close];
            self.advance(close + END_TAG.len());

            let inner = match inner.strip_suffix('-') {
                Some(stripped) => {
                    trim_newline = true;
                    stripped
                }
                None => inner,
            };

            if inner.starts_with('#') {
                continue;
            }
            if let Some(code) = inner.strip_prefix('=') {
                segments.push(Segment::Output { code, line });
            } else {
                let code = inner.strip_prefix('-').unwrap_or(inner);
                segments.push(Segment::Statement { code, line });
            }
        }
    }

    fn advance(&mut self, len: usize) {
        let consumed = &self.source[self.cursor..self.cursor + len];
        self.line += consumed.bytes().filter(|&b| b == b'\n').count();
        self.cursor += len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> Vec<Segment<'_>> {
        Lexer::new(source).tokenize().unwrap()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(lex("# Title\n"), vec![Segment::Text("# Title\n")]);
    }

    #[test]
    fn test_empty_source() {
        assert!(lex("").is_empty());
    }

    #[test]
    fn test_output_and_statement() {
        assert_eq!(
            lex("a<%= toc %>b<% end %>"),
            vec![
                Segment::Text("a"),
                Segment::Output {
                    code: " toc ",
                    line: 1
                },
                Segment::Text("b"),
                Segment::Statement {
                    code: " end ",
                    line: 1
                },
            ]
        );
    }

    #[test]
    fn test_comment_dropped() {
        assert_eq!(
            lex("a<%# ignored %>b"),
            vec![Segment::Text("a"), Segment::Text("b")]
        );
    }

    #[test]
    fn test_literal_open_tag() {
        assert_eq!(
            lex("use <%% here"),
            vec![
                Segment::Text("use "),
                Segment::Text("<%"),
                Segment::Text(" here")
            ]
        );
    }

    #[test]
    fn test_trim_newline() {
        assert_eq!(
            lex("<% if x -%>\nbody\n"),
            vec![
                Segment::Statement {
                    code: " if x ",
                    line: 1
                },
                Segment::Text("body\n"),
            ]
        );
    }

    #[test]
    fn test_line_numbers() {
        let segments = lex("one\ntwo\n<%= a %>\n\n<%= b\n %>\n<%= c %>");
        let lines: Vec<usize> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Output { line, .. } => Some(*line),
                _ => None,
            })
            .collect();
        assert_eq!(lines, vec![3, 5, 7]);
    }

    #[test]
    fn test_unclosed_tag() {
        let err = Lexer::new("ok\n<%= toc").tokenize().unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.to_string().contains("unclosed tag"));
    }
}
