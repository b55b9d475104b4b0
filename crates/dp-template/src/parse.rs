//! Builds a node tree from lexed segments.

use crate::error::TemplateError;
use crate::expr::{Expr, is_ident, parse_expr};
use crate::lex::{Lexer, Segment};

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node<'s> {
    Text(&'s str),
    /// `<%= expr %>`
    Output { expr: Expr, line: usize },
    /// `<% expr %>`, evaluated for its effect and discarded.
    Eval { expr: Expr, line: usize },
    If {
        branches: Vec<Branch<'s>>,
        otherwise: Vec<Node<'s>>,
    },
    For {
        var: String,
        iterable: Expr,
        body: Vec<Node<'s>>,
        line: usize,
    },
}

/// One `if` or `elsif` arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Branch<'s> {
    pub(crate) cond: Expr,
    pub(crate) line: usize,
    pub(crate) body: Vec<Node<'s>>,
}

/// A block that has been opened but not yet closed with `end`.
enum OpenBlock {
    If {
        done: Vec<(Expr, usize)>,
        /// Condition of the arm being collected; `None` once inside `else`.
        current: Option<(Expr, usize)>,
        line: usize,
    },
    For {
        var: String,
        iterable: Expr,
        line: usize,
    },
}

impl OpenBlock {
    fn keyword(&self) -> &'static str {
        match self {
            Self::If { .. } => "if",
            Self::For { .. } => "for",
        }
    }

    fn line(&self) -> usize {
        match self {
            Self::If { line, .. } | Self::For { line, .. } => *line,
        }
    }
}

/// Parse template source into a node tree.
///
/// Works with two stacks: open blocks, and the node lists being collected for
/// each of them. The bottom node list is the template itself.
pub(crate) fn parse_template(source: &str) -> Result<Vec<Node<'_>>, TemplateError> {
    let segments = Lexer::new(source).tokenize()?;

    let mut blocks: Vec<OpenBlock> = Vec::new();
    let mut scopes: Vec<Vec<Node<'_>>> = vec![Vec::new()];
    // Bodies of finished `if`/`elsif` arms, parallel to `OpenBlock::If::done`.
    let mut arm_bodies: Vec<Vec<Vec<Node<'_>>>> = Vec::new();

    for segment in segments {
        match segment {
            Segment::Text(text) => push(&mut scopes, Node::Text(text)),
            Segment::Output { code, line } => {
                let expr = parse_expr(code, line)?;
                push(&mut scopes, Node::Output { expr, line });
            }
            Segment::Statement { code, line } => {
                let code = code.trim();
                let (keyword, rest) = code
                    .split_once(char::is_whitespace)
                    .map_or((code, ""), |(k, r)| (k, r.trim()));

                match keyword {
                    "" => {}
                    "if" => {
                        blocks.push(OpenBlock::If {
                            done: Vec::new(),
                            current: Some((parse_expr(rest, line)?, line)),
                            line,
                        });
                        arm_bodies.push(Vec::new());
                        scopes.push(Vec::new());
                    }
                    "elsif" => {
                        let Some(OpenBlock::If { done, current, .. }) = blocks.last_mut() else {
                            return Err(TemplateError::syntax(line, "`elsif` without `if`"));
                        };
                        let Some(cond) = current.take() else {
                            return Err(TemplateError::syntax(line, "`elsif` after `else`"));
                        };
                        done.push(cond);
                        *current = Some((parse_expr(rest, line)?, line));
                        close_arm(&mut scopes, &mut arm_bodies);
                    }
                    "else" => {
                        expect_bare(keyword, rest, line)?;
                        let Some(OpenBlock::If { done, current, .. }) = blocks.last_mut() else {
                            return Err(TemplateError::syntax(line, "`else` without `if`"));
                        };
                        let Some(cond) = current.take() else {
                            return Err(TemplateError::syntax(line, "duplicate `else`"));
                        };
                        done.push(cond);
                        close_arm(&mut scopes, &mut arm_bodies);
                    }
                    "end" => {
                        expect_bare(keyword, rest, line)?;
                        let Some(block) = blocks.pop() else {
                            return Err(TemplateError::syntax(line, "unexpected `end`"));
                        };
                        let body = scopes.pop().unwrap_or_default();
                        let node = match block {
                            OpenBlock::If { done, current, .. } => {
                                let mut bodies = arm_bodies.pop().unwrap_or_default();
                                let mut conds = done;
                                let otherwise = match current {
                                    Some(cond) => {
                                        conds.push(cond);
                                        bodies.push(body);
                                        Vec::new()
                                    }
                                    None => body,
                                };
                                let branches = conds
                                    .into_iter()
                                    .zip(bodies)
                                    .map(|((cond, line), body)| Branch { cond, line, body })
                                    .collect();
                                Node::If {
                                    branches,
                                    otherwise,
                                }
                            }
                            OpenBlock::For {
                                var,
                                iterable,
                                line,
                            } => Node::For {
                                var,
                                iterable,
                                body,
                                line,
                            },
                        };
                        push(&mut scopes, node);
                    }
                    "for" => {
                        let (var, iterable) = parse_for_header(rest, line)?;
                        blocks.push(OpenBlock::For {
                            var,
                            iterable,
                            line,
                        });
                        scopes.push(Vec::new());
                    }
                    _ => {
                        let expr = parse_expr(code, line)?;
                        push(&mut scopes, Node::Eval { expr, line });
                    }
                }
            }
        }
    }

    if let Some(block) = blocks.last() {
        return Err(TemplateError::syntax(
            block.line(),
            format!("`{}` is missing its `end`", block.keyword()),
        ));
    }

    Ok(scopes.pop().unwrap_or_default())
}

fn push<'s>(scopes: &mut [Vec<Node<'s>>], node: Node<'s>) {
    if let Some(scope) = scopes.last_mut() {
        scope.push(node);
    }
}

/// Move the node list of the arm just finished into the arm bodies of the
/// innermost `if`, and start collecting the next arm.
fn close_arm<'s>(scopes: &mut Vec<Vec<Node<'s>>>, arm_bodies: &mut [Vec<Vec<Node<'s>>>]) {
    let body = scopes.pop().unwrap_or_default();
    if let Some(bodies) = arm_bodies.last_mut() {
        bodies.push(body);
    }
    scopes.push(Vec::new());
}

fn expect_bare(keyword: &str, rest: &str, line: usize) -> Result<(), TemplateError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(TemplateError::syntax(
            line,
            format!("unexpected `{rest}` after `{keyword}`"),
        ))
    }
}

/// Parse `name in expr`.
fn parse_for_header(rest: &str, line: usize) -> Result<(String, Expr), TemplateError> {
    let malformed = || TemplateError::syntax(line, "expected `for <name> in <expression>`");

    let (var, rest) = rest.split_once(char::is_whitespace).ok_or_else(malformed)?;
    let iterable = rest.trim_start().strip_prefix("in").ok_or_else(malformed)?;
    if !is_ident(var) || !iterable.starts_with(char::is_whitespace) {
        return Err(malformed());
    }
    Ok((var.to_owned(), parse_expr(iterable, line)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn name(n: &str) -> Expr {
        Expr::Name(n.to_owned())
    }

    #[test]
    fn test_text_and_output() {
        let nodes = parse_template("Hi <%= who %>!").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::Text("Hi "),
                Node::Output {
                    expr: name("who"),
                    line: 1
                },
                Node::Text("!"),
            ]
        );
    }

    #[test]
    fn test_if_elsif_else() {
        let nodes = parse_template("<% if a %>A<% elsif b %>B<% else %>C<% end %>").unwrap();
        assert_eq!(
            nodes,
            vec![Node::If {
                branches: vec![
                    Branch {
                        cond: name("a"),
                        line: 1,
                        body: vec![Node::Text("A")]
                    },
                    Branch {
                        cond: name("b"),
                        line: 1,
                        body: vec![Node::Text("B")]
                    },
                ],
                otherwise: vec![Node::Text("C")],
            }]
        );
    }

    #[test]
    fn test_if_without_else() {
        let nodes = parse_template("<% if a %>A<% end %>").unwrap();
        assert_eq!(
            nodes,
            vec![Node::If {
                branches: vec![Branch {
                    cond: name("a"),
                    line: 1,
                    body: vec![Node::Text("A")]
                }],
                otherwise: Vec::new(),
            }]
        );
    }

    #[test]
    fn test_for_loop() {
        let nodes = parse_template("<% for e in [\"x\"] %><%= e %><% end %>").unwrap();
        assert_eq!(
            nodes,
            vec![Node::For {
                var: "e".to_owned(),
                iterable: Expr::List(vec![Expr::Literal(Value::from("x"))]),
                body: vec![Node::Output {
                    expr: name("e"),
                    line: 1
                }],
                line: 1,
            }]
        );
    }

    #[test]
    fn test_nested_blocks() {
        let source = "<% for e in events %>\n<% if e %>yes<% end %>\n<% end %>";
        let nodes = parse_template(source).unwrap();
        let [Node::For { body, .. }] = nodes.as_slice() else {
            panic!("expected a single for node, got {nodes:?}");
        };
        assert!(matches!(body[1], Node::If { .. }));
    }

    #[test]
    fn test_expression_statement() {
        let nodes = parse_template("<% t(\"x\") %>").unwrap();
        assert!(matches!(nodes.as_slice(), [Node::Eval { line: 1, .. }]));
    }

    #[test]
    fn test_empty_statement() {
        assert!(parse_template("<% %>").unwrap().is_empty());
    }

    #[test]
    fn test_unexpected_end() {
        let err = parse_template("text\n<% end %>").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.to_string().contains("unexpected `end`"));
    }

    #[test]
    fn test_missing_end() {
        let err = parse_template("<% if a %>\nA\n").unwrap_err();
        assert_eq!(err.line(), 1);
        assert!(err.to_string().contains("`if` is missing its `end`"));
    }

    #[test]
    fn test_else_without_if() {
        let err = parse_template("<% for x in y %><% else %><% end %>").unwrap_err();
        assert!(err.to_string().contains("`else` without `if`"));
    }

    #[test]
    fn test_elsif_after_else() {
        let err = parse_template("<% if a %><% else %><% elsif b %><% end %>").unwrap_err();
        assert!(err.to_string().contains("`elsif` after `else`"));
    }

    #[test]
    fn test_malformed_for() {
        for source in [
            "<% for %><% end %>",
            "<% for x %><% end %>",
            "<% for x of y %><% end %>",
            "<% for 1x in y %><% end %>",
            "<% for x inside %><% end %>",
        ] {
            let err = parse_template(source).unwrap_err();
            assert!(
                err.to_string().contains("expected `for <name> in <expression>`"),
                "{source}: {err}"
            );
        }
    }
}
