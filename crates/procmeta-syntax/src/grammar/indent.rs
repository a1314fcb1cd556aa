//! Line-oriented front-end for indentation-based sources.
//!
//! Each logical line is classified (decorator, `def`, `class`, anything else)
//! and a block stack keyed on indentation nests bodies under their headers.
//! Decorators attach to the next definition at the same indentation.

use super::args::{parse_arguments, top_level};
use super::lines::{self, LogicalLine};
use super::{Grammar, SyntaxDiagnostic, SyntaxOutput};
use crate::tree::*;
use regex::Regex;
use std::sync::LazyLock;

static RE_DECORATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@\s*([A-Za-z_][A-Za-z0-9_]*(?:\s*\.\s*[A-Za-z_][A-Za-z0-9_]*)*)").unwrap()
});

static RE_FUNC_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:async\s+)?def\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap());

static RE_CLASS_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+([A-Za-z_][A-Za-z0-9_]*)\s*[(:]").unwrap());

/// The bundled [`Grammar`] implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndentGrammar;

impl Grammar for IndentGrammar {
    fn parse(&self, source: &[u8]) -> SyntaxOutput {
        let mut diagnostics = Vec::new();

        let text = match std::str::from_utf8(source) {
            Ok(text) => std::borrow::Cow::Borrowed(text),
            Err(err) => {
                let valid = &source[..err.valid_up_to()];
                let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
                let line_start = valid.iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
                let column = String::from_utf8_lossy(&valid[line_start..]).chars().count();
                diagnostics.push(SyntaxDiagnostic::new(
                    Span::new(line, column),
                    "invalid UTF-8 sequence",
                ));
                String::from_utf8_lossy(source)
            }
        };

        let lines = lines::split(&text, &mut diagnostics);
        let module = TreeBuilder::default().build(&lines, &mut diagnostics);
        SyntaxOutput {
            module,
            diagnostics,
        }
    }
}

/// Classification of one logical line.
enum LineKind {
    Decorator(Option<Decorator>),
    Definition { definition: Definition, opens_block: bool },
    Other,
}

/// An open block: a definition whose body is still being collected.
struct Frame {
    indent: usize,
    decorators: Vec<Decorator>,
    definition: Definition,
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Frame>,
    pending: Vec<Decorator>,
    pending_indent: usize,
}

impl TreeBuilder {
    fn build(mut self, lines: &[LogicalLine], diagnostics: &mut Vec<SyntaxDiagnostic>) -> Module {
        for line in lines {
            // Close every block this line is not nested in
            while self.stack.last().is_some_and(|frame| line.indent <= frame.indent) {
                self.close_block();
            }

            let kind = classify(line, diagnostics);

            if !self.pending.is_empty() {
                let attaches = matches!(kind, LineKind::Decorator(_) | LineKind::Definition { .. })
                    && line.indent == self.pending_indent;
                if !attaches {
                    self.drop_pending(diagnostics);
                }
            }

            match kind {
                LineKind::Decorator(decorator) => {
                    if self.pending.is_empty() {
                        self.pending_indent = line.indent;
                    }
                    // Malformed clauses were reported by the parser and are dropped
                    if let Some(decorator) = decorator {
                        self.pending.push(decorator);
                    }
                }
                LineKind::Definition {
                    definition,
                    opens_block,
                } => {
                    let decorators = std::mem::take(&mut self.pending);
                    if opens_block {
                        self.stack.push(Frame {
                            indent: line.indent,
                            decorators,
                            definition,
                        });
                    } else {
                        self.attach(definition.into_node(decorators));
                    }
                }
                LineKind::Other => {}
            }
        }

        self.drop_pending(diagnostics);
        while !self.stack.is_empty() {
            self.close_block();
        }
        Module { body: self.root }
    }

    fn attach(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.definition.body_mut().push(node),
            None => self.root.push(node),
        }
    }

    fn close_block(&mut self) {
        if let Some(frame) = self.stack.pop() {
            let node = frame.definition.into_node(frame.decorators);
            self.attach(node);
        }
    }

    fn drop_pending(&mut self, diagnostics: &mut Vec<SyntaxDiagnostic>) {
        if let Some(first) = self.pending.first() {
            diagnostics.push(SyntaxDiagnostic::new(
                first.span,
                "decorator must be followed by a function or class definition",
            ));
        }
        self.pending.clear();
    }
}

fn classify(line: &LogicalLine, diagnostics: &mut Vec<SyntaxDiagnostic>) -> LineKind {
    let text = line.text.as_str();

    if text.starts_with('@') {
        return LineKind::Decorator(parse_decorator(line, diagnostics));
    }

    if let Some(caps) = RE_FUNC_DEF.captures(text) {
        return LineKind::Definition {
            definition: Definition::Function(FunctionDef {
                name: caps[1].to_string(),
                span: line.start(),
                body: Vec::new(),
            }),
            opens_block: text.ends_with(':'),
        };
    }

    if let Some(caps) = RE_CLASS_DEF.captures(text) {
        return LineKind::Definition {
            definition: Definition::Class(ClassDef {
                name: caps[1].to_string(),
                span: line.start(),
                body: Vec::new(),
            }),
            opens_block: text.ends_with(':'),
        };
    }

    LineKind::Other
}

/// Parse `@dotted.name` or `@dotted.name(args)`.
fn parse_decorator(line: &LogicalLine, diagnostics: &mut Vec<SyntaxDiagnostic>) -> Option<Decorator> {
    let text = line.text.as_str();
    let span = line.start();

    let Some(m) = RE_DECORATOR.captures(text) else {
        diagnostics.push(SyntaxDiagnostic::new(span, "invalid decorator name"));
        return None;
    };
    let name = DottedName::parse(&m[1]);
    let head_end = m.get(0).map_or(text.len(), |whole| whole.end());

    let rest = &text[head_end..];
    let rest_offset = head_end + (rest.len() - rest.trim_start().len());
    let rest = rest.trim_start();

    if rest.is_empty() {
        return Some(Decorator {
            name,
            arguments: None,
            span,
        });
    }

    if !rest.starts_with('(') {
        diagnostics.push(SyntaxDiagnostic::new(
            line.span_at(rest_offset),
            "expected '(' or end of line after decorator name",
        ));
        return None;
    }

    // The matching ')' must close the line. Unclosed calls were already
    // reported by the line scanner.
    let close = top_level(rest)
        .find(|&(_, ch, depth)| depth == 0 && matches!(ch, ')' | ']' | '}'))
        .map(|(i, _, _)| i)?;
    let trailing = &rest[close + 1..];
    if !trailing.is_empty() {
        let pad = trailing.len() - trailing.trim_start().len();
        diagnostics.push(SyntaxDiagnostic::new(
            line.span_at(rest_offset + close + 1 + pad),
            "unexpected tokens after decorator call",
        ));
        return None;
    }

    let arguments = parse_arguments(line, rest_offset + 1, rest_offset + close, diagnostics);
    Some(Decorator {
        name,
        arguments: Some(arguments),
        span,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SyntaxOutput {
        IndentGrammar.parse(source.as_bytes())
    }

    fn messages(output: &SyntaxOutput) -> Vec<String> {
        output.diagnostics.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn plain_functions_at_top_level() {
        let out = parse("def a():\n    pass\n\ndef b(): return 1\n");
        assert_eq!(out.module.body.len(), 2);
        assert!(matches!(&out.module.body[0], Node::Function(f) if f.name == "a"));
        assert!(matches!(&out.module.body[1], Node::Function(f) if f.name == "b"));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn decorators_attach_in_source_order() {
        let out = parse(
            "@data_processor(type='OPERATION')\n@parameter('a', 'int', 'true', '1')\ndef run(x):\n    return x\n",
        );
        let Node::Decorated(decorated) = &out.module.body[0] else {
            panic!("expected decorated node, got {:?}", out.module.body[0]);
        };
        let names: Vec<String> = decorated.decorators.iter().map(|d| d.name.to_string()).collect();
        assert_eq!(names, vec!["data_processor", "parameter"]);
        assert_eq!(decorated.definition.name(), "run");
        assert_eq!(decorated.decorators[1].argument_list().len(), 4);
    }

    #[test]
    fn bare_and_dotted_decorators() {
        let out = parse("@sdk.annotations.metric\n@staticmethod\ndef f(): pass\n");
        let Node::Decorated(decorated) = &out.module.body[0] else {
            panic!("expected decorated node");
        };
        assert_eq!(decorated.decorators[0].name.last(), "metric");
        assert!(decorated.decorators[0].arguments.is_none());
        assert!(decorated.decorators[1].arguments.is_none());
    }

    #[test]
    fn nested_bodies() {
        let out = parse(
            "class Service:\n    @parameter('a', 'int', 'true', '1')\n    def method(self):\n        def inner():\n            pass\n        return inner\n\ndef after():\n    pass\n",
        );
        assert_eq!(out.module.body.len(), 2);
        let Node::Class(class) = &out.module.body[0] else {
            panic!("expected class");
        };
        assert_eq!(class.name, "Service");
        let Node::Decorated(method) = &class.body[0] else {
            panic!("expected decorated method");
        };
        assert_eq!(method.definition.name(), "method");
        assert!(matches!(&method.definition.body()[0], Node::Function(f) if f.name == "inner"));
        assert!(matches!(&out.module.body[1], Node::Function(f) if f.name == "after"));
    }

    #[test]
    fn multi_line_decorator_call() {
        let out = parse(
            "@parameter(\n    name='threshold',\n    type='float',\n    required='false',\n    defaultValue='0.5',\n)\ndef f():\n    pass\n",
        );
        let Node::Decorated(decorated) = &out.module.body[0] else {
            panic!("expected decorated node");
        };
        let args = decorated.decorators[0].argument_list();
        assert_eq!(args.len(), 4);
        assert_eq!(args[0].values, vec!["name", "'threshold'"]);
        assert_eq!(args[0].span, Span::new(2, 4));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn decorator_without_definition() {
        let out = parse("@parameter('a')\nx = 1\n");
        assert!(out.module.body.is_empty());
        assert_eq!(
            messages(&out),
            vec!["Error in line 1, column 0: decorator must be followed by a function or class definition"]
        );
    }

    #[test]
    fn trailing_tokens_after_call() {
        let out = parse("@parameter('a') + 1\ndef f(): pass\n");
        assert_eq!(
            messages(&out),
            vec!["Error in line 1, column 16: unexpected tokens after decorator call"]
        );
        // The only clause was malformed, so the definition is undecorated
        assert!(matches!(&out.module.body[0], Node::Function(_)));
    }

    #[test]
    fn invalid_decorator_name() {
        let out = parse("@123\ndef f(): pass\n");
        assert_eq!(messages(&out), vec!["Error in line 1, column 0: invalid decorator name"]);
    }

    #[test]
    fn invalid_utf8_is_reported_and_replaced() {
        let mut source = b"def f():\n    x = '".to_vec();
        source.push(0xff);
        source.extend_from_slice(b"'\n");
        let out = IndentGrammar.parse(&source);
        assert_eq!(
            messages(&out),
            vec!["Error in line 2, column 9: invalid UTF-8 sequence"]
        );
        assert_eq!(out.module.body.len(), 1);
    }

    #[test]
    fn async_def_is_a_function() {
        let out = parse("@metric('f1', 'y', 'p')\nasync def score():\n    pass\n");
        assert!(matches!(&out.module.body[0], Node::Decorated(d) if d.definition.name() == "score"));
    }
}
