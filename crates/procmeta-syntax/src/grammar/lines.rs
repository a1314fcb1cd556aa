//! Logical line splitting for indentation-based sources.
//!
//! Joins physical lines that continue inside brackets, triple-quoted strings
//! or after a trailing backslash. Comments and blank lines are dropped, and the
//! source position of every kept character is recorded so later stages can
//! report precise diagnostics.

use super::SyntaxDiagnostic;
use crate::tree::Span;

const TAB_SIZE: usize = 8;

/// One logical line with its indentation width.
#[derive(Debug, Default)]
pub(crate) struct LogicalLine {
    pub text: String,
    pub indent: usize,
    /// (byte offset in `text`, source position) for every character.
    positions: Vec<(usize, Span)>,
}

impl LogicalLine {
    /// Position of the first character.
    pub fn start(&self) -> Span {
        self.span_at(0)
    }

    /// Source position of the character at byte `offset` in `text`.
    pub fn span_at(&self, offset: usize) -> Span {
        let idx = self.positions.partition_point(|(o, _)| *o <= offset);
        self.positions
            .get(idx.saturating_sub(1))
            .map(|(_, span)| *span)
            .unwrap_or_default()
    }

    fn push(&mut self, ch: char, span: Span) {
        self.positions.push((self.text.len(), span));
        self.text.push(ch);
    }

    fn trim_end(&mut self) {
        while self.text.ends_with(char::is_whitespace) {
            self.text.pop();
            self.positions.pop();
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenString {
    quote: char,
    triple: bool,
    start: Span,
}

/// Split `source` into logical lines, appending lexical problems to `diagnostics`.
pub(crate) fn split(source: &str, diagnostics: &mut Vec<SyntaxDiagnostic>) -> Vec<LogicalLine> {
    let mut scanner = Scanner::default();
    for (idx, raw) in source.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        scanner.physical_line(idx + 1, raw, diagnostics);
    }
    scanner.finish(diagnostics)
}

#[derive(Default)]
struct Scanner {
    lines: Vec<LogicalLine>,
    current: Option<LogicalLine>,
    brackets: Vec<(char, Span)>,
    string: Option<OpenString>,
}

impl Scanner {
    fn physical_line(&mut self, line_no: usize, raw: &str, diagnostics: &mut Vec<SyntaxDiagnostic>) {
        let chars: Vec<char> = raw.chars().collect();
        let mut i = 0;

        let mut line = match self.current.take() {
            Some(line) => line,
            None => {
                let mut indent = 0;
                while i < chars.len() && matches!(chars[i], ' ' | '\t' | '\x0c') {
                    indent = match chars[i] {
                        '\t' => (indent / TAB_SIZE + 1) * TAB_SIZE,
                        '\x0c' => 0,
                        _ => indent + 1,
                    };
                    i += 1;
                }
                // Blank and comment-only lines never start a logical line
                if i == chars.len() || chars[i] == '#' {
                    return;
                }
                LogicalLine {
                    indent,
                    ..Default::default()
                }
            }
        };

        let mut continued = false;
        let mut escaped_newline = false;

        while i < chars.len() {
            let ch = chars[i];
            let span = Span::new(line_no, i);

            if let Some(open) = self.string {
                line.push(ch, span);
                if ch == '\\' {
                    match chars.get(i + 1) {
                        Some(&next) => {
                            line.push(next, Span::new(line_no, i + 1));
                            i += 2;
                        }
                        None => {
                            escaped_newline = true;
                            i += 1;
                        }
                    }
                    continue;
                }
                if ch == open.quote {
                    if !open.triple {
                        self.string = None;
                    } else if chars[i..].starts_with(&[ch, ch, ch]) {
                        line.push(ch, Span::new(line_no, i + 1));
                        line.push(ch, Span::new(line_no, i + 2));
                        self.string = None;
                        i += 3;
                        continue;
                    }
                }
                i += 1;
                continue;
            }

            match ch {
                '#' => break,
                '"' | '\'' => {
                    let triple = chars[i..].starts_with(&[ch, ch, ch]);
                    self.string = Some(OpenString {
                        quote: ch,
                        triple,
                        start: span,
                    });
                    if triple {
                        line.push(ch, span);
                        line.push(ch, Span::new(line_no, i + 1));
                        line.push(ch, Span::new(line_no, i + 2));
                        i += 3;
                        continue;
                    }
                    line.push(ch, span);
                }
                '(' | '[' | '{' => {
                    self.brackets.push((ch, span));
                    line.push(ch, span);
                }
                ')' | ']' | '}' => {
                    match self.brackets.pop() {
                        Some((open, _)) if closes(open, ch) => {}
                        Some((open, _)) => diagnostics.push(SyntaxDiagnostic::new(
                            span,
                            format!("closing '{}' does not match '{}'", ch, open),
                        )),
                        None => diagnostics
                            .push(SyntaxDiagnostic::new(span, format!("unmatched '{}'", ch))),
                    }
                    line.push(ch, span);
                }
                '\\' if i + 1 == chars.len() => continued = true,
                _ => line.push(ch, span),
            }
            i += 1;
        }

        let end = Span::new(line_no, chars.len());
        if let Some(open) = self.string {
            if open.triple || escaped_newline {
                line.push('\n', end);
                self.current = Some(line);
                return;
            }
            diagnostics.push(SyntaxDiagnostic::new(open.start, "unterminated string literal"));
            self.string = None;
        }

        if !self.brackets.is_empty() || continued {
            line.push(' ', end);
            self.current = Some(line);
            return;
        }

        self.finish_line(line);
    }

    fn finish_line(&mut self, mut line: LogicalLine) {
        line.trim_end();
        if !line.text.is_empty() {
            self.lines.push(line);
        }
    }

    fn finish(mut self, diagnostics: &mut Vec<SyntaxDiagnostic>) -> Vec<LogicalLine> {
        if let Some(open) = self.string.take() {
            let message = if open.triple {
                "unterminated triple-quoted string literal"
            } else {
                "unterminated string literal"
            };
            diagnostics.push(SyntaxDiagnostic::new(open.start, message));
        }
        for (ch, span) in self.brackets.drain(..) {
            diagnostics.push(SyntaxDiagnostic::new(span, format!("'{}' was never closed", ch)));
        }
        if let Some(line) = self.current.take() {
            self.finish_line(line);
        }
        self.lines
    }
}

fn closes(open: char, close: char) -> bool {
    matches!((open, close), ('(', ')') | ('[', ']') | ('{', '}'))
}
