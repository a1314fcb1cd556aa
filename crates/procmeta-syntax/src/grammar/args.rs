//! Call argument-list splitting.
//!
//! Splits the text between a call's parentheses into entries of one
//! (`expr`) or two (`key=expr`) raw value-expressions.

use super::lines::LogicalLine;
use super::SyntaxDiagnostic;
use crate::tree::Argument;
use std::str::CharIndices;

/// Characters outside string literals, each with the bracket depth around it.
///
/// Opening brackets report the depth outside them, closing brackets the depth
/// after them, so the brackets of a top-level call both sit at depth 0.
pub(crate) struct TopLevel<'a> {
    text: &'a str,
    iter: CharIndices<'a>,
    depth: usize,
    quote: Option<(u8, bool)>,
}

pub(crate) fn top_level(text: &str) -> TopLevel<'_> {
    TopLevel {
        text,
        iter: text.char_indices(),
        depth: 0,
        quote: None,
    }
}

impl Iterator for TopLevel<'_> {
    type Item = (usize, char, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((i, ch)) = self.iter.next() {
            if let Some((quote, triple)) = self.quote {
                if ch == '\\' {
                    self.iter.next();
                } else if ch == quote as char {
                    if !triple {
                        self.quote = None;
                    } else if self.text.as_bytes()[i..].starts_with(&[quote; 3]) {
                        self.iter.next();
                        self.iter.next();
                        self.quote = None;
                    }
                }
                continue;
            }

            match ch {
                '"' | '\'' => {
                    let quote = ch as u8;
                    let triple = self.text.as_bytes()[i..].starts_with(&[quote; 3]);
                    if triple {
                        self.iter.next();
                        self.iter.next();
                    }
                    self.quote = Some((quote, triple));
                }
                '(' | '[' | '{' => {
                    let depth = self.depth;
                    self.depth += 1;
                    return Some((i, ch, depth));
                }
                ')' | ']' | '}' => {
                    self.depth = self.depth.saturating_sub(1);
                    return Some((i, ch, self.depth));
                }
                _ => return Some((i, ch, self.depth)),
            }
        }
        None
    }
}

/// Parse the argument list occupying `text[start..end]` of `line`.
pub(crate) fn parse_arguments(
    line: &LogicalLine,
    start: usize,
    end: usize,
    diagnostics: &mut Vec<SyntaxDiagnostic>,
) -> Vec<Argument> {
    let inner = &line.text[start..end];

    let mut pieces = Vec::new();
    let mut piece_start = 0;
    for (i, ch, depth) in top_level(inner) {
        if ch == ',' && depth == 0 {
            pieces.push(piece_start..i);
            piece_start = i + 1;
        }
    }
    pieces.push(piece_start..inner.len());

    let last = pieces.len() - 1;
    let mut arguments = Vec::new();

    for (n, range) in pieces.into_iter().enumerate() {
        let raw = &inner[range.clone()];
        let trimmed = raw.trim();
        let offset = start + range.start + (raw.len() - raw.trim_start().len());
        let span = line.span_at(offset);

        if trimmed.is_empty() {
            // `f()` and a trailing comma are fine
            if n == last {
                continue;
            }
            diagnostics.push(SyntaxDiagnostic::new(
                line.span_at(start + range.end),
                "expected argument before ','",
            ));
            continue;
        }

        match keyword_split(trimmed) {
            Some(eq) => {
                let key = trimmed[..eq].trim();
                let value = trimmed[eq + 1..].trim();
                if !is_identifier(key) {
                    diagnostics.push(SyntaxDiagnostic::new(
                        span,
                        format!("expression cannot be used as keyword: '{}'", key),
                    ));
                    continue;
                }
                if value.is_empty() {
                    diagnostics.push(SyntaxDiagnostic::new(
                        line.span_at(offset + eq),
                        format!("expected value for keyword '{}'", key),
                    ));
                    continue;
                }
                arguments.push(Argument {
                    values: vec![key.to_string(), value.to_string()],
                    span,
                });
            }
            None => arguments.push(Argument {
                values: vec![trimmed.to_string()],
                span,
            }),
        }
    }

    arguments
}

/// Byte index of the top-level `=` separating a keyword from its value.
fn keyword_split(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    top_level(text)
        .filter(|&(_, ch, depth)| ch == '=' && depth == 0)
        .map(|(i, _, _)| i)
        .find(|&i| {
            let after_operator = i > 0 && b"=!<>:".contains(&bytes[i - 1]);
            let before_equals = bytes.get(i + 1) == Some(&b'=');
            !after_operator && !before_equals
        })
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::super::lines;
    use super::*;

    fn args_of(call: &str) -> (Vec<Vec<String>>, Vec<String>) {
        let mut diags = Vec::new();
        let lines = lines::split(call, &mut diags);
        let line = &lines[0];
        let open = line.text.find('(').unwrap();
        let close = line.text.rfind(')').unwrap();
        let args = parse_arguments(line, open + 1, close, &mut diags);
        (
            args.into_iter().map(|a| a.values).collect(),
            diags.iter().map(|d| d.to_string()).collect(),
        )
    }

    #[test]
    fn positional_and_keyword_entries() {
        let (args, diags) = args_of("f('a', \"b\", key='c')");
        assert_eq!(
            args,
            vec![
                vec!["'a'".to_string()],
                vec!["\"b\"".to_string()],
                vec!["key".to_string(), "'c'".to_string()],
            ]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn commas_inside_nested_values_do_not_split() {
        let (args, _) = args_of("f(default=[1, 2], other={'a': (3, 4)}, s='x,y')");
        assert_eq!(args.len(), 3);
        assert_eq!(args[0][1], "[1, 2]");
        assert_eq!(args[2][1], "'x,y'");
    }

    #[test]
    fn comparison_is_not_a_keyword() {
        let (args, _) = args_of("f(a == b, c <= d)");
        assert_eq!(args, vec![vec!["a == b".to_string()], vec!["c <= d".to_string()]]);
    }

    #[test]
    fn equals_inside_string_is_positional() {
        let (args, _) = args_of("f('a=b')");
        assert_eq!(args, vec![vec!["'a=b'".to_string()]]);
    }

    #[test]
    fn empty_call_and_trailing_comma() {
        assert!(args_of("f()").0.is_empty());
        assert_eq!(args_of("f(a,)").0.len(), 1);
    }

    #[test]
    fn empty_entry_is_reported() {
        let (args, diags) = args_of("f(a,,b)");
        assert_eq!(args.len(), 2);
        assert_eq!(diags, vec!["Error in line 1, column 4: expected argument before ','"]);
    }

    #[test]
    fn non_identifier_keyword_is_reported() {
        let (args, diags) = args_of("f('a'=1)");
        assert!(args.is_empty());
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("expression cannot be used as keyword"));
    }

    #[test]
    fn top_level_depths() {
        let depths: Vec<(char, usize)> = top_level("a(b)")
            .map(|(_, ch, depth)| (ch, depth))
            .collect();
        assert_eq!(depths, vec![('a', 0), ('(', 0), ('b', 1), (')', 0)]);
    }
}
