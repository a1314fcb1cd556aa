//! Syntax tree handed from a grammar front-end to the walker.
//!
//! Only the shapes the annotation pipeline cares about are represented:
//! function and class definitions (with their nested bodies) and the
//! decorators wrapping them. Every other statement is dropped by the
//! front-end.

use std::fmt;

/// Source position: 1-based line, 0-based column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Root of a parsed source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Function(FunctionDef),
    Class(ClassDef),
    Decorated(Decorated),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub span: Span,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub span: Span,
    pub body: Vec<Node>,
}

/// A definition together with the decorator clauses written above it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorated {
    /// Decorators in source order (top to bottom).
    pub decorators: Vec<Decorator>,
    pub definition: Definition,
}

/// The target of a decoration context.
#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    Function(FunctionDef),
    Class(ClassDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Function(f) => &f.name,
            Definition::Class(c) => &c.name,
        }
    }

    pub fn body(&self) -> &[Node] {
        match self {
            Definition::Function(f) => &f.body,
            Definition::Class(c) => &c.body,
        }
    }

    pub(crate) fn body_mut(&mut self) -> &mut Vec<Node> {
        match self {
            Definition::Function(f) => &mut f.body,
            Definition::Class(c) => &mut c.body,
        }
    }

    /// Wrap into a node, adding the decoration context when decorators exist.
    pub(crate) fn into_node(self, decorators: Vec<Decorator>) -> Node {
        if !decorators.is_empty() {
            return Node::Decorated(Decorated {
                decorators,
                definition: self,
            });
        }
        match self {
            Definition::Function(f) => Node::Function(f),
            Definition::Class(c) => Node::Class(c),
        }
    }
}

/// One `@name(...)` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub name: DottedName,
    /// `None` when the decorator is a bare name without a call.
    pub arguments: Option<Vec<Argument>>,
    pub span: Span,
}

impl Decorator {
    /// Argument entries, treating a bare decorator as an empty call.
    pub fn argument_list(&self) -> &[Argument] {
        self.arguments.as_deref().unwrap_or(&[])
    }
}

/// Dotted identifier such as `sdk.annotations.parameter`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DottedName(pub Vec<String>);

impl DottedName {
    pub fn parse(text: &str) -> Self {
        DottedName(
            text.split('.')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
        )
    }

    /// Final segment (the attribute actually called).
    pub fn last(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for DottedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// One entry of a call's argument list.
///
/// Holds one value-expression for positional entries (`"x"`) and two for
/// keyword entries (`key="x"`, key first). Expression text is kept raw,
/// quotes included.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub values: Vec<String>,
    pub span: Span,
}

impl Argument {
    pub fn positional(value: impl Into<String>) -> Self {
        Self {
            values: vec![value.into()],
            span: Span::default(),
        }
    }

    pub fn keyword(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            values: vec![key.into(), value.into()],
            span: Span::default(),
        }
    }
}
