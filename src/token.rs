//! The token definition for the session command language.

/// A token is a single unit of a command line, with a specific kind and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: Span,
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    // Literals
    Word(&'a str),
    String(&'a str), // Contents between the quotes
    Number(u64),

    // Operators
    Eq,          // =
    NotEq,       // !=
    Gt,          // >
    Gte,         // >=
    Lt,          // <
    Lte,         // <=
    Tilde,       // ~
    NotTilde,    // !~

    // Special
    Illegal, // Anything else, e.g. `(` or `,` inside a value
}

/// Represents a span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The starting byte offset.
    pub start: usize,
    /// The ending byte offset.
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
