//! Token kinds recognized by the lexer.

use crate::span::Span;

/// The exhaustive set of lexical token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A decimal integer literal, e.g. `42`.
    Int,
    /// An identifier: letters/underscore then word characters.
    Ident,
    /// A single beat-glyph step (`!`).
    Beat,
    /// A single skip-glyph step (`.`).
    Skip,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `:`
    Sep,
    /// `$`
    With,
    /// End of input.
    Terminator,

    /// `alias`
    Alias,
    /// `let`
    Let,
    /// `send`
    Send,
    /// `note`, used both as the meta-prelude statement keyword and as a
    /// literal primary referring to the current global note.
    Note,

    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `len`
    LenOf,
    /// `beat` (prefix, numeric context — count of beats in a sequence)
    BeatOf,
    /// `skip` (prefix, numeric context — count of skips in a sequence)
    SkipOf,

    /// `rev`
    Rev,
    /// `invert`
    Invert,

    /// `or`
    Or,
    /// `and`
    And,
    /// `xor`
    Xor,
    /// `cat`
    Cat,
    /// `rotl`
    Rotl,
    /// `rotr`
    Rotr,
    /// `rep`
    Rep,
    /// `bpm` used as a sequence infix operator (`seq bpm 140`).
    Bpm,
    /// `map`
    Map,
    /// `chain`
    Chain,

    /// `car`
    Car,
    /// `cdr`
    Cdr,
    /// `dbg`
    Dbg,
}

impl TokenKind {
    /// A short human-readable name, used in diagnostic messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            TokenKind::Int => "an integer",
            TokenKind::Ident => "an identifier",
            TokenKind::Beat => "a beat step",
            TokenKind::Skip => "a skip step",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Sep => "`:`",
            TokenKind::With => "`$`",
            TokenKind::Terminator => "end of input",
            TokenKind::Alias => "`alias`",
            TokenKind::Let => "`let`",
            TokenKind::Send => "`send`",
            TokenKind::Bpm => "`bpm`",
            TokenKind::Note => "`note`",
            TokenKind::Add => "`+`",
            TokenKind::Sub => "`-`",
            TokenKind::Mul => "`*`",
            TokenKind::Div => "`/`",
            TokenKind::LenOf => "`len`",
            TokenKind::BeatOf => "`beat`",
            TokenKind::SkipOf => "`skip`",
            TokenKind::Rev => "`rev`",
            TokenKind::Invert => "`invert`",
            TokenKind::Or => "`or`",
            TokenKind::And => "`and`",
            TokenKind::Xor => "`xor`",
            TokenKind::Cat => "`cat`",
            TokenKind::Rotl => "`rotl`",
            TokenKind::Rotr => "`rotr`",
            TokenKind::Rep => "`rep`",
            TokenKind::Map => "`map`",
            TokenKind::Chain => "`chain`",
            TokenKind::Car => "`car`",
            TokenKind::Cdr => "`cdr`",
            TokenKind::Dbg => "`dbg`",
        }
    }
}

/// A lexed token: a span into the source plus its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The byte range this token occupies in the source.
    pub span: Span,
    /// Which kind of token this is.
    pub kind: TokenKind,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(span: Span, kind: TokenKind) -> Self {
        Self { span, kind }
    }
}
