//! Lexical analysis: byte stream → token stream, with a one-token
//! look-ahead consumed on demand by the parser (`parse`).

pub mod token;

use crate::span::Span;

pub use token::{Token, TokenKind};

/// The glyph a [`TokenKind::Beat`] step is spelled with.
pub const BEAT_GLYPH: char = '!';
/// The glyph a [`TokenKind::Skip`] step is spelled with.
pub const SKIP_GLYPH: char = '.';

fn keyword(word: &str) -> Option<TokenKind> {
    Some(match word {
        "alias" => TokenKind::Alias,
        "let" => TokenKind::Let,
        "send" => TokenKind::Send,
        "note" => TokenKind::Note,
        "bpm" => TokenKind::Bpm,
        "len" => TokenKind::LenOf,
        "beat" => TokenKind::BeatOf,
        "skip" => TokenKind::SkipOf,
        "rev" => TokenKind::Rev,
        "invert" => TokenKind::Invert,
        "or" => TokenKind::Or,
        "and" => TokenKind::And,
        "xor" => TokenKind::Xor,
        "cat" => TokenKind::Cat,
        "rotl" => TokenKind::Rotl,
        "rotr" => TokenKind::Rotr,
        "rep" => TokenKind::Rep,
        "map" => TokenKind::Map,
        "chain" => TokenKind::Chain,
        "car" => TokenKind::Car,
        "cdr" => TokenKind::Cdr,
        "dbg" => TokenKind::Dbg,
        _ => return None,
    })
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A byte-stream tokenizer over one source buffer.
///
/// Mirrors the teacher's own `Cursor` (`peek_next_token`/`next_token`
/// pairing) generalized from whitespace-delimited words to a small
/// operator/keyword grammar, and reproduces the original `cane` compiler's
/// `peek`/`prev`/`next()` lexer shape directly.
pub struct Lexer<'a> {
    source: &'a str,
    index: usize,
    /// The next token to be returned by [`Lexer::next`], already scanned.
    pub peek: Token,
    /// The token most recently returned by [`Lexer::next`].
    pub prev: Token,
    /// Set the first time an unrecognized byte is scanned, so the lexer
    /// does not re-report the same span forever when the parser keeps
    /// calling `next` trying to make progress.
    poisoned: bool,
    last_error: Option<LexError>,
}

/// An error produced while scanning a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    /// Where the bad byte/sequence was found.
    pub span: Span,
    /// What went wrong.
    pub kind: LexErrorKind,
}

/// The distinct ways a single token can fail to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A byte that starts no valid token.
    UnrecognizedCharacter(char),
}

impl std::fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErrorKind::UnrecognizedCharacter(c) => {
                write!(f, "unrecognized character {c:?}")
            }
        }
    }
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source` and scans its first token into
    /// [`Lexer::peek`].
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let mut lx = Self {
            source,
            index: 0,
            peek: Token::new(Span::empty_at(0), TokenKind::Terminator),
            prev: Token::new(Span::empty_at(0), TokenKind::Terminator),
            poisoned: false,
            last_error: None,
        };
        lx.peek = lx.scan_one();
        lx
    }

    fn rest(&self) -> &'a str {
        &self.source[self.index..]
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace());
            self.index += rest.len() - trimmed.len();
            if self.rest().starts_with('#') {
                let line_end = self.rest().find('\n').unwrap_or(self.rest().len());
                self.index += line_end;
                continue;
            }
            break;
        }
    }

    /// Scans and returns the single next token, advancing past it, without
    /// reporting any error (a bad byte becomes a [`TokenKind::Terminator`]
    /// once `poisoned`, so a caller retrying `next()` cannot loop forever).
    ///
    /// Lexical errors are observed through [`Lexer::take_error`], called by
    /// `parse::statement`'s outer loop after every `next()`.
    fn scan_one(&mut self) -> Token {
        self.skip_trivia();

        if self.poisoned || self.rest().is_empty() {
            return Token::new(Span::empty_at(self.index), TokenKind::Terminator);
        }

        let start = self.index;
        let mut chars = self.rest().chars();
        let c = chars.next().expect("rest() is non-empty");

        macro_rules! single {
            ($kind:expr) => {{
                self.index += c.len_utf8();
                Token::new(Span::new(start, self.index), $kind)
            }};
        }

        match c {
            '(' => single!(TokenKind::LParen),
            ')' => single!(TokenKind::RParen),
            ':' => single!(TokenKind::Sep),
            '$' => single!(TokenKind::With),
            '+' => single!(TokenKind::Add),
            '-' => single!(TokenKind::Sub),
            '*' => single!(TokenKind::Mul),
            '/' => single!(TokenKind::Div),
            c if c == BEAT_GLYPH => single!(TokenKind::Beat),
            c if c == SKIP_GLYPH => single!(TokenKind::Skip),
            c if c.is_ascii_digit() => {
                let rest = self.rest();
                let len = rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len());
                self.index += len;
                Token::new(Span::new(start, self.index), TokenKind::Int)
            }
            c if is_ident_start(c) => {
                let rest = self.rest();
                let len = rest.find(|c| !is_ident_continue(c)).unwrap_or(rest.len());
                self.index += len;
                let word = &self.source[start..self.index];
                let kind = keyword(word).unwrap_or(TokenKind::Ident);
                Token::new(Span::new(start, self.index), kind)
            }
            bad => {
                self.index += bad.len_utf8();
                self.poisoned = true;
                self.last_error = Some(LexError {
                    span: Span::new(start, self.index),
                    kind: LexErrorKind::UnrecognizedCharacter(bad),
                });
                Token::new(Span::new(start, self.index), TokenKind::Terminator)
            }
        }
    }

    /// Returns the current [`Lexer::peek`], advances the lexer, and records
    /// the returned token as the new [`Lexer::prev`].
    pub fn next(&mut self) -> Token {
        let current = self.peek;
        self.prev = current;
        self.peek = self.scan_one();
        current
    }

    /// The whole source buffer this lexer scans over.
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Takes and clears the most recent lexical error, if one was produced
    /// by the last [`Lexer::scan_one`] call.
    pub fn take_error(&mut self) -> Option<LexError> {
        self.last_error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lx = Lexer::new(source);
        let mut out = vec![];
        loop {
            let tok = lx.next();
            if tok.kind == TokenKind::Terminator {
                break;
            }
            out.push(tok.kind);
        }
        out
    }

    #[test]
    fn lexes_keywords_and_idents() {
        assert_eq!(
            kinds("bpm 120 note 60"),
            vec![
                TokenKind::Bpm,
                TokenKind::Int,
                TokenKind::Note,
                TokenKind::Int,
            ]
        );
    }

    #[test]
    fn lexes_steps_and_euclid_form() {
        assert_eq!(
            kinds("send 1 3:8"),
            vec![
                TokenKind::Send,
                TokenKind::Int,
                TokenKind::Int,
                TokenKind::Sep,
                TokenKind::Int,
            ]
        );
        assert_eq!(
            kinds("! . ! !"),
            vec![
                TokenKind::Beat,
                TokenKind::Skip,
                TokenKind::Beat,
                TokenKind::Beat,
            ]
        );
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(
            kinds("bpm 120 # this is ignored\nnote 60"),
            vec![TokenKind::Bpm, TokenKind::Int, TokenKind::Note, TokenKind::Int]
        );
    }

    #[test]
    fn reports_unrecognized_character() {
        let mut lx = Lexer::new("bpm @");
        assert_eq!(lx.next().kind, TokenKind::Bpm);
        assert_eq!(lx.next().kind, TokenKind::Terminator);
        let err = lx.take_error().expect("should have recorded an error");
        assert_eq!(err.kind, LexErrorKind::UnrecognizedCharacter('@'));
    }

    #[test]
    fn keeps_prev_and_peek_in_sync() {
        let mut lx = Lexer::new("send 1");
        assert_eq!(lx.peek.kind, TokenKind::Send);
        let tok = lx.next();
        assert_eq!(tok.kind, TokenKind::Send);
        assert_eq!(lx.prev.kind, TokenKind::Send);
        assert_eq!(lx.peek.kind, TokenKind::Int);
    }
}
