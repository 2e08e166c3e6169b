//! The numeric expression grammar: `literal_expr` and its primaries/prefix/
//! infix operators, plus the shared float→integer coercion used at every
//! use site (channel numbers, bpm, rep counts, euclidean beats/steps,
//! map'd notes).

use crate::diagnostics::{Phase, PResult};
use crate::lex::{Lexer, Token, TokenKind};
use crate::parse::binding_power::{binding_power, OpFix};
use crate::parse::context::{fatal, Context};
use crate::parse::errors::SemanticMessage;
use crate::parse::sequence::sequence_expr;
use crate::span::Span;

pub(crate) fn is_literal(kind: TokenKind) -> bool {
    kind == TokenKind::Int
}

pub(crate) fn is_literal_prefix(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LenOf | TokenKind::BeatOf | TokenKind::SkipOf
    )
}

pub(crate) fn is_literal_infix(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Add | TokenKind::Sub | TokenKind::Mul | TokenKind::Div
    )
}

pub(crate) fn is_literal_primary(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident | TokenKind::LParen | TokenKind::Bpm | TokenKind::Note
    ) || is_literal(kind)
}

/// Truncates `value` toward zero into a `u64`, rejecting negative results
/// as a semantic error (the language has no signed-integer use site).
pub(crate) fn truncate_u64(ctx: &mut Context, lx: &mut Lexer, span: Span, value: f64) -> PResult<u64> {
    if value < 0.0 {
        return Err(fatal(
            ctx,
            lx,
            Phase::Semantic,
            span,
            SemanticMessage::ExpectedNonNegative(value).to_string(),
        ));
    }
    Ok(value.trunc() as u64)
}

fn int_literal(ctx: &mut Context, lx: &mut Lexer) -> PResult<f64> {
    let tok = lx.next();
    let text = tok.span.slice(lx.source());
    Ok(text
        .parse::<f64>()
        .expect("lexer guarantees digit-only Int text"))
}

/// Parses and evaluates a numeric expression at binding power `bp`.
pub(crate) fn literal_expr(ctx: &mut Context, lx: &mut Lexer, bp: u32) -> PResult<f64> {
    let tok = lx.peek;

    let mut lit = if is_literal_prefix(tok.kind) {
        let (_, rbp) = binding_power(tok.kind, OpFix::LitPrefix).ok_or_else(|| {
            fatal(ctx, lx, Phase::Internal, tok.span, "unreachable literal prefix")
        })?;
        literal_prefix(ctx, lx, rbp)?
    } else if is_literal_primary(tok.kind) {
        literal_primary(ctx, lx)?
    } else {
        return Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!("expected a numeric expression, found {}", tok.kind.describe()),
        ));
    };

    loop {
        let tok = lx.peek;
        if !is_literal_infix(tok.kind) {
            break;
        }
        let (lbp, rbp) = binding_power(tok.kind, OpFix::LitInfix)
            .ok_or_else(|| fatal(ctx, lx, Phase::Internal, tok.span, "unreachable literal infix"))?;
        if lbp < bp {
            break;
        }
        lit = literal_infix(ctx, lx, lit, rbp)?;
    }

    Ok(lit)
}

fn literal_primary(ctx: &mut Context, lx: &mut Lexer) -> PResult<f64> {
    let tok: Token = lx.peek;
    match tok.kind {
        TokenKind::Int => int_literal(ctx, lx),
        TokenKind::Ident => {
            lx.next();
            let name = tok.span.slice(lx.source());
            ctx.constants.get(name).copied().ok_or_else(|| {
                fatal(
                    ctx,
                    lx,
                    Phase::Semantic,
                    tok.span,
                    SemanticMessage::Undefined(name.to_owned()).to_string(),
                )
            })
        }
        TokenKind::Bpm => {
            lx.next();
            Ok(ctx.global_bpm as f64)
        }
        TokenKind::Note => {
            lx.next();
            Ok(ctx.global_note as f64)
        }
        TokenKind::LParen => {
            lx.next();
            let lit = literal_expr(ctx, lx, 0)?;
            expect(ctx, lx, TokenKind::RParen)?;
            lx.next();
            Ok(lit)
        }
        _ => Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!("expected a numeric primary, found {}", tok.kind.describe()),
        )),
    }
}

fn literal_prefix(ctx: &mut Context, lx: &mut Lexer, bp: u32) -> PResult<f64> {
    let tok = lx.next();
    match tok.kind {
        TokenKind::LenOf => Ok(sequence_expr(ctx, lx, bp)?.len() as f64),
        TokenKind::BeatOf => Ok(sequence_expr(ctx, lx, bp)?.beats() as f64),
        TokenKind::SkipOf => Ok(sequence_expr(ctx, lx, bp)?.skips() as f64),
        _ => Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!("expected a numeric prefix operator, found {}", tok.kind.describe()),
        )),
    }
}

fn literal_infix(ctx: &mut Context, lx: &mut Lexer, lhs: f64, bp: u32) -> PResult<f64> {
    let tok = lx.next();
    let rhs = literal_expr(ctx, lx, bp)?;
    match tok.kind {
        TokenKind::Add => Ok(lhs + rhs),
        TokenKind::Sub => Ok(lhs - rhs),
        TokenKind::Mul => Ok(lhs * rhs),
        TokenKind::Div => Ok(lhs / rhs),
        _ => Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!("expected a numeric infix operator, found {}", tok.kind.describe()),
        )),
    }
}

/// Asserts that `lx.peek` has kind `expected`, reporting a syntactic error
/// naming what was expected otherwise. Does not consume the token.
pub(crate) fn expect(ctx: &mut Context, lx: &mut Lexer, expected: TokenKind) -> PResult<()> {
    if lx.peek.kind == expected {
        Ok(())
    } else {
        Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            lx.peek.span,
            format!(
                "expected {}, found {}",
                expected.describe(),
                lx.peek.kind.describe()
            ),
        ))
    }
}
