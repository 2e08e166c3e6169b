//! The sequence expression grammar: `sequence_expr` and its primaries/
//! prefix/infix/postfix operators, plus the Euclidean-form primary and
//! channel-operand parsing shared by `send`/`alias` statements.

use crate::diagnostics::{Phase, PResult};
use crate::lex::{Lexer, TokenKind};
use crate::midi;
use crate::parse::binding_power::{binding_power, OpFix};
use crate::parse::context::{fatal, Context};
use crate::parse::errors::SemanticMessage;
use crate::parse::literal::{
    expect, is_literal, is_literal_primary, literal_expr, truncate_u64,
};
use crate::sequence::{Sequence, Step, StepKind};

pub(crate) fn is_step(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Beat | TokenKind::Skip)
}

pub(crate) fn is_sequence_prefix(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Rev | TokenKind::Invert)
}

pub(crate) fn is_sequence_infix(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Or
            | TokenKind::And
            | TokenKind::Xor
            | TokenKind::Cat
            | TokenKind::Rotl
            | TokenKind::Rotr
            | TokenKind::Rep
            | TokenKind::Bpm
            | TokenKind::Map
            | TokenKind::Chain
    )
}

pub(crate) fn is_sequence_postfix(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Car | TokenKind::Cdr | TokenKind::Dbg)
}

pub(crate) fn is_sequence_primary(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Ident | TokenKind::LParen | TokenKind::Sep) || is_step(kind) || is_literal(kind)
}

/// Parses and evaluates a sequence expression at binding power `bp`.
pub(crate) fn sequence_expr(ctx: &mut Context, lx: &mut Lexer, bp: u32) -> PResult<Sequence> {
    let tok = lx.peek;

    let mut seq = if is_sequence_prefix(tok.kind) {
        let (_, rbp) = binding_power(tok.kind, OpFix::SeqPrefix)
            .ok_or_else(|| fatal(ctx, lx, Phase::Internal, tok.span, "unreachable sequence prefix"))?;
        sequence_prefix(ctx, lx, rbp)?
    } else if is_sequence_primary(tok.kind) {
        sequence_primary(ctx, lx)?
    } else {
        return Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!("expected a sequence expression, found {}", tok.kind.describe()),
        ));
    };

    loop {
        let tok = lx.peek;
        if is_sequence_postfix(tok.kind) {
            let (lbp, _) = binding_power(tok.kind, OpFix::SeqPostfix)
                .ok_or_else(|| fatal(ctx, lx, Phase::Internal, tok.span, "unreachable sequence postfix"))?;
            if lbp < bp {
                break;
            }
            seq = sequence_postfix(ctx, lx, seq)?;
        } else if is_sequence_infix(tok.kind) {
            let (lbp, rbp) = binding_power(tok.kind, OpFix::SeqInfix)
                .ok_or_else(|| fatal(ctx, lx, Phase::Internal, tok.span, "unreachable sequence infix"))?;
            if lbp < bp {
                break;
            }
            seq = sequence_infix(ctx, lx, seq, rbp)?;
        } else {
            break;
        }
    }

    Ok(seq)
}

fn sequence_primary(ctx: &mut Context, lx: &mut Lexer) -> PResult<Sequence> {
    let tok = lx.peek;
    match tok.kind {
        TokenKind::Int | TokenKind::Sep => euclide(ctx, lx),
        TokenKind::Beat | TokenKind::Skip => Ok(step_run(ctx, lx)),
        TokenKind::Ident => {
            lx.next();
            let name = tok.span.slice(lx.source());
            ctx.chains.get(name).cloned().ok_or_else(|| {
                fatal(
                    ctx,
                    lx,
                    Phase::Semantic,
                    tok.span,
                    SemanticMessage::Undefined(name.to_owned()).to_string(),
                )
            })
        }
        TokenKind::LParen => {
            lx.next();
            let seq = sequence_expr(ctx, lx, 0)?;
            expect(ctx, lx, TokenKind::RParen)?;
            lx.next();
            Ok(seq)
        }
        _ => Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!("expected a sequence primary, found {}", tok.kind.describe()),
        )),
    }
}

fn step_run(ctx: &Context, lx: &mut Lexer) -> Sequence {
    let mut steps = Vec::new();
    while is_step(lx.peek.kind) {
        let tok = lx.next();
        let kind = match tok.kind {
            TokenKind::Beat => StepKind::Beat,
            TokenKind::Skip => StepKind::Skip,
            _ => unreachable!("guarded by is_step"),
        };
        steps.push(Step::new(kind, ctx.global_note));
    }
    Sequence::from_steps(steps, ctx.global_bpm)
}

/// Parses the Euclidean-rhythm primary: either `INT : literal_expr` (a bare
/// integer beat count) or `: literal_expr : literal_expr` (a full
/// expression beat count, introduced by a leading `:`).
fn euclide(ctx: &mut Context, lx: &mut Lexer) -> PResult<Sequence> {
    let start_span = lx.peek.span;

    let beats = if lx.peek.kind == TokenKind::Sep {
        lx.next();
        truncate_u64(ctx, lx, lx.peek.span, literal_expr(ctx, lx, 0)?)?
    } else {
        let tok = lx.peek;
        expect(ctx, lx, TokenKind::Int)?;
        lx.next();
        let text = tok.span.slice(lx.source());
        text.parse::<u64>().unwrap_or(0)
    };

    expect(ctx, lx, TokenKind::Sep)?;
    lx.next();

    let steps_span = lx.peek.span;
    let steps = truncate_u64(ctx, lx, steps_span, literal_expr(ctx, lx, 0)?)?;

    let whole_span = start_span.encompass(lx.prev.span);
    if steps == 0 {
        return Err(fatal(
            ctx,
            lx,
            Phase::Semantic,
            whole_span,
            "a euclidean rhythm needs at least one step",
        ));
    }
    if beats > steps {
        return Err(fatal(
            ctx,
            lx,
            Phase::Semantic,
            whole_span,
            format!("beats ({beats}) must be <= steps ({steps})"),
        ));
    }

    Ok(Sequence::euclide(beats, steps, ctx.global_note, ctx.global_bpm))
}

fn sequence_prefix(ctx: &mut Context, lx: &mut Lexer, bp: u32) -> PResult<Sequence> {
    let tok = lx.next();
    let seq = sequence_expr(ctx, lx, bp)?;
    match tok.kind {
        TokenKind::Rev => Ok(seq.reverse()),
        TokenKind::Invert => Ok(seq.invert()),
        _ => Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!("expected a sequence prefix operator, found {}", tok.kind.describe()),
        )),
    }
}

fn sequence_infix(ctx: &mut Context, lx: &mut Lexer, seq: Sequence, bp: u32) -> PResult<Sequence> {
    let tok = lx.next();
    match tok.kind {
        TokenKind::Cat => Ok(seq.cat(sequence_expr(ctx, lx, bp)?)),
        TokenKind::Or => Ok(seq.or(sequence_expr(ctx, lx, bp)?)),
        TokenKind::And => Ok(seq.and(sequence_expr(ctx, lx, bp)?)),
        TokenKind::Xor => Ok(seq.xor(sequence_expr(ctx, lx, bp)?)),

        TokenKind::Rotl => {
            let n = truncate_u64(ctx, lx, lx.peek.span, literal_expr(ctx, lx, 0)?)?;
            Ok(seq.rotl(n))
        }
        TokenKind::Rotr => {
            let n = truncate_u64(ctx, lx, lx.peek.span, literal_expr(ctx, lx, 0)?)?;
            Ok(seq.rotr(n))
        }

        TokenKind::Rep => {
            let before = lx.peek.span;
            let n = truncate_u64(ctx, lx, before, literal_expr(ctx, lx, 0)?)?;
            let whole = before.encompass(lx.prev.span);
            if n == 0 {
                return Err(fatal(ctx, lx, Phase::Semantic, whole, "`rep` count must be at least 1"));
            }
            Ok(seq.repeat(n))
        }

        TokenKind::Bpm => {
            let bpm = truncate_u64(ctx, lx, lx.peek.span, literal_expr(ctx, lx, 0)?)?;
            Ok(seq.with_bpm(bpm))
        }

        TokenKind::Map => {
            if !is_literal_primary(lx.peek.kind) {
                return Err(fatal(
                    ctx,
                    lx,
                    Phase::Syntactic,
                    lx.peek.span,
                    "`map` expects at least one note",
                ));
            }
            let mut notes = Vec::new();
            while is_literal_primary(lx.peek.kind) {
                let span = lx.peek.span;
                notes.push(truncate_u64(ctx, lx, span, literal_expr(ctx, lx, 0)?)?);
            }
            Ok(seq.map(&notes))
        }

        TokenKind::Chain => {
            expect(ctx, lx, TokenKind::Ident)?;
            let name_tok = lx.next();
            let name = name_tok.span.slice(lx.source()).to_owned();
            if !ctx.declare_symbol(&name) {
                return Err(fatal(
                    ctx,
                    lx,
                    Phase::Semantic,
                    name_tok.span,
                    SemanticMessage::AlreadyDefined(name).to_string(),
                ));
            }
            ctx.chains.insert(name, seq.clone());
            Ok(seq)
        }

        _ => Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!("expected a sequence infix operator, found {}", tok.kind.describe()),
        )),
    }
}

fn sequence_postfix(ctx: &mut Context, lx: &mut Lexer, seq: Sequence) -> PResult<Sequence> {
    let tok = lx.next();
    match tok.kind {
        TokenKind::Car => Ok(seq.car()),
        TokenKind::Cdr => Ok(seq.cdr()),
        TokenKind::Dbg => {
            let mini = seq.minify();
            let count = if mini.is_empty() { 0 } else { seq.len() / mini.len() };
            ctx.notice(
                Phase::Semantic,
                tok.span,
                format!(
                    "pattern repeats {count} time(s), period {}, total length {}",
                    mini.len(),
                    seq.len()
                ),
            );
            Ok(seq)
        }
        _ => Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!("expected a sequence postfix operator, found {}", tok.kind.describe()),
        )),
    }
}

/// Parses a channel operand (a literal number, or an identifier previously
/// bound by `alias`), validating it falls in `[CHANNEL_MIN, CHANNEL_MAX]`
/// and returning the 0-based index timeline lowering expects.
pub(crate) fn channel(ctx: &mut Context, lx: &mut Lexer) -> PResult<u8> {
    let tok = lx.peek;

    let (chan1, span) = if is_literal(tok.kind) {
        let span = tok.span;
        let n = truncate_u64(ctx, lx, span, literal_expr(ctx, lx, 0)?)?;
        (n, span)
    } else if tok.kind == TokenKind::Ident {
        lx.next();
        let name = tok.span.slice(lx.source());
        let chan0 = ctx.channels.get(name).copied().ok_or_else(|| {
            fatal(
                ctx,
                lx,
                Phase::Semantic,
                tok.span,
                SemanticMessage::Undefined(name.to_owned()).to_string(),
            )
        })?;
        return Ok(chan0);
    } else {
        return Err(fatal(
            ctx,
            lx,
            Phase::Syntactic,
            tok.span,
            format!(
                "expected a channel number or identifier, found {}",
                tok.kind.describe()
            ),
        ));
    };

    if chan1 < u64::from(midi::CHANNEL_MIN) || chan1 > u64::from(midi::CHANNEL_MAX) {
        return Err(fatal(
            ctx,
            lx,
            Phase::Semantic,
            span,
            SemanticMessage::ChannelOutOfRange {
                min: midi::CHANNEL_MIN,
                max: midi::CHANNEL_MAX,
            }
            .to_string(),
        ));
    }

    Ok((chan1 - 1) as u8)
}
