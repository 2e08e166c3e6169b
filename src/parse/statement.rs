//! The statement grammar: the meta prelude (`bpm`/`note`), `alias`, `let`,
//! `send` (with its `$`-joined parallel branches), and bare sequence
//! statements.

use crate::diagnostics::{Phase, PResult};
use crate::lex::{Lexer, TokenKind};
use crate::parse::context::{fatal, Context};
use crate::parse::errors::SemanticMessage;
use crate::parse::literal::{expect, literal_expr, truncate_u64};
use crate::parse::sequence::{channel, sequence_expr};
use crate::timeline::{self, Unit};

/// Reports a pending lexical error, if `lx` recorded one on its last scan.
///
/// Called after every token the outer statement loop itself consumes, so a
/// bad byte is tagged `LEXICAL` rather than surfacing later as a confusing
/// `SYNTACTIC` "expected ..., found end of input".
pub(crate) fn check_lexical(ctx: &mut Context, lx: &mut Lexer) -> PResult<()> {
    match lx.take_error() {
        Some(err) => Err(ctx.error(Phase::Lexical, err.span, err.kind.to_string())),
        None => Ok(()),
    }
}

/// Parses and evaluates an entire program: the meta prelude followed by
/// zero or more statements, up to `TERMINATOR`.
pub fn program(ctx: &mut Context, lx: &mut Lexer) -> PResult<()> {
    check_lexical(ctx, lx)?;
    meta_prelude(ctx, lx)?;
    while lx.peek.kind != TokenKind::Terminator {
        statement(ctx, lx)?;
        check_lexical(ctx, lx)?;
    }
    Ok(())
}

/// Consumes the leading run of `bpm`/`note` meta statements, requiring
/// exactly one of each (in either order) before falling through to the
/// statement loop.
fn meta_prelude(ctx: &mut Context, lx: &mut Lexer) -> PResult<()> {
    let mut bpm = None;
    let mut note = None;

    while matches!(lx.peek.kind, TokenKind::Bpm | TokenKind::Note) {
        let tok = lx.next();
        check_lexical(ctx, lx)?;
        let value = truncate_u64(ctx, lx, tok.span, literal_expr(ctx, lx, 0)?)?;

        match tok.kind {
            TokenKind::Bpm if bpm.is_some() => {
                return Err(fatal(ctx, lx, Phase::Semantic, tok.span, "`bpm` given more than once"));
            }
            TokenKind::Bpm => bpm = Some(value),
            TokenKind::Note if note.is_some() => {
                return Err(fatal(ctx, lx, Phase::Semantic, tok.span, "`note` given more than once"));
            }
            TokenKind::Note => note = Some(value),
            _ => unreachable!("guarded by the while condition"),
        }
    }

    let bpm = bpm.ok_or_else(|| {
        fatal(
            ctx,
            lx,
            Phase::Semantic,
            lx.peek.span,
            "missing `bpm` in the meta prelude",
        )
    })?;
    if bpm == 0 {
        return Err(fatal(ctx, lx, Phase::Semantic, lx.peek.span, "`bpm` must be positive"));
    }
    let note = note.ok_or_else(|| {
        fatal(
            ctx,
            lx,
            Phase::Semantic,
            lx.peek.span,
            "missing `note` in the meta prelude",
        )
    })?;

    ctx.global_bpm = bpm;
    ctx.global_note = note;
    Ok(())
}

fn statement(ctx: &mut Context, lx: &mut Lexer) -> PResult<()> {
    match lx.peek.kind {
        TokenKind::Alias => alias_stmt(ctx, lx),
        TokenKind::Let => let_stmt(ctx, lx),
        TokenKind::Send => send_stmt(ctx, lx),
        _ => {
            // A bare sequence expression is legal but produces no output;
            // evaluate it for its side effects (`chain`, `dbg`) and discard.
            sequence_expr(ctx, lx, 0)?;
            Ok(())
        }
    }
}

fn alias_stmt(ctx: &mut Context, lx: &mut Lexer) -> PResult<()> {
    lx.next();
    expect(ctx, lx, TokenKind::Ident)?;
    let name_tok = lx.next();
    let name = name_tok.span.slice(lx.source()).to_owned();

    let chan_span = lx.peek.span;
    let chan1 = truncate_u64(ctx, lx, chan_span, literal_expr(ctx, lx, 0)?)?;
    if chan1 < u64::from(crate::midi::CHANNEL_MIN) || chan1 > u64::from(crate::midi::CHANNEL_MAX) {
        return Err(fatal(
            ctx,
            lx,
            Phase::Semantic,
            chan_span,
            SemanticMessage::ChannelOutOfRange {
                min: crate::midi::CHANNEL_MIN,
                max: crate::midi::CHANNEL_MAX,
            }
            .to_string(),
        ));
    }

    if !ctx.declare_symbol(&name) {
        return Err(fatal(
            ctx,
            lx,
            Phase::Semantic,
            name_tok.span,
            SemanticMessage::AlreadyDefined(name).to_string(),
        ));
    }
    ctx.channels.insert(name, (chan1 - 1) as u8);
    Ok(())
}

fn let_stmt(ctx: &mut Context, lx: &mut Lexer) -> PResult<()> {
    lx.next();
    expect(ctx, lx, TokenKind::Ident)?;
    let name_tok = lx.next();
    let name = name_tok.span.slice(lx.source()).to_owned();

    let value = literal_expr(ctx, lx, 0)?;

    if !ctx.declare_symbol(&name) {
        return Err(fatal(
            ctx,
            lx,
            Phase::Semantic,
            name_tok.span,
            SemanticMessage::AlreadyDefined(name).to_string(),
        ));
    }
    ctx.constants.insert(name, value);
    Ok(())
}

fn send_stmt(ctx: &mut Context, lx: &mut Lexer) -> PResult<()> {
    let orig = ctx.time;
    send_branch(ctx, lx, orig)?;
    while lx.peek.kind == TokenKind::With {
        lx.next();
        expect(ctx, lx, TokenKind::Send)?;
        send_branch(ctx, lx, orig)?;
    }
    Ok(())
}

fn send_branch(ctx: &mut Context, lx: &mut Lexer, orig: Unit) -> PResult<()> {
    lx.next();
    let chan0 = channel(ctx, lx)?;
    let seq = sequence_expr(ctx, lx, 0)?;

    let partial = timeline::lower_sequence(&seq, chan0, orig);
    ctx.time = ctx.time.max(partial.duration);
    ctx.tl.duration = ctx.tl.duration.max(partial.duration);
    ctx.tl.events.extend(partial.events);
    Ok(())
}
