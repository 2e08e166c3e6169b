//! A compiler for a small language describing rhythmic MIDI patterns.
//!
//! [`compile`] turns source text into a time-stamped [`timeline::Timeline`]
//! of MIDI events: a lexer and a two-grammar Pratt parser evaluate sequence
//! expressions eagerly against [`sequence::Sequence`] values, `send`
//! statements lower those values onto channels, and a final pass stitches
//! every statement's output into one globally-ordered event stream.
//!
//! ```
//! use cadence_lang::diagnostics::CollectingReporter;
//!
//! let mut reporter = CollectingReporter::new();
//! let output = cadence_lang::compile(b"bpm 120 note 60\nsend 1 3:8", &mut reporter);
//! let timeline = output.timeline.expect("no errors were reported");
//! assert_eq!(timeline.duration, 4_000_000);
//! ```
#![warn(missing_docs)]

pub mod diagnostics;
pub mod lex;
pub mod midi;
pub mod parse;
pub mod sequence;
pub mod span;
pub mod timeline;

use diagnostics::{Phase, Reporter};
use parse::Context;
use span::Span;
use timeline::Timeline;

/// Everything [`compile`] produces: the finished timeline, or `None` if a
/// fatal diagnostic was reported.
#[derive(Debug, Default)]
pub struct CompileOutput {
    /// The finished, finalized timeline. Absent if compilation failed.
    pub timeline: Option<Timeline>,
}

/// Compiles `source` (a UTF-8 byte buffer) into a [`CompileOutput`],
/// reporting diagnostics through `reporter`.
///
/// Invalid UTF-8 is reported as an `ENCODING`-phase error and short-circuits
/// before any lexing begins. Any other fatal diagnostic unwinds the parser
/// without further progress; `compile` always returns rather than panicking
/// on malformed input.
#[must_use]
pub fn compile(source: &[u8], reporter: &mut dyn Reporter) -> CompileOutput {
    let source = match std::str::from_utf8(source) {
        Ok(source) => source,
        Err(err) => {
            let offset = err.valid_up_to();
            reporter.error(
                Phase::Encoding,
                "",
                Span::empty_at(offset),
                "input is not valid UTF-8",
            );
            return CompileOutput { timeline: None };
        }
    };

    let mut ctx = Context::new(source, reporter);
    let mut lx = lex::Lexer::new(source);

    match parse::program(&mut ctx, &mut lx) {
        Ok(()) => {
            let timeline = timeline::finalize(ctx.tl, ctx.global_bpm);
            CompileOutput {
                timeline: Some(timeline),
            }
        }
        Err(_) => CompileOutput { timeline: None },
    }
}
