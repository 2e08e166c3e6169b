//! Compilation-scoped state shared by every parse production.

use std::collections::{HashMap, HashSet};

use crate::diagnostics::{Bail, Phase, Reporter};
use crate::lex::Lexer;
use crate::span::Span;
use crate::sequence::Sequence;
use crate::timeline::{Timeline, Unit};

/// All compilation-scoped state: symbol tables, global meta, the time
/// cursor, the accumulating timeline, and the reporter.
///
/// `Context` is created once per [`crate::compile`] call, owns every table,
/// and is consumed at the end to yield the timeline. It borrows the source
/// buffer (for diagnostics) rather than owning a copy.
pub struct Context<'src, 'rep> {
    source: &'src str,
    reporter: &'rep mut dyn Reporter,

    /// Every defined name, across all three categories below, used to
    /// detect cross-category collisions (an `alias` cannot shadow a
    /// `chain`, etc).
    pub symbols: HashSet<String>,
    /// `alias` bindings: name → 0-based channel index.
    pub channels: HashMap<String, u8>,
    /// `let` bindings: name → numeric value.
    pub constants: HashMap<String, f64>,
    /// `chain` bindings: name → sequence value.
    pub chains: HashMap<String, Sequence>,

    /// Required meta: global tempo, set once before any statement.
    pub global_bpm: u64,
    /// Required meta: global default note, set once before any statement.
    pub global_note: u64,

    /// Current statement start time; advances monotonically across
    /// sequential `send` statements.
    pub time: Unit,
    /// The accumulating output timeline.
    pub tl: Timeline,
}

impl<'src, 'rep> Context<'src, 'rep> {
    /// Creates an empty context over `source`, reporting through
    /// `reporter`.
    #[must_use]
    pub fn new(source: &'src str, reporter: &'rep mut dyn Reporter) -> Self {
        Self {
            source,
            reporter,
            symbols: HashSet::new(),
            channels: HashMap::new(),
            constants: HashMap::new(),
            chains: HashMap::new(),
            global_bpm: 0,
            global_note: 0,
            time: 0,
            tl: Timeline::default(),
        }
    }

    /// The source buffer being compiled.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Reports a fatal diagnostic and returns the [`Bail`] sentinel every
    /// parse production propagates with `?`.
    pub fn error(&mut self, phase: Phase, span: Span, message: impl Into<String>) -> Bail {
        let message = message.into();
        self.reporter.error(phase, self.source, span, &message);
        Bail
    }

    /// Reports a non-fatal warning.
    pub fn warning(&mut self, phase: Phase, span: Span, message: impl Into<String>) {
        let message = message.into();
        self.reporter.warning(phase, self.source, span, &message);
    }

    /// Reports a non-fatal informational notice.
    pub fn notice(&mut self, phase: Phase, span: Span, message: impl Into<String>) {
        let message = message.into();
        self.reporter.notice(phase, self.source, span, &message);
    }

    /// Inserts `name` into the flat `symbols` namespace, shared by
    /// `alias`/`let`/`chain`.
    ///
    /// Returns `true` if the name was not already present.
    #[must_use]
    pub fn declare_symbol(&mut self, name: &str) -> bool {
        self.symbols.insert(name.to_owned())
    }
}

/// Reports a fatal diagnostic, preferring a lexical error `lx` recorded on
/// its last scan over the locally-synthesized `phase`/`span`/`message`.
///
/// A bad byte poisons the lexer and turns every following token into
/// `TERMINATOR`; the first production to notice the unexpected token
/// synthesizes its own `SYNTACTIC`/`SEMANTIC` error, which would otherwise
/// bury the real cause. Every call site that raises a `Bail` should go
/// through here instead of `Context::error` directly, so whichever error
/// happened first in the token stream is the one reported.
pub(crate) fn fatal(
    ctx: &mut Context,
    lx: &mut Lexer,
    phase: Phase,
    span: Span,
    message: impl Into<String>,
) -> Bail {
    match lx.take_error() {
        Some(err) => ctx.error(Phase::Lexical, err.span, err.kind.to_string()),
        None => ctx.error(phase, span, message),
    }
}
