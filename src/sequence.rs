//! Pure operations on [`Sequence`] values: the core data value of this
//! language.
//!
//! Every operation here is a pure function of its inputs — no [`crate::parse::context::Context`],
//! no diagnostics, no fallible coercion. Range-checking of operator
//! arguments (e.g. rejecting `rep 0`) lives in `parse::sequence`, which is
//! the only caller that has a span and a reporter to blame.

use itertools::Itertools;

/// Whether a single step of a [`Sequence`] sounds a note or advances time
/// silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Emits a note-on/note-off pair when lowered.
    Beat,
    /// Advances time without emitting anything.
    Skip,
}

/// A single element of a [`Sequence`]: a beat or a skip, carrying the note
/// value it will sound if it is (or becomes, via [`Sequence::map`]) a beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    /// Beat or skip.
    pub kind: StepKind,
    /// The MIDI note number this step sounds, if it is a beat.
    pub note: u64,
}

impl Step {
    /// Creates a new step.
    #[must_use]
    pub const fn new(kind: StepKind, note: u64) -> Self {
        Self { kind, note }
    }
}

/// An ordered, finite list of [`Step`]s plus a tempo.
///
/// The empty sequence is a representable value (produced by, e.g.,
/// [`Sequence::cdr`] of a one-element sequence) but is never `send`-able in
/// a way that emits notes; lowering an empty sequence simply yields a
/// zero-duration timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The steps, in playback order.
    pub steps: Vec<Step>,
    /// Beats per minute this sequence plays at.
    pub bpm: u64,
}

impl Sequence {
    /// Creates an empty sequence at the given tempo.
    #[must_use]
    pub const fn new(bpm: u64) -> Self {
        Self {
            steps: Vec::new(),
            bpm,
        }
    }

    /// Creates a sequence from an explicit step list.
    #[must_use]
    pub const fn from_steps(steps: Vec<Step>, bpm: u64) -> Self {
        Self { steps, bpm }
    }

    /// Total number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` if this sequence has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of [`StepKind::Beat`] steps.
    #[must_use]
    pub fn beats(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.kind == StepKind::Beat)
            .count()
    }

    /// Number of [`StepKind::Skip`] steps.
    #[must_use]
    pub fn skips(&self) -> usize {
        self.len() - self.beats()
    }

    /// Concatenates `self` followed by `other`.
    #[must_use]
    pub fn cat(mut self, other: Sequence) -> Sequence {
        self.steps.extend(other.steps);
        self
    }

    /// Element-wise boolean OR of beat/skip kinds, truncated to
    /// `min(|self|, |other|)`. Resulting notes are taken from `self`.
    #[must_use]
    pub fn or(self, other: Sequence) -> Sequence {
        self.zip_bool(other, |a, b| a || b)
    }

    /// Element-wise boolean AND, truncated to `min(|self|, |other|)`.
    #[must_use]
    pub fn and(self, other: Sequence) -> Sequence {
        self.zip_bool(other, |a, b| a && b)
    }

    /// Element-wise boolean XOR, truncated to `min(|self|, |other|)`.
    #[must_use]
    pub fn xor(self, other: Sequence) -> Sequence {
        self.zip_bool(other, |a, b| a != b)
    }

    fn zip_bool(self, other: Sequence, f: impl Fn(bool, bool) -> bool) -> Sequence {
        let bpm = self.bpm;
        let steps = self
            .steps
            .into_iter()
            .zip(other.steps)
            .map(|(a, b)| {
                let is_beat = f(a.kind == StepKind::Beat, b.kind == StepKind::Beat);
                Step::new(
                    if is_beat { StepKind::Beat } else { StepKind::Skip },
                    a.note,
                )
            })
            .collect();
        Sequence::from_steps(steps, bpm)
    }

    /// Rotates steps left by `n mod len()` positions. A no-op on the empty
    /// sequence.
    #[must_use]
    pub fn rotl(mut self, n: u64) -> Sequence {
        let len = self.len();
        if len == 0 {
            return self;
        }
        let n = (n as usize) % len;
        self.steps.rotate_left(n);
        self
    }

    /// Rotates steps right by `n mod len()` positions. A no-op on the empty
    /// sequence.
    #[must_use]
    pub fn rotr(mut self, n: u64) -> Sequence {
        let len = self.len();
        if len == 0 {
            return self;
        }
        let n = (n as usize) % len;
        self.steps.rotate_right(n);
        self
    }

    /// Concatenates `self` with itself `n` times (`n >= 1`).
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`; callers must reject `rep 0` as a semantic error
    /// before reaching here (see `parse::sequence`).
    #[must_use]
    pub fn repeat(self, n: u64) -> Sequence {
        assert!(n >= 1, "repeat count must be at least 1");
        let bpm = self.bpm;
        let mut steps = Vec::with_capacity(self.steps.len() * n as usize);
        for _ in 0..n {
            steps.extend_from_slice(&self.steps);
        }
        Sequence::from_steps(steps, bpm)
    }

    /// Reverses step order (each step's note travels with it).
    #[must_use]
    pub fn reverse(mut self) -> Sequence {
        self.steps.reverse();
        self
    }

    /// Swaps every [`StepKind::Beat`] with [`StepKind::Skip`] and vice
    /// versa.
    #[must_use]
    pub fn invert(mut self) -> Sequence {
        for step in &mut self.steps {
            step.kind = match step.kind {
                StepKind::Beat => StepKind::Skip,
                StepKind::Skip => StepKind::Beat,
            };
        }
        self
    }

    /// The first step only, as a length-1 sequence. Empty if `self` was
    /// empty.
    #[must_use]
    pub fn car(mut self) -> Sequence {
        self.steps.truncate(1);
        self
    }

    /// All but the first step. Empty if `self` had zero or one steps — a
    /// one-element sequence's `cdr` is the accepted empty sequence, not an
    /// error: lowering it simply yields a zero-duration timeline.
    #[must_use]
    pub fn cdr(mut self) -> Sequence {
        if !self.steps.is_empty() {
            self.steps.remove(0);
        }
        self
    }

    /// Applies `notes` cyclically to every step's note field, beat or skip
    /// alike (a skip's note is retained only so that a later
    /// beat-promoting operator, e.g. a future `invert`, sees an intentional
    /// value instead of a stale default).
    ///
    /// # Panics
    ///
    /// Panics if `notes` is empty; `parse::sequence` never constructs an
    /// empty note list for `map`.
    #[must_use]
    pub fn map(mut self, notes: &[u64]) -> Sequence {
        assert!(!notes.is_empty(), "map requires at least one note");
        for (step, &note) in self.steps.iter_mut().zip(notes.iter().cycle()) {
            step.note = note;
        }
        self
    }

    /// Sets this sequence's tempo.
    #[must_use]
    pub fn with_bpm(mut self, bpm: u64) -> Sequence {
        self.bpm = bpm;
        self
    }

    /// The smallest prefix `p` such that `self` equals `p` repeated some
    /// whole number of times.
    #[must_use]
    pub fn minify(&self) -> Sequence {
        let len = self.len();
        if len == 0 {
            return Sequence::new(self.bpm);
        }
        for period in 1..=len {
            if len % period != 0 {
                continue;
            }
            if self.steps.chunks(period).all_equal() {
                return Sequence::from_steps(self.steps[..period].to_vec(), self.bpm);
            }
        }
        self.clone()
    }

    /// Generates a Euclidean rhythm: for `i` in `[0, steps)`, step `i` is a
    /// beat iff `(i * beats) % steps < beats`.
    ///
    /// # Panics
    ///
    /// Panics if `beats > steps` or `steps == 0`; callers must reject those
    /// as semantic errors before reaching here.
    #[must_use]
    pub fn euclide(beats: u64, steps: u64, note: u64, bpm: u64) -> Sequence {
        assert!(steps > 0, "euclide requires at least one step");
        assert!(beats <= steps, "euclide requires beats <= steps");
        let seq_steps = (0..steps)
            .map(|i| {
                let is_beat = (i * beats) % steps < beats;
                Step::new(
                    if is_beat { StepKind::Beat } else { StepKind::Skip },
                    note,
                )
            })
            .collect();
        Sequence::from_steps(seq_steps, bpm)
    }
}

/// Greatest common divisor, used only by this module's own tests to state
/// the "evenly as possible" algebraic law about Euclidean rhythms.
#[cfg(test)]
fn gcd(a: u64, b: u64) -> u64 {
    num::Integer::gcd(&a, &b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beats_skips(bits: &[bool]) -> Sequence {
        let steps = bits
            .iter()
            .map(|&b| {
                Step::new(
                    if b { StepKind::Beat } else { StepKind::Skip },
                    60,
                )
            })
            .collect();
        Sequence::from_steps(steps, 120)
    }

    fn pattern(seq: &Sequence) -> Vec<bool> {
        seq.steps.iter().map(|s| s.kind == StepKind::Beat).collect()
    }

    #[test]
    fn len_is_beats_plus_skips() {
        let seq = Sequence::euclide(3, 8, 60, 120);
        assert_eq!(seq.len(), seq.beats() + seq.skips());
        assert_eq!(seq.len(), 8);
        assert_eq!(seq.beats(), 3);
    }

    #[test]
    fn euclidean_three_in_eight_matches_golden_pattern() {
        let seq = Sequence::euclide(3, 8, 60, 120);
        assert_eq!(
            pattern(&seq),
            vec![true, false, false, true, false, false, true, false]
        );
    }

    #[test]
    fn euclidean_edge_cases() {
        let all_beats = Sequence::euclide(4, 4, 60, 120);
        assert!(all_beats.steps.iter().all(|s| s.kind == StepKind::Beat));

        let all_skips = Sequence::euclide(0, 4, 60, 120);
        assert!(all_skips.steps.iter().all(|s| s.kind == StepKind::Skip));
    }

    #[test]
    fn euclidean_coprime_distributes_evenly() {
        let seq = Sequence::euclide(5, 8, 60, 120);
        assert_eq!(gcd(5, 8), 1);
        // No two beats are more than ceil(8/5) apart, and no run of skips
        // exceeds that either; spot-check against the known 5:8 pattern.
        assert_eq!(
            pattern(&seq),
            vec![true, false, true, true, false, true, true, false]
        );
    }

    #[test]
    fn reverse_is_involutive() {
        let seq = Sequence::euclide(3, 8, 60, 120);
        assert_eq!(seq.clone().reverse().reverse(), seq);
    }

    #[test]
    fn invert_is_involutive() {
        let seq = Sequence::euclide(3, 8, 60, 120);
        assert_eq!(seq.clone().invert().invert(), seq);
    }

    #[test]
    fn rotl_and_rotr_are_inverse() {
        let seq = Sequence::euclide(3, 8, 60, 120);
        let len = seq.len() as u64;
        assert_eq!(seq.clone().rotl(2).rotr(2), seq);
        assert_eq!(seq.clone().rotl(2), seq.clone().rotr(len - 2));
    }

    #[test]
    fn cat_length_is_the_sum() {
        let a = Sequence::euclide(3, 8, 60, 120);
        let b = Sequence::euclide(2, 5, 60, 120);
        let len_a = a.len();
        let len_b = b.len();
        assert_eq!(a.cat(b).len(), len_a + len_b);
    }

    #[test]
    fn repeat_one_is_identity_and_n_scales_length() {
        let seq = Sequence::euclide(3, 8, 60, 120);
        assert_eq!(seq.clone().repeat(1), seq);
        assert_eq!(Sequence::euclide(3, 8, 60, 120).repeat(4).len(), 32);
    }

    #[test]
    fn minify_of_a_repeated_sequence_matches_minify_of_the_base() {
        let base = beats_skips(&[true, false, true]);
        let repeated = base.clone().repeat(4);
        assert_eq!(repeated.minify(), base.minify());
    }

    #[test]
    fn minify_of_an_already_minimal_sequence_is_itself() {
        let seq = beats_skips(&[true, false, true]);
        assert_eq!(seq.minify(), seq);
    }

    #[test]
    fn or_and_xor_truncate_to_the_shorter_operand() {
        let a = beats_skips(&[true, false, true, false]);
        let b = beats_skips(&[true, true]);
        assert_eq!(pattern(&a.clone().or(b.clone())), vec![true, true]);
        assert_eq!(pattern(&a.and(b)), vec![true, false]);
    }

    #[test]
    fn map_cycles_across_every_step_including_skips() {
        let seq = beats_skips(&[true, false, true, true]).map(&[60, 62, 64]);
        let notes: Vec<u64> = seq.steps.iter().map(|s| s.note).collect();
        assert_eq!(notes, vec![60, 62, 64, 60]);
    }

    #[test]
    fn cdr_of_a_singleton_is_the_empty_sequence() {
        let seq = beats_skips(&[true]);
        assert!(seq.cdr().is_empty());
    }

    #[test]
    fn car_of_empty_stays_empty() {
        let seq = Sequence::new(120);
        assert!(seq.car().is_empty());
    }
}
