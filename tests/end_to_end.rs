//! End-to-end scenarios compiling literal source snippets and inspecting
//! the resulting timeline.

use cadence_lang::diagnostics::CollectingReporter;
use cadence_lang::midi;

fn compile_ok(source: &str) -> cadence_lang::timeline::Timeline {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(source.as_bytes(), &mut reporter);
    assert!(
        reporter.errors().is_empty(),
        "unexpected errors: {:?}",
        reporter.errors()
    );
    output.timeline.expect("compilation should have produced a timeline")
}

fn note_ons(tl: &cadence_lang::timeline::Timeline, chan0: u8) -> Vec<i64> {
    tl.events
        .iter()
        .filter(|e| e.status == midi::channel_status(midi::NOTE_ON, chan0))
        .map(|e| e.time)
        .collect()
}

#[test]
fn euclidean_three_in_eight_on_channel_one() {
    let tl = compile_ok("bpm 120  note 60\nsend 1 3:8");
    assert_eq!(tl.duration, 4_000_000);
    assert_eq!(note_ons(&tl, 0), vec![0, 1_500_000, 3_000_000]);
}

#[test]
fn parallel_branches_share_a_start_time() {
    let tl = compile_ok("bpm 120  note 60\nsend 1 beat beat skip beat $ send 2 skip beat skip beat");
    assert_eq!(tl.duration, 2_000_000);
    assert_eq!(note_ons(&tl, 0).len(), 3);
    assert_eq!(note_ons(&tl, 1).len(), 2);
}

#[test]
fn rotl_then_rotr_is_the_inverse() {
    let with_rotation = compile_ok("bpm 100  note 60\nsend 1 (3:8 rotl 2) rotr 2");
    let plain = compile_ok("bpm 100  note 60\nsend 1 3:8");
    assert_eq!(note_ons(&with_rotation, 0), note_ons(&plain, 0));
}

#[test]
fn map_cycles_notes_across_every_step() {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(
        b"bpm 100  note 60\nsend 1 beat beat beat beat map 60 62 64",
        &mut reporter,
    );
    assert!(reporter.errors().is_empty());
    let tl = output.timeline.unwrap();
    let notes: Vec<u8> = tl
        .events
        .iter()
        .filter(|e| e.status == midi::channel_status(midi::NOTE_ON, 0))
        .map(|e| e.data1)
        .collect();
    assert_eq!(notes, vec![60, 62, 64, 60]);
}

#[test]
fn chain_bindings_can_be_reused_and_reversed() {
    let a = compile_ok("bpm 120  note 60\nbeat skip beat chain base\nsend 1 base cat (base rev)");
    let b = compile_ok("bpm 120  note 60\nsend 1 beat skip beat beat skip beat");
    assert_eq!(note_ons(&a, 0), note_ons(&b, 0));
}

#[test]
fn rep_zero_is_a_semantic_error() {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(b"bpm 120  note 60\nsend 1 (beat skip) rep 0", &mut reporter);
    assert!(output.timeline.is_none());
    assert_eq!(reporter.errors().len(), 1);
    assert_eq!(
        reporter.errors()[0].phase,
        cadence_lang::diagnostics::Phase::Semantic
    );
}

#[test]
fn missing_meta_prelude_is_rejected() {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(b"send 1 3:8", &mut reporter);
    assert!(output.timeline.is_none());
    assert!(!reporter.errors().is_empty());
}

#[test]
fn bare_sequence_statement_produces_no_events_but_still_compiles() {
    let tl = compile_ok("bpm 120  note 60\nbeat skip beat\nsend 1 3:8");
    assert_eq!(tl.duration, 4_000_000);
}
