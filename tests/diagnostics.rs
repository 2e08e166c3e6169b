//! Diagnostic-dispatch behavior: phase tagging, fatal unwinding, and that
//! warnings/notices never stop compilation.

use cadence_lang::diagnostics::{CollectingReporter, Phase, Severity};

#[test]
fn unrecognized_character_is_tagged_lexical() {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(b"bpm 120 note 60\nsend 1 @", &mut reporter);
    assert!(output.timeline.is_none());
    let errors = reporter.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].phase, Phase::Lexical);
}

#[test]
fn undefined_name_is_tagged_semantic() {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(b"bpm 120 note 60\nsend 1 missing", &mut reporter);
    assert!(output.timeline.is_none());
    assert_eq!(reporter.errors()[0].phase, Phase::Semantic);
}

#[test]
fn unterminated_paren_is_tagged_syntactic() {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(b"bpm 120 note 60\nsend 1 (beat skip", &mut reporter);
    assert!(output.timeline.is_none());
    assert_eq!(reporter.errors()[0].phase, Phase::Syntactic);
}

#[test]
fn invalid_utf8_is_tagged_encoding() {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(&[0x62, 0x70, 0xff, 0xfe], &mut reporter);
    assert!(output.timeline.is_none());
    assert_eq!(reporter.errors()[0].phase, Phase::Encoding);
}

#[test]
fn dbg_reports_a_non_fatal_notice_and_does_not_drop_the_sequence() {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(b"bpm 120 note 60\nsend 1 3:8 dbg", &mut reporter);
    assert!(
        output.timeline.is_some(),
        "a notice must not abort compilation"
    );
    assert!(reporter.errors().is_empty());
    assert!(reporter
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Notice));
}

#[test]
fn first_fatal_error_stops_the_parser_without_a_cascade() {
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(b"bpm 120 note 60\nsend 1 undefined_a undefined_b", &mut reporter);
    assert!(output.timeline.is_none());
    assert_eq!(
        reporter.errors().len(),
        1,
        "bailing on the first undefined name must not let the parser keep going"
    );
}
