//! Compiles a snippet containing a deliberate error and prints every
//! diagnostic that was collected along the way.

use cadence_lang::diagnostics::CollectingReporter;

fn main() {
    let source = "bpm 120  note 60\nsend 1 (beat skip) rep 0";
    let mut reporter = CollectingReporter::new();
    let output = cadence_lang::compile(source.as_bytes(), &mut reporter);

    for diagnostic in &reporter.diagnostics {
        println!(
            "[{:?}/{:?}] {}..{}: {}",
            diagnostic.severity,
            diagnostic.phase,
            diagnostic.span.start,
            diagnostic.span.end,
            diagnostic.message
        );
    }

    match output.timeline {
        Some(tl) => println!("compiled: {} events, duration {}", tl.events.len(), tl.duration),
        None => println!("compilation failed"),
    }
}
