//! End-to-end tests for the Format pipeline: verbatim round trips, the
//! alias-inlining guarantee, tracing configuration and cancellation.

use prettyps_core::error::FormatterError;
use prettyps_core::formatter::{CancelToken, FormatOptions, PostScriptFormatter};
use prettyps_core::tracer::{MemoryResourceProvider, TRACE_PROLOGUE_RESOURCE};

const PROLOGUE: &str = "/#Log { pop } bind def\n/#Log_moveto { pop } bind def";

fn verbatim_formatter() -> PostScriptFormatter {
    PostScriptFormatter::with_options(
        FormatOptions::new()
            .format_code(false)
            .remove_operator_aliases(false),
    )
}

#[test]
fn verbatim_mode_round_trips_the_source() {
    let source = "%!PS-Adobe-3.0\n\n/box {\n  newpath moveto\n} def\n\n10 20 box showpage";
    let output = verbatim_formatter().format(source).expect("formats");
    assert_eq!(output, source);
}

#[test]
fn verbatim_mode_preserves_intra_line_spacing() {
    let source = "10    20   moveto\n\n\n30 40 lineto";
    let output = verbatim_formatter().format(source).expect("formats");
    assert_eq!(output, source);
}

#[test]
fn verbatim_mode_keeps_comments_and_strings() {
    let source = "% header\n(a string (nested)) show  % trailing\n<4142> pop";
    let output = verbatim_formatter().format(source).expect("formats");
    assert_eq!(output, source);
}

#[test]
fn alias_definitions_disappear_from_default_output() {
    let output = PostScriptFormatter::new()
        .format("/myop /lineto load def 10 20 myop")
        .expect("formats");
    assert_eq!(output, "10 20 lineto\n");
}

#[test]
fn alias_inlining_can_be_disabled() {
    let output = PostScriptFormatter::with_options(
        FormatOptions::new().remove_operator_aliases(false),
    )
    .format("/myop /lineto load def 10 20 myop")
    .expect("formats");
    assert!(output.contains("myop"), "alias kept: {output:?}");
    assert!(output.contains("/myop /lineto load def"), "{output:?}");
}

#[test]
fn tracing_requires_a_resource_provider() {
    let err = PostScriptFormatter::with_options(FormatOptions::new().add_tracing(true))
        .format("10 20 moveto")
        .unwrap_err();
    assert!(
        matches!(err, FormatterError::Configuration(_)),
        "got {err:?}"
    );
}

#[test]
fn tracing_instruments_the_output() {
    let mut provider = MemoryResourceProvider::new();
    provider.insert(TRACE_PROLOGUE_RESOURCE, PROLOGUE);

    let output = PostScriptFormatter::with_options(FormatOptions::new().add_tracing(true))
        .resource_provider(provider)
        .format("10 20 moveto")
        .expect("formats");

    assert!(output.starts_with("/#Log"), "prologue first: {output:?}");
    assert!(
        output.contains("([1,7] moveto) #Log_moveto moveto"),
        "{output:?}"
    );
}

#[test]
fn cancelled_runs_return_no_output() {
    let token = CancelToken::new();
    token.cancel();
    let err = PostScriptFormatter::new()
        .cancel_token(token)
        .format("10 20 moveto")
        .unwrap_err();
    assert!(matches!(err, FormatterError::Cancelled), "got {err:?}");
}

#[test]
fn byte_input_must_be_utf8() {
    let err = PostScriptFormatter::new()
        .format_bytes(&[0xff, 0xfe, 0x00])
        .unwrap_err();
    assert!(matches!(err, FormatterError::Reader { .. }), "got {err:?}");
}

#[test]
fn byte_input_formats_like_text() {
    let output = PostScriptFormatter::new()
        .format_bytes(b"{ 1 2 add }")
        .expect("formats");
    assert_eq!(output, "{\n  1 2 add\n}\n");
}

#[test]
fn reader_errors_abort_the_whole_format_call() {
    let err = PostScriptFormatter::new().format("10 20 (oops").unwrap_err();
    assert!(matches!(err, FormatterError::Reader { .. }), "got {err:?}");
}

#[test]
fn blank_input_formats_to_nothing() {
    assert_eq!(PostScriptFormatter::new().format("").unwrap(), "");
}
