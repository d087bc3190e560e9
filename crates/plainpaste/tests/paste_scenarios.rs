//! End-to-end paste scenarios.
//!
//! Each test feeds a realistic clipboard payload through a [`PasteSession`]
//! and checks the sanitized output together with the reported changes.

use plainpaste::{
    color, sanitize, set_theme_detector, Baseline, BaselineConfig, CaseTransform,
    ClipboardPayload, ColorMode, PasteSession,
};
use serial_test::serial;

fn paste(html: &str, text: &str) -> plainpaste::PasteOutcome {
    PasteSession::for_mode(ColorMode::Light).paste(&ClipboardPayload::new(Some(html), Some(text)))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn red_bold_span() {
    let outcome = paste(
        r#"<span style="color: rgb(255,0,0); font-weight: bold">Hi</span>"#,
        "Hi",
    );
    assert_eq!(outcome.output_markup, "<span>Hi</span>");
    assert_eq!(
        outcome.changes,
        ["Removed red text color", "Removed bold text"]
    );
    assert!(outcome.show_changes());
}

#[test]
fn bold_tag_only() {
    assert_eq!(sanitize("<b>Hello</b>"), "Hello");
}

#[test]
fn blank_plain_text_reports_nothing() {
    let outcome = paste("<p> </p>", "");
    assert!(outcome.changes.is_empty());
}

#[test]
fn unformatted_paste_gets_sentinel() {
    let outcome = paste("<p>Just words</p>", "Just words");
    assert_eq!(outcome.changes, ["No formatting detected"]);
}

#[test]
fn color_names() {
    assert_eq!(color::name("rgb(0,0,0)"), "black");
    assert_eq!(color::name("rgb(18,52,86)"), "#123456");
}

// ============================================================================
// Realistic sources
// ============================================================================

#[test]
fn word_processor_paste() {
    let html = concat!(
        "<html><head><style>p.MsoNormal{margin:0}</style></head><body>\n",
        "<!--StartFragment-->",
        r#"<p class="MsoNormal" style="margin:0in;font-size:12.0pt;font-family:&quot;Times New Roman&quot;,serif">"#,
        r#"Dear <b>team</b>,<o:p></o:p></p>"#,
        r#"<p class="MsoNormal"><u><span style="color:#0070C0">See attached</span></u></p>"#,
        "<!--EndFragment--></body></html>"
    );
    let outcome = paste(html, "Dear team,\nSee attached");

    assert_eq!(
        outcome.output_markup,
        "\n<p>Dear team,</p><p><u><span>See attached</span></u></p>"
    );
    assert_eq!(
        outcome.changes,
        [
            "Removed Times New Roman, serif font",
            "Removed 16px font size",
            "Removed bold text",
            "Removed underline",
            "Removed #0070c0 text color",
        ]
    );
}

#[test]
fn browser_selection_paste() {
    let html = concat!(
        r#"<meta charset="utf-8"><div data-testid="post" style="font-family: Arial, sans-serif; font-size: 14px">"#,
        r#"<h2 id="intro" class="title">Intro</h2>"#,
        r#"<span style="background-color: rgb(255, 255, 0)">highlighted</span> and <code>code</code>"#,
        "</div>"
    );
    let outcome = paste(html, "Intro\nhighlighted and code");

    assert_eq!(
        outcome.output_markup,
        "<div>Intro<span>highlighted</span> and code</div>"
    );
    assert_eq!(
        outcome.changes,
        [
            "Removed Arial, sans-serif font",
            "Removed 21px font size",
            "Removed bold text",
            "Removed yellow background",
        ]
    );
}

#[test]
fn duplicates_collapse_across_elements() {
    let outcome = paste(
        r#"<p><span style="color:red">a</span> <font color="red">b</font> <b style="color:red">c</b></p>"#,
        "a b c",
    );
    assert_eq!(
        outcome.changes,
        ["Removed red text color", "Removed bold text"]
    );
}

#[test]
fn oversized_font_size_step_clamps() {
    let outcome = paste(r#"<font size="+2147483647">big</font>"#, "big");
    assert_eq!(outcome.output_markup, "big");
    assert_eq!(outcome.changes, ["Removed 48px font size"]);
}

#[test]
fn deeply_nested_paste() {
    let html = format!("{}deep", r#"<span style="color:red">"#.repeat(5_000));
    let outcome = paste(&html, "deep");
    assert!(outcome.output_markup.starts_with("<span><span>"));
    assert_eq!(outcome.output_text, "deep");
    assert_eq!(outcome.changes, ["Removed red text color"]);
}

#[test]
fn html_only_payload_lists_nothing() {
    let outcome = PasteSession::for_mode(ColorMode::Light)
        .paste(&ClipboardPayload::html(r#"<span style="color:red">Hi</span>"#));
    assert!(outcome.changes.is_empty());
    assert_eq!(outcome.output_markup, "<span>Hi</span>");
}

// ============================================================================
// Themes and baselines
// ============================================================================

#[test]
#[serial]
fn detected_theme_sets_baseline() {
    set_theme_detector(|| ColorMode::Dark);
    let mut session = PasteSession::detect();
    let outcome = session.paste(&ClipboardPayload::new(
        Some(r#"<span style="color: rgb(74, 222, 128)">ok</span>"#),
        Some("ok"),
    ));
    assert_eq!(outcome.changes, ["No formatting detected"]);

    set_theme_detector(|| ColorMode::Light);
    let mut session = PasteSession::detect();
    let outcome = session.paste(&ClipboardPayload::new(
        Some(r#"<span style="color: rgb(74, 222, 128)">ok</span>"#),
        Some("ok"),
    ));
    assert_eq!(outcome.changes, ["Removed #4ade80 text color"]);
}

#[test]
fn configured_baseline_suppresses_house_style() {
    let config = BaselineConfig::parse(
        "font_family: Inter, sans-serif\nmonospace_markers: [Inter]\nfont_size: 16px\n",
    )
    .unwrap();
    let baseline: Baseline = config.resolve(ColorMode::Light).unwrap();
    let mut session = PasteSession::new(baseline);

    let outcome = session.paste(&ClipboardPayload::new(
        Some(r#"<p style="font-size: 12pt">Body</p>"#),
        Some("Body"),
    ));
    assert_eq!(outcome.changes, ["No formatting detected"]);
}

// ============================================================================
// Edits and case
// ============================================================================

#[test]
fn edit_flow_after_paste() {
    let mut session = PasteSession::for_mode(ColorMode::Light);
    let outcome = session.paste(&ClipboardPayload::new(
        Some(r#"<p style="color:red">Hello</p>"#),
        Some("Hello"),
    ));

    let edited = format!(
        r#"{}<div class="x"><strong>world</strong></div>"#,
        outcome.input_markup
    );
    assert_eq!(session.edit(&edited), "<p>Hello</p><div>world</div>");
}

#[test]
fn title_case_output() {
    let outcome = paste("<p>the QUICK fox</p>", "the QUICK fox");
    assert_eq!(
        CaseTransform::Title.apply(&outcome.output_text),
        "The Quick Fox"
    );
}
