/*!
 * Tests for the directive timeline model
 */

use ssml_prosody::markup::parse;
use ssml_prosody::timeline::{Anchor, DirectiveKind, EmphasisLevel, InterpretAs, Pitch};

#[test]
fn test_anchor_accessors_shouldReportRange() {
    let span = Anchor::Span { start: 3, end: 7 };
    let point = Anchor::Point { offset: 5 };

    assert!(!span.is_point());
    assert_eq!((span.start(), span.end()), (3, 7));
    assert!(point.is_point());
    assert_eq!((point.start(), point.end()), (5, 5));
}

#[test]
fn test_emphasisLevel_gain_shouldMatchTable() {
    assert_eq!(EmphasisLevel::Strong.gain(), 1.5);
    assert_eq!(EmphasisLevel::Moderate.gain(), 1.2);
    assert_eq!(EmphasisLevel::Reduced.gain(), 0.8);
    assert_eq!(EmphasisLevel::None.gain(), 1.0);
}

#[test]
fn test_interpretAs_isSpelled_shouldOnlyCoverSpelling() {
    assert!(InterpretAs::Characters.is_spelled());
    assert!(InterpretAs::SpellOut.is_spelled());
    assert!(!InterpretAs::Cardinal.is_spelled());
    assert!(!InterpretAs::Other.is_spelled());
}

#[test]
fn test_pitch_default_shouldBeNoShift() {
    assert_eq!(Pitch::default(), Pitch::Semitones(0.0));
}

#[test]
fn test_directiveKind_display_shouldUseTagNames() {
    assert_eq!(DirectiveKind::SayAs.to_string(), "say-as");
    assert_eq!(DirectiveKind::AudioInsert.to_string(), "audio");
    assert_eq!(DirectiveKind::Paragraph.to_string(), "p");
}

#[test]
fn test_timeline_iteration_shouldFollowDocumentOrder() {
    let parsed = parse(
        r#"<speak><voice name="v"><break/><emphasis>a</emphasis><audio src="x.wav"/><sub alias="b">c</sub></voice></speak>"#,
    );

    let mut seen = Vec::new();
    for directive in &parsed.timeline {
        seen.push(directive.kind());
    }
    assert_eq!(
        seen,
        vec![
            DirectiveKind::Voice,
            DirectiveKind::Break,
            DirectiveKind::Emphasis,
            DirectiveKind::AudioInsert,
            DirectiveKind::Sub,
        ]
    );
    assert_eq!(parsed.timeline.directives_of_kind(DirectiveKind::Prosody).len(), 0);
    assert!(parsed.timeline.get(5).is_none());
}

#[test]
fn test_directive_text_shouldBeEmptyForPointsAndVoices() {
    let parsed = parse(r#"<speak><voice name="v">hi<break/></voice></speak>"#);
    for directive in &parsed.timeline {
        assert_eq!(directive.text(), "");
    }
}

#[test]
fn test_firstVoice_shouldSkipUnnamedVoices() {
    let parsed = parse(r#"<speak><voice>a</voice> <voice name="second">b</voice></speak>"#);
    assert_eq!(parsed.timeline.first_voice(), Some("second"));
    assert_eq!(parse("<speak>none</speak>").timeline.first_voice(), None);
}

#[test]
fn test_timeline_serializeThenDeserialize_shouldBeEqual() {
    let parsed = parse(r#"<speak><prosody rate="slow" volume="loud">x</prosody><break time="1s"/></speak>"#);

    let json = serde_json::to_string(&parsed.timeline).unwrap();
    assert!(json.starts_with('['));
    let reloaded: ssml_prosody::DirectiveTimeline = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, parsed.timeline);
}
