/*!
 * Tests for track loading and parsing
 */

use anyhow::Result;
use serde_json::json;
use submerge::errors::SubtitleError;
use submerge::subtitle_processor::{Origin, SubtitleEntry, SubtitleFormat, SubtitleSource};
use crate::common;

/// Test timestamp parsing and formatting
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let secs = SubtitleEntry::parse_timestamp(ts).unwrap();
    assert!((secs - 5025.678).abs() < 1e-9);

    assert_eq!(SubtitleEntry::format_timestamp(secs), ts);
}

#[test]
fn test_timestamp_parsing_withInvalidComponents_shouldFail() {
    assert!(SubtitleEntry::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("garbage").is_err());
}

#[test]
fn test_parse_delimited_withMachineThreeFieldLines_shouldNumberByPosition() {
    let content = "# header\n\n1.50 | 3.00 | first\n4.00 | 5.25 | second line\n";
    let outcome = SubtitleSource::parse_delimited(content, Origin::Machine);

    assert_eq!(outcome.len(), 2);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.entries[0].index, 1);
    assert_eq!(outcome.entries[0].start, 1.5);
    assert_eq!(outcome.entries[0].end, 3.0);
    assert_eq!(outcome.entries[1].index, 2);
    assert_eq!(outcome.entries[1].text, "second line");
    assert!(outcome.entries.iter().all(|e| e.origin == Origin::Machine));
}

#[test]
fn test_parse_delimited_withIndexedMachineLines_shouldKeepIndex() {
    let outcome = SubtitleSource::parse_delimited(common::WHISPER_TRACK, Origin::Machine);

    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.entries[2].index, 3);
    assert_eq!(outcome.entries[2].start, 20.0);
    assert_eq!(outcome.entries[2].text, "completely unrelated noise");
}

#[test]
fn test_parse_delimited_withHumanThreeFields_shouldSkipWithDiagnostic() {
    let content = "1 | 1.0 | 2.0 | kept\n1.0 | 2.0 | missing index\n";
    let outcome = SubtitleSource::parse_delimited(content, Origin::Human);

    assert_eq!(outcome.len(), 1);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].location, 2);
}

#[test]
fn test_parse_delimited_withMalformedLines_shouldSkipEachAndContinue() {
    let content = "\
1 | 1.0 | 2.0 | good one
2 | abc | 3.0 | bad start
only two | fields
3 | 4.0 | 5.0 |
0 | 6.0 | 7.0 | zero index
4 | 8.0 | 9.0 | good two
";
    let outcome = SubtitleSource::parse_delimited(content, Origin::Human);

    assert_eq!(outcome.len(), 2);
    assert_eq!(outcome.entries[1].text, "good two");
    assert_eq!(outcome.diagnostics.len(), 4);
    assert!(matches!(outcome.diagnostics[0].error, SubtitleError::InvalidTiming { field: "start", .. }));
    assert!(matches!(outcome.diagnostics[1].error, SubtitleError::WrongFieldCount { expected: 4, found: 2 }));
    assert_eq!(outcome.diagnostics[2].error, SubtitleError::EmptyText);
    assert!(matches!(outcome.diagnostics[3].error, SubtitleError::InvalidIndex(_)));
}

#[test]
fn test_parse_delimited_withPipeInText_shouldKeepRemainder() {
    let outcome = SubtitleSource::parse_delimited("1 | 1.0 | 2.0 | left | right", Origin::Human);
    assert_eq!(outcome.entries[0].text, "left | right");
}

#[test]
fn test_parse_delimited_withEscapedLineBreak_shouldRestoreNewline() {
    let outcome = SubtitleSource::parse_delimited("1.0 | 2.0 | top\\nbottom", Origin::Machine);
    assert_eq!(outcome.entries[0].text, "top\nbottom");
}

#[test]
fn test_parse_delimited_withOnlyComments_shouldReturnEmpty() {
    let outcome = SubtitleSource::parse_delimited("# nothing\n\n# here\n", Origin::Machine);
    assert!(outcome.is_empty());
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_parse_records_withMixedRecords_shouldSkipInvalidOnes() {
    let records = vec![
        json!({"index": 5, "start": 1.0, "end": 2.0, "text": "indexed"}),
        json!({"start": 3.0, "end": 4.0, "text": "unindexed"}),
        json!({"start": "soon", "end": 4.0, "text": "bad"}),
        json!({"start": 5.0, "end": 6.0}),
        json!({"start": 7.0, "end": 8.0, "text": "extra", "duration": 1.0, "source": "whisper"}),
    ];
    let outcome = SubtitleSource::parse_records(&records, Origin::Human);

    assert_eq!(outcome.len(), 3);
    assert_eq!(outcome.entries[0].index, 5);
    assert_eq!(outcome.entries[1].index, 2);
    assert_eq!(outcome.entries[2].text, "extra");
    assert_eq!(outcome.diagnostics.len(), 2);
    assert_eq!(outcome.diagnostics[0].location, 3);
    assert_eq!(outcome.diagnostics[1].location, 4);
}

#[test]
fn test_parse_json_withNonArray_shouldReturnEmptyWithDiagnostic() {
    let outcome = SubtitleSource::parse_json("{\"start\": 1.0}", Origin::Machine);
    assert!(outcome.is_empty());
    assert_eq!(outcome.diagnostics.len(), 1);

    let outcome = SubtitleSource::parse_json("not json at all", Origin::Machine);
    assert!(outcome.is_empty());
    assert_eq!(outcome.diagnostics.len(), 1);
}

#[test]
fn test_parse_srt_withValidBlocks_shouldParseMultilineText() {
    let content = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,500 --> 00:00:09,000
It contains
multiple lines.

x
broken block
";
    let outcome = SubtitleSource::parse_srt(content, Origin::Human);

    assert_eq!(outcome.len(), 2);
    assert_eq!(outcome.entries[0].start, 1.0);
    assert_eq!(outcome.entries[1].start, 5.5);
    assert_eq!(outcome.entries[1].text, "It contains\nmultiple lines.");
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].location, 10);
}

#[test]
fn test_parse_srt_withOutOfRangeTiming_shouldSkipBlock() {
    let content = "1\n00:00:75,000 --> 00:99:80,000\nhello\n\n2\n00:00:01,000 --> 00:00:02,000\nfine\n";
    let outcome = SubtitleSource::parse_srt(content, Origin::Human);

    assert_eq!(outcome.len(), 1);
    assert_eq!(outcome.entries[0].text, "fine");
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].location, 1);
    assert!(matches!(outcome.diagnostics[0].error, SubtitleError::InvalidTiming { .. }));
}

#[test]
fn test_parse_delimited_withEscapedBackslash_shouldKeepLiteralBackslash() {
    let outcome = SubtitleSource::parse_delimited("1 | 1.0 | 2.0 | C:\\\\new\\\\notes", Origin::Human);
    assert_eq!(outcome.entries[0].text, "C:\\new\\notes");
}

#[test]
fn test_subtitle_format_fromPath_shouldDetectByExtension() {
    assert_eq!(SubtitleFormat::from_path("a/b/track.JSON"), SubtitleFormat::Json);
    assert_eq!(SubtitleFormat::from_path("track.srt"), SubtitleFormat::Srt);
    assert_eq!(SubtitleFormat::from_path("track.txt"), SubtitleFormat::Delimited);
    assert_eq!(SubtitleFormat::from_path("track"), SubtitleFormat::Delimited);
}

#[test]
fn test_load_withMissingFile_shouldReturnEmptyOutcome() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let outcome = SubtitleSource::load(temp_dir.path().join("absent.txt"), Origin::Human)?;

    assert!(outcome.is_empty());
    assert_eq!(outcome.origin, Origin::Human);
    Ok(())
}

#[test]
fn test_load_withJsonFile_shouldUseRecordParser() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "whisper_subtitles.json",
        r#"[{"index": 1, "start": 0.5, "end": 1.5, "text": "hi", "source": "whisper"}]"#,
    )?;

    let outcome = SubtitleSource::load(&path, Origin::Machine)?;
    assert_eq!(outcome.len(), 1);
    assert_eq!(outcome.entries[0].text, "hi");
    Ok(())
}

#[test]
fn test_with_offset_shouldShiftAndClampAtZero() {
    let outcome = SubtitleSource::parse_delimited("0.50 | 2.00 | a\n3.00 | 4.00 | b", Origin::Machine);
    let shifted = outcome.with_offset(-1.0);

    assert_eq!(shifted.entries[0].start, 0.0);
    assert_eq!(shifted.entries[0].end, 1.0);
    assert_eq!(shifted.entries[1].start, 2.0);
}

#[test]
fn test_new_validated_withEndBeforeStart_shouldStillAccept() {
    let entry = SubtitleEntry::new_validated(1, 5.0, 4.0, "  backwards  ", Origin::Machine).unwrap();
    assert_eq!(entry.text, "backwards");
    assert!(entry.duration() < 0.0);
}
