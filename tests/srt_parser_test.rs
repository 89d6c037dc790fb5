use assert_fs::prelude::*;
use predicates::prelude::*;
use subroll::{error::Error, srt::UNKNOWN_SEQUENCE, Result, SrtParser};
use tempfile::NamedTempFile;

#[test]
fn test_parse_empty_file() -> Result<()> {
    // Создаем пустой временный файл
    let temp_file = NamedTempFile::new().unwrap();

    let track = SrtParser::parse_file(temp_file.path())?;

    assert!(track.is_empty());
    assert_eq!(track.duration_ms(), 0);

    Ok(())
}

#[test]
fn test_parse_missing_file_is_io_error() {
    let result = SrtParser::parse_file("/definitely/not/here.srt");

    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_parse_valid_srt_file() -> Result<()> {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("movie.srt");
    file.write_str(
        "1\n00:00:01,000 --> 00:00:05,000\nHello, world!\n\n2\n00:00:06,000 --> 00:00:10,000\nThis is a test.\n",
    )
    .unwrap();
    file.assert(predicate::str::contains("-->"));

    let track = SrtParser::parse_file(file.path())?;

    assert_eq!(track.len(), 2);

    let first = &track[0];
    assert_eq!(first.sequence_number, 1);
    assert_eq!(first.start_ms, 1000);
    assert_eq!(first.end_ms, 5000);
    assert_eq!(first.text, "Hello, world!");

    let second = &track[1];
    assert_eq!(second.sequence_number, 2);
    assert_eq!(second.start_ms, 6000);
    assert_eq!(second.end_ms, 10000);
    assert_eq!(second.text, "This is a test.");
    assert_eq!(track.duration_ms(), 10000);

    temp.close().unwrap();
    Ok(())
}

#[test]
fn test_parse_reader() -> Result<()> {
    let content = "1\n00:00:00,500 --> 00:00:01,500\nfrom a reader\n";
    let track = SrtParser::parse_reader(content.as_bytes())?;

    assert_eq!(track.len(), 1);
    assert_eq!(track[0].start_ms, 500);

    Ok(())
}

#[test]
fn test_blocks_are_sorted_by_start() {
    let srt = r#"3
00:00:09,000 --> 00:00:10,000
third

1
00:00:01,000 --> 00:00:02,000
first

2
00:00:05,000 --> 00:00:06,000
second
"#;
    let track = SrtParser::parse_str(srt);

    let texts: Vec<&str> = track.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
    assert_eq!(track.duration_ms(), 10000);
}

#[test]
fn test_equal_starts_keep_file_order() {
    let srt = "1\n00:00:01,000 --> 00:00:03,000\nupper\n\n2\n00:00:01,000 --> 00:00:02,000\nlower\n";
    let track = SrtParser::parse_str(srt);

    assert_eq!(track[0].text, "upper");
    assert_eq!(track[1].text, "lower");
}

#[test]
fn test_malformed_blocks_are_skipped() {
    let srt = r#"1
00:00:01,000 --> 00:00:02,000
good one

2
no timestamp here
lost

3
00:00:03.000 --> 00:00:04.000
dots instead of commas

4
0:00:05,000 --> 00:00:06,000
single digit hour

5
00:00:07,000 --> 00:00:08,000
<i></i>

6
00:00:09,000 --> 00:00:10,000

7
00:00:20,000 --> 00:00:13,000
ends before it starts

8
00:00:11,000 --> 00:00:12,000
good two
"#;
    let track = SrtParser::parse_str(srt);

    assert_eq!(track.len(), 2);
    assert_eq!(track[0].text, "good one");
    assert_eq!(track[1].text, "good two");
    assert_eq!(track[1].sequence_number, 8);
    assert_eq!(track.duration_ms(), 12_000);
}

#[test]
fn test_markup_is_stripped() {
    let srt = "1\n00:00:01,000 --> 00:00:02,000\n<i>Hello</i>\n\n2\n00:00:03,000 --> 00:00:04,000\n<font color=\"#ffff00\">Yellow</font> and <b>bold</b>\n";
    let track = SrtParser::parse_str(srt);

    assert_eq!(track[0].text, "Hello");
    assert_eq!(track[1].text, "Yellow and bold");
}

#[test]
fn test_multiline_text_is_preserved() {
    let srt = "1\n00:00:01,000 --> 00:00:02,000\n  - Who's there?\n- Me.  \n";
    let track = SrtParser::parse_str(srt);

    assert_eq!(track[0].text, "- Who's there?\n- Me.");
}

#[test]
fn test_extra_blank_lines_and_leading_garbage() {
    let srt = "\n\n\n1\n00:00:01,000 --> 00:00:02,000\none\n\n\n\n\n2\n00:00:03,000 --> 00:00:04,000\ntwo\n\n\n";
    let track = SrtParser::parse_str(srt);

    assert_eq!(track.len(), 2);
}

#[test]
fn test_block_with_header_line_before_index() {
    // Номер берется из строки прямо перед временными метками
    let srt = "garbage\n12\n00:01:00,000 --> 00:01:02,500\ntext\n";
    let track = SrtParser::parse_str(srt);

    assert_eq!(track[0].sequence_number, 12);
    assert_eq!(track[0].start_ms, 60_000);
    assert_eq!(track[0].end_ms, 62_500);
}

#[test]
fn test_unparsable_index_uses_sentinel() {
    let srt = "one\n00:00:01,000 --> 00:00:02,000\ntext\n";
    let track = SrtParser::parse_str(srt);

    assert_eq!(track[0].sequence_number, UNKNOWN_SEQUENCE);
    assert_eq!(track[0].sequence(), None);
}

#[test]
fn test_hours_are_parsed() {
    let srt = "1\n01:30:01,000 --> 01:30:05,000\nlate\n";
    let track = SrtParser::parse_str(srt);

    assert_eq!(track[0].start_ms, 5_401_000);
    assert_eq!(track[0].end_ms, 5_405_000);
}

#[test]
fn test_garbage_input_yields_empty_track() {
    assert!(SrtParser::parse_str("").is_empty());
    assert!(SrtParser::parse_str("   \n\n  ").is_empty());
    assert!(SrtParser::parse_str("this is not a subtitle file --> at all").is_empty());
}
