use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::document::TagRanges;
use super::error::{AppError, Result};
use super::position::{offset_to_pos, pos_to_offset, Pos};

/// On-disk shape of a script: the full text plus tag ranges addressed as
/// "line.column" position strings. Both keys default so files written by
/// older versions (or by hand) still open.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ScriptFile {
    #[serde(default)]
    text: String,
    #[serde(default)]
    tags: BTreeMap<String, Vec<(String, String)>>,
}

/// Serialize a document's text and tag ranges to script JSON.
pub fn encode(text: &str, ranges: &TagRanges) -> Result<String> {
    let mut tags = BTreeMap::new();
    for (tag, tag_ranges) in ranges {
        let pairs: Vec<(String, String)> = tag_ranges
            .iter()
            .map(|&(start, end)| {
                (
                    offset_to_pos(text, start).to_string(),
                    offset_to_pos(text, end).to_string(),
                )
            })
            .collect();
        if !pairs.is_empty() {
            tags.insert(tag.clone(), pairs);
        }
    }
    let file = ScriptFile {
        text: text.to_string(),
        tags,
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Parse script JSON back into (text, tag ranges). Position strings that
/// don't parse or don't resolve against the text are an error; the caller
/// keeps its current document on any failure.
pub fn decode(data: &str) -> Result<(String, TagRanges)> {
    let file: ScriptFile = serde_json::from_str(data)?;
    let mut ranges = TagRanges::new();
    for (tag, pairs) in &file.tags {
        let mut resolved = Vec::with_capacity(pairs.len());
        for (start, end) in pairs {
            let start_pos: Pos = start.parse()?;
            let end_pos: Pos = end.parse()?;
            let start = pos_to_offset(&file.text, start_pos).ok_or_else(|| {
                AppError::Script(format!("position {} outside text", start_pos))
            })?;
            let end = pos_to_offset(&file.text, end_pos)
                .ok_or_else(|| AppError::Script(format!("position {} outside text", end_pos)))?;
            if start < end {
                resolved.push((start, end));
            }
        }
        if !resolved.is_empty() {
            resolved.sort_unstable();
            ranges.insert(tag.clone(), resolved);
        }
    }
    Ok((file.text, ranges))
}

pub fn read_script(path: &Path) -> Result<(String, TagRanges)> {
    let data = fs::read_to_string(path)?;
    decode(&data)
}

pub fn write_script(path: &Path, text: &str, ranges: &TagRanges) -> Result<()> {
    let json = encode(text, ranges)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(entries: &[(&str, &[(usize, usize)])]) -> TagRanges {
        entries
            .iter()
            .map(|(tag, r)| (tag.to_string(), r.to_vec()))
            .collect()
    }

    #[test]
    fn test_round_trip_single_line() {
        let text = "Hello World";
        let input = ranges(&[("style2", &[(0, 5)]), ("body", &[(6, 11)])]);
        let (decoded_text, decoded) = decode(&encode(text, &input).unwrap()).unwrap();
        assert_eq!(decoded_text, text);
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_round_trip_multi_line() {
        let text = "Welcome!\n\nHighlight text and apply a style.";
        let input = ranges(&[
            ("body", &[(0, 8), (10, 24)]),
            ("style2", &[(25, 30)]),
            ("style3", &[(31, 43)]),
        ]);
        let (decoded_text, decoded) = decode(&encode(text, &input).unwrap()).unwrap();
        assert_eq!(decoded_text, text);
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_position_string_format() {
        let text = "ab\ncd";
        let input = ranges(&[("style2", &[(3, 5)])]);
        let json = encode(text, &input).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        // second line, columns 0 and 2 -> "2.0" / "2.2"
        assert_eq!(value["tags"]["style2"][0][0], "2.0");
        assert_eq!(value["tags"]["style2"][0][1], "2.2");
        assert_eq!(value["text"], "ab\ncd");
    }

    #[test]
    fn test_decode_missing_keys_default() {
        let (text, tags) = decode("{}").unwrap();
        assert_eq!(text, "");
        assert!(tags.is_empty());

        let (text, tags) = decode(r#"{"text": "just text"}"#).unwrap();
        assert_eq!(text, "just text");
        assert!(tags.is_empty());

        let (text, tags) = decode(r#"{"tags": {}}"#).unwrap();
        assert_eq!(text, "");
        assert!(tags.is_empty());
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(matches!(decode("not json"), Err(AppError::Json(_))));
        assert!(matches!(decode(r#"{"text": 42}"#), Err(AppError::Json(_))));
    }

    #[test]
    fn test_decode_bad_position_string() {
        let data = r#"{"text": "hello", "tags": {"style2": [["zero", "1.5"]]}}"#;
        assert!(matches!(decode(data), Err(AppError::Script(_))));
    }

    #[test]
    fn test_decode_position_outside_text() {
        let data = r#"{"text": "hi", "tags": {"style2": [["4.0", "4.2"]]}}"#;
        assert!(matches!(decode(data), Err(AppError::Script(_))));
    }

    #[test]
    fn test_decode_drops_empty_ranges() {
        let data = r#"{"text": "hello", "tags": {"style2": [["1.2", "1.2"]]}}"#;
        let (_, tags) = decode(data).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_unknown_tags_round_trip() {
        let text = "kept verbatim";
        let input = ranges(&[("style7", &[(0, 4)])]);
        let (_, decoded) = decode(&encode(text, &input).unwrap()).unwrap();
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take1.teleprompt");
        let text = "Hello World";
        let input = ranges(&[("style2", &[(0, 5)])]);
        write_script(&path, text, &input).unwrap();
        let (read_text, read_ranges) = read_script(&path).unwrap();
        assert_eq!(read_text, text);
        assert_eq!(read_ranges, input);
    }

    #[test]
    fn test_export_import_scenario() {
        use crate::app::document::ScriptDocument;
        use crate::app::styles::StyleRegistry;

        let registry = StyleRegistry::default();
        let mut doc = ScriptDocument::new("");
        doc.load_from("Hello World", &TagRanges::new());

        // style "Hello" with preset 1 and export
        let tag = registry.tag_for(1);
        assert!(doc.apply_style(0, 5, &tag, &registry.known_tags()));
        assert!(doc.is_dirty());
        let exported = encode(doc.text(), &doc.tag_ranges()).unwrap();
        doc.mark_clean();

        // fresh session imports the same script
        let (text, ranges) = decode(&exported).unwrap();
        let mut reloaded = ScriptDocument::new("");
        reloaded.load_from(&text, &ranges);
        assert!(!reloaded.is_dirty());
        assert_eq!(reloaded.text(), "Hello World");
        for off in 0..5 {
            assert_eq!(reloaded.tag_at(off), Some("style2"));
        }
        for off in 6..11 {
            assert_eq!(reloaded.tag_at(off), None);
        }
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.teleprompt");
        assert!(matches!(read_script(&path), Err(AppError::Io(_))));
    }
}
