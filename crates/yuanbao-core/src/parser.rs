//! Reading raw `conversation/v1/detail` payloads into a [`Transcript`]
//!
//! Only the root is validated structurally. Everything below `convs` is read
//! leniently: missing or wrong-typed fields become `None` / empty.

use serde_json::{Map, Value};

use crate::error::{ExportError, Result};
use crate::types::{ContentBlock, MediaKind, SearchDoc, Speaker, Speech, Transcript, Turn};

/// Parse payload text and normalize it
pub fn parse_transcript_str(raw: &str) -> Result<Transcript> {
    let value: Value = serde_json::from_str(raw)?;
    read_transcript(&value)
}

/// Normalize an already-parsed payload
pub fn read_transcript(value: &Value) -> Result<Transcript> {
    let root = value
        .as_object()
        .ok_or_else(|| ExportError::InvalidData("root is not an object".to_string()))?;

    let convs = match root.get("convs") {
        Some(Value::Array(convs)) => convs,
        Some(_) => return Err(ExportError::InvalidData("`convs` is not an array".to_string())),
        None => return Err(ExportError::InvalidData("missing `convs`".to_string())),
    };

    let turns: Vec<Turn> = convs.iter().map(read_turn).collect();
    debug!(turns = turns.len(), "read transcript");

    Ok(Transcript { turns })
}

fn read_turn(value: &Value) -> Turn {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);

    let speeches = obj
        .get("speechesV2")
        .and_then(Value::as_array)
        .map(|speeches| speeches.iter().map(read_speech).collect())
        .unwrap_or_default();

    Turn {
        speaker: Speaker::from_tag(str_field(obj, "speaker").as_deref()),
        index: obj.get("index").and_then(Value::as_i64),
        display_prompt: str_field(obj, "displayPrompt"),
        speeches,
    }
}

fn read_speech(value: &Value) -> Speech {
    let blocks = value
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| blocks.iter().map(read_block).collect())
        .unwrap_or_default();
    Speech { blocks }
}

/// Interpret one content block by its `type` tag
pub fn read_block(value: &Value) -> ContentBlock {
    let empty = Map::new();
    let obj = value.as_object().unwrap_or(&empty);
    let kind = str_field(obj, "type");

    let media = |kind: MediaKind| ContentBlock::Media {
        kind,
        file_name: str_field(obj, "fileName"),
        url: str_field(obj, "url"),
    };

    match kind.as_deref() {
        Some("text") => ContentBlock::Text {
            msg: str_field(obj, "msg"),
        },
        Some("think") => ContentBlock::Think {
            content: str_field(obj, "content"),
        },
        Some("searchGuid") => ContentBlock::SearchGuid {
            msg: str_field(obj, "msg"),
            content: str_field(obj, "content"),
            docs: obj
                .get("docs")
                .and_then(Value::as_array)
                .map(|docs| docs.iter().map(read_doc).collect())
                .unwrap_or_default(),
        },
        Some("image") => media(MediaKind::Image),
        Some("code") => media(MediaKind::Code),
        Some("pdf") => media(MediaKind::Pdf),
        other => {
            trace!(kind = ?other, "unrecognized block type");
            ContentBlock::Unknown {
                kind: other.map(str::to_string),
                file_name: str_field(obj, "fileName"),
                url: str_field(obj, "url"),
            }
        }
    }
}

fn read_doc(value: &Value) -> SearchDoc {
    SearchDoc {
        title: value.get("title").and_then(Value::as_str).map(str::to_string),
        url: value.get("url").and_then(Value::as_str).map(str::to_string),
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_missing_convs() {
        let err = read_transcript(&json!({"createTime": 1})).unwrap_err();
        assert!(matches!(err, ExportError::InvalidData(_)));
    }

    #[test]
    fn test_rejects_non_array_convs() {
        let err = read_transcript(&json!({"convs": {"0": {}}})).unwrap_err();
        assert!(matches!(err, ExportError::InvalidData(_)));

        let err = read_transcript(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ExportError::InvalidData(_)));
    }

    #[test]
    fn test_accepts_empty_convs() {
        let transcript = read_transcript(&json!({"convs": []})).unwrap();
        assert!(transcript.turns.is_empty());
    }

    #[test]
    fn test_reads_turns_and_blocks() {
        let transcript = read_transcript(&json!({
            "convs": [
                {
                    "speaker": "ai",
                    "index": 2,
                    "speechesV2": [
                        {"content": [
                            {"type": "think", "content": "hmm"},
                            {"type": "searchGuid", "msg": "a [1](@ref)", "docs": [{"title": "T", "url": "U"}, {}]},
                            {"type": "image", "fileName": "cat.png", "url": "https://img/cat.png"},
                            {"type": "mystery", "payload": 1}
                        ]}
                    ]
                },
                {"speaker": "human", "index": 1, "displayPrompt": "hi"}
            ]
        }))
        .unwrap();

        assert_eq!(transcript.turns.len(), 2);
        let ai = &transcript.turns[0];
        assert_eq!(ai.speaker, Speaker::Ai);
        assert_eq!(ai.index, Some(2));

        let blocks: Vec<_> = ai.blocks().collect();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], &ContentBlock::Think { content: Some("hmm".into()) });
        match blocks[1] {
            ContentBlock::SearchGuid { docs, .. } => {
                assert_eq!(docs.len(), 2);
                assert_eq!(docs[1].display_title(), "无标题");
                assert_eq!(docs[1].display_url(), "#");
            }
            other => panic!("expected searchGuid, got {:?}", other),
        }
        assert_eq!(blocks[2].kind(), "image");
        assert_eq!(blocks[3].kind(), "mystery");

        let human = &transcript.turns[1];
        assert_eq!(human.speaker, Speaker::Human);
        assert!(human.speeches.is_empty());
        assert_eq!(human.prompt_text(), "hi");
    }

    #[test]
    fn test_tolerates_wrong_types_below_root() {
        let transcript = read_transcript(&json!({
            "convs": [
                "not a turn",
                {"speaker": 7, "index": "x", "speechesV2": "nope"},
                {"speaker": "ai", "speechesV2": [{"content": [{"type": "text", "msg": 42}]}]}
            ]
        }))
        .unwrap();

        assert_eq!(transcript.turns[0].speaker, Speaker::Other);
        assert_eq!(transcript.turns[1].index, None);
        assert!(transcript.turns[1].speeches.is_empty());
        assert_eq!(
            transcript.turns[2].speeches[0].blocks[0],
            ContentBlock::Text { msg: None }
        );
    }

    #[test]
    fn test_parse_str_reports_json_errors() {
        let err = parse_transcript_str("{not json").unwrap_err();
        assert!(matches!(err, ExportError::Json(_)));
    }
}
