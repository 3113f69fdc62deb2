//! End-to-end export behavior over captured payloads

use serde_json::{json, Value};
use yuanbao_core::{
    export_conversation, export_turn, read_transcript, render_markdown, CaptureState, ExportError,
    ExportOptions, ThinkFormat, INVALID_DATA_DOCUMENT,
};

const DETAIL_URL: &str = "https://yuanbao.tencent.com/api/user/agent/conversation/v1/detail";

/// Two exchanges, newest first, as the detail endpoint returns them
fn sample_payload() -> Value {
    json!({
        "createTime": 1718000000000u64,
        "convs": [
            {
                "speaker": "ai",
                "index": 4,
                "speechesV2": [
                    {"content": [
                        {"type": "think", "content": "compare \\(a\\) and \\(b\\)"},
                        {"type": "searchGuid", "msg": "Sources say so [3](@ref), again [9](@ref).", "docs": [
                            {"title": "Doc C", "url": "https://c"},
                            {"title": "Doc D", "url": "https://d"}
                        ]}
                    ]},
                    {"content": [
                        {"type": "text", "msg": "## Summary\nDone [1](@ref)."}
                    ]}
                ]
            },
            {"speaker": "human", "index": 3, "displayPrompt": "and now?"},
            {
                "speaker": "ai",
                "index": 2,
                "speechesV2": [{"content": [
                    {"type": "searchGuid", "msg": "First [1](@ref).", "docs": [{"title": "Doc A", "url": "https://a"}]}
                ]}]
            },
            {
                "speaker": "human",
                "index": 1,
                "displayPrompt": "ignored",
                "speechesV2": [{"content": [
                    {"type": "text", "msg": "question"},
                    {"type": "image", "fileName": "chart.png", "url": "https://img/chart.png"}
                ]}]
            }
        ]
    })
}

fn footnote_ordinals(markdown: &str) -> Vec<usize> {
    markdown
        .lines()
        .filter_map(|line| line.strip_prefix("[^"))
        .filter_map(|rest| rest.split_once("]:"))
        .filter_map(|(n, _)| n.parse().ok())
        .collect()
}

#[test]
fn render_is_deterministic() {
    let payload = sample_payload();
    let options = ExportOptions::default();
    assert_eq!(
        render_markdown(&payload, None, &options),
        render_markdown(&payload, None, &options)
    );
}

#[test]
fn reference_ordinals_strictly_increase_across_turns() {
    let transcript = read_transcript(&sample_payload()).unwrap();
    let markdown = export_conversation(&transcript, &ExportOptions::default());

    assert_eq!(footnote_ordinals(&markdown), vec![1, 2, 3]);
    assert!(markdown.contains("First [^1]."));
    assert!(markdown.contains("Sources say so [^2], again [^3]."));
    assert!(markdown.ends_with(
        "[^1]: [Doc A](https://a)\n[^2]: [Doc C](https://c)\n[^3]: [Doc D](https://d)"
    ));
}

#[test]
fn capture_order_render_numbers_in_given_order() {
    let markdown = render_markdown(&sample_payload(), None, &ExportOptions::default());
    assert!(markdown.contains("Sources say so [^1], again [^2]."));
    assert!(markdown.contains("First [^3]."));
}

#[test]
fn disabling_search_results_removes_all_footnotes() {
    let options = ExportOptions {
        keep_search_results: false,
        ..Default::default()
    };
    let markdown = render_markdown(&sample_payload(), None, &options);

    assert!(!markdown.contains("[^"));
    assert!(!markdown.contains("(@ref)"));
    assert!(markdown.contains("Sources say so, again."));
    assert!(markdown.contains("Done."));
}

#[test]
fn disabling_think_process_removes_think_content() {
    for format in [ThinkFormat::Tag, ThinkFormat::Markdown] {
        let options = ExportOptions {
            export_think_process: false,
            think_process_format: format,
            ..Default::default()
        };
        let markdown = render_markdown(&sample_payload(), None, &options);
        assert!(!markdown.contains("<think>"));
        assert!(!markdown.contains("compare"));
    }
}

#[test]
fn think_content_gets_formula_rewriting() {
    let markdown = render_markdown(&sample_payload(), Some(4), &ExportOptions::default());
    assert!(markdown.starts_with("<think>\ncompare $a$ and $b$\n</think>"));
}

#[test]
fn single_turn_export_matches_only_that_turn() {
    let payload = sample_payload();
    let options = ExportOptions::default();

    assert_eq!(
        render_markdown(&payload, Some(1), &options),
        "question\n\n[chart.png](https://img/chart.png)"
    );
    assert_eq!(render_markdown(&payload, Some(3), &options), "and now?");
    assert_eq!(
        render_markdown(&payload, Some(2), &options),
        "First [^1].\n\n[^1]: [Doc A](https://a)"
    );
}

#[test]
fn header_downgrade_in_single_turn_export() {
    let options = ExportOptions {
        header_downgrade: true,
        ..Default::default()
    };
    let markdown = render_markdown(&sample_payload(), Some(4), &options);
    assert!(markdown.contains("### Summary\nDone [^1]."));
}

#[test]
fn whole_conversation_export_has_role_separators() {
    let transcript = read_transcript(&sample_payload()).unwrap();
    let markdown = export_conversation(&transcript, &ExportOptions::default());

    assert!(markdown.starts_with(
        "> # user\nquestion\n\n[chart.png](https://img/chart.png)\n\n> # agent\n"
    ));
    let separators: Vec<&str> = markdown.lines().filter(|l| l.starts_with("> #")).collect();
    assert_eq!(separators, vec!["> # user", "> # agent", "> # user", "> # agent"]);

    let options = ExportOptions {
        header_downgrade: true,
        ..Default::default()
    };
    let markdown = export_conversation(&transcript, &options);
    assert!(markdown.starts_with("> ## user\n"));
    assert!(markdown.contains("### Summary"));
}

#[test]
fn text_block_markers_keep_their_numerals() {
    let payload = json!({"convs": [{
        "speaker": "ai",
        "index": 1,
        "speechesV2": [{"content": [
            {"type": "text", "msg": "see [1](@ref)"},
            {"type": "searchGuid", "msg": "ref [1](@ref)", "docs": [{"title": "T", "url": "U"}]}
        ]}]
    }]});
    assert_eq!(
        render_markdown(&payload, None, &ExportOptions::default()),
        "see [^1]\n\nref [^1]\n\n[^1]: [T](U)"
    );
}

#[test]
fn missing_convs_yields_error_document() {
    let markdown = render_markdown(&json!({"createTime": 1}), None, &ExportOptions::default());
    assert_eq!(markdown, "# 错误：无效的JSON数据\n\n无法解析对话内容。");
    assert_eq!(markdown, INVALID_DATA_DOCUMENT);
}

#[test]
fn stripped_marker_collapses_spacing() {
    let payload = json!({"convs": [{
        "speaker": "ai",
        "index": 1,
        "speechesV2": [{"content": [
            {"type": "searchGuid", "msg": "a [2](@ref) b", "docs": [{"title": "T", "url": "U"}]}
        ]}]
    }]});
    let options = ExportOptions {
        keep_search_results: false,
        ..Default::default()
    };
    assert_eq!(render_markdown(&payload, None, &options), "a b");
}

#[test]
fn export_turn_from_captured_snapshot() {
    let mut capture = CaptureState::new();
    assert!(matches!(capture.parse(), Err(ExportError::NotCaptured)));

    assert!(capture.offer(DETAIL_URL, sample_payload().to_string()));
    let transcript = read_transcript(&capture.parse().unwrap()).unwrap();

    let index = transcript.index_at_position(1).unwrap();
    assert_eq!(index, 2);
    let markdown = export_turn(&transcript, index, &ExportOptions::default()).unwrap();
    assert!(markdown.starts_with("First [^1]."));

    let err = export_turn(&transcript, 42, &ExportOptions::default()).unwrap_err();
    assert!(matches!(err, ExportError::NoMatchingTurn(42)));
}
