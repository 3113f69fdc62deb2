//! Markdown rendering for transcripts
//!
//! A [`MarkdownRenderer`] lives for exactly one export. It owns the reference
//! ledger, so footnote ordinals keep increasing across every block and turn of
//! that export and start again at 1 for the next one.

use serde_json::Value;

use crate::error::{ExportError, Result, INVALID_DATA_DOCUMENT};
use crate::options::{ExportOptions, ThinkFormat};
use crate::parser::read_transcript;
use crate::text::{
    adjust_header_levels, blockquote, ref_markers_to_footnotes, renumber_ref_markers,
    replace_formulas, strip_ref_markers, DEFAULT_HEADER_INCREMENT,
};
use crate::types::{
    ContentBlock, SearchDoc, Speaker, Transcript, Turn, MISSING_URL, UNKNOWN_FILE_NAME,
};

/// A numbered citation collected from a `searchGuid` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub ordinal: usize,
    pub title: String,
    pub url: String,
}

/// Render-scoped reference ledger
#[derive(Debug, Default)]
struct References {
    entries: Vec<Reference>,
}

impl References {
    fn next_ordinal(&self) -> usize {
        self.entries.len() + 1
    }

    fn allocate(&mut self, doc: &SearchDoc) -> usize {
        let ordinal = self.next_ordinal();
        self.entries.push(Reference {
            ordinal,
            title: doc.display_title().to_string(),
            url: doc.display_url().to_string(),
        });
        ordinal
    }

    fn footnotes(&self) -> String {
        self.entries
            .iter()
            .map(|r| format!("[^{}]: [{}]({})", r.ordinal, r.title, r.url))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Single-use renderer for one export pass
#[derive(Debug)]
pub struct MarkdownRenderer<'a> {
    options: &'a ExportOptions,
    refs: References,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(options: &'a ExportOptions) -> Self {
        Self {
            options,
            refs: References::default(),
        }
    }

    /// References collected so far, in allocation order
    pub fn references(&self) -> &[Reference] {
        &self.refs.entries
    }

    /// Render turns in the order given and finish the document
    pub fn render<'t>(mut self, turns: impl IntoIterator<Item = &'t Turn>) -> String {
        let mut body = String::new();
        for turn in turns {
            body.push_str(&self.render_turn(turn));
        }

        let text = self.finish(body);
        if self.options.header_downgrade {
            adjust_header_levels(&text, DEFAULT_HEADER_INCREMENT).trim().to_string()
        } else {
            text
        }
    }

    /// Render turns oldest-first with `> # user` / `> # agent` separators
    pub fn render_conversation(mut self, transcript: &Transcript) -> String {
        let level = if self.options.header_downgrade {
            1 + DEFAULT_HEADER_INCREMENT
        } else {
            1
        };
        let hashes = "#".repeat(level);

        let mut body = String::new();
        for turn in transcript.chronological() {
            let role = match turn.speaker {
                Speaker::Human => "user",
                Speaker::Ai => "agent",
                Speaker::Other => continue,
            };

            let mut turn_body = self.render_turn(turn);
            if self.options.header_downgrade {
                turn_body = adjust_header_levels(&turn_body, DEFAULT_HEADER_INCREMENT);
            }

            body.push_str(&format!("> {} {}\n", hashes, role));
            body.push_str(&turn_body);
        }

        self.finish(body)
    }

    /// Markdown for one turn, ending with a blank line
    fn render_turn(&mut self, turn: &Turn) -> String {
        match turn.speaker {
            Speaker::Human => self.render_human(turn),
            Speaker::Ai => {
                let mut out = String::new();
                for block in turn.blocks() {
                    self.render_block(block, &mut out);
                }
                out
            }
            Speaker::Other => {
                trace!(index = ?turn.index, "skipping turn with unknown speaker");
                String::new()
            }
        }
    }

    fn render_human(&self, turn: &Turn) -> String {
        let mut out = self.formulas(turn.prompt_text());
        out.push_str("\n\n");

        let attachments = turn.attachments();
        if !attachments.is_empty() {
            let links: Vec<String> = attachments
                .iter()
                .map(|(name, url)| format!("[{}]({})", name, url))
                .collect();
            out.push_str(&links.join("\n"));
            out.push_str("\n\n");
        }
        out
    }

    fn render_block(&mut self, block: &ContentBlock, out: &mut String) {
        match block {
            ContentBlock::Text { msg } => {
                let text = self.formulas(msg.as_deref().unwrap_or(""));
                let text = if self.options.keep_search_results {
                    ref_markers_to_footnotes(&text)
                } else {
                    strip_ref_markers(&text)
                };
                push_paragraph(out, &text);
            }
            ContentBlock::Think { content } => {
                if !self.options.export_think_process {
                    return;
                }
                let content = self.formulas(content.as_deref().unwrap_or(""));
                let rendered = match self.options.think_process_format {
                    ThinkFormat::Tag => format!("<think>\n{}\n</think>", content),
                    ThinkFormat::Markdown => blockquote(&content),
                };
                push_paragraph(out, &rendered);
            }
            // Without docs there is nothing to cite, but the answer text is still kept
            ContentBlock::SearchGuid { docs, .. } => {
                let text = self.formulas(block.search_text());
                let text = if self.options.keep_search_results && !docs.is_empty() {
                    self.cite(docs, &text)
                } else {
                    strip_ref_markers(&text)
                };
                if !text.trim().is_empty() {
                    push_paragraph(out, &text);
                }
            }
            ContentBlock::Media { file_name, url, .. } => {
                let name = file_name
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(UNKNOWN_FILE_NAME);
                let url = url.as_deref().filter(|s| !s.is_empty()).unwrap_or(MISSING_URL);
                push_paragraph(out, &format!("[{}]({})", name, url));
            }
            ContentBlock::Unknown { .. } => {
                trace!(kind = block.kind(), "skipping unknown block");
            }
        }
    }

    /// Allocate references for `docs` and point the block's markers at them
    fn cite(&mut self, docs: &[SearchDoc], text: &str) -> String {
        let first = self.refs.next_ordinal();
        for doc in docs {
            self.refs.allocate(doc);
        }

        let (text, markers) = renumber_ref_markers(text, first);
        if markers != docs.len() {
            debug!(
                markers,
                docs = docs.len(),
                "marker count differs from document count"
            );
        }
        debug!(first, last = self.refs.next_ordinal() - 1, "allocated references");
        text
    }

    fn formulas(&self, text: &str) -> String {
        if self.options.replace_formulas {
            replace_formulas(text)
        } else {
            text.to_string()
        }
    }

    fn finish(&self, body: String) -> String {
        let mut text = body.trim().to_string();
        if self.options.keep_search_results && !self.refs.entries.is_empty() {
            text.push_str("\n\n");
            text.push_str(&self.refs.footnotes());
        }
        text.trim().to_string()
    }
}

fn push_paragraph(out: &mut String, text: &str) {
    out.push_str(text);
    out.push_str("\n\n");
}

/// Render the given turns as one Markdown document
pub fn render_turns<'t>(
    turns: impl IntoIterator<Item = &'t Turn>,
    options: &ExportOptions,
) -> String {
    MarkdownRenderer::new(options).render(turns)
}

/// Export every turn whose index is `index`
pub fn export_turn(transcript: &Transcript, index: i64, options: &ExportOptions) -> Result<String> {
    let turns = transcript.turns_with_index(index);
    if turns.is_empty() {
        return Err(ExportError::NoMatchingTurn(index));
    }
    debug!(index, matches = turns.len(), "exporting turn");
    Ok(render_turns(turns, options))
}

/// Export the whole conversation oldest-first with role separators
pub fn export_conversation(transcript: &Transcript, options: &ExportOptions) -> String {
    MarkdownRenderer::new(options).render_conversation(transcript)
}

/// Render a raw payload, optionally restricted to one turn index
///
/// Never fails: invalid payloads yield the fixed error document and an index
/// with no matching turn yields an empty string.
pub fn render_markdown(value: &Value, only_index: Option<i64>, options: &ExportOptions) -> String {
    let transcript = match read_transcript(value) {
        Ok(transcript) => transcript,
        Err(e) => {
            warn!(error = %e, "payload is not a transcript");
            return INVALID_DATA_DOCUMENT.to_string();
        }
    };

    match only_index {
        Some(index) => export_turn(&transcript, index, options).unwrap_or_default(),
        None => render_turns(&transcript.turns, options),
    }
}

/// Render a raw payload as a whole-conversation export
pub fn render_conversation_markdown(value: &Value, options: &ExportOptions) -> String {
    match read_transcript(value) {
        Ok(transcript) => export_conversation(&transcript, options),
        Err(e) => {
            warn!(error = %e, "payload is not a transcript");
            INVALID_DATA_DOCUMENT.to_string()
        }
    }
}
