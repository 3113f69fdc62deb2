//! Core type definitions for conversation transcripts

/// Placeholder shown when a file block has no name
pub const UNKNOWN_FILE_NAME: &str = "未知文件";

/// Placeholder shown when a search document has no title
pub const UNTITLED_DOC: &str = "无标题";

/// Placeholder link target for missing URLs
pub const MISSING_URL: &str = "#";

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    Human,
    Ai,
    /// Any speaker value the exporter does not know how to render
    Other,
}

impl Speaker {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("human") => Speaker::Human,
            Some("ai") => Speaker::Ai,
            _ => Speaker::Other,
        }
    }
}

/// File-like block kinds rendered as links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Code,
    Pdf,
}

/// A document backing a search-grounded answer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchDoc {
    pub title: Option<String>,
    pub url: Option<String>,
}

impl SearchDoc {
    /// Title for display, falling back to the untitled placeholder
    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or(UNTITLED_DOC)
    }

    /// URL for display, falling back to `#`
    pub fn display_url(&self) -> &str {
        non_empty(self.url.as_deref()).unwrap_or(MISSING_URL)
    }
}

/// Smallest renderable unit inside a speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text {
        msg: Option<String>,
    },
    Think {
        content: Option<String>,
    },
    SearchGuid {
        msg: Option<String>,
        content: Option<String>,
        docs: Vec<SearchDoc>,
    },
    Media {
        kind: MediaKind,
        file_name: Option<String>,
        url: Option<String>,
    },
    /// Unrecognized `type`; kept so uploaded files can still be linked
    Unknown {
        kind: Option<String>,
        file_name: Option<String>,
        url: Option<String>,
    },
}

impl ContentBlock {
    /// The `type` tag this block was read from
    pub fn kind(&self) -> &str {
        match self {
            ContentBlock::Text { .. } => "text",
            ContentBlock::Think { .. } => "think",
            ContentBlock::SearchGuid { .. } => "searchGuid",
            ContentBlock::Media { kind: MediaKind::Image, .. } => "image",
            ContentBlock::Media { kind: MediaKind::Code, .. } => "code",
            ContentBlock::Media { kind: MediaKind::Pdf, .. } => "pdf",
            ContentBlock::Unknown { kind, .. } => kind.as_deref().unwrap_or(""),
        }
    }

    /// Uploaded file reference: a non-text block with both a name and a URL
    pub fn attachment(&self) -> Option<(&str, &str)> {
        match self {
            ContentBlock::Media { file_name, url, .. }
            | ContentBlock::Unknown { file_name, url, .. } => {
                Some((non_empty(file_name.as_deref())?, non_empty(url.as_deref())?))
            }
            _ => None,
        }
    }

    /// Text of a search block: `msg` when non-empty, else `content`
    pub fn search_text(&self) -> &str {
        match self {
            ContentBlock::SearchGuid { msg, content, .. } => non_empty(msg.as_deref())
                .or(content.as_deref())
                .unwrap_or(""),
            _ => "",
        }
    }
}

/// One utterance within a turn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Speech {
    pub blocks: Vec<ContentBlock>,
}

/// One exchange unit of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub index: Option<i64>,
    pub display_prompt: Option<String>,
    pub speeches: Vec<Speech>,
}

impl Turn {
    /// Prompt text of a human turn
    ///
    /// Prefers the first `text` block of the first speech, then `displayPrompt`.
    pub fn prompt_text(&self) -> &str {
        let from_blocks = self.speeches.first().and_then(|speech| {
            speech.blocks.iter().find_map(|block| match block {
                ContentBlock::Text { msg } => Some(msg.as_deref()),
                _ => None,
            })
        });

        match from_blocks {
            Some(Some(msg)) => msg,
            _ => self.display_prompt.as_deref().unwrap_or(""),
        }
    }

    /// Files uploaded alongside a human prompt
    pub fn attachments(&self) -> Vec<(&str, &str)> {
        self.speeches
            .first()
            .map(|speech| speech.blocks.iter().filter_map(ContentBlock::attachment).collect())
            .unwrap_or_default()
    }

    /// All blocks across every speech, in order
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.speeches.iter().flat_map(|speech| speech.blocks.iter())
    }
}

/// A normalized conversation, newest turn first (capture order)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    pub turns: Vec<Turn>,
}

impl Transcript {
    /// Turns whose `index` equals `index`, in capture order
    pub fn turns_with_index(&self, index: i64) -> Vec<&Turn> {
        self.turns.iter().filter(|turn| turn.index == Some(index)).collect()
    }

    /// Turns oldest-first
    pub fn chronological(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().rev()
    }

    /// Map a display position (0 = oldest) to the turn index stored there
    pub fn index_at_position(&self, position: usize) -> Option<i64> {
        let capture_pos = self.turns.len().checked_sub(position)?.checked_sub(1)?;
        self.turns.get(capture_pos)?.index
    }

    /// Count of (human, ai) turns
    pub fn speaker_counts(&self) -> (usize, usize) {
        self.turns.iter().fold((0, 0), |(h, a), turn| match turn.speaker {
            Speaker::Human => (h + 1, a),
            Speaker::Ai => (h, a + 1),
            Speaker::Other => (h, a),
        })
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
