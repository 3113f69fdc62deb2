//! Text transforms applied while rendering
//!
//! Each transform is a pure `&str -> String` rewrite so the renderer can
//! compose them in whatever order a block kind requires.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Default heading increase for [`adjust_header_levels`]
pub const DEFAULT_HEADER_INCREMENT: usize = 1;

static INLINE_FORMULA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\((.*?)\\\)").expect("valid inline formula pattern"));

static DISPLAY_FORMULA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\\[(.*?)\\\]").expect("valid display formula pattern"));

static REF_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d+)\]\(@ref\)").expect("valid ref marker pattern"));

static REF_MARKER_WITH_LEADING_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\[\d+\]\(@ref\)").expect("valid ref marker pattern"));

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#+)[ \t]*(.*)$").expect("valid header pattern"));

static QUOTED_HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^>[ \t]*(#+)[ \t]*(.*)$").expect("valid quoted header pattern")
});

/// Rewrite `\(x\)` to `$x$` and `\[x\]` to `$$x$$`
pub fn replace_formulas(text: &str) -> String {
    let inline = INLINE_FORMULA.replace_all(text, "$$$1$$");
    DISPLAY_FORMULA.replace_all(&inline, "$$$$$1$$$$").into_owned()
}

/// Turn `[n](@ref)` into the footnote marker `[^n]`, keeping the numeral
pub fn ref_markers_to_footnotes(text: &str) -> String {
    REF_MARKER.replace_all(text, "[^$1]").into_owned()
}

/// Renumber `[n](@ref)` markers by position, starting at `first`
///
/// The numeral inside each marker is ignored. Returns the rewritten text and
/// the number of markers seen.
pub fn renumber_ref_markers(text: &str, first: usize) -> (String, usize) {
    let mut next = first;
    let rewritten = REF_MARKER.replace_all(text, |_: &Captures| {
        let marker = format!("[^{}]", next);
        next += 1;
        marker
    });
    (rewritten.into_owned(), next - first)
}

/// Remove `[n](@ref)` markers along with the spacing in front of them, then trim
pub fn strip_ref_markers(text: &str) -> String {
    REF_MARKER_WITH_LEADING_SPACE
        .replace_all(text, "")
        .trim()
        .to_string()
}

/// Deepen every Markdown heading by `increase_by` levels
///
/// Plain `# title` lines and blockquoted `> # title` lines are both handled.
/// Other lines are left byte-identical.
pub fn adjust_header_levels(text: &str, increase_by: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let quoted = QUOTED_HEADER_LINE.replace_all(text, |caps: &Captures| {
        format!("> {}", heading(&caps[1], &caps[2], increase_by))
    });
    HEADER_LINE
        .replace_all(&quoted, |caps: &Captures| heading(&caps[1], &caps[2], increase_by))
        .into_owned()
}

fn heading(hashes: &str, content: &str, increase_by: usize) -> String {
    format!("{} {}", "#".repeat(hashes.len() + increase_by), content.trim())
}

/// Prefix every line with a blockquote marker
pub fn blockquote(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
