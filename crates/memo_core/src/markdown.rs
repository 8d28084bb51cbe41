//! Markdown-to-plain-text stripping for memo previews.
//!
//! # Responsibility
//! - Remove markdown syntax so list cards can show content without rendering.
//!
//! # Invariants
//! - Replacement order is fixed; later rules assume earlier ones already ran.
//! - The rule chain is repeated until a pass changes nothing, so stacked
//!   markers (`> > quote`, `- - item`, `***a* b**`) are fully removed and
//!   output fed back in is returned unchanged.
//! - Stored memo content is never modified by this module.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FENCED_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("valid fenced code regex"));
static INLINE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid inline code regex"));
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\([^)]+\)").expect("valid image regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").expect("valid heading regex"));
// Alternation order mirrors a greedy `{1,3}` marker: longest marker wins.
static EMPHASIS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\*\*\*(.+?)\*\*\*|\*\*(.+?)\*\*|\*(.+?)\*|___(.+?)___|__(.+?)__|_(.+?)_",
    )
    .expect("valid emphasis regex")
});
static STRIKETHROUGH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"~~(.+?)~~").expect("valid strikethrough regex"));
static BLOCKQUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^>\s+").expect("valid blockquote regex"));
static HORIZONTAL_RULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[-*_]{3,}\s*$").expect("valid rule regex"));
static UNORDERED_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").expect("valid list regex"));
static ORDERED_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\d+\.\s+").expect("valid ordered list regex"));
static MARKUP_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid markup tag regex"));
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid ws regex"));

/// Strips markdown syntax and returns trimmed plain text.
pub fn strip_markdown(markdown: &str) -> String {
    let mut current = strip_pass(markdown);
    loop {
        // Every rule only deletes characters, so a changed pass is shorter.
        let next = strip_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_pass(markdown: &str) -> String {
    let text = FENCED_CODE_RE.replace_all(markdown, "");
    let text = INLINE_CODE_RE.replace_all(&text, "$1");
    let text = IMAGE_RE.replace_all(&text, "$1");
    let text = LINK_RE.replace_all(&text, "$1");
    let text = HEADING_RE.replace_all(&text, "");
    let text = EMPHASIS_RE.replace_all(&text, |caps: &Captures<'_>| {
        caps.iter()
            .skip(1)
            .flatten()
            .next()
            .map(|inner| inner.as_str().to_string())
            .unwrap_or_default()
    });
    let text = STRIKETHROUGH_RE.replace_all(&text, "$1");
    let text = BLOCKQUOTE_RE.replace_all(&text, "");
    let text = HORIZONTAL_RULE_RE.replace_all(&text, "");
    let text = UNORDERED_LIST_RE.replace_all(&text, "");
    let text = ORDERED_LIST_RE.replace_all(&text, "");
    let text = MARKUP_TAG_RE.replace_all(&text, "");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Builds a single-line preview of at most `max_chars` characters.
pub fn preview_text(markdown: &str, max_chars: usize) -> String {
    let stripped = strip_markdown(markdown);
    let flattened = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let mut truncated = flattened.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::{preview_text, strip_markdown};

    #[test]
    fn removes_fenced_code_with_content() {
        let source = "before\n```rust\nfn main() {}\n```\nafter";
        assert_eq!(strip_markdown(source), "before\n\nafter");
    }

    #[test]
    fn keeps_inline_code_link_and_image_text() {
        let source = "run `cargo` see [docs](https://x.dev) ![logo](a.png)";
        assert_eq!(strip_markdown(source), "run cargo see docs logo");
    }

    #[test]
    fn removes_heading_emphasis_and_strikethrough_markers() {
        let source = "## Plan\n***all*** **bold** *it* __under__ ~~gone~~";
        assert_eq!(strip_markdown(source), "Plan\nall bold it under gone");
    }

    #[test]
    fn removes_block_markers() {
        let source = "> quoted\n\n---\n\n- one\n* two\n1. first\n<b>tag</b>";
        // List-marker rules also swallow the blank lines that precede them.
        assert_eq!(strip_markdown(source), "quoted\none\ntwo\nfirst\ntag");
    }

    #[test]
    fn collapses_long_blank_runs() {
        assert_eq!(strip_markdown("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn stripping_is_idempotent() {
        let samples = [
            "# Title\n\nSome **bold** and `code` with [link](http://x)\n\n- item one\n- item two",
            "> quote\n\n\n\n1. step\n2. step two\n\n```\nhidden\n```",
            "plain text only",
            "![alt](img.png) ~~old~~ <i>new</i>",
        ];
        for sample in samples {
            let once = strip_markdown(sample);
            assert_eq!(strip_markdown(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn removes_stacked_markers_in_one_call() {
        assert_eq!(strip_markdown("> > nested quote"), "nested quote");
        assert_eq!(strip_markdown("- - item"), "item");
        assert_eq!(strip_markdown("1. 2. step"), "step");
        assert_eq!(strip_markdown("## ## Title"), "Title");
        assert_eq!(strip_markdown("***a* b**"), "a b");
    }

    #[test]
    fn stacked_markers_are_idempotent() {
        let samples = [
            "> > nested quote",
            "> > > deep\n> > shallower",
            "- - item\n  * * inner",
            "1. 2. step",
            "# # heading",
            "***a* b** and __*mixed*__",
            "> - quoted list\n> 1. quoted step",
        ];
        for sample in samples {
            let once = strip_markdown(sample);
            assert_eq!(strip_markdown(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn preview_flattens_and_truncates() {
        let preview = preview_text("# Head\n\nline one\nline two", 12);
        assert_eq!(preview, "Head line on...");
        assert_eq!(preview_text("short", 12), "short");
    }
}
