// Query matching and first-match emphasis for suggestion labels

use regex::{Regex, RegexBuilder};
use std::ops::Range;

pub const EMPHASIS_OPEN: &str = r#"<b style="font-weight:bold;text-decoration:underline;">"#;
pub const EMPHASIS_CLOSE: &str = "</b>";

const NEEDLE_SIZE_LIMIT: usize = 1 << 20;

/// The typed query, compiled for literal case-insensitive matching.
#[derive(Debug, Clone)]
pub struct Needle {
    text: String,
    regex: Regex,
}

impl Needle {
    /// Returns `None` for an empty query.
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        let regex = RegexBuilder::new(&regex::escape(query))
            .case_insensitive(true)
            .size_limit(NEEDLE_SIZE_LIMIT)
            .build()
            .ok()?;
        Some(Self {
            text: query.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    pub fn find(&self, haystack: &str) -> Option<Range<usize>> {
        self.regex.find(haystack).map(|m| m.range())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    Plain,
    Emphasis,
    Italic,
}

/// A run of label text with one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SegmentStyle::Plain,
        }
    }

    pub fn emphasis(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SegmentStyle::Emphasis,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SegmentStyle::Italic,
        }
    }
}

/// Split `label` around the first match of `needle`. Empty runs are omitted.
pub fn highlight(label: &str, needle: &Needle) -> Vec<Segment> {
    let Some(range) = needle.find(label) else {
        return vec![Segment::plain(label)];
    };

    let mut segments = Vec::with_capacity(3);
    if range.start > 0 {
        segments.push(Segment::plain(&label[..range.start]));
    }
    segments.push(Segment::emphasis(&label[range.clone()]));
    if range.end < label.len() {
        segments.push(Segment::plain(&label[range.end..]));
    }
    segments
}

/// Markup the browser menu shows for a rendered item.
pub fn to_html(segments: &[Segment]) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment.style {
            SegmentStyle::Plain => html.push_str(&segment.text),
            SegmentStyle::Emphasis => {
                html.push_str(EMPHASIS_OPEN);
                html.push_str(&segment.text);
                html.push_str(EMPHASIS_CLOSE);
            }
            SegmentStyle::Italic => {
                html.push_str("<i>");
                html.push_str(&segment.text);
                html.push_str("</i>");
            }
        }
    }
    html
}

/// Concatenated text without any styling.
pub fn to_plain(segments: &[Segment]) -> String {
    segments.iter().map(|s| s.text.as_str()).collect()
}
