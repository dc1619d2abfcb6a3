// Render strategies for the search overlay

use crate::highlight::{Needle, Segment, highlight, to_html, to_plain};
use serde::Serialize;
use wikinav_index::{ArticleRecord, Category};

/// One line of the suggestion menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRow {
    /// Category header, emitted whenever the category changes.
    Header(Category),
    Item(MenuItem),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Position of the record in the index.
    pub position: usize,
    #[serde(skip)]
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
}

impl MenuItem {
    pub fn html(&self) -> String {
        to_html(&self.segments)
    }

    pub fn text(&self) -> String {
        to_plain(&self.segments)
    }
}

/// Decides which record fields a query matches, how a match is rendered,
/// and whether the menu is grouped by category.
pub trait RenderStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, record: &ArticleRecord, needle: &Needle) -> bool;

    fn render_item(&self, record: &ArticleRecord, needle: &Needle) -> Vec<Segment>;

    fn aria_label(&self, _record: &ArticleRecord) -> Option<String> {
        None
    }

    fn groups_by_category(&self) -> bool {
        false
    }
}

/// Matches and highlights article names only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStrategy;

impl RenderStrategy for PlainStrategy {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn matches(&self, record: &ArticleRecord, needle: &Needle) -> bool {
        needle.is_match(&record.name)
    }

    fn render_item(&self, record: &ArticleRecord, needle: &Needle) -> Vec<Segment> {
        highlight(&record.name, needle)
    }
}

/// Matches names and heading titles, and groups the menu under category
/// headers. The index must already be ordered by category; nothing is
/// re-sorted here.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryStrategy;

impl RenderStrategy for CategoryStrategy {
    fn name(&self) -> &'static str {
        "categorized"
    }

    fn matches(&self, record: &ArticleRecord, needle: &Needle) -> bool {
        needle.is_match(&record.name) || needle.is_match(&record.title)
    }

    fn render_item(&self, record: &ArticleRecord, needle: &Needle) -> Vec<Segment> {
        match record.category {
            Category::Articles => highlight(&record.name, needle),
            Category::Titles => {
                let mut segments = vec![Segment::italic(&record.name), Segment::plain(" : ")];
                segments.extend(highlight(&record.title, needle));
                segments
            }
            Category::Other(_) => vec![Segment::plain(record.label())],
        }
    }

    fn aria_label(&self, record: &ArticleRecord) -> Option<String> {
        Some(format!("{} : {}", record.category, record.label()))
    }

    fn groups_by_category(&self) -> bool {
        true
    }
}

/// Matches names and descriptions of a full-text database.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullTextStrategy;

impl RenderStrategy for FullTextStrategy {
    fn name(&self) -> &'static str {
        "fulltext"
    }

    fn matches(&self, record: &ArticleRecord, needle: &Needle) -> bool {
        needle.is_match(&record.name) || needle.is_match(&record.meta)
    }

    fn render_item(&self, record: &ArticleRecord, needle: &Needle) -> Vec<Segment> {
        highlight(&record.name, needle)
    }
}
