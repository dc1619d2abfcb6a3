// Resolution of a selected record to a link relative to the current page

use std::fmt;
use tracing::debug;
use wikinav_index::{ArticleRecord, PageDepth, PathTable};

/// Final link for a selection: root-relative URL, optional heading anchor,
/// and the prefix climbing from the current page to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub url: String,
    pub fragment: Option<String>,
    pub depth: PageDepth,
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.depth.prefix(), self.url)?;
        if let Some(ref fragment) = self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

pub struct PathResolver<'a> {
    paths: &'a PathTable,
    depth: PageDepth,
}

impl<'a> PathResolver<'a> {
    /// `depth` must be the depth the index was loaded with, so links and
    /// the index agree on where the site root is.
    pub fn new(paths: &'a PathTable, depth: PageDepth) -> Self {
        Self { paths, depth }
    }

    pub fn depth(&self) -> PageDepth {
        self.depth
    }

    /// Resolve a record name to a navigable link. Unknown names resolve to
    /// `None`, which callers treat as "do not navigate".
    pub fn resolve(&self, name: &str, title_id: &str, title: &str) -> Option<NavigationTarget> {
        let fragment = (!title.is_empty()).then_some(title_id);
        self.target(name, fragment)
    }

    pub fn resolve_record(&self, record: &ArticleRecord) -> Option<NavigationTarget> {
        let fragment = record.is_subtitle().then_some(record.title_id.as_str());
        self.target(&record.name, fragment)
    }

    fn target(&self, name: &str, fragment: Option<&str>) -> Option<NavigationTarget> {
        let Some(url) = self.paths.get(name) else {
            debug!("No path for '{}', skipping navigation", name);
            return None;
        };

        Some(NavigationTarget {
            url: url.to_string(),
            fragment: fragment.map(str::to_string),
            depth: self.depth,
        })
    }
}
