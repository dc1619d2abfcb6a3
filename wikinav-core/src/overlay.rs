// Search overlay filtering the article index as the user types

use crate::highlight::Needle;
use crate::navigator::Navigator;
use crate::resolver::{NavigationTarget, PathResolver};
use crate::strategy::{MenuItem, MenuRow, RenderStrategy};
use std::iter::Enumerate;
use std::slice::Iter;
use tracing::{debug, warn};
use wikinav_index::{ArticleIndex, ArticleRecord, PageDepth};

/// A matching record and its position in the index.
#[derive(Debug, Clone, Copy)]
pub struct Suggestion<'a> {
    pub position: usize,
    pub record: &'a ArticleRecord,
}

/// Lazy sequence of matches for one query. Cloning restarts it from the
/// current position; a fresh `SearchOverlay::query` restarts from the top.
#[derive(Clone)]
pub struct Suggestions<'a> {
    records: Enumerate<Iter<'a, ArticleRecord>>,
    needle: Option<Needle>,
    strategy: &'a dyn RenderStrategy,
}

impl<'a> Suggestions<'a> {
    fn empty(strategy: &'a dyn RenderStrategy) -> Self {
        let records: &'a [ArticleRecord] = Default::default();
        Self {
            records: records.iter().enumerate(),
            needle: None,
            strategy,
        }
    }

    pub fn needle(&self) -> Option<&Needle> {
        self.needle.as_ref()
    }
}

impl<'a> Iterator for Suggestions<'a> {
    type Item = Suggestion<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_ref()?;
        let strategy = self.strategy;
        self.records
            .by_ref()
            .find(|(_, record)| strategy.matches(record, needle))
            .map(|(position, record)| Suggestion { position, record })
    }
}

/// All search state for one page view. Constructed once; the index may
/// arrive later through `install`.
pub struct SearchOverlay {
    index: Option<ArticleIndex>,
    depth: PageDepth,
    strategy: Box<dyn RenderStrategy>,
    min_query_len: usize,
    max_suggestions: Option<usize>,
}

impl SearchOverlay {
    /// Create an overlay whose index is still loading.
    pub fn new(strategy: Box<dyn RenderStrategy>, depth: PageDepth) -> Self {
        Self {
            index: None,
            depth,
            strategy,
            min_query_len: 1,
            max_suggestions: None,
        }
    }

    pub fn with_index(mut self, index: ArticleIndex) -> Self {
        self.install(index);
        self
    }

    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len;
        self
    }

    /// Cap on rendered menu items; `None` or zero means unlimited.
    pub fn with_max_suggestions(mut self, max_suggestions: Option<usize>) -> Self {
        self.max_suggestions = max_suggestions.filter(|max| *max > 0);
        self
    }

    /// Install the loaded index. Only the first install takes effect.
    pub fn install(&mut self, index: ArticleIndex) -> bool {
        if self.index.is_some() {
            warn!("Search index already installed, ignoring reload");
            return false;
        }
        debug!(
            "Installing search index with {} records ({} strategy)",
            index.len(),
            self.strategy.name()
        );
        self.index = Some(index);
        true
    }

    pub fn is_ready(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<&ArticleIndex> {
        self.index.as_ref()
    }

    pub fn depth(&self) -> PageDepth {
        self.depth
    }

    pub fn strategy(&self) -> &dyn RenderStrategy {
        self.strategy.as_ref()
    }

    pub fn record(&self, position: usize) -> Option<&ArticleRecord> {
        self.index.as_ref()?.records().get(position)
    }

    /// Matches for `input`, recomputed from scratch on every call. Empty
    /// while the index is loading or the input is shorter than the
    /// minimum query length.
    pub fn query(&self, input: &str) -> Suggestions<'_> {
        let strategy = self.strategy.as_ref();
        let Some(index) = self.index.as_ref() else {
            return Suggestions::empty(strategy);
        };
        if input.chars().count() < self.min_query_len {
            return Suggestions::empty(strategy);
        }

        Suggestions {
            records: index.records().iter().enumerate(),
            needle: Needle::new(input),
            strategy,
        }
    }

    /// Menu rows for `input`. Grouping strategies get a header row each
    /// time the category changes in index order.
    pub fn render(&self, input: &str) -> Vec<MenuRow> {
        let suggestions = self.query(input);
        let Some(needle) = suggestions.needle().cloned() else {
            return Vec::new();
        };

        let limit = self.max_suggestions.unwrap_or(usize::MAX);
        let grouped = self.strategy.groups_by_category();
        let mut rows = Vec::new();
        let mut current_category = None;

        for suggestion in suggestions.take(limit) {
            let record = suggestion.record;
            if grouped && current_category != Some(&record.category) {
                rows.push(MenuRow::Header(record.category.clone()));
                current_category = Some(&record.category);
            }
            rows.push(MenuRow::Item(MenuItem {
                position: suggestion.position,
                segments: self.strategy.render_item(record, &needle),
                aria_label: self.strategy.aria_label(record),
            }));
        }

        debug!("Query '{}' rendered {} menu rows", input, rows.len());
        rows
    }

    pub fn resolve(&self, record: &ArticleRecord) -> Option<NavigationTarget> {
        let index = self.index.as_ref()?;
        PathResolver::new(index.paths(), self.depth).resolve_record(record)
    }

    /// Navigate to the selected record. Returns `false`, without touching
    /// the navigator, when the record has no known path.
    pub fn select(&self, record: &ArticleRecord, navigator: &mut dyn Navigator) -> bool {
        match self.resolve(record) {
            Some(target) => {
                debug!("Navigating to {}", target);
                navigator.navigate(&target);
                true
            }
            None => false,
        }
    }
}
