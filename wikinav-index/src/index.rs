use crate::record::{ArticleRecord, Category};
use std::collections::HashMap;
use tracing::warn;

/// Lookup from record name to its root-relative URL.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    entries: HashMap<String, String>,
    collisions: Vec<String>,
}

impl PathTable {
    /// Build the table in record order. A later record with the same name
    /// replaces the earlier mapping.
    pub fn from_records(records: &[ArticleRecord]) -> Self {
        let mut entries = HashMap::with_capacity(records.len());
        let mut collisions = Vec::new();

        for record in records {
            if let Some(previous) = entries.insert(record.name.clone(), record.url.clone())
                && previous != record.url
            {
                warn!(
                    "Duplicate index name '{}': {} replaces {}",
                    record.name, record.url, previous
                );
                collisions.push(record.name.clone());
            }
        }

        Self { entries, collisions }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names whose mapping was overwritten by a later record with a
    /// different URL.
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }
}

/// Ordered records plus the path table derived from them.
#[derive(Debug, Clone, Default)]
pub struct ArticleIndex {
    records: Vec<ArticleRecord>,
    paths: PathTable,
}

impl ArticleIndex {
    pub fn new(records: Vec<ArticleRecord>) -> Self {
        let paths = PathTable::from_records(&records);
        Self { records, paths }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record counts per category, in order of first appearance.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let mut counts: Vec<(Category, usize)> = Vec::new();
        for record in &self.records {
            match counts.iter_mut().find(|(c, _)| *c == record.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((record.category.clone(), 1)),
            }
        }
        counts
    }
}
