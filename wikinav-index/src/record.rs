use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Category of an indexed entry. The wiki generator emits `"articles"` for
/// whole pages and `"titles"` for headings inside a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    Articles,
    Titles,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Articles => "articles",
            Category::Titles => "titles",
            Category::Other(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "articles" => Category::Articles,
            "titles" => Category::Titles,
            _ => Category::Other(value),
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub name: String,
    pub category: Category,
    pub title: String,
    #[serde(rename = "titleID")]
    pub title_id: String,
    pub url: String,
    /// Short description, only present in full-text databases.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub meta: String,
}

impl ArticleRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Category::Articles,
            title: String::new(),
            title_id: String::new(),
            url: url.into(),
            meta: String::new(),
        }
    }

    pub fn titled(
        name: impl Into<String>,
        title: impl Into<String>,
        title_id: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: Category::Titles,
            title: title.into(),
            title_id: title_id.into(),
            url: url.into(),
            meta: String::new(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = meta.into();
        self
    }

    /// Text shown for the entry in a suggestion menu: the article name, or
    /// the heading title for anything that is not a whole article.
    pub fn label(&self) -> &str {
        match self.category {
            Category::Articles => &self.name,
            _ => &self.title,
        }
    }

    pub fn is_subtitle(&self) -> bool {
        !self.title.is_empty()
    }
}

/// Shape of an entry as found on the wire, before validation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    name: Option<String>,
    url: Option<String>,
    category: Option<String>,
    title: Option<String>,
    #[serde(rename = "titleID")]
    title_id: Option<String>,
    meta: Option<String>,
}

impl RawRecord {
    fn validate(self) -> std::result::Result<ArticleRecord, &'static str> {
        let name = self.name.filter(|n| !n.is_empty()).ok_or("missing name")?;
        let url = self.url.filter(|u| !u.is_empty()).ok_or("missing url")?;

        Ok(ArticleRecord {
            name,
            category: self.category.map(Category::from).unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            title_id: self.title_id.unwrap_or_default(),
            url,
            meta: self.meta.unwrap_or_default(),
        })
    }
}

/// Parse a JSON array of records. Entries that fail validation are skipped
/// with a warning; only a non-array document is an error.
pub fn parse_records(text: &str) -> Result<Vec<ArticleRecord>> {
    let entries: Vec<Value> = serde_json::from_str(text)
        .map_err(|e| IndexError::ParseError(format!("index is not a JSON array: {}", e)))?;

    Ok(validate_entries(entries))
}

fn validate_entries(entries: Vec<Value>) -> Vec<ArticleRecord> {
    let total = entries.len();
    let mut records = Vec::with_capacity(total);

    for (position, entry) in entries.into_iter().enumerate() {
        let raw: RawRecord = match serde_json::from_value(entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Skipping index entry {}: {}", position, e);
                continue;
            }
        };

        match raw.validate() {
            Ok(record) => records.push(record),
            Err(reason) => warn!("Skipping index entry {}: {}", position, reason),
        }
    }

    debug!("Parsed {} of {} index entries", records.len(), total);
    records
}

/// Parse a data script that embeds the records as an array literal, e.g.
/// `function getArticles() { var data = [ {...}, ... ]; return data; }`.
///
/// The literal is the first `[` that follows an assignment or a `return`.
/// Brackets in comments or after the literal are not part of it.
pub fn parse_embedded_script(script: &str) -> Result<Vec<ArticleRecord>> {
    let start = array_literal_start(script)
        .ok_or_else(|| IndexError::ParseError("no array literal in script".to_string()))?;

    let mut de = serde_json::Deserializer::from_str(&script[start..]);
    let entries = Vec::<Value>::deserialize(&mut de).map_err(|e| {
        IndexError::ParseError(format!("array literal in script is not JSON: {}", e))
    })?;

    Ok(validate_entries(entries))
}

fn array_literal_start(script: &str) -> Option<usize> {
    script.match_indices('[').map(|(i, _)| i).find(|&i| {
        let before = script[..i].trim_end();
        if before.ends_with('=') {
            return true;
        }
        before.strip_suffix("return").is_some_and(|head| {
            !head
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
    })
}
