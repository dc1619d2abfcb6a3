// Element lookups on a generated wiki page

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// The part of a page the lightbox needs: text content by element id.
pub trait PageDom {
    fn text_of(&self, id: &str) -> Option<String>;

    fn has_element(&self, id: &str) -> bool {
        self.text_of(id).is_some()
    }
}

/// An image a reader can click to open in the lightbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageElement {
    pub id: String,
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ImageElement {
    pub fn new(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            alt: None,
        }
    }
}

/// A parsed HTML page.
pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let html = fs::read_to_string(path)?;
        Ok(Self::parse(&html))
    }

    fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse("[id]").ok()?;
        self.document
            .select(&selector)
            .find(|element| element.value().id() == Some(id))
    }

    /// Images carrying both an `id` and a `src`, in document order.
    pub fn images(&self) -> Vec<ImageElement> {
        let Ok(selector) = Selector::parse("img[id][src]") else {
            return Vec::new();
        };

        self.document
            .select(&selector)
            .filter_map(|element| {
                let value = element.value();
                Some(ImageElement {
                    id: value.id()?.to_string(),
                    src: value.attr("src")?.to_string(),
                    alt: value.attr("alt").map(str::to_string),
                })
            })
            .collect()
    }

    pub fn image(&self, id: &str) -> Option<ImageElement> {
        self.images().into_iter().find(|image| image.id == id)
    }
}

impl PageDom for HtmlPage {
    fn text_of(&self, id: &str) -> Option<String> {
        self.element_by_id(id)
            .map(|element| element.text().collect::<String>().trim().to_string())
    }

    fn has_element(&self, id: &str) -> bool {
        self.element_by_id(id).is_some()
    }
}
