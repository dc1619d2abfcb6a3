use serde::{Deserialize, Serialize};
use url::Url;

/// Directory segment under which the wiki generator places article pages.
pub const ARTICLES_DIR: &str = "articles";

/// How many directory levels the current page sits below the site root.
///
/// The generator writes the home page at the root, articles under
/// `articles/`, and article resources one level deeper, so only three
/// depths exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDepth {
    #[default]
    Root,
    Article,
    Nested,
}

impl PageDepth {
    /// Detect the depth of a page location. Accepts absolute URLs as well
    /// as plain paths such as `site/articles/page.html`.
    pub fn detect(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) => Self::from_url(&url),
            Err(_) => {
                let path = location
                    .split(['?', '#'])
                    .next()
                    .unwrap_or_default();
                Self::from_segments(&path.split('/').collect::<Vec<_>>())
            }
        }
    }

    pub fn from_url(url: &Url) -> Self {
        match url.path_segments() {
            Some(segments) => Self::from_segments(&segments.collect::<Vec<_>>()),
            None => PageDepth::Root,
        }
    }

    fn from_segments(segments: &[&str]) -> Self {
        let n = segments.len();
        if n >= 2 && segments[n - 2] == ARTICLES_DIR {
            PageDepth::Article
        } else if n >= 3 && segments[n - 3] == ARTICLES_DIR {
            PageDepth::Nested
        } else {
            PageDepth::Root
        }
    }

    pub fn level(self) -> usize {
        match self {
            PageDepth::Root => 0,
            PageDepth::Article => 1,
            PageDepth::Nested => 2,
        }
    }

    /// Prefix that climbs from the page back to the site root.
    pub fn prefix(self) -> &'static str {
        match self {
            PageDepth::Root => "",
            PageDepth::Article => "../",
            PageDepth::Nested => "../../",
        }
    }

    /// Path of a root-relative resource as seen from the page, e.g.
    /// `./resources/articles.json` or `../resources/articles.json`.
    pub fn relative_to_root(self, resource: &str) -> String {
        let resource = resource.trim_start_matches("./").trim_start_matches('/');
        match self {
            PageDepth::Root => format!("./{}", resource),
            _ => format!("{}{}", self.prefix(), resource),
        }
    }
}
