use crate::depth::PageDepth;
use crate::error::{IndexError, Result};
use crate::index::ArticleIndex;
use crate::record::{parse_embedded_script, parse_records};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Root-relative location of the index the wiki generator writes.
pub const DEFAULT_INDEX_PATH: &str = "resources/articles.json";

/// Where the records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// Text of a data script embedding the records as an array literal.
    Embedded(String),
    /// JSON array, or a `.js` data script, on disk.
    File(PathBuf),
    /// JSON array served over HTTP.
    Remote(Url),
    /// Index located relative to the given page, depending on its depth.
    ForPage(Url),
}

impl IndexSource {
    /// Interpret a command-line argument: `http(s)` URLs are fetched,
    /// `file` URLs and anything else are read from disk.
    pub fn parse(spec: &str) -> Self {
        if let Ok(url) = Url::parse(spec) {
            match url.scheme() {
                "http" | "https" => return IndexSource::Remote(url),
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return IndexSource::File(path);
                    }
                }
                _ => {}
            }
        }
        IndexSource::File(PathBuf::from(spec))
    }
}

pub struct IndexLoader {
    client: Client,
    index_path: String,
}

impl IndexLoader {
    pub fn new() -> Result<Self> {
        Self::with_timeout(10)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("wikinav/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            index_path: DEFAULT_INDEX_PATH.to_string(),
        })
    }

    /// Override the root-relative index path used for `IndexSource::ForPage`.
    pub fn with_index_path(mut self, index_path: impl Into<String>) -> Self {
        self.index_path = index_path.into();
        self
    }

    /// Absolute location of the index as seen from `page`.
    pub fn index_location(&self, page: &Url) -> Result<Url> {
        let depth = PageDepth::from_url(page);
        let relative = depth.relative_to_root(&self.index_path);
        debug!("Page {} has depth {}, index at {}", page, depth.level(), relative);
        page.join(&relative)
            .map_err(|e| IndexError::InvalidUrl(format!("{}: {}", relative, e)))
    }

    pub async fn load(&self, source: &IndexSource) -> Result<ArticleIndex> {
        let records = match source {
            IndexSource::Embedded(script) => parse_embedded_script(script)?,
            IndexSource::File(path) => Self::read_file(path).await?,
            IndexSource::Remote(url) => parse_records(&self.fetch_text(url).await?)?,
            IndexSource::ForPage(page) => {
                let location = self.index_location(page)?;
                match location.scheme() {
                    "file" => {
                        let path = location.to_file_path().map_err(|_| {
                            IndexError::InvalidUrl(format!("not a local path: {}", location))
                        })?;
                        Self::read_file(&path).await?
                    }
                    _ => parse_records(&self.fetch_text(&location).await?)?,
                }
            }
        };

        let index = ArticleIndex::new(records);
        info!("Loaded {} index records", index.len());
        Ok(index)
    }

    /// Load the index, degrading to an empty one on any failure so that
    /// search simply offers no suggestions.
    pub async fn load_or_empty(&self, source: &IndexSource) -> ArticleIndex {
        match self.load(source).await {
            Ok(index) => index,
            Err(e) => {
                warn!("Search index unavailable: {}", e);
                ArticleIndex::empty()
            }
        }
    }

    async fn read_file(path: &Path) -> Result<Vec<crate::ArticleRecord>> {
        debug!("Reading index from {}", path.display());
        let text = tokio::fs::read_to_string(path).await?;
        let is_script = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("js"))
            .unwrap_or(false);

        if is_script {
            parse_embedded_script(&text)
        } else {
            parse_records(&text)
        }
    }

    async fn fetch_text(&self, url: &Url) -> Result<String> {
        debug!("Fetching index from {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const ARTICLES_JSON: &str = r#"[
        {"name": "Home", "category": "articles", "title": "", "titleID": "", "url": "index.html"},
        {"name": "Algorithm", "category": "articles", "title": "", "titleID": "", "url": "articles/article_algorithm.html"},
        {"name": "Algorithm", "category": "titles", "title": "Overview", "titleID": "overview", "url": "articles/article_algorithm.html"}
    ]"#;

    async fn serve_index(mock_server: &MockServer, at: &str) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string(ARTICLES_JSON),
            )
            .mount(mock_server)
            .await;
    }

    #[tokio::test]
    async fn test_remote_index_loads() {
        let mock_server = MockServer::start().await;
        serve_index(&mock_server, "/resources/articles.json").await;

        let loader = IndexLoader::new().unwrap();
        let url = Url::parse(&format!("{}/resources/articles.json", mock_server.uri())).unwrap();
        let index = loader.load(&IndexSource::Remote(url)).await.unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.paths().get("Algorithm"),
            Some("articles/article_algorithm.html")
        );
    }

    #[tokio::test]
    async fn test_index_for_article_page_climbs_one_level() {
        let mock_server = MockServer::start().await;
        serve_index(&mock_server, "/doc/resources/articles.json").await;

        let loader = IndexLoader::new().unwrap();
        let page =
            Url::parse(&format!("{}/doc/articles/article_algorithm.html", mock_server.uri()))
                .unwrap();
        let index = loader.load(&IndexSource::ForPage(page)).await.unwrap();

        assert_eq!(index.len(), 3);
    }

    #[tokio::test]
    async fn test_index_for_nested_page_climbs_two_levels() {
        let mock_server = MockServer::start().await;
        serve_index(&mock_server, "/doc/resources/articles.json").await;

        let loader = IndexLoader::new().unwrap();
        let page = Url::parse(&format!(
            "{}/doc/articles/resources/figure.html",
            mock_server.uri()
        ))
        .unwrap();
        let location = loader.index_location(&page).unwrap();
        assert_eq!(location.path(), "/doc/resources/articles.json");

        let index = loader.load(&IndexSource::ForPage(page)).await.unwrap();
        assert!(!index.is_empty());
    }

    #[tokio::test]
    async fn test_missing_index_degrades_to_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resources/articles.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let loader = IndexLoader::new().unwrap();
        let url = Url::parse(&format!("{}/resources/articles.json", mock_server.uri())).unwrap();

        let err = loader.load(&IndexSource::Remote(url.clone())).await.unwrap_err();
        assert!(matches!(err, IndexError::HttpStatus { status: 404, .. }));

        let index = loader.load_or_empty(&IndexSource::Remote(url)).await;
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_degrades_to_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resources/articles.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let loader = IndexLoader::new().unwrap();
        let url = Url::parse(&format!("{}/resources/articles.json", mock_server.uri())).unwrap();
        let index = loader.load_or_empty(&IndexSource::Remote(url)).await;

        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_hung_fetch_times_out_to_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resources/articles.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(ARTICLES_JSON)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let loader = IndexLoader::with_timeout(1).unwrap();
        let url = Url::parse(&format!("{}/resources/articles.json", mock_server.uri())).unwrap();

        let err = loader.load(&IndexSource::Remote(url.clone())).await.unwrap_err();
        assert!(matches!(err, IndexError::HttpError(ref e) if e.is_timeout()));

        let index = loader.load_or_empty(&IndexSource::Remote(url)).await;
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_embedded_script_loads() {
        let script = format!(
            "function getArticles() {{\n  var articles = {};\n  return articles;\n}}",
            ARTICLES_JSON
        );
        let loader = IndexLoader::new().unwrap();
        let index = loader.load(&IndexSource::Embedded(script)).await.unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.records()[2].title_id, "overview");
    }

    #[test]
    fn test_source_parse() {
        assert!(matches!(
            IndexSource::parse("https://example.com/resources/articles.json"),
            IndexSource::Remote(_)
        ));
        assert_eq!(
            IndexSource::parse("site/resources/articles.json"),
            IndexSource::File(PathBuf::from("site/resources/articles.json"))
        );
    }
}
