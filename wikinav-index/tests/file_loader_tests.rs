// Tests for loading the index from disk

use std::io::Write;
use tempfile::{Builder, NamedTempFile};
use url::Url;
use wikinav_index::{IndexLoader, IndexSource};

#[tokio::test]
async fn test_load_json_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"[{{"name": "Home", "url": "index.html"}}, {{"name": "Ant integration", "url": "articles/article_ant.html"}}]"#
    )?;

    let loader = IndexLoader::new()?;
    let index = loader
        .load(&IndexSource::File(file.path().to_path_buf()))
        .await?;

    assert_eq!(index.len(), 2);
    assert_eq!(index.paths().get("Ant integration"), Some("articles/article_ant.html"));
    Ok(())
}

#[tokio::test]
async fn test_load_script_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut file = Builder::new().suffix(".js").tempfile()?;
    writeln!(file, "function getArticles() {{")?;
    writeln!(file, r#"  var data = [{{"name": "Home", "url": "index.html"}}];"#)?;
    writeln!(file, "  return data;")?;
    writeln!(file, "}}")?;

    let loader = IndexLoader::new()?;
    let index = loader
        .load(&IndexSource::File(file.path().to_path_buf()))
        .await?;

    assert_eq!(index.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_file_degrades_to_empty() {
    let loader = IndexLoader::new().unwrap();
    let index = loader
        .load_or_empty(&IndexSource::File("/nonexistent/resources/articles.json".into()))
        .await;

    assert!(index.is_empty());
}

#[tokio::test]
async fn test_for_page_reads_local_site() -> Result<(), Box<dyn std::error::Error>> {
    let site = tempfile::tempdir()?;
    std::fs::create_dir_all(site.path().join("resources"))?;
    std::fs::create_dir_all(site.path().join("articles"))?;
    std::fs::write(
        site.path().join("resources").join("articles.json"),
        r#"[{"name": "Home", "url": "index.html"}]"#,
    )?;

    let page = Url::from_file_path(site.path().join("articles").join("article_ant.html"))
        .map_err(|_| "temp dir is not absolute")?;

    let loader = IndexLoader::new()?;
    let index = loader.load(&IndexSource::ForPage(page)).await?;

    assert_eq!(index.len(), 1);
    Ok(())
}
