// Tests for path resolution

use wikinav_core::resolver::{NavigationTarget, PathResolver};
use wikinav_index::{ArticleIndex, ArticleRecord, PageDepth};

fn sample_index() -> ArticleIndex {
    ArticleIndex::new(vec![
        ArticleRecord::new("Home", "index.html"),
        ArticleRecord::new("Ant integration", "articles/article_ant.html"),
        ArticleRecord::titled(
            "Ant integration",
            "Ant task",
            "ant_task",
            "articles/article_ant.html",
        ),
    ])
}

// ============================================================================
// Depth Prefix Tests
// ============================================================================

#[test]
fn test_resolve_at_root_returns_url_unchanged() {
    let index = sample_index();
    let resolver = PathResolver::new(index.paths(), PageDepth::Root);

    for record in index.records().iter().filter(|r| !r.is_subtitle()) {
        let target = resolver.resolve_record(record).unwrap();
        assert_eq!(target.to_string(), record.url);
    }
}

#[test]
fn test_resolve_from_article_page() {
    let index = sample_index();
    let resolver = PathResolver::new(index.paths(), PageDepth::Article);

    let target = resolver.resolve("Ant integration", "", "").unwrap();
    assert_eq!(target.to_string(), "../articles/article_ant.html");
}

#[test]
fn test_resolve_from_nested_page() {
    let index = sample_index();
    let resolver = PathResolver::new(index.paths(), PageDepth::Nested);

    let target = resolver.resolve("Home", "", "").unwrap();
    assert_eq!(target.to_string(), "../../index.html");
}

#[test]
fn test_depth_detected_from_page_matches_prefix() {
    let index = sample_index();
    let depth = PageDepth::detect("http://example.com/doc/articles/article_ant.html");
    let resolver = PathResolver::new(index.paths(), depth);

    assert_eq!(resolver.depth(), PageDepth::Article);
    assert_eq!(
        resolver.resolve("Home", "", "").unwrap().to_string(),
        "../index.html"
    );
}

// ============================================================================
// Fragment Tests
// ============================================================================

#[test]
fn test_resolve_titled_record_appends_fragment() {
    let index = sample_index();
    let resolver = PathResolver::new(index.paths(), PageDepth::Root);

    for record in index.records().iter().filter(|r| r.is_subtitle()) {
        let target = resolver.resolve_record(record).unwrap();
        assert_eq!(
            target.to_string(),
            format!("{}#{}", record.url, record.title_id)
        );
    }
}

#[test]
fn test_title_id_ignored_without_title() {
    let index = sample_index();
    let resolver = PathResolver::new(index.paths(), PageDepth::Root);

    let target = resolver.resolve("Home", "overview", "").unwrap();
    assert_eq!(target.fragment, None);
    assert_eq!(target.to_string(), "index.html");
}

#[test]
fn test_record_fragment_follows_subtitle() {
    let index = sample_index();
    let resolver = PathResolver::new(index.paths(), PageDepth::Root);

    let mut stray_anchor = ArticleRecord::new("Home", "index.html");
    stray_anchor.title_id = "overview".to_string();
    assert!(!stray_anchor.is_subtitle());
    assert_eq!(resolver.resolve_record(&stray_anchor).unwrap().fragment, None);

    let titled = &index.records()[2];
    assert_eq!(
        resolver.resolve_record(titled).unwrap().fragment.as_deref(),
        Some("ant_task")
    );
}

#[test]
fn test_fragment_and_prefix_combine() {
    let target = NavigationTarget {
        url: "articles/article_ant.html".to_string(),
        fragment: Some("ant_task".to_string()),
        depth: PageDepth::Nested,
    };
    assert_eq!(target.to_string(), "../../articles/article_ant.html#ant_task");
}

// ============================================================================
// Lookup Miss Tests
// ============================================================================

#[test]
fn test_unknown_name_resolves_to_none() {
    let index = sample_index();
    let resolver = PathResolver::new(index.paths(), PageDepth::Root);

    assert_eq!(resolver.resolve("Nonexistent", "", ""), None);
    assert_eq!(resolver.resolve("home", "", ""), None);
}

#[test]
fn test_duplicate_names_resolve_to_last_record() {
    let index = ArticleIndex::new(vec![
        ArticleRecord::new("Setup", "articles/setup_v1.html"),
        ArticleRecord::new("Setup", "articles/setup_v2.html"),
    ]);
    let resolver = PathResolver::new(index.paths(), PageDepth::Root);

    assert_eq!(
        resolver.resolve_record(&index.records()[0]).unwrap().to_string(),
        "articles/setup_v2.html"
    );
}
