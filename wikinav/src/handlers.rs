use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use wikinav_core::highlight::{Segment, SegmentStyle};
use wikinav_core::{
    HtmlPage, Lightbox, MenuRow, ModalView, PageDom, PathResolver, SearchOverlay, SearchVariant,
    WikinavConfig,
};
use wikinav_index::{ArticleIndex, IndexLoader, IndexSource, PageDepth};
use wikinav_tui::{IndexMessage, create_index_channel};

// Helper functions shared by the handlers

/// Interpret `--page` as a URL, or as a local path turned into a `file` URL.
pub fn parse_page(page: &str) -> Result<Url, String> {
    if let Ok(url) = Url::parse(page)
        && (url.has_host() || url.scheme() == "file")
    {
        return Ok(url);
    }

    let expanded = shellexpand::tilde(page);
    let path = std::path::absolute(Path::new(expanded.as_ref()))
        .map_err(|e| format!("Invalid page path '{}': {}", page, e))?;
    Url::from_file_path(&path).map_err(|_| format!("Invalid page path '{}'", path.display()))
}

/// Where to load the index from: `--index` when given, otherwise next to
/// the page.
pub fn index_source(index: Option<&str>, page: Option<&Url>) -> Result<IndexSource, String> {
    if let Some(index) = index {
        Ok(IndexSource::parse(shellexpand::tilde(index).as_ref()))
    } else if let Some(page) = page {
        Ok(IndexSource::ForPage(page.clone()))
    } else {
        Err("Either --index or --page must be provided".to_string())
    }
}

pub fn page_depth(page: Option<&Url>) -> PageDepth {
    page.map(PageDepth::from_url).unwrap_or_default()
}

pub fn build_overlay(
    cfg: &WikinavConfig,
    variant: SearchVariant,
    depth: PageDepth,
    limit: Option<usize>,
) -> SearchOverlay {
    SearchOverlay::new(variant.strategy(), depth)
        .with_min_query_len(cfg.search.min_query_len)
        .with_max_suggestions(limit.or(Some(cfg.search.max_suggestions)))
}

pub fn create_loader(cfg: &WikinavConfig) -> Result<IndexLoader> {
    Ok(IndexLoader::with_timeout(cfg.index.timeout_secs)
        .context("Failed to create HTTP client")?
        .with_index_path(cfg.index.path.clone()))
}

fn spinner(quiet: bool, message: String) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    Ok(spinner)
}

fn describe(source: &IndexSource) -> String {
    match source {
        IndexSource::Embedded(_) => "embedded index".to_string(),
        IndexSource::File(path) => path.display().to_string(),
        IndexSource::Remote(url) | IndexSource::ForPage(url) => url.to_string(),
    }
}

/// Load the index, failing on any error.
pub async fn load_index(
    loader: &IndexLoader,
    source: &IndexSource,
    quiet: bool,
) -> Result<ArticleIndex> {
    let progress = spinner(quiet, format!("Loading index from {}", describe(source)))?;
    let result = loader.load(source).await;
    progress.finish_and_clear();
    result.with_context(|| format!("Failed to load index from {}", describe(source)))
}

/// Load the index the way the search box does: failures leave it empty.
pub async fn load_index_or_empty(
    loader: &IndexLoader,
    source: &IndexSource,
    quiet: bool,
) -> Result<ArticleIndex> {
    let progress = spinner(quiet, format!("Loading index from {}", describe(source)))?;
    let index = loader.load_or_empty(source).await;
    progress.finish_and_clear();
    Ok(index)
}

fn segment_text(segment: &Segment) -> String {
    match segment.style {
        SegmentStyle::Plain => segment.text.clone(),
        SegmentStyle::Emphasis => segment.text.bold().underline().to_string(),
        SegmentStyle::Italic => segment.text.italic().to_string(),
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Render menu rows as terminal lines or as the menu's list markup.
pub fn format_rows(overlay: &SearchOverlay, rows: &[MenuRow], html: bool) -> Vec<String> {
    rows.iter()
        .map(|row| match row {
            MenuRow::Header(category) if html => {
                format!("<li class='ui-autocomplete-category'>{}</li>", category)
            }
            MenuRow::Header(category) => category.to_string().bright_blue().bold().to_string(),
            MenuRow::Item(item) if html => match item.aria_label {
                Some(ref label) => {
                    format!("<li aria-label=\"{}\"><a>{}</a></li>", escape_attr(label), item.html())
                }
                None => format!("<li><a>{}</a></li>", item.html()),
            },
            MenuRow::Item(item) => {
                let text: String = item.segments.iter().map(segment_text).collect();
                let link = overlay
                    .record(item.position)
                    .and_then(|record| overlay.resolve(record))
                    .map(|target| format!("  → {}", target).dimmed().to_string())
                    .unwrap_or_default();
                format!("  {}{}", text, link)
            }
        })
        .collect()
}

pub fn summarize_index(index: &ArticleIndex) -> Vec<String> {
    let mut lines = vec![format!(
        "{} records, {} distinct names",
        index.len(),
        index.paths().len()
    )];
    for (category, count) in index.category_counts() {
        lines.push(format!("  {:<12} {}", category.as_str(), count));
    }
    if !index.paths().collisions().is_empty() {
        lines.push(format!(
            "Duplicate names (last entry wins): {}",
            index.paths().collisions().join(", ")
        ));
    }
    lines
}

/// Open the lightbox on `image_id` of `page` and return what the modal shows.
pub fn open_lightbox(page: &HtmlPage, image_id: &str, caption_suffix: &str) -> Result<ModalView> {
    let image = page
        .image(image_id)
        .ok_or_else(|| anyhow!("No image with id '{}' on the page", image_id))?;
    let mut lightbox = Lightbox::new().with_caption_suffix(caption_suffix);
    lightbox.open(&image, page);
    Ok(lightbox.view())
}

fn variant_arg(args: &ArgMatches, cfg: &WikinavConfig) -> Result<SearchVariant> {
    match args.get_one::<String>("variant") {
        Some(variant) => variant.parse().map_err(|e: String| anyhow!(e)),
        None => Ok(cfg.search.variant),
    }
}

fn page_arg(args: &ArgMatches) -> Result<Option<Url>> {
    args.get_one::<String>("page")
        .map(|page| parse_page(page))
        .transpose()
        .map_err(|e| anyhow!(e))
}

// Command handlers

pub async fn handle_search(args: &ArgMatches, cfg: &WikinavConfig, quiet: bool) -> Result<()> {
    let query = args
        .get_one::<String>("QUERY")
        .ok_or_else(|| anyhow!("QUERY is required"))?;
    let page = page_arg(args)?;
    let source = index_source(args.get_one::<String>("index").map(String::as_str), page.as_ref())
        .map_err(|e| anyhow!(e))?;
    let variant = variant_arg(args, cfg)?;
    let limit = args.get_one::<usize>("limit").copied();
    let html = args.get_flag("html");

    let loader = create_loader(cfg)?;
    let index = load_index_or_empty(&loader, &source, quiet).await?;
    let overlay = build_overlay(cfg, variant, page_depth(page.as_ref()), limit).with_index(index);

    let rows = overlay.render(query);
    for line in format_rows(&overlay, &rows, html) {
        println!("{}", line);
    }

    if !quiet && !html {
        let count = rows.iter().filter(|row| matches!(row, MenuRow::Item(_))).count();
        eprintln!(
            "{} {} suggestion(s) for '{}' ({} search)",
            "→".blue(),
            count.to_string().cyan(),
            query,
            variant
        );
    }
    Ok(())
}

pub async fn handle_resolve(args: &ArgMatches, cfg: &WikinavConfig, quiet: bool) -> Result<()> {
    let name = args
        .get_one::<String>("NAME")
        .ok_or_else(|| anyhow!("NAME is required"))?;
    let title_id = args.get_one::<String>("title-id").map(String::as_str).unwrap_or_default();
    let title = args.get_one::<String>("title").map(String::as_str).unwrap_or_default();
    let page = page_arg(args)?;
    let source = index_source(args.get_one::<String>("index").map(String::as_str), page.as_ref())
        .map_err(|e| anyhow!(e))?;

    let loader = create_loader(cfg)?;
    let index = load_index_or_empty(&loader, &source, quiet).await?;
    let resolver = PathResolver::new(index.paths(), page_depth(page.as_ref()));

    // An unknown name prints nothing, like a selection that does not navigate.
    if let Some(target) = resolver.resolve(name, title_id, title) {
        println!("{}", target);
    } else if !quiet {
        eprintln!("{} No page known for '{}'", "✗".red().bold(), name);
    }
    Ok(())
}

pub async fn handle_ui(args: &ArgMatches, cfg: &WikinavConfig) -> Result<()> {
    let page = page_arg(args)?;
    let source = index_source(args.get_one::<String>("index").map(String::as_str), page.as_ref())
        .map_err(|e| anyhow!(e))?;
    let variant = variant_arg(args, cfg)?;
    let overlay = build_overlay(cfg, variant, page_depth(page.as_ref()), None);

    let loader = create_loader(cfg)?;
    let (tx, rx) = create_index_channel();

    tokio::spawn(async move {
        let message = match loader.load(&source).await {
            Ok(index) => IndexMessage::Loaded(index),
            Err(e) => IndexMessage::Failed(e.to_string()),
        };
        // The UI may already have exited.
        let _ = tx.send(message);
    });

    let search_box_id = cfg.dom.search_box_id.clone();
    let target =
        tokio::task::spawn_blocking(move || wikinav_tui::run(overlay, &search_box_id, rx))
            .await
            .context("Search UI panicked")??;

    if let Some(target) = target {
        println!("{}", target);
    }
    Ok(())
}

pub fn handle_lightbox(args: &ArgMatches, cfg: &WikinavConfig) -> Result<()> {
    let path = args
        .get_one::<PathBuf>("page")
        .ok_or_else(|| anyhow!("--page is required"))?;
    let page = HtmlPage::from_file(path)
        .with_context(|| format!("Failed to read page {}", path.display()))?;
    let json = args.get_flag("json");

    if args.get_flag("list") {
        let images = page.images();
        if json {
            println!("{}", serde_json::to_string_pretty(&images)?);
            return Ok(());
        }
        if images.is_empty() {
            println!("{} No images with an id on {}", "→".blue(), path.display());
        }
        for image in images {
            let caption_id = format!("{}{}", image.id, cfg.dom.caption_suffix);
            let marker = if page.has_element(&caption_id) {
                "✓".green().bold()
            } else {
                "•".yellow()
            };
            println!("  {} {} {}", marker, image.id.bright_white(), image.src.dimmed());
        }
        return Ok(());
    }

    let Some(image_id) = args.get_one::<String>("image") else {
        bail!("Either --image or --list must be provided");
    };
    let view = open_lightbox(&page, image_id, &cfg.dom.caption_suffix)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!(
            "{} #{} is {:?}",
            "✓".green().bold(),
            cfg.dom.modal_id,
            view.state
        );
        println!("  #{} src: {}", cfg.dom.modal_image_id, view.image_src.bright_white());
        println!("  #{} text: {}", cfg.dom.modal_caption_id, view.caption.bright_white());
        println!("  background fixed: {}", view.background_fixed);
    }
    Ok(())
}

pub async fn handle_index(args: &ArgMatches, cfg: &WikinavConfig, quiet: bool) -> Result<()> {
    let page = page_arg(args)?;
    let source = index_source(args.get_one::<String>("index").map(String::as_str), page.as_ref())
        .map_err(|e| anyhow!(e))?;

    let loader = create_loader(cfg)?;
    let index = load_index(&loader, &source, quiet).await?;

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(index.records())?);
        return Ok(());
    }

    println!("{} {}", "✓".green().bold(), describe(&source).bright_white());
    for line in summarize_index(&index) {
        println!("{}", line);
    }
    Ok(())
}
