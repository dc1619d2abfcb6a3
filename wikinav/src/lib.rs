pub mod handlers;
pub mod logging;

// Re-export the helpers the handlers are built from
pub use handlers::{
    build_overlay, format_rows, index_source, open_lightbox, page_depth, parse_page,
    summarize_index,
};
pub use logging::init_logging;
