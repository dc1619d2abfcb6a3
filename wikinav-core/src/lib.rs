pub mod config;
pub mod dom;
pub mod highlight;
pub mod lightbox;
pub mod navigator;
pub mod overlay;
pub mod resolver;
pub mod strategy;

pub use config::{SearchVariant, WikinavConfig};
pub use dom::{HtmlPage, ImageElement, PageDom};
pub use lightbox::{Lightbox, LightboxState, ModalView};
pub use navigator::{Location, Navigator};
pub use overlay::{SearchOverlay, Suggestion, Suggestions};
pub use resolver::{NavigationTarget, PathResolver};
pub use strategy::{
    CategoryStrategy, FullTextStrategy, MenuItem, MenuRow, PlainStrategy, RenderStrategy,
};
