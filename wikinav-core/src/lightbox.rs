// Lightbox image viewer

use crate::dom::{ImageElement, PageDom};
use serde::Serialize;
use tracing::debug;

/// Suffix appended to an image id to find its caption element.
pub const CAPTION_SUFFIX: &str = "_caption";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightboxState {
    #[default]
    Closed,
    Open,
}

/// Snapshot of the modal as a page would display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub state: LightboxState,
    pub image_src: String,
    pub caption: String,
    pub background_fixed: bool,
}

/// Content and visibility of the single modal image container. Opening
/// replaces whatever was shown before; there is no stacking.
#[derive(Debug, Clone)]
pub struct Lightbox {
    state: LightboxState,
    image_src: String,
    caption: String,
    caption_suffix: String,
}

impl Default for Lightbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lightbox {
    pub fn new() -> Self {
        Self {
            state: LightboxState::Closed,
            image_src: String::new(),
            caption: String::new(),
            caption_suffix: CAPTION_SUFFIX.to_string(),
        }
    }

    pub fn with_caption_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.caption_suffix = suffix.into();
        self
    }

    /// Show `image` in the modal. The caption is the text of the element
    /// `<image id><suffix>` when the page has one, empty otherwise.
    pub fn open(&mut self, image: &ImageElement, dom: &dyn PageDom) {
        let caption_id = format!("{}{}", image.id, self.caption_suffix);
        self.caption = dom.text_of(&caption_id).unwrap_or_default();
        self.image_src = image.src.clone();
        self.state = LightboxState::Open;
        debug!("Lightbox opened on {} (caption: {:?})", image.id, self.caption);
    }

    pub fn close(&mut self) {
        self.state = LightboxState::Closed;
    }

    pub fn state(&self) -> LightboxState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == LightboxState::Open
    }

    pub fn image_src(&self) -> &str {
        &self.image_src
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn view(&self) -> ModalView {
        ModalView {
            state: self.state,
            image_src: self.image_src.clone(),
            caption: self.caption.clone(),
            background_fixed: self.is_visible(),
        }
    }
}
