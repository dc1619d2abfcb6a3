// Channel between the index loading task and the search box

use tokio::sync::mpsc;
use wikinav_index::ArticleIndex;

/// Outcome of the background index load.
#[derive(Debug)]
pub enum IndexMessage {
    Loaded(ArticleIndex),
    /// The index could not be loaded; the search box stays empty.
    Failed(String),
}

pub fn create_index_channel() -> (
    mpsc::UnboundedSender<IndexMessage>,
    mpsc::UnboundedReceiver<IndexMessage>,
) {
    mpsc::unbounded_channel()
}
