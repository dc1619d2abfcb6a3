pub mod depth;
pub mod error;
pub mod index;
pub mod loader;
pub mod record;

pub use depth::PageDepth;
pub use error::IndexError;
pub use index::{ArticleIndex, PathTable};
pub use loader::{IndexLoader, IndexSource};
pub use record::{ArticleRecord, Category};
