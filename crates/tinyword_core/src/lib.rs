pub mod document;
pub mod gap_buffer;
pub mod selection;
pub mod style;

pub use document::{Change, ChangeListener, Document, DocumentError, DocumentResult};
pub use selection::Selection;
pub use style::{Color, Font, StyleEntry, StyleTable, StyleTag};
