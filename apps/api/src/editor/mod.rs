// Editable resume sessions: section edits with history, recommendation
// application, and Markdown/PDF export.

pub mod document;
pub mod error;
pub mod export;
pub mod handlers;
pub mod store;

pub use document::EditableResume;
pub use error::{EditorError, ExportError};
pub use store::EditorStore;
