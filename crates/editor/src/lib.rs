//! # mlreview editor
//!
//! Source buffer state shared with the presentation surface:
//!
//! - **Line index** - 1-based line table recomputed on every edit
//! - **Indentation** - the indent key replaces the selection with a fixed indent
//! - **Code preview** - the lines around a finding, for result decoration
//! - **Line highlight** - approximate line bands that expire after a fixed lifetime

mod buffer;
mod error;
mod highlight;
mod line_index;

pub use buffer::{Editor, EditorConfig, Key};
pub use error::{EditorError, Result};
pub use highlight::{Highlight, HighlightBoard, DEFAULT_HIGHLIGHT_LIFETIME};
pub use line_index::{preview, LineIndex, PreviewLine};
