use crate::error::{EditorError, Result};
use crate::highlight::{Highlight, HighlightBoard, DEFAULT_HIGHLIGHT_LIFETIME};
use crate::line_index::{preview, LineIndex, PreviewLine};
use std::ops::Range;
use std::time::{Duration, Instant};

/// Editor behaviour knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Text inserted by the indent key
    pub indent: String,

    /// How long a line highlight stays visible
    pub highlight_lifetime: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            highlight_lifetime: DEFAULT_HIGHLIGHT_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Designated indent key
    Tab,
    Enter,
    Backspace,
    Char(char),
}

/// Source buffer with a byte-offset selection and an always-current [`LineIndex`].
#[derive(Debug, Clone)]
pub struct Editor {
    text: String,
    selection: Range<usize>,
    index: LineIndex,
    highlights: HighlightBoard,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            text: String::new(),
            selection: 0..0,
            index: LineIndex::default(),
            highlights: HighlightBoard::new(config.highlight_lifetime),
            config,
        }
    }

    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut editor = Self::default();
        editor.set_text(text);
        editor
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn line_index(&self) -> &LineIndex {
        &self.index
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    #[must_use]
    pub fn gutter(&self) -> String {
        self.index.gutter()
    }

    #[must_use]
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Cursor position: the end of the current selection.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.selection.end
    }

    /// Replace the whole buffer; the cursor moves to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let end = self.text.len();
        self.selection = end..end;
        self.reindex();
    }

    pub fn set_cursor(&mut self, offset: usize) -> Result<()> {
        self.select(offset..offset)
    }

    pub fn select(&mut self, range: Range<usize>) -> Result<()> {
        if range.start > range.end {
            return Err(EditorError::InvalidSelection {
                start: range.start,
                end: range.end,
            });
        }
        self.check_offset(range.start)?;
        self.check_offset(range.end)?;
        self.selection = range;
        Ok(())
    }

    /// Replace the selection with `insert`, leaving the cursor right after it.
    pub fn replace_selection(&mut self, insert: &str) {
        let Range { start, end } = self.selection.clone();
        self.text.replace_range(start..end, insert);
        let cursor = start + insert.len();
        self.selection = cursor..cursor;
        self.reindex();
    }

    pub fn insert_indent(&mut self) {
        let indent = self.config.indent.clone();
        self.replace_selection(&indent);
    }

    /// Apply a key press; returns `true` when the buffer changed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Tab => self.insert_indent(),
            Key::Enter => self.replace_selection("\n"),
            Key::Char(c) => {
                let mut buf = [0u8; 4];
                self.replace_selection(c.encode_utf8(&mut buf));
            }
            Key::Backspace => {
                if self.selection.is_empty() {
                    let Some(prev) = self.text[..self.selection.start].chars().next_back() else {
                        return false;
                    };
                    let start = self.selection.start - prev.len_utf8();
                    self.selection = start..self.selection.end;
                }
                self.replace_selection("");
            }
        }
        true
    }

    /// Empty the buffer. Live highlights stay until they expire.
    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    #[must_use]
    pub fn preview(&self, line: usize) -> Vec<PreviewLine> {
        preview(&self.index, &self.text, line)
    }

    pub fn highlight_line(
        &mut self,
        line: usize,
        rendered_height: f32,
        now: Instant,
    ) -> Option<Highlight> {
        self.highlights.sweep(now);
        self.highlights
            .place(line, self.index.line_count(), rendered_height, now)
    }

    /// Handle a click on a gutter label; labels without a leading number are ignored.
    pub fn click_gutter(
        &mut self,
        label: &str,
        rendered_height: f32,
        now: Instant,
    ) -> Option<Highlight> {
        let line = parse_leading_number(label)?;
        self.highlight_line(line, rendered_height, now)
    }

    #[must_use]
    pub const fn highlights(&self) -> &HighlightBoard {
        &self.highlights
    }

    pub fn sweep_highlights(&mut self, now: Instant) -> usize {
        self.highlights.sweep(now)
    }

    fn reindex(&mut self) {
        self.index = LineIndex::new(&self.text);
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset > self.text.len() {
            return Err(EditorError::OutOfBounds {
                offset,
                len: self.text.len(),
            });
        }
        if !self.text.is_char_boundary(offset) {
            return Err(EditorError::NotCharBoundary { offset });
        }
        Ok(())
    }
}

fn parse_leading_number(label: &str) -> Option<usize> {
    let trimmed = label.trim_start();
    let digits: &str = &trimmed[..trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len())];
    digits.parse().ok()
}
