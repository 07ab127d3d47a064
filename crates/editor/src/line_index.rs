use serde::Serialize;

/// 1-based line table over a source buffer.
///
/// Stores only line start offsets; callers pass the indexed text back in to slice lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new("")
    }
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            starts,
            len: text.len(),
        }
    }

    /// Number of lines; an empty buffer still has one line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    #[must_use]
    pub fn contains(&self, line: usize) -> bool {
        line >= 1 && line <= self.line_count()
    }

    /// Text of `line` (1-based) without its trailing newline.
    #[must_use]
    pub fn line<'t>(&self, text: &'t str, line: usize) -> Option<&'t str> {
        if !self.contains(line) {
            return None;
        }
        let start = self.starts[line - 1];
        let end = self
            .starts
            .get(line)
            .map_or(self.len, |next| next.saturating_sub(1));
        text.get(start..end)
    }

    /// Line (1-based) holding byte `offset`.
    #[must_use]
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.starts.partition_point(|start| *start <= offset).max(1)
    }

    /// Gutter text: line numbers joined by newlines.
    #[must_use]
    pub fn gutter(&self) -> String {
        (1..=self.line_count())
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One line of a code preview around a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewLine {
    pub number: usize,
    pub text: String,
    pub focused: bool,
}

/// The line before `line`, `line` itself, and the line after, clamped to the buffer.
#[must_use]
pub fn preview(index: &LineIndex, text: &str, line: usize) -> Vec<PreviewLine> {
    if line == 0 {
        return Vec::new();
    }
    let first = line.saturating_sub(1).max(1);
    let last = (line + 1).min(index.line_count());
    (first..=last)
        .filter_map(|number| {
            index.line(text, number).map(|content| PreviewLine {
                number,
                text: content.to_string(),
                focused: number == line,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn empty_buffer_has_one_line() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line("", 1), Some(""));
        assert_eq!(index.gutter(), "1");
    }

    #[test]
    fn trailing_newline_opens_a_line() {
        let text = "a\nb\n";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line(text, 2), Some("b"));
        assert_eq!(index.line(text, 3), Some(""));
        assert_eq!(index.line(text, 4), None);
        assert_eq!(index.line(text, 0), None);
        assert_eq!(index.gutter(), "1\n2\n3");
    }

    #[test]
    fn offset_maps_to_line() {
        let text = "ab\ncd\nef";
        let index = LineIndex::new(text);
        assert_eq!(index.line_of_offset(0), 1);
        assert_eq!(index.line_of_offset(2), 1);
        assert_eq!(index.line_of_offset(3), 2);
        assert_eq!(index.line_of_offset(7), 3);
    }

    #[test]
    fn preview_is_clamped_and_focused() {
        let text = "one\ntwo\nthree\nfour";
        let index = LineIndex::new(text);
        let lines = preview(&index, text, 1);
        assert_eq!(
            lines,
            vec![
                PreviewLine {
                    number: 1,
                    text: "one".into(),
                    focused: true
                },
                PreviewLine {
                    number: 2,
                    text: "two".into(),
                    focused: false
                },
            ]
        );
        let numbers: Vec<_> = preview(&index, text, 3).iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
        let numbers: Vec<_> = preview(&index, text, 4).iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![3, 4]);
        assert!(preview(&index, text, 0).is_empty());
        assert!(preview(&index, text, 9).is_empty());
    }

    proptest! {
        #[test]
        fn proptest_line_count_matches_split(text in "[a-z\\n]{0,64}") {
            let index = LineIndex::new(&text);
            prop_assert_eq!(index.line_count(), text.split('\n').count());
            for (i, expected) in text.split('\n').enumerate() {
                prop_assert_eq!(index.line(&text, i + 1), Some(expected));
            }
        }
    }
}
