use tinyword_term::units::OffsetUsize;
use unicode_width::UnicodeWidthChar;

/// One screen row of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// First character index.
    pub start: usize,
    /// One past the last character shown on the row. A trailing newline is
    /// not part of the row.
    pub end: usize,

    /// Width of the row, in cells.
    pub width: usize,

    /// The line number, if this row starts a line.
    pub line: Option<usize>,

    /// Whether the line continues on the next row.
    pub wrapped: bool,
}

/// Soft-wrapped layout of a document at a fixed width.
///
/// Positions are in cells relative to the top-left of the text (rows are not
/// scrolled).
#[derive(Debug, Clone)]
pub struct Layout {
    rows: Vec<Row>,

    /// `(column, width)` of each character.
    cells: Vec<(usize, usize)>,
}

pub fn char_width(ch: char, tab_width: usize) -> usize {
    match ch {
        '\t' => tab_width,
        '\n' => 0,
        ch => ch.width().unwrap_or(0),
    }
}

impl Layout {
    pub fn new(chars: impl IntoIterator<Item = char>, width: usize, tab_width: usize) -> Self {
        let width = width.max(1);

        let mut rows = vec![];
        let mut cells = vec![];

        let mut start = 0;
        let mut col = 0;
        let mut line = 0;
        let mut starts_line = true;

        for (i, ch) in chars.into_iter().enumerate() {
            if ch == '\n' {
                rows.push(Row {
                    start,
                    end: i,
                    width: col,
                    line: starts_line.then_some(line),
                    wrapped: false,
                });
                cells.push((col, 0));

                start = i + 1;
                col = 0;
                line += 1;
                starts_line = true;
                continue;
            }

            let w = char_width(ch, tab_width);

            if col > 0 && col + w > width {
                rows.push(Row {
                    start,
                    end: i,
                    width: col,
                    line: starts_line.then_some(line),
                    wrapped: true,
                });

                start = i;
                col = 0;
                starts_line = false;
            }

            cells.push((col, w));
            col += w;
        }

        rows.push(Row {
            start,
            end: cells.len(),
            width: col,
            line: starts_line.then_some(line),
            wrapped: false,
        });

        Self { rows, cells }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_of(&self, index: usize) -> usize {
        self.rows
            .partition_point(|row| row.start <= index)
            .saturating_sub(1)
    }

    /// The cell position of the caret before `index`.
    pub fn position_of(&self, index: usize) -> OffsetUsize {
        let y = self.row_of(index);
        let row = &self.rows[y];

        let x = if index < row.end {
            self.cells[index].0
        } else {
            row.width
        };

        OffsetUsize::new(x, y)
    }

    /// The character index closest to a cell position.
    ///
    /// Clicking on the right half of a character still puts the caret before
    /// it; positions past the end of a row map to the end of the row.
    pub fn index_at(&self, pos: OffsetUsize) -> usize {
        let Some(row) = self.rows.get(pos.y).or(self.rows.last()) else {
            return 0;
        };

        if pos.y >= self.rows.len() {
            return row.end;
        }

        for i in row.start..row.end {
            let (col, width) = self.cells[i];
            if pos.x < col + width.max(1) {
                return i;
            }
        }

        // The end of a wrapped row is the start of the next one.
        if row.wrapped {
            row.end - 1
        } else {
            row.end
        }
    }

    /// The line number containing row `y`, and the index that line starts at.
    pub fn line_of_row(&self, y: usize) -> (usize, usize) {
        self.rows[..=y.min(self.rows.len() - 1)]
            .iter()
            .rev()
            .find_map(|row| row.line.map(|line| (line, row.start)))
            .unwrap_or((0, 0))
    }
}
