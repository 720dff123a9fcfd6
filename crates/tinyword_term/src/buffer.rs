use std::ops::{Index, IndexMut};

use compact_str::CompactString;
use unicode_width::UnicodeWidthChar;

use crate::style::{CursorStyle, Style};
use crate::units::OffsetU16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    symbol: CompactString,
    style: Style,
}

impl Cell {
    pub fn empty() -> Self {
        Self {
            symbol: CompactString::new(" "),
            style: Style::default(),
        }
    }

    #[must_use]
    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.symbol = CompactString::new(symbol);
        self
    }

    #[must_use]
    pub fn with_char(mut self, ch: char) -> Self {
        self.symbol = CompactString::new(ch.encode_utf8(&mut [0; 4]));
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn grapheme(&self) -> &str {
        &self.symbol
    }

    pub fn style(&self) -> Style {
        self.style
    }
}

/// A grid of cells, plus where the cursor should go.
///
/// `None` cells are left for the terminal to clear.
#[derive(Debug)]
pub struct Buffer {
    buf: Vec<Option<Cell>>,
    size: OffsetU16,

    cursor: Option<OffsetU16>,
    cursor_style: CursorStyle,
}

impl Clone for Buffer {
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            size: self.size,
            cursor: self.cursor,
            cursor_style: self.cursor_style,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.buf.clone_from(&source.buf);
        self.size = source.size;
        self.cursor = source.cursor;
        self.cursor_style = source.cursor_style;
    }
}

impl Buffer {
    pub fn new(size: impl Into<OffsetU16>) -> Self {
        let size: OffsetU16 = size.into();
        let buf = vec![None; size.area()];

        Self {
            buf,
            size,
            cursor: None,
            cursor_style: CursorStyle::EMPTY,
        }
    }

    pub fn resize_and_clear(&mut self, size: impl Into<OffsetU16>) {
        let size: OffsetU16 = size.into();

        if size != self.size {
            self.buf.clear();
            self.buf.resize(size.area(), None);
            self.size = size;
        } else {
            self.buf.fill(None);
        }

        self.cursor = None;
    }

    pub fn size(&self) -> OffsetU16 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> Option<OffsetU16> {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Option<OffsetU16>) {
        self.cursor = cursor;
    }

    pub fn cursor_style(&self) -> CursorStyle {
        self.cursor_style
    }

    pub fn set_cursor_style(&mut self, style: CursorStyle) {
        self.cursor_style = style;
    }

    pub fn get(&self, index: impl Into<OffsetU16>) -> Option<&Option<Cell>> {
        let index = self.index(index)?;
        self.buf.get(index)
    }

    pub fn get_mut(&mut self, index: impl Into<OffsetU16>) -> Option<&mut Option<Cell>> {
        let index = self.index(index)?;
        self.buf.get_mut(index)
    }

    /// Write `s` starting at `pos`, one cell per character, clipping at the
    /// right edge. Returns the column after the last cell written.
    pub fn write_str(&mut self, pos: impl Into<OffsetU16>, s: &str, style: Style) -> u16 {
        let pos: OffsetU16 = pos.into();
        let mut x = pos.x;

        for ch in s.chars().filter(|ch| !ch.is_control()) {
            let width = ch.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }

            if x.saturating_add(width) > self.size.x {
                break;
            }

            let Some(cell) = self.get_mut([x, pos.y]) else {
                break;
            };
            *cell = Some(Cell::empty().with_char(ch).with_style(style));

            x += width;
        }

        x
    }

    /// Fill a whole row with blank cells of the given style.
    pub fn fill_row(&mut self, y: u16, style: Style) {
        for x in 0..self.size.x {
            if let Some(cell) = self.get_mut([x, y]) {
                *cell = Some(Cell::empty().with_style(style));
            }
        }
    }

    fn index(&self, pos: impl Into<OffsetU16>) -> Option<usize> {
        let pos = pos.into();

        if pos.cmp_ge(self.size).either() {
            return None;
        }

        let index = pos.y as usize * self.size.x as usize + pos.x as usize;

        Some(index)
    }
}

impl<Idx: Into<OffsetU16>> Index<Idx> for Buffer {
    type Output = Option<Cell>;

    fn index(&self, index: Idx) -> &Self::Output {
        self.get(index).expect("indices out of bounds")
    }
}

impl<Idx: Into<OffsetU16>> IndexMut<Idx> for Buffer {
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        self.get_mut(index).expect("indices out of bounds")
    }
}

#[cfg(test)]
mod tests {
    use super::{Buffer, Cell};
    use crate::style::{Color, Style};

    #[test]
    fn index_cells() {
        let mut buf = Buffer::new([10, 10]);
        assert_eq!(buf.len(), 10 * 10);

        buf[[0, 0]] = Some(Cell::empty().with_symbol("b"));
        buf[[9, 9]] = Some(Cell::empty().with_symbol("c"));

        assert_eq!(buf[[0, 0]].as_ref().map(Cell::grapheme), Some("b"));
        assert_eq!(buf[[9, 9]].as_ref().map(Cell::grapheme), Some("c"));
        assert!(buf.get([10, 10]).is_none());
        assert!(buf.get([10, 0]).is_none());
    }

    #[test]
    fn write_str_clips() {
        let mut buf = Buffer::new([5, 1]);
        let red = Style::default().with_fg(Color::Red);

        let end = buf.write_str([2, 0], "hello", red);
        assert_eq!(end, 5);

        assert_eq!(buf[[1, 0]], None);
        assert_eq!(buf[[2, 0]].as_ref().map(Cell::grapheme), Some("h"));
        assert_eq!(buf[[4, 0]].as_ref().map(Cell::grapheme), Some("l"));
        assert_eq!(buf[[4, 0]].as_ref().map(Cell::style), Some(red));
    }

    #[test]
    fn resize_clears() {
        let mut buf = Buffer::new([3, 3]);
        buf[[1, 1]] = Some(Cell::empty());
        buf.set_cursor(Some([1, 1].into()));

        buf.resize_and_clear([3, 3]);
        assert_eq!(buf[[1, 1]], None);
        assert_eq!(buf.cursor(), None);

        buf.resize_and_clear([4, 2]);
        assert_eq!(buf.len(), 8);
    }
}
