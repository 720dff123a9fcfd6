use std::ops::Range;

/// A selection over character indices.
///
/// `anchor` is where the selection was started and `head` is where the caret
/// is; either may be the larger one.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    #[inline]
    pub const fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    #[inline]
    pub const fn caret(index: usize) -> Self {
        Self::new(index, index)
    }

    /// The selected half-open range, with `start <= end`.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.anchor.min(self.head)..self.anchor.max(self.head)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.range().len()
    }

    #[inline]
    pub fn extend_to(&mut self, index: usize) {
        self.head = index;
    }

    #[inline]
    pub fn collapse_to(&mut self, index: usize) {
        *self = Self::caret(index);
    }

    /// Move the selection to `index` and either keep the anchor (extending)
    /// or drop it.
    #[inline]
    pub fn move_to(&mut self, index: usize, extend: bool) {
        if extend {
            self.extend_to(index);
        } else {
            self.collapse_to(index);
        }
    }

    pub fn clamp(&mut self, len: usize) {
        self.anchor = self.anchor.min(len);
        self.head = self.head.min(len);
    }
}

#[cfg(test)]
mod tests {
    use super::Selection;

    #[test]
    fn range_is_normalised() {
        assert_eq!(Selection::new(2, 5).range(), 2..5);
        assert_eq!(Selection::new(5, 2).range(), 2..5);
        assert_eq!(Selection::new(5, 2).len(), 3);
    }

    #[test]
    fn caret_is_empty() {
        let sel = Selection::caret(4);
        assert!(sel.is_empty());
        assert_eq!(sel.range(), 4..4);
    }

    #[test]
    fn extend_and_collapse() {
        let mut sel = Selection::caret(3);

        sel.move_to(7, true);
        assert_eq!(sel, Selection::new(3, 7));

        sel.move_to(1, true);
        assert_eq!(sel.range(), 1..3);

        sel.move_to(6, false);
        assert_eq!(sel, Selection::caret(6));
    }

    #[test]
    fn clamp_to_shorter_document() {
        let mut sel = Selection::new(2, 10);
        sel.clamp(4);
        assert_eq!(sel, Selection::new(2, 4));
    }
}
