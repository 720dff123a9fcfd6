use std::cmp::Ordering;
use std::fmt;
use std::iter::Chain;
use std::ops::Range;
use std::slice;

/// A gap buffer over `Copy` values.
///
/// The backing vec is always fully initialised (unused slots hold
/// `T::default()`), so the whole thing is safe code; moving the gap is a
/// `copy_within`.
#[derive(Clone)]
pub struct GapBuffer<T> {
    buf: Vec<T>,

    front_len: usize,
    back_len: usize,
}

impl<T: Copy + Default> Default for GapBuffer<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> GapBuffer<T> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            front_len: 0,
            back_len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.front_len + self.back_len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn push(&mut self, value: T) {
        self.reserve(1);
        self.buf[self.front_len] = value;
        self.front_len += 1;
    }

    #[inline]
    pub fn push_slice(&mut self, slice: &[T]) {
        self.reserve(slice.len());

        let start = self.front_len;
        self.buf[start..start + slice.len()].copy_from_slice(slice);

        self.front_len += slice.len();
    }

    /// Move the gap so that it starts at `index`.
    ///
    /// # Panics
    /// Panics if `index > self.len()`.
    pub fn set_gap(&mut self, index: usize) {
        assert!(index <= self.len(), "index out of bounds");

        match index.cmp(&self.front_len) {
            Ordering::Less => {
                let len = self.front_len - index;
                let dest = self.back_start() - len;

                self.buf.copy_within(index..self.front_len, dest);

                self.front_len = index;
                self.back_len += len;
            }

            Ordering::Equal => {}

            Ordering::Greater => {
                let len = index - self.front_len;
                let src = self.back_start();

                self.buf.copy_within(src..src + len, self.front_len);

                self.front_len = index;
                self.back_len -= len;
            }
        }
    }

    /// # Panics
    /// Panics if `index > self.len()`.
    pub fn insert_slice(&mut self, index: usize, slice: &[T]) {
        self.set_gap(index);
        self.push_slice(slice);
    }

    /// # Panics
    /// Panics if the range is reversed or extends past the end.
    pub fn remove_range(&mut self, range: Range<usize>) {
        self.check_range(&range);

        self.set_gap(range.start);
        self.back_len -= range.len();
    }

    /// Overwrite every element in `range` with `value`, without moving the gap.
    ///
    /// # Panics
    /// Panics if the range is reversed or extends past the end.
    pub fn fill_range(&mut self, range: Range<usize>, value: T) {
        self.check_range(&range);

        let front_end = range.end.min(self.front_len);
        if range.start < front_end {
            self.buf[range.start..front_end].fill(value);
        }

        let back_from = range.start.max(self.front_len);
        if back_from < range.end {
            let gap_len = self.gap_len();
            self.buf[back_from + gap_len..range.end + gap_len].fill(value);
        }
    }

    #[inline]
    pub fn front(&self) -> &[T] {
        &self.buf[..self.front_len]
    }

    #[inline]
    pub fn back(&self) -> &[T] {
        &self.buf[self.back_start()..]
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.physical_index(index).map(|i| &self.buf[i])
    }

    pub fn reserve(&mut self, additional: usize) {
        let required = self
            .len()
            .checked_add(additional)
            .expect("capacity overflow");

        if let Some(new_cap) = calc_new_capacity(self.capacity(), required) {
            let prev_back_start = self.back_start();
            let prev_cap = self.capacity();

            self.buf.resize(new_cap, T::default());

            let back_start = new_cap - self.back_len;
            self.buf.copy_within(prev_back_start..prev_cap, back_start);
        }
    }

    #[inline]
    pub fn iter(&self) -> Chain<slice::Iter<'_, T>, slice::Iter<'_, T>> {
        self.front().iter().chain(self.back().iter())
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn back_start(&self) -> usize {
        self.buf.len() - self.back_len
    }

    #[inline]
    fn gap_len(&self) -> usize {
        self.buf.len() - self.len()
    }

    #[inline]
    fn physical_index(&self, index: usize) -> Option<usize> {
        if index < self.front_len {
            Some(index)
        } else if index < self.len() {
            Some(index + self.gap_len())
        } else {
            None
        }
    }

    fn check_range(&self, range: &Range<usize>) {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "range out of bounds"
        );
    }
}

impl<T: Copy + Default> From<Vec<T>> for GapBuffer<T> {
    #[inline]
    fn from(v: Vec<T>) -> Self {
        let len = v.len();
        Self {
            buf: v,
            front_len: len,
            back_len: 0,
        }
    }
}

impl<T: Copy + Default> FromIterator<T> for GapBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Copy + Default + fmt::Debug> fmt::Debug for GapBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[inline]
fn calc_new_capacity(cap: usize, required: usize) -> Option<usize> {
    if required <= cap {
        None
    } else {
        let min_cap = cap + (cap / 16).max(64);
        Some(required.max(min_cap))
    }
}
