use std::fmt;
use std::ops::Range;

use crate::gap_buffer::GapBuffer;
use crate::style::StyleTag;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("range {start}..{end} out of bounds for length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("range start {start} is after its end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("no selection: nothing to style")]
    NoSelection,

    #[error("text has {text} characters but {tags} style tags were given")]
    LengthMismatch { text: usize, tags: usize },

    #[error("unknown style tag {0:?}")]
    UnknownTag(char),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// A mutation that happened to a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Restyled { range: Range<usize>, tag: StyleTag },
    Inserted { at: usize, len: usize },
    Removed(Range<usize>),
}

impl Change {
    /// The span that has to be redisplayed, in post-change indices.
    pub fn affected(&self) -> Range<usize> {
        match self {
            Self::Restyled { range, .. } => range.clone(),
            Self::Inserted { at, len } => *at..at + len,
            Self::Removed(range) => range.start..range.start,
        }
    }
}

pub trait ChangeListener {
    fn on_change(&mut self, change: &Change);
}

impl<F: FnMut(&Change)> ChangeListener for F {
    #[inline]
    fn on_change(&mut self, change: &Change) {
        self(change)
    }
}

/// Text with a parallel buffer of style tags.
///
/// `tags[i]` is the style of `text[i]`. Both buffers are edited together, so
/// they always have the same length.
#[derive(Default)]
pub struct Document {
    text: GapBuffer<char>,
    tags: GapBuffer<StyleTag>,

    listeners: Vec<Box<dyn ChangeListener>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.text())
            .field("tags", &self.tag_string())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document out of consecutive styled runs.
    pub fn from_runs<'a>(runs: impl IntoIterator<Item = (&'a str, StyleTag)>) -> Self {
        let mut text = GapBuffer::new();
        let mut tags = GapBuffer::new();

        for (run, tag) in runs {
            for ch in run.chars() {
                text.push(ch);
                tags.push(tag);
            }
        }

        Self {
            text,
            tags,
            listeners: Vec::new(),
        }
    }

    /// Build a document from text and a string of tag characters (`'A'` to
    /// `'D'`), one per character of text.
    pub fn from_tagged(text: &str, tags: &str) -> DocumentResult<Self> {
        let text: GapBuffer<char> = text.chars().collect();
        let tags = tags
            .chars()
            .map(|ch| StyleTag::from_char(ch).ok_or(DocumentError::UnknownTag(ch)))
            .collect::<DocumentResult<GapBuffer<StyleTag>>>()?;

        if text.len() != tags.len() {
            return Err(DocumentError::LengthMismatch {
                text: text.len(),
                tags: tags.len(),
            });
        }

        Ok(Self {
            text,
            tags,
            listeners: Vec::new(),
        })
    }

    /// The document shown on startup: one line in each of the normal, bold
    /// and red styles.
    pub fn demo() -> Self {
        Self::from_runs([
            ("This is normal text.\n", StyleTag::Normal),
            ("This will be bold.\n", StyleTag::Bold),
            ("And this red.", StyleTag::Red),
        ])
    }

    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[inline]
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.text.get(index).copied()
    }

    #[inline]
    pub fn tag_at(&self, index: usize) -> Option<StyleTag> {
        self.tags.get(index).copied()
    }

    pub fn chars(&self) -> impl DoubleEndedIterator<Item = char> + '_ {
        self.text.iter().copied()
    }

    pub fn tags(&self) -> impl DoubleEndedIterator<Item = StyleTag> + '_ {
        self.tags.iter().copied()
    }

    pub fn styled_chars(&self) -> impl Iterator<Item = (char, StyleTag)> + '_ {
        self.chars().zip(self.tags())
    }

    pub fn text(&self) -> String {
        self.chars().collect()
    }

    pub fn tag_string(&self) -> String {
        self.tags().map(StyleTag::as_char).collect()
    }

    pub fn slice_text(&self, range: Range<usize>) -> DocumentResult<String> {
        self.check_range(&range)?;
        Ok(self.chars().skip(range.start).take(range.len()).collect())
    }

    /// Maximal runs of characters sharing a tag.
    pub fn runs(&self) -> Vec<(Range<usize>, StyleTag)> {
        let mut runs: Vec<(Range<usize>, StyleTag)> = vec![];

        for (i, tag) in self.tags().enumerate() {
            match runs.last_mut() {
                Some((range, last)) if *last == tag => range.end = i + 1,
                _ => runs.push((i..i + 1, tag)),
            }
        }

        runs
    }

    /// Set the style of every character in `range` to `tag`.
    ///
    /// The text itself is not touched. An empty range is refused with
    /// [`DocumentError::NoSelection`] and leaves the document as it was.
    pub fn apply_style(&mut self, range: Range<usize>, tag: StyleTag) -> DocumentResult<()> {
        self.check_range(&range)?;

        if range.is_empty() {
            log::debug!("refusing to style empty range at {}", range.start);
            return Err(DocumentError::NoSelection);
        }

        self.tags.fill_range(range.clone(), tag);

        log::trace!("styled {range:?} as {tag:?}");
        self.notify(Change::Restyled { range, tag });

        Ok(())
    }

    /// Insert `s` at `at`, giving every inserted character the tag `tag`.
    ///
    /// Returns the number of characters inserted.
    pub fn insert(&mut self, at: usize, s: &str, tag: StyleTag) -> DocumentResult<usize> {
        self.check_range(&(at..at))?;

        let chars: Vec<char> = s.chars().collect();
        if chars.is_empty() {
            return Ok(0);
        }

        self.text.insert_slice(at, &chars);
        self.tags.insert_slice(at, &vec![tag; chars.len()]);
        self.debug_check_lengths();

        self.notify(Change::Inserted {
            at,
            len: chars.len(),
        });

        Ok(chars.len())
    }

    pub fn remove(&mut self, range: Range<usize>) -> DocumentResult<()> {
        self.check_range(&range)?;

        if range.is_empty() {
            return Ok(());
        }

        self.text.remove_range(range.clone());
        self.tags.remove_range(range.clone());
        self.debug_check_lengths();

        self.notify(Change::Removed(range));

        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> DocumentResult<()> {
        if range.end > self.len() || range.start > self.len() {
            return Err(DocumentError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: self.len(),
            });
        }

        if range.start > range.end {
            return Err(DocumentError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }

        Ok(())
    }

    fn notify(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener.on_change(&change);
        }
    }

    #[inline]
    fn debug_check_lengths(&self) {
        debug_assert_eq!(
            self.text.len(),
            self.tags.len(),
            "text and style buffers out of sync"
        );
    }
}
