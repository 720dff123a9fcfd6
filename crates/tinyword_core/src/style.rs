use serde::{Deserialize, Serialize};

/// Identifies one entry of the [`StyleTable`].
///
/// Each variant also has a single-character form (`'A'` to `'D'`), which is
/// what [`Document::tag_string`](crate::document::Document::tag_string) and
/// [`Document::from_tagged`](crate::document::Document::from_tagged) use.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    #[default]
    Normal,
    Bold,
    Red,
    Code,
}

impl StyleTag {
    pub const ALL: [StyleTag; 4] = [Self::Normal, Self::Bold, Self::Red, Self::Code];

    pub const fn as_char(self) -> char {
        match self {
            Self::Normal => 'A',
            Self::Bold => 'B',
            Self::Red => 'C',
            Self::Code => 'D',
        }
    }

    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'A' => Some(Self::Normal),
            'B' => Some(Self::Bold),
            'C' => Some(Self::Red),
            'D' => Some(Self::Code),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Bold => "Bold",
            Self::Red => "Red",
            Self::Code => "Code",
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    #[default]
    Regular,
    Bold,
    Monospace,
}

/// How text carrying a given tag is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleEntry {
    pub color: Color,
    pub font: Font,
    pub size: u16,
}

impl StyleEntry {
    pub const fn new(color: Color, font: Font, size: u16) -> Self {
        Self { color, font, size }
    }
}

/// The fixed tag to display-style mapping.
///
/// Built once at startup and only read afterwards, so there are no setters.
/// Every field is optional when deserialising; missing entries keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleTable {
    normal: StyleEntry,
    bold: StyleEntry,
    red: StyleEntry,
    code: StyleEntry,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            normal: StyleEntry::new(Color::Black, Font::Regular, 16),
            bold: StyleEntry::new(Color::Black, Font::Bold, 16),
            red: StyleEntry::new(Color::Red, Font::Regular, 16),
            code: StyleEntry::new(Color::Blue, Font::Monospace, 16),
        }
    }
}

impl StyleTable {
    pub fn get(&self, tag: StyleTag) -> &StyleEntry {
        match tag {
            StyleTag::Normal => &self.normal,
            StyleTag::Bold => &self.bold,
            StyleTag::Red => &self.red,
            StyleTag::Code => &self.code,
        }
    }

    pub fn len(&self) -> usize {
        StyleTag::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleTag, &StyleEntry)> + '_ {
        StyleTag::ALL.into_iter().map(|tag| (tag, self.get(tag)))
    }
}
