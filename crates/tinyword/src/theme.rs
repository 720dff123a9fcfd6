use tinyword_core::{Color, Font, StyleEntry};
use tinyword_term::style::{Color as TermColor, Style, Weight};

/// How a style table entry looks in a terminal.
///
/// Terminals have a single font and size, so only the colour and the bold
/// weight carry over. Black maps to the terminal's default foreground so that
/// normal text stays readable on dark backgrounds.
pub fn term_style(entry: &StyleEntry) -> Style {
    let fg = match entry.color {
        Color::Black => TermColor::Default,
        Color::Red => TermColor::Red,
        Color::Green => TermColor::Green,
        Color::Yellow => TermColor::Yellow,
        Color::Blue => TermColor::Blue,
        Color::Magenta => TermColor::Magenta,
        Color::Cyan => TermColor::Cyan,
        Color::White => TermColor::White,
    };

    let weight = match entry.font {
        Font::Bold => Weight::Bold,
        Font::Regular | Font::Monospace => Weight::Normal,
    };

    Style::default().with_fg(fg).with_weight(weight)
}

pub fn selection(style: Style) -> Style {
    style.with_reverse(true)
}

pub fn gutter() -> Style {
    Style::default().with_weight(Weight::Dim)
}

pub fn toolbar() -> Style {
    Style::default().with_bg(TermColor::White).with_fg(TermColor::Black)
}

pub fn status_bar() -> Style {
    Style::default().with_reverse(true)
}
