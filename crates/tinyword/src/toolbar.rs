use std::ops::Range;

use tinyword_core::{StyleTable, StyleTag};
use tinyword_term::buffer::Buffer;

use crate::theme;

const BUTTON_GAP: u16 = 1;
const FIRST_BUTTON_X: u16 = 1;

/// A toolbar button. Pressing it applies `tag` to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub tag: StyleTag,
    pub shortcut: &'static str,
}

impl Button {
    fn width(&self) -> u16 {
        // "[ label ]"
        self.label.chars().count() as u16 + 4
    }
}

#[derive(Debug, Clone)]
pub struct Toolbar {
    buttons: Vec<Button>,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::standard()
    }
}

impl Toolbar {
    pub fn standard() -> Self {
        Self {
            buttons: vec![
                Button {
                    label: "Bold",
                    tag: StyleTag::Bold,
                    shortcut: "^B",
                },
                Button {
                    label: "Red",
                    tag: StyleTag::Red,
                    shortcut: "^R",
                },
                Button {
                    label: "Normal",
                    tag: StyleTag::Normal,
                    shortcut: "^N",
                },
            ],
        }
    }

    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// The tag of the button covering column `x` of the toolbar row.
    pub fn hit(&self, x: u16) -> Option<StyleTag> {
        self.spans()
            .find(|(span, _)| span.contains(&x))
            .map(|(_, button)| button.tag)
    }

    pub fn draw(&self, buf: &mut Buffer, styles: &StyleTable) {
        let bar = theme::toolbar();
        buf.fill_row(0, bar);

        let mut end = FIRST_BUTTON_X;

        for (span, button) in self.spans() {
            // Each label previews the style it applies.
            let label_style = theme::term_style(styles.get(button.tag)).with_bg(bar.bg);

            buf.write_str([span.start, 0], "[ ", bar);
            let x = buf.write_str([span.start + 2, 0], button.label, label_style);
            end = buf.write_str([x, 0], " ]", bar);
        }

        let hints: Vec<String> = self
            .buttons()
            .iter()
            .map(|button| format!("{} {}", button.shortcut, button.label))
            .collect();
        let hints = format!("  {}  ^K Code  ^Q Quit", hints.join("  "));

        buf.write_str([end, 0], &hints, bar);
    }

    fn spans(&self) -> impl Iterator<Item = (Range<u16>, &Button)> + '_ {
        let mut x = FIRST_BUTTON_X;

        self.buttons.iter().map(move |button| {
            let span = x..x + button.width();
            x = span.end + BUTTON_GAP;
            (span, button)
        })
    }
}

#[cfg(test)]
mod tests {
    use tinyword_core::{StyleTable, StyleTag};
    use tinyword_term::buffer::{Buffer, Cell};
    use tinyword_term::style::Weight;

    use super::Toolbar;

    #[test]
    fn three_buttons_in_order() {
        let labels: Vec<_> = Toolbar::standard()
            .buttons()
            .iter()
            .map(|button| button.label)
            .collect();

        assert_eq!(labels, ["Bold", "Red", "Normal"]);
    }

    #[test]
    fn hit_testing() {
        let toolbar = Toolbar::standard();

        // "[ Bold ]" covers 1..9, "[ Red ]" 10..17, "[ Normal ]" 18..28.
        assert_eq!(toolbar.hit(0), None);
        assert_eq!(toolbar.hit(1), Some(StyleTag::Bold));
        assert_eq!(toolbar.hit(8), Some(StyleTag::Bold));
        assert_eq!(toolbar.hit(9), None);
        assert_eq!(toolbar.hit(10), Some(StyleTag::Red));
        assert_eq!(toolbar.hit(18), Some(StyleTag::Normal));
        assert_eq!(toolbar.hit(27), Some(StyleTag::Normal));
        assert_eq!(toolbar.hit(28), None);
    }

    #[test]
    fn labels_preview_their_style() {
        let mut buf = Buffer::new([80, 1]);
        Toolbar::standard().draw(&mut buf, &StyleTable::default());

        let symbol = |x: u16| buf[[x, 0]].as_ref().map(Cell::grapheme).map(str::to_owned);
        assert_eq!(symbol(1).as_deref(), Some("["));
        assert_eq!(symbol(3).as_deref(), Some("B"));

        let bold_b = buf[[3, 0]].as_ref().map(Cell::style);
        assert_eq!(bold_b.map(|style| style.weight), Some(Weight::Bold));
    }
}
