use crate::buffer::{Buffer, Cell};
use crate::platform::Writer;
use crate::style::{CursorStyle, Style};
use crate::units::OffsetU16;

/// Draw only the cells of `new` that differ from `old`.
///
/// Falls back to a full redraw if the sizes differ.
pub fn draw_diff(old: &Buffer, new: &Buffer, w: &mut impl Writer) {
    if old.size() != new.size() {
        draw_no_diff(new, w);
        return;
    }

    w.set_cursor_vis(false);

    let mut cursor_pos: Option<OffsetU16> = None;
    let mut style = Style::default();

    w.write_style(style);

    let blank = Cell::empty();

    for y in 0..new.size().y {
        for x in 0..new.size().x {
            let old_cell = &old[[x, y]];
            let new_cell = &new[[x, y]];

            if old_cell == new_cell {
                continue;
            }

            let cell = new_cell.as_ref().unwrap_or(&blank);

            draw_style_diff(style, cell.style(), w);
            style = cell.style();

            let cell_pos = OffsetU16::new(x, y);
            if cursor_pos != Some(cell_pos) {
                w.set_cursor_pos(cell_pos);
            }

            w.write_str_raw(cell.grapheme());
            cursor_pos = Some(OffsetU16::new(x.saturating_add(1), y));
        }
    }

    draw_cursor(new, old.cursor_style(), w);
}

fn draw_no_diff(buf: &Buffer, w: &mut impl Writer) {
    log::debug!("redrawing");

    w.clear_all();

    w.set_cursor_home();
    w.set_cursor_vis(false);

    let mut style = Style::default();
    w.write_style(style);

    for y in 0..buf.size().y {
        let mut pos_dirty = true;

        for x in 0..buf.size().x {
            let Some(cell) = &buf[[x, y]] else {
                pos_dirty = true;
                continue;
            };

            if pos_dirty {
                w.set_cursor_pos([x, y]);
                pos_dirty = false;
            }

            draw_style_diff(style, cell.style(), w);
            style = cell.style();

            w.write_str_raw(cell.grapheme());
        }
    }

    w.write_cursor_style(buf.cursor_style());
    draw_cursor(buf, buf.cursor_style(), w);
}

fn draw_cursor(buf: &Buffer, prev_style: CursorStyle, w: &mut impl Writer) {
    if let Some(pos) = buf.cursor() {
        w.set_cursor_pos(pos);
        w.set_cursor_vis(true);
        draw_cursor_style_diff(prev_style, buf.cursor_style(), w);
    }
}

fn draw_style_diff(old: Style, new: Style, w: &mut impl Writer) {
    if new.fg != old.fg {
        w.set_fg_color(new.fg);
    }

    if new.bg != old.bg {
        w.set_bg_color(new.bg);
    }

    if new.weight != old.weight {
        w.set_weight(new.weight);
    }

    if new.underline != old.underline {
        w.set_underline(new.underline);
    }

    if new.reverse != old.reverse {
        w.set_reverse(new.reverse);
    }
}

fn draw_cursor_style_diff(old: CursorStyle, new: CursorStyle, w: &mut impl Writer) {
    if old.shape != new.shape {
        w.set_cursor_shape(new.shape);
    }

    if old.blinking != new.blinking {
        w.set_cursor_blinking(new.blinking);
    }
}

#[cfg(test)]
mod tests {
    use super::draw_diff;
    use crate::buffer::{Buffer, Cell};
    use crate::platform::AnsiWriter;
    use crate::style::{Color, Style};

    fn rendered(old: &Buffer, new: &Buffer) -> String {
        let mut w = AnsiWriter::new(Vec::new());
        draw_diff(old, new, &mut w);
        w.pending().to_owned()
    }

    #[test]
    fn unchanged_cells_are_skipped() {
        let mut old = Buffer::new([4, 1]);
        old.write_str([0, 0], "abcd", Style::default());

        let mut new = old.clone();
        new[[2, 0]] = Some(Cell::empty().with_symbol("X"));

        let out = rendered(&old, &new);
        assert!(out.contains("\x1b[1;3HX"));
        assert!(!out.contains('a'));
        assert!(!out.contains('d'));
    }

    #[test]
    fn style_changes_are_written() {
        let old = Buffer::new([2, 1]);
        let mut new = Buffer::new([2, 1]);
        new.write_str([0, 0], "r", Style::default().with_fg(Color::Red));

        let out = rendered(&old, &new);
        assert!(out.contains("\x1b[31m\x1b[1;1Hr"));
    }

    #[test]
    fn resize_redraws_everything() {
        let old = Buffer::new([2, 1]);
        let mut new = Buffer::new([3, 1]);
        new.write_str([0, 0], "abc", Style::default());
        new.set_cursor(Some([1, 0].into()));

        let out = rendered(&old, &new);
        assert!(out.starts_with("\x1b[2J"));
        assert!(out.contains("abc"));
        assert!(out.ends_with("\x1b[1;2H\x1b[?25h"));
    }
}
