use std::ops::{ControlFlow, Range};

use crossbeam_channel::Receiver;
use tinyword_core::{Change, Document, DocumentResult, Selection, StyleTable, StyleTag};
use tinyword_term::buffer::{Buffer, Cell};
use tinyword_term::event::{Event, Modifiers, MouseButton, MouseEvent, MouseEventKind};
use tinyword_term::style::Style;
use tinyword_term::units::{OffsetU16, OffsetUsize};

use crate::action::{Action, KeyMap, Motion};
use crate::config::Config;
use crate::layout::{char_width, Layout};
use crate::theme;
use crate::toolbar::Toolbar;
use crate::utils::clean_text;

const SCROLL_ROWS: usize = 3;

pub struct Editor {
    document: Document,
    styles: StyleTable,

    selection: Selection,

    /// Column to try to move to when moving up and down (in cells).
    target_column: Option<usize>,

    /// First layout row on screen.
    scroll_row: usize,
    follow_cursor: bool,

    toolbar: Toolbar,
    keymap: KeyMap,

    /// Message shown in the status line until the next action.
    status: Option<String>,

    changes: Receiver<Change>,

    line_numbers: bool,
    tab_width: usize,

    /// Screen size as of the last draw.
    screen_size: OffsetU16,

    /// A left-button drag is selecting text.
    dragging: bool,
}

impl Editor {
    pub fn new(mut document: Document, config: &Config) -> Self {
        let (tx, changes) = crossbeam_channel::unbounded();
        document.subscribe(move |change: &Change| {
            // The receiver lives as long as the editor, which owns the document.
            let _ = tx.send(change.clone());
        });

        Self {
            document,
            styles: config.styles.clone(),

            selection: Selection::default(),
            target_column: None,

            scroll_row: 0,
            follow_cursor: true,

            toolbar: Toolbar::standard(),
            keymap: KeyMap::basic(),

            status: None,

            changes,

            line_numbers: config.line_numbers,
            tab_width: config.tab_width,

            screen_size: OffsetU16::ZERO,
            dragging: false,
        }
    }

    pub fn handle_event(&mut self, event: Event) -> ControlFlow<()> {
        match event {
            Event::Mouse(mouse) => self.handle_mouse(mouse),

            event => match self.keymap.get_action(&event) {
                Some(action) => return self.perform(action),
                None => log::debug!("unbound event: {event:?}"),
            },
        }

        ControlFlow::Continue(())
    }

    /// Log and count the document changes since the last call. Returns how
    /// many there were, so the caller knows whether to redraw.
    pub fn drain_changes(&mut self) -> usize {
        let mut count = 0;

        for change in self.changes.try_iter() {
            log::debug!("{change:?}, redisplaying {:?}", change.affected());
            count += 1;
        }

        if count > 0 {
            self.selection.clamp(self.document.len());
        }

        count
    }

    fn perform(&mut self, action: Action) -> ControlFlow<()> {
        log::trace!("action: {action:?}");

        self.status = None;
        self.follow_cursor = true;

        let result = match action {
            Action::InsertChar(ch) => self.insert_str(ch.encode_utf8(&mut [0; 4])),
            Action::InsertString(s) => self.insert_str(&s),

            Action::Backspace => self.backspace(),
            Action::Delete => self.delete(),

            Action::Move(motion) => {
                self.move_cursor(motion, false);
                Ok(())
            }
            Action::Select(motion) => {
                self.move_cursor(motion, true);
                Ok(())
            }
            Action::SelectAll => {
                self.selection = Selection::new(0, self.document.len());
                self.target_column = None;
                Ok(())
            }
            Action::ClearSelection => {
                self.selection.collapse_to(self.selection.head);
                Ok(())
            }

            Action::ApplyStyle(tag) => {
                self.apply_style(tag);
                Ok(())
            }

            Action::Quit => return ControlFlow::Break(()),
        };

        if let Err(err) = result {
            log::error!("edit failed: {err}");
            self.status = Some(err.to_string());
        }

        ControlFlow::Continue(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Press(MouseButton::Left) if mouse.pos.y == 0 => {
                if let Some(tag) = self.toolbar.hit(mouse.pos.x) {
                    self.status = None;
                    self.apply_style(tag);
                }
            }

            MouseEventKind::Press(MouseButton::Left) if self.on_text_row(mouse.pos.y) => {
                let index = self.index_at_screen(mouse.pos);
                let extend = mouse.modifiers.contains(Modifiers::SHIFT);

                self.selection.move_to(index, extend);
                self.target_column = None;
                self.follow_cursor = true;
                self.dragging = true;
            }

            MouseEventKind::Drag(MouseButton::Left) if self.dragging => {
                let index = self.index_at_screen(mouse.pos);
                self.selection.extend_to(index);
                self.follow_cursor = true;
            }

            MouseEventKind::Release => self.dragging = false,

            MouseEventKind::ScrollUp => {
                self.scroll_row = self.scroll_row.saturating_sub(SCROLL_ROWS);
                self.follow_cursor = false;
            }
            MouseEventKind::ScrollDown => {
                // Clamped when drawing.
                self.scroll_row += SCROLL_ROWS;
                self.follow_cursor = false;
            }

            _ => {}
        }
    }

    fn apply_style(&mut self, tag: StyleTag) {
        let range = self.selection.range();
        let len = range.len();

        match self.document.apply_style(range, tag) {
            Ok(()) => {
                log::info!("applied {tag:?} to {len} characters");
                self.status = Some(format!("{} applied to {len} characters", tag.name()));
            }
            Err(err) => {
                log::debug!("couldn't apply {tag:?}: {err}");
                self.status = Some(err.to_string());
            }
        }
    }

    /// Replace the selection with `s`. Inserted text is always normal.
    fn insert_str(&mut self, s: &str) -> DocumentResult<()> {
        let text = clean_text(s);
        if text.is_empty() {
            return Ok(());
        }

        let range = self.selection.range();
        self.document.remove(range.clone())?;
        let inserted = self.document.insert(range.start, &text, StyleTag::Normal)?;

        self.selection.collapse_to(range.start + inserted);
        self.target_column = None;

        Ok(())
    }

    fn backspace(&mut self) -> DocumentResult<()> {
        let head = self.selection.head;

        match self.selection_or(head.saturating_sub(1)..head) {
            Some(range) => self.remove(range),
            None => Ok(()),
        }
    }

    fn delete(&mut self) -> DocumentResult<()> {
        let head = self.selection.head;
        let end = (head + 1).min(self.document.len());

        match self.selection_or(head..end) {
            Some(range) => self.remove(range),
            None => Ok(()),
        }
    }

    /// The selected range, or `fallback` if nothing is selected. `None` if
    /// both are empty.
    fn selection_or(&self, fallback: Range<usize>) -> Option<Range<usize>> {
        let range = if self.selection.is_empty() {
            fallback
        } else {
            self.selection.range()
        };

        (!range.is_empty()).then_some(range)
    }

    fn remove(&mut self, range: Range<usize>) -> DocumentResult<()> {
        self.document.remove(range.clone())?;
        self.selection.collapse_to(range.start);
        self.target_column = None;
        Ok(())
    }

    fn move_cursor(&mut self, motion: Motion, extend: bool) {
        let head = self.selection.head;
        let len = self.document.len();

        let index = match motion {
            Motion::Up => return self.move_vertical(false, extend),
            Motion::Down => return self.move_vertical(true, extend),

            // Without shift, left and right first drop the selection.
            Motion::Left if !extend && !self.selection.is_empty() => self.selection.range().start,
            Motion::Right if !extend && !self.selection.is_empty() => self.selection.range().end,

            Motion::Left => head.saturating_sub(1),
            Motion::Right => (head + 1).min(len),

            Motion::Home => {
                let layout = self.layout();
                layout.index_at(OffsetUsize::new(0, layout.row_of(head)))
            }
            Motion::End => {
                let layout = self.layout();
                layout.index_at(OffsetUsize::new(usize::MAX, layout.row_of(head)))
            }

            Motion::DocumentStart => 0,
            Motion::DocumentEnd => len,
        };

        self.selection.move_to(index, extend);
        self.target_column = None;
    }

    fn move_vertical(&mut self, down: bool, extend: bool) {
        let layout = self.layout();
        let pos = layout.position_of(self.selection.head);
        let column = *self.target_column.get_or_insert(pos.x);

        let index = if down {
            if pos.y + 1 < layout.rows().len() {
                layout.index_at(OffsetUsize::new(column, pos.y + 1))
            } else {
                self.document.len()
            }
        } else {
            match pos.y.checked_sub(1) {
                Some(y) => layout.index_at(OffsetUsize::new(column, y)),
                None => 0,
            }
        };

        self.selection.move_to(index, extend);
    }

    fn on_text_row(&self, y: u16) -> bool {
        let (origin, size) = self.text_area();
        (origin.y..origin.y + size.y).contains(&y)
    }

    /// The character index under a screen position. Positions outside the
    /// text area are clamped to it.
    fn index_at_screen(&self, pos: OffsetU16) -> usize {
        let (origin, _) = self.text_area();
        let pos = OffsetUsize::from(pos.saturating_sub(origin));

        self.layout()
            .index_at(OffsetUsize::new(pos.x, pos.y + self.scroll_row))
    }

    fn layout(&self) -> Layout {
        let (_, size) = self.text_area();
        Layout::new(self.document.chars(), size.x as usize, self.tab_width)
    }

    /// Top-left corner and size of the text area on screen.
    fn text_area(&self) -> (OffsetU16, OffsetU16) {
        let gutter = self.gutter_width();

        let origin = OffsetU16::new(gutter, 1);
        let size = OffsetU16::new(
            self.screen_size.x.saturating_sub(gutter),
            self.screen_size.y.saturating_sub(2),
        );

        (origin, size)
    }

    fn gutter_width(&self) -> u16 {
        if !self.line_numbers {
            return 0;
        }

        let lines = self.document.chars().filter(|&ch| ch == '\n').count() + 1;
        let width = lines.to_string().len().max(2) as u16 + 1;

        // Leave at least half the screen for text.
        if width * 2 > self.screen_size.x {
            0
        } else {
            width
        }
    }
}

impl Editor {
    pub fn draw(&mut self, buf: &mut Buffer) {
        self.screen_size = buf.size();

        let layout = self.layout();
        let (origin, size) = self.text_area();

        self.scroll_to_show_cursor(&layout, size.y as usize);

        self.toolbar.draw(buf, &self.styles);
        self.draw_text(buf, &layout, origin, size);
        self.draw_status(buf, &layout);
        self.draw_cursor(buf, &layout, origin, size);
    }

    fn scroll_to_show_cursor(&mut self, layout: &Layout, height: usize) {
        if self.follow_cursor {
            let y = layout.position_of(self.selection.head).y;

            if y < self.scroll_row {
                self.scroll_row = y;
            } else if height > 0 && y >= self.scroll_row + height {
                self.scroll_row = y + 1 - height;
            }
        }

        self.scroll_row = self.scroll_row.min(layout.rows().len() - 1);
    }

    fn draw_text(&self, buf: &mut Buffer, layout: &Layout, origin: OffsetU16, size: OffsetU16) {
        let selected = self.selection.range();
        let chars: Vec<(char, StyleTag)> = self.document.styled_chars().collect();
        let width = size.x as usize;

        let rows = layout
            .rows()
            .iter()
            .skip(self.scroll_row)
            .take(size.y as usize);

        for (screen_y, row) in rows.enumerate() {
            let y = origin.y + screen_y as u16;

            if let (Some(line), Some(gutter)) = (row.line, origin.x.checked_sub(1)) {
                let label = format!("{:>gutter$} ", line + 1, gutter = gutter as usize);
                buf.write_str([0, y], &label, theme::gutter());
            }

            let mut x = 0;

            for (index, &(ch, tag)) in chars.iter().enumerate().take(row.end).skip(row.start) {
                let ch_width = char_width(ch, self.tab_width);
                if x + ch_width > width {
                    break;
                }

                let mut style = theme::term_style(self.styles.get(tag));
                if selected.contains(&index) {
                    style = theme::selection(style);
                }

                let cell_x = origin.x + x as u16;
                if ch == '\t' {
                    for dx in 0..ch_width as u16 {
                        if let Some(cell) = buf.get_mut([cell_x + dx, y]) {
                            *cell = Some(Cell::empty().with_style(style));
                        }
                    }
                } else {
                    buf.write_str([cell_x, y], ch.encode_utf8(&mut [0; 4]), style);
                }

                x += ch_width;
            }

            // A selected line break shows up as one selected cell.
            if !row.wrapped && row.end < chars.len() && selected.contains(&row.end) && x < width {
                if let Some(cell) = buf.get_mut([origin.x + x as u16, y]) {
                    *cell = Some(Cell::empty().with_style(theme::selection(Style::default())));
                }
            }
        }
    }

    fn draw_status(&self, buf: &mut Buffer, layout: &Layout) {
        let size = buf.size();
        if size.y < 2 {
            return;
        }

        let y = size.y - 1;
        let style = theme::status_bar();
        buf.fill_row(y, style);

        let head = self.selection.head;
        let (line, line_start) = layout.line_of_row(layout.row_of(head));

        let mut info = format!("Ln {}, Col {}", line + 1, head - line_start + 1);

        let tag = self
            .document
            .tag_at(head)
            .or_else(|| self.document.tag_at(head.checked_sub(1)?));
        if let Some(tag) = tag {
            info.push_str("  ");
            info.push_str(tag.name());
        }

        if !self.selection.is_empty() {
            info.push_str(&format!("  ({} selected)", self.selection.len()));
        }

        let x = buf.write_str([1, y], &info, style);

        if let Some(status) = &self.status {
            buf.write_str([x + 3, y], status, style);
        }
    }

    fn draw_cursor(&self, buf: &mut Buffer, layout: &Layout, origin: OffsetU16, size: OffsetU16) {
        let pos = layout.position_of(self.selection.head);

        let Some(y) = pos.y.checked_sub(self.scroll_row) else {
            return;
        };

        // The caret after a full row sits on its last cell.
        let x = pos.x.min(size.x.saturating_sub(1) as usize);
        let cursor = OffsetUsize::new(x, y);

        if cursor.cmp_lt(size.into()).both() {
            buf.set_cursor(Some(origin + cursor.saturating_to_u16()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use tinyword_core::{Document, Selection, StyleTag};
    use tinyword_term::buffer::{Buffer, Cell};
    use tinyword_term::event::{
        Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use tinyword_term::style::{Color, Weight};
    use tinyword_term::units::OffsetU16;

    use super::Editor;
    use crate::config::Config;

    const SCREEN: [u16; 2] = [80, 10];

    fn editor(document: Document) -> (Editor, Buffer) {
        let mut editor = Editor::new(document, &Config::default());
        let mut buf = Buffer::new(SCREEN);
        editor.draw(&mut buf);
        (editor, buf)
    }

    fn redraw(editor: &mut Editor) -> Buffer {
        let mut buf = Buffer::new(SCREEN);
        editor.draw(&mut buf);
        buf
    }

    fn key(key_code: KeyCode) -> Event {
        Event::key_no_mods(key_code)
    }

    fn shift(key_code: KeyCode) -> Event {
        Event::Key(KeyEvent::new_with_mods(key_code, Modifiers::SHIFT))
    }

    fn mouse(kind: MouseEventKind, x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            pos: OffsetU16::new(x, y),
            modifiers: Modifiers::EMPTY,
        })
    }

    fn type_str(editor: &mut Editor, s: &str) {
        for ch in s.chars() {
            let _ = editor.handle_event(key(KeyCode::Char(ch)));
        }
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.size().x)
            .map(|x| buf[[x, y]].as_ref().map_or(" ", Cell::grapheme).to_owned())
            .collect::<String>()
            .trim_end()
            .to_owned()
    }

    #[test]
    fn toolbar_click_styles_selection() {
        let (mut editor, _) = editor(Document::from_tagged("abcdef", "AAAAAA").unwrap());
        editor.selection = Selection::new(1, 3);

        // "[ Bold ]" starts at column 1 of the toolbar row.
        let _ = editor.handle_event(mouse(MouseEventKind::Press(MouseButton::Left), 3, 0));

        assert_eq!(editor.document.tag_string(), "ABBAAA");
        assert_eq!(editor.selection, Selection::new(1, 3));
        assert_eq!(
            editor.status.as_deref(),
            Some("Bold applied to 2 characters")
        );
        assert_eq!(editor.drain_changes(), 1);
    }

    #[test]
    fn shortcuts_style_selection() {
        let (mut editor, _) = editor(Document::from_tagged("abcdef", "ABBAAA").unwrap());

        let _ = editor.handle_event(Event::Key(KeyEvent::ctrl('A')));
        let _ = editor.handle_event(Event::Key(KeyEvent::ctrl('R')));
        assert_eq!(editor.document.tag_string(), "CCCCCC");

        let _ = editor.handle_event(key(KeyCode::Fn(3)));
        assert_eq!(editor.document.tag_string(), "AAAAAA");

        let _ = editor.handle_event(Event::Key(KeyEvent::ctrl('K')));
        assert_eq!(editor.document.tag_string(), "DDDDDD");
    }

    #[test]
    fn empty_selection_changes_nothing() {
        let (mut editor, _) = editor(Document::from_tagged("abcdef", "ABBAAA").unwrap());
        editor.selection = Selection::caret(2);

        let _ = editor.handle_event(Event::Key(KeyEvent::ctrl('R')));

        assert_eq!(editor.document.tag_string(), "ABBAAA");
        assert_eq!(
            editor.status.as_deref(),
            Some("no selection: nothing to style")
        );
        assert_eq!(editor.drain_changes(), 0);

        let buf = redraw(&mut editor);
        assert!(row_text(&buf, 9).contains("no selection: nothing to style"));
    }

    #[test]
    fn typing_replaces_selection_with_normal_text() {
        let (mut editor, _) = editor(Document::from_tagged("abcdef", "BBBBBB").unwrap());
        editor.selection = Selection::new(4, 1);

        type_str(&mut editor, "XY");

        assert_eq!(editor.document.text(), "aXYef");
        assert_eq!(editor.document.tag_string(), "BAABB");
        assert_eq!(editor.selection, Selection::caret(3));
    }

    #[test]
    fn paste_normalises_line_breaks() {
        let (mut editor, _) = editor(Document::new());

        let _ = editor.handle_event(Event::Paste("one\r\ntwo".to_owned()));

        assert_eq!(editor.document.text(), "one\ntwo");
        assert_eq!(editor.selection, Selection::caret(7));
    }

    #[test]
    fn backspace_and_delete() {
        let (mut editor, _) = editor(Document::from_tagged("abcdef", "ABCDAB").unwrap());
        editor.selection = Selection::caret(3);

        let _ = editor.handle_event(key(KeyCode::Backspace));
        assert_eq!(editor.document.text(), "abdef");
        assert_eq!(editor.document.tag_string(), "ABDAB");

        let _ = editor.handle_event(key(KeyCode::Delete));
        assert_eq!(editor.document.text(), "abef");
        assert_eq!(editor.selection, Selection::caret(2));

        editor.selection = Selection::new(0, 2);
        let _ = editor.handle_event(key(KeyCode::Delete));
        assert_eq!(editor.document.text(), "ef");
        assert_eq!(editor.document.tag_string(), "AB");

        editor.selection = Selection::caret(0);
        let _ = editor.handle_event(key(KeyCode::Backspace));
        assert_eq!(editor.document.text(), "ef");
    }

    #[test]
    fn shift_movement_selects() {
        let (mut editor, _) = editor(Document::from_tagged("abcdef", "AAAAAA").unwrap());
        editor.selection = Selection::caret(1);

        let _ = editor.handle_event(shift(KeyCode::Right));
        let _ = editor.handle_event(shift(KeyCode::Right));
        assert_eq!(editor.selection, Selection::new(1, 3));

        let _ = editor.handle_event(Event::Key(KeyEvent::ctrl('B')));
        assert_eq!(editor.document.tag_string(), "ABBAAA");

        // Plain left collapses to the start of the selection.
        let _ = editor.handle_event(key(KeyCode::Left));
        assert_eq!(editor.selection, Selection::caret(1));

        let _ = editor.handle_event(shift(KeyCode::End));
        assert_eq!(editor.selection, Selection::new(1, 6));

        let _ = editor.handle_event(key(KeyCode::Escape));
        assert_eq!(editor.selection, Selection::caret(6));
    }

    #[test]
    fn vertical_movement_keeps_column() {
        let document = Document::from_runs([("abcdef\nab\nabcdef", StyleTag::Normal)]);
        let (mut editor, _) = editor(document);
        editor.selection = Selection::caret(5);

        let _ = editor.handle_event(key(KeyCode::Down));
        assert_eq!(editor.selection, Selection::caret(9));

        let _ = editor.handle_event(key(KeyCode::Down));
        assert_eq!(editor.selection, Selection::caret(15));

        let _ = editor.handle_event(key(KeyCode::Up));
        let _ = editor.handle_event(key(KeyCode::Up));
        assert_eq!(editor.selection, Selection::caret(5));

        let _ = editor.handle_event(key(KeyCode::Up));
        assert_eq!(editor.selection, Selection::caret(0));
    }

    #[test]
    fn mouse_drag_selects() {
        let (mut editor, _) = editor(Document::demo());

        // Line numbers take the first three columns; text starts on row 1.
        let _ = editor.handle_event(mouse(MouseEventKind::Press(MouseButton::Left), 8, 1));
        let _ = editor.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 2));
        let _ = editor.handle_event(mouse(MouseEventKind::Release, 5, 2));

        assert_eq!(editor.selection, Selection::new(5, 23));

        // Dragging after the release does nothing.
        let _ = editor.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 3, 3));
        assert_eq!(editor.selection, Selection::new(5, 23));
    }

    #[test]
    fn draws_styled_text() {
        let (mut editor, _) = editor(Document::demo());
        editor.selection = Selection::new(0, 4);

        let buf = redraw(&mut editor);

        assert_eq!(row_text(&buf, 1), " 1 This is normal text.");
        assert_eq!(row_text(&buf, 2), " 2 This will be bold.");
        assert_eq!(row_text(&buf, 3), " 3 And this red.");

        let style = |x: u16, y: u16| buf[[x, y]].as_ref().map(Cell::style).unwrap();
        assert!(style(3, 1).reverse);
        assert!(!style(7, 1).reverse);
        assert_eq!(style(3, 2).weight, Weight::Bold);
        assert_eq!(style(3, 3).fg, Color::Red);

        assert!(row_text(&buf, 9).contains("Ln 1, Col 5"));
        assert!(row_text(&buf, 9).contains("(4 selected)"));
        assert_eq!(buf.cursor(), Some(OffsetU16::new(7, 1)));
    }

    #[test]
    fn long_lines_wrap_on_screen() {
        let text = "x".repeat(100);
        let document = Document::from_runs([(text.as_str(), StyleTag::Normal)]);
        let (mut editor, buf) = editor(document);

        // 77 cells fit next to the gutter.
        assert_eq!(row_text(&buf, 1).len(), 80);
        assert_eq!(row_text(&buf, 2), format!("   {}", "x".repeat(23)));

        let _ = editor.handle_event(Event::Key(KeyEvent::new_with_mods(
            KeyCode::End,
            Modifiers::CTRL,
        )));
        let buf = redraw(&mut editor);
        assert_eq!(buf.cursor(), Some(OffsetU16::new(26, 2)));
    }

    #[test]
    fn quit() {
        let (mut editor, _) = editor(Document::new());

        assert_eq!(
            editor.handle_event(Event::Key(KeyEvent::ctrl('Q'))),
            ControlFlow::Break(())
        );
        assert_eq!(
            editor.handle_event(key(KeyCode::Char('q'))),
            ControlFlow::Continue(())
        );
    }
}
