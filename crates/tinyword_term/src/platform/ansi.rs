use std::fmt::Write as _;
use std::io::{self, Write};

use super::Writer;
use crate::style::{Color, CursorShape, Weight};
use crate::units::OffsetU16;

const CSI: &str = "\x1b[";

/// Buffers ANSI escape sequences and writes them out on [`Writer::flush`].
pub struct AnsiWriter<W: Write> {
    buf: String,
    writer: W,
}

impl<W: Write> AnsiWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            buf: String::new(),
            writer,
        }
    }

    pub fn inner(&self) -> &W {
        &self.writer
    }

    /// Escape sequences written since the last flush.
    pub fn pending(&self) -> &str {
        &self.buf
    }

    // Writing to a `String` can't fail.
    fn csi(&mut self, args: std::fmt::Arguments) {
        let _ = write!(self.buf, "{CSI}{args}");
    }
}

impl<W: Write> Writer for AnsiWriter<W> {
    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.writer.write_all(self.buf.as_bytes())?;
        self.buf.clear();

        self.writer.flush()
    }

    #[inline]
    fn clear_all(&mut self) {
        self.csi(format_args!("2J"));
        self.csi(format_args!("3J"));
    }

    #[inline]
    fn set_cursor_home(&mut self) {
        self.csi(format_args!("H"));
    }

    #[inline]
    fn next_line(&mut self) {
        self.buf.push_str("\r\n");
    }

    #[inline]
    fn set_cursor_pos(&mut self, pos: impl Into<OffsetU16>) {
        let pos = pos.into();

        let row = pos.y.saturating_add(1);
        let col = pos.x.saturating_add(1);

        self.csi(format_args!("{row};{col}H"));
    }

    #[inline]
    fn set_cursor_vis(&mut self, vis: bool) {
        match vis {
            true => self.csi(format_args!("?25h")),
            false => self.csi(format_args!("?25l")),
        }
    }

    #[inline]
    fn set_cursor_shape(&mut self, shape: CursorShape) {
        match shape {
            CursorShape::Block => self.csi(format_args!("2 q")),
            CursorShape::Underscore => self.csi(format_args!("4 q")),
            CursorShape::Bar => self.csi(format_args!("6 q")),
        }
    }

    #[inline]
    fn set_cursor_blinking(&mut self, blinking: bool) {
        match blinking {
            true => self.csi(format_args!("?12h")),
            false => self.csi(format_args!("?12l")),
        }
    }

    #[inline]
    fn set_fg_color(&mut self, c: Color) {
        self.csi(format_args!("3{}m", c as u8));
    }

    #[inline]
    fn set_bg_color(&mut self, c: Color) {
        self.csi(format_args!("4{}m", c as u8));
    }

    #[inline]
    fn set_weight(&mut self, weight: Weight) {
        match weight {
            Weight::Normal => self.csi(format_args!("22m")),
            Weight::Bold => self.csi(format_args!("1m")),
            Weight::Dim => self.csi(format_args!("2m")),
        }
    }

    #[inline]
    fn set_underline(&mut self, underline: bool) {
        match underline {
            true => self.csi(format_args!("4m")),
            false => self.csi(format_args!("24m")),
        }
    }

    #[inline]
    fn set_reverse(&mut self, reverse: bool) {
        match reverse {
            true => self.csi(format_args!("7m")),
            false => self.csi(format_args!("27m")),
        }
    }

    #[inline]
    fn set_alternate_screen(&mut self, enabled: bool) {
        match enabled {
            true => self.csi(format_args!("?1049h")),
            false => self.csi(format_args!("?1049l")),
        }
    }

    // Button events, drag events, SGR encoding.
    #[inline]
    fn set_mouse_capture(&mut self, enabled: bool) {
        match enabled {
            true => self.csi(format_args!("?1000h{CSI}?1002h{CSI}?1006h")),
            false => self.csi(format_args!("?1006l{CSI}?1002l{CSI}?1000l")),
        }
    }

    #[inline]
    fn set_bracketed_paste(&mut self, enabled: bool) {
        match enabled {
            true => self.csi(format_args!("?2004h")),
            false => self.csi(format_args!("?2004l")),
        }
    }

    #[inline]
    fn write_str_raw(&mut self, s: &str) {
        self.buf.push_str(s);
    }
}
