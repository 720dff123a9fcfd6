use self::raw_term::RawTerm;
use super::ansi::AnsiWriter;
use super::ansi_event::AnsiEvents;
use super::{Terminal, Writer};
use crate::style::{CursorStyle, Style};
use crate::units::OffsetU16;

mod raw_term;

pub struct LinuxTerminal {
    ansi_raw_term: AnsiWriter<RawTerm>,
    ansi_events: AnsiEvents,
}

impl Terminal for LinuxTerminal {
    type Writer = AnsiWriter<RawTerm>;
    type Events = AnsiEvents;

    fn init() -> std::io::Result<Self> {
        let mut term = Self {
            ansi_raw_term: AnsiWriter::new(RawTerm::new()?),
            ansi_events: AnsiEvents::stdin(),
        };

        let writer = term.writer();
        writer.set_alternate_screen(true);
        writer.set_mouse_capture(true);
        writer.set_bracketed_paste(true);
        writer.clear_all();
        writer.flush()?;

        Ok(term)
    }

    #[inline]
    fn size(&self) -> std::io::Result<OffsetU16> {
        self.ansi_raw_term.inner().size()
    }

    #[inline]
    fn writer(&mut self) -> &mut Self::Writer {
        &mut self.ansi_raw_term
    }

    #[inline]
    fn events(&mut self) -> &mut Self::Events {
        &mut self.ansi_events
    }
}

impl Drop for LinuxTerminal {
    fn drop(&mut self) {
        let writer = self.writer();

        writer.set_bracketed_paste(false);
        writer.set_mouse_capture(false);
        writer.clear_all();
        writer.set_cursor_home();
        writer.set_cursor_vis(true);
        writer.write_cursor_style(CursorStyle::default());
        writer.write_style(Style::default());
        writer.set_alternate_screen(false);

        if let Err(err) = writer.flush() {
            log::error!("couldn't reset terminal: {err}");
        }
    }
}
