use std::io::{self, Read};
use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use super::Events;
use crate::event::{
    Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crate::units::OffsetU16;

const ESC: u8 = 0x1b;
const PASTE_END: &[u8] = b"\x1b[201~";

/// Sequences longer than this without a final byte are garbage.
const MAX_CSI_LEN: usize = 64;

/// Input events decoded from raw bytes read on a background thread.
pub struct AnsiEvents {
    rx: Receiver<io::Result<Vec<u8>>>,
    decoder: AnsiDecoder,
}

impl AnsiEvents {
    pub fn stdin() -> Self {
        Self::from_reader(io::stdin())
    }

    pub fn from_reader(mut reader: impl Read + Send + 'static) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();

        std::thread::spawn(move || {
            let mut buf = [0; 1024];

            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(Ok(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                    Err(err) => {
                        let _ = tx.send(Err(err));
                        break;
                    }
                }
            }

            log::debug!("input reader finished");
        });

        Self {
            rx,
            decoder: AnsiDecoder::default(),
        }
    }
}

impl Events for AnsiEvents {
    fn read_with_deadline(&mut self, deadline: Instant) -> io::Result<Option<Event>> {
        loop {
            if let Some(event) = self.decoder.next_event(false) {
                return Ok(Some(event));
            }

            match self.rx.recv_deadline(deadline) {
                Ok(Ok(bytes)) => {
                    log::trace!("input bytes: {bytes:?}");
                    self.decoder.feed(&bytes);
                }

                Ok(Err(err)) => return Err(err),

                // Nothing more arrived in time, so a pending lone escape really
                // was the escape key.
                Err(RecvTimeoutError::Timeout) => return Ok(self.decoder.next_event(true)),

                Err(RecvTimeoutError::Disconnected) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "terminal input closed",
                    ))
                }
            }
        }
    }
}

/// Incremental decoder from terminal input bytes to [`Event`]s.
#[derive(Default, Debug)]
pub struct AnsiDecoder {
    buf: Vec<u8>,
}

enum Parsed {
    Complete(Event, usize),
    Incomplete,
}

impl AnsiDecoder {
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Decode the next event, if a complete one is buffered.
    ///
    /// With `flush` set, a trailing lone escape byte is reported as the escape
    /// key instead of being held back as the start of a sequence, and so are
    /// the two-byte `ESC O` and `ESC [` prefixes (as Alt-O and Alt-[).
    pub fn next_event(&mut self, flush: bool) -> Option<Event> {
        match parse(&self.buf) {
            Parsed::Complete(event, consumed) => {
                self.buf.drain(..consumed);
                Some(event)
            }

            Parsed::Incomplete if flush && self.buf == [ESC] => {
                self.buf.clear();
                Some(Event::key_no_mods(KeyCode::Escape))
            }

            // Alt-O and Alt-[ look like the start of a sequence.
            Parsed::Incomplete if flush && matches!(self.buf[..], [ESC, b'O' | b'[']) => {
                let ch = char::from(self.buf[1]);
                self.buf.clear();
                Some(Event::Key(KeyEvent::new_with_mods(
                    KeyCode::Char(ch),
                    Modifiers::ALT,
                )))
            }

            Parsed::Incomplete => None,
        }
    }
}

fn parse(b: &[u8]) -> Parsed {
    match b {
        [] | [ESC] => Parsed::Incomplete,
        [ESC, b'[', ..] => parse_csi(b),
        [ESC, b'O', rest @ ..] => parse_ss3(rest),
        [ESC, ESC, ..] => Parsed::Complete(Event::key_no_mods(KeyCode::Escape), 1),
        [ESC, rest @ ..] => match parse_char(rest) {
            Parsed::Complete(Event::Key(mut key), n) => {
                key.modifiers |= Modifiers::ALT;
                Parsed::Complete(Event::Key(key), n + 1)
            }
            Parsed::Complete(event, n) => Parsed::Complete(event, n + 1),
            Parsed::Incomplete => Parsed::Incomplete,
        },
        _ => parse_char(b),
    }
}

fn parse_char(b: &[u8]) -> Parsed {
    let Some(&first) = b.first() else {
        return Parsed::Incomplete;
    };

    let key = |key_code| Parsed::Complete(Event::key_no_mods(key_code), 1);

    match first {
        b'\r' => key(KeyCode::Return),
        b'\n' => key(KeyCode::Newline),
        b'\t' => key(KeyCode::Tab),
        0x7f | 0x08 => key(KeyCode::Backspace),
        0x01..=0x1a => {
            let ch = char::from(b'A' + first - 1);
            Parsed::Complete(Event::Key(KeyEvent::ctrl(ch)), 1)
        }
        0x00..=0x1f => Parsed::Complete(Event::Unknown, 1),
        _ => parse_utf8(b),
    }
}

fn parse_utf8(b: &[u8]) -> Parsed {
    let len = match b[0] {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return Parsed::Complete(Event::Unknown, 1),
    };

    if b.len() < len {
        return Parsed::Incomplete;
    }

    match std::str::from_utf8(&b[..len]).ok().and_then(|s| s.chars().next()) {
        Some(ch) => Parsed::Complete(Event::key_no_mods(KeyCode::Char(ch)), len),
        None => Parsed::Complete(Event::Unknown, 1),
    }
}

fn parse_ss3(rest: &[u8]) -> Parsed {
    let Some(&final_byte) = rest.first() else {
        return Parsed::Incomplete;
    };

    let key_code = match final_byte {
        b'P'..=b'S' => KeyCode::Fn(final_byte - b'P' + 1),
        other => match cursor_key(other) {
            Some(key_code) => key_code,
            None => return Parsed::Complete(Event::Unknown, 3),
        },
    };

    Parsed::Complete(Event::key_no_mods(key_code), 3)
}

fn parse_csi(b: &[u8]) -> Parsed {
    let Some(final_index) = b[2..]
        .iter()
        .position(|byte| (0x40..=0x7e).contains(byte))
        .map(|i| i + 2)
    else {
        if b.len() > MAX_CSI_LEN {
            return Parsed::Complete(Event::Unknown, b.len());
        }
        return Parsed::Incomplete;
    };

    let consumed = final_index + 1;
    let final_byte = b[final_index];

    let Ok(params) = std::str::from_utf8(&b[2..final_index]) else {
        return Parsed::Complete(Event::Unknown, consumed);
    };

    if let Some(mouse) = params.strip_prefix('<') {
        let event = parse_sgr_mouse(mouse, final_byte).unwrap_or(Event::Unknown);
        return Parsed::Complete(event, consumed);
    }

    let mut nums = params.split(';').map(|n| n.parse::<u16>().ok());
    let first = nums.next().flatten();
    let modifiers = nums
        .next()
        .flatten()
        .map(decode_modifiers)
        .unwrap_or(Modifiers::EMPTY);

    let key_code = match final_byte {
        b'~' => match first {
            Some(200) => return parse_paste(b, consumed),
            Some(n) => tilde_key(n),
            None => None,
        },
        b'P'..=b'S' => Some(KeyCode::Fn(final_byte - b'P' + 1)),
        b'Z' => {
            let key = KeyEvent::new_with_mods(KeyCode::Tab, Modifiers::SHIFT);
            return Parsed::Complete(Event::Key(key), consumed);
        }
        other => cursor_key(other),
    };

    let event = match key_code {
        Some(key_code) => Event::Key(KeyEvent::new_with_mods(key_code, modifiers)),
        None => Event::Unknown,
    };

    Parsed::Complete(event, consumed)
}

fn parse_paste(b: &[u8], start: usize) -> Parsed {
    let content = &b[start..];

    let Some(end) = content
        .windows(PASTE_END.len())
        .position(|window| window == PASTE_END)
    else {
        return Parsed::Incomplete;
    };

    let text = String::from_utf8_lossy(&content[..end]).into_owned();
    Parsed::Complete(Event::Paste(text), start + end + PASTE_END.len())
}

fn parse_sgr_mouse(params: &str, final_byte: u8) -> Option<Event> {
    let mut nums = params.split(';').map(|n| n.parse::<u16>().ok());
    let code = nums.next()??;
    let x = nums.next()??;
    let y = nums.next()??;

    let button = match code & 0b11 {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    };

    let kind = if code & 64 != 0 {
        match code & 1 {
            0 => MouseEventKind::ScrollUp,
            _ => MouseEventKind::ScrollDown,
        }
    } else if final_byte == b'm' {
        MouseEventKind::Release
    } else if code & 32 != 0 {
        MouseEventKind::Drag(button?)
    } else {
        match button {
            Some(button) => MouseEventKind::Press(button),
            None => MouseEventKind::Release,
        }
    };

    let mut modifiers = Modifiers::EMPTY;
    if code & 4 != 0 {
        modifiers |= Modifiers::SHIFT;
    }
    if code & 8 != 0 {
        modifiers |= Modifiers::ALT;
    }
    if code & 16 != 0 {
        modifiers |= Modifiers::CTRL;
    }

    Some(Event::Mouse(MouseEvent {
        kind,
        pos: OffsetU16::new(x.saturating_sub(1), y.saturating_sub(1)),
        modifiers,
    }))
}

fn cursor_key(final_byte: u8) -> Option<KeyCode> {
    match final_byte {
        b'A' => Some(KeyCode::Up),
        b'B' => Some(KeyCode::Down),
        b'C' => Some(KeyCode::Right),
        b'D' => Some(KeyCode::Left),
        b'H' => Some(KeyCode::Home),
        b'F' => Some(KeyCode::End),
        _ => None,
    }
}

fn tilde_key(n: u16) -> Option<KeyCode> {
    let key_code = match n {
        1 | 7 => KeyCode::Home,
        2 => KeyCode::Insert,
        3 => KeyCode::Delete,
        4 | 8 => KeyCode::End,
        5 => KeyCode::PageUp,
        6 => KeyCode::PageDown,
        11..=15 => KeyCode::Fn((n - 10) as u8),
        17..=21 => KeyCode::Fn((n - 11) as u8),
        23 | 24 => KeyCode::Fn((n - 12) as u8),
        _ => return None,
    };

    Some(key_code)
}

// xterm encodes modifiers as 1 + a bitmask with the same layout as `Modifiers`.
fn decode_modifiers(n: u16) -> Modifiers {
    Modifiers::from_bits_truncate(n.saturating_sub(1) as u8)
}

#[cfg(test)]
mod tests {
    use super::AnsiDecoder;
    use crate::event::{
        Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use crate::units::OffsetU16;

    fn decode_all(bytes: &[u8]) -> Vec<Event> {
        let mut decoder = AnsiDecoder::default();
        decoder.feed(bytes);

        std::iter::from_fn(|| decoder.next_event(true)).collect()
    }

    fn key(key_code: KeyCode, modifiers: Modifiers) -> Event {
        Event::Key(KeyEvent::new_with_mods(key_code, modifiers))
    }

    #[test]
    fn plain_text() {
        assert_eq!(
            decode_all("hé!".as_bytes()),
            vec![
                Event::key_no_mods(KeyCode::Char('h')),
                Event::key_no_mods(KeyCode::Char('é')),
                Event::key_no_mods(KeyCode::Char('!')),
            ]
        );
    }

    #[test]
    fn control_keys() {
        assert_eq!(
            decode_all(b"\x02\x11\r\x7f\t"),
            vec![
                Event::Key(KeyEvent::ctrl('B')),
                Event::Key(KeyEvent::ctrl('Q')),
                Event::key_no_mods(KeyCode::Return),
                Event::key_no_mods(KeyCode::Backspace),
                Event::key_no_mods(KeyCode::Tab),
            ]
        );
    }

    #[test]
    fn cursor_keys_with_modifiers() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[1;2D\x1b[1;5C\x1bOH\x1b[3~"),
            vec![
                key(KeyCode::Up, Modifiers::EMPTY),
                key(KeyCode::Left, Modifiers::SHIFT),
                key(KeyCode::Right, Modifiers::CTRL),
                key(KeyCode::Home, Modifiers::EMPTY),
                key(KeyCode::Delete, Modifiers::EMPTY),
            ]
        );
    }

    #[test]
    fn function_keys() {
        assert_eq!(
            decode_all(b"\x1bOP\x1bOR\x1b[15~\x1b[24~"),
            vec![
                key(KeyCode::Fn(1), Modifiers::EMPTY),
                key(KeyCode::Fn(3), Modifiers::EMPTY),
                key(KeyCode::Fn(5), Modifiers::EMPTY),
                key(KeyCode::Fn(12), Modifiers::EMPTY),
            ]
        );
    }

    #[test]
    fn alt_and_escape() {
        assert_eq!(
            decode_all(b"\x1bx"),
            vec![key(KeyCode::Char('x'), Modifiers::ALT)]
        );
        assert_eq!(
            decode_all(b"\x1b"),
            vec![Event::key_no_mods(KeyCode::Escape)]
        );
    }

    #[test]
    fn lone_escape_waits_unless_flushed() {
        let mut decoder = AnsiDecoder::default();
        decoder.feed(b"\x1b");
        assert_eq!(decoder.next_event(false), None);

        decoder.feed(b"[B");
        assert_eq!(
            decoder.next_event(false),
            Some(Event::key_no_mods(KeyCode::Down))
        );
    }

    #[test]
    fn alt_o_and_alt_bracket_are_not_held_back() {
        let mut decoder = AnsiDecoder::default();
        decoder.feed(b"\x1bO");
        assert_eq!(decoder.next_event(false), None);
        assert_eq!(
            decoder.next_event(true),
            Some(key(KeyCode::Char('O'), Modifiers::ALT))
        );

        // The next key is its own event rather than the end of a sequence.
        decoder.feed(b"x");
        assert_eq!(
            decoder.next_event(false),
            Some(Event::key_no_mods(KeyCode::Char('x')))
        );

        assert_eq!(
            decode_all(b"\x1b["),
            vec![key(KeyCode::Char('['), Modifiers::ALT)]
        );
    }

    #[test]
    fn split_utf8_waits() {
        let bytes = "€".as_bytes();

        let mut decoder = AnsiDecoder::default();
        decoder.feed(&bytes[..1]);
        assert_eq!(decoder.next_event(true), None);

        decoder.feed(&bytes[1..]);
        assert_eq!(
            decoder.next_event(true),
            Some(Event::key_no_mods(KeyCode::Char('€')))
        );
    }

    #[test]
    fn bracketed_paste() {
        let mut decoder = AnsiDecoder::default();
        decoder.feed(b"\x1b[200~line one\r\nli");
        assert_eq!(decoder.next_event(true), None);

        decoder.feed(b"ne two\x1b[201~a");
        assert_eq!(
            decoder.next_event(true),
            Some(Event::Paste("line one\r\nline two".to_owned()))
        );
        assert_eq!(
            decoder.next_event(true),
            Some(Event::key_no_mods(KeyCode::Char('a')))
        );
    }

    #[test]
    fn sgr_mouse() {
        let events = decode_all(b"\x1b[<0;5;2M\x1b[<32;7;2M\x1b[<0;7;2m\x1b[<65;1;1M");

        assert_eq!(
            events,
            vec![
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Press(MouseButton::Left),
                    pos: OffsetU16::new(4, 1),
                    modifiers: Modifiers::EMPTY,
                }),
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Drag(MouseButton::Left),
                    pos: OffsetU16::new(6, 1),
                    modifiers: Modifiers::EMPTY,
                }),
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Release,
                    pos: OffsetU16::new(6, 1),
                    modifiers: Modifiers::EMPTY,
                }),
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::ScrollDown,
                    pos: OffsetU16::new(0, 0),
                    modifiers: Modifiers::EMPTY,
                }),
            ]
        );
    }

    #[test]
    fn unknown_sequences_are_skipped() {
        assert_eq!(
            decode_all(b"\x1b[99~x"),
            vec![Event::Unknown, Event::key_no_mods(KeyCode::Char('x'))]
        );
    }
}
