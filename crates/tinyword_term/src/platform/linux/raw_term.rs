use std::fs::File;
use std::io::{self, Write};
use std::mem::{self, ManuallyDrop};
use std::os::fd::{FromRawFd, RawFd};

use libc::{termios as Termios, winsize as Winsize, STDIN_FILENO, STDOUT_FILENO};

use crate::units::OffsetU16;

macro_rules! cvt {
    ($res:expr) => {{
        match $res {
            -1 => Err(io::Error::last_os_error()),
            res => Ok(res),
        }
    }};
}

fn get_termios(fd: RawFd) -> io::Result<Termios> {
    unsafe {
        let mut termios: Termios = mem::zeroed();
        cvt!(libc::tcgetattr(fd, &mut termios))?;
        Ok(termios)
    }
}

fn set_termios(fd: RawFd, termios: &Termios) -> io::Result<()> {
    cvt!(unsafe { libc::tcsetattr(fd, libc::TCSANOW, termios) })?;
    Ok(())
}

fn get_size(fd: RawFd) -> io::Result<OffsetU16> {
    let mut size: Winsize = unsafe { mem::zeroed() };
    cvt!(unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) })?;
    Ok(OffsetU16::new(size.ws_col, size.ws_row))
}

/// Puts the terminal into raw mode for as long as it lives, and writes
/// straight to stdout.
pub struct RawTerm {
    termios_prev: Termios,
}

impl RawTerm {
    pub fn new() -> io::Result<Self> {
        let termios_prev = get_termios(STDIN_FILENO)?;

        let mut termios = termios_prev;
        unsafe { libc::cfmakeraw(&mut termios) };
        set_termios(STDIN_FILENO, &termios)?;

        log::debug!("entered raw mode");

        Ok(Self { termios_prev })
    }

    pub fn size(&self) -> io::Result<OffsetU16> {
        get_size(STDOUT_FILENO)
    }
}

impl Drop for RawTerm {
    fn drop(&mut self) {
        if let Err(err) = set_termios(STDIN_FILENO, &self.termios_prev) {
            log::error!("couldn't restore terminal mode: {err}");
        }
    }
}

impl Write for RawTerm {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        get_stdout().write(buf)
    }

    fn write_vectored(&mut self, bufs: &[io::IoSlice]) -> io::Result<usize> {
        get_stdout().write_vectored(bufs)
    }

    fn flush(&mut self) -> io::Result<()> {
        get_stdout().flush()
    }
}

// Unbuffered, and never closes the descriptor.
fn get_stdout() -> ManuallyDrop<File> {
    ManuallyDrop::new(unsafe { File::from_raw_fd(STDOUT_FILENO) })
}
