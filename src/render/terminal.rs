//! Terminal control sequences.
//!
//! The render loop only talks to a [TerminalSink]. [AnsiSink] turns those calls into
//! escape sequences on any writer, [Recorder] keeps them around so tests can look
//! at what was asked for rather than parse bytes.

use super::color::Rgb;
use crossterm::{
    QueueableCommand, cursor,
    style::{Color, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// Move the cursor to the top left corner.
const HOME: &[u8] = b"\x1b[H";

/// Receives styled output.
pub trait TerminalSink {
    /// Move the cursor to the top left corner.
    fn home(&mut self) -> io::Result<()>;

    /// Clear the visible screen and the scrollback, leaving the cursor at the top left corner.
    fn clear(&mut self) -> io::Result<()>;

    /// Set the foreground color for whatever comes next.
    fn set_truecolor(&mut self, color: Rgb) -> io::Result<()>;

    /// Write a single raw byte of text.
    fn put_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Reset all styling.
    fn reset(&mut self) -> io::Result<()>;

    fn show_cursor(&mut self) -> io::Result<()>;

    fn hide_cursor(&mut self) -> io::Result<()>;

    /// Push anything buffered out to the terminal.
    fn flush(&mut self) -> io::Result<()>;
}

/// Writes ANSI escape sequences into a writer.
pub struct AnsiSink<W: Write> {
    writer: W,
}

impl<W: Write> AnsiSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// The underlying writer, for output that isn't painted.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TerminalSink for AnsiSink<W> {
    fn home(&mut self) -> io::Result<()> {
        self.writer.write_all(HOME)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.writer.write_all(HOME)?;
        self.writer.queue(Clear(ClearType::All))?.queue(Clear(ClearType::Purge))?;
        Ok(())
    }

    fn set_truecolor(&mut self, color: Rgb) -> io::Result<()> {
        let Rgb { r, g, b } = color;
        self.writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
        Ok(())
    }

    fn put_byte(&mut self, byte: u8) -> io::Result<()> {
        self.writer.write_all(&[byte])
    }

    fn reset(&mut self) -> io::Result<()> {
        self.writer.queue(ResetColor)?;
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.writer.queue(cursor::Show)?;
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.writer.queue(cursor::Hide)?;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A single call made on a [Recorder].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCall {
    Home,
    Clear,
    Color(Rgb),
    Byte(u8),
    Reset,
    ShowCursor,
    HideCursor,
    Flush,
}

/// A sink that remembers every call made on it.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<TerminalCall>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of times `call` was made.
    pub fn count(&self, call: TerminalCall) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    /// All colors set, in order.
    pub fn colors(&self) -> Vec<Rgb> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                TerminalCall::Color(color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    /// All text bytes written, in order.
    pub fn text(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                TerminalCall::Byte(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }
}

impl TerminalSink for Recorder {
    fn home(&mut self) -> io::Result<()> {
        self.calls.push(TerminalCall::Home);
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.calls.push(TerminalCall::Clear);
        Ok(())
    }

    fn set_truecolor(&mut self, color: Rgb) -> io::Result<()> {
        self.calls.push(TerminalCall::Color(color));
        Ok(())
    }

    fn put_byte(&mut self, byte: u8) -> io::Result<()> {
        self.calls.push(TerminalCall::Byte(byte));
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        self.calls.push(TerminalCall::Reset);
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.calls.push(TerminalCall::ShowCursor);
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.calls.push(TerminalCall::HideCursor);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.calls.push(TerminalCall::Flush);
        Ok(())
    }
}

/// A sink whose reader has gone away: every call fails with a broken pipe.
#[cfg(test)]
pub(crate) struct ClosedPipe;

#[cfg(test)]
impl TerminalSink for ClosedPipe {
    fn home(&mut self) -> io::Result<()> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn clear(&mut self) -> io::Result<()> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn set_truecolor(&mut self, _color: Rgb) -> io::Result<()> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn put_byte(&mut self, _byte: u8) -> io::Result<()> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn reset(&mut self) -> io::Result<()> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        Err(io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::ErrorKind::BrokenPipe.into())
    }
}
