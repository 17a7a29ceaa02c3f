//! Interactive input port.
//!
//! [`Prompter`] is the only way the setup pipeline talks to the operator.
//! The CLI supplies a terminal implementation; [`LinePrompter`] drives any
//! reader/writer pair, which covers piped stdin and scripted tests.

use std::io::{self, BufRead, Write};

/// Source of operator answers.
pub trait Prompter {
    /// Show `prompt` and return one raw line of input, without its line terminator.
    ///
    /// A line that is not valid UTF-8 is consumed and reported as
    /// `io::ErrorKind::InvalidData`; the caller may ask again.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Tell the operator why the last answer was rejected.
    fn report_invalid(&mut self, message: &str) -> io::Result<()>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        (**self).read_line(prompt)
    }

    fn report_invalid(&mut self, message: &str) -> io::Result<()> {
        (**self).report_invalid(message)
    }
}

/// Line-oriented prompter over arbitrary streams.
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the prompter and return the writer, e.g. to inspect a transcript.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.writer, "{} ", prompt)?;
        self.writer.flush()?;

        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a valid answer was given",
            ));
        }

        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn report_invalid(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", message)?;
        self.writer.flush()
    }
}
