//! Line-oriented console adapter used by the menu controller.
//!
//! # Invariants
//! - Prompts are flushed before input is read.
//! - Returned lines have the trailing line terminator removed, nothing else.
//! - End of input is reported as `None`, never as an empty line.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Pairs a buffered reader with a writer for prompt/answer exchanges.
pub struct Console<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Console<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    /// Writes one line of text.
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Writes `text` without a newline and reads the answer.
    pub fn prompt(&mut self, text: impl Display) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads one line, or `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        if buf.ends_with('\n') {
            buf.pop();
            if buf.ends_with('\r') {
                buf.pop();
            }
        }
        Ok(Some(buf))
    }

    pub fn into_inner(self) -> (I, O) {
        (self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::Console;

    #[test]
    fn read_line_strips_terminators_only() {
        let mut console = Console::new(&b"  spaced  \r\nlast"[..], Vec::new());
        assert_eq!(console.read_line().unwrap().as_deref(), Some("  spaced  "));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("last"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn prompt_writes_text_before_reading() {
        let mut console = Console::new(&b"Alpha\n"[..], Vec::new());
        let answer = console.prompt("Name: ").unwrap();
        assert_eq!(answer.as_deref(), Some("Alpha"));

        let (_, output) = console.into_inner();
        assert_eq!(String::from_utf8(output).unwrap(), "Name: ");
    }
}
