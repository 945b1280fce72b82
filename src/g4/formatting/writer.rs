//! Output writer
//!
//! Two primitives over an [`io::Write`] sink: raw text, and a line break.
//!
//! The indentation owed after a line break is written lazily, right before the
//! next text, so lines that end up empty carry no trailing spaces. A line break
//! requested before anything was written is dropped, so output never starts
//! with a blank line.
use std::io::{self, Write};

pub struct OutputWriter<W: Write> {
    sink: W,
    pending_indent: Option<String>,
    at_line_start: bool,
    started: bool,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            pending_indent: None,
            at_line_start: true,
            started: false,
        }
    }

    pub fn at_line_start(&self) -> bool {
        self.at_line_start
    }

    pub fn write_raw(&mut self, text: &str) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if let Some(indent) = self.pending_indent.take() {
            self.sink.write_all(indent.as_bytes())?;
        }
        self.sink.write_all(text.as_bytes())?;
        self.at_line_start = false;
        self.started = true;
        Ok(())
    }

    /// End the current line; `indent` is written before the next text.
    pub fn line_break(&mut self, indent: String) -> io::Result<()> {
        self.at_line_start = true;
        if !self.started {
            return Ok(());
        }
        self.sink.write_all(b"\n")?;
        self.pending_indent = Some(indent);
        Ok(())
    }

    /// Terminate the last line and hand the sink back.
    pub fn finish(mut self) -> io::Result<W> {
        if self.started && !self.at_line_start {
            self.sink.write_all(b"\n")?;
        }
        self.sink.flush()?;
        Ok(self.sink)
    }
}
