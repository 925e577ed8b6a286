//! Reading QR payload text from stdin instead of an image.
//!
//! Payloads are read until EOF. Surrounding whitespace is not part of a
//! payload, and blank input means "no payload".
//!
//! # Example
//!
//! ```ignore
//! use qrstamp_input::stdin::{PayloadReader, RealStdinReader};
//!
//! let mut reader = RealStdinReader::new();
//! for payload in reader.read_payload_lines()? {
//!     println!("{payload}");
//! }
//! ```

use std::io::{self, BufRead as _, Read};

/// Source of payload text, abstracted so tests need no real stdin.
pub trait PayloadReader {
    /// Reads all remaining input as one payload.
    ///
    /// Returns `Ok(None)` when the input is empty or only whitespace.
    fn read_payload(&mut self) -> io::Result<Option<String>>;

    /// Reads all remaining input as one payload per non-blank line.
    fn read_payload_lines(&mut self) -> io::Result<Vec<String>> {
        Ok(self
            .read_payload()?
            .map(|content| {
                content
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Reader over `std::io::stdin()` or any other [`Read`].
pub struct RealStdinReader<R: Read> {
    reader: io::BufReader<R>,
}

impl RealStdinReader<io::Stdin> {
    pub fn new() -> Self {
        Self {
            reader: io::BufReader::new(io::stdin()),
        }
    }
}

impl Default for RealStdinReader<io::Stdin> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Read> RealStdinReader<R> {
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader: io::BufReader::new(reader),
        }
    }
}

impl<R: Read> PayloadReader for RealStdinReader<R> {
    fn read_payload(&mut self) -> io::Result<Option<String>> {
        let mut content = String::new();

        // read_line returns Ok(0) at EOF (Ctrl+D on Unix, Ctrl+Z Enter on Windows)
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => content.push_str(&line),
                Err(e) => return Err(e),
            }
        }

        let trimmed = content.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_owned()))
        }
    }
}

/// Fixed input for tests. Yields its content once.
#[derive(Debug, Clone)]
pub struct MockStdinReader {
    content: Option<String>,
}

impl MockStdinReader {
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    /// Simulates immediate EOF.
    pub fn empty() -> Self {
        Self { content: None }
    }
}

impl PayloadReader for MockStdinReader {
    fn read_payload(&mut self) -> io::Result<Option<String>> {
        Ok(self
            .content
            .take()
            .map(|c| c.trim().to_owned())
            .filter(|c| !c.is_empty()))
    }
}
