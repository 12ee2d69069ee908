//! Line sources feeding the Ex parser.

use memchr::memchr;
use std::io::BufRead;

/// Supplies input lines on demand.
///
/// The parser asks for a new line with `prompt = ':'` when it starts a
/// fresh command, and passes an indentation hint for continuation reads
/// (`:append` bodies use it to detect the terminating `.`). A returned
/// line never contains its trailing newline. `None` means end of input.
pub trait LineSource {
    fn next_line(&mut self, prompt: char, indent: usize) -> Option<String>;
}

/// Reads lines out of an in-memory string.
pub struct StringLineSource<'a> {
    rest: &'a str,
    done: bool,
}

impl<'a> StringLineSource<'a> {
    pub fn new(source: &'a str) -> Self {
        StringLineSource { rest: source, done: source.is_empty() }
    }
}

impl LineSource for StringLineSource<'_> {
    fn next_line(&mut self, _prompt: char, _indent: usize) -> Option<String> {
        if self.done {
            return None;
        }
        match memchr(b'\n', self.rest.as_bytes()) {
            Some(nl) => {
                let line = &self.rest[..nl];
                self.rest = &self.rest[nl + 1..];
                if self.rest.is_empty() {
                    self.done = true;
                }
                Some(line.to_owned())
            }
            None => {
                self.done = true;
                Some(std::mem::take(&mut self.rest).to_owned())
            }
        }
    }
}

/// Reads lines from any buffered reader; I/O errors end the input.
pub struct FileLineSource<R: BufRead> {
    reader: R,
}

impl<R: BufRead> FileLineSource<R> {
    pub fn new(reader: R) -> Self {
        FileLineSource { reader }
    }
}

impl<R: BufRead> LineSource for FileLineSource<R> {
    fn next_line(&mut self, _prompt: char, _indent: usize) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
        }
    }
}
