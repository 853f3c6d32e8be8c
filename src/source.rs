//! Where model readers get their lines from.
//!
//! Readers take a [`LineSource`] and never guess the compression of a file
//! themselves; the caller decides whether a path is plain text or gzip.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

pub trait LineSource {
    /// Opens a fresh reader positioned at the first line.
    fn open(&self) -> io::Result<Box<dyn BufRead>>;

    /// Human readable origin, used in log messages.
    fn name(&self) -> String;
}

/// An uncompressed file.
#[derive(Debug, Clone)]
pub struct PlainText {
    path: PathBuf,
}

impl PlainText {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PlainText { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for PlainText {
    fn open(&self) -> io::Result<Box<dyn BufRead>> {
        Ok(Box::new(BufReader::new(File::open(&self.path)?)))
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// A gzip-compressed file. Concatenated gzip members are read as one stream.
#[derive(Debug, Clone)]
pub struct Gzip {
    path: PathBuf,
}

impl Gzip {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Gzip { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LineSource for Gzip {
    fn open(&self) -> io::Result<Box<dyn BufRead>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    }

    fn name(&self) -> String {
        format!("{} (gzip)", self.path.display())
    }
}

/// Lines of `reader` decoded as ISO-8859-1, without their terminators.
///
/// Every byte maps to exactly one char, so decoding itself cannot fail.
pub fn latin1_lines<R: BufRead>(reader: R) -> Latin1Lines<R> {
    Latin1Lines {
        reader,
        buf: Vec::new(),
    }
}

pub struct Latin1Lines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Iterator for Latin1Lines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(self.buf.iter().map(|&b| char::from(b)).collect()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
