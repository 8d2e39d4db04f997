//! CoNLL-U file parsing
//!
//! Streams a CoNLL-U (or CoNLL-U Plus) file and yields one
//! `(Metadata, SentenceTree)` pair per sentence, in file order.
//!
//! Line handling:
//! - comment lines (`# key = value`) go to the pending sentence's metadata;
//!   the sentence identifier comment starts a fresh tree; in syntax mode it
//!   also closes the pending sentence, otherwise that sentence is dropped
//! - lines starting with a digit `1`-`9` are token rows
//! - anything else (blank lines included) is a sentence boundary
//!
//! At a boundary the pending sentence is emitted if it has dependency edges,
//! or, with `syntax` switched off, if it has any token at all. End of input
//! acts as a final boundary.
//!
//! CoNLL-U format: https://universaldependencies.org/format.html

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::mem;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use log::debug;
use thiserror::Error;

use crate::address::{AddressError, AddressParser, ConfigError, DEFAULT_DECIMAL_SEPARATOR};
use crate::bytes::split_fields;
use crate::features::FeatureCodec;
use crate::row::{Row, Schema};
use crate::tree::{Metadata, SENT_ID_KEY, SentenceTree};

/// Error during CoNLL-U reading
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error at line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid address at line {line}: {source}")]
    Address {
        line: usize,
        #[source]
        source: AddressError,
    },

    #[error("expected a `# global.columns =` header, found {found:?}")]
    ColumnsHeader { found: String },
}

/// Reader configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Prefix of comment lines.
    pub comment: String,
    /// Comment key that opens a new sentence.
    pub sent_id_key: String,
    /// Separator of sub-indexed addresses; must not be `.` or `-`.
    pub decimal_separator: char,
    /// Drop sentences without dependency edges.
    pub syntax: bool,
    /// Read the column list from a `# global.columns =` first line.
    pub plus: bool,
    /// Encoding of the feature columns.
    pub codec: FeatureCodec,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            comment: "#".to_string(),
            sent_id_key: SENT_ID_KEY.to_string(),
            decimal_separator: DEFAULT_DECIMAL_SEPARATOR,
            syntax: true,
            plus: false,
            codec: FeatureCodec::default(),
        }
    }
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn sent_id_key(mut self, key: impl Into<String>) -> Self {
        self.sent_id_key = key.into();
        self
    }

    pub fn decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    pub fn syntax(mut self, syntax: bool) -> Self {
        self.syntax = syntax;
        self
    }

    pub fn plus(mut self, plus: bool) -> Self {
        self.plus = plus;
        self
    }

    pub fn codec(mut self, codec: FeatureCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Check the options before any parsing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        AddressParser::new(self.decimal_separator).map(|_| ())
    }
}

/// One sentence as read from the file
pub type Sentence = (Metadata, SentenceTree);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Plus mode, header not read yet.
    Header,
    Reading,
    Exhausted,
}

/// CoNLL-U reader that iterates over sentences
///
/// The iterator is lazy and one-shot: it reads one line at a time and ends
/// for good once the input is exhausted.
pub struct CoNLLUReader<R: BufRead> {
    lines: Lines<R>,
    line_num: usize,
    options: ReaderOptions,
    addresses: AddressParser,
    schema: Schema,
    state: ReaderState,
    tree: SentenceTree,
    metadata: Metadata,
}

impl CoNLLUReader<BufReader<Box<dyn Read + Send>>> {
    /// Create a reader from a file path
    ///
    /// Files ending in `.gz` are decompressed on the fly.
    pub fn from_file(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self, ReadError> {
        options.validate()?;
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReadError::Io { line: 0, source })?;
        let inner: Box<dyn Read + Send> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(Self::new(BufReader::new(inner), options)?)
    }
}

impl CoNLLUReader<BufReader<std::io::Cursor<String>>> {
    /// Create a reader from a string
    pub fn from_string(text: &str, options: ReaderOptions) -> Result<Self, ConfigError> {
        let cursor = std::io::Cursor::new(text.to_string());
        Self::new(BufReader::new(cursor), options)
    }
}

impl<R: BufRead> CoNLLUReader<R> {
    pub fn new(reader: R, options: ReaderOptions) -> Result<Self, ConfigError> {
        let addresses = AddressParser::new(options.decimal_separator)?;
        let state = if options.plus {
            ReaderState::Header
        } else {
            ReaderState::Reading
        };
        Ok(Self {
            lines: reader.lines(),
            line_num: 0,
            options,
            addresses,
            schema: Schema::standard(),
            state,
            tree: SentenceTree::new(),
            metadata: Metadata::new(),
        })
    }

    /// Column schema in use.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Line number of the last line read.
    pub fn line_num(&self) -> usize {
        self.line_num
    }

    fn read_header(&mut self) -> Result<(), ReadError> {
        self.state = ReaderState::Exhausted;
        let line = match self.lines.next() {
            None => return Ok(()),
            Some(line) => line.map_err(|source| ReadError::Io { line: 1, source })?,
        };
        self.line_num = 1;
        self.schema =
            Schema::from_header(&line).ok_or_else(|| ReadError::ColumnsHeader { found: line })?;
        self.state = ReaderState::Reading;
        Ok(())
    }

    // Emit the pending sentence if it carries anything usable
    fn flush(&mut self) -> Option<Sentence> {
        if self.tree.has_edges() || (!self.options.syntax && self.tree.has_tokens()) {
            let tree = mem::take(&mut self.tree);
            let metadata = mem::take(&mut self.metadata);
            return Some((metadata, tree));
        }
        if self.tree.has_tokens() {
            debug!(
                "dropping sentence {:?} without dependency edges before line {}",
                self.metadata.sent_id(),
                self.line_num
            );
            self.tree = SentenceTree::new();
            self.metadata = Metadata::new();
        }
        None
    }

    // Returns a finished sentence when the comment closes the previous one
    fn read_comment(&mut self, comment: &str) -> Option<Sentence> {
        let (key, value) = match comment.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (comment.trim(), ""),
        };

        let mut finished = None;
        if key == self.options.sent_id_key {
            if self.tree.has_tokens() {
                if self.options.syntax {
                    finished = self.flush();
                } else {
                    debug!(
                        "discarding unterminated sentence {:?} at line {}",
                        self.metadata.sent_id(),
                        self.line_num
                    );
                    self.metadata = Metadata::new();
                }
            }
            self.tree = SentenceTree::new();
        }
        self.metadata.insert(key, value);
        finished
    }

    fn read_token(&mut self, line: &str) -> Result<(), ReadError> {
        let fields = split_fields(line, self.schema.len());
        let row = Row::from_fields(&self.schema, &fields, &self.addresses, &self.options.codec)
            .map_err(|source| ReadError::Address {
                line: self.line_num,
                source,
            })?;

        let id = row.id;
        let head = row.head.address();
        if head.is_none() {
            debug!("line {}: no usable head {:?}", self.line_num, row.head);
        }
        self.tree.add_row(row);
        if let Some(head) = head {
            self.tree.add_edge(head, id);
        }
        Ok(())
    }
}

fn is_token_line(line: &str) -> bool {
    matches!(line.as_bytes().first(), Some(b'1'..=b'9'))
}

impl<R: BufRead> Iterator for CoNLLUReader<R> {
    type Item = Result<Sentence, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ReaderState::Header {
            if let Err(e) = self.read_header() {
                return Some(Err(e));
            }
        }

        while self.state == ReaderState::Reading {
            let line = match self.lines.next() {
                None => {
                    self.state = ReaderState::Exhausted;
                    return self.flush().map(Ok);
                }
                Some(Err(source)) => {
                    self.state = ReaderState::Exhausted;
                    return Some(Err(ReadError::Io {
                        line: self.line_num + 1,
                        source,
                    }));
                }
                Some(Ok(line)) => line,
            };
            self.line_num += 1;

            let line = line.trim_matches(|c: char| c == '\n' || c == '\r' || c == ' ');

            if let Some(comment) = line.strip_prefix(self.options.comment.as_str()) {
                if let Some(sentence) = self.read_comment(comment) {
                    return Some(Ok(sentence));
                }
            } else if is_token_line(line) {
                if let Err(e) = self.read_token(line) {
                    return Some(Err(e));
                }
            } else if let Some(sentence) = self.flush() {
                return Some(Ok(sentence));
            }
        }

        None
    }
}
