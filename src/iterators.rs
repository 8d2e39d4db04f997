//! Treebanks spanning several sources
//!
//! A [`Treebank`] reads sentences from an in-memory string, a single file, a
//! list of files or a glob pattern, one source after the other. Files that
//! fail to open are logged and skipped.

use std::path::{Path, PathBuf};

use log::warn;
use thiserror::Error;

use crate::conllu::{CoNLLUReader, ReadError, ReaderOptions, Sentence};

/// Error while iterating a treebank
#[derive(Debug, Error)]
pub enum TreebankError {
    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error(transparent)]
    Glob(#[from] glob::PatternError),
}

/// Source of sentences for a treebank
#[derive(Debug, Clone)]
enum TreeSource {
    /// In-memory CoNLL-U text
    String(String),
    /// File paths, read in order
    Files(Vec<PathBuf>),
}

/// Collection of sentences from a string, file, or glob pattern
///
/// # Examples
///
/// ```no_run
/// use udnucleus::{ReaderOptions, Treebank};
///
/// let treebank = Treebank::from_glob("data/*.conllu", ReaderOptions::default()).unwrap();
/// for (meta, tree) in treebank {
///     println!("{:?}: {} tokens", meta.sent_id(), tree.token_count());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Treebank {
    source: TreeSource,
    options: ReaderOptions,
}

impl Treebank {
    /// Create from an in-memory CoNLL-U string
    pub fn from_string(text: &str, options: ReaderOptions) -> Self {
        Self {
            source: TreeSource::String(text.to_string()),
            options,
        }
    }

    /// Create from a single file path
    pub fn from_file(path: impl AsRef<Path>, options: ReaderOptions) -> Self {
        Self::from_paths(vec![path.as_ref().to_path_buf()], options)
    }

    /// Create from explicit file paths
    pub fn from_paths(paths: Vec<PathBuf>, options: ReaderOptions) -> Self {
        Self {
            source: TreeSource::Files(paths),
            options,
        }
    }

    /// Create from a glob pattern
    ///
    /// Files are processed in sorted order for deterministic results.
    pub fn from_glob(pattern: &str, options: ReaderOptions) -> Result<Self, TreebankError> {
        let mut paths: Vec<PathBuf> = glob::glob(pattern)?.filter_map(Result::ok).collect();
        paths.sort();
        Ok(Self::from_paths(paths, options))
    }

    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Iterate sentences, reporting every error.
    pub fn try_iter(&self) -> Box<dyn Iterator<Item = Result<Sentence, TreebankError>>> {
        let options = self.options.clone();
        match self.source.clone() {
            TreeSource::String(text) => match CoNLLUReader::from_string(&text, options) {
                Ok(reader) => Box::new(reader.map(|result| {
                    result.map_err(|source| TreebankError::Read {
                        path: PathBuf::from("<string>"),
                        source,
                    })
                })),
                Err(e) => Box::new(std::iter::once(Err(TreebankError::Read {
                    path: PathBuf::from("<string>"),
                    source: e.into(),
                }))),
            },
            TreeSource::Files(paths) => Box::new(
                paths
                    .into_iter()
                    .flat_map(move |path| open_file_sentences(path, options.clone())),
            ),
        }
    }

    /// Iterate sentences, skipping errors.
    pub fn iter(&self) -> Box<dyn Iterator<Item = Sentence>> {
        Box::new(self.try_iter().filter_map(|result| match result {
            Ok(sentence) => Some(sentence),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }))
    }
}

impl IntoIterator for Treebank {
    type Item = Sentence;
    type IntoIter = Box<dyn Iterator<Item = Self::Item>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Helper: open a file and return an iterator over its sentences
fn open_file_sentences(
    path: PathBuf,
    options: ReaderOptions,
) -> Box<dyn Iterator<Item = Result<Sentence, TreebankError>>> {
    match CoNLLUReader::from_file(&path, options) {
        Ok(reader) => Box::new(reader.map(move |result| {
            result.map_err(|source| TreebankError::Read {
                path: path.clone(),
                source,
            })
        })),
        Err(source) => Box::new(std::iter::once(Err(TreebankError::FileOpen {
            path,
            source,
        }))),
    }
}
