//! udnucleus: dependency treebanks as sentence graphs
//!
//! Reads CoNLL-U (and CoNLL-U Plus) treebanks into per-sentence dependency
//! graphs and extracts syntactic nuclei from them: small subtrees grown from
//! a content word through its functional dependents.
//! Core implementation in Rust with optional Python bindings.

pub mod address; // Node addresses and their parser
pub mod bytes; // Field splitting and integer parsing
pub mod conllu; // CoNLL-U file parsing
pub mod features; // Feature column codec
pub mod fusion; // Value counts over groups of nodes
pub mod iterators; // Multi-file treebanks
pub mod nucleus; // Nucleus extraction
pub mod row; // Annotation rows and column schemas
pub mod tree; // Sentence graphs and metadata
pub mod upos; // Coarse part-of-speech classes
pub mod writer; // CoNLL-U output

// Python bindings
#[cfg(feature = "pyo3")]
pub mod python;

// Re-exports for convenience
pub use address::{Address, AddressError, AddressParser, ConfigError};
pub use conllu::{CoNLLUReader, ReadError, ReaderOptions, Sentence};
pub use features::{FeatureCodec, Features, read_features, write_features};
pub use fusion::{FusedFeatures, fuse_features};
pub use iterators::{Treebank, TreebankError};
pub use nucleus::{Nucleus, NucleusPredicate, admitted_nodes, coincides, extract_nucleus};
pub use row::{Head, Row, Schema};
pub use tree::{Metadata, SentenceTree};
pub use writer::write_sentence;
