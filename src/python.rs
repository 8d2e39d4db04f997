//! Python bindings for udnucleus
//!
//! This module provides PyO3-based Python bindings for the Rust core.

use pyo3::exceptions::{PyIOError, PyIndexError, PyValueError};
use pyo3::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::address::{Address, AddressParser, ConfigError};
use crate::conllu::{CoNLLUReader, ReadError, ReaderOptions, Sentence};
use crate::features::{self, Features};
use crate::fusion;
use crate::nucleus::{Nucleus as RustNucleus, NucleusPredicate, extract_nucleus};
use crate::tree::SentenceTree;

/// Convert ReadError to Python exception
impl From<ReadError> for PyErr {
    fn from(err: ReadError) -> PyErr {
        match err {
            ReadError::Io { .. } => PyIOError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

fn config_error(err: ConfigError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn features_to_dict(features: &Features) -> HashMap<String, Vec<String>> {
    features
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_vec()))
        .collect()
}

fn dict_to_features(dict: HashMap<String, Vec<String>>) -> Features {
    let mut features = Features::new();
    for (key, values) in dict {
        features.insert(key, values);
    }
    features
}

// Missing sets fall back to the functional defaults
fn predicate_from(
    funcrel: Option<Vec<String>>,
    funcpos: Option<Vec<String>>,
    multi: Option<Vec<String>>,
) -> NucleusPredicate {
    let defaults = NucleusPredicate::default();
    NucleusPredicate::new(
        funcrel.unwrap_or_else(|| defaults.funcrel().iter().cloned().collect()),
        funcpos.unwrap_or_else(|| defaults.funcpos().iter().cloned().collect()),
        multi.unwrap_or_else(|| defaults.multi().iter().cloned().collect()),
    )
}

/// A word (or multiword token) of a sentence tree.
#[pyclass(name = "Word")]
pub struct PyWord {
    id: Address,
    tree: Arc<SentenceTree>,
}

impl PyWord {
    fn row(&self) -> PyResult<&crate::row::Row> {
        self.tree
            .row(self.id)
            .ok_or_else(|| PyIndexError::new_err(format!("no row at {}", self.id)))
    }
}

#[pymethods]
impl PyWord {
    #[getter]
    fn id(&self) -> String {
        self.id.to_string()
    }

    #[getter]
    fn form(&self) -> PyResult<String> {
        Ok(self.row()?.form.clone())
    }

    #[getter]
    fn lemma(&self) -> PyResult<String> {
        Ok(self.row()?.lemma.clone())
    }

    #[getter]
    fn upos(&self) -> PyResult<String> {
        Ok(self.row()?.upos.clone())
    }

    #[getter]
    fn xpos(&self) -> PyResult<String> {
        Ok(self.row()?.xpos.clone())
    }

    #[getter]
    fn feats(&self) -> PyResult<HashMap<String, Vec<String>>> {
        Ok(features_to_dict(&self.row()?.feats))
    }

    #[getter]
    fn head(&self) -> PyResult<String> {
        Ok(self.row()?.head.to_string())
    }

    #[getter]
    fn deprel(&self) -> PyResult<String> {
        Ok(self.row()?.deprel.clone())
    }

    #[getter]
    fn misc(&self) -> PyResult<HashMap<String, Vec<String>>> {
        Ok(features_to_dict(&self.row()?.misc))
    }

    fn __repr__(&self) -> PyResult<String> {
        let row = self.row()?;
        Ok(format!(
            "<Word id={} form='{}' lemma='{}' upos='{}' deprel='{}'>",
            self.id, row.form, row.lemma, row.upos, row.deprel
        ))
    }
}

/// Flat projection of an extracted nucleus.
#[pyclass(name = "Nucleus")]
pub struct PyNucleus {
    inner: RustNucleus,
}

#[pymethods]
impl PyNucleus {
    #[getter]
    fn start(&self) -> String {
        self.inner.start.to_string()
    }

    #[getter]
    fn ids(&self) -> Vec<String> {
        self.inner.ids.iter().map(Address::to_string).collect()
    }

    #[getter]
    fn forms(&self) -> Vec<String> {
        self.inner.forms.clone()
    }

    #[getter]
    fn lemmas(&self) -> Vec<String> {
        self.inner.lemmas.clone()
    }

    #[getter]
    fn upos(&self) -> Vec<String> {
        self.inner.upos.clone()
    }

    #[getter]
    fn feats(&self) -> BTreeMap<String, BTreeMap<String, usize>> {
        self.inner
            .feats
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[getter]
    fn deprels(&self) -> Vec<String> {
        self.inner.deprels.clone()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "<Nucleus start={} forms='{}'>",
            self.inner.start,
            self.inner.forms.join(" ")
        )
    }
}

#[pyclass(name = "Tree")]
#[derive(Clone)]
pub struct PyTree {
    pub(crate) inner: Arc<SentenceTree>,
}

#[pymethods]
impl PyTree {
    /// Syntactic words, in surface order.
    fn words(&self) -> Vec<PyWord> {
        self.inner
            .syntactic_words()
            .map(|row| PyWord {
                id: row.id,
                tree: Arc::clone(&self.inner),
            })
            .collect()
    }

    /// Look up a node by its address, e.g. "3", "3-4" or "3,1".
    fn word(&self, id: &str) -> PyResult<PyWord> {
        let address = AddressParser::default()
            .parse(id)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        if !self.inner.contains(address) {
            return Err(PyIndexError::new_err(format!("no node at {}", id)));
        }
        Ok(PyWord {
            id: address,
            tree: Arc::clone(&self.inner),
        })
    }

    fn __getitem__(&self, id: &str) -> PyResult<PyWord> {
        self.word(id)
    }

    fn __len__(&self) -> usize {
        self.inner.token_count()
    }

    /// Extract the nucleus grown from `start`.
    ///
    /// Args:
    ///     start: address of the start node
    ///     funcrel: admitted base relations (default: functional relations)
    ///     funcpos: admitted coarse tags (default: functional tags)
    ///     multi: relations admitted regardless of tag
    ///
    /// Returns:
    ///     Nucleus, or None if the tree has no such node
    #[pyo3(signature = (start, funcrel=None, funcpos=None, multi=None))]
    fn nucleus(
        &self,
        start: &str,
        funcrel: Option<Vec<String>>,
        funcpos: Option<Vec<String>>,
        multi: Option<Vec<String>>,
    ) -> PyResult<Option<PyNucleus>> {
        let start = AddressParser::default()
            .parse(start)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let predicate = predicate_from(funcrel, funcpos, multi);
        Ok(extract_nucleus(&self.inner, start, &predicate).map(|inner| PyNucleus { inner }))
    }

    fn __repr__(&self) -> String {
        let n = self.inner.token_count();
        if n == 0 {
            return "<Tree (empty)>".to_string();
        }

        let words: Vec<&str> = self
            .inner
            .syntactic_words()
            .take(3)
            .map(|row| row.form.as_str())
            .collect();

        if n > 3 {
            format!("<Tree len={} words='{} ...'>", n, words.join(" "))
        } else {
            format!("<Tree len={} words='{}'>", n, words.join(" "))
        }
    }
}

type PyReader = CoNLLUReader<std::io::BufReader<Box<dyn std::io::Read + Send>>>;

/// Iterator over (metadata, tree) pairs from a CoNLL-U file.
#[pyclass(name = "SentenceIterator", unsendable)]
struct PySentenceIterator {
    inner: PyReader,
}

#[pymethods]
impl PySentenceIterator {
    fn __iter__(slf: PyRef<Self>) -> PyRef<Self> {
        slf
    }

    fn __next__(&mut self) -> PyResult<Option<(HashMap<String, String>, PyTree)>> {
        match self.inner.next() {
            Some(Ok(sentence)) => Ok(Some(to_python(sentence))),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }
}

fn to_python((metadata, tree): Sentence) -> (HashMap<String, String>, PyTree) {
    let metadata = metadata
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    (
        metadata,
        PyTree {
            inner: Arc::new(tree),
        },
    )
}

/// Read sentences from a CoNLL-U file.
///
/// Gzip-compressed files (.gz) are decompressed on the fly.
///
/// Args:
///     path: Path to the CoNLL-U file
///     comment: prefix of comment lines
///     sent_id: comment key that opens a new sentence
///     decimal_separator: separator of sub-indexed addresses
///     syntax: skip sentences without dependency edges
///     plus: read the columns from a `# global.columns =` header
///
/// Returns:
///     Iterator over (metadata, Tree) tuples
#[pyfunction]
#[pyo3(signature = (
    path,
    comment = "#",
    sent_id = "sent_id",
    decimal_separator = ',',
    syntax = true,
    plus = false
))]
fn read_conllu(
    path: &str,
    comment: &str,
    sent_id: &str,
    decimal_separator: char,
    syntax: bool,
    plus: bool,
) -> PyResult<PySentenceIterator> {
    let options = ReaderOptions::default()
        .comment(comment)
        .sent_id_key(sent_id)
        .decimal_separator(decimal_separator)
        .syntax(syntax)
        .plus(plus);
    options.validate().map_err(config_error)?;
    let inner = CoNLLUReader::from_file(path, options)?;
    Ok(PySentenceIterator { inner })
}

/// Decode a feature column into a dict of value lists.
#[pyfunction(name = "read_features")]
fn py_read_features(s: &str) -> HashMap<String, Vec<String>> {
    features_to_dict(&features::read_features(s))
}

/// Encode a dict of value lists into a feature column.
#[pyfunction(name = "write_features")]
fn py_write_features(feats: HashMap<String, Vec<String>>) -> String {
    features::write_features(&dict_to_features(feats))
}

/// Count attribute values over several feature dicts.
#[pyfunction(name = "fuse_features")]
fn py_fuse_features(
    feats: Vec<HashMap<String, Vec<String>>>,
) -> BTreeMap<String, BTreeMap<String, usize>> {
    let features: Vec<Features> = feats.into_iter().map(dict_to_features).collect();
    fusion::fuse_features(&features)
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn udnucleus(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTree>()?;
    m.add_class::<PyWord>()?;
    m.add_class::<PyNucleus>()?;
    m.add_class::<PySentenceIterator>()?;

    m.add_function(wrap_pyfunction!(read_conllu, m)?)?;
    m.add_function(wrap_pyfunction!(py_read_features, m)?)?;
    m.add_function(wrap_pyfunction!(py_write_features, m)?)?;
    m.add_function(wrap_pyfunction!(py_fuse_features, m)?)?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_predicate_defaults() {
        assert_eq!(predicate_from(None, None, None), NucleusPredicate::default());

        let predicate = predicate_from(Some(strings(&["case"])), None, Some(Vec::new()));
        assert_eq!(predicate.funcrel().len(), 1);
        assert_eq!(predicate.funcpos(), NucleusPredicate::default().funcpos());
        assert!(predicate.multi().is_empty());
    }

    #[test]
    fn test_feature_dicts() {
        let mut dict = HashMap::new();
        dict.insert("Case".to_string(), strings(&["Nom"]));
        dict.insert("PronType".to_string(), strings(&["Rel", "Int"]));

        let features = dict_to_features(dict.clone());
        assert_eq!(features::write_features(&features), "Case=Nom|PronType=Int,Rel");
        assert_eq!(features_to_dict(&features), dict);
    }

    #[test]
    fn test_fuse_feature_dicts() {
        let mut a = HashMap::new();
        a.insert("Case".to_string(), strings(&["Abl"]));
        let b = a.clone();

        let fused = py_fuse_features(vec![a, b]);
        assert_eq!(fused["Case"]["Abl"], 2);
    }
}
