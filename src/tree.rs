//! Sentence trees
//!
//! A [`SentenceTree`] is a directed graph keyed by [`Address`]. Edges run from
//! a token's head to the token itself, so a fully annotated sentence forms an
//! arborescence below the artificial root `(0, 0)`. Sentences without syntax
//! are trees with isolated nodes and no edges.
//!
//! Rows are stored beside the graph. A head that points to an address without
//! a row of its own still becomes a graph node.

use std::collections::BTreeMap;

use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;

use crate::address::Address;
use crate::row::Row;

/// Key of the sentence identifier comment.
pub const SENT_ID_KEY: &str = "sent_id";

/// Key of the sentence text comment.
pub const TEXT_KEY: &str = "text";

/// Sentence-level comments, in file order
///
/// A key that appears again overwrites the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn sent_id(&self) -> Option<&str> {
        self.get(SENT_ID_KEY)
    }

    pub fn text(&self) -> Option<&str> {
        self.get(TEXT_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A sentence as a graph of addressed rows
#[derive(Debug, Clone)]
pub struct SentenceTree {
    graph: DiGraphMap<Address, ()>,
    rows: BTreeMap<Address, Row>,
}

impl Default for SentenceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceTree {
    /// Create a tree holding only the artificial root.
    pub fn new() -> Self {
        let mut tree = Self {
            graph: DiGraphMap::new(),
            rows: BTreeMap::new(),
        };
        tree.add_row(Row::root());
        tree
    }

    /// Add a node carrying `row`, replacing any row at the same address.
    pub fn add_row(&mut self, row: Row) -> Address {
        let id = row.id;
        self.graph.add_node(id);
        self.rows.insert(id, row);
        id
    }

    /// Attach `dependent` below `head`. Unknown addresses become nodes.
    pub fn add_edge(&mut self, head: Address, dependent: Address) {
        self.graph.add_edge(head, dependent, ());
    }

    /// Row stored at `id`.
    pub fn row(&self, id: Address) -> Option<&Row> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: Address) -> bool {
        self.graph.contains_node(id)
    }

    /// Direct dependents of `id`, in insertion order.
    pub fn children(&self, id: Address) -> impl Iterator<Item = Address> + '_ {
        self.graph.neighbors_directed(id, Direction::Outgoing)
    }

    /// Governor of `id`, if attached.
    pub fn parent(&self, id: Address) -> Option<Address> {
        self.graph.neighbors_directed(id, Direction::Incoming).next()
    }

    /// Every graph node, in surface order.
    pub fn nodes(&self) -> Vec<Address> {
        let mut nodes: Vec<Address> = self.graph.nodes().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Every row, root included, in surface order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    /// Rows of syntactic words (no root, ranges or sub-indexed nodes), in surface order.
    pub fn syntactic_words(&self) -> impl Iterator<Item = &Row> {
        self.rows.values().filter(|row| row.id.is_word())
    }

    /// Rows of multiword tokens, in surface order.
    pub fn multiword_tokens(&self) -> impl Iterator<Item = &Row> {
        self.rows.values().filter(|row| row.id.is_multiword())
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of rows read from the file (the root excluded).
    pub fn token_count(&self) -> usize {
        self.rows.keys().filter(|id| !id.is_root()).count()
    }

    pub fn has_edges(&self) -> bool {
        self.graph.edge_count() > 0
    }

    /// Whether any node besides the root exists.
    pub fn has_tokens(&self) -> bool {
        self.graph.nodes().any(|id| !id.is_root())
    }

    /// The underlying graph.
    pub fn graph(&self) -> &DiGraphMap<Address, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Head;

    fn word(position: i64, form: &str, upos: &str, head: i64, deprel: &str) -> Row {
        let mut row = Row::empty(Address::word(position));
        row.form = form.to_string();
        row.lemma = form.to_string();
        row.upos = upos.to_string();
        row.head = Head::Node(Address::word(head));
        row.deprel = deprel.to_string();
        row
    }

    #[test]
    fn test_tree_creation() {
        let mut tree = SentenceTree::new();
        assert_eq!(tree.node_count(), 1);
        assert!(!tree.has_tokens());
        assert!(!tree.has_edges());

        let runs = tree.add_row(word(2, "runs", "VERB", 0, "root"));
        let dog = tree.add_row(word(1, "dog", "NOUN", 2, "nsubj"));
        tree.add_edge(Address::ROOT, runs);
        tree.add_edge(runs, dog);

        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.edge_count(), 2);
        assert_eq!(tree.token_count(), 2);
        assert_eq!(tree.parent(dog), Some(runs));
        assert_eq!(tree.parent(Address::ROOT), None);
        assert_eq!(tree.children(runs).collect::<Vec<_>>(), vec![dog]);
        assert_eq!(tree.row(dog).unwrap().form, "dog");
    }

    #[test]
    fn test_nodes_sorted() {
        let mut tree = SentenceTree::new();
        tree.add_row(word(4, "d", "X", 0, "root"));
        tree.add_row(Row::empty(Address::new(3, -1)));
        tree.add_row(word(3, "c", "X", 4, "dep"));
        tree.add_row(word(1, "a", "X", 4, "dep"));

        assert_eq!(
            tree.nodes(),
            vec![
                Address::ROOT,
                Address::word(1),
                Address::new(3, -1),
                Address::word(3),
                Address::word(4)
            ]
        );
        let words: Vec<_> = tree.syntactic_words().map(|r| r.form.as_str()).collect();
        assert_eq!(words, vec!["a", "c", "d"]);
        assert_eq!(tree.multiword_tokens().count(), 1);
    }

    #[test]
    fn test_dangling_head_becomes_node() {
        let mut tree = SentenceTree::new();
        let a = tree.add_row(word(1, "a", "X", 7, "dep"));
        tree.add_edge(Address::word(7), a);

        assert!(tree.contains(Address::word(7)));
        assert!(tree.row(Address::word(7)).is_none());
        assert_eq!(tree.token_count(), 1);
    }

    #[test]
    fn test_metadata() {
        let mut meta = Metadata::new();
        meta.insert("sent_id", "1");
        meta.insert("text", "canis currit");
        meta.insert("sent_id", "2");

        assert_eq!(meta.len(), 2);
        assert_eq!(meta.sent_id(), Some("2"));
        assert_eq!(meta.text(), Some("canis currit"));
        assert_eq!(
            meta.iter().collect::<Vec<_>>(),
            vec![("sent_id", "2"), ("text", "canis currit")]
        );
    }
}
