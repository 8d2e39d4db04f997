//! Nucleus extraction
//!
//! Grows a bounded subtree from a start node. Starting from the start node,
//! each round looks at the direct dependents of the nodes admitted in the
//! previous round and admits those passing a [`NucleusPredicate`]. A rejected
//! dependent is a dead end: nothing below it is ever visited. The admitted
//! nodes are then projected, in surface order, into a [`Nucleus`].

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use crate::address::Address;
use crate::fusion::{FusedFeatures, fuse_features};
use crate::row::{Row, base_relation};
use crate::tree::SentenceTree;

/// Relations admitted by default (base labels).
pub const FUNCTIONAL_RELATIONS: [&str; 12] = [
    "expl",
    "advmod",
    "discourse",
    "aux",
    "cop",
    "mark",
    "nummod",
    "det",
    "clf",
    "case",
    "cc",
    "punct",
];

/// Coarse tags admitted by default.
pub const FUNCTIONAL_TAGS: [&str; 11] = [
    "ADV", "ADP", "AUX", "CCONJ", "DET", "INTJ", "NUM", "PART", "PRON", "SCONJ", "PUNCT",
];

/// Relations always admitted by default (base labels).
pub const MULTIWORD_RELATIONS: [&str; 3] = ["flat", "fixed", "goeswith"];

/// Inclusion rule for dependents
///
/// A dependent is admitted if its base relation is in `funcrel` and its
/// coarse tag is in `funcpos`, or if its base relation is in `multi`. An
/// empty `funcrel` or `funcpos` matches everything; an empty `multi` matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NucleusPredicate {
    funcrel: FxHashSet<String>,
    funcpos: FxHashSet<String>,
    multi: FxHashSet<String>,
}

impl Default for NucleusPredicate {
    fn default() -> Self {
        Self::new(FUNCTIONAL_RELATIONS, FUNCTIONAL_TAGS, MULTIWORD_RELATIONS)
    }
}

fn to_set<I, S>(items: I) -> FxHashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl NucleusPredicate {
    pub fn new<R, P, M, S1, S2, S3>(funcrel: R, funcpos: P, multi: M) -> Self
    where
        R: IntoIterator<Item = S1>,
        P: IntoIterator<Item = S2>,
        M: IntoIterator<Item = S3>,
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            funcrel: to_set(funcrel),
            funcpos: to_set(funcpos),
            multi: to_set(multi),
        }
    }

    /// Predicate admitting every dependent.
    pub fn any() -> Self {
        Self::new(Vec::<String>::new(), Vec::<String>::new(), Vec::<String>::new())
    }

    pub fn funcrel(&self) -> &FxHashSet<String> {
        &self.funcrel
    }

    pub fn funcpos(&self) -> &FxHashSet<String> {
        &self.funcpos
    }

    pub fn multi(&self) -> &FxHashSet<String> {
        &self.multi
    }

    /// Whether `row` passes the inclusion rule.
    pub fn admits(&self, row: &Row) -> bool {
        let base = base_relation(&row.deprel);
        let rel_ok = self.funcrel.is_empty() || self.funcrel.contains(base);
        let pos_ok = self.funcpos.is_empty() || self.funcpos.contains(row.upos.as_str());
        (rel_ok && pos_ok) || self.multi.contains(base)
    }
}

/// Flat projection of an extracted subtree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nucleus {
    /// Start node of the extraction.
    pub start: Address,
    /// Admitted addresses, in surface order.
    pub ids: Vec<Address>,
    pub forms: Vec<String>,
    pub lemmas: Vec<String>,
    pub upos: Vec<String>,
    /// Value counts over every admitted node.
    pub feats: FusedFeatures,
    /// Full relation labels of the admitted nodes other than the start node,
    /// in surface order.
    pub deprels: Vec<String>,
}

impl Nucleus {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: Address) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Distinct base relations of the non-start nodes.
    pub fn base_deprels(&self) -> BTreeSet<&str> {
        self.deprels.iter().map(|d| base_relation(d)).collect()
    }

    /// Whether both nuclei admitted the same addresses.
    pub fn same_nodes(&self, other: &Nucleus) -> bool {
        self.ids == other.ids
    }

    /// Admitted addresses missing from `other`.
    pub fn difference<'a>(&'a self, other: &'a Nucleus) -> impl Iterator<Item = Address> + 'a {
        self.ids.iter().copied().filter(|id| !other.contains(*id))
    }
}

/// Collect the addresses admitted from `start`, unordered.
///
/// Returns `None` if `start` is not a node of `tree`.
pub fn admitted_nodes(
    tree: &SentenceTree,
    start: Address,
    predicate: &NucleusPredicate,
) -> Option<FxHashSet<Address>> {
    if !tree.contains(start) {
        return None;
    }

    let mut admitted = FxHashSet::default();
    admitted.insert(start);
    let mut frontier = vec![start];

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for node in frontier {
            for child in tree.children(node) {
                if admitted.contains(&child) {
                    continue;
                }
                let passes = tree.row(child).is_some_and(|row| predicate.admits(row));
                if passes {
                    admitted.insert(child);
                    next.push(child);
                }
            }
        }
        frontier = next;
    }

    Some(admitted)
}

/// Extract the nucleus grown from `start`.
///
/// Returns `None` if `start` has no row in `tree`.
pub fn extract_nucleus(
    tree: &SentenceTree,
    start: Address,
    predicate: &NucleusPredicate,
) -> Option<Nucleus> {
    tree.row(start)?;
    let mut ids: Vec<Address> = admitted_nodes(tree, start, predicate)?
        .into_iter()
        .collect();
    ids.sort_unstable();

    let rows: Vec<&Row> = ids.iter().filter_map(|&id| tree.row(id)).collect();

    Some(Nucleus {
        start,
        forms: rows.iter().map(|r| r.form.clone()).collect(),
        lemmas: rows.iter().map(|r| r.lemma.clone()).collect(),
        upos: rows.iter().map(|r| r.upos.clone()).collect(),
        feats: fuse_features(rows.iter().map(|r| &r.feats)),
        deprels: rows
            .iter()
            .filter(|r| r.id != start)
            .map(|r| r.deprel.clone())
            .collect(),
        ids,
    })
}

/// Whether the clause headed by `start` coincides with its nucleus.
///
/// Compares a narrow extraction (the nucleus proper) with a wide one (the
/// material the clause may contain). The clause qualifies only when both
/// admit exactly the same nodes.
pub fn coincides(
    tree: &SentenceTree,
    start: Address,
    narrow: &NucleusPredicate,
    wide: &NucleusPredicate,
) -> bool {
    match (
        admitted_nodes(tree, start, narrow),
        admitted_nodes(tree, start, wide),
    ) {
        (Some(narrow), Some(wide)) => narrow == wide,
        _ => false,
    }
}

/// Fused features of the syntactic words of `tree`.
pub fn sentence_features(tree: &SentenceTree) -> FusedFeatures {
    fuse_features(tree.syntactic_words().map(|row| &row.feats))
}
