//! Coarse part-of-speech classes
//!
//! Classifies the UD coarse tags (plus the `REL` extension tag) along a few
//! independent dimensions. Tag sets derived from these classes are the usual
//! inputs of a [`NucleusPredicate`](crate::nucleus::NucleusPredicate).

use std::collections::BTreeSet;

bitflags::bitflags! {
    /// Dimensions a coarse tag can belong to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PosClass: u16 {
        /// Autosemantic.
        const AUTO = 1 << 0;
        /// Synsemantic.
        const SYN  = 1 << 1;
        /// Heads one of the three main phrase types.
        const MAIN = 1 << 2;
        /// Modifier.
        const MOD  = 1 << 3;
        /// Clitic.
        const CLIT = 1 << 4;
        /// Metapredicating.
        const META = 1 << 5;
        /// Predicating.
        const PRED = 1 << 6;
        /// Referent.
        const REF  = 1 << 7;
        /// Not a lexical element.
        const ALEX = 1 << 8;
    }
}

/// Every classified tag with its classes.
pub const UPOS_CLASSES: [(&str, PosClass); 18] = [
    ("ADJ", PosClass::AUTO.union(PosClass::MAIN).union(PosClass::MOD)),
    ("ADP", PosClass::SYN.union(PosClass::CLIT)),
    (
        "ADV",
        PosClass::SYN
            .union(PosClass::AUTO)
            .union(PosClass::MAIN)
            .union(PosClass::META)
            .union(PosClass::MOD),
    ),
    ("AUX", PosClass::SYN.union(PosClass::MAIN).union(PosClass::PRED)),
    ("CCONJ", PosClass::SYN.union(PosClass::CLIT)),
    ("DET", PosClass::SYN.union(PosClass::MAIN).union(PosClass::MOD)),
    ("INTJ", PosClass::META),
    ("NOUN", PosClass::AUTO.union(PosClass::MAIN).union(PosClass::REF)),
    ("NUM", PosClass::SYN.union(PosClass::MAIN).union(PosClass::MOD)),
    ("PART", PosClass::SYN.union(PosClass::CLIT).union(PosClass::META)),
    ("PRON", PosClass::SYN.union(PosClass::MAIN).union(PosClass::REF)),
    ("PROPN", PosClass::AUTO.union(PosClass::MAIN).union(PosClass::REF)),
    ("PUNCT", PosClass::ALEX),
    ("SCONJ", PosClass::SYN.union(PosClass::CLIT)),
    ("SYM", PosClass::ALEX),
    ("VERB", PosClass::AUTO.union(PosClass::MAIN).union(PosClass::PRED)),
    ("X", PosClass::empty()),
    ("REL", PosClass::AUTO.union(PosClass::META)),
];

/// Classes of `tag`; `None` for an unknown tag.
pub fn classes(tag: &str) -> Option<PosClass> {
    UPOS_CLASSES
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|(_, class)| *class)
}

/// Tags carrying every class in `class`.
pub fn tags_with(class: PosClass) -> BTreeSet<&'static str> {
    UPOS_CLASSES
        .iter()
        .filter(|(_, c)| c.contains(class))
        .map(|(t, _)| *t)
        .collect()
}

/// Synsemantic tags.
pub fn functional_tags() -> BTreeSet<&'static str> {
    tags_with(PosClass::SYN)
}

/// Tags that are not lexical elements.
pub fn non_lexical_tags() -> BTreeSet<&'static str> {
    tags_with(PosClass::ALEX)
}

/// Every classified tag except the non-lexical ones.
pub fn lexical_tags() -> BTreeSet<&'static str> {
    UPOS_CLASSES
        .iter()
        .filter(|(_, c)| !c.contains(PosClass::ALEX))
        .map(|(t, _)| *t)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        assert_eq!(
            classes("NOUN"),
            Some(PosClass::AUTO | PosClass::MAIN | PosClass::REF)
        );
        let adv = classes("ADV").unwrap();
        assert!(adv.contains(PosClass::SYN | PosClass::AUTO));
        assert_eq!(classes("X"), Some(PosClass::empty()));
        assert_eq!(classes("FOO"), None);
    }

    #[test]
    fn test_functional_tags() {
        let tags: Vec<_> = functional_tags().into_iter().collect();
        assert_eq!(
            tags,
            vec!["ADP", "ADV", "AUX", "CCONJ", "DET", "NUM", "PART", "PRON", "SCONJ"]
        );
    }

    #[test]
    fn test_lexical_split() {
        let alex = non_lexical_tags();
        assert_eq!(alex.into_iter().collect::<Vec<_>>(), vec!["PUNCT", "SYM"]);

        let lex = lexical_tags();
        assert_eq!(lex.len(), 16);
        assert!(lex.contains("X"));
        assert!(!lex.contains("PUNCT"));
    }

    #[test]
    fn test_tags_with_combined_classes() {
        let predicating: Vec<_> = tags_with(PosClass::MAIN | PosClass::PRED)
            .into_iter()
            .collect();
        assert_eq!(predicating, vec!["AUX", "VERB"]);
    }
}
