//! Feature fusion
//!
//! Merges the feature mappings of several nodes into one multiset-aware
//! mapping: every value is counted each time it is seen, whichever node
//! contributed it. `Polarity=Neg` asserted on two nodes therefore differs from
//! `Polarity=Neg` asserted once.

use std::collections::BTreeMap;

use crate::features::{FeatureCodec, Features};

/// Per-attribute value counts over a group of nodes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FusedFeatures {
    map: BTreeMap<String, BTreeMap<String, usize>>,
}

impl FusedFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every value of `features`.
    pub fn add(&mut self, features: &Features) {
        for (key, values) in features.iter() {
            let counts = self.map.entry(key.to_string()).or_default();
            for value in values {
                *counts.entry(value.clone()).or_default() += 1;
            }
        }
    }

    /// Value counts of `key`.
    pub fn get(&self, key: &str) -> Option<&BTreeMap<String, usize>> {
        self.map.get(key)
    }

    /// How often `value` was seen for `key`.
    pub fn count(&self, key: &str, value: &str) -> usize {
        self.map
            .get(key)
            .and_then(|counts| counts.get(value))
            .copied()
            .unwrap_or(0)
    }

    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.count(key, value) > 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Distinct values of `key`, sorted.
    pub fn values<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.map
            .get(key)
            .into_iter()
            .flat_map(|counts| counts.keys().map(String::as_str))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, usize>)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Collapse the counts into plain `Features`, one entry per distinct value.
    pub fn to_features(&self) -> Features {
        let mut features = Features::new();
        for (key, counts) in &self.map {
            features.insert(key.as_str(), counts.keys().map(String::as_str));
        }
        features
    }

    /// Encode the distinct values, multiplicity dropped.
    pub fn encode(&self, codec: &FeatureCodec) -> String {
        codec.encode_entries(
            self.map
                .iter()
                .map(|(key, counts)| (key.as_str(), counts.keys().map(String::as_str))),
        )
    }
}

impl<'a> FromIterator<&'a Features> for FusedFeatures {
    fn from_iter<T: IntoIterator<Item = &'a Features>>(iter: T) -> Self {
        let mut fused = FusedFeatures::new();
        for features in iter {
            fused.add(features);
        }
        fused
    }
}

/// Fuse the mappings of a group of nodes.
pub fn fuse_features<'a, I>(features: I) -> FusedFeatures
where
    I: IntoIterator<Item = &'a Features>,
{
    features.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::read_features;

    #[test]
    fn test_fusion_counts_across_nodes() {
        let a = read_features("Polarity=Neg|Mood=Ind");
        let b = read_features("Polarity=Neg");
        let c = read_features("VerbForm=Fin|Mood=Sub");

        let fused = fuse_features([&a, &b, &c]);

        assert_eq!(fused.count("Polarity", "Neg"), 2);
        assert_eq!(fused.count("Mood", "Ind"), 1);
        assert_eq!(fused.count("Mood", "Sub"), 1);
        assert_eq!(fused.count("VerbForm", "Fin"), 1);
        assert_eq!(fused.count("Case", "Nom"), 0);
        assert_eq!(fused.len(), 3);
    }

    #[test]
    fn test_fusion_counts_within_node() {
        let a = read_features("PronType=Int,Rel");
        let b = read_features("PronType=Rel");

        let fused = fuse_features([&a, &b]);

        assert_eq!(fused.count("PronType", "Rel"), 2);
        assert_eq!(fused.count("PronType", "Int"), 1);
        let values: Vec<_> = fused.values("PronType").collect();
        assert_eq!(values, vec!["Int", "Rel"]);
    }

    #[test]
    fn test_fusion_of_nothing() {
        let fused = fuse_features(std::iter::empty());
        assert!(fused.is_empty());
        assert_eq!(fused.encode(&FeatureCodec::default()), "_");
    }

    #[test]
    fn test_fusion_encode_and_collapse() {
        let a = read_features("Number=Sing|Case=Nom");
        let b = read_features("Number=Plur|Case=Nom");

        let fused = fuse_features([&a, &b]);

        assert_eq!(
            fused.encode(&FeatureCodec::default()),
            "Case=Nom|Number=Plur,Sing"
        );
        let collapsed = fused.to_features();
        assert_eq!(collapsed.get("Case").map(<[String]>::len), Some(1));
        assert_eq!(collapsed.get("Number").map(<[String]>::len), Some(2));
    }
}
