//! Feature codec
//!
//! Converts between feats-like strings (`Case=Nom|Number=Sing|PronType=Int,Rel`)
//! and [`Features`], a mapping from attribute names to their values.
//!
//! Decoding is best-effort: entries without a value separator are skipped.
//! Encoding sorts attribute names case-insensitively and values lexically,
//! dropping duplicate values.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use log::debug;

/// Null marker for an empty feature column.
pub const NULL_MARKER: &str = "_";

/// Multi-valued attribute mapping of a single node
///
/// An attribute present in the mapping always carries at least one value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Features {
    map: BTreeMap<String, Vec<String>>,
}

impl Features {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `values` to `key`.
    ///
    /// Nothing is inserted when `values` is empty.
    pub fn insert<K, I, V>(&mut self, key: K, values: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return;
        }
        self.map.entry(key.into()).or_default().extend(values);
    }

    /// Get the values of `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.map.get(key).map(Vec::as_slice)
    }

    /// First value of `key`.
    pub fn get_val(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Whether `key` carries `value`.
    pub fn has(&self, key: &str, value: &str) -> bool {
        self.get(key)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
        self.map.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Copy with every value list sorted and deduplicated.
    pub fn normalized(&self) -> Self {
        let map = self
            .map
            .iter()
            .map(|(k, values)| {
                let set: BTreeSet<&String> = values.iter().collect();
                (k.clone(), set.into_iter().cloned().collect())
            })
            .collect();
        Self { map }
    }

    /// Equality up to value order and repetition.
    pub fn same_values(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl<K, V> FromIterator<(K, V)> for Features
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut features = Features::new();
        for (k, v) in iter {
            features.insert(k, [v]);
        }
        features
    }
}

/// Separators of the feats-like encoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeatureCodec {
    /// Marker for a column without features.
    pub null: String,
    /// Between attribute entries.
    pub feature_separator: char,
    /// Between an attribute name and its values.
    pub value_separator: char,
    /// Between the values of one attribute.
    pub multi_separator: char,
}

impl Default for FeatureCodec {
    fn default() -> Self {
        Self {
            null: NULL_MARKER.to_string(),
            feature_separator: '|',
            value_separator: '=',
            multi_separator: ',',
        }
    }
}

impl FeatureCodec {
    /// Decode a feats-like string.
    ///
    /// The null marker decodes to empty `Features`. Entries without a value
    /// separator are skipped. Repeated attribute names accumulate their values.
    pub fn decode(&self, s: &str) -> Features {
        let mut features = Features::new();
        if s == self.null {
            return features;
        }

        for entry in s.split(self.feature_separator) {
            if entry == self.null {
                continue;
            }
            match entry.split_once(self.value_separator) {
                Some((key, values)) => {
                    features.insert(key, values.split(self.multi_separator));
                }
                None => {
                    if !entry.is_empty() {
                        debug!("skipping feature entry without value: {:?}", entry);
                    }
                }
            }
        }

        features
    }

    /// Encode `Features`; the inverse of [`decode`](Self::decode).
    pub fn encode(&self, features: &Features) -> String {
        self.encode_entries(
            features
                .iter()
                .map(|(key, values)| (key, values.iter().map(String::as_str))),
        )
    }

    /// Encode any attribute/values listing.
    ///
    /// Attributes without values are left out; when none is left the null
    /// marker is returned.
    pub fn encode_entries<'a, I, V>(&self, entries: I) -> String
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: IntoIterator<Item = &'a str>,
    {
        let mut entries: Vec<(&str, BTreeSet<&str>)> = entries
            .into_iter()
            .map(|(key, values)| (key, values.into_iter().collect::<BTreeSet<_>>()))
            .filter(|(_, values)| !values.is_empty())
            .collect();

        if entries.is_empty() {
            return self.null.clone();
        }

        entries.sort_by_cached_key(|(key, _)| key.to_lowercase());

        let mut out = String::new();
        for (i, (key, values)) in entries.into_iter().enumerate() {
            if i > 0 {
                out.push(self.feature_separator);
            }
            out.push_str(key);
            out.push(self.value_separator);
            for (j, value) in values.into_iter().enumerate() {
                if j > 0 {
                    out.push(self.multi_separator);
                }
                out.push_str(value);
            }
        }
        out
    }
}

/// Decode with the default UD separators.
pub fn read_features(s: &str) -> Features {
    FeatureCodec::default().decode(s)
}

/// Encode with the default UD separators.
pub fn write_features(features: &Features) -> String {
    FeatureCodec::default().encode(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single() {
        let feats = read_features("Tense=Pres");
        assert_eq!(feats.get("Tense"), Some(&["Pres".to_string()][..]));
        assert_eq!(feats.len(), 1);
    }

    #[test]
    fn test_decode_multi_valued() {
        let feats = read_features("Case=Nom|Number=Sing|PronType=Int,Rel");
        assert_eq!(feats.get_val("Case"), Some("Nom"));
        assert_eq!(feats.get_val("Number"), Some("Sing"));
        assert_eq!(
            feats.get("PronType"),
            Some(&["Int".to_string(), "Rel".to_string()][..])
        );
        assert!(feats.has("PronType", "Rel"));
        assert!(!feats.has("PronType", "Dem"));
    }

    #[test]
    fn test_null_marker() {
        assert!(read_features("_").is_empty());
        assert_eq!(write_features(&Features::new()), "_");
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let feats = read_features("Case=Nom|broken|_|Number=Plur|");
        assert_eq!(feats.len(), 2);
        assert_eq!(feats.get_val("Case"), Some("Nom"));
        assert_eq!(feats.get_val("Number"), Some("Plur"));
        assert!(read_features("").is_empty());
    }

    #[test]
    fn test_repeated_attribute_keeps_values() {
        let feats = read_features("Polarity=Neg|Polarity=Neg");
        assert_eq!(
            feats.get("Polarity"),
            Some(&["Neg".to_string(), "Neg".to_string()][..])
        );
        assert_eq!(write_features(&feats), "Polarity=Neg");
    }

    #[test]
    fn test_value_keeps_separator_after_first() {
        let feats = read_features("Gloss=a=b");
        assert_eq!(feats.get_val("Gloss"), Some("a=b"));
    }

    #[test]
    fn test_encode_sorting() {
        let mut feats = Features::new();
        feats.insert("number", ["Sing"]);
        feats.insert("Case", ["Nom"]);
        feats.insert("PronType", ["Rel", "Int", "Rel"]);
        assert_eq!(
            write_features(&feats),
            "Case=Nom|number=Sing|PronType=Int,Rel"
        );
    }

    #[test]
    fn test_encode_entries_bare_and_empty() {
        let codec = FeatureCodec::default();
        let encoded = codec.encode_entries(vec![
            ("Tense", vec!["Pres"]),
            ("Mood", vec![]),
        ]);
        assert_eq!(encoded, "Tense=Pres");

        let empty = codec.encode_entries(vec![("Mood", Vec::<&str>::new())]);
        assert_eq!(empty, "_");
    }

    #[test]
    fn test_encode_decode_reorders() {
        let raw = "VerbForm=Fin|Mood=Ind|Aspect=Perf,Imp";
        let encoded = write_features(&read_features(raw));
        assert_eq!(encoded, "Aspect=Imp,Perf|Mood=Ind|VerbForm=Fin");
        assert!(read_features(&encoded).same_values(&read_features(raw)));
    }

    #[test]
    fn test_decode_encode_equivalence() {
        let mut feats = Features::new();
        feats.insert("Degree", ["Pos"]);
        feats.insert("Polarity", ["Pos", "Neg"]);
        let decoded = read_features(&write_features(&feats));
        assert_ne!(decoded, feats);
        assert!(decoded.same_values(&feats));
    }

    #[test]
    fn test_decode_encode_equivalence_over_mappings() {
        let mappings: Vec<Vec<(&str, Vec<&str>)>> = vec![
            vec![],
            vec![("Case", vec!["Nom"])],
            vec![("number", vec!["Sing"]), ("Case", vec!["Gen", "Dat"])],
            vec![
                ("VerbForm", vec!["Fin"]),
                ("Mood", vec!["Ind", "Ind"]),
                ("Tense", vec!["Pres"]),
            ],
            vec![("Gloss", vec!["a=b"]), ("Typo", vec!["Yes"])],
        ];

        for entries in mappings {
            let mut feats = Features::new();
            for (key, values) in entries {
                feats.insert(key, values);
            }
            let encoded = write_features(&feats);
            let decoded = read_features(&encoded);
            assert!(decoded.same_values(&feats), "{}", encoded);
            assert_eq!(write_features(&decoded), encoded);
        }
    }

    #[test]
    fn test_custom_separators() {
        let codec = FeatureCodec {
            null: "-".to_string(),
            feature_separator: ';',
            value_separator: ':',
            multi_separator: '+',
        };
        let feats = codec.decode("Case:Nom+Acc;Gender:Neut");
        assert_eq!(feats.get("Case").map(<[String]>::len), Some(2));
        assert_eq!(codec.encode(&feats), "Case:Acc+Nom;Gender:Neut");
        assert!(codec.decode("-").is_empty());
        assert_eq!(codec.encode(&Features::new()), "-");
    }

    #[test]
    fn test_from_iter() {
        let feats: Features = [("Case", "Nom"), ("Case", "Acc")].into_iter().collect();
        assert_eq!(feats.get("Case").map(<[String]>::len), Some(2));
    }
}
