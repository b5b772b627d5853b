use crate::core::ROOT_NODE_KEY;
use serde::{Deserialize, Serialize};
use std::fmt;

const DELIMITER: char = '.';
const ESCAPE: char = '\\';

/// Address of a node inside the model, one segment per level.
///
/// Array elements are addressed by the decimal form of their index, so a
/// path never records whether it walked through an object or an array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelPath {
    segments: Vec<String>,
}

impl ModelPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        self.segments.as_slice()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        Self { segments }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.segments.split_last()?;
        Some(Self::new(head.to_vec()))
    }

    /// Segment-wise prefix test; `["ab"]` does not start with `["a"]`.
    pub fn starts_with(&self, prefix: &ModelPath) -> bool {
        self.segments.starts_with(prefix.segments())
    }

    /// Root, every intermediate ancestor, and the path itself.
    pub fn prefixes(&self) -> impl Iterator<Item = ModelPath> + '_ {
        (0..=self.segments.len()).map(|len| Self::new(self.segments[..len].to_vec()))
    }

    /// Root and every intermediate ancestor, excluding the path itself.
    pub fn strict_ancestors(&self) -> impl Iterator<Item = ModelPath> + '_ {
        (0..self.segments.len()).map(|len| Self::new(self.segments[..len].to_vec()))
    }

    pub fn key(&self) -> String {
        encode(self)
    }

    pub fn from_key(key: &str) -> Self {
        decode(key)
    }
}

impl fmt::Display for ModelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(encode(self).as_str())
    }
}

impl From<Vec<String>> for ModelPath {
    fn from(segments: Vec<String>) -> Self {
        Self::new(segments)
    }
}

impl<const N: usize> From<[&str; N]> for ModelPath {
    fn from(segments: [&str; N]) -> Self {
        segments.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ModelPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Canonical key for `path`.
///
/// Segments are joined with `.`; a literal `.` or `\` inside a segment is
/// preceded by `\`. A key that would read as blank or as the root sentinel
/// gets a leading `\` so that no two paths share a key.
pub fn encode(path: &ModelPath) -> String {
    if path.is_root() {
        return ROOT_NODE_KEY.to_string();
    }

    let mut key = String::new();
    for (idx, segment) in path.segments().iter().enumerate() {
        if idx > 0 {
            key.push(DELIMITER);
        }
        for ch in segment.chars() {
            if ch == DELIMITER || ch == ESCAPE {
                key.push(ESCAPE);
            }
            key.push(ch);
        }
    }

    if key.trim().is_empty() || key == ROOT_NODE_KEY {
        key.insert(0, ESCAPE);
    }
    key
}

/// Inverse of [`encode`]. Never fails: a dangling `\` is dropped and any
/// other input splits on unescaped delimiters.
pub fn decode(key: &str) -> ModelPath {
    if key == ROOT_NODE_KEY || key.trim().is_empty() {
        return ModelPath::root();
    }

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = key.chars();
    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            DELIMITER => segments.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    segments.push(current);
    ModelPath::new(segments)
}

#[cfg(test)]
mod tests {
    use super::{ModelPath, decode, encode};

    fn round_trip(path: ModelPath) {
        let key = encode(&path);
        assert_eq!(decode(&key), path, "key {key:?} did not decode back");
    }

    #[test]
    fn root_uses_sentinel() {
        assert_eq!(encode(&ModelPath::root()), "Root");
        assert_eq!(decode("Root"), ModelPath::root());
        assert_eq!(decode(""), ModelPath::root());
        assert_eq!(decode("   "), ModelPath::root());
    }

    #[test]
    fn plain_paths_join_with_dots() {
        let path = ModelPath::from(["a", "c", "1", "d"]);
        assert_eq!(encode(&path), "a.c.1.d");
        assert_eq!(decode("a.c.1.d"), path);
    }

    #[test]
    fn delimiter_inside_segment_is_escaped() {
        let dotted = ModelPath::from(["a.b"]);
        let nested = ModelPath::from(["a", "b"]);
        assert_eq!(encode(&dotted), "a\\.b");
        assert_ne!(encode(&dotted), encode(&nested));
        round_trip(dotted);
        round_trip(ModelPath::from(["back\\slash", "x"]));
        round_trip(ModelPath::from(["trailing\\"]));
    }

    #[test]
    fn ambiguous_keys_stay_distinct() {
        round_trip(ModelPath::from(["Root"]));
        round_trip(ModelPath::from([""]));
        round_trip(ModelPath::from([" "]));
        round_trip(ModelPath::from(["", ""]));
        round_trip(ModelPath::from(["Root", "a"]));
        assert_ne!(encode(&ModelPath::from(["Root"])), encode(&ModelPath::root()));
        assert_ne!(encode(&ModelPath::from([""])), encode(&ModelPath::root()));
    }

    #[test]
    fn malformed_keys_decode_best_effort() {
        assert_eq!(decode("a\\"), ModelPath::from(["a"]));
        assert_eq!(decode("a..b"), ModelPath::from(["a", "", "b"]));
    }

    #[test]
    fn prefixes_include_root_and_self() {
        let path = ModelPath::from(["a", "b"]);
        let prefixes: Vec<ModelPath> = path.prefixes().collect();
        assert_eq!(
            prefixes,
            vec![
                ModelPath::root(),
                ModelPath::from(["a"]),
                ModelPath::from(["a", "b"]),
            ]
        );
        let ancestors: Vec<ModelPath> = path.strict_ancestors().collect();
        assert_eq!(ancestors, vec![ModelPath::root(), ModelPath::from(["a"])]);
    }

    #[test]
    fn starts_with_compares_whole_segments() {
        let path = ModelPath::from(["abc", "d"]);
        assert!(path.starts_with(&ModelPath::from(["abc"])));
        assert!(path.starts_with(&ModelPath::root()));
        assert!(!path.starts_with(&ModelPath::from(["ab"])));
    }

    #[test]
    fn parent_of_root_is_none() {
        assert_eq!(ModelPath::root().parent(), None);
        assert_eq!(ModelPath::from(["a", "b"]).parent(), Some(ModelPath::from(["a"])));
    }
}
