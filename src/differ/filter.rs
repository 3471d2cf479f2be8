//! Kind-based resource filtering.

use crate::value::Value;
use std::collections::BTreeSet;

/// Returns the document's Kind, read from the top-level `kind` field.
///
/// Returns None when the document is not a mapping, the field is absent, or
/// its value is not a string.
pub fn document_kind(doc: &Value) -> Option<&str> {
    doc.as_mapping()?.get("kind")?.as_str()
}

/// KindFilter selects documents by their Kind discriminator.
///
/// Inclusion is applied first, then exclusion: a kind named in both sets is
/// dropped. Matching is case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct KindFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl KindFilter {
    /// Creates a filter from include and exclude kind names, normalizing
    /// them to lowercase.
    pub fn new<I, S>(include: I, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        KindFilter {
            include: include
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            exclude: exclude
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns true if neither set constrains anything.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Applies the filter, preserving the relative order of survivors.
    pub fn apply(&self, docs: Vec<Value>) -> Vec<Value> {
        if self.is_empty() {
            return docs;
        }

        docs.into_iter().filter(|doc| self.retains(doc)).collect()
    }

    fn retains(&self, doc: &Value) -> bool {
        let kind = match document_kind(doc) {
            Some(k) => k.to_lowercase(),
            // An unidentifiable document cannot match an allowlist, and an
            // exclusion cannot apply to it.
            None => return self.include.is_empty(),
        };

        if !self.include.is_empty() && !self.include.contains(&kind) {
            return false;
        }
        !self.exclude.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::decode_documents;

    fn docs() -> Vec<Value> {
        decode_documents(b"kind: Deployment\n---\nkind: Service\n---\nkind: ConfigMap\n").unwrap()
    }

    fn kinds(docs: &[Value]) -> Vec<&str> {
        docs.iter().filter_map(|d| document_kind(d)).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything_in_order() {
        let filter = KindFilter::new(Vec::<&str>::new(), Vec::new());
        assert!(filter.is_empty());
        let out = filter.apply(docs());
        assert_eq!(kinds(&out), vec!["Deployment", "Service", "ConfigMap"]);
    }

    #[test]
    fn test_include_allowlists() {
        let filter = KindFilter::new(vec!["Service"], vec![]);
        let out = filter.apply(docs());
        assert_eq!(kinds(&out), vec!["Service"]);
    }

    #[test]
    fn test_include_is_case_insensitive() {
        let filter = KindFilter::new(vec!["sErViCe"], vec![]);
        let out = filter.apply(docs());
        assert_eq!(kinds(&out), vec!["Service"]);
    }

    #[test]
    fn test_exclude_drops_and_preserves_order() {
        let filter = KindFilter::new(vec![], vec!["Service"]);
        let out = filter.apply(docs());
        assert_eq!(kinds(&out), vec!["Deployment", "ConfigMap"]);
    }

    #[test]
    fn test_exclusion_wins_over_inclusion() {
        let filter = KindFilter::new(vec!["Service"], vec!["Service"]);
        let out = filter.apply(docs());
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_kind_dropped_under_include() {
        let mut input = docs();
        input.push(crate::value::from_yaml("metadata:\n  name: anonymous\n").unwrap());

        let filter = KindFilter::new(vec!["Deployment"], vec![]);
        let out = filter.apply(input);
        assert_eq!(kinds(&out), vec!["Deployment"]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_unknown_kind_kept_under_exclude_only() {
        let mut input = docs();
        input.push(crate::value::from_yaml("metadata:\n  name: anonymous\n").unwrap());

        let filter = KindFilter::new(vec![], vec!["Deployment"]);
        let out = filter.apply(input);
        // Service, ConfigMap, and the kindless document survive.
        assert_eq!(out.len(), 3);
        assert_eq!(kinds(&out), vec!["Service", "ConfigMap"]);
    }

    #[test]
    fn test_non_string_kind_is_unknown() {
        let input = vec![crate::value::from_yaml("kind: 7\n").unwrap()];
        let include = KindFilter::new(vec!["Deployment"], vec![]);
        assert!(include.apply(input.clone()).is_empty());

        let exclude = KindFilter::new(vec![], vec!["7"]);
        assert_eq!(exclude.apply(input).len(), 1);
    }
}
