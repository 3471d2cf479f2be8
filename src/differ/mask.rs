//! Length-preserving masking of sensitive fields.

use super::filter::document_kind;
use crate::value::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

const MASK_CHAR: char = '*';
const DIGEST_SUFFIX_LEN: usize = 8;

/// MaskRules maps a lowercased Kind to the top-level field names whose
/// values are considered sensitive.
///
/// The table is an explicit immutable value: construct it once (usually via
/// [`MaskRules::default`]) and pass it into the masker.
#[derive(Debug, Clone)]
pub struct MaskRules {
    rules: BTreeMap<String, Vec<String>>,
}

impl Default for MaskRules {
    /// The built-in rules: Secret `data`/`stringData` and ConfigMap
    /// `data`/`binaryData`.
    fn default() -> Self {
        MaskRules::empty()
            .with_rule("secret", ["data", "stringData"])
            .with_rule("configmap", ["data", "binaryData"])
    }
}

impl MaskRules {
    /// Creates a rule table with no entries.
    pub fn empty() -> Self {
        MaskRules {
            rules: BTreeMap::new(),
        }
    }

    /// Adds or replaces the sensitive field names for a Kind.
    pub fn with_rule<I, S>(mut self, kind: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.insert(
            kind.to_lowercase(),
            fields.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Returns the sensitive field names configured for a Kind, if any.
    pub fn fields_for(&self, kind: &str) -> Option<&[String]> {
        self.rules.get(&kind.to_lowercase()).map(Vec::as_slice)
    }
}

/// Masks sensitive fields in place across a document sequence.
///
/// For each document whose Kind has a rule, every direct scalar value of
/// each configured field's mapping is replaced by [`masked_value`] of its
/// textual form. Values nested deeper than one level under the configured
/// field are left untouched. Must run to completion before the sequence is
/// serialized for diffing.
pub fn mask_documents(docs: &mut [Value], rules: &MaskRules) {
    for doc in docs.iter_mut() {
        let fields = match document_kind(doc).and_then(|k| rules.fields_for(k)) {
            Some(f) => f.to_vec(),
            None => continue,
        };

        let mapping = match doc.as_mapping_mut() {
            Some(m) => m,
            None => continue,
        };

        for field in &fields {
            if let Some(Value::Mapping(data)) = mapping.get_mut(field) {
                for (_, v) in data.iter_mut() {
                    if let Some(text) = v.scalar_string() {
                        *v = Value::String(masked_value(&text));
                    }
                }
            }
        }
    }
}

/// Computes a deterministic mask of the same byte length as the input.
///
/// - empty input maps to the empty string;
/// - inputs of up to 8 bytes map to a prefix of the hex SHA-256 digest;
/// - longer inputs map to `*` padding followed by the first 8 digest
///   characters, so nothing of the original value leaks while distinct
///   inputs still diff as distinct.
///
/// Length is measured in bytes, so multi-byte input characters shorten the
/// mask's character count while its byte length stays equal.
pub fn masked_value(original: &str) -> String {
    let length = original.len();
    if length == 0 {
        return String::new();
    }

    let digest = hex::encode(Sha256::digest(original.as_bytes()));

    if length <= DIGEST_SUFFIX_LEN {
        return digest[..length].to_string();
    }

    let mut masked = String::with_capacity(length);
    masked.extend(std::iter::repeat(MASK_CHAR).take(length - DIGEST_SUFFIX_LEN));
    masked.push_str(&digest[..DIGEST_SUFFIX_LEN]);
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{decode_documents, from_yaml};

    #[test]
    fn test_masked_value_empty() {
        assert_eq!(masked_value(""), "");
    }

    #[test]
    fn test_masked_value_preserves_length() {
        let long = "x".repeat(64);
        for input in ["a", "abc", "12345678", "123456789", "abc123==", long.as_str()] {
            assert_eq!(masked_value(input).len(), input.len(), "input {:?}", input);
        }
    }

    #[test]
    fn test_masked_value_measures_bytes_not_chars() {
        // "pässwörd" is 8 characters but 10 bytes; the mask matches bytes.
        let input = "pässwörd";
        let masked = masked_value(input);
        assert_eq!(masked.len(), input.len());
        assert_eq!(&masked[..2], "**");

        // Short multi-byte inputs mask to their byte count of hex digits.
        assert_eq!(masked_value("éé").len(), 4);
    }

    #[test]
    fn test_masked_value_deterministic() {
        assert_eq!(masked_value("hunter2!!"), masked_value("hunter2!!"));
    }

    #[test]
    fn test_masked_value_distinct_inputs_differ() {
        assert_ne!(masked_value("hunter2"), masked_value("hunter3"));
        assert_ne!(masked_value("long-password-a"), masked_value("long-password-b"));
    }

    #[test]
    fn test_masked_value_long_inputs_hide_prefix() {
        let input = "extremely-secret-value";
        let masked = masked_value(input);
        let star_len = input.len() - DIGEST_SUFFIX_LEN;
        assert!(masked[..star_len].chars().all(|c| c == MASK_CHAR));
        assert!(masked[star_len..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_masked_value_short_inputs_are_digest_prefix() {
        let masked = masked_value("abc");
        assert_eq!(masked.len(), 3);
        assert!(masked.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_mask_documents_secret_fields() {
        let mut docs = decode_documents(
            b"kind: Secret\ndata:\n  password: abc123==\nstringData:\n  token: tiny\n",
        )
        .unwrap();
        mask_documents(&mut docs, &MaskRules::default());

        let m = docs[0].as_mapping().unwrap();
        let password = m
            .get("data")
            .and_then(|d| d.as_mapping())
            .and_then(|d| d.get("password"))
            .and_then(|v| v.as_str())
            .unwrap();
        assert_eq!(password.len(), "abc123==".len());
        assert_ne!(password, "abc123==");

        let token = m
            .get("stringData")
            .and_then(|d| d.as_mapping())
            .and_then(|d| d.get("token"))
            .and_then(|v| v.as_str())
            .unwrap();
        assert_eq!(token.len(), 4);
        assert_ne!(token, "tiny");
    }

    #[test]
    fn test_mask_documents_kind_case_insensitive() {
        let mut docs = decode_documents(b"kind: SECRET\ndata:\n  k: supersecretvalue\n").unwrap();
        mask_documents(&mut docs, &MaskRules::default());
        let v = docs[0]
            .as_mapping()
            .unwrap()
            .get("data")
            .and_then(|d| d.as_mapping())
            .and_then(|d| d.get("k"))
            .and_then(|v| v.as_str())
            .unwrap();
        assert!(v.starts_with(MASK_CHAR));
    }

    #[test]
    fn test_mask_documents_leaves_unmatched_kinds_alone() {
        let original = "kind: Deployment\ndata:\n  replicas: untouched\n";
        let mut docs = decode_documents(original.as_bytes()).unwrap();
        let before = docs.clone();
        mask_documents(&mut docs, &MaskRules::default());
        assert_eq!(docs, before);
    }

    #[test]
    fn test_mask_documents_masks_non_string_scalars() {
        let mut docs = decode_documents(b"kind: ConfigMap\ndata:\n  count: 42\n").unwrap();
        mask_documents(&mut docs, &MaskRules::default());
        let v = docs[0]
            .as_mapping()
            .unwrap()
            .get("data")
            .and_then(|d| d.as_mapping())
            .and_then(|d| d.get("count"))
            .unwrap();
        // The int stringifies to "42" and masks at that length.
        assert_eq!(v.as_str().unwrap().len(), 2);
        assert_eq!(v.as_str().unwrap(), &masked_value("42"));
    }

    #[test]
    fn test_mask_documents_skips_nested_containers() {
        let mut docs =
            decode_documents(b"kind: Secret\ndata:\n  nested:\n    inner: visible\n").unwrap();
        mask_documents(&mut docs, &MaskRules::default());
        let nested = docs[0]
            .as_mapping()
            .unwrap()
            .get("data")
            .and_then(|d| d.as_mapping())
            .and_then(|d| d.get("nested"))
            .unwrap();
        assert_eq!(*nested, from_yaml("inner: visible\n").unwrap());
    }

    #[test]
    fn test_custom_rule() {
        let rules = MaskRules::empty().with_rule("MyApp", ["credentials"]);
        let mut docs =
            decode_documents(b"kind: myapp\ncredentials:\n  apiKey: 0123456789abcdef\n").unwrap();
        mask_documents(&mut docs, &rules);
        let v = docs[0]
            .as_mapping()
            .unwrap()
            .get("credentials")
            .and_then(|d| d.as_mapping())
            .and_then(|d| d.get("apiKey"))
            .and_then(|v| v.as_str())
            .unwrap();
        assert_ne!(v, "0123456789abcdef");
        assert_eq!(v.len(), 16);
    }
}
