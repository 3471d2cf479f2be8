//! Multi-document YAML stream decoding and canonical re-encoding.

use super::value::Value;
use serde::Deserialize;

/// Decodes a byte stream of `---`-separated YAML documents, in order.
///
/// Documents that decode to null (empty documents, comment-only documents)
/// are silently dropped. Any syntax error aborts the whole stream.
pub fn decode_documents(data: &[u8]) -> Result<Vec<Value>, serde_yaml::Error> {
    let mut docs = Vec::new();
    for de in serde_yaml::Deserializer::from_slice(data) {
        let doc = Value::deserialize(de)?;
        if doc.is_null() {
            continue;
        }
        docs.push(doc);
    }
    Ok(docs)
}

/// Encodes a document sequence back into a single canonical YAML blob.
///
/// Documents are emitted in input order with a `---` boundary between them
/// and serde_yaml's stable two-space indentation, so re-encoding alone never
/// introduces diff noise.
pub fn encode_documents(docs: &[Value]) -> Result<String, serde_yaml::Error> {
    let mut out = String::new();
    for (i, doc) in docs.iter().enumerate() {
        if i > 0 {
            out.push_str("---\n");
        }
        out.push_str(&serde_yaml::to_string(doc)?);
    }
    Ok(out)
}
