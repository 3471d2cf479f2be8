//! Resource identity extraction.

use crate::value::Value;
use std::fmt;
use thiserror::Error;

/// IdentityError indicates a document that cannot name a cluster resource.
#[derive(Debug, Clone, Error)]
#[error("document is missing {field}")]
pub struct IdentityError {
    pub field: &'static str,
}

/// ResourceIdentity names one resource within a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentity {
    pub api_version: String,
    pub kind: String,
    /// None for cluster-scoped resources.
    pub namespace: Option<String>,
    pub name: String,
}

impl ResourceIdentity {
    /// Extracts the identity fields from a manifest document.
    ///
    /// `apiVersion`, `kind`, and `metadata.name` are required; the namespace
    /// is optional here and resolved later against the accessor's scope.
    pub fn from_document(doc: &Value) -> Result<ResourceIdentity, IdentityError> {
        let mapping = doc.as_mapping().ok_or(IdentityError { field: "kind" })?;

        let api_version = mapping
            .get("apiVersion")
            .and_then(Value::as_str)
            .ok_or(IdentityError { field: "apiVersion" })?;
        let kind = mapping
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(IdentityError { field: "kind" })?;

        let metadata = mapping
            .get("metadata")
            .and_then(Value::as_mapping)
            .ok_or(IdentityError {
                field: "metadata.name",
            })?;
        let name = metadata
            .get("name")
            .and_then(Value::as_str)
            .ok_or(IdentityError {
                field: "metadata.name",
            })?;
        let namespace = metadata
            .get("namespace")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(ResourceIdentity {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
            namespace,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{} {}/{}", self.kind, ns, self.name),
            None => write!(f, "{} {}", self.kind, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_yaml;

    #[test]
    fn test_from_document_full() {
        let doc = from_yaml(
            "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n  namespace: prod\n",
        )
        .unwrap();
        let identity = ResourceIdentity::from_document(&doc).unwrap();
        assert_eq!(identity.api_version, "apps/v1");
        assert_eq!(identity.kind, "Deployment");
        assert_eq!(identity.namespace.as_deref(), Some("prod"));
        assert_eq!(identity.name, "web");
        assert_eq!(identity.to_string(), "Deployment prod/web");
    }

    #[test]
    fn test_from_document_without_namespace() {
        let doc = from_yaml("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: prod\n").unwrap();
        let identity = ResourceIdentity::from_document(&doc).unwrap();
        assert_eq!(identity.namespace, None);
        assert_eq!(identity.to_string(), "Namespace prod");
    }

    #[test]
    fn test_from_document_missing_fields() {
        let missing_kind = from_yaml("apiVersion: v1\nmetadata:\n  name: x\n").unwrap();
        assert_eq!(
            ResourceIdentity::from_document(&missing_kind).unwrap_err().field,
            "kind"
        );

        let missing_name = from_yaml("apiVersion: v1\nkind: Service\nmetadata: {}\n").unwrap();
        assert_eq!(
            ResourceIdentity::from_document(&missing_name).unwrap_err().field,
            "metadata.name"
        );

        let not_a_mapping = from_yaml("- just\n- a\n- list\n").unwrap();
        assert!(ResourceIdentity::from_document(&not_a_mapping).is_err());
    }
}
