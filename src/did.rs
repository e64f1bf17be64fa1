//! Data structures for [Decentralized Identifiers (DIDs) v1.0][did-core]
//! documents, as returned by a remote resolver.
//!
//! [did-core]: https://www.w3.org/TR/did-core/
use std::collections::HashMap as Map;
use std::convert::TryFrom;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ResolutionError;

pub const DEFAULT_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

// v0.11 context used by universal resolver
pub const V0_11_CONTEXT: &str = "https://w3id.org/did/v0.11";

type DID = String;
type DIDURL = String;

/// A [DID document](https://www.w3.org/TR/did-core/#dfn-did-documents).
///
/// Immutable once parsed from a resolution result; owned by the viewer
/// pipeline for the lifetime of one popover session.
#[derive(Debug, Serialize, Deserialize, Builder, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
#[builder(
    setter(into, strip_option),
    default,
    build_fn(validate = "Self::validate")
)]
pub struct Document {
    #[serde(rename = "@context")]
    pub context: Contexts,
    pub id: DID,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<Controller>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<Vec<VerificationMethodMap>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Vec<DIDURL>>,
    #[serde(flatten)]
    pub property_set: Option<Map<String, Value>>,
}

/// The [`@context`](https://www.w3.org/TR/did-core/#json-ld) property of a
/// DID document.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
#[serde(try_from = "OneOrManyContext")]
pub enum Contexts {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrManyContext {
    One(String),
    Many(Vec<String>),
}

/// The [`controller`](https://www.w3.org/TR/did-core/#dfn-controller)
/// property of a DID document.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Controller {
    One(DID),
    Many(Vec<DID>),
}

/// A [verification method map](https://www.w3.org/TR/did-core/#verification-methods).
///
/// Key material beyond `publicKeyMultibase` is left in the property set;
/// this crate displays keys, it does not use them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethodMap {
    pub id: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub controller: DID,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_multibase: Option<String>,
    #[serde(flatten)]
    pub property_set: Option<Map<String, Value>>,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            context: Contexts::One(DEFAULT_CONTEXT.to_string()),
            id: "".to_string(),
            controller: None,
            verification_method: None,
            authentication: None,
            property_set: None,
        }
    }
}

impl TryFrom<OneOrManyContext> for Contexts {
    type Error = ResolutionError;
    fn try_from(context: OneOrManyContext) -> Result<Self, Self::Error> {
        let contexts = match context {
            OneOrManyContext::One(context) => Contexts::One(context),
            OneOrManyContext::Many(contexts) => Contexts::Many(contexts),
        };
        let first_uri = match contexts.first() {
            None => return Err(ResolutionError::MissingContext),
            Some(uri) => uri,
        };
        if first_uri != DEFAULT_CONTEXT && first_uri != V0_11_CONTEXT {
            return Err(ResolutionError::InvalidContext);
        }
        Ok(contexts)
    }
}

impl Contexts {
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(context) => Some(context),
            Self::Many(contexts) => contexts.first().map(|s| s.as_str()),
        }
    }
}

impl Controller {
    pub fn contains(&self, did: &str) -> bool {
        match self {
            Self::One(controller) => controller == did,
            Self::Many(controllers) => controllers.iter().any(|c| c == did),
        }
    }
}

impl DocumentBuilder {
    fn validate(&self) -> Result<(), ResolutionError> {
        // validate is called before defaults are assigned.
        // None means default will be used.
        if self.id.is_none() || self.id == Some("".to_string()) {
            return Err(ResolutionError::MissingDocumentId);
        }
        if let Some(context) = &self.context {
            let first_context = match context.first() {
                None => return Err(ResolutionError::MissingContext),
                Some(uri) => uri,
            };
            if first_context != DEFAULT_CONTEXT && first_context != V0_11_CONTEXT {
                return Err(ResolutionError::InvalidContext);
            }
        }
        Ok(())
    }
}

impl Document {
    pub fn new(id: &str) -> Document {
        Document {
            id: String::from(id),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Document, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The document's verification methods, in document order.
    pub fn verification_methods(&self) -> impl Iterator<Item = &VerificationMethodMap> {
        self.verification_method.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document() {
        let id = "did:test:deadbeefcafe";
        let doc = Document::new(id);
        assert_eq!(doc.id, id);
    }

    #[test]
    fn build_document() {
        let id = "did:test:deadbeefcafe";
        let doc = DocumentBuilder::default()
            .id(id.to_owned())
            .build()
            .unwrap();
        assert_eq!(doc.id, id);
    }

    #[test]
    #[should_panic(expected = "Missing document ID")]
    fn build_document_no_id() {
        let doc = DocumentBuilder::default().build().unwrap();
        println!("{}", serde_json::to_string_pretty(&doc).unwrap());
    }

    #[test]
    fn document_from_json() {
        let doc_str = r#"{
            "@context": "https://www.w3.org/ns/did/v1",
            "id": "did:test:deadbeefcafe"
        }"#;
        let doc = Document::from_json(doc_str).unwrap();
        assert_eq!(doc.id, "did:test:deadbeefcafe");
    }

    #[test]
    fn document_rejects_unknown_context() {
        let doc_str = r#"{
            "@context": "example:bad",
            "id": "did:test:deadbeefcafe"
        }"#;
        assert!(Document::from_json(doc_str).is_err());
    }

    #[test]
    fn verification_method_from_json() {
        let doc_str = r#"{
            "@context": ["https://www.w3.org/ns/did/v1"],
            "id": "did:cheqd:mainnet:280dd37c-aa96-5e71-8548-5125505a968e",
            "controller": ["did:cheqd:mainnet:280dd37c-aa96-5e71-8548-5125505a968e"],
            "verificationMethod": [{
                "id": "did:cheqd:mainnet:280dd37c-aa96-5e71-8548-5125505a968e#key-1",
                "type": "Ed25519VerificationKey2020",
                "controller": "did:cheqd:mainnet:280dd37c-aa96-5e71-8548-5125505a968e",
                "publicKeyMultibase": "z6MkhaXgBZDvotDkL5257faiztiGiC2QtKLGpbnnEGta2doK"
            }],
            "authentication": ["did:cheqd:mainnet:280dd37c-aa96-5e71-8548-5125505a968e#key-1"]
        }"#;
        let doc = Document::from_json(doc_str).unwrap();
        let vm = doc.verification_methods().next().unwrap();
        assert_eq!(vm.type_, "Ed25519VerificationKey2020");
        assert!(vm.public_key_multibase.is_some());
        assert!(doc
            .controller
            .as_ref()
            .unwrap()
            .contains("did:cheqd:mainnet:280dd37c-aa96-5e71-8548-5125505a968e"));
    }
}
