//! # Decentralized Identifier Resolution (DID Resolution)
//!
//! Client side of the [DID Resolution HTTP(S)
//! Binding](https://w3c-ccg.github.io/did-resolution/#bindings-https), plus
//! the [resolution result](https://w3c-ccg.github.io/did-resolution/#did-resolution-result)
//! data structures returned by a remote resolver.

use async_trait::async_trait;
use chrono::prelude::{DateTime, Utc};
#[cfg(feature = "http")]
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::did::Document;
use crate::error::ResolutionError;

/// Media type expected for a [DID Resolution Result][ResolutionResult].
pub const TYPE_DID_RESOLUTION: &str =
    "application/ld+json;profile=\"https://w3id.org/did-resolution\";charset=utf-8";

/// [`notFound`](https://www.w3.org/TR/did-spec-registries/#notfound) error
/// value reported by resolvers in resolution metadata.
pub const ERROR_NOT_FOUND: &str = "notFound";

/// `@context` URI for a DID Resolution Result.
pub const DID_RESOLUTION_V1_CONTEXT: &str = "https://w3id.org/did-resolution/v1";

/// Resolver endpoint of the cheqd network, used when no endpoint is
/// configured.
pub const DEFAULT_RESOLVER_ENDPOINT: &str = "https://resolver.cheqd.net";

/// Path under the resolver endpoint where identifiers are resolved and
/// resources dereferenced.
pub const RESOLUTION_PATH: &str = "1.0/identifiers";

/// URL under a resolver endpoint for an identifier: a DID to resolve, or a
/// resource URI to link out to.
///
/// The identifier is templated as-is; HTTP callers are expected to
/// percent-encode it first.
pub fn identifier_url(endpoint: &str, id: &str) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), RESOLUTION_PATH, id)
}

/// [DID Resolution Metadata](https://www.w3.org/TR/did-core/#did-resolution-metadata)
/// returned by the resolver alongside the document.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionMetadata {
    /// `error` metadata property. Values should be registered in [DID
    /// Specification Registries](https://www.w3.org/TR/did-spec-registries/#error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// [`contentType`](https://www.w3.org/TR/did-spec-registries/#contenttype) metadata property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Additional metadata properties.
    #[serde(flatten)]
    pub property_set: Option<HashMap<String, Value>>,
}

/// [DID document metadata](https://www.w3.org/TR/did-core/#did-document-metadata),
/// including the [linked resources][LinkedResourceMetadata] attached to the
/// DID.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// [`created`](https://www.w3.org/TR/did-core/#dfn-created) DID document metadata property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// [`versionId`](https://www.w3.org/TR/did-spec-registries/#versionid) DID document metadata property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Metadata of resources linked to the DID, in resolver order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_resource_metadata: Vec<LinkedResourceMetadata>,
    /// Additional metadata properties.
    #[serde(flatten)]
    pub property_set: Option<HashMap<String, Value>>,
}

/// Metadata of a versioned resource linked to a DID, e.g. a published key
/// or release event record.
///
/// `previousVersionId`/`nextVersionId` reference sibling versions within the
/// same collection; the referenced resources are not fetched by this crate.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkedResourceMetadata {
    #[serde(rename = "resourceURI")]
    pub resource_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_collection_id: Option<String>,
    pub resource_id: String,
    pub resource_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version_id: Option<String>,
    #[serde(flatten)]
    pub property_set: Option<HashMap<String, Value>>,
}

/// [DID Resolution Result](https://w3c-ccg.github.io/did-resolution/#did-resolution-result)
/// data structure: the envelope returned by the resolver's HTTP(S) binding.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    /// Value for a [`@context`](https://www.w3.org/TR/did-core/#dfn-context)
    /// property of a DID Resolution Result.
    #[serde(rename = "@context")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    /// [DID Document](https://www.w3.org/TR/did-core/#dfn-diddocument).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_document: Option<Document>,
    /// [DID Resolution Metadata](https://www.w3.org/TR/did-core/#dfn-didresolutionmetadata).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_resolution_metadata: Option<ResolutionMetadata>,
    /// [DID Document Metadata](https://www.w3.org/TR/did-core/#dfn-diddocumentmetadata).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub did_document_metadata: Option<DocumentMetadata>,
    /// Additional properties.
    #[serde(flatten)]
    pub property_set: Option<BTreeMap<String, Value>>,
}

impl Default for ResolutionResult {
    fn default() -> Self {
        Self {
            context: Some(Value::String(DID_RESOLUTION_V1_CONTEXT.to_string())),
            did_document: None,
            did_resolution_metadata: None,
            did_document_metadata: None,
            property_set: None,
        }
    }
}

impl ResolutionResult {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The resolved DID document, if any.
    pub fn document(&self) -> Option<&Document> {
        self.did_document.as_ref()
    }

    /// The linked resources attached to the DID, in resolver order. Empty
    /// when the resolver returned no document metadata.
    pub fn linked_resources(&self) -> &[LinkedResourceMetadata] {
        match &self.did_document_metadata {
            Some(metadata) => &metadata.linked_resource_metadata,
            None => &[],
        }
    }
}

/// A client-side [DID resolver](https://www.w3.org/TR/did-core/#dfn-did-resolvers).
///
/// The seam between the viewer pipeline and the transport: the popover is
/// generic over this trait so embedding applications (and tests) can
/// substitute their own resolution source for [`HTTPDIDResolver`].
///
/// ## Example
///
/// A resolver backed by a static resolution result.
///
/// ```
/// use async_trait::async_trait;
/// use did_viewer::did::Document;
/// use did_viewer::did_resolve::{DIDResolver, ResolutionResult};
/// use did_viewer::error::ResolutionError;
///
/// pub struct DIDExampleStatic;
///
/// #[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
/// #[cfg_attr(not(target_arch = "wasm32"), async_trait)]
/// impl DIDResolver for DIDExampleStatic {
///     async fn resolve(&self, did: &str) -> Result<ResolutionResult, ResolutionError> {
///         if did != "did:example:foo" {
///             return Err(ResolutionError::NotFound);
///         }
///         Ok(ResolutionResult {
///             did_document: Some(Document::new(did)),
///             ..Default::default()
///         })
///     }
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DIDResolver: Sync {
    /// Resolve a DID into a [resolution result][ResolutionResult].
    ///
    /// A failure must leave caller state untouched; callers are expected
    /// not to clear previously displayed data on error.
    async fn resolve(&self, did: &str) -> Result<ResolutionResult, ResolutionError>;
}

/// A DID Resolver implementing a client for the [DID Resolution HTTP(S)
/// Binding](https://w3c-ccg.github.io/did-resolution/#bindings-https).
///
/// Each invocation is a single independent GET request: no retry, no
/// caching, no timeout.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HTTPDIDResolver {
    /// HTTP(S) URL of the resolver service, without the resolution path.
    pub endpoint: String,
}

#[cfg(feature = "http")]
impl HTTPDIDResolver {
    /// Construct a new HTTP DID Resolver with a given [endpoint][HTTPDIDResolver::endpoint] URL.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HTTPDIDResolver {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLVER_ENDPOINT)
    }
}

#[cfg(feature = "http")]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DIDResolver for HTTPDIDResolver {
    async fn resolve(&self, did: &str) -> Result<ResolutionResult, ResolutionError> {
        if did.is_empty() {
            return Err(ResolutionError::EmptyDid);
        }
        let did_urlencoded =
            percent_encoding::utf8_percent_encode(did, percent_encoding::CONTROLS).to_string();
        let url = identifier_url(&self.endpoint, &did_urlencoded);
        let client = Client::builder().build()?;
        let resp = client
            .get(&url)
            .header(header::ACCEPT, TYPE_DID_RESOLUTION)
            .header(header::USER_AGENT, crate::USER_AGENT)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ResolutionError::NotFound);
        }
        resp.error_for_status_ref()?;
        let bytes = resp.bytes().await?;
        let result: ResolutionResult = serde_json::from_slice(&bytes)?;
        if let Some(error) = result
            .did_resolution_metadata
            .as_ref()
            .and_then(|meta| meta.error.as_deref())
        {
            if error == ERROR_NOT_FOUND {
                return Err(ResolutionError::NotFound);
            }
            return Err(ResolutionError::UnableToResolve(error.to_string()));
        }
        if result.did_document.is_none() {
            return Err(ResolutionError::NotFound);
        }
        Ok(result)
    }
}
