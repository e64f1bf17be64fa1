//! # did-viewer
//!
//! Resolution-and-presentation pipeline behind an identity viewer widget:
//! resolve a [Decentralized Identifier (DID)][did-core] through a remote
//! resolver's [HTTP(S) binding][did-resolution], parse the result into
//! typed records at the HTTP boundary, group the DID's linked resources
//! for display, and drive the popover visibility state machine with
//! rendering strategies supplied by the embedding application.
//!
//! The pipeline performs no cryptography and no DID method resolution of
//! its own; both are delegated to the remote resolver service.
//!
//! [did-core]: https://www.w3.org/TR/did-core/
//! [did-resolution]: https://w3c-ccg.github.io/did-resolution/#bindings-https

pub mod did;
pub mod did_resolve;
pub mod error;
pub mod popover;
pub mod resource;
pub mod view;

pub use did::Document;
#[cfg(feature = "http")]
pub use did_resolve::HTTPDIDResolver;
pub use did_resolve::{DIDResolver, LinkedResourceMetadata, ResolutionResult};
pub use error::{RenderError, ResolutionError};
pub use popover::{ErrorHook, Phase, Popover};
pub use resource::{group_and_sort, ResourceGroup};
pub use view::{render_contained, DocumentRenderer, DocumentView, TextRenderer, ViewOptions};

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
