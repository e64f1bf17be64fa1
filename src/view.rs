//! Projection of a [resolution result](crate::did_resolve::ResolutionResult)
//! into the flat display model of the viewer widget, and the pluggable
//! rendering strategies the embedding application can supply.

use chrono::prelude::{DateTime, Utc};
use chrono::{FixedOffset, Offset};

use crate::did_resolve::{identifier_url, ResolutionResult, DEFAULT_RESOLVER_ENDPOINT};
use crate::error::RenderError;
use crate::resource::{group_and_sort, ResourceGroup};

/// Fallback panel text shown when a renderer fails. Contained output only;
/// renderer errors never reach the embedding application.
pub const FALLBACK_PANEL: &str = "Unable to display DID document.";

/// Display options for [projection][DocumentView::project] and rendering.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Resource types to display. `None` shows every type present.
    pub resource_types: Option<Vec<String>>,
    /// Offset applied when formatting timestamps. Projection is
    /// deterministic for a fixed offset.
    pub time_zone: FixedOffset,
    /// Resolver endpoint used for outbound resource hyperlinks.
    pub endpoint: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            resource_types: None,
            time_zone: Utc.fix(),
            endpoint: DEFAULT_RESOLVER_ENDPOINT.to_string(),
        }
    }
}

/// Timestamp formatting used across the widget, e.g.
/// `2024-06-01 12:00:00 +00:00`.
pub fn format_datetime(datetime: &DateTime<Utc>, time_zone: &FixedOffset) -> String {
    datetime
        .with_timezone(time_zone)
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string()
}

/// Verification method entry reduced to the fields the form displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationMethodView {
    pub id: String,
    pub type_: String,
}

/// The flat, read-only field set behind the presentation form: a pure
/// projection of one resolution result. Same input and options always
/// yield the same view.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentView {
    pub did: String,
    pub created: Option<String>,
    pub version: Option<String>,
    pub validated_at: Option<String>,
    pub verification_methods: Vec<VerificationMethodView>,
    pub resource_groups: Vec<ResourceGroup>,
}

impl DocumentView {
    /// Project a resolution result into the display model: identifier,
    /// formatted timestamps, verification methods reduced to id and type,
    /// and linked resources grouped per
    /// [`group_and_sort`](crate::resource::group_and_sort).
    pub fn project(
        result: &ResolutionResult,
        validated_at: Option<DateTime<Utc>>,
        options: &ViewOptions,
    ) -> Result<Self, RenderError> {
        let document = result.document().ok_or(RenderError::MissingDocument)?;
        let metadata = result.did_document_metadata.as_ref();
        Ok(Self {
            did: document.id.clone(),
            created: metadata
                .and_then(|m| m.created.as_ref())
                .map(|created| format_datetime(created, &options.time_zone)),
            version: metadata.and_then(|m| m.version_id.clone()),
            validated_at: validated_at
                .map(|validated| format_datetime(&validated, &options.time_zone)),
            verification_methods: document
                .verification_methods()
                .map(|method| VerificationMethodView {
                    id: method.id.clone(),
                    type_: method.type_.clone(),
                })
                .collect(),
            resource_groups: group_and_sort(
                result.linked_resources(),
                options.resource_types.as_deref(),
            ),
        })
    }
}

/// Rendering strategy supplied by the embedding application.
///
/// The two override points mirror the widget's composition: the whole
/// resolved document, and one resource group within it. Implementations
/// return their markup as a string; failures are contained by
/// [`render_contained`].
pub trait DocumentRenderer {
    fn render_document(
        &self,
        view: &DocumentView,
        options: &ViewOptions,
    ) -> Result<String, RenderError>;

    fn render_resource_group(
        &self,
        group: &ResourceGroup,
        options: &ViewOptions,
    ) -> Result<String, RenderError>;
}

/// Plain-text renderer following the original widget's line structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl DocumentRenderer for TextRenderer {
    fn render_document(
        &self,
        view: &DocumentView,
        options: &ViewOptions,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str(&format!("DID: {}\n", view.did));
        if let Some(created) = &view.created {
            out.push_str(&format!("Created At: {created}\n"));
        }
        if let Some(validated_at) = &view.validated_at {
            out.push_str(&format!("Validated At: {validated_at}\n"));
        }
        if let Some(version) = &view.version {
            out.push_str(&format!("Version: {version}\n"));
        }
        if !view.verification_methods.is_empty() {
            out.push_str("Verification Methods:\n");
            for method in &view.verification_methods {
                out.push_str(&format!("  {} ({})\n", method.id, method.type_));
            }
        }
        if !view.resource_groups.is_empty() {
            out.push_str("Linked Resources:\n");
            for group in &view.resource_groups {
                out.push_str(&self.render_resource_group(group, options)?);
            }
        }
        Ok(out)
    }

    fn render_resource_group(
        &self,
        group: &ResourceGroup,
        options: &ViewOptions,
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str(&format!("{} ({})\n", group.resource_type, group.len()));
        if let Some(version) = group.latest_version() {
            out.push_str(&format!("Latest Version: {version}\n"));
        }
        for (ordinal, resource) in group.iter_with_ordinals() {
            out.push_str(&format!("  {} #{}\n", resource.resource_name, ordinal));
            if let Some(created) = &resource.created {
                out.push_str(&format!(
                    "  Created: {}\n",
                    format_datetime(created, &options.time_zone)
                ));
            }
            out.push_str(&format!(
                "  {}\n",
                identifier_url(&options.endpoint, &resource.resource_uri)
            ));
        }
        Ok(out)
    }
}

/// Containment boundary for rendering faults: a failing renderer produces
/// the minimal [fallback panel][FALLBACK_PANEL] and a logged error instead
/// of propagating into the embedding application's render tree.
pub fn render_contained<R: DocumentRenderer>(
    renderer: &R,
    view: &DocumentView,
    options: &ViewOptions,
) -> String {
    match renderer.render_document(view, options) {
        Ok(rendered) => rendered,
        Err(err) => {
            log::error!("error rendering DID document {}: {}", view.did, err);
            FALLBACK_PANEL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::did_resolve::tests::{EXAMPLE_DID, EXAMPLE_RESOLVER_RESP};

    fn example_result() -> ResolutionResult {
        ResolutionResult::from_json(EXAMPLE_RESOLVER_RESP).unwrap()
    }

    fn cet() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    #[test]
    fn projection_flattens_document() {
        let options = ViewOptions {
            time_zone: cet(),
            ..Default::default()
        };
        let view = DocumentView::project(&example_result(), None, &options).unwrap();
        assert_eq!(view.did, EXAMPLE_DID);
        assert_eq!(view.created.as_deref(), Some("2024-01-15 11:10:09 +01:00"));
        assert_eq!(
            view.version.as_deref(),
            Some("44f49254-8106-40ee-99ad-e50ac9517346")
        );
        assert_eq!(view.validated_at, None);
        // id and type pairs only
        assert_eq!(view.verification_methods.len(), 1);
        assert_eq!(
            view.verification_methods[0].id,
            format!("{EXAMPLE_DID}#key-1")
        );
        assert_eq!(
            view.verification_methods[0].type_,
            "Ed25519VerificationKey2020"
        );
        assert_eq!(view.resource_groups.len(), 2);
    }

    #[test]
    fn projection_is_deterministic() {
        let options = ViewOptions {
            time_zone: cet(),
            ..Default::default()
        };
        let validated_at = "2024-07-12T09:24:18Z".parse().unwrap();
        let first =
            DocumentView::project(&example_result(), Some(validated_at), &options).unwrap();
        let second =
            DocumentView::project(&example_result(), Some(validated_at), &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.validated_at.as_deref(),
            Some("2024-07-12 10:24:18 +01:00")
        );
    }

    #[test]
    fn projection_filters_resource_types() {
        let options = ViewOptions {
            resource_types: Some(vec!["NPM-Package-Publish-Event".to_string()]),
            ..Default::default()
        };
        let view = DocumentView::project(&example_result(), None, &options).unwrap();
        assert_eq!(view.resource_groups.len(), 1);
        assert_eq!(
            view.resource_groups[0].resource_type,
            "NPM-Package-Publish-Event"
        );
        assert_eq!(view.resource_groups[0].len(), 2);
    }

    #[test]
    fn projection_requires_document() {
        let result = ResolutionResult::default();
        let err = DocumentView::project(&result, None, &ViewOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::MissingDocument));
    }

    #[test]
    fn text_renderer_follows_display_contract() {
        let view =
            DocumentView::project(&example_result(), None, &ViewOptions::default()).unwrap();
        let rendered = TextRenderer
            .render_document(&view, &ViewOptions::default())
            .unwrap();
        assert!(rendered.contains(&format!("DID: {EXAMPLE_DID}")));
        assert!(rendered.contains("NPM-Package-Publish-Event (2)"));
        assert!(rendered.contains("Latest Version: 1.0.3"));
        // most recent entry carries the highest ordinal
        assert!(rendered.contains("ov-id-sdk #2\n  Created: 2024-06-01 12:00:00 +00:00"));
        assert!(rendered.contains("ov-id-sdk #1\n  Created: 2024-01-01 08:30:00 +00:00"));
        // outbound links go through the resolver endpoint
        assert!(rendered.contains(&format!(
            "https://resolver.cheqd.net/1.0/identifiers/{EXAMPLE_DID}/resources/9046eb83-b4e2-4c5d-9dbb-4a43a2e30c1a"
        )));
    }

    struct FailingRenderer;

    impl DocumentRenderer for FailingRenderer {
        fn render_document(
            &self,
            _view: &DocumentView,
            _options: &ViewOptions,
        ) -> Result<String, RenderError> {
            Err(RenderError::Renderer("widget tree exploded".to_string()))
        }

        fn render_resource_group(
            &self,
            _group: &ResourceGroup,
            _options: &ViewOptions,
        ) -> Result<String, RenderError> {
            Err(RenderError::Renderer("widget tree exploded".to_string()))
        }
    }

    #[test]
    fn render_contained_substitutes_fallback() {
        let view =
            DocumentView::project(&example_result(), None, &ViewOptions::default()).unwrap();
        let rendered = render_contained(&FailingRenderer, &view, &ViewOptions::default());
        assert_eq!(rendered, FALLBACK_PANEL);
    }
}
