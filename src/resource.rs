//! Grouping and ordering of [linked resources][LinkedResourceMetadata] for
//! display.

use std::cmp::Ordering;

use crate::did_resolve::LinkedResourceMetadata;

/// Bucket for resources with a missing or empty `resourceType`.
pub const UNKNOWN_RESOURCE_TYPE: &str = "Unknown";

/// Resources of one type, ordered most recent first.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceGroup {
    pub resource_type: String,
    pub resources: Vec<LinkedResourceMetadata>,
}

impl ResourceGroup {
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Version of the most recent resource in the group.
    pub fn latest_version(&self) -> Option<&str> {
        self.resources
            .first()
            .and_then(|resource| resource.resource_version.as_deref())
    }

    /// Display ordinal for the resource at `index`: the most recent entry
    /// gets the highest ordinal, counting down from group size to 1.
    pub fn ordinal(&self, index: usize) -> usize {
        self.resources.len() - index
    }

    /// Resources paired with their display ordinals, most recent first.
    pub fn iter_with_ordinals(&self) -> impl Iterator<Item = (usize, &LinkedResourceMetadata)> {
        let len = self.resources.len();
        self.resources
            .iter()
            .enumerate()
            .map(move |(i, resource)| (len - i, resource))
    }
}

fn effective_type(resource: &LinkedResourceMetadata) -> &str {
    match resource.resource_type.as_deref() {
        Some("") | None => UNKNOWN_RESOURCE_TYPE,
        Some(resource_type) => resource_type,
    }
}

// Case-insensitive first, byte order as tie-break.
fn compare_type_names(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    folded.then_with(|| a.cmp(b))
}

/// Group a flat sequence of linked resources by resource type, for display.
///
/// Resources with a missing or empty type land in the
/// [`"Unknown"`][UNKNOWN_RESOURCE_TYPE] bucket before filtering, so the
/// bucket itself is selectable through `allowed_types`. When
/// `allowed_types` is `Some`, resources of any other type are dropped;
/// `None` keeps every type present in the input.
///
/// Groups are ordered ascending by type name; within a group, resources are
/// ordered most recent first, with input order preserved among equal
/// timestamps. An empty input yields an empty output.
pub fn group_and_sort(
    resources: &[LinkedResourceMetadata],
    allowed_types: Option<&[String]>,
) -> Vec<ResourceGroup> {
    let mut groups: Vec<ResourceGroup> = Vec::new();
    for resource in resources {
        let resource_type = effective_type(resource);
        if let Some(allowed) = allowed_types {
            if !allowed.iter().any(|t| t == resource_type) {
                continue;
            }
        }
        match groups
            .iter_mut()
            .find(|group| group.resource_type == resource_type)
        {
            Some(group) => group.resources.push(resource.clone()),
            None => groups.push(ResourceGroup {
                resource_type: resource_type.to_string(),
                resources: vec![resource.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| compare_type_names(&a.resource_type, &b.resource_type));
    for group in &mut groups {
        // stable, so entries with equal timestamps keep input order
        group.resources.sort_by(|a, b| b.created.cmp(&a.created));
    }
    groups
}
