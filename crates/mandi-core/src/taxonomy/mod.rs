//! Category and location taxonomies, normalized from collaborator payloads.

pub mod category;
pub mod location;
pub mod raw;

use serde_json::Value;

pub use category::{CategoryNode, CategoryTree, DomainNode, FieldNode, ItemNode};
pub use location::{DistrictNode, LocalLevelNode, LocationTree, ProvinceNode, WardNode};

use crate::coerce::collect_lenient;

/// Builds a [`CategoryTree`] from an already-parsed payload.
///
/// A non-array payload yields an empty tree.
#[must_use]
pub fn category_tree_from_value(payload: Value) -> CategoryTree {
    match payload {
        Value::Array(entries) => CategoryTree::from_raw(collect_lenient(entries)),
        other => {
            tracing::warn!(payload = %short(&other), "category payload is not an array");
            CategoryTree::default()
        }
    }
}

/// Builds a [`LocationTree`] from an already-parsed payload.
///
/// A non-array payload yields an empty tree.
#[must_use]
pub fn location_tree_from_value(payload: Value) -> LocationTree {
    match payload {
        Value::Array(entries) => LocationTree::from_raw(collect_lenient(entries)),
        other => {
            tracing::warn!(payload = %short(&other), "location payload is not an array");
            LocationTree::default()
        }
    }
}

pub(crate) fn clean_name(raw: Option<String>) -> String {
    raw.map(|s| s.trim().to_owned()).unwrap_or_default()
}

/// Applies the skip rule shared by every level: a node needs a usable id, and
/// either a name or something beneath it.
pub(crate) fn keep_node(kind: &str, id: Option<i64>, name: &str, has_children: bool) -> Option<i64> {
    let Some(id) = id else {
        tracing::debug!(kind, name, "skipping taxonomy node without a usable id");
        return None;
    };
    if name.is_empty() && !has_children {
        tracing::debug!(kind, id, "skipping taxonomy node without name or children");
        return None;
    }
    Some(id)
}

fn short(value: &Value) -> String {
    let mut text = value.to_string();
    if text.len() > 80 {
        let mut cut = 80;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
