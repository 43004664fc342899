//! Category identifier resolution.
//!
//! Raw category ids collide across levels (an item id often equals some
//! domain or field id), so a bare id plus an optional display name is
//! resolved with a fixed precedence:
//!
//! 1. exact name among items
//! 2. exact name among fields (an empty field still counts)
//! 3. domain by name, then domain by id, both only for nodes with domain structure
//! 4. field by id
//! 5. item by id
//!
//! A lookup that already carries a level and no name is treated as a tagged
//! reference and looked up directly, with no cross-level fallback.

use serde::Serialize;

use crate::refs::{CategoryLookup, CategoryRef};
use crate::taxonomy::{CategoryNode, CategoryTree};

/// Which precedence step produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveRule {
    Tagged,
    ItemName,
    FieldName,
    DomainName,
    DomainId,
    FieldId,
    ItemId,
}

impl std::fmt::Display for ResolveRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ResolveRule::Tagged => "tagged reference",
            ResolveRule::ItemName => "item name",
            ResolveRule::FieldName => "field name",
            ResolveRule::DomainName => "domain name",
            ResolveRule::DomainId => "domain id",
            ResolveRule::FieldId => "field id",
            ResolveRule::ItemId => "item id",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub target: CategoryRef,
    pub rule: ResolveRule,
}

/// Resolves `lookup` to a tagged reference. `None` means not found, which
/// callers treat as matching nothing.
#[must_use]
pub fn resolve_category(tree: &CategoryTree, lookup: &CategoryLookup) -> Option<CategoryRef> {
    explain_category(tree, lookup).map(|r| r.target)
}

/// Like [`resolve_category`], also reporting which rule matched.
#[must_use]
pub fn explain_category(tree: &CategoryTree, lookup: &CategoryLookup) -> Option<Resolution> {
    let name = lookup
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    if let (None, Some(level)) = (name, lookup.level) {
        let target = CategoryRef {
            level,
            id: lookup.id,
        };
        return tree.find(target).map(|node| Resolution {
            target: node.category_ref(),
            rule: ResolveRule::Tagged,
        });
    }

    let resolution = by_name(tree, name).or_else(|| by_id(tree, lookup.id));
    if resolution.is_none() {
        tracing::debug!(id = lookup.id, name = ?name, "category lookup did not resolve");
    }
    resolution
}

fn by_name(tree: &CategoryTree, name: Option<&str>) -> Option<Resolution> {
    let name = name?;

    if let Some(item) = tree.items().find(|i| i.name == name) {
        return Some(found(CategoryNode::Item(item), ResolveRule::ItemName));
    }
    if let Some(field) = tree.fields().find(|f| f.name == name) {
        return Some(found(CategoryNode::Field(field), ResolveRule::FieldName));
    }
    tree.domains()
        .iter()
        .find(|d| d.name == name && d.has_domain_structure())
        .map(|d| found(CategoryNode::Domain(d), ResolveRule::DomainName))
}

fn by_id(tree: &CategoryTree, id: i64) -> Option<Resolution> {
    if let Some(domain) = tree
        .domains()
        .iter()
        .find(|d| d.id == id && d.has_domain_structure())
    {
        return Some(found(CategoryNode::Domain(domain), ResolveRule::DomainId));
    }
    if let Some(field) = tree.fields().find(|f| f.id == id) {
        return Some(found(CategoryNode::Field(field), ResolveRule::FieldId));
    }
    tree.items()
        .find(|i| i.id == id)
        .map(|i| found(CategoryNode::Item(i), ResolveRule::ItemId))
}

fn found(node: CategoryNode<'_>, rule: ResolveRule) -> Resolution {
    Resolution {
        target: node.category_ref(),
        rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::CategoryLevel;
    use crate::taxonomy::{DomainNode, FieldNode, ItemNode};

    fn item(id: i64, name: &str) -> ItemNode {
        ItemNode {
            id,
            name: name.to_owned(),
        }
    }

    fn colliding_tree() -> CategoryTree {
        CategoryTree::new(vec![
            DomainNode {
                id: 5,
                name: "Electronics".to_owned(),
                fields: vec![
                    FieldNode {
                        id: 12,
                        name: "Phones".to_owned(),
                        items: vec![item(5, "Android"), item(13, "iPhone")],
                    },
                    FieldNode {
                        id: 14,
                        name: "Drones".to_owned(),
                        items: vec![],
                    },
                ],
                items: vec![item(40, "Cables")],
            },
            DomainNode {
                id: 99,
                name: "Misc".to_owned(),
                fields: vec![],
                items: vec![],
            },
        ])
    }

    #[test]
    fn item_name_beats_colliding_domain_id() {
        let tree = colliding_tree();
        let resolution = explain_category(&tree, &CategoryLookup::named(5, "Android")).unwrap();
        assert_eq!(resolution.target, CategoryRef::item(5));
        assert_eq!(resolution.rule, ResolveRule::ItemName);
    }

    #[test]
    fn bare_colliding_id_prefers_domain() {
        let tree = colliding_tree();
        assert_eq!(
            resolve_category(&tree, &CategoryLookup::by_id(5)),
            Some(CategoryRef::domain(5))
        );
    }

    #[test]
    fn empty_field_is_found_by_name() {
        let tree = colliding_tree();
        assert_eq!(
            resolve_category(&tree, &CategoryLookup::named(0, "Drones")),
            Some(CategoryRef::field(14))
        );
    }

    #[test]
    fn domain_name_requires_domain_structure() {
        let tree = colliding_tree();
        assert_eq!(resolve_category(&tree, &CategoryLookup::named(99, "Misc")), None);
        assert_eq!(
            resolve_category(&tree, &CategoryLookup::named(0, "Electronics")),
            Some(CategoryRef::domain(5))
        );
    }

    #[test]
    fn unknown_name_falls_back_through_ids_in_order() {
        let tree = colliding_tree();
        let field = explain_category(&tree, &CategoryLookup::named(12, "Gone")).unwrap();
        assert_eq!(field.target, CategoryRef::field(12));
        assert_eq!(field.rule, ResolveRule::FieldId);

        let direct_item = explain_category(&tree, &CategoryLookup::by_id(40)).unwrap();
        assert_eq!(direct_item.target, CategoryRef::item(40));
        assert_eq!(direct_item.rule, ResolveRule::ItemId);
    }

    #[test]
    fn unresolvable_lookup_is_none() {
        let tree = colliding_tree();
        assert_eq!(resolve_category(&tree, &CategoryLookup::by_id(777)), None);
    }

    #[test]
    fn tagged_lookup_skips_precedence() {
        let tree = colliding_tree();
        let lookup = CategoryLookup::tagged(CategoryRef::item(5));
        let resolution = explain_category(&tree, &lookup).unwrap();
        assert_eq!(resolution.target, CategoryRef::item(5));
        assert_eq!(resolution.rule, ResolveRule::Tagged);

        let missing = CategoryLookup {
            level: Some(CategoryLevel::Field),
            id: 5,
            name: None,
        };
        assert_eq!(resolve_category(&tree, &missing), None);
    }

    #[test]
    fn blank_name_is_ignored() {
        let tree = colliding_tree();
        assert_eq!(
            resolve_category(&tree, &CategoryLookup::named(13, "   ")),
            Some(CategoryRef::item(13))
        );
    }
}
