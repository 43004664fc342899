//! Normalized three-level category taxonomy (Domain → Field → Item).

use std::collections::BTreeSet;

use serde::Serialize;

use super::{clean_name, keep_node};
use crate::refs::{CategoryLevel, CategoryRef};
use crate::taxonomy::raw::{RawDomain, RawField, RawItem};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemNode {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldNode {
    pub id: i64,
    pub name: String,
    pub items: Vec<ItemNode>,
}

/// A top-level category. May own fields, items directly (legacy shape), or
/// both at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainNode {
    pub id: i64,
    pub name: String,
    pub fields: Vec<FieldNode>,
    pub items: Vec<ItemNode>,
}

impl ItemNode {
    #[must_use]
    pub fn category_ref(&self) -> CategoryRef {
        CategoryRef::item(self.id)
    }
}

impl FieldNode {
    #[must_use]
    pub fn category_ref(&self) -> CategoryRef {
        CategoryRef::field(self.id)
    }
}

impl DomainNode {
    #[must_use]
    pub fn category_ref(&self) -> CategoryRef {
        CategoryRef::domain(self.id)
    }

    /// Whether the node has the shape of a domain: at least one field or
    /// direct item beneath it.
    #[must_use]
    pub fn has_domain_structure(&self) -> bool {
        !self.fields.is_empty() || !self.items.is_empty()
    }

    /// Items owned by this domain through fields and directly, in display order.
    pub fn all_items(&self) -> impl Iterator<Item = &ItemNode> {
        self.fields
            .iter()
            .flat_map(|field| field.items.iter())
            .chain(self.items.iter())
    }
}

/// Borrowed view of any category node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategoryNode<'a> {
    Domain(&'a DomainNode),
    Field(&'a FieldNode),
    Item(&'a ItemNode),
}

impl CategoryNode<'_> {
    #[must_use]
    pub fn category_ref(&self) -> CategoryRef {
        match self {
            CategoryNode::Domain(d) => d.category_ref(),
            CategoryNode::Field(f) => f.category_ref(),
            CategoryNode::Item(i) => i.category_ref(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            CategoryNode::Domain(d) => &d.name,
            CategoryNode::Field(f) => &f.name,
            CategoryNode::Item(i) => &i.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTree {
    domains: Vec<DomainNode>,
}

impl CategoryTree {
    /// Builds the normalized tree, preserving payload order.
    ///
    /// Nodes without a coercible id, or with neither a name nor children, are
    /// skipped individually.
    #[must_use]
    pub fn from_raw(raw: Vec<RawDomain>) -> Self {
        let domains = raw.into_iter().filter_map(normalize_domain).collect();
        Self { domains }
    }

    #[must_use]
    pub fn new(domains: Vec<DomainNode>) -> Self {
        Self { domains }
    }

    #[must_use]
    pub fn domains(&self) -> &[DomainNode] {
        &self.domains
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldNode> {
        self.domains.iter().flat_map(|d| d.fields.iter())
    }

    /// Every item in the tree, whether owned by a field or directly by a domain.
    pub fn items(&self) -> impl Iterator<Item = &ItemNode> {
        self.domains.iter().flat_map(DomainNode::all_items)
    }

    /// Direct lookup of a tagged reference. First match in tree order wins.
    #[must_use]
    pub fn find(&self, target: CategoryRef) -> Option<CategoryNode<'_>> {
        match target.level {
            CategoryLevel::Domain => self
                .domains
                .iter()
                .find(|d| d.id == target.id)
                .map(CategoryNode::Domain),
            CategoryLevel::Field => self
                .fields()
                .find(|f| f.id == target.id)
                .map(CategoryNode::Field),
            CategoryLevel::Item => self
                .items()
                .find(|i| i.id == target.id)
                .map(CategoryNode::Item),
        }
    }

    /// The authoritative leaf set: every item id beneath `target`, including
    /// the direct domain → item edges. Empty when `target` is unknown.
    #[must_use]
    pub fn item_ids_under(&self, target: CategoryRef) -> BTreeSet<i64> {
        match self.find(target) {
            Some(CategoryNode::Domain(domain)) => domain.all_items().map(|i| i.id).collect(),
            Some(CategoryNode::Field(field)) => field.items.iter().map(|i| i.id).collect(),
            Some(CategoryNode::Item(item)) => BTreeSet::from([item.id]),
            None => BTreeSet::new(),
        }
    }

    /// Fields with no items at or beneath `target`.
    #[must_use]
    pub fn empty_fields_under(&self, target: CategoryRef) -> Vec<i64> {
        match self.find(target) {
            Some(CategoryNode::Domain(domain)) => domain
                .fields
                .iter()
                .filter(|f| f.items.is_empty())
                .map(|f| f.id)
                .collect(),
            Some(CategoryNode::Field(field)) if field.items.is_empty() => vec![field.id],
            _ => Vec::new(),
        }
    }
}

fn normalize_domain(raw: RawDomain) -> Option<DomainNode> {
    let fields: Vec<FieldNode> = raw
        .field_categories
        .into_iter()
        .filter_map(normalize_field)
        .collect();
    let items: Vec<ItemNode> = raw
        .item_categories
        .into_iter()
        .filter_map(normalize_item)
        .collect();
    let name = clean_name(raw.name);
    let has_children = !fields.is_empty() || !items.is_empty();

    let id = keep_node("domain", raw.id, &name, has_children)?;
    Some(DomainNode {
        id,
        name,
        fields,
        items,
    })
}

fn normalize_field(raw: RawField) -> Option<FieldNode> {
    let items: Vec<ItemNode> = raw
        .item_categories
        .into_iter()
        .filter_map(normalize_item)
        .collect();
    let name = clean_name(raw.name);

    let id = keep_node("field", raw.id, &name, !items.is_empty())?;
    Some(FieldNode { id, name, items })
}

fn normalize_item(raw: RawItem) -> Option<ItemNode> {
    let name = clean_name(raw.name);
    let id = keep_node("item", raw.id, &name, false)?;
    Some(ItemNode { id, name })
}
