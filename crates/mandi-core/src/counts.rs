//! Per-node listing counts and the leaf matchers shared with the pipeline.
//!
//! Counts are always recomputed from the listing slice handed in; nothing is
//! cached between calls. A reference that does not resolve counts as zero.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::listing::Listing;
use crate::refs::{CategoryLookup, CategoryRef, CompositeLocationRef, LocationRef, LocationTarget};
use crate::resolve::resolve_category;
use crate::taxonomy::{CategoryTree, LocationTree};

/// Matches listings whose `category_id` is in an item-id leaf set.
#[derive(Debug, Clone, Default)]
pub struct CategoryMatcher {
    items: HashSet<i64>,
}

impl CategoryMatcher {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = i64>) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        listing
            .category_id
            .is_some_and(|id| self.items.contains(&id))
    }
}

/// Matches listings against a set of ward and address composites.
///
/// A whole-ward entry matches any address index in that ward. An address
/// entry `w-k` matches index `k`; `w-0` also matches listings with no index.
#[derive(Debug, Clone, Default)]
pub struct LocationMatcher {
    wards: HashSet<i64>,
    addresses: HashMap<i64, HashSet<i64>>,
}

impl LocationMatcher {
    #[must_use]
    pub fn new(leaves: impl IntoIterator<Item = CompositeLocationRef>) -> Self {
        let mut matcher = Self::default();
        for leaf in leaves {
            match leaf {
                CompositeLocationRef::Ward(ward) => {
                    matcher.wards.insert(ward);
                }
                CompositeLocationRef::Address { ward, index } => {
                    matcher
                        .addresses
                        .entry(ward)
                        .or_default()
                        .insert(i64::from(index));
                }
            }
        }
        matcher
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wards.is_empty() && self.addresses.is_empty()
    }

    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        let Some(ward) = listing.location_id else {
            return false;
        };
        if self.wards.contains(&ward) {
            return true;
        }
        self.addresses.get(&ward).is_some_and(|indices| {
            indices.contains(&listing.selected_local_address_index.unwrap_or(0))
        })
    }
}

/// Whether one composite matches one listing.
#[must_use]
pub fn composite_matches(leaf: CompositeLocationRef, listing: &Listing) -> bool {
    if listing.location_id != Some(leaf.ward_id()) {
        return false;
    }
    match leaf.address_index() {
        None => true,
        Some(index) => listing.selected_local_address_index.unwrap_or(0) == i64::from(index),
    }
}

/// Resolves `lookup` and counts listings beneath it.
#[must_use]
pub fn count_category(tree: &CategoryTree, lookup: &CategoryLookup, listings: &[Listing]) -> usize {
    resolve_category(tree, lookup).map_or(0, |target| count_category_ref(tree, target, listings))
}

#[must_use]
pub fn count_category_ref(tree: &CategoryTree, target: CategoryRef, listings: &[Listing]) -> usize {
    count_items(&tree.item_ids_under(target), listings)
}

pub(crate) fn count_items(items: &BTreeSet<i64>, listings: &[Listing]) -> usize {
    if items.is_empty() {
        return 0;
    }
    let matcher = CategoryMatcher::new(items.iter().copied());
    listings.iter().filter(|l| matcher.matches(l)).count()
}

#[must_use]
pub fn count_location(tree: &LocationTree, target: LocationRef, listings: &[Listing]) -> usize {
    let leaves = tree.leaf_set(target);
    if leaves.is_empty() {
        return 0;
    }
    let matcher = LocationMatcher::new(leaves);
    listings.iter().filter(|l| matcher.matches(l)).count()
}

#[must_use]
pub fn count_composite(leaf: CompositeLocationRef, listings: &[Listing]) -> usize {
    listings.iter().filter(|l| composite_matches(leaf, l)).count()
}

#[must_use]
pub fn count_location_target(
    tree: &LocationTree,
    target: LocationTarget,
    listings: &[Listing],
) -> usize {
    match target {
        LocationTarget::Branch(branch) => count_location(tree, branch, listings),
        LocationTarget::Leaf(leaf) => count_composite(leaf, listings),
    }
}

#[cfg(test)]
#[path = "counts_test.rs"]
mod tests;
