//! Tri-state selection store for both taxonomies.
//!
//! Item membership is the authoritative category state. Domain and field
//! flags are re-derived from it after every transition: a branch is flagged
//! iff all items beneath it are selected. Branches with no items at all keep
//! an explicit flag instead, so an empty field can still be "on".
//!
//! Location selection is a flat set of [`CompositeLocationRef`]s where a
//! whole-ward entry and address entries for the same ward coexist.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::counts::{CategoryMatcher, LocationMatcher};
use crate::refs::{CategoryLevel, CategoryLookup, CategoryRef, CompositeLocationRef, LocationRef};
use crate::resolve::resolve_category;
use crate::taxonomy::{CategoryTree, LocationTree};

/// Display state of a checkbox derived from its leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Checked,
    Unchecked,
    Indeterminate,
}

impl CheckState {
    pub(crate) fn from_counts(selected: usize, total: usize) -> Self {
        if total > 0 && selected == total {
            CheckState::Checked
        } else if selected == 0 {
            CheckState::Unchecked
        } else {
            CheckState::Indeterminate
        }
    }

    pub(crate) fn from_flag(flag: bool) -> Self {
        if flag {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySelection {
    #[serde(default)]
    pub domains: BTreeSet<i64>,
    #[serde(default)]
    pub fields: BTreeSet<i64>,
    #[serde(default)]
    pub items: BTreeSet<i64>,
}

impl CategorySelection {
    /// True when nothing at any level is selected; the category filter stage
    /// is skipped entirely in that case.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty() && self.fields.is_empty() && self.items.is_empty()
    }

    /// Select-all unless the whole subtree is already selected, in which
    /// case deselect it. Returns `false` when `lookup` does not resolve.
    pub fn toggle_branch(&mut self, tree: &CategoryTree, lookup: &CategoryLookup) -> bool {
        let Some(target) = resolve_category(tree, lookup) else {
            tracing::debug!(id = lookup.id, name = ?lookup.name, "toggle ignored: category not found");
            return false;
        };
        self.toggle_resolved(tree, target);
        true
    }

    fn toggle_resolved(&mut self, tree: &CategoryTree, target: CategoryRef) {
        let items = tree.item_ids_under(target);

        if items.is_empty() {
            let empty_fields = tree.empty_fields_under(target);
            let domain_on =
                target.level != CategoryLevel::Domain || self.domains.contains(&target.id);
            let select = !(domain_on && empty_fields.iter().all(|f| self.fields.contains(f)));
            if target.level == CategoryLevel::Domain {
                set_flag(&mut self.domains, target.id, select);
            }
            for field in empty_fields {
                set_flag(&mut self.fields, field, select);
            }
        } else {
            // Explicit flags of empty fields beneath are left as they are; only
            // the item set moves.
            let select = !items.iter().all(|id| self.items.contains(id));
            for id in items {
                set_flag(&mut self.items, id, select);
            }
        }

        self.rederive(tree);
    }

    /// Recomputes domain and field flags from the item set.
    pub fn rederive(&mut self, tree: &CategoryTree) {
        let mut domains = BTreeSet::new();
        let mut fields = BTreeSet::new();

        for domain in tree.domains() {
            for field in &domain.fields {
                let flagged = if field.items.is_empty() {
                    self.fields.contains(&field.id)
                } else {
                    field.items.iter().all(|i| self.items.contains(&i.id))
                };
                if flagged {
                    fields.insert(field.id);
                }
            }

            let mut items = domain.all_items().peekable();
            let flagged = if items.peek().is_none() {
                self.domains.contains(&domain.id)
            } else {
                items.all(|i| self.items.contains(&i.id))
            };
            if flagged {
                domains.insert(domain.id);
            }
        }

        self.domains = domains;
        self.fields = fields;
    }

    #[must_use]
    pub fn state_of(&self, tree: &CategoryTree, target: CategoryRef) -> CheckState {
        let items = tree.item_ids_under(target);
        if items.is_empty() {
            let flag = match target.level {
                CategoryLevel::Domain => self.domains.contains(&target.id),
                CategoryLevel::Field => self.fields.contains(&target.id),
                CategoryLevel::Item => self.items.contains(&target.id),
            };
            return CheckState::from_flag(flag);
        }
        let selected = items.iter().filter(|id| self.items.contains(id)).count();
        CheckState::from_counts(selected, items.len())
    }

    /// Item ids the selection stands for: selected items plus every item
    /// beneath a flagged field or domain.
    #[must_use]
    pub fn expanded_items(&self, tree: &CategoryTree) -> BTreeSet<i64> {
        let mut expanded = self.items.clone();
        for &field in &self.fields {
            expanded.extend(tree.item_ids_under(CategoryRef::field(field)));
        }
        for &domain in &self.domains {
            expanded.extend(tree.item_ids_under(CategoryRef::domain(domain)));
        }
        expanded
    }

    #[must_use]
    pub fn matcher(&self, tree: &CategoryTree) -> CategoryMatcher {
        CategoryMatcher::new(self.expanded_items(tree))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationSelection {
    refs: BTreeSet<CompositeLocationRef>,
}

impl LocationSelection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    #[must_use]
    pub fn contains(&self, leaf: CompositeLocationRef) -> bool {
        self.refs.contains(&leaf)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompositeLocationRef> {
        self.refs.iter()
    }

    /// Select-all/deselect-all over every ward and address composite beneath
    /// `target`. Returns `false` when the branch has no leaves.
    pub fn toggle_branch(&mut self, tree: &LocationTree, target: LocationRef) -> bool {
        let leaves = tree.leaf_set(target);
        if leaves.is_empty() {
            tracing::debug!(level = %target.level, id = target.id, "toggle ignored: no wards beneath location");
            return false;
        }
        if leaves.iter().all(|leaf| self.refs.contains(leaf)) {
            for leaf in &leaves {
                self.refs.remove(leaf);
            }
        } else {
            self.refs.extend(leaves);
        }
        true
    }

    /// Flips a single ward or address entry.
    pub fn toggle_leaf(&mut self, leaf: CompositeLocationRef) {
        if !self.refs.remove(&leaf) {
            self.refs.insert(leaf);
        }
    }

    #[must_use]
    pub fn state_of(&self, tree: &LocationTree, target: LocationRef) -> CheckState {
        let leaves = tree.leaf_set(target);
        let selected = leaves.iter().filter(|leaf| self.refs.contains(leaf)).count();
        CheckState::from_counts(selected, leaves.len())
    }

    #[must_use]
    pub fn matcher(&self) -> LocationMatcher {
        LocationMatcher::new(self.refs.iter().copied())
    }
}

impl FromIterator<CompositeLocationRef> for LocationSelection {
    fn from_iter<I: IntoIterator<Item = CompositeLocationRef>>(iter: I) -> Self {
        Self {
            refs: iter.into_iter().collect(),
        }
    }
}

/// One transition of the selection reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum SelectionAction {
    ToggleCategoryBranch(CategoryLookup),
    ToggleLocationBranch(LocationRef),
    ToggleLocationLeaf(CompositeLocationRef),
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    #[serde(default)]
    pub category: CategorySelection,
    #[serde(default)]
    pub location: LocationSelection,
}

impl SelectionState {
    #[must_use]
    pub fn reduce(
        mut self,
        categories: &CategoryTree,
        locations: &LocationTree,
        action: &SelectionAction,
    ) -> Self {
        match action {
            SelectionAction::ToggleCategoryBranch(lookup) => {
                self.category.toggle_branch(categories, lookup);
            }
            SelectionAction::ToggleLocationBranch(target) => {
                self.location.toggle_branch(locations, *target);
            }
            SelectionAction::ToggleLocationLeaf(leaf) => self.location.toggle_leaf(*leaf),
            SelectionAction::Reset => self.reset(),
        }
        self
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn set_flag(set: &mut BTreeSet<i64>, id: i64, on: bool) {
    if on {
        set.insert(id);
    } else {
        set.remove(&id);
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod tests;
