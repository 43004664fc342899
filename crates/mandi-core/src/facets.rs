//! Facet trees: the whole taxonomy annotated with counts and check states,
//! ready to render next to a result page.
//!
//! Counts are taken against the candidate set (text and price stages only)
//! so they stay stable while the user toggles checkboxes.

use serde::Serialize;

use crate::counts::{CategoryMatcher, LocationMatcher};
use crate::listing::Listing;
use crate::refs::{CategoryRef, CompositeLocationRef, LocationRef, LocationTarget};
use crate::selection::{CategorySelection, CheckState, LocationSelection, SelectionState};
use crate::taxonomy::{
    CategoryTree, DistrictNode, DomainNode, FieldNode, ItemNode, LocalLevelNode, LocationTree,
    ProvinceNode, WardNode,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFacet {
    #[serde(rename = "ref")]
    pub target: CategoryRef,
    pub name: String,
    pub count: usize,
    pub state: CheckState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CategoryFacet>,
}

/// Branch rows carry a [`LocationRef`]; address rows carry the composite
/// `ward-index` ref used by leaf toggles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationFacet {
    #[serde(rename = "ref")]
    pub target: LocationTarget,
    pub name: String,
    pub count: usize,
    pub state: CheckState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LocationFacet>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetTrees {
    pub categories: Vec<CategoryFacet>,
    pub locations: Vec<LocationFacet>,
}

/// Both facet trees for one render pass.
#[must_use]
pub fn build_facets(
    categories: &CategoryTree,
    locations: &LocationTree,
    selection: &SelectionState,
    candidates: &[&Listing],
) -> FacetTrees {
    FacetTrees {
        categories: category_facets(categories, &selection.category, candidates),
        locations: location_facets(locations, &selection.location, candidates),
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[must_use]
pub fn category_facets(
    tree: &CategoryTree,
    selection: &CategorySelection,
    candidates: &[&Listing],
) -> Vec<CategoryFacet> {
    tree.domains()
        .iter()
        .map(|domain| domain_facet(tree, domain, selection, candidates))
        .collect()
}

fn domain_facet(
    tree: &CategoryTree,
    domain: &DomainNode,
    selection: &CategorySelection,
    candidates: &[&Listing],
) -> CategoryFacet {
    let children: Vec<CategoryFacet> = domain
        .fields
        .iter()
        .map(|field| field_facet(tree, field, selection, candidates))
        .chain(
            domain
                .items
                .iter()
                .map(|item| item_facet(item, selection, candidates)),
        )
        .collect();

    CategoryFacet {
        target: domain.category_ref(),
        name: domain.name.clone(),
        count: children.iter().map(|c| c.count).sum(),
        state: selection.state_of(tree, domain.category_ref()),
        children,
    }
}

fn field_facet(
    tree: &CategoryTree,
    field: &FieldNode,
    selection: &CategorySelection,
    candidates: &[&Listing],
) -> CategoryFacet {
    let children: Vec<CategoryFacet> = field
        .items
        .iter()
        .map(|item| item_facet(item, selection, candidates))
        .collect();

    CategoryFacet {
        target: field.category_ref(),
        name: field.name.clone(),
        count: children.iter().map(|c| c.count).sum(),
        state: selection.state_of(tree, field.category_ref()),
        children,
    }
}

fn item_facet(item: &ItemNode, selection: &CategorySelection, candidates: &[&Listing]) -> CategoryFacet {
    let matcher = CategoryMatcher::new([item.id]);
    CategoryFacet {
        target: item.category_ref(),
        name: item.name.clone(),
        count: candidates.iter().filter(|l| matcher.matches(l)).count(),
        state: CheckState::from_flag(selection.items.contains(&item.id)),
        children: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[must_use]
pub fn location_facets(
    tree: &LocationTree,
    selection: &LocationSelection,
    candidates: &[&Listing],
) -> Vec<LocationFacet> {
    tree.provinces()
        .iter()
        .map(|province| province_facet(province, selection, candidates))
        .collect()
}

fn province_facet(
    province: &ProvinceNode,
    selection: &LocationSelection,
    candidates: &[&Listing],
) -> LocationFacet {
    let children = province
        .districts
        .iter()
        .map(|district| district_facet(district, selection, candidates))
        .collect();
    branch_facet(
        LocationRef::province(province.id),
        &province.name,
        province.wards(),
        children,
        selection,
        candidates,
    )
}

fn district_facet(
    district: &DistrictNode,
    selection: &LocationSelection,
    candidates: &[&Listing],
) -> LocationFacet {
    let children = district
        .local_levels
        .iter()
        .map(|local| local_level_facet(local, selection, candidates))
        .collect();
    branch_facet(
        LocationRef::district(district.id),
        &district.name,
        district.wards(),
        children,
        selection,
        candidates,
    )
}

fn local_level_facet(
    local: &LocalLevelNode,
    selection: &LocationSelection,
    candidates: &[&Listing],
) -> LocationFacet {
    let children = local
        .wards
        .iter()
        .map(|ward| ward_facet(ward, selection, candidates))
        .collect();
    branch_facet(
        LocationRef::local_level(local.id),
        &local.name,
        local.wards(),
        children,
        selection,
        candidates,
    )
}

fn ward_facet(ward: &WardNode, selection: &LocationSelection, candidates: &[&Listing]) -> LocationFacet {
    let children = ward
        .local_addresses
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let index = u32::try_from(index).ok()?;
            let leaf = CompositeLocationRef::Address {
                ward: ward.id,
                index,
            };
            let matcher = LocationMatcher::new([leaf]);
            Some(LocationFacet {
                target: LocationTarget::Leaf(leaf),
                name: name.clone(),
                count: candidates.iter().filter(|l| matcher.matches(l)).count(),
                state: CheckState::from_flag(selection.contains(leaf)),
                children: Vec::new(),
            })
        })
        .collect();
    let mut facet = branch_facet(
        LocationRef::ward(ward.id),
        &ward.label(),
        std::iter::once(ward),
        children,
        selection,
        candidates,
    );
    // The ward row toggles the whole-ward leaf, which already covers every
    // address beneath it.
    if selection.contains(CompositeLocationRef::Ward(ward.id)) {
        facet.state = CheckState::Checked;
    }
    facet
}

fn branch_facet<'a>(
    target: LocationRef,
    name: &str,
    wards: impl Iterator<Item = &'a WardNode>,
    children: Vec<LocationFacet>,
    selection: &LocationSelection,
    candidates: &[&Listing],
) -> LocationFacet {
    let leaves: Vec<CompositeLocationRef> = wards.flat_map(WardNode::leaves).collect();
    let selected = leaves.iter().filter(|leaf| selection.contains(**leaf)).count();
    let matcher = LocationMatcher::new(leaves.iter().copied());

    LocationFacet {
        target: LocationTarget::Branch(target),
        name: name.to_owned(),
        count: candidates.iter().filter(|l| matcher.matches(l)).count(),
        state: CheckState::from_counts(selected, leaves.len()),
        children,
    }
}
