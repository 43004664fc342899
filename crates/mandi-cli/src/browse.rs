//! Command handlers for `search`, `facets` and `resolve`.
//!
//! Repeated `--category`/`--location` flags add to the selection; they never
//! toggle something off again.

use std::path::Path;

use mandi_core::{
    apply, build_facets, candidates, explain_category, load_categories, load_snapshot,
    resolve_category, CategoryFacet, CategoryLookup, CategorySelection, CategoryTree, CheckState,
    Listing, ListingQuery, LocationFacet, LocationSelection, LocationTarget, LocationTree,
    SelectionState, Snapshot, SnapshotPaths,
};

use crate::SearchArgs;

pub(crate) fn load(
    categories: &Path,
    locations: &Path,
    listings: Option<&Path>,
) -> anyhow::Result<Snapshot> {
    let listings = listings.ok_or_else(|| {
        anyhow::anyhow!("a listing file is required; pass --listings or set MANDI_LISTINGS_PATH")
    })?;
    let paths = SnapshotPaths {
        categories: categories.to_path_buf(),
        locations: locations.to_path_buf(),
        listings: listings.to_path_buf(),
    };
    Ok(load_snapshot(&paths)?)
}

/// Builds the selection described by repeated `--category`/`--location` flags.
pub(crate) fn selection_from_args(
    categories: &CategoryTree,
    locations: &LocationTree,
    args: &SearchArgs,
) -> SelectionState {
    let mut selection = SelectionState::default();
    for lookup in &args.category_lookups {
        select_category(&mut selection.category, categories, lookup);
    }
    for target in &args.location_targets {
        select_location(&mut selection.location, locations, *target);
    }
    selection
}

fn select_category(selection: &mut CategorySelection, tree: &CategoryTree, lookup: &CategoryLookup) {
    let Some(target) = resolve_category(tree, lookup) else {
        tracing::warn!(id = lookup.id, level = ?lookup.level, "category not found; ignoring");
        return;
    };
    if selection.state_of(tree, target) != CheckState::Checked {
        selection.toggle_branch(tree, &CategoryLookup::tagged(target));
    }
}

fn select_location(selection: &mut LocationSelection, tree: &LocationTree, target: LocationTarget) {
    match target {
        LocationTarget::Branch(branch) => {
            if selection.state_of(tree, branch) != CheckState::Checked
                && !selection.toggle_branch(tree, branch)
            {
                tracing::warn!(%target, "location not found; ignoring");
            }
        }
        LocationTarget::Leaf(leaf) => {
            if !selection.contains(leaf) {
                selection.toggle_leaf(leaf);
            }
        }
    }
}

pub(crate) fn run_search(snapshot: &Snapshot, args: &SearchArgs, json: bool) -> anyhow::Result<()> {
    let selection = selection_from_args(&snapshot.categories, &snapshot.locations, args);
    let query = ListingQuery {
        text: args.query.clone().unwrap_or_default(),
        min_price: args.min_price,
        max_price: args.max_price,
        sort: args.sort,
        page: args.page,
        page_size: args.page_size,
    };
    let page = apply(&snapshot.listings, &query, &selection, &snapshot.categories);

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    println!(
        "{} listing(s), page {} of {}",
        page.total_count,
        page.page,
        page.page_count.max(1)
    );
    for listing in &page.items {
        println!("{}", listing_row(listing));
    }
    Ok(())
}

pub(crate) fn run_facets(snapshot: &Snapshot, query: Option<&str>, json: bool) -> anyhow::Result<()> {
    let query = ListingQuery {
        text: query.unwrap_or_default().to_string(),
        ..ListingQuery::default()
    };
    let pool = candidates(&snapshot.listings, &query);
    let trees = build_facets(
        &snapshot.categories,
        &snapshot.locations,
        &SelectionState::default(),
        &pool,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&trees)?);
        return Ok(());
    }

    println!("Categories");
    for facet in &trees.categories {
        print_category(facet, 1);
    }
    println!();
    println!("Locations");
    for facet in &trees.locations {
        print_location(facet, 1);
    }
    Ok(())
}

pub(crate) fn run_resolve(categories: &Path, lookup: &CategoryLookup, json: bool) -> anyhow::Result<()> {
    let tree = load_categories(categories)?;
    let resolution = explain_category(&tree, lookup);

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    match resolution {
        Some(found) => println!("{} (by {})", found.target, found.rule),
        None => println!("not found"),
    }
    Ok(())
}

pub(crate) fn listing_row(listing: &Listing) -> String {
    let id = listing.id.map_or_else(|| "-".to_string(), |id| id.to_string());
    let price = listing
        .price
        .map_or_else(|| "-".to_string(), |price| format!("{price:.2}"));
    format!("{id:>8}  {price:>12}  {}", listing.title())
}

fn print_category(facet: &CategoryFacet, depth: usize) {
    println!(
        "{}{} {} ({})  [{}]",
        "  ".repeat(depth),
        state_marker(facet.state),
        facet.name,
        facet.count,
        facet.target
    );
    for child in &facet.children {
        print_category(child, depth + 1);
    }
}

fn print_location(facet: &LocationFacet, depth: usize) {
    println!(
        "{}{} {} ({})  [{}]",
        "  ".repeat(depth),
        state_marker(facet.state),
        facet.name,
        facet.count,
        facet.target
    );
    for child in &facet.children {
        print_location(child, depth + 1);
    }
}

pub(crate) fn state_marker(state: CheckState) -> &'static str {
    match state {
        CheckState::Checked => "[x]",
        CheckState::Unchecked => "[ ]",
        CheckState::Indeterminate => "[-]",
    }
}
