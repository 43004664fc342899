use serde_json::json;

use mandi_core::{
    category_tree_from_value, location_tree_from_value, CategoryRef, CompositeLocationRef,
    Listing, LocationRef, Snapshot,
};

use super::*;

fn snapshot() -> Snapshot {
    let categories = category_tree_from_value(json!([
        {"id": 5, "name": "Electronics", "field_categories": [
            {"id": 12, "name": "Phones", "item_categories": [
                {"id": 5, "name": "Android"}, {"id": 13, "name": "iPhone"}
            ]}
        ]}
    ]));
    let locations = location_tree_from_value(json!([
        {"id": 3, "name": "Bagmati", "districts": [
            {"id": 27, "name": "Kathmandu", "localLevels": [
                {"id": 270, "name": "Metro", "type": "metropolitan", "wards": [
                    {"id": 7, "ward_number": 7, "local_addresses": ["Thamel", "Lazimpat"]}
                ]}
            ]}
        ]}
    ]));
    let listings: Vec<Listing> = serde_json::from_value(json!([
        {"id": 1, "title": "Pixel", "price": 300, "category_id": 5, "location_id": 7},
        {"id": 2, "title": "iPhone", "price": "900", "category_id": 13, "location_id": 7, "selected_local_address_index": 1}
    ]))
    .unwrap();
    Snapshot::new(categories, locations, listings)
}

fn search_args(extra: &[&str]) -> SearchArgs {
    let mut argv = vec!["mandi-cli", "search"];
    argv.extend_from_slice(extra);
    match Cli::try_parse_from(argv).expect("expected valid cli args").command {
        Commands::Search(args) => args,
        other => panic!("expected search, got {other:?}"),
    }
}

#[test]
fn parses_search_with_defaults() {
    let args = search_args(&[]);
    assert!(args.query.is_none());
    assert!(args.category_lookups.is_empty());
    assert_eq!(args.sort, SortKey::Relevance);
    assert_eq!(args.page, 1);
    assert_eq!(args.page_size, DEFAULT_PAGE_SIZE);
}

#[test]
fn parses_repeated_category_and_location_flags() {
    let args = search_args(&[
        "--category",
        "12",
        "--category",
        "5:item",
        "--location",
        "7-1",
        "--location",
        "district:27",
        "--sort",
        "price-desc",
    ]);
    assert_eq!(
        args.category_lookups,
        vec![
            CategoryLookup::by_id(12),
            CategoryLookup::tagged(CategoryRef::item(5)),
        ]
    );
    assert_eq!(
        args.location_targets,
        vec![
            LocationTarget::Leaf(CompositeLocationRef::Address { ward: 7, index: 1 }),
            LocationTarget::Branch(LocationRef::district(27)),
        ]
    );
    assert_eq!(args.sort, SortKey::PriceDesc);
}

#[test]
fn rejects_unknown_sort_key_and_bad_category() {
    assert!(Cli::try_parse_from(["mandi-cli", "search", "--sort", "cheapest"]).is_err());
    assert!(Cli::try_parse_from(["mandi-cli", "search", "--category", "x:item"]).is_err());
    assert!(Cli::try_parse_from(["mandi-cli", "search", "--category", "5:county"]).is_err());
    assert!(Cli::try_parse_from(["mandi-cli", "search", "--location", "7-"]).is_err());
}

#[test]
fn parses_resolve_command() {
    let cli = Cli::try_parse_from(["mandi-cli", "resolve", "--id", "5", "--name", "Android"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Resolve { id: 5, name: Some(ref n), level: None } if n == "Android"
    ));
}

#[test]
fn global_paths_are_accepted_after_subcommand() {
    let cli = Cli::try_parse_from([
        "mandi-cli",
        "facets",
        "--listings",
        "/tmp/listings.yaml",
        "--json",
    ])
    .expect("expected valid cli args");
    assert_eq!(cli.listings, Some(PathBuf::from("/tmp/listings.yaml")));
    assert!(cli.json);
}

#[test]
fn command_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}

#[test]
fn global_paths_and_selection_flags_parse_side_by_side() {
    let cli = Cli::try_parse_from([
        "mandi-cli",
        "--categories",
        "cats.yaml",
        "--locations",
        "locs.json",
        "search",
        "--category",
        "12",
        "--location",
        "7",
        "--sort",
        "newest-first",
    ])
    .expect("expected valid cli args");
    assert_eq!(cli.categories, PathBuf::from("cats.yaml"));
    assert_eq!(cli.locations, PathBuf::from("locs.json"));
    let Commands::Search(args) = cli.command else {
        panic!("expected search");
    };
    assert_eq!(args.category_lookups, vec![CategoryLookup::by_id(12)]);
    assert_eq!(
        args.location_targets,
        vec![LocationTarget::Leaf(CompositeLocationRef::Ward(7))]
    );
    assert_eq!(args.sort, SortKey::NewestFirst);
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["mandi-cli"]).is_err());
}

#[test]
fn selection_flags_only_ever_add() {
    let snapshot = snapshot();
    // Phones selected, then Android again: Android must stay selected.
    let args = search_args(&["--category", "12", "--category", "5:item", "--location", "7"]);
    let selection = browse::selection_from_args(&snapshot.categories, &snapshot.locations, &args);
    assert!(selection.category.items.contains(&5));
    assert!(selection.category.items.contains(&13));
    assert!(selection.location.contains(CompositeLocationRef::Ward(7)));

    let args = search_args(&["--location", "ward:7", "--location", "7-0"]);
    let selection = browse::selection_from_args(&snapshot.categories, &snapshot.locations, &args);
    assert!(selection
        .location
        .contains(CompositeLocationRef::Address { ward: 7, index: 0 }));
}

#[test]
fn unknown_selection_targets_are_ignored() {
    let snapshot = snapshot();
    let args = search_args(&["--category", "404", "--location", "province:99"]);
    let selection = browse::selection_from_args(&snapshot.categories, &snapshot.locations, &args);
    assert!(selection.category.is_empty());
    assert!(selection.location.is_empty());
}

#[test]
fn listing_row_formats_missing_values() {
    let snapshot = snapshot();
    let row = browse::listing_row(&snapshot.listings[1]);
    assert!(row.ends_with("iPhone"));
    assert!(row.contains("900.00"));

    let bare: Listing = serde_json::from_value(json!({"title": "Bare"})).unwrap();
    assert!(browse::listing_row(&bare).trim_start().starts_with('-'));
}

#[test]
fn state_markers_are_distinct() {
    let markers = [
        browse::state_marker(mandi_core::CheckState::Checked),
        browse::state_marker(mandi_core::CheckState::Unchecked),
        browse::state_marker(mandi_core::CheckState::Indeterminate),
    ];
    assert_eq!(markers, ["[x]", "[ ]", "[-]"]);
}
