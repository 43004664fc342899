use super::*;
use crate::refs::{CategoryLookup, CompositeLocationRef};
use crate::selection::{CategorySelection, LocationSelection};
use crate::test_support::{category_tree, listing, listings, priced};

fn ids(page: &ListingPage<'_>) -> Vec<i64> {
    page.items.iter().filter_map(|l| l.id).collect()
}

fn query() -> ListingQuery {
    ListingQuery::default()
}

fn sorted(key: SortKey) -> ListingQuery {
    ListingQuery {
        sort: key,
        ..ListingQuery::default()
    }
}

// -----------------------------------------------------------------------
// Sort
// -----------------------------------------------------------------------

#[test]
fn price_ascending_is_stable_for_ties() {
    let snapshot = vec![
        priced(1, "a", 100.0),
        priced(2, "b", 50.0),
        priced(3, "c", 50.0),
    ];
    let page = apply(
        &snapshot,
        &sorted(SortKey::PriceAsc),
        &SelectionState::default(),
        &category_tree(),
    );
    assert_eq!(ids(&page), vec![2, 3, 1]);
}

#[test]
fn unpriced_listings_sort_last_in_both_directions() {
    let mut unpriced = priced(4, "d", 0.0);
    unpriced.price = None;
    let snapshot = vec![unpriced, priced(1, "a", 10.0), priced(2, "b", 30.0)];
    let tree = category_tree();

    let asc = apply(&snapshot, &sorted(SortKey::PriceAsc), &SelectionState::default(), &tree);
    assert_eq!(ids(&asc), vec![1, 2, 4]);
    let desc = apply(&snapshot, &sorted(SortKey::PriceDesc), &SelectionState::default(), &tree);
    assert_eq!(ids(&desc), vec![2, 1, 4]);
}

#[test]
fn title_sorts_ignore_case() {
    let snapshot = vec![
        priced(1, "banana", 1.0),
        priced(2, "Apple", 1.0),
        priced(3, "cherry", 1.0),
    ];
    let tree = category_tree();
    let asc = apply(&snapshot, &sorted(SortKey::TitleAsc), &SelectionState::default(), &tree);
    assert_eq!(ids(&asc), vec![2, 1, 3]);
    let desc = apply(&snapshot, &sorted(SortKey::TitleDesc), &SelectionState::default(), &tree);
    assert_eq!(ids(&desc), vec![3, 1, 2]);
}

#[test]
fn newest_first_orders_by_id_descending_with_missing_ids_last() {
    let mut anonymous = priced(0, "x", 1.0);
    anonymous.id = None;
    let snapshot = vec![priced(3, "c", 1.0), anonymous, priced(9, "i", 1.0)];
    let page = apply(
        &snapshot,
        &sorted(SortKey::NewestFirst),
        &SelectionState::default(),
        &category_tree(),
    );
    assert_eq!(page.items.len(), 3);
    assert_eq!(ids(&page), vec![9, 3]);
    assert!(page.items[2].id.is_none());
}

#[test]
fn relevance_and_rating_keep_snapshot_order() {
    let snapshot = listings();
    let tree = category_tree();
    let expected: Vec<i64> = snapshot.iter().filter_map(|l| l.id).collect();
    for key in [SortKey::Relevance, SortKey::Rating] {
        let page = apply(&snapshot, &sorted(key), &SelectionState::default(), &tree);
        assert_eq!(ids(&page), expected, "{key} reordered listings");
    }
}

#[test]
fn sort_key_parses_kebab_case_names() {
    for key in SortKey::ALL {
        assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
    }
    assert_eq!("PRICE-ASC".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
    assert_eq!("newest-first".parse::<SortKey>().unwrap(), SortKey::NewestFirst);
    assert_eq!("newest".parse::<SortKey>().unwrap(), SortKey::NewestFirst);
    assert!(matches!(
        "cheapest".parse::<SortKey>(),
        Err(CoreError::InvalidSortKey(ref key)) if key == "cheapest"
    ));
}

// -----------------------------------------------------------------------
// Paginate
// -----------------------------------------------------------------------

fn many(count: i64) -> Vec<Listing> {
    (1..=count).map(|id| priced(id, "item", 1.0)).collect()
}

#[test]
fn third_page_of_85_holds_five_items() {
    let snapshot = many(85);
    let query = ListingQuery {
        page: 3,
        ..query()
    };
    let page = apply(&snapshot, &query, &SelectionState::default(), &category_tree());
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.page_count, 3);
    assert_eq!(page.total_count, 85);
    assert_eq!(ids(&page), (81..=85).collect::<Vec<_>>());
}

#[test]
fn page_past_the_end_is_empty() {
    let snapshot = many(85);
    let query = ListingQuery {
        page: 4,
        ..query()
    };
    let page = apply(&snapshot, &query, &SelectionState::default(), &category_tree());
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 85);
    assert_eq!(page.page_count, 3);
}

#[test]
fn page_zero_reads_as_first_page_and_size_zero_as_default() {
    let snapshot = many(45);
    let page = apply(&snapshot, &query(), &SelectionState::default(), &category_tree());
    assert_eq!(page.page, 1);
    assert_eq!(page.items.len(), DEFAULT_PAGE_SIZE);
    assert_eq!(page.page_count, 2);

    let custom = ListingQuery {
        page_size: 10,
        page: 5,
        ..query()
    };
    let page = apply(&snapshot, &custom, &SelectionState::default(), &category_tree());
    assert_eq!(ids(&page), (41..=45).collect::<Vec<_>>());
    assert_eq!(page.page_count, 5);
}

#[test]
fn empty_snapshot_has_zero_pages() {
    let page = apply(&[], &query(), &SelectionState::default(), &category_tree());
    assert_eq!(page.total_count, 0);
    assert_eq!(page.page_count, 0);
    assert!(page.items.is_empty());
}

// -----------------------------------------------------------------------
// Filter stages
// -----------------------------------------------------------------------

#[test]
fn text_filter_matches_title_or_description_case_insensitively() {
    let mut described = priced(2, "Bicycle", 10.0);
    described.description = Some("Barely used MOUNTAIN frame".into());
    let snapshot = vec![priced(1, "Mountain tent", 5.0), described, priced(3, "Sofa", 1.0)];

    let query = ListingQuery {
        text: "MOUNTAIN".into(),
        ..query()
    };
    let page = apply(&snapshot, &query, &SelectionState::default(), &category_tree());
    assert_eq!(ids(&page), vec![1, 2]);
}

#[test]
fn padded_query_keeps_its_whitespace_when_matching() {
    let snapshot = vec![priced(1, "Motorbike", 5.0), priced(2, "Used bike", 6.0)];

    let padded = ListingQuery {
        text: " bike".into(),
        ..query()
    };
    let page = apply(&snapshot, &padded, &SelectionState::default(), &category_tree());
    assert_eq!(ids(&page), vec![2]);

    let bare = ListingQuery {
        text: "bike".into(),
        ..query()
    };
    let page = apply(&snapshot, &bare, &SelectionState::default(), &category_tree());
    assert_eq!(ids(&page), vec![1, 2]);
}

#[test]
fn whitespace_query_is_a_no_op() {
    let snapshot = listings();
    let query = ListingQuery {
        text: "   ".into(),
        ..query()
    };
    let page = apply(&snapshot, &query, &SelectionState::default(), &category_tree());
    assert_eq!(page.total_count, snapshot.len());
}

#[test]
fn price_bounds_are_inclusive_and_drop_unpriced() {
    let mut unpriced = priced(4, "d", 0.0);
    unpriced.price = None;
    let snapshot = vec![
        priced(1, "a", 10.0),
        priced(2, "b", 20.0),
        priced(3, "c", 30.0),
        unpriced,
    ];
    let query = ListingQuery {
        min_price: Some(10.0),
        max_price: Some(20.0),
        ..query()
    };
    let page = apply(&snapshot, &query, &SelectionState::default(), &category_tree());
    assert_eq!(ids(&page), vec![1, 2]);

    let open_ended = ListingQuery {
        min_price: Some(25.0),
        ..ListingQuery::default()
    };
    let page = apply(&snapshot, &open_ended, &SelectionState::default(), &category_tree());
    assert_eq!(ids(&page), vec![3]);
}

#[test]
fn category_selection_filters_at_item_granularity() {
    let tree = category_tree();
    let mut category = CategorySelection::default();
    category.toggle_branch(&tree, &CategoryLookup::named(0, "Phones"));
    let selection = SelectionState {
        category,
        location: LocationSelection::default(),
    };
    let snapshot = listings();
    let page = apply(&snapshot, &query(), &selection, &category_tree());
    assert_eq!(ids(&page), vec![1, 2]);
}

#[test]
fn empty_field_selection_yields_empty_result() {
    let tree = category_tree();
    let mut category = CategorySelection::default();
    category.toggle_branch(&tree, &CategoryLookup::named(0, "Drones"));
    let selection = SelectionState {
        category,
        location: LocationSelection::default(),
    };
    let snapshot = listings();
    let page = apply(&snapshot, &query(), &selection, &category_tree());
    assert_eq!(page.total_count, 0);
    assert!(page.items.is_empty());
}

#[test]
fn location_selection_applies_index_zero_rule() {
    let selection = SelectionState {
        category: CategorySelection::default(),
        location: [CompositeLocationRef::Address { ward: 7, index: 0 }]
            .into_iter()
            .collect(),
    };
    let snapshot = listings();
    let page = apply(&snapshot, &query(), &selection, &category_tree());
    assert_eq!(ids(&page), vec![1, 3]);
}

#[test]
fn category_and_location_stages_compose() {
    let tree = category_tree();
    let mut category = CategorySelection::default();
    category.toggle_branch(&tree, &CategoryLookup::named(0, "Vehicles"));
    let selection = SelectionState {
        category,
        location: [CompositeLocationRef::Ward(9), CompositeLocationRef::Ward(3)]
            .into_iter()
            .collect(),
    };
    let snapshot = listings();
    let page = apply(&snapshot, &query(), &selection, &category_tree());
    assert_eq!(ids(&page), vec![5, 6]);
}

#[test]
fn listing_with_uncoercible_category_never_matches_a_selection() {
    let tree = category_tree();
    let mut orphan = listing(10, 5, 7, None);
    orphan.category_id = None;
    let mut category = CategorySelection::default();
    category.toggle_branch(&tree, &CategoryLookup::named(0, "Electronics"));
    let selection = SelectionState {
        category,
        location: LocationSelection::default(),
    };
    let snapshot = vec![orphan, listing(11, 40, 7, None)];
    let page = apply(&snapshot, &query(), &selection, &tree);
    assert_eq!(ids(&page), vec![11]);
}

#[test]
fn rerunning_with_same_inputs_is_idempotent() {
    let snapshot = listings();
    let tree = category_tree();
    let q = sorted(SortKey::NewestFirst);
    let first = apply(&snapshot, &q, &SelectionState::default(), &tree);
    let second = apply(&snapshot, &q, &SelectionState::default(), &tree);
    assert_eq!(first, second);
}

#[test]
fn query_deserializes_with_defaults() {
    let q: ListingQuery = serde_json::from_str(r#"{"sort":"price-desc"}"#).unwrap();
    assert_eq!(q.sort, SortKey::PriceDesc);
    assert_eq!(q.effective_page(), 1);
    assert_eq!(q.effective_page_size(), DEFAULT_PAGE_SIZE);
}
