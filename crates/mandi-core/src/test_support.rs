//! Shared fixtures for unit tests.

use serde_json::json;

use crate::listing::Listing;
use crate::taxonomy::{category_tree_from_value, location_tree_from_value, CategoryTree, LocationTree};

/// Category ids deliberately collide across levels: domain 5, item 5 and
/// field 5 all exist, as do field 12 and item 12.
pub(crate) fn category_tree() -> CategoryTree {
    category_tree_from_value(json!([
        {
            "id": 5, "name": "Electronics",
            "field_categories": [
                {"id": 12, "name": "Phones", "item_categories": [
                    {"id": 5, "name": "Android"},
                    {"id": 13, "name": "iPhone"}
                ]},
                {"id": 14, "name": "Drones", "item_categories": []}
            ],
            "item_categories": [{"id": 40, "name": "Cables"}]
        },
        {
            "id": 1, "name": "Vehicles",
            "field_categories": [
                {"id": 5, "name": "Cars", "item_categories": [
                    {"id": 12, "name": "Sedan"},
                    {"id": 100, "name": "Hatchback"}
                ]},
                {"id": 6, "name": "Bikes", "item_categories": [
                    {"id": 101, "name": "Mountain"}
                ]}
            ]
        },
        {
            "id": 2, "name": "Legacy",
            "item_categories": [{"id": 200, "name": "Antiques"}]
        }
    ]))
}

pub(crate) fn location_tree() -> LocationTree {
    location_tree_from_value(json!([
        {
            "id": 3, "name": "Bagmati",
            "districts": [{
                "id": 27, "name": "Kathmandu",
                "localLevels": [
                    {"id": 270, "name": "Kathmandu Metropolitan", "type": "metropolitan", "wards": [
                        {"id": 7, "ward_number": 7, "local_addresses": ["Thamel", "Lazimpat", "Baluwatar"]},
                        {"id": 8, "ward_number": 8, "local_addresses": []}
                    ]},
                    {"id": 271, "name": "Kirtipur", "type": "municipality", "wards": [
                        {"id": 9, "ward_number": 1, "local_addresses": ["Naya Bazar"]}
                    ]}
                ]
            }]
        },
        {
            "id": 1, "name": "Koshi",
            "districts": [{
                "id": 1, "name": "Morang",
                "localLevels": [{"id": 10, "name": "Biratnagar", "type": "metropolitan", "wards": [
                    {"id": 3, "ward_number": 3, "local_addresses": ["Traffic Chowk"]}
                ]}]
            }]
        }
    ]))
}

pub(crate) fn listing(id: i64, category: i64, ward: i64, index: Option<i64>) -> Listing {
    Listing {
        id: Some(id),
        title: Some(format!("Listing {id}")),
        description: None,
        price: None,
        category_id: Some(category),
        location_id: Some(ward),
        selected_local_address_index: index,
    }
}

pub(crate) fn priced(id: i64, title: &str, price: f64) -> Listing {
    Listing {
        id: Some(id),
        title: Some(title.to_owned()),
        description: None,
        price: Some(price),
        category_id: None,
        location_id: None,
        selected_local_address_index: None,
    }
}

/// A mixed snapshot touching every branch of both fixture trees.
pub(crate) fn listings() -> Vec<Listing> {
    vec![
        listing(1, 5, 7, Some(0)),
        listing(2, 13, 7, Some(1)),
        listing(3, 40, 7, None),
        listing(4, 12, 8, None),
        listing(5, 100, 9, Some(0)),
        listing(6, 101, 3, Some(0)),
        listing(7, 200, 7, Some(2)),
        listing(8, 999, 7, Some(1)),
    ]
}
