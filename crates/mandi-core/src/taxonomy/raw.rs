//! Wire shapes for the category and location payloads.
//!
//! These mirror what the listing backend returns. Every numeric field is
//! coerced leniently and every child list tolerates `null`, absence, or
//! individually malformed entries, so one bad node never sinks the tree.
//!
//! ### Category payload
//! ```json
//! [{ "id": 5, "name": "Electronics",
//!    "field_categories": [{ "id": 12, "name": "Phones",
//!                           "item_categories": [{ "id": 5, "name": "Android" }] }],
//!    "item_categories": [] }]
//! ```
//!
//! ### Location payload
//! ```json
//! [{ "id": 3, "name": "Bagmati", "districts": [{ "id": 27, "name": "Kathmandu",
//!    "localLevels": [{ "id": 270, "name": "Kathmandu Metropolitan", "type": "metropolitan",
//!      "wards": [{ "id": 7, "ward_number": 7, "local_addresses": ["Thamel", "Lazimpat"] }] }] }] }]
//! ```

use serde::Deserialize;

use crate::coerce::{lenient_i64, lenient_string, lenient_strings, lenient_vec};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDomain {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub field_categories: Vec<RawField>,
    /// Legacy shape: items attached straight to the domain.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub item_categories: Vec<RawItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawField {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub item_categories: Vec<RawItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProvince {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub districts: Vec<RawDistrict>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDistrict {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(
        default,
        rename = "localLevels",
        alias = "local_levels",
        deserialize_with = "lenient_vec"
    )]
    pub local_levels: Vec<RawLocalLevel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLocalLevel {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Municipality kind, e.g. `"metropolitan"` or `"rural"`.
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub wards: Vec<RawWard>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWard {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ward_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub local_addresses: Vec<String>,
}
