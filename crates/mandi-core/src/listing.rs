use serde::{Deserialize, Serialize};

use crate::coerce::{lenient_f64, lenient_i64, lenient_string};

/// One classified ad from the listing snapshot.
///
/// Every numeric field is coerced on the way in; a value that cannot be
/// coerced becomes `None` and the listing simply fails to match the stages
/// that need it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    /// References a category node whose level is not recorded here; matching
    /// happens at item granularity.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub category_id: Option<i64>,
    /// References a ward.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub location_id: Option<i64>,
    /// Position in the ward's address list. Absent means "first address" for
    /// counting and filtering.
    #[serde(default, deserialize_with = "lenient_i64")]
    pub selected_local_address_index: Option<i64>,
}

impl Listing {
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Case-insensitive substring match against title or description.
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title().to_lowercase().contains(needle)
            || self.description().to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_string_ids_and_null_index() {
        let listing: Listing = serde_json::from_str(
            r#"{"id":"3","title":"Bike","description":null,"price":"1500","category_id":"12","location_id":7,"selected_local_address_index":null}"#,
        )
        .unwrap();
        assert_eq!(listing.id, Some(3));
        assert_eq!(listing.price, Some(1500.0));
        assert_eq!(listing.category_id, Some(12));
        assert_eq!(listing.location_id, Some(7));
        assert_eq!(listing.selected_local_address_index, None);
        assert_eq!(listing.description(), "");
    }

    #[test]
    fn non_coercible_fields_become_none() {
        let listing: Listing = serde_json::from_str(
            r#"{"id":1,"title":"X","price":"negotiable","category_id":"phones","location_id":{}}"#,
        )
        .unwrap();
        assert_eq!(listing.price, None);
        assert_eq!(listing.category_id, None);
        assert_eq!(listing.location_id, None);
    }

    #[test]
    fn text_match_checks_title_and_description() {
        let listing = Listing {
            id: Some(1),
            title: Some("Mountain BIKE".to_owned()),
            description: Some("Barely used, Shimano gears".to_owned()),
            price: None,
            category_id: None,
            location_id: None,
            selected_local_address_index: None,
        };
        assert!(listing.matches_text("bike"));
        assert!(listing.matches_text("shimano"));
        assert!(!listing.matches_text("car"));
    }
}
