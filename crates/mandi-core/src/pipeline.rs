//! Listing filter/sort/paginate pipeline.
//!
//! Stages run in a fixed order, each narrowing the previous one:
//! text, price, category, location, sort, paginate. The whole thing is a pure
//! function of its inputs; running it twice yields the same page.

use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::listing::Listing;
use crate::selection::SelectionState;
use crate::taxonomy::CategoryTree;

pub const DEFAULT_PAGE_SIZE: usize = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keeps snapshot order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    TitleAsc,
    TitleDesc,
    /// Id descending. `newest` is accepted as a shorter spelling.
    #[serde(alias = "newest")]
    NewestFirst,
    /// Listings carry no rating yet; keeps snapshot order.
    Rating,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Relevance,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::NewestFirst,
        SortKey::Rating,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Relevance => "relevance",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
            SortKey::NewestFirst => "newest-first",
            SortKey::Rating => "rating",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("newest") {
            return Ok(SortKey::NewestFirst);
        }
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::InvalidSortKey(s.to_owned()))
    }
}

/// Everything about a search that is not selection state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub sort: SortKey,
    /// 1-based; 0 is read as 1.
    #[serde(default)]
    pub page: usize,
    /// 0 falls back to [`DEFAULT_PAGE_SIZE`].
    #[serde(default)]
    pub page_size: usize,
}

impl ListingQuery {
    #[must_use]
    pub fn effective_page(&self) -> usize {
        self.page.max(1)
    }

    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    fn has_price_bounds(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    fn price_in_bounds(&self, listing: &Listing) -> bool {
        let Some(price) = listing.price else {
            return false;
        };
        self.min_price.is_none_or(|min| price >= min) && self.max_price.is_none_or(|max| price <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage<'a> {
    pub items: Vec<&'a Listing>,
    /// Size of the filtered set before slicing.
    pub total_count: usize,
    pub page_count: usize,
    pub page: usize,
}

/// Listings surviving the text and price stages. Facet counts are computed
/// against this set so they do not depend on the current selection.
#[must_use]
pub fn candidates<'a>(listings: &'a [Listing], query: &ListingQuery) -> Vec<&'a Listing> {
    let text_on = !query.text.trim().is_empty();
    let needle = query.text.to_lowercase();
    listings
        .iter()
        .filter(|l| !text_on || l.matches_text(&needle))
        .filter(|l| !query.has_price_bounds() || query.price_in_bounds(l))
        .collect()
}

/// Runs the full pipeline and returns the requested page.
#[must_use]
pub fn apply<'a>(
    listings: &'a [Listing],
    query: &ListingQuery,
    selection: &SelectionState,
    categories: &CategoryTree,
) -> ListingPage<'a> {
    let mut matched = candidates(listings, query);

    if !selection.category.is_empty() {
        let matcher = selection.category.matcher(categories);
        if matcher.is_empty() {
            tracing::debug!("category selection expands to no items; result is empty");
        }
        matched.retain(|l| matcher.matches(l));
    }

    if !selection.location.is_empty() {
        let matcher = selection.location.matcher();
        matched.retain(|l| matcher.matches(l));
    }

    sort_listings(&mut matched, query.sort);
    paginate(matched, query.effective_page(), query.effective_page_size())
}

/// Stable sort in place; ties keep their incoming order.
pub fn sort_listings(listings: &mut [&Listing], key: SortKey) {
    match key {
        SortKey::Relevance | SortKey::Rating => {}
        SortKey::PriceAsc => listings.sort_by(|a, b| by_price(a, b, false)),
        SortKey::PriceDesc => listings.sort_by(|a, b| by_price(a, b, true)),
        SortKey::TitleAsc => listings.sort_by_cached_key(|l| l.title().to_lowercase()),
        SortKey::TitleDesc => listings.sort_by_cached_key(|l| Reverse(l.title().to_lowercase())),
        SortKey::NewestFirst => listings.sort_by_key(|l| (l.id.is_none(), Reverse(l.id))),
    }
}

/// Unpriced listings go last in either direction.
fn by_price(a: &Listing, b: &Listing, descending: bool) -> Ordering {
    match (a.price, b.price) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn paginate<'a>(matched: Vec<&'a Listing>, page: usize, page_size: usize) -> ListingPage<'a> {
    let total_count = matched.len();
    let page_count = total_count.div_ceil(page_size);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    let items = matched.into_iter().skip(start).take(page_size).collect();
    ListingPage {
        items,
        total_count,
        page_count,
        page,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
