use crate::core::geo::BoundingBox;
use crate::domain::model::{Amenity, Listing};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const MIN_AIRBNB_PRICE: f64 = 0.0;
pub const MAX_AIRBNB_PRICE: f64 = 100_000.0;

pub const BASIC_AMENITIES: [&str; 9] = [
    "restaurant",
    "fast_food",
    "fuel",
    "atm",
    "bank",
    "pharmacy",
    "clinic",
    "cinema",
    "bar",
];

/// Inclusive price bounds. A bound the user skipped falls back to the
/// `MIN_AIRBNB_PRICE`/`MAX_AIRBNB_PRICE` default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, price: f64) -> bool {
        let min = self.min.unwrap_or(MIN_AIRBNB_PRICE);
        let max = self.max.unwrap_or(MAX_AIRBNB_PRICE);
        min <= price && price <= max
    }
}

/// Quality bar every recommended listing has to pass. Both thresholds are strict.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingCriteria {
    pub min_reviews: u32,
    pub min_review_score: f64,
    pub require_verified_host: bool,
}

impl Default for ListingCriteria {
    fn default() -> Self {
        Self {
            min_reviews: 10,
            min_review_score: 75.0,
            require_verified_host: true,
        }
    }
}

impl ListingCriteria {
    pub fn accepts(&self, listing: &Listing) -> bool {
        let Some(score) = listing.review_score else {
            return false;
        };
        listing.num_reviews > self.min_reviews
            && score > self.min_review_score
            && (!self.require_verified_host || listing.host_identity_verified)
    }
}

pub fn filter_listings(listings: Vec<Listing>, criteria: &ListingCriteria, prices: &PriceRange) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|l| criteria.accepts(l))
        .filter(|l| {
            if !prices.is_active() {
                return true;
            }
            l.price.is_some_and(|p| prices.contains(p))
        })
        .collect()
}

/// Amenities grouped by kind, restricted to the kinds of interest.
#[derive(Debug, Clone, Default)]
pub struct AmenityGroups {
    pub by_kind: BTreeMap<String, Vec<Amenity>>,
    pub all: Vec<Amenity>,
}

impl AmenityGroups {
    /// Count per kind, including kinds with no amenities, sorted by kind.
    pub fn counts(&self) -> Vec<(String, usize)> {
        self.by_kind
            .iter()
            .map(|(kind, items)| (kind.clone(), items.len()))
            .collect()
    }
}

pub fn group_amenities(amenities: &[Amenity], kinds: &[String]) -> AmenityGroups {
    let mut groups = AmenityGroups::default();
    for kind in kinds {
        groups.by_kind.entry(kind.clone()).or_default();
    }

    for amenity in amenities {
        if let Some(bucket) = groups.by_kind.get_mut(&amenity.amenity) {
            bucket.push(amenity.clone());
            groups.all.push(amenity.clone());
        }
    }
    groups
}

/// Listings strictly inside any of the boxes, each reported once, in input order.
pub fn listings_within(listings: &[Listing], boxes: &[BoundingBox]) -> Vec<Listing> {
    let mut seen = HashSet::new();
    listings
        .iter()
        .filter(|l| boxes.iter().any(|b| b.contains(l.location)))
        .filter(|l| seen.insert(l.id))
        .cloned()
        .collect()
}
