//! Chain restaurant detection.
//!
//! Restaurants are grouped by a name key; a key seen at more than one
//! distinct location is a chain.

use crate::domain::model::{Amenity, Restaurant, RestaurantClass};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Amenity kinds that count as restaurants.
pub const RESTAURANT_KINDS: [&str; 3] = ["restaurant", "cafe", "fast_food"];

/// Coordinates are compared at this many decimal places (about a metre).
const LOCATION_PRECISION: f64 = 1e5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NameMatching {
    /// The name as written in the dataset.
    #[default]
    Exact,
    /// Case, punctuation and store numbers ignored.
    Normalized,
}

fn store_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\s*(#\s*\d+|\bno\.?\s*\d+|\bstore\s+\d+)\s*$").expect("valid regex")
    })
}

impl NameMatching {
    pub fn key(self, name: &str) -> String {
        match self {
            NameMatching::Exact => name.to_string(),
            NameMatching::Normalized => {
                let without_number = store_number_pattern().replace(name.trim(), "");
                let cleaned: String = without_number
                    .chars()
                    .map(|c| if c.is_alphanumeric() { c } else { ' ' })
                    .collect::<String>()
                    .to_lowercase();
                let key = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
                // Names with nothing left after normalising keep their own identity.
                if key.is_empty() {
                    name.trim().to_string()
                } else {
                    key
                }
            }
        }
    }
}

fn location_key(amenity: &Amenity) -> (i64, i64) {
    (
        (amenity.lat * LOCATION_PRECISION).round() as i64,
        (amenity.lon * LOCATION_PRECISION).round() as i64,
    )
}

/// Named amenities of a restaurant kind.
pub fn restaurants(amenities: &[Amenity]) -> Vec<Amenity> {
    amenities
        .iter()
        .filter(|a| RESTAURANT_KINDS.contains(&a.amenity.as_str()))
        .filter(|a| !a.name.trim().is_empty())
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct ChainSplit {
    pub chains: Vec<Restaurant>,
    pub non_chains: Vec<Restaurant>,
}

impl ChainSplit {
    pub fn total(&self) -> usize {
        self.chains.len() + self.non_chains.len()
    }

    /// Distinct chain keys, largest first.
    pub fn chain_names(&self, matching: NameMatching) -> Vec<(String, usize)> {
        let mut seen: HashMap<String, (String, usize)> = HashMap::new();
        for restaurant in &self.chains {
            seen.entry(matching.key(&restaurant.amenity.name))
                .or_insert_with(|| (restaurant.amenity.name.clone(), restaurant.total_branches));
        }
        let mut names: Vec<(String, usize)> = seen.into_values().collect();
        names.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        names
    }
}

/// Splits restaurants into chains and non-chains. Every input record ends up
/// in exactly one of the two lists, in input order.
pub fn split_chains(restaurants: Vec<Amenity>, matching: NameMatching) -> ChainSplit {
    let mut branches: HashMap<String, HashSet<(i64, i64)>> = HashMap::new();
    for restaurant in &restaurants {
        branches
            .entry(matching.key(&restaurant.name))
            .or_default()
            .insert(location_key(restaurant));
    }

    let mut split = ChainSplit::default();
    for amenity in restaurants {
        let total_branches = branches
            .get(&matching.key(&amenity.name))
            .map_or(1, HashSet::len);
        let class = if total_branches > 1 {
            RestaurantClass::Chain
        } else {
            RestaurantClass::NonChain
        };
        let restaurant = Restaurant {
            amenity,
            total_branches,
            class,
        };
        match class {
            RestaurantClass::Chain => split.chains.push(restaurant),
            RestaurantClass::NonChain => split.non_chains.push(restaurant),
        }
    }

    tracing::debug!(
        "Split {} restaurants into {} chain and {} non-chain records",
        split.total(),
        split.chains.len(),
        split.non_chains.len()
    );
    split
}

/// All restaurants whose name matches `query` under `matching`.
pub fn find_by_name<'a>(
    restaurants: &'a [Amenity],
    query: &str,
    matching: NameMatching,
) -> Vec<&'a Amenity> {
    let wanted = matching.key(query.trim());
    restaurants
        .iter()
        .filter(|r| matching.key(&r.name) == wanted)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn amenity(name: &str, kind: &str, lat: f64, lon: f64) -> Amenity {
        Amenity {
            lat,
            lon,
            amenity: kind.to_string(),
            name: name.to_string(),
            timestamp: None,
            tags: BTreeMap::new(),
        }
    }

    #[test]
    fn test_restaurants_keeps_named_food_places() {
        let all = vec![
            amenity("Starbucks", "cafe", 49.28, -123.12),
            amenity("RBC", "bank", 49.28, -123.12),
            amenity("", "restaurant", 49.28, -123.12),
            amenity("Vij's", "restaurant", 49.26, -123.13),
            amenity("A&W", "fast_food", 49.25, -123.10),
        ];
        let names: Vec<String> = restaurants(&all).into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["Starbucks", "Vij's", "A&W"]);
    }

    #[test]
    fn test_same_name_at_two_locations_is_a_chain() {
        let input = vec![
            amenity("Starbucks", "cafe", 49.28, -123.12),
            amenity("Vij's", "restaurant", 49.26, -123.13),
            amenity("Starbucks", "cafe", 49.27, -123.10),
        ];
        let split = split_chains(input, NameMatching::Exact);

        assert_eq!(split.total(), 3);
        assert_eq!(split.chains.len(), 2);
        assert!(split.chains.iter().all(|r| r.total_branches == 2));
        assert_eq!(split.non_chains.len(), 1);
        assert_eq!(split.non_chains[0].amenity.name, "Vij's");
        assert_eq!(split.non_chains[0].class, RestaurantClass::NonChain);
    }

    #[test]
    fn test_duplicate_rows_at_one_location_are_not_a_chain() {
        let input = vec![
            amenity("Joe's Diner", "restaurant", 49.280001, -123.12),
            amenity("Joe's Diner", "restaurant", 49.280002, -123.12),
        ];
        let split = split_chains(input, NameMatching::Exact);
        assert!(split.chains.is_empty());
        assert_eq!(split.non_chains.len(), 2);
    }

    #[test]
    fn test_normalized_names_join_variants() {
        assert_eq!(NameMatching::Normalized.key("STARBUCKS #123"), "starbucks");
        assert_eq!(NameMatching::Normalized.key("Starbucks."), "starbucks");
        assert_eq!(NameMatching::Normalized.key("  Tim  Hortons No. 4"), "tim hortons");
        assert_eq!(NameMatching::Exact.key("Starbucks."), "Starbucks.");

        let input = vec![
            amenity("Starbucks", "cafe", 49.28, -123.12),
            amenity("STARBUCKS #123", "cafe", 49.27, -123.10),
        ];
        let exact = split_chains(input.clone(), NameMatching::Exact);
        assert!(exact.chains.is_empty());
        let normalized = split_chains(input, NameMatching::Normalized);
        assert_eq!(normalized.chains.len(), 2);
    }

    #[test]
    fn test_names_without_letters_do_not_form_a_chain() {
        assert_eq!(NameMatching::Normalized.key(" #1 "), "#1");
        assert_eq!(NameMatching::Normalized.key("!!!"), "!!!");

        let input = vec![
            amenity("#1", "restaurant", 49.1, -123.1),
            amenity("!!!", "restaurant", 49.2, -123.1),
        ];
        let split = split_chains(input, NameMatching::Normalized);
        assert!(split.chains.is_empty());
        assert_eq!(split.non_chains.len(), 2);
    }

    #[test]
    fn test_chain_names_sorted_by_branch_count() {
        let input = vec![
            amenity("Subway", "fast_food", 49.1, -123.1),
            amenity("Starbucks", "cafe", 49.2, -123.1),
            amenity("Subway", "fast_food", 49.3, -123.1),
            amenity("Starbucks", "cafe", 49.4, -123.1),
            amenity("Starbucks", "cafe", 49.5, -123.1),
        ];
        let split = split_chains(input, NameMatching::Exact);
        assert_eq!(
            split.chain_names(NameMatching::Exact),
            vec![("Starbucks".to_string(), 3), ("Subway".to_string(), 2)]
        );
    }

    #[test]
    fn test_find_by_name() {
        let input = vec![
            amenity("Starbucks", "cafe", 49.28, -123.12),
            amenity("Blenz", "cafe", 49.27, -123.10),
            amenity("starbucks #5", "cafe", 49.26, -123.11),
        ];
        assert_eq!(find_by_name(&input, "Starbucks", NameMatching::Exact).len(), 1);
        assert_eq!(find_by_name(&input, "starbucks", NameMatching::Normalized).len(), 2);
        assert!(find_by_name(&input, "Tim Hortons", NameMatching::Exact).is_empty());
    }
}
