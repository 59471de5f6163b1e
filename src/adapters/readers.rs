//! Dataset decoders: Airbnb listings CSV and OpenStreetMap amenities JSON lines,
//! either of which may be gzip-compressed.

use crate::domain::model::{Amenity, GeoPoint, Listing};
use crate::utils::error::{InsightError, Result};
use flate2::read::MultiGzDecoder;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Read};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Wraps `bytes` in a gzip decoder when they start with the gzip magic number.
pub fn decompressed(bytes: &[u8]) -> Box<dyn BufRead + '_> {
    if bytes.starts_with(&GZIP_MAGIC) {
        Box::new(BufReader::new(MultiGzDecoder::new(bytes)))
    } else {
        Box::new(bytes)
    }
}

fn parse_number(text: &str, strip: &[char]) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| !strip.contains(c)).collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `$1,250.00` -> 1250.0
pub fn parse_price(text: &str) -> Option<f64> {
    parse_number(text, &['$', ','])
}

/// `95%` -> 95.0
pub fn parse_percent(text: &str) -> Option<f64> {
    parse_number(text, &['%'])
}

fn parse_count<T: std::str::FromStr>(text: &Option<String>) -> Option<T> {
    let text = text.as_deref()?.trim();
    text.parse::<T>()
        .ok()
        // Some exports write integers as floats ("2.0").
        .or_else(|| text.parse::<f64>().ok().and_then(|f| format!("{}", f.trunc()).parse().ok()))
}

#[derive(Debug, Deserialize)]
struct RawListing {
    id: Option<String>,
    name: Option<String>,
    host_id: Option<String>,
    host_name: Option<String>,
    host_acceptance_rate: Option<String>,
    host_identity_verified: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    #[serde(rename = "neighbourhood_cleansed")]
    neighbourhood: Option<String>,
    city: Option<String>,
    country: Option<String>,
    zipcode: Option<String>,
    price: Option<String>,
    accommodates: Option<String>,
    #[serde(rename = "minimum_nights")]
    min_nights: Option<String>,
    #[serde(rename = "number_of_reviews")]
    num_reviews: Option<String>,
    #[serde(rename = "review_scores_rating")]
    review_score: Option<String>,
}

impl RawListing {
    fn into_listing(self) -> Option<Listing> {
        let id = parse_count::<u64>(&self.id)?;
        let lat = self.latitude.as_deref().and_then(|t| t.trim().parse::<f64>().ok())?;
        let lon = self.longitude.as_deref().and_then(|t| t.trim().parse::<f64>().ok())?;

        Some(Listing {
            id,
            name: self.name.unwrap_or_default(),
            host_id: parse_count(&self.host_id),
            host_name: self.host_name.unwrap_or_default(),
            host_acceptance_rate: self.host_acceptance_rate.as_deref().and_then(parse_percent),
            host_identity_verified: self.host_identity_verified.as_deref().map(str::trim) == Some("t"),
            location: GeoPoint::new(lat, lon),
            neighbourhood: self.neighbourhood.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            zipcode: self.zipcode.unwrap_or_default(),
            price: self.price.as_deref().and_then(parse_price),
            accommodates: parse_count(&self.accommodates),
            min_nights: parse_count(&self.min_nights),
            num_reviews: parse_count(&self.num_reviews).unwrap_or(0),
            review_score: self.review_score.as_deref().and_then(|t| t.trim().parse().ok()),
        })
    }
}

/// Reads listings from CSV with a header row. Rows without an id or
/// coordinates are skipped with a warning.
pub fn parse_listings<R: Read>(reader: R) -> Result<Vec<Listing>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut listings = Vec::new();
    let mut skipped = 0usize;
    for result in csv_reader.deserialize::<RawListing>() {
        match result?.into_listing() {
            Some(listing) => listings.push(listing),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} listings without an id or coordinates", skipped);
    }
    tracing::debug!("Parsed {} listings", listings.len());
    Ok(listings)
}

#[derive(Debug, Deserialize)]
struct RawAmenity {
    lat: Option<f64>,
    lon: Option<f64>,
    amenity: Option<String>,
    name: Option<String>,
    timestamp: Option<String>,
    #[serde(default)]
    tags: Option<BTreeMap<String, serde_json::Value>>,
}

/// Reads one JSON object per line. Records missing a name, kind or
/// coordinate are dropped; malformed JSON is an error naming the line.
pub fn parse_amenities<R: BufRead>(reader: R) -> Result<Vec<Amenity>> {
    let mut amenities = Vec::new();
    let mut dropped = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let raw: RawAmenity = serde_json::from_str(&line).map_err(|source| InsightError::JsonLineError {
            line: index + 1,
            source,
        })?;

        match (raw.lat, raw.lon, raw.amenity, raw.name) {
            (Some(lat), Some(lon), Some(amenity), Some(name)) if !name.trim().is_empty() => {
                amenities.push(Amenity {
                    lat,
                    lon,
                    amenity,
                    name,
                    timestamp: raw.timestamp,
                    tags: raw.tags.unwrap_or_default(),
                });
            }
            _ => dropped += 1,
        }
    }

    tracing::debug!(
        "Parsed {} amenities, dropped {} incomplete records",
        amenities.len(),
        dropped
    );
    Ok(amenities)
}
