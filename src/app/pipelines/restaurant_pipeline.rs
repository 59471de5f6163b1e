use crate::adapters::readers::{decompressed, parse_amenities};
use crate::adapters::storage::archive_artifacts;
use crate::config::RestaurantConfig;
use crate::core::chains::{find_by_name, restaurants, split_chains, ChainSplit, NameMatching};
use crate::core::stats::SpatialSummary;
use crate::core::{Amenity, GeoPoint, LoadReport, Pipeline, Restaurant, Storage};
use crate::render::charts::density_chart;
use crate::render::map::{Layer, LeafletMap, Pin};
use crate::utils::error::{InsightError, Result};
use chrono::Local;
use plotters::style::{BLUE, RED};

use super::{read_input, ARCHIVE_NAME};

/// Chains listed in the text report.
const TOP_CHAINS: usize = 10;

/// Restaurants matching the name the user asked for.
pub struct RestaurantLookup {
    pub query: String,
    pub matches: Vec<Amenity>,
}

pub struct RestaurantAnalysis {
    pub split: ChainSplit,
    pub chain_summary: SpatialSummary,
    pub non_chain_summary: SpatialSummary,
    pub lookup: Option<RestaurantLookup>,
}

pub struct RestaurantPipeline<S: Storage> {
    input: S,
    output: S,
    config: RestaurantConfig,
}

impl<S: Storage> RestaurantPipeline<S> {
    pub fn new(input: S, output: S, config: RestaurantConfig) -> Self {
        Self {
            input,
            output,
            config,
        }
    }

    async fn write(&self, report: &mut LoadReport, name: &str, content: &str) -> Result<()> {
        self.output.write_file(name, content.as_bytes()).await?;
        tracing::info!("📁 {}", name);
        report.record(name);
        Ok(())
    }
}

fn locations(restaurants: &[Restaurant]) -> Vec<GeoPoint> {
    restaurants.iter().map(|r| r.amenity.location()).collect()
}

/// Turns a restaurant name into something safe to use as a file name.
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim().trim_matches('_').to_string();
    if stem.is_empty() {
        "restaurant".to_string()
    } else {
        stem
    }
}

fn write_summary(out: &mut String, label: &str, summary: &SpatialSummary) {
    out.push_str(&format!("{} ({} locations):\n", label, summary.count));
    out.push_str(&format!("    Mean Latitude: {}\n", summary.mean_lat));
    out.push_str(&format!("    Mean Longitude: {}\n\n", summary.mean_lon));
    out.push_str(&format!("    Latitude standard deviation: {}\n", summary.std_lat));
    out.push_str(&format!("    Longitude standard deviation: {}\n\n", summary.std_lon));
}

/// Text report of the chain/non-chain comparison.
pub fn analysis_report(analysis: &RestaurantAnalysis, matching: NameMatching) -> String {
    let mut out = String::from("Statistical Analysis of Restaurants Data\n");
    out.push_str(&format!("Generated: {}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!("Name matching: {:?}\n\n", matching));

    write_summary(&mut out, "Chain restaurants", &analysis.chain_summary);
    write_summary(&mut out, "Non-Chain restaurants", &analysis.non_chain_summary);

    let chains = analysis.split.chain_names(matching);
    out.push_str(&format!("Largest chains ({} in total):\n", chains.len()));
    for (name, branches) in chains.iter().take(TOP_CHAINS) {
        out.push_str(&format!("    {}: {} locations\n", name, branches));
    }
    out
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for RestaurantPipeline<S> {
    type Dataset = Vec<Amenity>;
    type Analysis = RestaurantAnalysis;

    fn name(&self) -> &'static str {
        "restaurants"
    }

    async fn extract(&self) -> Result<Vec<Amenity>> {
        let bytes = read_input(
            &self.input,
            &self.config.paths.input_dir,
            &self.config.amenities_file,
        )
        .await?;
        let amenities = parse_amenities(decompressed(&bytes))?;
        if amenities.is_empty() {
            return Err(InsightError::processing(format!(
                "{} contains no amenities",
                self.config.amenities_file
            )));
        }
        tracing::info!("Loaded {} amenities", amenities.len());
        Ok(amenities)
    }

    async fn transform(&self, data: Vec<Amenity>) -> Result<RestaurantAnalysis> {
        let restaurants = restaurants(&data);
        tracing::info!("Found {} named restaurants", restaurants.len());

        let lookup = self.config.restaurant.as_ref().map(|query| {
            let matches: Vec<Amenity> = find_by_name(&restaurants, query, self.config.name_matching)
                .into_iter()
                .cloned()
                .collect();
            if matches.is_empty() {
                tracing::warn!("No restaurant named '{}' in the dataset", query);
            } else {
                println!("Found {} Vancouver locations of {}", matches.len(), query);
            }
            RestaurantLookup {
                query: query.clone(),
                matches,
            }
        });

        let split = split_chains(restaurants, self.config.name_matching);
        let chain_summary = SpatialSummary::of(&locations(&split.chains));
        let non_chain_summary = SpatialSummary::of(&locations(&split.non_chains));
        println!(
            "Chain restaurants: {}, non-chain restaurants: {}",
            split.chains.len(),
            split.non_chains.len()
        );

        Ok(RestaurantAnalysis {
            split,
            chain_summary,
            non_chain_summary,
            lookup,
        })
    }

    async fn load(&self, analysis: RestaurantAnalysis) -> Result<LoadReport> {
        let mut report = LoadReport::new(self.config.paths.output_dir.clone());
        let chain_points = locations(&analysis.split.chains);
        let non_chain_points = locations(&analysis.split.non_chains);

        let both = LeafletMap::vancouver("Chain and non-chain restaurants")
            .with_layer(Layer::dots(&chain_points, "red", 0.5))
            .with_layer(Layer::dots(&non_chain_points, "blue", 0.5));
        self.write(&mut report, "chain-and-non-chain-locations.html", &both.to_html()?)
            .await?;

        let chain_heat = LeafletMap::vancouver("Chain restaurants").with_layer(Layer::heat(&chain_points));
        self.write(&mut report, "chain-restaurants-heat-map.html", &chain_heat.to_html()?)
            .await?;

        let non_chain_heat =
            LeafletMap::vancouver("Non-chain restaurants").with_layer(Layer::heat(&non_chain_points));
        self.write(&mut report, "non-chain-restaurants-heat-map.html", &non_chain_heat.to_html()?)
            .await?;

        let chain_density = density_chart(&chain_points, RED, "Chain restaurants")?;
        self.write(&mut report, "chain-restaurants-density.svg", &chain_density)
            .await?;

        let non_chain_density = density_chart(&non_chain_points, BLUE, "Non-chain restaurants")?;
        self.write(&mut report, "non-chain-restaurants-density.svg", &non_chain_density)
            .await?;

        let text = analysis_report(&analysis, self.config.name_matching);
        self.write(&mut report, "analysis.txt", &text).await?;
        tracing::info!(
            "Chains centre on ({:.5}, {:.5}), non-chains on ({:.5}, {:.5})",
            analysis.chain_summary.mean_lat,
            analysis.chain_summary.mean_lon,
            analysis.non_chain_summary.mean_lat,
            analysis.non_chain_summary.mean_lon
        );

        if let Some(lookup) = analysis.lookup.as_ref().filter(|l| !l.matches.is_empty()) {
            let stem = file_stem(&lookup.query);
            let points: Vec<GeoPoint> = lookup.matches.iter().map(Amenity::location).collect();

            let pins = LeafletMap::vancouver(&format!("{} locations", lookup.query)).with_layer(Layer::Pins {
                pins: lookup.matches.iter().map(|a| Pin::new(a.location(), &a.name)).collect(),
                clustered: false,
            });
            self.write(&mut report, &format!("{}-locations.html", stem), &pins.to_html()?)
                .await?;

            let heat = LeafletMap::vancouver(&format!("{} heat map", lookup.query))
                .with_layer(Layer::heat(&points));
            self.write(&mut report, &format!("{}-heat-map.html", stem), &heat.to_html()?)
                .await?;
        }

        if self.config.paths.archive {
            archive_artifacts(&self.output, &report.artifacts, ARCHIVE_NAME).await?;
            report.record(ARCHIVE_NAME);
        }

        Ok(report)
    }
}
