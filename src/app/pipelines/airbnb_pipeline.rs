use crate::adapters::readers::{decompressed, parse_amenities, parse_listings};
use crate::adapters::storage::archive_artifacts;
use crate::config::AirbnbConfig;
use crate::core::cluster::{kmeans, Clustering};
use crate::core::filter::{filter_listings, group_amenities, listings_within, AmenityGroups};
use crate::core::geo::BoundingBox;
use crate::core::{Amenity, GeoPoint, Listing, LoadReport, Pipeline, Storage};
use crate::render::charts::bar_chart;
use crate::render::map::{cluster_color, Dot, Layer, LeafletMap, Pin};
use crate::utils::error::{InsightError, Result};

use super::{read_input, ARCHIVE_NAME};

pub struct AirbnbDataset {
    pub listings: Vec<Listing>,
    pub amenities: Vec<Amenity>,
}

pub struct AirbnbAnalysis {
    pub total_listings: usize,
    pub listings: Vec<Listing>,
    pub amenities: AmenityGroups,
    pub clustering: Clustering,
    pub ideal_listings: Vec<Listing>,
}

pub struct AirbnbPipeline<S: Storage> {
    input: S,
    output: S,
    config: AirbnbConfig,
}

impl<S: Storage> AirbnbPipeline<S> {
    pub fn new(input: S, output: S, config: AirbnbConfig) -> Self {
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

fn listing_pins(listings: &[Listing]) -> Layer {
    Layer::Pins {
        pins: listings.iter().map(|l| Pin::new(l.location, &l.name)).collect(),
        clustered: true,
    }
}

fn cluster_dots(points: &[Amenity], clustering: &Clustering) -> Layer {
    Layer::Dots {
        dots: points
            .iter()
            .zip(&clustering.assignments)
            .map(|(amenity, &cluster)| Dot {
                lat: amenity.lat,
                lon: amenity.lon,
                color: cluster_color(cluster).to_string(),
            })
            .collect(),
        radius: 1.0,
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for AirbnbPipeline<S> {
    type Dataset = AirbnbDataset;
    type Analysis = AirbnbAnalysis;

    fn name(&self) -> &'static str {
        "airbnb"
    }

    async fn extract(&self) -> Result<AirbnbDataset> {
        let dir = &self.config.paths.input_dir;
        let amenities_bytes = read_input(&self.input, dir, &self.config.amenities_file).await?;
        let listings_bytes = read_input(&self.input, dir, &self.config.listings_file).await?;

        let amenities = parse_amenities(decompressed(&amenities_bytes))?;
        if amenities.is_empty() {
            return Err(InsightError::processing(format!(
                "{} contains no amenities",
                self.config.amenities_file
            )));
        }
        let listings = parse_listings(decompressed(&listings_bytes))?;
        if listings.is_empty() {
            return Err(InsightError::processing(format!(
                "{} contains no listings",
                self.config.listings_file
            )));
        }
        tracing::info!(
            "Loaded {} listings and {} amenities",
            listings.len(),
            amenities.len()
        );

        Ok(AirbnbDataset {
            listings,
            amenities,
        })
    }

    async fn transform(&self, data: AirbnbDataset) -> Result<AirbnbAnalysis> {
        let total_listings = data.listings.len();
        println!("\nTotal Airbnb listings: {}", total_listings);

        let listings = filter_listings(data.listings, &self.config.criteria, &self.config.prices);
        println!("Remaining Airbnb listings after filtering: {}", listings.len());

        let amenities = group_amenities(&data.amenities, &self.config.basic_amenities);
        tracing::debug!("{} amenities of interest", amenities.all.len());

        let points: Vec<GeoPoint> = amenities.all.iter().map(Amenity::location).collect();
        let clustering = kmeans(&points, self.config.clusters);

        let boxes = clustering
            .centers
            .iter()
            .map(|center| BoundingBox::around(*center, self.config.radius_km))
            .collect::<Result<Vec<_>>>()?;
        let ideal_listings = listings_within(&listings, &boxes);
        println!("Total ideal Airbnb listings: {}", ideal_listings.len());

        Ok(AirbnbAnalysis {
            total_listings,
            listings,
            amenities,
            clustering,
            ideal_listings,
        })
    }

    async fn load(&self, analysis: AirbnbAnalysis) -> Result<LoadReport> {
        let mut report = LoadReport::new(self.config.paths.output_dir.clone());
        let all_points: Vec<GeoPoint> = analysis.amenities.all.iter().map(Amenity::location).collect();

        let chart = bar_chart(&analysis.amenities.counts(), "Basic amenities", "Amenities", "Count")?;
        self.write(&mut report, "amenities-bar-chart.svg", &chart).await?;

        let heat_map = LeafletMap::vancouver("Amenities heat map").with_layer(Layer::heat(&all_points));
        self.write(&mut report, "amenities-heat-map.html", &heat_map.to_html()?)
            .await?;

        let pinned = LeafletMap::vancouver("Amenities and Airbnb listings")
            .with_layer(listing_pins(&analysis.listings))
            .with_layer(Layer::heat(&all_points));
        self.write(&mut report, "amenities-heat-map-airbnb-pin.html", &pinned.to_html()?)
            .await?;

        let cluster_layer = cluster_dots(&analysis.amenities.all, &analysis.clustering);
        let clusters = LeafletMap::vancouver("Amenity clusters").with_layer(cluster_layer.clone());
        self.write(&mut report, "amenities-cluster.html", &clusters.to_html()?)
            .await?;

        let ideal = LeafletMap::vancouver("Ideal Airbnb listings")
            .with_layer(cluster_layer)
            .with_layer(listing_pins(&analysis.ideal_listings));
        self.write(&mut report, "ideal-airbnb-listings.html", &ideal.to_html()?)
            .await?;

        if self.config.paths.archive {
            archive_artifacts(&self.output, &report.artifacts, ARCHIVE_NAME).await?;
            report.record(ARCHIVE_NAME);
        }

        tracing::info!(
            "Kept {} of {} listings, {} near amenity clusters",
            analysis.listings.len(),
            analysis.total_listings,
            analysis.ideal_listings.len()
        );
        Ok(report)
    }
}
