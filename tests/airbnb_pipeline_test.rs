use anyhow::Result;
use clap::Parser;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use vancouver_insights::config::settings::Settings;
use vancouver_insights::domain::ports::Pipeline;
use vancouver_insights::{
    AirbnbArgs, AirbnbConfig, AirbnbPipeline, EtlEngine, InsightError, LocalStorage,
};

const LISTINGS_HEADER: &str = "id,name,host_id,host_name,host_acceptance_rate,host_identity_verified,latitude,longitude,neighbourhood_cleansed,city,country,zipcode,price,accommodates,minimum_nights,number_of_reviews,review_scores_rating";

fn gzip(content: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn amenity_line(kind: &str, name: &str, lat: f64, lon: f64) -> String {
    serde_json::json!({
        "lat": lat,
        "lon": lon,
        "timestamp": "2019-06-01T12:00:00.000",
        "amenity": kind,
        "name": name,
        "tags": {}
    })
    .to_string()
}

/// Two amenity hot spots (downtown and east side) plus noise that is not a basic amenity.
fn write_fixtures(input_dir: &Path) {
    let mut amenities = Vec::new();
    for (i, kind) in ["bank", "restaurant", "pharmacy", "bar"].iter().enumerate() {
        let offset = i as f64 * 0.001;
        amenities.push(amenity_line(kind, &format!("Downtown {}", kind), 49.280 + offset, -123.120));
        amenities.push(amenity_line(kind, &format!("East {}", kind), 49.230 + offset, -123.030));
    }
    amenities.push(amenity_line("bench", "Park bench", 49.25, -123.10));
    amenities.push(r#"{"lat":49.25,"lon":-123.1,"amenity":"atm","name":null,"tags":{}}"#.to_string());

    let listings = [
        LISTINGS_HEADER,
        "1,Downtown loft,10,Ann,95%,t,49.281,-123.121,Downtown,Vancouver,Canada,V6B,$100.00,2,1,20,90",
        "2,East side suite,11,Bob,80%,t,49.231,-123.031,Renfrew,Vancouver,Canada,V5M,$150.00,3,2,15,88",
        "3,Far away cabin,12,Cy,100%,t,49.000,-122.500,Langley,Langley,Canada,V2Y,$120.00,4,2,30,95",
        "4,Unverified room,13,Di,50%,f,49.281,-123.121,Downtown,Vancouver,Canada,V6B,$90.00,1,1,40,99",
        "5,Luxury penthouse,14,Ed,99%,t,49.282,-123.122,Downtown,Vancouver,Canada,V6B,\"$1,500.00\",6,3,25,97",
    ]
    .join("\n");

    std::fs::write(
        input_dir.join("amenities-vancouver.json.gz"),
        gzip(&amenities.join("\n")),
    )
    .unwrap();
    std::fs::write(input_dir.join("airbnb-listings.csv.gz"), gzip(&listings)).unwrap();
}

fn pipeline_for(temp_dir: &TempDir, extra: &[&str]) -> AirbnbPipeline<LocalStorage> {
    let input = temp_dir.path().to_str().unwrap().to_string();
    let output = temp_dir.path().join("results").to_str().unwrap().to_string();
    let mut argv = vec![
        "airbnb",
        "--no-prompt",
        "--input-dir",
        input.as_str(),
        "--output-dir",
        output.as_str(),
        "--clusters",
        "2",
        "--radius-km",
        "2",
    ];
    argv.extend_from_slice(extra);

    let args = AirbnbArgs::parse_from(argv);
    let config = AirbnbConfig::resolve(&args, &Settings::default());
    AirbnbPipeline::new(
        LocalStorage::new(config.paths.input_dir.clone()),
        LocalStorage::new(config.paths.output_dir.clone()),
        config,
    )
}

#[tokio::test]
async fn test_transform_filters_and_finds_ideal_listings() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_fixtures(temp_dir.path());
    let pipeline = pipeline_for(&temp_dir, &["--max-price", "200"]);

    let dataset = pipeline.extract().await?;
    assert_eq!(dataset.listings.len(), 5);
    assert_eq!(dataset.amenities.len(), 9);

    let analysis = pipeline.transform(dataset).await?;

    assert_eq!(analysis.total_listings, 5);
    let kept: Vec<u64> = analysis.listings.iter().map(|l| l.id).collect();
    assert_eq!(kept, vec![1, 2, 3]);

    assert_eq!(analysis.amenities.all.len(), 8);
    assert_eq!(analysis.clustering.centers.len(), 2);
    assert_eq!(analysis.clustering.cluster_sizes(), vec![4, 4]);

    let ideal: Vec<u64> = analysis.ideal_listings.iter().map(|l| l.id).collect();
    assert_eq!(ideal, vec![1, 2]);
    Ok(())
}

#[tokio::test]
async fn test_without_price_filter_keeps_expensive_listings() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_fixtures(temp_dir.path());
    let pipeline = pipeline_for(&temp_dir, &[]);

    let dataset = pipeline.extract().await?;
    let analysis = pipeline.transform(dataset).await?;

    let kept: Vec<u64> = analysis.listings.iter().map(|l| l.id).collect();
    assert_eq!(kept, vec![1, 2, 3, 5]);
    let ideal: Vec<u64> = analysis.ideal_listings.iter().map(|l| l.id).collect();
    assert_eq!(ideal, vec![1, 2, 5]);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_writes_all_artifacts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_fixtures(temp_dir.path());
    let engine = EtlEngine::new(pipeline_for(&temp_dir, &["--max-price", "200", "--archive"]));

    let report = engine.run().await?;

    let results = temp_dir.path().join("results");
    assert_eq!(report.output_dir, results);
    for artifact in [
        "amenities-bar-chart.svg",
        "amenities-heat-map.html",
        "amenities-heat-map-airbnb-pin.html",
        "amenities-cluster.html",
        "ideal-airbnb-listings.html",
        "results.zip",
    ] {
        assert!(results.join(artifact).exists(), "missing {}", artifact);
        assert!(report.artifacts.contains(&artifact.to_string()));
    }

    let ideal_map = std::fs::read_to_string(results.join("ideal-airbnb-listings.html"))?;
    assert!(ideal_map.contains("Downtown loft"));
    assert!(ideal_map.contains("East side suite"));
    assert!(!ideal_map.contains("Far away cabin"));

    let chart = std::fs::read_to_string(results.join("amenities-bar-chart.svg"))?;
    assert!(chart.contains("Basic amenities"));

    let archive = zip::ZipArchive::new(std::fs::File::open(results.join("results.zip"))?)?;
    assert_eq!(archive.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_missing_dataset_names_the_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let pipeline = pipeline_for(&temp_dir, &[]);

    match pipeline.extract().await {
        Err(InsightError::MissingInputError { file, .. }) => {
            assert_eq!(file, "amenities-vancouver.json.gz");
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("extract should fail without input files"),
    }
    Ok(())
}

#[tokio::test]
async fn test_header_only_listings_is_a_processing_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_fixtures(temp_dir.path());
    std::fs::write(temp_dir.path().join("airbnb-listings.csv.gz"), gzip(LISTINGS_HEADER))?;
    let pipeline = pipeline_for(&temp_dir, &[]);

    let err = match pipeline.extract().await {
        Err(err) => err,
        Ok(_) => panic!("extract should reject an empty listings file"),
    };
    assert!(matches!(err, InsightError::ProcessingError { .. }));
    assert_eq!(err.severity().exit_code(), 1);
    Ok(())
}

#[tokio::test]
async fn test_amenities_without_usable_records_is_a_processing_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write_fixtures(temp_dir.path());
    let unnamed = r#"{"lat":49.25,"lon":-123.1,"amenity":"bank","name":null,"tags":{}}"#;
    std::fs::write(temp_dir.path().join("amenities-vancouver.json.gz"), gzip(unnamed))?;
    let pipeline = pipeline_for(&temp_dir, &[]);

    let err = match pipeline.extract().await {
        Err(err) => err,
        Ok(_) => panic!("extract should reject an amenities file without usable records"),
    };
    assert!(matches!(err, InsightError::ProcessingError { .. }));
    assert!(err.to_string().contains("amenities-vancouver.json.gz"));
    Ok(())
}
