pub mod settings;

use crate::core::chains::NameMatching;
use crate::core::filter::{ListingCriteria, PriceRange};
use crate::utils::error::Result;
use crate::utils::prompt::{self, Prompter};
use crate::utils::validation::{
    validate_data_file, validate_not_below, validate_positive_number, validate_range, Validate,
};
use clap::{Args, Parser};
use settings::Settings;
use std::path::{Path, PathBuf};

/// Flags shared by both binaries.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Directory holding the datasets
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Directory the results are written to (created when missing)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Never ask questions on the terminal
    #[arg(long)]
    pub no_prompt: bool,

    /// Also pack every artifact into results.zip
    #[arg(long)]
    pub archive: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Log as JSON lines on stderr
    #[arg(long)]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "airbnb")]
#[command(about = "Recommends Vancouver Airbnb listings with good amenities nearby")]
pub struct AirbnbArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Listings CSV, relative to the input directory
    #[arg(long)]
    pub listings_file: Option<String>,

    /// Amenities JSON lines, relative to the input directory
    #[arg(long)]
    pub amenities_file: Option<String>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// Number of amenity clusters
    #[arg(long)]
    pub clusters: Option<usize>,

    /// Half side of the box around each cluster centre, in km
    #[arg(long)]
    pub radius_km: Option<f64>,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "restaurants")]
#[command(about = "Compares chain and non-chain restaurant locations in Vancouver")]
pub struct RestaurantArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Amenities JSON lines, relative to the input directory
    #[arg(long)]
    pub amenities_file: Option<String>,

    /// Restaurant to locate, e.g. Starbucks
    #[arg(long)]
    pub restaurant: Option<String>,

    #[arg(long, value_enum)]
    pub name_matching: Option<NameMatching>,
}

/// Where a run reads from and writes to.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub archive: bool,
}

impl RunPaths {
    fn resolve(common: &CommonArgs, settings: &Settings) -> Self {
        Self {
            input_dir: common.input_dir.clone().unwrap_or_else(|| settings.input.dir.clone()),
            output_dir: common.output_dir.clone().unwrap_or_else(|| settings.output.dir.clone()),
            archive: common.archive || settings.output.archive,
        }
    }
}

/// Fully resolved configuration of an `airbnb` run.
#[derive(Debug, Clone)]
pub struct AirbnbConfig {
    pub paths: RunPaths,
    pub listings_file: String,
    pub amenities_file: String,
    pub basic_amenities: Vec<String>,
    pub criteria: ListingCriteria,
    pub prices: PriceRange,
    pub clusters: usize,
    pub radius_km: f64,
}

impl AirbnbConfig {
    /// Flags win over the settings file, which wins over defaults.
    pub fn resolve(args: &AirbnbArgs, settings: &Settings) -> Self {
        Self {
            paths: RunPaths::resolve(&args.common, settings),
            listings_file: args
                .listings_file
                .clone()
                .unwrap_or_else(|| settings.input.listings_file.clone()),
            amenities_file: args
                .amenities_file
                .clone()
                .unwrap_or_else(|| settings.input.amenities_file.clone()),
            basic_amenities: settings.airbnb.basic_amenities.clone(),
            criteria: settings.airbnb.criteria.clone(),
            prices: PriceRange {
                min: args.min_price,
                max: args.max_price,
            },
            clusters: args.clusters.unwrap_or(settings.airbnb.clusters),
            radius_km: args.radius_km.unwrap_or(settings.airbnb.radius_km),
        }
    }

    /// Asks for each price bound not given on the command line. A prompted
    /// bound that contradicts the other one is dropped with a warning.
    pub fn prompt_for_prices<P: Prompter + ?Sized>(&mut self, prompter: &mut P) {
        let ask_min = self.prices.min.is_none();
        let ask_max = self.prices.max.is_none();
        if ask_min {
            self.prices.min = prompt::ask_price(prompter, "Optional - Enter minimum Airbnb price ($)");
        }
        if ask_max {
            self.prices.max = prompt::ask_price(prompter, "Optional - Enter maximum Airbnb price ($)");
        }

        if let (Some(min), Some(max)) = (self.prices.min, self.prices.max) {
            if min > max && (ask_min || ask_max) {
                tracing::warn!(
                    "Minimum price {} is above maximum price {}, ignoring the entered price bounds",
                    min,
                    max
                );
                if ask_min {
                    self.prices.min = None;
                }
                if ask_max {
                    self.prices.max = None;
                }
            }
        }
    }
}

impl Validate for AirbnbConfig {
    fn validate(&self) -> Result<()> {
        validate_data_file("listings_file", Path::new(&self.listings_file), &["csv"])?;
        validate_data_file("amenities_file", Path::new(&self.amenities_file), &["json", "jsonl"])?;
        validate_positive_number("clusters", self.clusters, 1)?;
        validate_range("radius_km", self.radius_km, f64::MIN_POSITIVE, 1000.0)?;
        if let Some(min) = self.prices.min {
            validate_not_below("min_price", min, 0.0, "0")?;
        }
        if let Some(max) = self.prices.max {
            match self.prices.min {
                Some(min) => validate_not_below("max_price", max, min, &format!("min_price ({})", min))?,
                None => validate_not_below("max_price", max, 0.0, "0")?,
            }
        }
        Ok(())
    }
}

/// Fully resolved configuration of a `restaurants` run.
#[derive(Debug, Clone)]
pub struct RestaurantConfig {
    pub paths: RunPaths,
    pub amenities_file: String,
    pub name_matching: NameMatching,
    pub restaurant: Option<String>,
}

impl RestaurantConfig {
    pub fn resolve(args: &RestaurantArgs, settings: &Settings) -> Self {
        Self {
            paths: RunPaths::resolve(&args.common, settings),
            amenities_file: args
                .amenities_file
                .clone()
                .unwrap_or_else(|| settings.input.amenities_file.clone()),
            name_matching: args.name_matching.unwrap_or(settings.restaurants.name_matching),
            restaurant: args
                .restaurant
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }

    pub fn prompt_for_restaurant<P: Prompter + ?Sized>(&mut self, prompter: &mut P) {
        if self.restaurant.is_some() {
            return;
        }
        self.restaurant = prompter
            .ask("Optional - Enter restaurant name to find all its Vancouver locations (e.g. Starbucks)");
    }
}

impl Validate for RestaurantConfig {
    fn validate(&self) -> Result<()> {
        validate_data_file("amenities_file", Path::new(&self.amenities_file), &["json", "jsonl"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::prompt::ScriptedPrompter;

    #[test]
    fn test_airbnb_flags_override_settings() {
        let args = AirbnbArgs::parse_from([
            "airbnb",
            "--input-dir",
            "data",
            "--clusters",
            "3",
            "--min-price",
            "40",
        ]);
        let mut settings = Settings::default();
        settings.airbnb.radius_km = 2.0;

        let config = AirbnbConfig::resolve(&args, &settings);

        assert_eq!(config.paths.input_dir, PathBuf::from("data"));
        assert_eq!(config.paths.output_dir, PathBuf::from("results"));
        assert_eq!(config.clusters, 3);
        assert_eq!(config.radius_km, 2.0);
        assert_eq!(config.prices.min, Some(40.0));
        assert_eq!(config.listings_file, "airbnb-listings.csv.gz");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_price_flag_suppresses_only_its_own_prompt() {
        let args = AirbnbArgs::parse_from(["airbnb", "--max-price", "200"]);
        let mut config = AirbnbConfig::resolve(&args, &Settings::default());
        let mut prompter = ScriptedPrompter::new(&["50"]);

        config.prompt_for_prices(&mut prompter);

        assert_eq!(prompter.asked.len(), 1);
        assert!(prompter.asked[0].contains("minimum"));
        assert_eq!(config.prices.min, Some(50.0));
        assert_eq!(config.prices.max, Some(200.0));
    }

    #[test]
    fn test_both_price_flags_suppress_prompts() {
        let args = AirbnbArgs::parse_from(["airbnb", "--min-price", "10", "--max-price", "200"]);
        let mut config = AirbnbConfig::resolve(&args, &Settings::default());
        let mut prompter = ScriptedPrompter::new(&["1", "2"]);

        config.prompt_for_prices(&mut prompter);

        assert!(prompter.asked.is_empty());
        assert_eq!(config.prices.min, Some(10.0));
    }

    #[test]
    fn test_prompted_prices_and_invalid_answers() {
        let args = AirbnbArgs::parse_from(["airbnb"]);
        let mut config = AirbnbConfig::resolve(&args, &Settings::default());
        let mut prompter = ScriptedPrompter::new(&["$75", "lots"]);

        config.prompt_for_prices(&mut prompter);

        assert_eq!(config.prices.min, Some(75.0));
        assert_eq!(config.prices.max, None);
    }

    #[test]
    fn test_inverted_prompted_prices_skip_the_filter() {
        let args = AirbnbArgs::parse_from(["airbnb"]);
        let mut config = AirbnbConfig::resolve(&args, &Settings::default());
        let mut prompter = ScriptedPrompter::new(&["300", "100"]);

        config.prompt_for_prices(&mut prompter);

        assert!(!config.prices.is_active());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_prompted_bound_contradicting_a_flag_is_dropped() {
        let args = AirbnbArgs::parse_from(["airbnb", "--max-price", "100"]);
        let mut config = AirbnbConfig::resolve(&args, &Settings::default());
        let mut prompter = ScriptedPrompter::new(&["300"]);

        config.prompt_for_prices(&mut prompter);

        assert_eq!(config.prices.min, None);
        assert_eq!(config.prices.max, Some(100.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_price_flags_are_invalid() {
        let args = AirbnbArgs::parse_from(["airbnb", "--min-price", "300", "--max-price", "100"]);
        let config = AirbnbConfig::resolve(&args, &Settings::default());

        let err = config.validate().unwrap_err();

        assert_eq!(err.severity().exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "Invalid value '100' for max_price: Value must not be below min_price (300)"
        );
    }

    #[test]
    fn test_negative_price_flag_is_invalid() {
        let args = AirbnbArgs::parse_from(["airbnb", "--min-price=-5"]);
        let config = AirbnbConfig::resolve(&args, &Settings::default());
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value '-5' for min_price: Value must not be below 0"
        );
    }

    #[test]
    fn test_restaurant_config() {
        let args = RestaurantArgs::parse_from(["restaurants", "--name-matching", "normalized", "--restaurant", "  "]);
        let mut config = RestaurantConfig::resolve(&args, &Settings::default());
        assert_eq!(config.name_matching, NameMatching::Normalized);
        assert_eq!(config.restaurant, None);

        config.prompt_for_restaurant(&mut ScriptedPrompter::new(&["Starbucks"]));
        assert_eq!(config.restaurant.as_deref(), Some("Starbucks"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_restaurant_flag_suppresses_prompt() {
        let args = RestaurantArgs::parse_from(["restaurants", "--restaurant", "Subway"]);
        let mut config = RestaurantConfig::resolve(&args, &Settings::default());
        let mut prompter = ScriptedPrompter::new(&["Starbucks"]);

        config.prompt_for_restaurant(&mut prompter);

        assert!(prompter.asked.is_empty());
        assert_eq!(config.restaurant.as_deref(), Some("Subway"));
    }
}
