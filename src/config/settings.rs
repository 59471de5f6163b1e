use crate::core::chains::NameMatching;
use crate::core::filter::{ListingCriteria, BASIC_AMENITIES};
use crate::utils::error::{InsightError, Result};
use crate::utils::validation::{
    validate_non_empty_list, validate_path, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_DIR: &str = "input";
pub const DEFAULT_OUTPUT_DIR: &str = "results";
pub const DEFAULT_LISTINGS_FILE: &str = "airbnb-listings.csv.gz";
pub const DEFAULT_AMENITIES_FILE: &str = "amenities-vancouver.json.gz";

/// Optional TOML settings file. Every section and key may be omitted.
///
/// ```toml
/// [input]
/// dir = "${DATA_DIR}/vancouver"
///
/// [airbnb]
/// clusters = 8
/// radius_km = 3.0
///
/// [airbnb.criteria]
/// min_reviews = 5
///
/// [restaurants]
/// name_matching = "normalized"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input: InputSettings,
    pub output: OutputSettings,
    pub airbnb: AirbnbSettings,
    pub restaurants: RestaurantSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub dir: PathBuf,
    pub listings_file: String,
    pub amenities_file: String,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_INPUT_DIR),
            listings_file: DEFAULT_LISTINGS_FILE.to_string(),
            amenities_file: DEFAULT_AMENITIES_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub archive: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            archive: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirbnbSettings {
    pub basic_amenities: Vec<String>,
    pub clusters: usize,
    pub radius_km: f64,
    pub criteria: ListingCriteria,
}

impl Default for AirbnbSettings {
    fn default() -> Self {
        Self {
            basic_amenities: BASIC_AMENITIES.iter().map(|k| k.to_string()).collect(),
            clusters: 10,
            radius_km: 5.0,
            criteria: ListingCriteria::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantSettings {
    pub name_matching: NameMatching,
}

impl Settings {
    /// Reads and parses a TOML settings file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            InsightError::config(format!(
                "Cannot read settings file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content)
            .map_err(|e| InsightError::config(format!("TOML parsing error: {}", e)))
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("valid regex");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// Loads `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!("Loading settings from {}", path.display());
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("input.dir", &self.input.dir)?;
        validate_path("output.dir", &self.output.dir)?;
        validate_positive_number("airbnb.clusters", self.airbnb.clusters, 1)?;
        validate_range("airbnb.radius_km", self.airbnb.radius_km, f64::MIN_POSITIVE, 1000.0)?;
        validate_non_empty_list("airbnb.basic_amenities", &self.airbnb.basic_amenities)?;
        validate_range(
            "airbnb.criteria.min_review_score",
            self.airbnb.criteria.min_review_score,
            0.0,
            100.0,
        )?;
        Ok(())
    }
}
