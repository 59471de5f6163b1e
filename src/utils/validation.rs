use crate::utils::error::{InsightError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> InsightError {
    InsightError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let display = path.display().to_string();
    if display.is_empty() {
        return Err(invalid(field_name, display, "Path cannot be empty"));
    }

    if display.contains('\0') {
        return Err(invalid(field_name, display, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN fails both comparisons, so test for containment instead of exclusion.
    if !(value >= min && value <= max) {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// `value` must be a number no smaller than `floor`; `floor_name` is how the
/// floor is described to the user.
pub fn validate_not_below(field_name: &str, value: f64, floor: f64, floor_name: &str) -> Result<()> {
    if value.is_nan() {
        return Err(invalid(field_name, value, "Value must be a number"));
    }
    if value < floor {
        return Err(invalid(
            field_name,
            value,
            format!("Value must not be below {}", floor_name),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_list(field_name: &str, values: &[String]) -> Result<()> {
    if values.iter().all(|v| v.trim().is_empty()) {
        return Err(invalid(field_name, "[]", "At least one value is required"));
    }
    Ok(())
}

/// Accepts `name.<ext>` and `name.<ext>.gz` for any of the allowed extensions.
pub fn validate_data_file(field_name: &str, path: &Path, allowed_extensions: &[&str]) -> Result<()> {
    validate_path(field_name, path)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| invalid(field_name, path.display(), "Invalid file name"))?;
    let stem = file_name.strip_suffix(".gz").unwrap_or(file_name);

    let extension = Path::new(stem).extension().and_then(|ext| ext.to_str());
    match extension {
        Some(ext) if allowed_extensions.contains(&ext) => Ok(()),
        Some(ext) => Err(invalid(
            field_name,
            file_name,
            format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                ext,
                allowed_extensions.join(", ")
            ),
        )),
        None => Err(invalid(
            field_name,
            file_name,
            "File has no extension or invalid filename",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("clusters", 5, 1).is_ok());
        assert!(validate_positive_number("clusters", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range_rejects_nan() {
        assert!(validate_range("latitude", 49.2, -90.0, 90.0).is_ok());
        assert!(validate_range("latitude", 91.0, -90.0, 90.0).is_err());
        assert!(validate_range("latitude", f64::NAN, -90.0, 90.0).is_err());
    }

    #[test]
    fn test_validate_not_below_names_the_floor() {
        assert!(validate_not_below("min_price", 0.0, 0.0, "0").is_ok());
        assert!(validate_not_below("min_price", f64::NAN, 0.0, "0").is_err());

        let err = validate_not_below("max_price", 100.0, 300.0, "min_price (300)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value '100' for max_price: Value must not be below min_price (300)"
        );
    }

    #[test]
    fn test_validate_data_file() {
        let csv = Path::new("input/airbnb-listings.csv.gz");
        assert!(validate_data_file("listings_file", csv, &["csv"]).is_ok());
        assert!(validate_data_file("listings_file", Path::new("listings.csv"), &["csv"]).is_ok());
        assert!(validate_data_file("listings_file", Path::new("listings.txt"), &["csv"]).is_err());
        assert!(validate_data_file("amenities_file", Path::new("amenities"), &["json"]).is_err());
    }

    #[test]
    fn test_validate_non_empty_list() {
        assert!(validate_non_empty_list("amenities", &["bank".to_string()]).is_ok());
        assert!(validate_non_empty_list("amenities", &[" ".to_string()]).is_err());
        assert!(validate_non_empty_list("amenities", &[]).is_err());
    }
}
