pub mod airbnb_pipeline;
pub mod restaurant_pipeline;

pub use airbnb_pipeline::AirbnbPipeline;
pub use restaurant_pipeline::RestaurantPipeline;

use crate::core::Storage;
use crate::utils::error::{InsightError, Result};
use std::path::Path;

pub const ARCHIVE_NAME: &str = "results.zip";

/// Reads a dataset, turning "not found" into an error that names the file.
async fn read_input<S: Storage>(storage: &S, dir: &Path, file: &str) -> Result<Vec<u8>> {
    match storage.read_file(file).await {
        Err(InsightError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(InsightError::MissingInputError {
                file: file.to_string(),
                directory: dir.display().to_string(),
            })
        }
        other => other,
    }
}
