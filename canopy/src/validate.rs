use chrono::NaiveDate;
use thiserror::Error;

use common::float_ext::FloatExt;

use crate::geo::BoundingRegion;
use crate::service::UploadedAsset;
use crate::settings::VegetationWeights;

/// Local, pre-network rejections. Never fatal, always user-visible, and no
/// remote call is issued when one fires.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum ValidationError {
    #[error("Please set an acquisition date before uploading")]
    MissingAcquisitionDate,
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("Vegetation index weights must sum to 1, currently {sum}")]
    WeightSum { sum: f64 },
    #[error("Select a region on the map first")]
    NoRegionSelected,
    #[error("Upload or download an image before running the analysis")]
    NoAssetAcquired,
}

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["tif", "tiff", "png", "jpg", "jpeg"];

/// Upload gate: an acquisition date is mandatory and the file must carry one
/// of the accepted raster extensions.
pub fn check_upload(
    file_name: &str,
    acquisition_date: Option<NaiveDate>,
) -> Result<NaiveDate, ValidationError> {
    let date = acquisition_date.ok_or(ValidationError::MissingAcquisitionDate)?;

    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(date),
        _ => Err(ValidationError::UnsupportedFileType(file_name.to_string())),
    }
}

/// Settings gate: the five weights must sum to 1. Uses `common::EPSILON`
/// instead of exact float equality so that sums like 0.1+0.2+0.2+0.2+0.3 are
/// accepted.
pub fn check_weights(weights: &VegetationWeights) -> Result<(), ValidationError> {
    let sum = weights.sum();
    if sum.approximately_eq(1.0) {
        Ok(())
    } else {
        Err(ValidationError::WeightSum { sum })
    }
}

/// Region gate: the download action needs an active rectangle.
pub fn check_region(region: Option<BoundingRegion>) -> Result<BoundingRegion, ValidationError> {
    region.ok_or(ValidationError::NoRegionSelected)
}

/// Stage gate: tile estimation and analysis need an acquired asset.
pub fn check_asset(asset: Option<&UploadedAsset>) -> Result<&UploadedAsset, ValidationError> {
    asset.ok_or(ValidationError::NoAssetAcquired)
}
