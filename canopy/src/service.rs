use std::fmt::Debug;

use async_trait::async_trait;
use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

use crate::geo::Coordinate;
use crate::settings::AnalysisSettings;

/// Failure payload of any remote call. The message is surfaced to the user
/// verbatim and never interpreted.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("{0}")]
pub struct RemoteError(pub String);

impl From<&str> for RemoteError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

impl From<String> for RemoteError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub acquisition_date: NaiveDate,
}

/// Area-of-interest download request: a closed 5-point polygon ring plus the
/// date range the imagery is picked from.
#[derive(Clone, Debug, Serialize)]
pub struct DownloadRequest {
    pub ring: [Coordinate; 5],
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn default_download_range() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2020, 12, 31).expect("valid date"),
    )
}

/// The one current image the pipeline works on. Replaced whole by the next
/// successful upload or download.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct UploadedAsset {
    /// URL the page shell shows as preview.
    pub display_path: String,
    /// Server-side handle passed to the tiling and analysis calls.
    pub file_path: String,
    pub acquisition_date: NaiveDate,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TileEstimate {
    pub total_tiles: u64,
}

/// Opaque identifier of the detection model the analysis runs with.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ModelId(pub String);

impl Default for ModelId {
    fn default() -> Self {
        Self("model_final.pth".to_string())
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The six per-pixel indices the analysis service reports on.
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum VegetationIndex {
    Ndvi,
    Evi,
    Gndvi,
    Cigreen,
    CiredEdge,
    Combined,
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct IndexStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct IndexResult {
    pub image_path: String,
    pub stats: IndexStats,
}

/// Full analysis response. Applied atomically: either all six indices render
/// or none do.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub output_image_path: String,
    pub per_index: HashMap<VegetationIndex, IndexResult>,
}

/// Remote collaborator behind the pipeline. Transport and encoding are its
/// concern; the core only sees these request/response shapes.
#[async_trait]
pub trait AnalysisService: Debug + Send + Sync {
    async fn upload_asset(&self, request: UploadRequest) -> RemoteResult<UploadedAsset>;
    async fn download_region(&self, request: DownloadRequest) -> RemoteResult<UploadedAsset>;
    async fn estimate_tiles(&self, file_path: &str) -> RemoteResult<TileEstimate>;
    async fn run_analysis(
        &self,
        file_path: &str,
        model: &ModelId,
    ) -> RemoteResult<AnalysisResult>;
    async fn persist_settings(&self, settings: &AnalysisSettings) -> RemoteResult<()>;
}

/// Modal tile-count confirmation, answered by the user through the page
/// shell. Declining is not an error.
#[async_trait]
pub trait TileConfirmation: Send + Sync {
    async fn confirm_tiles(&self, total_tiles: u64) -> bool;
}
