use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use hashbrown::HashMap;
use parking_lot::Mutex;
use strum::IntoEnumIterator;

use common::Shared;

use crate::orchestrator::Orchestrator;
use crate::selector::RegionSelector;
use crate::service::{
    AnalysisResult, AnalysisService, DownloadRequest, IndexResult, IndexStats, RemoteResult,
    TileConfirmation, TileEstimate, UploadRequest, UploadedAsset, VegetationIndex,
};
use crate::settings::AnalysisSettings;
use crate::view::Notice;


pub(crate) fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

pub(crate) fn test_asset() -> UploadedAsset {
    UploadedAsset {
        display_path: "display/forest.png".to_string(),
        file_path: "uploads/forest.tif".to_string(),
        acquisition_date: test_date(),
    }
}

pub(crate) fn full_analysis_result() -> AnalysisResult {
    let per_index: HashMap<VegetationIndex, IndexResult> = VegetationIndex::iter()
        .map(|index| {
            (
                index,
                IndexResult {
                    image_path: format!("outputs/masked_{}.png", index),
                    stats: IndexStats {
                        mean: 0.6,
                        median: 0.58,
                        min: 0.02,
                        max: 0.97,
                        std_dev: 0.11,
                    },
                },
            )
        })
        .collect();
    AnalysisResult {
        output_image_path: "outputs/output.png".to_string(),
        per_index,
    }
}

/// Remote collaborator double with canned responses and a call log.
#[derive(Debug)]
pub(crate) struct ScriptedService {
    pub calls: Mutex<Vec<&'static str>>,
    pub upload: RemoteResult<UploadedAsset>,
    pub download: RemoteResult<UploadedAsset>,
    pub estimate: RemoteResult<TileEstimate>,
    pub analysis: RemoteResult<AnalysisResult>,
    pub persist: RemoteResult<()>,
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            upload: Ok(test_asset()),
            download: Ok(test_asset()),
            estimate: Ok(TileEstimate { total_tiles: 12 }),
            analysis: Ok(full_analysis_result()),
            persist: Ok(()),
        }
    }
}

impl ScriptedService {
    pub fn call_log(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AnalysisService for ScriptedService {
    async fn upload_asset(&self, _request: UploadRequest) -> RemoteResult<UploadedAsset> {
        self.calls.lock().push("upload");
        self.upload.clone()
    }

    async fn download_region(&self, _request: DownloadRequest) -> RemoteResult<UploadedAsset> {
        self.calls.lock().push("download");
        self.download.clone()
    }

    async fn estimate_tiles(&self, _file_path: &str) -> RemoteResult<TileEstimate> {
        self.calls.lock().push("estimate");
        self.estimate.clone()
    }

    async fn run_analysis(
        &self,
        _file_path: &str,
        _model: &crate::service::ModelId,
    ) -> RemoteResult<AnalysisResult> {
        self.calls.lock().push("analyze");
        self.analysis.clone()
    }

    async fn persist_settings(&self, _settings: &AnalysisSettings) -> RemoteResult<()> {
        self.calls.lock().push("persist");
        self.persist.clone()
    }
}

/// Scripted answer to the tile-count confirmation, recording what was asked.
pub(crate) struct Decide {
    pub accept: bool,
    pub asked: Mutex<Vec<u64>>,
}

impl Decide {
    pub fn new(accept: bool) -> Self {
        Self {
            accept,
            asked: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TileConfirmation for Decide {
    async fn confirm_tiles(&self, total_tiles: u64) -> bool {
        self.asked.lock().push(total_tiles);
        self.accept
    }
}

pub(crate) struct Harness {
    pub service: Arc<ScriptedService>,
    pub confirmation: Arc<Decide>,
    pub selector: Shared<RegionSelector>,
    pub notices: Arc<Mutex<Vec<Notice>>>,
    pub orchestrator: Orchestrator,
}

pub(crate) fn harness(service: ScriptedService, accept: bool) -> Harness {
    let service = Arc::new(service);
    let confirmation = Arc::new(Decide::new(accept));
    let selector = Shared::new(RegionSelector::default());
    let notices: Arc<Mutex<Vec<Notice>>> = Arc::default();

    let orchestrator = Orchestrator::new(
        service.clone(),
        confirmation.clone(),
        selector.clone(),
        {
            let notices = notices.clone();
            move |notice| notices.lock().push(notice)
        },
    );

    Harness {
        service,
        confirmation,
        selector,
        notices,
        orchestrator,
    }
}
