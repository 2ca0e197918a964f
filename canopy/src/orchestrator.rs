use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use common::Shared;

use crate::present;
use crate::selector::RegionSelector;
use crate::service::{
    default_download_range, AnalysisService, DownloadRequest, ModelId, TileConfirmation,
    UploadRequest, UploadedAsset,
};
use crate::settings::AnalysisSettings;
use crate::validate;
use crate::view::{Notice, PipelineView};

pub type NoticeCallback = Box<dyn Fn(Notice) + Send + Sync>;

/// Sequences the remote pipeline: acquire (upload or download) → tile
/// estimate → user confirmation → analysis → result rendering. Owns the
/// current asset and all per-stage view state; at most one stage is in
/// flight at a time.
pub struct Orchestrator {
    service: Arc<dyn AnalysisService>,
    confirmation: Arc<dyn TileConfirmation>,
    selector: Shared<RegionSelector>,
    on_notice: NoticeCallback,
    settings: AnalysisSettings,
    model: ModelId,
    asset: Option<UploadedAsset>,
    view: PipelineView,
}

impl Orchestrator {
    pub fn new<Callback>(
        service: Arc<dyn AnalysisService>,
        confirmation: Arc<dyn TileConfirmation>,
        selector: Shared<RegionSelector>,
        on_notice: Callback,
    ) -> Self
    where
        Callback: Fn(Notice) + Send + Sync + 'static,
    {
        Self {
            service,
            confirmation,
            selector,
            on_notice: Box::new(on_notice),
            settings: AnalysisSettings::default(),
            model: ModelId::default(),
            asset: None,
            view: PipelineView::default(),
        }
    }

    pub fn view(&self) -> &PipelineView {
        &self.view
    }

    pub fn current_asset(&self) -> Option<&UploadedAsset> {
        self.asset.as_ref()
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn set_model(&mut self, model: ModelId) {
        self.model = model;
    }

    /// Stage 1a: upload a user-supplied file. The date gate runs before any
    /// network traffic; a rejection clears the selected file.
    pub async fn upload(
        &mut self,
        file_name: &str,
        bytes: Vec<u8>,
        acquisition_date: Option<NaiveDate>,
    ) {
        if self.view.any_stage_busy() {
            warn!("Upload ignored, a pipeline stage is already in flight");
            return;
        }

        self.view.selected_file = Some(file_name.to_string());
        let date = match validate::check_upload(file_name, acquisition_date) {
            Ok(date) => date,
            Err(err) => {
                self.view.selected_file = None;
                self.notify(Notice::Warning(err.to_string()));
                return;
            }
        };

        self.view.acquire_busy = true;
        self.view.error_banner = None;
        info!(file_name, "Uploading image");

        let result = self
            .service
            .upload_asset(UploadRequest {
                file_name: file_name.to_string(),
                bytes,
                acquisition_date: date,
            })
            .await;
        self.view.acquire_busy = false;

        match result {
            Ok(asset) => {
                self.view.preview_path = Some(asset.display_path.clone());
                self.asset = Some(asset);
                self.notify(Notice::Success("Image uploaded".to_string()));
            }
            Err(err) => {
                error!(%err, "Upload failed");
                self.view.error_banner = Some(err.to_string());
                self.notify(Notice::Failure(err.to_string()));
            }
        }
    }

    /// Stage 1b: download imagery for the selected region, then chain
    /// straight into the estimate stage without a further user action.
    pub async fn download_for_analysis(&mut self, date_range: Option<(NaiveDate, NaiveDate)>) {
        if self.view.any_stage_busy() {
            warn!("Download ignored, a pipeline stage is already in flight");
            return;
        }

        let region = {
            let selector = self.selector.lock().await;
            selector.current_region()
        };
        let region = match validate::check_region(region) {
            Ok(region) => region,
            Err(err) => {
                self.notify(Notice::Warning(err.to_string()));
                return;
            }
        };

        let (start_date, end_date) = date_range.unwrap_or_else(default_download_range);

        self.view.acquire_busy = true;
        self.view.error_banner = None;
        info!(%start_date, %end_date, "Downloading imagery for selected region");

        let result = self
            .service
            .download_region(DownloadRequest {
                ring: region.closed_ring(),
                start_date,
                end_date,
            })
            .await;
        self.view.acquire_busy = false;

        match result {
            Ok(asset) => {
                self.view.preview_path = Some(asset.display_path.clone());
                self.asset = Some(asset);
                self.notify(Notice::Success("Image downloaded".to_string()));
                self.estimate_and_analyze().await;
            }
            Err(err) => {
                error!(%err, "Region download failed");
                self.view.error_banner = Some(err.to_string());
                self.notify(Notice::Failure(err.to_string()));
            }
        }
    }

    /// User-triggered entry into stages 2 and 3 for an already acquired
    /// asset.
    pub async fn run_analysis(&mut self) {
        if self.view.any_stage_busy() {
            warn!("Analysis ignored, a pipeline stage is already in flight");
            return;
        }
        self.estimate_and_analyze().await;
    }

    /// Settings gate plus remote persistence. The settings are only adopted
    /// locally once the remote acknowledged them.
    pub async fn save_settings(&mut self, settings: AnalysisSettings) {
        if let Err(err) = validate::check_weights(&settings.weights) {
            self.notify(Notice::Warning(err.to_string()));
            return;
        }

        match self.service.persist_settings(&settings).await {
            Ok(()) => {
                self.settings = settings;
                self.notify(Notice::Success("Settings saved".to_string()));
            }
            Err(err) => {
                error!(%err, "Persisting settings failed");
                self.notify(Notice::Failure(err.to_string()));
            }
        }
    }

    /// Stage 2 (estimate + confirmation) followed by stage 3 (analysis).
    /// Stage 3 is unreachable without an explicit confirmation.
    async fn estimate_and_analyze(&mut self) {
        let file_path = match validate::check_asset(self.asset.as_ref()) {
            Ok(asset) => asset.file_path.clone(),
            Err(err) => {
                self.notify(Notice::Warning(err.to_string()));
                return;
            }
        };

        self.view.estimate_busy = true;
        self.view.error_banner = None;
        info!(%file_path, "Estimating tile count");

        let estimate = self.service.estimate_tiles(&file_path).await;
        self.view.estimate_busy = false;

        let estimate = match estimate {
            Ok(estimate) => estimate,
            Err(err) => {
                error!(%err, "Tile estimation failed");
                self.view.error_banner = Some(err.to_string());
                self.notify(Notice::Failure(err.to_string()));
                return;
            }
        };

        if !self.confirmation.confirm_tiles(estimate.total_tiles).await {
            info!(total_tiles = estimate.total_tiles, "Analysis declined by user");
            self.notify(Notice::Cancelled("Analysis cancelled".to_string()));
            return;
        }

        self.view.analysis_busy = true;
        self.view.results_visible = false;
        self.view.panels.clear();
        self.view.output_image_path = None;
        self.view.error_banner = None;
        info!(%file_path, model = %self.model, "Running analysis");

        let result = self.service.run_analysis(&file_path, &self.model).await;
        self.view.analysis_busy = false;

        let panels = result.and_then(|result| {
            present::result_panels(&result).map(|panels| (result.output_image_path, panels))
        });

        match panels {
            Ok((output_image_path, panels)) => {
                self.view.output_image_path = Some(output_image_path);
                self.view.panels = panels;
                self.view.results_visible = true;
                self.notify(Notice::Success("Analysis complete".to_string()));
            }
            Err(err) => {
                error!(%err, "Analysis failed");
                self.view.error_banner = Some(err.to_string());
                self.notify(Notice::Failure(err.to_string()));
            }
        }
    }

    fn notify(&self, notice: Notice) {
        (self.on_notice)(notice);
    }

    #[cfg(test)]
    pub(crate) fn view_mut(&mut self) -> &mut PipelineView {
        &mut self.view
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("service", &self.service)
            .field("model", &self.model)
            .field("asset", &self.asset)
            .field("view", &self.view)
            .finish()
    }
}
