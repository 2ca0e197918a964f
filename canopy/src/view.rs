use serde::Serialize;

use crate::present::StatsTable;
use crate::service::VegetationIndex;

/// One user-visible notice per terminal stage outcome. The page shell turns
/// these into transient toasts.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Notice {
    Success(String),
    /// Local validation rejection; nothing left the machine.
    Warning(String),
    /// Remote failure message, passed through verbatim.
    Failure(String),
    /// The user declined to continue; neutral, not an error.
    Cancelled(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(message)
            | Notice::Warning(message)
            | Notice::Failure(message)
            | Notice::Cancelled(message) => message,
        }
    }
}

/// Output area of one vegetation index: preview image plus statistics table.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPanel {
    pub index: VegetationIndex,
    pub image_path: String,
    pub stats: StatsTable,
}

/// Everything the page shell needs to render the pipeline: busy flags per
/// stage, the preview, the error banner and the result panels. Owned and
/// mutated only by the orchestrator.
#[derive(Clone, Default, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineView {
    pub acquire_busy: bool,
    pub estimate_busy: bool,
    pub analysis_busy: bool,
    /// File name shown next to the upload control; cleared when the upload
    /// gate rejects.
    pub selected_file: Option<String>,
    pub preview_path: Option<String>,
    pub error_banner: Option<String>,
    /// All six panels become visible together or not at all.
    pub results_visible: bool,
    pub output_image_path: Option<String>,
    pub panels: Vec<ResultPanel>,
}

impl PipelineView {
    pub fn any_stage_busy(&self) -> bool {
        self.acquire_busy || self.estimate_busy || self.analysis_busy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_view_is_idle_and_empty() {
        let view = PipelineView::default();
        assert!(!view.any_stage_busy());
        assert!(!view.results_visible);
        assert!(view.panels.is_empty());
        assert_eq!(view.error_banner, None);
    }

    #[test]
    fn view_serializes_camel_case_for_the_shell() {
        let view = PipelineView {
            acquire_busy: true,
            ..PipelineView::default()
        };
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"acquireBusy\":true"), "got {}", json);
        assert!(json.contains("\"resultsVisible\":false"), "got {}", json);
    }

    #[test]
    fn notice_exposes_its_message() {
        assert_eq!(Notice::Cancelled("Analysis cancelled".into()).message(), "Analysis cancelled");
    }
}
