use serde::Serialize;
use strum::IntoEnumIterator;

use crate::service::{AnalysisResult, IndexStats, RemoteError, VegetationIndex};
use crate::view::ResultPanel;

/// Fixed column headers of every statistics table.
pub const TABLE_HEADERS: [&str; 2] = ["Title", "Value"];

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRow {
    pub title: String,
    pub value: String,
}

/// Two-column statistics table. Built in one piece and swapped in whole, so
/// rows from a previous result never linger.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsTable {
    pub rows: Vec<StatRow>,
}

impl StatsTable {
    pub fn from_stats(stats: &IndexStats) -> Self {
        let row = |title: &str, value: f64| StatRow {
            title: title.to_string(),
            value: format!("{:.3}", value),
        };
        Self {
            rows: vec![
                row("Mean", stats.mean),
                row("Median", stats.median),
                row("Min", stats.min),
                row("Max", stats.max),
                row("Std Dev", stats.std_dev),
            ],
        }
    }
}

/// Builds the six result panels from an analysis response. A response missing
/// any index is reported as a remote failure so a partial set of panels is
/// never shown.
pub fn result_panels(result: &AnalysisResult) -> Result<Vec<ResultPanel>, RemoteError> {
    VegetationIndex::iter()
        .map(|index| {
            let index_result = result
                .per_index
                .get(&index)
                .ok_or_else(|| RemoteError(format!("Analysis response is missing index {}", index)))?;
            Ok(ResultPanel {
                index,
                image_path: index_result.image_path.clone(),
                stats: StatsTable::from_stats(&index_result.stats),
            })
        })
        .collect()
}
