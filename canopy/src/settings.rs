use serde::{Deserialize, Serialize};

/// Server-side working directories for the tiling run.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MainSettings {
    pub site_path: String,
    pub tiles_path: String,
}

impl Default for MainSettings {
    fn default() -> Self {
        Self {
            site_path: "outputs".to_string(),
            tiles_path: "tilespred".to_string(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct TilingSettings {
    pub buffer: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl Default for TilingSettings {
    fn default() -> Self {
        Self {
            buffer: 30,
            tile_width: 40,
            tile_height: 40,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct CrownSettings {
    /// Minimum confidence score a detected crown must reach to be kept.
    /// Opaque tuning value of the remote detector.
    pub confidence: f64,
}

impl Default for CrownSettings {
    fn default() -> Self {
        Self { confidence: 0.6 }
    }
}

/// Weights of the five source vegetation indices that make up the combined
/// index. Must sum to 1 before the settings are accepted.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct VegetationWeights {
    pub ndvi: f64,
    pub evi: f64,
    pub gndvi: f64,
    pub cigreen: f64,
    #[serde(rename = "cired-edge")]
    pub cired_edge: f64,
}

impl Default for VegetationWeights {
    fn default() -> Self {
        Self {
            ndvi: 0.2,
            evi: 0.2,
            gndvi: 0.2,
            cigreen: 0.2,
            cired_edge: 0.2,
        }
    }
}

impl VegetationWeights {
    pub fn sum(&self) -> f64 {
        self.ndvi + self.evi + self.gndvi + self.cigreen + self.cired_edge
    }
}

#[derive(Clone, Default, PartialEq, Debug, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub main: MainSettings,
    pub tiling: TilingSettings,
    pub crown: CrownSettings,
    pub weights: VegetationWeights,
}

impl AnalysisSettings {
    pub fn from_yaml_file(file_path: &str) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(file_path)?;
        Self::from_yaml(&yaml)
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> String {
        serde_yml::to_string(self).expect("Failed to serialize settings to YAML")
    }
}
