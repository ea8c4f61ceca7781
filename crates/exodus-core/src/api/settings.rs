use serde::{Deserialize, Serialize};

/// Graphics quality preset. Scales decorative work (resident counts,
/// destruction particle counts), never gameplay semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsLevel {
    Low,
    Medium,
    #[default]
    High,
}

/// Player-facing settings. Persistence lives in the embedding shell; this
/// type only carries the values and their JSON shape.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub graphics_level: GraphicsLevel,
}

impl Settings {
    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Multiplier applied to decorative object counts.
    pub fn graphics_multiplier(&self) -> u32 {
        match self.graphics_level {
            GraphicsLevel::Low => 1,
            GraphicsLevel::Medium => 5,
            GraphicsLevel::High => 10,
        }
    }
}
