use serde::Deserialize;

use super::shape::ShapeCategory;

/// Stream metadata reported by the probing tool.
///
/// Only `width` and `height` take part in classification; the rest is carried
/// for logging.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamDescriptor {
    #[serde(default)]
    pub codec_name: Option<String>,
    #[serde(default)]
    pub codec_type: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProbeResult {
    #[serde(default)]
    pub streams: Vec<StreamDescriptor>,
}

impl ProbeResult {
    /// Parse the JSON document printed by `ffprobe -print_format json -show_streams`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The stream used for classification: the first one listed.
    pub fn primary_stream(&self) -> Option<&StreamDescriptor> {
        self.streams.first()
    }

    pub fn shape(&self) -> Option<ShapeCategory> {
        self.primary_stream()
            .map(|stream| ShapeCategory::from_dimensions(stream.width, stream.height))
    }
}
