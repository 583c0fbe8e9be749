use serde::{Deserialize, Serialize};

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Quilt configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuiltConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input file paths or glob patterns
    pub input: Vec<String>,
    /// Output directory for the atlas files
    pub output_dir: String,
    /// Base name for output files (atlas.png, atlas.json)
    pub name: String,
    /// Atlas edge length in pixels
    pub size: u32,
    /// Placement strategy: "maxrects" or "shelf"
    pub allocator: String,
    /// MaxRects heuristic
    pub heuristic: String,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Output RGB instead of RGBA (opaque atlas)
    pub opaque: bool,
}

impl Default for QuiltConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: ".".to_string(),
            name: "atlas".to_string(),
            size: 1024,
            allocator: "maxrects".to_string(),
            heuristic: "best-short-side-fit".to_string(),
            compress: None,
            opaque: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: QuiltConfig = serde_json::from_str(r#"{ "input": ["*.png"] }"#).unwrap();
        assert_eq!(config.input, vec!["*.png"]);
        assert_eq!(config.size, 1024);
        assert_eq!(config.name, "atlas");
        assert_eq!(config.allocator, "maxrects");
        assert!(config.compress.is_none());
    }

    #[test]
    fn test_compress_accepts_level_or_max() {
        let level: QuiltConfig = serde_json::from_str(r#"{ "compress": 4 }"#).unwrap();
        assert_eq!(level.compress, Some(CompressConfig::Level(4)));

        let max: QuiltConfig = serde_json::from_str(r#"{ "compress": "max" }"#).unwrap();
        assert_eq!(max.compress, Some(CompressConfig::Max("max".to_string())));
    }
}
