use serde::Deserialize;

use crate::docgen::DocServer;
use crate::extract::ExtractorKind;

/// Top-level project configuration loaded from `.resbridge.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Source or IR document the commands operate on by default.
    pub input: String,
    pub extractor: ExtractorKind,
    pub convert: ConvertConfig,
    pub docs: DocsConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            input: "resources.res".to_string(),
            extractor: ExtractorKind::default(),
            convert: ConvertConfig::default(),
            docs: DocsConfig::default(),
        }
    }
}

/// Defaults for the forward converter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub namespace: String,
    pub include_relationships: bool,
    pub generate_operations: bool,
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            namespace: "Api".to_string(),
            include_relationships: true,
            generate_operations: false,
            title: None,
            version: None,
            description: None,
        }
    }
}

/// Defaults for the documentation generator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub structured: bool,
    pub servers: Vec<DocServer>,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".resbridge.yaml";

/// Parse a configuration document.
pub fn parse_config(content: &str) -> Result<BridgeConfig, String> {
    serde_yaml_ng::from_str(content).map_err(|e| format!("failed to parse config: {e}"))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# resbridge configuration
input: resources.res
extractor: heuristic    # heuristic | tree

convert:
  namespace: Api
  include_relationships: true
  generate_operations: false
  # title: Blog API
  # version: 1.0.0

docs:
  structured: false     # nest attributes/relationships per resource
  servers: []
    # - url: https://api.example.com
    #   description: production
"#
}
