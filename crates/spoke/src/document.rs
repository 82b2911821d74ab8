//! Chart documents: groups, datasets and an optional config layer in one YAML or JSON file.

use crate::Result;
use serde::{Deserialize, Serialize};
use spoke_core::{ChartData, ConfigOverrides, Dataset, Group};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Picks the format from a file extension; anything but `.json` reads as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    /// Sniffs inline text: a leading `{` means JSON.
    pub fn sniff(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            DocumentFormat::Json
        } else {
            DocumentFormat::Yaml
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartDocument {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(default)]
    pub config: ConfigOverrides,
}

impl ChartDocument {
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self> {
        Ok(match format {
            DocumentFormat::Yaml => serde_yaml::from_str(text)?,
            DocumentFormat::Json => serde_json::from_str(text)?,
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::parse(text, DocumentFormat::Yaml)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::parse(text, DocumentFormat::Json)
    }

    pub fn data(&self) -> ChartData {
        ChartData {
            groups: self.groups.clone(),
            datasets: self.datasets.clone(),
        }
    }
}

/// Parses a standalone config override layer (the `config` block of a document, on its own).
pub fn parse_overrides(text: &str, format: DocumentFormat) -> Result<ConfigOverrides> {
    Ok(match format {
        DocumentFormat::Yaml => serde_yaml::from_str(text)?,
        DocumentFormat::Json => serde_json::from_str(text)?,
    })
}
