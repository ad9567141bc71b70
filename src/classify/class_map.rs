use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Class taxonomy loaded from a YAMNet-style class map CSV
///
/// The CSV format is `index,mid,display_name` with a header row; display
/// names may contain commas and are then quoted.
#[derive(Debug, Clone)]
pub struct ClassMap {
    names: Vec<String>,
}

impl ClassMap {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read class map: {}", path.display()))?;
        let map = Self::parse(&text);
        info!("Loaded class map: {} classes from {}", map.len(), path.display());
        Ok(map)
    }

    /// Parse class map CSV text, skipping the header row
    pub fn parse(text: &str) -> Self {
        let names = text
            .trim()
            .lines()
            .skip(1)
            .map(|line| {
                let parts: Vec<&str> = line.split(',').collect();
                if parts.len() > 2 {
                    parts[2..].join(",").replace('"', "").trim().to_string()
                } else {
                    line.trim().to_string()
                }
            })
            .collect();

        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn into_names(self) -> Vec<String> {
        self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
