use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use tributary_models::{GroupInfo, KeyValues, PipelineEvent, PipelineGroupEvents};
use tributary_protocol::ConverterConfig;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "tributary", about = "Convert pipeline event batches into transport streams")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert one batch file into a raw stream
    Convert(ConvertArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ConvertArgs {
    /// Path to the converter TOML config (defaults apply when absent)
    #[arg(long, env = "TRIBUTARY_CONFIG")]
    pub config: Option<PathBuf>,
    /// Path to the JSON batch file
    #[arg(long)]
    pub input: PathBuf,
    /// Group field to resolve (`metadata.<key>` or `tag.<key>`), repeatable
    #[arg(long = "field")]
    pub fields: Vec<String>,
    /// Write the stream here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn load_converter_config(path: Option<&Path>) -> Result<ConverterConfig, CliError> {
    let Some(path) = path else {
        return Ok(ConverterConfig::default());
    };
    let content = std::fs::read_to_string(path).map_err(CliError::read_config(path))?;
    toml::from_str(&content).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

// ---- JSON batch file ----

/// `{ "metadata": {..}, "tags": {..}, "events": ["..", ..] }`
#[derive(Debug, Deserialize)]
pub struct BatchFile {
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub events: Vec<String>,
}

impl BatchFile {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(CliError::read_batch(path))?;
        serde_json::from_str(&content).map_err(|source| CliError::Batch {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_group_events(self) -> PipelineGroupEvents {
        let group = GroupInfo::new(
            self.metadata.into_iter().collect::<KeyValues>(),
            self.tags.into_iter().collect::<KeyValues>(),
        );
        let events = self
            .events
            .into_iter()
            .map(|e| PipelineEvent::from(e.into_bytes()))
            .collect();
        PipelineGroupEvents::new(group, events)
    }
}
