use std::path::{Path, PathBuf};

/// Failures of the host around a conversion. The conversion itself only
/// ever reports [`tributary_protocol::ConvertError`].
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read {kind} '{}': {source}", path.display())]
    Read { kind: &'static str, path: PathBuf, source: std::io::Error },

    #[error("invalid converter config '{}': {source}", path.display())]
    Config { path: PathBuf, source: toml::de::Error },

    #[error("invalid batch file '{}': {source}", path.display())]
    Batch { path: PathBuf, source: serde_json::Error },

    #[error(transparent)]
    Convert(#[from] tributary_protocol::ConvertError),

    #[error("cannot write stream: {0}")]
    Write(#[from] std::io::Error),
}

impl CliError {
    fn read(kind: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| CliError::Read { kind, path, source }
    }

    pub fn read_config(path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        Self::read("config", path)
    }

    pub fn read_batch(path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        Self::read("batch file", path)
    }
}
