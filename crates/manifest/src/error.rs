use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManifestError>;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Snapshot read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
