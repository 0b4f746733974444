use thiserror::Error;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Graph-consistency violations. The engine assumes the manifest graph is
/// internally consistent and never attempts repair.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Unknown id: {0}")]
    UnknownId(String),

    #[error("No id-bearing ancestor for <{0}> node")]
    NoOwningId(String),
}
