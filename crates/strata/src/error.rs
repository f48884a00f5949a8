#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("graph contains an edge with a missing endpoint: {vertex}")]
    UnknownVertex { vertex: String },
    #[error("invalid layout config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
    #[error("layout invariant violated: {0}")]
    Invariant(String),
    #[error("layout worker dropped its result")]
    WorkerLost,
}

pub type Result<T> = std::result::Result<T, LayoutError>;
