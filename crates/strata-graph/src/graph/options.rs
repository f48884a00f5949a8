//! Graph configuration options.

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphOptions {
    /// Allow parallel edges distinguished by [`EdgeKey::name`](super::EdgeKey::name).
    pub multigraph: bool,
}
