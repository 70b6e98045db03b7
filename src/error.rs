/// Result type for the checked graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors reported by the membership-checked mutations and by
/// [`Graph::check_consistency`](crate::Graph::check_consistency).
///
/// The permissive operations (`add_edge`, `remove_vertex`, ...) never fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An endpoint passed to a checked operation is not a vertex of the graph.
    #[error("node is not a vertex of this graph")]
    NotInGraph,
    /// `from` lists `to` as a neighbor but `to` does not list `from`.
    #[error("asymmetric edge: {from} lists {to} as adjacent, but not the reverse")]
    AsymmetricEdge { from: String, to: String },
    /// An adjacency set refers to a node that has already been dropped.
    #[error("adjacency set of {node} refers to a dropped node")]
    DanglingNeighbor { node: String },
}
