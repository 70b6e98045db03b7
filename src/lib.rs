//! A small undirected graph of shared, identity-compared nodes.
//!
//! [`Node`]s are created on their own and added to a [`Graph`] explicitly.
//! Edges live in the nodes' adjacency sets, so an edge always connects two
//! nodes symmetrically whether or not they belong to the same graph.  The
//! graph offers depth-first and breadth-first traversal over the component
//! containing a start node.

pub mod error;
pub mod graph;
pub mod node;
pub mod search;
pub mod tracing_support;

#[cfg(test)]
mod graph_test_support;

pub use error::{GraphError, Result};
pub use graph::Graph;
pub use node::{Node, WeakNode};
