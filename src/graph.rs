use std::{collections::HashSet, fmt::Debug};

use derivative::Derivative;

use crate::{
    error::{GraphError, Result},
    node::Node,
    search::{BfsIterator, DfsIterator},
    tracing_support::info_span,
};

/// An undirected graph over shared [`Node`]s.
///
/// The graph holds a set of vertices, compared by identity.  Edges are not
/// stored in the graph at all: an edge is the pair of entries two nodes keep
/// in each other's adjacency sets.  Consequently the edge operations do not
/// require their endpoints to be vertices of this graph (see
/// [`Self::try_add_edge`] for a checked variant), and a vertex may have
/// neighbors that belong to no graph.
///
/// All mutations are idempotent and never fail.
#[derive(Derivative)]
#[derivative(Default(bound = ""))]
pub struct Graph<V> {
    nodes: HashSet<Node<V>>,
}

impl<V> Graph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &Node<V>) -> bool {
        self.nodes.contains(node)
    }

    /// Iterates over the vertices in unspecified order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<V>> {
        self.nodes.iter()
    }

    /// Adds `node` to the vertex set.  Returns false if it was already there.
    pub fn add_vertex(&mut self, node: Node<V>) -> bool {
        self.nodes.insert(node)
    }

    pub fn add_vertices(&mut self, nodes: impl IntoIterator<Item = Node<V>>) {
        self.nodes.extend(nodes);
    }

    /// Connects `a` and `b` in both directions.  `a == b` makes a self-edge.
    /// Returns false if the edge already existed.
    ///
    /// The edge does not keep either endpoint alive: it disappears when the
    /// last handle to either node is dropped.
    pub fn add_edge(&mut self, a: &Node<V>, b: &Node<V>) -> bool {
        let _span = info_span!("add_edge").entered();
        let added = a.link(b);
        b.link(a) || added
    }

    /// Disconnects `a` and `b` in both directions.  Returns false if there was
    /// no edge to remove.
    pub fn remove_edge(&mut self, a: &Node<V>, b: &Node<V>) -> bool {
        let _span = info_span!("remove_edge").entered();
        let removed = a.unlink(&b.downgrade());
        b.unlink(&a.downgrade()) || removed
    }

    /// Like [`Self::add_edge`], but fails without touching either node unless
    /// both are vertices of this graph.
    pub fn try_add_edge(&mut self, a: &Node<V>, b: &Node<V>) -> Result<bool> {
        self.check_members(a, b)?;
        Ok(self.add_edge(a, b))
    }

    /// Like [`Self::remove_edge`], but fails without touching either node
    /// unless both are vertices of this graph.
    pub fn try_remove_edge(&mut self, a: &Node<V>, b: &Node<V>) -> Result<bool> {
        self.check_members(a, b)?;
        Ok(self.remove_edge(a, b))
    }

    /// Removes `node` from the vertex set, removes it from the adjacency set
    /// of each of its neighbors, and empties its own adjacency set.  The
    /// neighbor scrub happens even if `node` was not a vertex of this graph.
    /// Returns true if `node` was a vertex.
    pub fn remove_vertex(&mut self, node: &Node<V>) -> bool {
        let _span = info_span!("remove_vertex", degree = node.degree()).entered();
        let was_member = self.nodes.remove(node);
        let weak = node.downgrade();
        for neighbor in node.take_adjacent() {
            if let Some(neighbor) = neighbor.upgrade() {
                neighbor.unlink(&weak);
            }
        }
        was_member
    }

    pub fn has_edge(&self, a: &Node<V>, b: &Node<V>) -> bool {
        a.is_adjacent_to(b) && b.is_adjacent_to(a)
    }

    /// Lazily walks the component containing `start` depth-first.
    pub fn dfs(&self, start: &Node<V>) -> DfsIterator<V> {
        self.dfs_multi(vec![start.clone()])
    }

    /// Lazily walks every node reachable from any of `start` depth-first,
    /// exhausting the nodes reachable from each start node in turn.
    pub fn dfs_multi(&self, start: Vec<Node<V>>) -> DfsIterator<V> {
        DfsIterator::new(start)
    }

    /// Lazily walks the component containing `start` breadth-first.
    pub fn bfs(&self, start: &Node<V>) -> BfsIterator<V> {
        self.bfs_multi(vec![start.clone()])
    }

    /// Lazily walks every node reachable from any of `start` breadth-first,
    /// treating all start nodes as distance zero.
    pub fn bfs_multi(&self, start: Vec<Node<V>>) -> BfsIterator<V> {
        BfsIterator::new(start)
    }

    /// Returns the values of the component containing `start` in depth-first
    /// pre-order.  Each neighbor's reachable nodes are all visited before the
    /// next neighbor of the same node; the order among siblings follows the
    /// adjacency-set iteration order.
    pub fn depth_first_search(&self, start: &Node<V>) -> Vec<V>
    where
        V: Clone,
    {
        let _span = info_span!("depth_first_search").entered();
        self.dfs(start).map(|node| node.value().clone()).collect()
    }

    /// Returns the values of the component containing `start` in
    /// breadth-first order: `start`, then its neighbors, then theirs, and so
    /// on, layer by layer.
    pub fn breadth_first_search(&self, start: &Node<V>) -> Vec<V>
    where
        V: Clone,
    {
        let _span = info_span!("breadth_first_search").entered();
        self.bfs(start).map(|node| node.value().clone()).collect()
    }

    fn check_members(&self, a: &Node<V>, b: &Node<V>) -> Result<()> {
        if self.contains(a) && self.contains(b) {
            Ok(())
        } else {
            Err(GraphError::NotInGraph)
        }
    }
}

impl<V: Debug> Graph<V> {
    /// Checks that every adjacency entry of every vertex refers to a live
    /// node that lists the vertex back.  Neighbors outside the vertex set are
    /// allowed.
    pub fn check_consistency(&self) -> Result<()> {
        for node in &self.nodes {
            for entry in node.adjacent_entries() {
                let Some(neighbor) = entry.upgrade() else {
                    return Err(GraphError::DanglingNeighbor {
                        node: format!("{:?}", node.value()),
                    });
                };
                if !neighbor.is_adjacent_to(node) {
                    return Err(GraphError::AsymmetricEdge {
                        from: format!("{:?}", node.value()),
                        to: format!("{:?}", neighbor.value()),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<V> FromIterator<Node<V>> for Graph<V> {
    fn from_iter<I: IntoIterator<Item = Node<V>>>(iter: I) -> Self {
        let mut graph = Graph::new();
        graph.add_vertices(iter);
        graph
    }
}

impl<V> Extend<Node<V>> for Graph<V> {
    fn extend<I: IntoIterator<Item = Node<V>>>(&mut self, iter: I) {
        self.add_vertices(iter);
    }
}

impl<V: Debug> Debug for Graph<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph").field("nodes", &self.nodes).finish()
    }
}
