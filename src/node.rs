use std::{
    cell::RefCell,
    collections::HashSet,
    fmt::Debug,
    hash::Hash,
    rc::{Rc, Weak},
};

use derivative::Derivative;

pub(crate) struct NodeInner<V> {
    value: V,
    adjacent: RefCell<HashSet<WeakNode<V>>>,
}

impl<V> NodeInner<V> {
    fn addr(&self) -> *const NodeInner<V> {
        self
    }
}

impl<V> Drop for NodeInner<V> {
    // Scrub the dying node from its neighbors so no adjacency set is left
    // holding a dangling entry.
    fn drop(&mut self) {
        let addr = self.addr();
        for neighbor in self.adjacent.get_mut().drain() {
            let Some(neighbor) = neighbor.0.upgrade() else {
                continue;
            };
            // A live neighbor's set is only borrowed for the length of a
            // `Node` method call, none of which drops a node.
            match neighbor.adjacent.try_borrow_mut() {
                Ok(mut adjacent) => adjacent.retain(|entry| entry.addr() != addr),
                Err(_) => debug_assert!(
                    std::thread::panicking(),
                    "adjacency set borrowed while a neighbor was dropped"
                ),
            }
        }
    }
}

/// A graph vertex: an immutable value plus a set of adjacent nodes.
///
/// `Node` is a shared handle; cloning it yields another handle to the same
/// vertex.  Equality and hashing are by identity, so two nodes holding equal
/// values are still distinct vertices.
///
/// Adjacency is non-owning: a node's neighbors are held as [`WeakNode`]s and
/// are kept alive only by their own handles (or by a [`Graph`](crate::Graph)
/// containing them).  When the last handle to a node is dropped, the node
/// removes itself from the adjacency set of every neighbor.
#[derive(Derivative)]
#[derivative(Clone(bound = ""))]
pub struct Node<V>(Rc<NodeInner<V>>);

/// Non-owning reference to a [`Node`], as stored in adjacency sets.
#[derive(Derivative)]
#[derivative(Clone(bound = ""))]
pub struct WeakNode<V>(Weak<NodeInner<V>>);

impl<V> Node<V> {
    /// Creates a node with an empty adjacency set.
    pub fn new(value: V) -> Self {
        Self::with_adjacent(value, std::iter::empty())
    }

    /// Creates a node whose adjacency set starts out holding `adjacent`.
    ///
    /// The new node is *not* added to the adjacency sets of those neighbors;
    /// use [`Graph::add_edge`](crate::Graph::add_edge) for a symmetric edge.
    /// Only weak references are stored, so each neighbor stays adjacent only
    /// while the caller (or a graph) still holds a handle to it.
    pub fn with_adjacent<'a>(value: V, adjacent: impl IntoIterator<Item = &'a Node<V>>) -> Self
    where
        V: 'a,
    {
        let adjacent = adjacent.into_iter().map(|node| node.downgrade()).collect();
        Node(Rc::new(NodeInner {
            value,
            adjacent: RefCell::new(adjacent),
        }))
    }

    pub fn value(&self) -> &V {
        &self.0.value
    }

    /// Returns handles to the current neighbors, in adjacency-set iteration
    /// order.  The order is unspecified but stable while the set is not
    /// modified.
    pub fn adjacent(&self) -> Vec<Node<V>> {
        self.0
            .adjacent
            .borrow()
            .iter()
            .filter_map(WeakNode::upgrade)
            .collect()
    }

    /// Number of live neighbors, i.e. `self.adjacent().len()`.  A self-edge
    /// counts once.
    pub fn degree(&self) -> usize {
        self.0
            .adjacent
            .borrow()
            .iter()
            .filter(|entry| entry.0.strong_count() > 0)
            .count()
    }

    pub fn is_adjacent_to(&self, other: &Node<V>) -> bool {
        self.0.adjacent.borrow().contains(&other.downgrade())
    }

    pub fn downgrade(&self) -> WeakNode<V> {
        WeakNode(Rc::downgrade(&self.0))
    }

    /// Returns true if both handles refer to the same vertex.
    pub fn ptr_eq(&self, other: &Node<V>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Inserts `other` into this node's adjacency set only.
    pub(crate) fn link(&self, other: &Node<V>) -> bool {
        self.0.adjacent.borrow_mut().insert(other.downgrade())
    }

    /// Removes `other` from this node's adjacency set only.
    pub(crate) fn unlink(&self, other: &WeakNode<V>) -> bool {
        self.0.adjacent.borrow_mut().remove(other)
    }

    /// Empties the adjacency set, returning its former contents.
    pub(crate) fn take_adjacent(&self) -> Vec<WeakNode<V>> {
        self.0.adjacent.borrow_mut().drain().collect()
    }

    /// Snapshot of the raw adjacency entries, including any that no longer
    /// upgrade.
    pub(crate) fn adjacent_entries(&self) -> Vec<WeakNode<V>> {
        self.0.adjacent.borrow().iter().cloned().collect()
    }
}

impl<V> WeakNode<V> {
    /// Returns a handle to the node, or `None` if it has been dropped.
    pub fn upgrade(&self) -> Option<Node<V>> {
        self.0.upgrade().map(Node)
    }

    fn addr(&self) -> *const NodeInner<V> {
        self.0.as_ptr()
    }
}

impl<V> PartialEq for Node<V> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<V> Eq for Node<V> {}

impl<V> Hash for Node<V> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

// The allocation behind a `Weak` outlives the value, so the address stays
// valid as a key even after the node is dropped.
impl<V> PartialEq for WeakNode<V> {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl<V> Eq for WeakNode<V> {}

impl<V> Hash for WeakNode<V> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (self.addr() as usize).hash(state);
    }
}

struct NeighborValues<'a, V>(&'a Node<V>);

impl<'a, V: Debug> Debug for NeighborValues<'a, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let neighbors = self.0.adjacent();
        f.debug_set()
            .entries(neighbors.iter().map(|node| node.value()))
            .finish()
    }
}

impl<V: Debug> Debug for Node<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("value", self.value())
            .field("adjacent", &NeighborValues(self))
            .finish()
    }
}

impl<V> Debug for WeakNode<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WeakNode({:?})", self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_values_are_distinct_nodes() {
        let a1 = Node::new("a");
        let a2 = Node::new("a");
        assert_ne!(a1, a2);
        assert_eq!(a1, a1.clone());
        assert_eq!(HashSet::from([a1.clone(), a2, a1]).len(), 2);
    }

    #[test]
    fn test_with_adjacent_is_one_sided() {
        let b = Node::new('b');
        let a = Node::with_adjacent('a', [&b]);
        assert!(a.is_adjacent_to(&b));
        assert!(!b.is_adjacent_to(&a));
        assert_eq!(a.degree(), 1);
        assert_eq!(b.degree(), 0);
    }

    #[test]
    fn test_adjacency_does_not_keep_neighbors_alive() {
        let a = Node::new(1);
        let b = Node::new(2);
        a.link(&b);
        b.link(&a);
        let weak_b = b.downgrade();
        drop(b);
        assert!(weak_b.upgrade().is_none());
        assert_eq!(a.degree(), 0);
        assert!(a.adjacent().is_empty());
    }

    #[test]
    fn test_drop_scrubs_one_sided_links() {
        let a = Node::new(1);
        {
            let b = Node::with_adjacent(2, [&a]);
            a.link(&b);
            assert_eq!(a.degree(), 1);
        }
        assert_eq!(a.degree(), 0);
    }

    #[test]
    fn test_degree_counts_live_neighbors_only() {
        let a = {
            let b = Node::new(2);
            Node::with_adjacent(1, [&b])
        };
        assert_eq!(a.degree(), a.adjacent().len());
        assert_eq!(a.degree(), 0);
        assert_eq!(a.adjacent_entries().len(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "adjacency set borrowed while a neighbor was dropped")]
    fn test_drop_while_neighbor_borrowed_is_caught() {
        let a = Node::new(1);
        let b = Node::with_adjacent(2, [&a]);
        let _borrowed = a.0.adjacent.borrow();
        drop(b);
    }

    #[test]
    fn test_self_link_does_not_leak() {
        let a = Node::new(1);
        a.link(&a);
        assert!(a.is_adjacent_to(&a));
        assert_eq!(a.adjacent(), vec![a.clone()]);
        let weak = a.downgrade();
        drop(a);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_take_adjacent_empties_set() {
        let a = Node::new(1);
        let b = Node::new(2);
        let c = Node::new(3);
        a.link(&b);
        a.link(&c);
        let taken: HashSet<_> = a.take_adjacent().into_iter().collect();
        assert_eq!(taken, HashSet::from([b.downgrade(), c.downgrade()]));
        assert_eq!(a.degree(), 0);
    }

    #[test]
    fn test_debug_shows_neighbor_values() {
        let a = Node::new(1);
        let b = Node::new(2);
        a.link(&b);
        assert_eq!(format!("{:?}", a), "Node { value: 1, adjacent: {2} }");
    }
}
