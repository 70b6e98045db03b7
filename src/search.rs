use std::collections::{HashSet, VecDeque};

use crate::node::Node;

const DEFAULT_HASH_SET_CAPACITY: usize = 64;

/// Breadth-first iterator over the nodes reachable from a set of start nodes.
///
/// Nodes are marked seen when enqueued, so each reachable node is yielded
/// exactly once, in nondecreasing distance from the nearest start node.
pub struct BfsIterator<V> {
    seen: HashSet<Node<V>>,
    queue: VecDeque<Node<V>>,
}

impl<V> BfsIterator<V> {
    pub fn new(start: Vec<Node<V>>) -> Self {
        let mut seen = HashSet::with_capacity(DEFAULT_HASH_SET_CAPACITY);
        let queue = start
            .into_iter()
            .filter(|node| seen.insert(node.clone()))
            .collect();
        Self { seen, queue }
    }
}

impl<V> Iterator for BfsIterator<V> {
    type Item = Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        for neighbor in node.adjacent() {
            if self.seen.insert(neighbor.clone()) {
                self.queue.push_back(neighbor);
            }
        }
        Some(node)
    }
}

/// Depth-first iterator over the nodes reachable from a set of start nodes.
///
/// Yields nodes in the same pre-order as a recursive search that, for each
/// node, fully explores one unvisited neighbor before moving on to the next
/// one.  Neighbors are pushed in reverse adjacency order and marked seen when
/// popped, so no recursion is needed and deep graphs cannot exhaust the call
/// stack.
pub struct DfsIterator<V> {
    seen: HashSet<Node<V>>,
    stack: Vec<Node<V>>,
}

impl<V> DfsIterator<V> {
    pub fn new(start: Vec<Node<V>>) -> Self {
        let mut stack = start;
        stack.reverse();
        Self {
            seen: HashSet::with_capacity(DEFAULT_HASH_SET_CAPACITY),
            stack,
        }
    }
}

impl<V> Iterator for DfsIterator<V> {
    type Item = Node<V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if self.seen.insert(node.clone()) {
                let neighbors = node.adjacent();
                self.stack.extend(
                    neighbors
                        .into_iter()
                        .rev()
                        .filter(|neighbor| !self.seen.contains(neighbor)),
                );
                return Some(node);
            }
        }
        None
    }
}
