use std::collections::{HashMap, HashSet, VecDeque};

use quickcheck::Arbitrary;

use crate::{Graph, Node};

/// A recipe for a random graph.  Node `i` holds the value `i`, so values
/// identify nodes uniquely and expected traversal results can be computed
/// from the recipe alone.
#[derive(Debug, Clone)]
pub struct ArbGraph {
    pub num_nodes: usize,
    pub edges: Vec<(usize, usize)>,
}

impl Arbitrary for ArbGraph {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let num_nodes = usize::arbitrary(g) % 20; // Limit size for testing
        let num_edges = usize::arbitrary(g) % 40;
        let num_extra_self_loops = usize::arbitrary(g) % 3;

        let mut edges = Vec::new();
        if num_nodes > 0 {
            for i in 0..num_edges {
                let source = usize::arbitrary(g) % num_nodes;
                let target = usize::arbitrary(g) % num_nodes;
                edges.push((source, target));
                if i < num_extra_self_loops {
                    edges.push((source, source));
                }
            }
        }

        ArbGraph { num_nodes, edges }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let num_nodes = self.num_nodes;
        Box::new(
            self.edges
                .shrink()
                .map(move |edges| ArbGraph { num_nodes, edges }),
        )
    }
}

impl ArbGraph {
    /// Builds the graph, returning it along with a handle to each node,
    /// indexed by value.
    pub fn build(&self) -> (Graph<usize>, Vec<Node<usize>>) {
        let nodes: Vec<_> = (0..self.num_nodes).map(Node::new).collect();
        let mut graph: Graph<usize> = nodes.iter().cloned().collect();
        for &(source, target) in &self.edges {
            graph.add_edge(&nodes[source], &nodes[target]);
        }
        (graph, nodes)
    }

    fn neighbors(&self) -> HashMap<usize, Vec<usize>> {
        let mut neighbors: HashMap<usize, Vec<usize>> = HashMap::new();
        for &(source, target) in &self.edges {
            neighbors.entry(source).or_default().push(target);
            neighbors.entry(target).or_default().push(source);
        }
        neighbors
    }

    /// Edge-count distance from `start` to every node reachable from it.
    pub fn distances_from(&self, start: usize) -> HashMap<usize, usize> {
        let neighbors = self.neighbors();
        let mut distances = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            let distance = distances[&node];
            for &next in neighbors.get(&node).into_iter().flatten() {
                if !distances.contains_key(&next) {
                    distances.insert(next, distance + 1);
                    queue.push_back(next);
                }
            }
        }
        distances
    }

    pub fn component_of(&self, start: usize) -> HashSet<usize> {
        self.distances_from(start).into_keys().collect()
    }
}

/// Reference depth-first search written as plain recursion.
pub fn recursive_dfs<V: Clone>(start: &Node<V>) -> Vec<V> {
    fn visit<V: Clone>(node: &Node<V>, seen: &mut HashSet<Node<V>>, values: &mut Vec<V>) {
        values.push(node.value().clone());
        for neighbor in node.adjacent() {
            if seen.insert(neighbor.clone()) {
                visit(&neighbor, seen, values);
            }
        }
    }

    let mut seen = HashSet::from([start.clone()]);
    let mut values = Vec::new();
    visit(start, &mut seen, &mut values);
    values
}
