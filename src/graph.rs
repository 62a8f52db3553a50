//! Link graph and the index-level adapter the estimators run against.

use crate::{Error, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// Labels usable as graph nodes (document names, URLs, ids).
pub trait NodeId: Clone + Ord + Hash + Debug {}

impl<T: Clone + Ord + Hash + Debug> NodeId for T {}

/// A graph view that returns **borrowed** outbound neighbor slices.
///
/// Nodes are `0..node_count()`. The estimators only need this much, so anything
/// adjacency-shaped can be ranked without building a [`LinkGraph`].
pub trait GraphRef {
    fn node_count(&self) -> usize;
    fn neighbors_ref(&self, node: usize) -> &[usize];
    fn out_degree(&self, node: usize) -> usize {
        self.neighbors_ref(node).len()
    }
}

/// Directed link graph with labelled nodes.
///
/// Built once and read-only afterwards. Construction enforces:
/// - every link target is itself a node of the graph;
/// - no node links to itself;
/// - each node's outbound set has no duplicates.
///
/// Nodes are stored sorted by label, so node `i` in the index-level APIs is
/// `nodes()[i]` and iteration order is stable across runs.
#[derive(Debug, Clone)]
pub struct LinkGraph<N> {
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    links: Vec<Vec<usize>>,
}

impl<N> Default for LinkGraph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            links: Vec::new(),
        }
    }
}

impl<N: NodeId> LinkGraph<N> {
    /// Build a graph from `(node, outbound links)` pairs.
    ///
    /// A node listed more than once has its link sets merged. Nodes that only appear
    /// as link targets are **not** added: such a link is an error, as is a self-link.
    pub fn from_links<I, L>(adjacency: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, L)>,
        L: IntoIterator<Item = N>,
    {
        let mut merged: BTreeMap<N, BTreeSet<N>> = BTreeMap::new();
        for (node, targets) in adjacency {
            merged.entry(node).or_default().extend(targets);
        }

        let nodes: Vec<N> = merged.keys().cloned().collect();
        let index: HashMap<N, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();

        let mut links = Vec::with_capacity(nodes.len());
        for (node, targets) in &merged {
            let mut out = Vec::with_capacity(targets.len());
            for target in targets {
                if target == node {
                    return Err(Error::InvalidGraph(format!("{node:?} links to itself")));
                }
                match index.get(target) {
                    Some(&j) => out.push(j),
                    None => {
                        return Err(Error::InvalidGraph(format!(
                            "{node:?} links to {target:?}, which is not a node of the graph"
                        )))
                    }
                }
            }
            // BTreeSet iteration is sorted and index order follows label order.
            links.push(out);
        }

        Ok(Self {
            nodes,
            index,
            links,
        })
    }

    /// All nodes, sorted by label.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Position of `node` in [`nodes`](Self::nodes).
    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.index.get(node).copied()
    }

    /// Outbound links of `node`, in label order. `None` if `node` is not in the graph.
    pub fn links(&self, node: &N) -> Option<impl Iterator<Item = &N> + '_> {
        let i = self.index_of(node)?;
        Some(self.links[i].iter().map(move |&j| &self.nodes[j]))
    }

    pub fn edge_count(&self) -> usize {
        self.links.iter().map(Vec::len).sum()
    }

    /// Nodes without outbound links.
    pub fn dangling_nodes(&self) -> impl Iterator<Item = &N> + '_ {
        self.links
            .iter()
            .zip(&self.nodes)
            .filter(|(out, _)| out.is_empty())
            .map(|(_, n)| n)
    }
}

impl<N> GraphRef for LinkGraph<N> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn neighbors_ref(&self, node: usize) -> &[usize] {
        self.links.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Node weights become labels. Parallel edges collapse into one link; self-loops are
/// rejected like any other self-link.
#[cfg(feature = "petgraph")]
impl<N, E, Ix> TryFrom<&petgraph::Graph<N, E, petgraph::Directed, Ix>> for LinkGraph<N>
where
    N: NodeId,
    Ix: petgraph::graph::IndexType,
{
    type Error = Error;

    fn try_from(graph: &petgraph::Graph<N, E, petgraph::Directed, Ix>) -> Result<Self> {
        Self::from_links(graph.node_indices().map(|u| {
            let targets: Vec<N> = graph.neighbors(u).map(|v| graph[v].clone()).collect();
            (graph[u].clone(), targets)
        }))
    }
}
