//! Property-graph container APIs used by `selkie-core`.
//!
//! This is a graphlib-style container reshaped for canvas entities: edges carry
//! their own identifiers (parallel edges between the same pair of nodes are
//! normal in property graphs), and both id types are generic so callers can key
//! the graph by typed id unions instead of strings.

#![forbid(unsafe_code)]

use rustc_hash::FxBuildHasher;
use std::hash::Hash;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
struct NodeEntry<NI, N> {
    id: NI,
    label: N,
}

#[derive(Debug, Clone)]
struct EdgeEntry<EI, NI, E> {
    id: EI,
    from: NI,
    to: NI,
    label: E,
}

/// Endpoints of an edge, in `(from, to)` order.
pub type Endpoints<NI> = (NI, NI);

/// A directed multigraph with node and edge payloads ("labels" in graphlib
/// terms), keyed by caller-supplied ids.
///
/// Nodes and edges iterate in insertion order. Adjacency queries scan the edge
/// list; canvases hold hundreds of entities, not millions, so the simple
/// representation wins over index maintenance.
pub struct Graph<NI, EI, N, E>
where
    NI: Clone + Eq + Hash,
    EI: Clone + Eq + Hash,
{
    nodes: Vec<NodeEntry<NI, N>>,
    node_index: HashMap<NI, usize>,

    edges: Vec<EdgeEntry<EI, NI, E>>,
    edge_index: HashMap<EI, usize>,
}

impl<NI, EI, N, E> Default for Graph<NI, EI, N, E>
where
    NI: Clone + Eq + Hash,
    EI: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<NI, EI, N, E> Graph<NI, EI, N, E>
where
    NI: Clone + Eq + Hash,
    EI: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn has_node(&self, id: &NI) -> bool {
        self.node_index.contains_key(id)
    }

    /// Inserts a node, or replaces the payload of an existing one.
    pub fn set_node(&mut self, id: NI, label: N) -> &mut Self {
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    pub fn node(&self, id: &NI) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &NI) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&NI, &N)> {
        self.nodes.iter().map(|n| (&n.id, &n.label))
    }

    pub fn node_ids(&self) -> Vec<NI> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn has_edge(&self, id: &EI) -> bool {
        self.edge_index.contains_key(id)
    }

    /// Inserts an edge, or replaces the payload of an existing one.
    ///
    /// Both endpoints must already be present; a dangling endpoint leaves the
    /// graph untouched and returns `false`.
    pub fn set_edge(&mut self, id: EI, from: NI, to: NI, label: E) -> bool {
        if !self.has_node(&from) || !self.has_node(&to) {
            return false;
        }
        if let Some(&idx) = self.edge_index.get(&id) {
            let entry = &mut self.edges[idx];
            entry.from = from;
            entry.to = to;
            entry.label = label;
            return true;
        }
        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            id: id.clone(),
            from,
            to,
            label,
        });
        self.edge_index.insert(id, idx);
        true
    }

    pub fn edge(&self, id: &EI) -> Option<&E> {
        self.edge_index.get(id).map(|&idx| &self.edges[idx].label)
    }

    pub fn edge_mut(&mut self, id: &EI) -> Option<&mut E> {
        self.edge_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.edges[idx].label)
    }

    pub fn endpoints(&self, id: &EI) -> Option<Endpoints<&NI>> {
        self.edge_index
            .get(id)
            .map(|&idx| (&self.edges[idx].from, &self.edges[idx].to))
    }

    pub fn edges(&self) -> impl Iterator<Item = (&EI, &E)> {
        self.edges.iter().map(|e| (&e.id, &e.label))
    }

    pub fn edge_ids(&self) -> Vec<EI> {
        self.edges.iter().map(|e| e.id.clone()).collect()
    }

    pub fn for_each_edge<F>(&self, mut f: F)
    where
        F: FnMut(&EI, &NI, &NI, &E),
    {
        for e in &self.edges {
            f(&e.id, &e.from, &e.to, &e.label);
        }
    }

    pub fn remove_edge(&mut self, id: &EI) -> Option<E> {
        let idx = self.edge_index.remove(id)?;
        let entry = self.edges.remove(idx);
        self.reindex_edges();
        Some(entry.label)
    }

    /// Removes a node along with its incident edges; returns the ids of the
    /// edges that went with it so callers can mirror the removal elsewhere.
    pub fn remove_node(&mut self, id: &NI) -> Option<(N, Vec<EI>)> {
        let idx = self.node_index.remove(id)?;
        let entry = self.nodes.remove(idx);
        self.reindex_nodes();

        let detached: Vec<EI> = self
            .edges
            .iter()
            .filter(|e| &e.from == id || &e.to == id)
            .map(|e| e.id.clone())
            .collect();
        for eid in &detached {
            let _ = self.edge_index.remove(eid);
        }
        self.edges.retain(|e| &e.from != id && &e.to != id);
        self.reindex_edges();

        Some((entry.label, detached))
    }

    /// Edge ids whose `from` endpoint is `v`.
    pub fn out_edges(&self, v: &NI) -> Vec<EI> {
        self.edges
            .iter()
            .filter(|e| &e.from == v)
            .map(|e| e.id.clone())
            .collect()
    }

    /// Edge ids whose `to` endpoint is `v`.
    pub fn in_edges(&self, v: &NI) -> Vec<EI> {
        self.edges
            .iter()
            .filter(|e| &e.to == v)
            .map(|e| e.id.clone())
            .collect()
    }

    /// All edge ids incident to `v`, in either orientation.
    pub fn node_edges(&self, v: &NI) -> Vec<EI> {
        self.edges
            .iter()
            .filter(|e| &e.from == v || &e.to == v)
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn degree(&self, v: &NI) -> usize {
        self.edges
            .iter()
            .filter(|e| &e.from == v || &e.to == v)
            .count()
    }

    /// Edge ids running between `a` and `b`, in either orientation.
    pub fn edges_between(&self, a: &NI, b: &NI) -> Vec<EI> {
        self.edges
            .iter()
            .filter(|e| (&e.from == a && &e.to == b) || (&e.from == b && &e.to == a))
            .map(|e| e.id.clone())
            .collect()
    }

    pub fn successors(&self, v: &NI) -> Vec<NI> {
        self.edges
            .iter()
            .filter(|e| &e.from == v)
            .map(|e| e.to.clone())
            .collect()
    }

    pub fn predecessors(&self, v: &NI) -> Vec<NI> {
        self.edges
            .iter()
            .filter(|e| &e.to == v)
            .map(|e| e.from.clone())
            .collect()
    }

    /// Distinct nodes adjacent to `v`, in first-seen order.
    pub fn neighbors(&self, v: &NI) -> Vec<NI> {
        let mut out: Vec<NI> = Vec::new();
        for w in self.successors(v) {
            if !out.contains(&w) {
                out.push(w);
            }
        }
        for u in self.predecessors(v) {
            if !out.contains(&u) {
                out.push(u);
            }
        }
        out
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.node_index.clear();
        self.edges.clear();
        self.edge_index.clear();
    }

    fn reindex_nodes(&mut self) {
        self.node_index.clear();
        for (i, n) in self.nodes.iter().enumerate() {
            self.node_index.insert(n.id.clone(), i);
        }
    }

    fn reindex_edges(&mut self) {
        self.edge_index.clear();
        for (i, e) in self.edges.iter().enumerate() {
            self.edge_index.insert(e.id.clone(), i);
        }
    }
}
