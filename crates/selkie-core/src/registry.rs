//! The live set of entities currently drawn on the canvas.
//!
//! Holds originals and duplicates side by side. Only the canvas facade and the
//! cluster lifecycle manager write to it; everything else reads.

use selkie_graphlib::Graph;

use crate::model::{
    CanvasEdge, CanvasNode, DuplicateVisEdge, DuplicateVisNode, EdgeId, GraphEdgeId, GraphNodeId,
    NodeId, VisEdge, VisNode,
};

#[derive(Default)]
pub struct EntityRegistry {
    graph: Graph<GraphNodeId, GraphEdgeId, CanvasNode, CanvasEdge>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn insert_node(&mut self, node: VisNode) {
        self.graph
            .set_node(GraphNodeId::Node(node.id), CanvasNode::Original(node));
    }

    pub fn insert_duplicate_node(&mut self, node: DuplicateVisNode) {
        self.graph
            .set_node(GraphNodeId::Duplicate(node.id), CanvasNode::Duplicate(node));
    }

    /// Inserts an edge; returns `false` if either endpoint is missing.
    pub fn insert_edge(&mut self, edge: VisEdge) -> bool {
        self.graph.set_edge(
            GraphEdgeId::Edge(edge.id),
            GraphNodeId::Node(edge.from),
            GraphNodeId::Node(edge.to),
            CanvasEdge::Original(edge),
        )
    }

    pub fn insert_duplicate_edge(&mut self, edge: DuplicateVisEdge) -> bool {
        self.graph.set_edge(
            GraphEdgeId::Duplicate(edge.id),
            edge.from,
            edge.to,
            CanvasEdge::Duplicate(edge),
        )
    }

    pub fn has_node(&self, id: GraphNodeId) -> bool {
        self.graph.has_node(&id)
    }

    pub fn has_edge(&self, id: GraphEdgeId) -> bool {
        self.graph.has_edge(&id)
    }

    pub fn node(&self, id: GraphNodeId) -> Option<&CanvasNode> {
        self.graph.node(&id)
    }

    pub fn edge(&self, id: GraphEdgeId) -> Option<&CanvasEdge> {
        self.graph.edge(&id)
    }

    pub fn vis_node(&self, id: NodeId) -> Option<&VisNode> {
        self.graph
            .node(&GraphNodeId::Node(id))
            .and_then(CanvasNode::as_original)
    }

    pub fn vis_node_mut(&mut self, id: NodeId) -> Option<&mut VisNode> {
        match self.graph.node_mut(&GraphNodeId::Node(id)) {
            Some(CanvasNode::Original(n)) => Some(n),
            _ => None,
        }
    }

    pub fn vis_edge(&self, id: EdgeId) -> Option<&VisEdge> {
        self.graph
            .edge(&GraphEdgeId::Edge(id))
            .and_then(CanvasEdge::as_original)
    }

    pub fn duplicate_node(&self, id: GraphNodeId) -> Option<&DuplicateVisNode> {
        self.graph.node(&id).and_then(CanvasNode::as_duplicate)
    }

    pub fn duplicate_edge(&self, id: GraphEdgeId) -> Option<&DuplicateVisEdge> {
        self.graph.edge(&id).and_then(CanvasEdge::as_duplicate)
    }

    /// Removes a node and its incident edges; reports the detached edge ids so
    /// the caller can mirror the removal on the rendering side.
    pub fn remove_node(&mut self, id: GraphNodeId) -> Option<Vec<GraphEdgeId>> {
        self.graph.remove_node(&id).map(|(_, edges)| edges)
    }

    pub fn remove_edge(&mut self, id: GraphEdgeId) -> Option<CanvasEdge> {
        self.graph.remove_edge(&id)
    }

    pub fn edges_of(&self, id: GraphNodeId) -> Vec<GraphEdgeId> {
        self.graph.node_edges(&id)
    }

    pub fn degree(&self, id: GraphNodeId) -> usize {
        self.graph.degree(&id)
    }

    pub fn edges_between(&self, a: GraphNodeId, b: GraphNodeId) -> Vec<GraphEdgeId> {
        self.graph.edges_between(&a, &b)
    }

    pub fn neighbors(&self, id: GraphNodeId) -> Vec<GraphNodeId> {
        self.graph.neighbors(&id)
    }

    /// Original (non-duplicate) edges touching an original node.
    pub fn original_edges_of(&self, id: NodeId) -> Vec<&VisEdge> {
        self.graph
            .node_edges(&GraphNodeId::Node(id))
            .into_iter()
            .filter_map(|eid| self.graph.edge(&eid))
            .filter_map(CanvasEdge::as_original)
            .collect()
    }

    pub fn node_ids(&self) -> Vec<GraphNodeId> {
        self.graph.node_ids()
    }

    pub fn edge_ids(&self) -> Vec<GraphEdgeId> {
        self.graph.edge_ids()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CanvasNode> {
        self.graph.nodes().map(|(_, n)| n)
    }

    pub fn edges(&self) -> impl Iterator<Item = &CanvasEdge> {
        self.graph.edges().map(|(_, e)| e)
    }

    pub fn clear(&mut self) {
        self.graph.clear();
    }
}
