//! Shared fixtures: canvas entities in the shape the graph store hands out,
//! and a scripted driver standing in for the rendering library.

use serde_json::Map;

use crate::driver::{ClusterSeed, PointerTarget, RenderingDriver};
use crate::geom::Point;
use crate::model::{
    CanvasEdge, CanvasNode, EdgeId, EdgePayload, GraphEdgeId, GraphNodeId, GraphPayload, NodeId,
    NodePayload, VisEdge, VisNode,
};

pub(crate) fn vis_node(id: i64, name: &str) -> VisNode {
    VisNode {
        id: NodeId(id),
        label: name.to_string(),
        display_name: name.to_string(),
        primary_label: "Mock Node".to_string(),
        sub_labels: vec!["Mock Node".to_string()],
        data: Map::new(),
        expanded: false,
    }
}

pub(crate) fn vis_edge(id: i64, from: i64, to: i64, label: &str) -> VisEdge {
    VisEdge {
        id: EdgeId(id),
        label: label.to_string(),
        from: NodeId(from),
        to: NodeId(to),
        data: Map::new(),
    }
}

pub(crate) fn node_payload(id: i64, name: &str) -> NodePayload {
    NodePayload {
        id: NodeId(id),
        display_name: name.to_string(),
        label: "Mock Node".to_string(),
        sub_labels: vec!["Mock Node".to_string()],
        data: Map::new(),
    }
}

pub(crate) fn edge_payload(id: i64, from: i64, to: i64, label: &str) -> EdgePayload {
    EdgePayload {
        id: EdgeId(id),
        label: label.to_string(),
        from: NodeId(from),
        to: NodeId(to),
        data: Map::new(),
    }
}

pub(crate) fn payload(nodes: Vec<NodePayload>, edges: Vec<EdgePayload>) -> GraphPayload {
    GraphPayload { nodes, edges }
}

/// Records engine calls and answers selection and hit-test queries from
/// scripted state.
#[derive(Default)]
pub(crate) struct FakeDriver {
    pub nodes: Vec<GraphNodeId>,
    pub edges: Vec<GraphEdgeId>,
    pub selected_nodes: Vec<GraphNodeId>,
    pub selected_edges: Vec<GraphEdgeId>,
    pub glyphs: Vec<ClusterSeed>,
    pub node_hits: Vec<(Point, PointerTarget)>,
    pub edge_hits: Vec<(Point, GraphEdgeId)>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub_node_hit(&mut self, point: Point, target: PointerTarget) {
        self.node_hits.push((point, target));
    }

    pub fn stub_edge_hit(&mut self, point: Point, edge: GraphEdgeId) {
        self.edge_hits.push((point, edge));
    }
}

impl RenderingDriver for FakeDriver {
    fn add_node(&mut self, node: &CanvasNode) {
        let id = node.id();
        if !self.nodes.contains(&id) {
            self.nodes.push(id);
        }
    }

    fn update_node(&mut self, _node: &CanvasNode) {}

    fn remove_node(&mut self, id: GraphNodeId) {
        self.nodes.retain(|n| *n != id);
    }

    fn add_edge(&mut self, edge: &CanvasEdge) {
        let id = edge.id();
        if !self.edges.contains(&id) {
            self.edges.push(id);
        }
    }

    fn remove_edge(&mut self, id: GraphEdgeId) {
        self.edges.retain(|e| *e != id);
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.selected_nodes.clear();
        self.selected_edges.clear();
        self.glyphs.clear();
    }

    fn select_nodes(&mut self, ids: &[GraphNodeId]) {
        self.selected_nodes = ids.to_vec();
    }

    fn select_edges(&mut self, ids: &[GraphEdgeId]) {
        self.selected_edges = ids.to_vec();
    }

    fn unselect_all(&mut self) {
        self.selected_nodes.clear();
        self.selected_edges.clear();
    }

    fn selected_nodes(&self) -> Vec<GraphNodeId> {
        self.selected_nodes.clone()
    }

    fn selected_edges(&self) -> Vec<GraphEdgeId> {
        self.selected_edges.clone()
    }

    fn cluster(&mut self, seed: &ClusterSeed) {
        self.glyphs.push(seed.clone());
    }

    fn open_cluster(&mut self, id: crate::model::ClusterId) {
        self.glyphs.retain(|g| g.id != id);
    }

    fn node_at(&self, point: Point) -> Option<PointerTarget> {
        self.node_hits
            .iter()
            .find(|(p, _)| *p == point)
            .map(|(_, t)| *t)
    }

    fn edge_at(&self, point: Point) -> Option<GraphEdgeId> {
        self.edge_hits
            .iter()
            .find(|(p, _)| *p == point)
            .map(|(_, e)| *e)
    }
}
