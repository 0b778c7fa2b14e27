//! Contract the engine expects from the rendering library.
//!
//! The surface is shaped after vis-network's `Network` + `DataSet` pair:
//! entity CRUD, selection, native clustering primitives and pointer
//! hit-testing. The engine is the single writer; the driver renders what it
//! is told and answers the queries only it can answer (what is selected,
//! what is under the pointer).
//!
//! The native clustering primitive is relationship-agnostic, which is why
//! the engine keeps its own [`ClusterRecord`](crate::cluster::ClusterRecord)
//! registry and only hands the driver a ready-made [`ClusterSeed`].

use crate::geom::Point;
use crate::model::{
    CanvasEdge, CanvasNode, ClusterId, DuplicateEdgeId, DuplicateNodeId, GraphEdgeId, GraphNodeId,
    NodeId,
};

/// What pointer hit-testing can land on. Cluster glyphs behave like nodes on
/// the canvas but are not canvas entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Node(GraphNodeId),
    Cluster(ClusterId),
}

/// Everything the driver needs to draw one cluster glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSeed {
    pub id: ClusterId,
    pub origin: NodeId,
    /// Glyph label; the relationship the cluster was built from.
    pub relationship: String,
    pub member_nodes: Vec<DuplicateNodeId>,
    pub member_edges: Vec<DuplicateEdgeId>,
}

pub trait RenderingDriver {
    fn add_node(&mut self, node: &CanvasNode);
    fn update_node(&mut self, node: &CanvasNode);
    fn remove_node(&mut self, id: GraphNodeId);
    fn add_edge(&mut self, edge: &CanvasEdge);
    fn remove_edge(&mut self, id: GraphEdgeId);
    /// Drops every drawn entity; used when the canvas is reset wholesale.
    fn clear(&mut self);

    fn select_nodes(&mut self, ids: &[GraphNodeId]);
    fn select_edges(&mut self, ids: &[GraphEdgeId]);
    fn unselect_all(&mut self);
    fn selected_nodes(&self) -> Vec<GraphNodeId>;
    fn selected_edges(&self) -> Vec<GraphEdgeId>;

    /// Collapses the seed's members into one glyph.
    fn cluster(&mut self, seed: &ClusterSeed);
    /// Releases a glyph; the engine removes or restores the members itself.
    fn open_cluster(&mut self, id: ClusterId);

    fn node_at(&self, point: Point) -> Option<PointerTarget>;
    fn edge_at(&self, point: Point) -> Option<GraphEdgeId>;
}
