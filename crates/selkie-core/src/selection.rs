//! Selection and context-menu state.
//!
//! The rendering driver owns the raw selection; this tracker mirrors it,
//! filters out cluster-internal edges, and derives the per-node
//! relationship-label aggregate the "group by relationship" menu is built
//! from. Popup positioning state lives here too, so the host only renders.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::cluster::ClusterRegistry;
use crate::config::CanvasConfig;
use crate::driver::{PointerTarget, RenderingDriver};
use crate::geom::Point;
use crate::model::{
    ClusterId, Direction, GraphEdgeId, GraphNodeId, NodeId, ReferenceTableRow,
};
use crate::registry::EntityRegistry;

/// Relationship label to the directions it occurs in, for one node.
pub type EdgeLabelAggregate = IndexMap<String, FxHashSet<Direction>>;

/// What a right-click resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextTarget {
    Node(GraphNodeId),
    Edge(GraphEdgeId),
    Cluster {
        id: ClusterId,
        /// Ranked member rows, already capped for display.
        rows: Vec<ReferenceTableRow>,
        /// Total members, for the "showing N of M" footer.
        total: usize,
    },
    Canvas,
}

/// Context-menu model: where the menu goes and what it is about.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenuModel {
    pub position: Point,
    pub target: ContextTarget,
}

#[derive(Default)]
pub struct SelectionTracker {
    selected_nodes: Vec<GraphNodeId>,
    selected_edges: Vec<GraphEdgeId>,
    selected_cluster: Option<ClusterId>,
    hovered_cluster: Option<ClusterId>,
    /// Aggregate for the single selected node, when there is exactly one.
    node_edge_labels: EdgeLabelAggregate,
    context_menu: Option<ContextMenuModel>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_nodes(&self) -> &[GraphNodeId] {
        &self.selected_nodes
    }

    pub fn selected_edges(&self) -> &[GraphEdgeId] {
        &self.selected_edges
    }

    pub fn selected_cluster(&self) -> Option<ClusterId> {
        self.selected_cluster
    }

    pub fn hovered_cluster(&self) -> Option<ClusterId> {
        self.hovered_cluster
    }

    pub fn node_edge_labels(&self) -> &EdgeLabelAggregate {
        &self.node_edge_labels
    }

    pub fn context_menu(&self) -> Option<&ContextMenuModel> {
        self.context_menu.as_ref()
    }

    pub fn hide_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn set_hovered_cluster(&mut self, cluster: Option<ClusterId>) {
        self.hovered_cluster = cluster;
    }

    pub fn set_selected_cluster(&mut self, cluster: Option<ClusterId>) {
        self.selected_cluster = cluster;
    }

    /// Mirrors the driver's node selection.
    pub fn update_selected_nodes<D: RenderingDriver>(&mut self, driver: &D) {
        self.selected_nodes = driver.selected_nodes();
    }

    /// Mirrors the driver's edge selection, dropping cluster-internal edges.
    pub fn update_selected_edges<D: RenderingDriver>(
        &mut self,
        driver: &D,
        clusters: &ClusterRegistry,
    ) {
        self.selected_edges = driver
            .selected_edges()
            .into_iter()
            .filter(|id| !clusters.is_cluster_internal_edge(*id))
            .collect();
    }

    /// Labels of every non-clustered edge touching `node`, with the
    /// directions each label occurs in.
    ///
    /// An edge whose far end is already a member of one of `node`'s active
    /// clusters for the same label is skipped: the cluster already represents
    /// it, and offering to group it again would be redundant.
    pub fn connected_edge_labels(
        entities: &EntityRegistry,
        clusters: &ClusterRegistry,
        node: NodeId,
    ) -> EdgeLabelAggregate {
        let mut aggregate = EdgeLabelAggregate::default();
        for edge in entities.original_edges_of(node) {
            let Some(direction) = edge.direction_from(node) else {
                continue;
            };
            let Some(other) = edge.other_endpoint(node) else {
                continue;
            };
            let already_clustered = clusters
                .clusters_anchored_at(node)
                .into_iter()
                .filter_map(|id| clusters.record(id))
                .any(|r| r.relationship == edge.label && r.contains_original(other));
            if already_clustered {
                continue;
            }
            aggregate
                .entry(edge.label.clone())
                .or_default()
                .insert(direction);
        }
        aggregate
    }

    /// Recomputes the aggregate when exactly one original node (and nothing
    /// else) is selected; clears it for every other combination.
    pub fn refresh_node_edge_labels(
        &mut self,
        entities: &EntityRegistry,
        clusters: &ClusterRegistry,
    ) {
        self.node_edge_labels = match self.single_selected_original() {
            Some(node) if self.selected_edges.is_empty() && self.selected_cluster.is_none() => {
                Self::connected_edge_labels(entities, clusters, node)
            }
            _ => EdgeLabelAggregate::default(),
        };
    }

    /// The selected node, when the selection is exactly one original node.
    pub fn single_selected_original(&self) -> Option<NodeId> {
        match self.selected_nodes.as_slice() {
            [GraphNodeId::Node(id)] => Some(*id),
            _ => None,
        }
    }

    /// Resolves a right-click: hit-tests the pointer, adjusts the selection
    /// (a target outside the current selection replaces it; a target inside
    /// it preserves multi-selection), and stores the context-menu model.
    pub fn resolve_context<D: RenderingDriver>(
        &mut self,
        driver: &mut D,
        entities: &EntityRegistry,
        clusters: &ClusterRegistry,
        config: &CanvasConfig,
        position: Point,
    ) {
        self.update_selected_nodes(driver);
        self.update_selected_edges(driver, clusters);

        let target = match driver.node_at(position) {
            Some(PointerTarget::Cluster(id)) => {
                driver.unselect_all();
                self.selected_nodes.clear();
                self.selected_edges.clear();
                self.selected_cluster = Some(id);
                match clusters.record(id) {
                    Some(record) => {
                        let (rows, total) = record.truncated_rows(config.reference_row_limit);
                        ContextTarget::Cluster {
                            id,
                            rows: rows.to_vec(),
                            total,
                        }
                    }
                    None => ContextTarget::Canvas,
                }
            }
            Some(PointerTarget::Node(id)) => {
                self.selected_cluster = None;
                if !self.selected_nodes.contains(&id) {
                    driver.unselect_all();
                    driver.select_nodes(&[id]);
                    self.selected_nodes = vec![id];
                    self.selected_edges.clear();
                }
                ContextTarget::Node(id)
            }
            None => match driver.edge_at(position) {
                Some(id) if !clusters.is_cluster_internal_edge(id) => {
                    self.selected_cluster = None;
                    if !self.selected_edges.contains(&id) {
                        driver.unselect_all();
                        driver.select_edges(&[id]);
                        self.selected_edges = vec![id];
                        self.selected_nodes.clear();
                    }
                    ContextTarget::Edge(id)
                }
                _ => {
                    driver.unselect_all();
                    self.selected_nodes.clear();
                    self.selected_edges.clear();
                    self.selected_cluster = None;
                    ContextTarget::Canvas
                }
            },
        };

        self.refresh_node_edge_labels(entities, clusters);
        self.context_menu = Some(ContextMenuModel { position, target });
    }

    /// Selects `node`'s direct neighbors.
    pub fn select_neighbors<D: RenderingDriver>(
        &mut self,
        driver: &mut D,
        entities: &EntityRegistry,
        clusters: &ClusterRegistry,
        node: GraphNodeId,
    ) {
        let neighbors = entities.neighbors(node);
        driver.unselect_all();
        driver.select_nodes(&neighbors);
        self.update_selected_nodes(driver);
        self.update_selected_edges(driver, clusters);
        self.refresh_node_edge_labels(entities, clusters);
    }

    /// Drops references to entities that just left the canvas.
    pub fn prune_removed(
        &mut self,
        removed_nodes: &[GraphNodeId],
        removed_edges: &[GraphEdgeId],
    ) {
        self.selected_nodes.retain(|id| !removed_nodes.contains(id));
        self.selected_edges.retain(|id| !removed_edges.contains(id));
        if let Some(menu) = &self.context_menu {
            let gone = match &menu.target {
                ContextTarget::Node(id) => removed_nodes.contains(id),
                ContextTarget::Edge(id) => removed_edges.contains(id),
                ContextTarget::Cluster { .. } | ContextTarget::Canvas => false,
            };
            if gone {
                self.context_menu = None;
            }
        }
    }

    /// Drops references to a cluster that is no longer active.
    pub fn prune_cluster(&mut self, cluster: ClusterId) {
        if self.selected_cluster == Some(cluster) {
            self.selected_cluster = None;
        }
        if self.hovered_cluster == Some(cluster) {
            self.hovered_cluster = None;
        }
        if let Some(menu) = &self.context_menu {
            if matches!(&menu.target, ContextTarget::Cluster { id, .. } if *id == cluster) {
                self.context_menu = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected_nodes.clear();
        self.selected_edges.clear();
        self.selected_cluster = None;
        self.hovered_cluster = None;
        self.node_edge_labels.clear();
        self.context_menu = None;
    }
}
