//! The canvas facade: owns every registry and is the only entry point for
//! interaction.
//!
//! All rendering-driver callbacks funnel through
//! [`VisualizationCanvas::handle_event`]; operations that the host triggers
//! from menus or service responses (grouping, expansion payloads, detail
//! responses) have their own methods. Registry mutation happens here and in
//! the cluster lifecycle manager, nowhere else, and cluster cleanup always
//! runs before the entities it refers to are removed.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::cluster::{BuildOutcome, ClusterRegistry, TeardownReport};
use crate::config::CanvasConfig;
use crate::detail::{
    Delivery, DetailPanel, DetailRequest, DetailResolver, DetailSubject, DetailTarget,
    EdgeReference, RequestToken, SnippetPage,
};
use crate::driver::{ClusterSeed, PointerTarget, RenderingDriver};
use crate::error::{Result, ServiceError};
use crate::event::{CanvasEvent, Effect, Notice};
use crate::model::{
    ClusterId, Direction, GraphEdgeId, GraphNodeId, GraphPayload, NodeId, NodePayload,
};
use crate::registry::EntityRegistry;
use crate::selection::SelectionTracker;

pub struct VisualizationCanvas<D: RenderingDriver> {
    driver: D,
    config: CanvasConfig,
    entities: EntityRegistry,
    clusters: ClusterRegistry,
    selection: SelectionTracker,
    detail: DetailResolver,
    last_detail_target: DetailTarget,
}

impl<D: RenderingDriver> VisualizationCanvas<D> {
    pub fn new(driver: D, config: CanvasConfig) -> Self {
        Self {
            driver,
            config,
            entities: EntityRegistry::new(),
            clusters: ClusterRegistry::new(),
            selection: SelectionTracker::new(),
            detail: DetailResolver::new(),
            last_detail_target: DetailTarget::None,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn clusters(&self) -> &ClusterRegistry {
        &self.clusters
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn detail_panel(&self) -> &DetailPanel {
        self.detail.panel()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Replaces the canvas contents with a fresh graph payload.
    pub fn load(&mut self, payload: GraphPayload) {
        self.reset();
        for node in payload.nodes {
            let vis = node.into_vis_node(&self.config);
            self.entities.insert_node(vis);
        }
        for edge in payload.edges {
            self.entities.insert_edge(edge.into_vis_edge());
        }
        for id in self.entities.node_ids() {
            if let Some(node) = self.entities.node(id) {
                self.driver.add_node(node);
            }
        }
        for id in self.entities.edge_ids() {
            if let Some(edge) = self.entities.edge(id) {
                self.driver.add_edge(edge);
            }
        }
    }

    /// Resets the canvas to a single node, e.g. after a search jump.
    pub fn update_canvas_with_single_node(&mut self, payload: NodePayload) {
        self.reset();
        let vis = payload.into_vis_node(&self.config);
        let id = GraphNodeId::Node(vis.id);
        self.entities.insert_node(vis);
        if let Some(node) = self.entities.node(id) {
            self.driver.add_node(node);
        }
    }

    /// Single dispatch point for rendering-driver interaction callbacks.
    pub fn handle_event(&mut self, event: CanvasEvent) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            CanvasEvent::Click { point } => {
                self.selection.hide_context_menu();
                let cluster = match self.driver.node_at(point) {
                    Some(PointerTarget::Cluster(id)) => Some(id),
                    _ => None,
                };
                self.selection.set_selected_cluster(cluster);
                self.sync_selection();
                self.refresh_detail(&mut effects);
            }
            CanvasEvent::DoubleClick { point } => match self.driver.node_at(point) {
                Some(PointerTarget::Cluster(id)) => match self.open_cluster(id) {
                    Ok(opened) => effects.extend(opened),
                    Err(err) => warn!(%err, "double-clicked cluster was not active"),
                },
                Some(PointerTarget::Node(GraphNodeId::Node(id))) => {
                    self.expand_or_collapse(id, &mut effects);
                }
                _ => {}
            },
            CanvasEvent::Context { point } => {
                self.selection.resolve_context(
                    &mut self.driver,
                    &self.entities,
                    &self.clusters,
                    &self.config,
                    point,
                );
                self.refresh_detail(&mut effects);
            }
            CanvasEvent::DragStart { .. } => {
                // A drag is not a click: hide popups, but leave the selection
                // resync to the drag-end event.
                self.selection.hide_context_menu();
                self.selection.update_selected_nodes(&self.driver);
            }
            CanvasEvent::DragEnd
            | CanvasEvent::NodeSelected
            | CanvasEvent::NodeDeselected
            | CanvasEvent::EdgeSelected
            | CanvasEvent::EdgeDeselected => {
                self.sync_selection();
                self.refresh_detail(&mut effects);
            }
            CanvasEvent::NodeHovered { target } => {
                if let PointerTarget::Cluster(id) = target {
                    self.selection.set_hovered_cluster(Some(id));
                }
            }
            CanvasEvent::NodeBlurred { target } => {
                if let PointerTarget::Cluster(_) = target {
                    self.selection.set_hovered_cluster(None);
                }
            }
        }
        effects
    }

    /// Groups `origin`'s neighbors over one relationship and direction into a
    /// cluster. `snippet_counts` supplies evidence counts for the glyph rows;
    /// the host fetches them from the reference-table service beforehand.
    pub fn group_neighbors_with_relationship(
        &mut self,
        origin: NodeId,
        relationship: &str,
        direction: Direction,
        snippet_counts: &FxHashMap<NodeId, u64>,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.clusters.build(
            &mut self.entities,
            origin,
            relationship,
            direction,
            snippet_counts,
        ) {
            Err(err) => {
                warn!(%err, origin = %origin, relationship, "clustering aborted");
                effects.push(Effect::Notice(Notice::ClusteringError {
                    message: err.to_string(),
                }));
            }
            Ok(BuildOutcome::NoRelationships) => {
                effects.push(Effect::Notice(Notice::NoRelationships { node: origin }));
            }
            Ok(BuildOutcome::Built(report)) => {
                if let Some(prev) = report.superseded {
                    self.driver.open_cluster(prev);
                    self.selection.prune_cluster(prev);
                }
                for id in &report.discarded_duplicate_edges {
                    self.driver.remove_edge(GraphEdgeId::Duplicate(*id));
                }
                for id in &report.discarded_duplicate_nodes {
                    self.driver.remove_node(GraphNodeId::Duplicate(*id));
                }
                for id in &report.added_duplicate_nodes {
                    if let Some(node) = self.entities.node(GraphNodeId::Duplicate(*id)) {
                        self.driver.add_node(node);
                    }
                }
                for id in &report.added_duplicate_edges {
                    if let Some(edge) = self.entities.edge(GraphEdgeId::Duplicate(*id)) {
                        self.driver.add_edge(edge);
                    }
                }
                let removed_edges: Vec<GraphEdgeId> = report
                    .removed_edges
                    .iter()
                    .map(|id| GraphEdgeId::Edge(*id))
                    .collect();
                let removed_nodes: Vec<GraphNodeId> = report
                    .removed_nodes
                    .iter()
                    .map(|id| GraphNodeId::Node(*id))
                    .collect();
                for id in &removed_edges {
                    self.driver.remove_edge(*id);
                }
                for id in &removed_nodes {
                    self.driver.remove_node(*id);
                }
                if let Some(record) = self.clusters.record(report.cluster) {
                    self.driver.cluster(&ClusterSeed {
                        id: record.id,
                        origin: record.origin,
                        relationship: record.relationship.clone(),
                        member_nodes: record.members.iter().map(|m| m.duplicate_node).collect(),
                        member_edges: record.members.iter().map(|m| m.duplicate_edge).collect(),
                    });
                }
                self.selection.prune_removed(&removed_nodes, &removed_edges);
                self.sync_selection();
                self.refresh_detail(&mut effects);
            }
        }
        effects
    }

    /// Opens a cluster, restoring its members as if clustering had never
    /// happened.
    pub fn open_cluster(&mut self, id: ClusterId) -> Result<Vec<Effect>> {
        let report = self.clusters.open(&mut self.entities, id)?;
        self.mirror_teardown(&report);
        for node in &report.restored_nodes {
            if let Some(n) = self.entities.node(GraphNodeId::Node(*node)) {
                self.driver.add_node(n);
            }
        }
        for edge in &report.restored_edges {
            if let Some(e) = self.entities.edge(GraphEdgeId::Edge(*edge)) {
                self.driver.add_edge(e);
            }
        }
        let mut effects = Vec::new();
        self.selection.prune_cluster(id);
        self.sync_selection();
        self.refresh_detail(&mut effects);
        Ok(effects)
    }

    /// Double-click behavior for plain nodes: collapse an expanded node, ask
    /// the host to expand a collapsed one.
    fn expand_or_collapse(&mut self, node: NodeId, effects: &mut Vec<Effect>) {
        let expanded = match self.entities.vis_node(node) {
            Some(vis) => vis.expanded,
            None => return,
        };
        if expanded {
            self.collapse_neighbors(node);
            self.sync_selection();
            self.refresh_detail(effects);
        } else {
            effects.push(Effect::RequestExpansion {
                node,
                limit: self.config.expansion_limit,
            });
        }
    }

    /// Merges an expansion payload into the canvas. Originals already
    /// represented by an active cluster's duplicate are not re-drawn.
    pub fn apply_expansion(&mut self, node: NodeId, payload: GraphPayload) -> Vec<Effect> {
        let mut effects = Vec::new();
        if payload.is_empty() {
            effects.push(Effect::Notice(Notice::NoRelationships { node }));
            return effects;
        }

        let duplicated = self.clusters.duplicated_original_edges();
        for np in payload.nodes {
            if self.entities.vis_node(np.id).is_some() {
                continue;
            }
            let vis = np.into_vis_node(&self.config);
            let id = GraphNodeId::Node(vis.id);
            self.entities.insert_node(vis);
            if let Some(n) = self.entities.node(id) {
                self.driver.add_node(n);
            }
        }
        for ep in payload.edges {
            if self.entities.vis_edge(ep.id).is_some() || duplicated.contains(&ep.id) {
                continue;
            }
            let vis = ep.into_vis_edge();
            let id = GraphEdgeId::Edge(vis.id);
            if self.entities.insert_edge(vis) {
                if let Some(e) = self.entities.edge(id) {
                    self.driver.add_edge(e);
                }
            }
        }

        if let Some(vis) = self.entities.vis_node_mut(node) {
            vis.expanded = true;
        }
        if let Some(n) = self.entities.node(GraphNodeId::Node(node)) {
            self.driver.update_node(n);
        }
        self.sync_selection();
        self.refresh_detail(&mut effects);
        effects
    }

    /// Removes nodes from the canvas. Clusters touching a removed node are
    /// destroyed first (their duplicates are discarded, not restored; callers
    /// wanting the members back open the clusters beforehand).
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> Vec<Effect> {
        let mut effects = Vec::new();
        for &id in ids {
            for cluster in self.clusters.clusters_adjacent_to(id) {
                match self.clusters.destroy(&mut self.entities, cluster) {
                    Ok(report) => {
                        self.mirror_teardown(&report);
                        self.selection.prune_cluster(cluster);
                    }
                    Err(err) => warn!(%err, "cluster vanished during node removal"),
                }
            }
            let node_id = GraphNodeId::Node(id);
            if let Some(removed_edges) = self.entities.remove_node(node_id) {
                for eid in &removed_edges {
                    self.driver.remove_edge(*eid);
                }
                self.driver.remove_node(node_id);
                self.selection.prune_removed(&[node_id], &removed_edges);
            }
        }
        self.sync_selection();
        self.refresh_detail(&mut effects);
        effects
    }

    /// Selects the direct neighbors of `node`.
    pub fn select_neighbors(&mut self, node: GraphNodeId) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.selection.select_neighbors(
            &mut self.driver,
            &self.entities,
            &self.clusters,
            node,
        );
        self.refresh_detail(&mut effects);
        effects
    }

    /// Hands a snippet-service response to the resolver. Stale responses are
    /// dropped there.
    pub fn deliver_detail(
        &mut self,
        token: RequestToken,
        result: std::result::Result<SnippetPage, ServiceError>,
    ) -> Delivery {
        self.detail.deliver(token, result)
    }

    /// Asks for another page of the current detail subject.
    pub fn request_detail_page(&mut self, page: usize) -> Option<DetailRequest> {
        self.detail.request_page(page, self.config.snippet_page_limit)
    }

    /// Removes every edge connected to `node` and any neighbor that ends up
    /// isolated; clusters anchored at the node are opened first so their
    /// members get the same treatment as plain neighbors.
    fn collapse_neighbors(&mut self, node: NodeId) {
        for cluster in self.clusters.clusters_anchored_at(node) {
            match self.clusters.open(&mut self.entities, cluster) {
                Ok(report) => {
                    self.mirror_teardown(&report);
                    for restored in &report.restored_nodes {
                        if let Some(n) = self.entities.node(GraphNodeId::Node(*restored)) {
                            self.driver.add_node(n);
                        }
                    }
                    for restored in &report.restored_edges {
                        if let Some(e) = self.entities.edge(GraphEdgeId::Edge(*restored)) {
                            self.driver.add_edge(e);
                        }
                    }
                    self.selection.prune_cluster(cluster);
                }
                Err(err) => warn!(%err, "cluster vanished during collapse"),
            }
        }

        let node_id = GraphNodeId::Node(node);
        let mut removed_edges: Vec<GraphEdgeId> = Vec::new();
        let mut touched: Vec<GraphNodeId> = Vec::new();
        for eid in self.entities.edges_of(node_id) {
            if let Some(edge) = self.entities.edge(eid) {
                let (from, to) = edge.endpoints();
                let other = if from == node_id { to } else { from };
                if !touched.contains(&other) {
                    touched.push(other);
                }
            }
            self.entities.remove_edge(eid);
            self.driver.remove_edge(eid);
            removed_edges.push(eid);
        }

        let mut removed_nodes: Vec<GraphNodeId> = Vec::new();
        for other in touched {
            if other != node_id && self.entities.degree(other) == 0 {
                self.entities.remove_node(other);
                self.driver.remove_node(other);
                removed_nodes.push(other);
            }
        }

        if let Some(vis) = self.entities.vis_node_mut(node) {
            vis.expanded = false;
        }
        if let Some(n) = self.entities.node(node_id) {
            self.driver.update_node(n);
        }
        self.selection.prune_removed(&removed_nodes, &removed_edges);
    }

    fn mirror_teardown(&mut self, report: &TeardownReport) {
        self.driver.open_cluster(report.cluster);
        for id in &report.removed_duplicate_edges {
            self.driver.remove_edge(GraphEdgeId::Duplicate(*id));
        }
        for id in &report.removed_duplicate_nodes {
            self.driver.remove_node(GraphNodeId::Duplicate(*id));
        }
    }

    fn sync_selection(&mut self) {
        self.selection.update_selected_nodes(&self.driver);
        self.selection
            .update_selected_edges(&self.driver, &self.clusters);
        self.selection
            .refresh_node_edge_labels(&self.entities, &self.clusters);
    }

    /// What the detail panel should be about, given the current selection.
    fn detail_target(&self) -> DetailTarget {
        if let Some(cluster) = self.selection.selected_cluster() {
            return DetailTarget::Cluster(cluster);
        }
        match (
            self.selection.selected_nodes(),
            self.selection.selected_edges(),
        ) {
            ([GraphNodeId::Node(id)], []) => DetailTarget::Node(*id),
            ([], [edge]) => DetailTarget::Edge(*edge),
            _ => DetailTarget::None,
        }
    }

    /// Re-evaluates the detail target and, when it changed, lets the resolver
    /// supersede whatever fetch is in flight.
    fn refresh_detail(&mut self, effects: &mut Vec<Effect>) {
        let target = self.detail_target();
        if target == self.last_detail_target {
            return;
        }
        self.last_detail_target = target;

        let subject = match target {
            DetailTarget::Edge(id) => self.edge_reference(id).map(DetailSubject::Edge),
            DetailTarget::Cluster(id) => {
                self.clusters.record(id).map(|r| DetailSubject::Cluster {
                    id,
                    edges: r.member_edge_references(),
                })
            }
            DetailTarget::None | DetailTarget::Node(_) => None,
        };
        if let Some(request) =
            self.detail
                .on_selection(target, |_| subject, 1, self.config.snippet_page_limit)
        {
            effects.push(Effect::RequestDetail(request));
        }
    }

    /// The original endpoints of any canvas edge, as the snippet service
    /// expects them.
    fn edge_reference(&self, id: GraphEdgeId) -> Option<EdgeReference> {
        match id {
            GraphEdgeId::Edge(eid) => self.entities.vis_edge(eid).map(|e| EdgeReference {
                edge_id: e.id,
                from: e.from,
                to: e.to,
                label: e.label.clone(),
            }),
            GraphEdgeId::Duplicate(_) => self.entities.duplicate_edge(id).map(|e| EdgeReference {
                edge_id: e.duplicate_of,
                from: e.original_from,
                to: e.original_to,
                label: e.label.clone(),
            }),
        }
    }

    fn reset(&mut self) {
        self.entities.clear();
        self.clusters.clear();
        self.selection.clear();
        self.driver.clear();
        self.last_detail_target = DetailTarget::None;
        let _ = self
            .detail
            .on_selection(DetailTarget::None, |_| None, 1, self.config.snippet_page_limit);
    }
}
