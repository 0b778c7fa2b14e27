//! Cluster records and their lifecycle.
//!
//! A cluster stands in for the neighbors a node reaches through one
//! relationship in one direction. Building one duplicates the affected
//! entities so the canvas can keep showing mixed-relationship originals,
//! absorbs any prior cluster on the same (origin, relationship, direction)
//! triple, and prunes originals that are now represented only by their
//! duplicates. Opening restores the originals exactly; destroying discards
//! the duplicates without conversion.
//!
//! Every operation here either completes fully or leaves the registries
//! untouched: all validation and staging happens before the first mutation.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::duplicate::{
    duplicate_edge, duplicate_node, original_edge_from_duplicate, original_node_from_duplicate,
};
use crate::error::{Error, Result};
use crate::model::{
    ClusterId, Direction, DuplicateEdgeId, DuplicateNodeId, DuplicateVisEdge, DuplicateVisNode,
    EdgeId, GraphEdgeId, GraphNodeId, NodeId, ReferenceTableRow, VisEdge, VisNode,
};
use crate::registry::EntityRegistry;

/// One clustered neighbor: the duplicate pair standing in for it and the
/// originals they were made from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterMember {
    pub original_node: NodeId,
    pub original_edge: EdgeId,
    pub duplicate_node: DuplicateNodeId,
    pub duplicate_edge: DuplicateEdgeId,
}

/// Metadata for one active cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterRecord {
    pub id: ClusterId,
    pub origin: NodeId,
    pub relationship: String,
    pub direction: Direction,
    /// Reference rows in display order: evidence count descending, ties by
    /// display name. The order drives glyph truncation.
    pub rows: Vec<ReferenceTableRow>,
    pub members: Vec<ClusterMember>,
}

impl ClusterRecord {
    pub fn contains_original(&self, node: NodeId) -> bool {
        self.members.iter().any(|m| m.original_node == node)
    }

    pub fn contains_duplicate_edge(&self, id: DuplicateEdgeId) -> bool {
        self.members.iter().any(|m| m.duplicate_edge == id)
    }

    /// The rows to display under a row cap, plus the total member count for
    /// the "showing N of M" footer.
    pub fn truncated_rows(&self, limit: usize) -> (&[ReferenceTableRow], usize) {
        let shown = self.rows.len().min(limit);
        (&self.rows[..shown], self.rows.len())
    }

    /// The member edges as the snippet service understands them: original
    /// endpoints, record-level relationship.
    pub fn member_edge_references(&self) -> Vec<crate::detail::EdgeReference> {
        self.members
            .iter()
            .map(|m| {
                let (from, to) = match self.direction {
                    Direction::From => (self.origin, m.original_node),
                    Direction::To => (m.original_node, self.origin),
                };
                crate::detail::EdgeReference {
                    edge_id: m.original_edge,
                    from,
                    to,
                    label: self.relationship.clone(),
                }
            })
            .collect()
    }
}

/// Result of a cluster build request.
#[derive(Debug)]
pub enum BuildOutcome {
    Built(BuildReport),
    /// No eligible edges; nothing was created or changed.
    NoRelationships,
}

/// What a successful build did to the registry, for mirroring onto the
/// rendering side.
#[derive(Debug)]
pub struct BuildReport {
    pub cluster: ClusterId,
    pub added_duplicate_nodes: Vec<DuplicateNodeId>,
    pub added_duplicate_edges: Vec<DuplicateEdgeId>,
    /// Original edges absorbed into the cluster.
    pub removed_edges: Vec<EdgeId>,
    /// Originals that lost their last edge and left the canvas.
    pub removed_nodes: Vec<NodeId>,
    /// Duplicates of a superseded cluster that were re-clustered fresh and
    /// therefore dropped instead of carried over.
    pub discarded_duplicate_nodes: Vec<DuplicateNodeId>,
    pub discarded_duplicate_edges: Vec<DuplicateEdgeId>,
    pub superseded: Option<ClusterId>,
}

/// What opening or destroying a cluster did to the registry.
#[derive(Debug)]
pub struct TeardownReport {
    pub cluster: ClusterId,
    /// Originals put back on the canvas (empty for destroy).
    pub restored_nodes: Vec<NodeId>,
    pub restored_edges: Vec<EdgeId>,
    pub removed_duplicate_nodes: Vec<DuplicateNodeId>,
    pub removed_duplicate_edges: Vec<DuplicateEdgeId>,
}

impl BuildReport {
    fn new(cluster: ClusterId) -> Self {
        Self {
            cluster,
            added_duplicate_nodes: Vec::new(),
            added_duplicate_edges: Vec::new(),
            removed_edges: Vec::new(),
            removed_nodes: Vec::new(),
            discarded_duplicate_nodes: Vec::new(),
            discarded_duplicate_edges: Vec::new(),
            superseded: None,
        }
    }
}

impl TeardownReport {
    fn new(cluster: ClusterId) -> Self {
        Self {
            cluster,
            restored_nodes: Vec::new(),
            restored_edges: Vec::new(),
            removed_duplicate_nodes: Vec::new(),
            removed_duplicate_edges: Vec::new(),
        }
    }
}

struct StagedMember {
    node: VisNode,
    edge: VisEdge,
    duplicate_node: DuplicateVisNode,
    duplicate_edge: DuplicateVisEdge,
}

/// Owner of all active [`ClusterRecord`]s and the only writer of cluster
/// state. Mutates the entity registry on behalf of its lifecycle operations;
/// cleanup always happens before the originals it refers to are removed.
#[derive(Default)]
pub struct ClusterRegistry {
    records: IndexMap<ClusterId, ClusterRecord>,
}

impl ClusterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, id: ClusterId) -> Option<&ClusterRecord> {
        self.records.get(&id)
    }

    /// Forgets every record without touching the entity registry; only for
    /// wholesale canvas resets where the registry is cleared alongside.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> impl Iterator<Item = &ClusterRecord> {
        self.records.values()
    }

    pub fn find(
        &self,
        origin: NodeId,
        relationship: &str,
        direction: Direction,
    ) -> Option<&ClusterRecord> {
        self.records.values().find(|r| {
            r.origin == origin && r.relationship == relationship && r.direction == direction
        })
    }

    /// Clusters whose origin is `node`.
    pub fn clusters_anchored_at(&self, node: NodeId) -> Vec<ClusterId> {
        self.records
            .values()
            .filter(|r| r.origin == node)
            .map(|r| r.id)
            .collect()
    }

    /// Clusters holding `node` as an absorbed member.
    pub fn clusters_containing(&self, node: NodeId) -> Vec<ClusterId> {
        self.records
            .values()
            .filter(|r| r.contains_original(node))
            .map(|r| r.id)
            .collect()
    }

    /// Clusters that touch `node` either way; the teardown set when the node
    /// is deleted.
    pub fn clusters_adjacent_to(&self, node: NodeId) -> Vec<ClusterId> {
        let mut out = self.clusters_anchored_at(node);
        for id in self.clusters_containing(node) {
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }

    /// Whether `node` is currently absorbed into any active cluster.
    pub fn is_absorbed(&self, node: NodeId) -> bool {
        self.records.values().any(|r| r.contains_original(node))
    }

    /// Whether an edge is internal to an active cluster. Cluster-internal
    /// edges are excluded from selection and from clusterability checks.
    pub fn is_cluster_internal_edge(&self, id: GraphEdgeId) -> bool {
        match id {
            GraphEdgeId::Edge(_) => false,
            GraphEdgeId::Duplicate(dup) => self
                .records
                .values()
                .any(|r| r.contains_duplicate_edge(dup)),
        }
    }

    /// Original edge ids currently represented by a duplicate in some active
    /// cluster. Expansion results matching these are not re-drawn.
    pub fn duplicated_original_edges(&self) -> FxHashSet<EdgeId> {
        self.records
            .values()
            .flat_map(|r| r.members.iter().map(|m| m.original_edge))
            .collect()
    }

    /// Builds (or rebuilds) the cluster for `(origin, relationship,
    /// direction)`.
    ///
    /// `snippet_counts` supplies the evidence counts for the reference rows;
    /// missing entries count as zero.
    pub fn build(
        &mut self,
        entities: &mut EntityRegistry,
        origin: NodeId,
        relationship: &str,
        direction: Direction,
        snippet_counts: &FxHashMap<NodeId, u64>,
    ) -> Result<BuildOutcome> {
        if entities.vis_node(origin).is_none() {
            return Err(Error::UnknownNode { id: origin });
        }

        // Discovery: one qualifying edge per neighbor, or the build aborts.
        let mut qualifying: IndexMap<NodeId, Vec<VisEdge>> = IndexMap::new();
        for edge in entities.original_edges_of(origin) {
            if edge.label != relationship {
                continue;
            }
            let anchored = match direction {
                Direction::From => edge.from == origin,
                Direction::To => edge.to == origin,
            };
            if !anchored {
                continue;
            }
            let Some(neighbor) = edge.other_endpoint(origin) else {
                continue;
            };
            if neighbor == origin {
                continue;
            }
            qualifying.entry(neighbor).or_default().push(edge.clone());
        }

        for (neighbor, edges) in &qualifying {
            if edges.len() != 1 {
                return Err(Error::AmbiguousClusterEdge {
                    origin,
                    neighbor: *neighbor,
                    relationship: relationship.to_string(),
                    found: edges.len(),
                });
            }
        }

        if qualifying.is_empty() {
            return Ok(BuildOutcome::NoRelationships);
        }

        // Staging: duplicates are created up front so the commit below cannot
        // fail halfway through.
        let mut staged: Vec<StagedMember> = Vec::with_capacity(qualifying.len());
        for (neighbor, edges) in &qualifying {
            let node = entities
                .vis_node(*neighbor)
                .ok_or(Error::UnknownNode { id: *neighbor })?
                .clone();
            let edge = edges[0].clone();
            let dup_node = duplicate_node(&node);
            let dup_edge = duplicate_edge(&edge, origin, &dup_node);
            staged.push(StagedMember {
                node,
                edge,
                duplicate_node: dup_node,
                duplicate_edge: dup_edge,
            });
        }

        let id = ClusterId::generate();
        let mut report = BuildReport::new(id);
        let fresh_originals: FxHashSet<NodeId> =
            staged.iter().map(|s| s.node.id).collect();

        // Absorb a prior cluster on the same triple: carry over members that
        // are not being re-clustered fresh, discard the rest.
        let mut carried_members: Vec<ClusterMember> = Vec::new();
        let mut carried_rows: Vec<ReferenceTableRow> = Vec::new();
        if let Some(prev_id) = self.find(origin, relationship, direction).map(|r| r.id) {
            let prev = self
                .records
                .shift_remove(&prev_id)
                .expect("record for found cluster id");
            for member in prev.members {
                if fresh_originals.contains(&member.original_node) {
                    if let Some(removed) =
                        entities.remove_node(GraphNodeId::Duplicate(member.duplicate_node))
                    {
                        report.discarded_duplicate_nodes.push(member.duplicate_node);
                        for eid in removed {
                            if let GraphEdgeId::Duplicate(dup) = eid {
                                report.discarded_duplicate_edges.push(dup);
                            }
                        }
                    }
                } else {
                    let mut row = prev
                        .rows
                        .iter()
                        .find(|r| r.node_id == member.original_node)
                        .cloned()
                        .unwrap_or_else(|| ReferenceTableRow {
                            node_id: member.original_node,
                            display_name: String::new(),
                            label: String::new(),
                            snippet_count: 0,
                        });
                    if let Some(count) = snippet_counts.get(&member.original_node) {
                        row.snippet_count = *count;
                    }
                    carried_rows.push(row);
                    carried_members.push(member);
                }
            }
            report.superseded = Some(prev_id);
            debug!(cluster = %prev_id, "superseded by rebuild on the same triple");
        }

        // Commit: draw the duplicates, then retire the absorbed originals.
        let mut members: Vec<ClusterMember> = Vec::with_capacity(staged.len());
        let mut rows: Vec<ReferenceTableRow> = Vec::with_capacity(staged.len());
        for s in &staged {
            entities.insert_duplicate_node(s.duplicate_node.clone());
            entities.insert_duplicate_edge(s.duplicate_edge.clone());
            report.added_duplicate_nodes.push(s.duplicate_node.id);
            report.added_duplicate_edges.push(s.duplicate_edge.id);

            entities.remove_edge(GraphEdgeId::Edge(s.edge.id));
            report.removed_edges.push(s.edge.id);

            // A neighbor with no remaining edges is now represented purely by
            // its duplicate; a mixed-relationship neighbor stays visible.
            if entities.degree(GraphNodeId::Node(s.node.id)) == 0 {
                entities.remove_node(GraphNodeId::Node(s.node.id));
                report.removed_nodes.push(s.node.id);
            }

            members.push(ClusterMember {
                original_node: s.node.id,
                original_edge: s.edge.id,
                duplicate_node: s.duplicate_node.id,
                duplicate_edge: s.duplicate_edge.id,
            });
            rows.push(ReferenceTableRow {
                node_id: s.node.id,
                display_name: s.node.display_name.clone(),
                label: s.node.primary_label.clone(),
                snippet_count: snippet_counts.get(&s.node.id).copied().unwrap_or(0),
            });
        }

        members.extend(carried_members);
        rows.extend(carried_rows);
        rows.sort_by(|a, b| {
            b.snippet_count
                .cmp(&a.snippet_count)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        debug!(
            cluster = %id,
            origin = %origin,
            relationship,
            members = members.len(),
            "built cluster"
        );
        self.records.insert(
            id,
            ClusterRecord {
                id,
                origin,
                relationship: relationship.to_string(),
                direction,
                rows,
                members,
            },
        );
        Ok(BuildOutcome::Built(report))
    }

    /// Opens a cluster: restores the original entities its duplicates stood
    /// in for, then discards the duplicates and the record. Leaves the canvas
    /// as if clustering had never happened for those members.
    pub fn open(&mut self, entities: &mut EntityRegistry, id: ClusterId) -> Result<TeardownReport> {
        let record = self
            .records
            .shift_remove(&id)
            .ok_or(Error::UnknownCluster { id })?;
        let mut report = TeardownReport::new(id);

        // Restore missing member nodes first; duplicate edges may run between
        // two duplicates, so every endpoint must be back before the edges are.
        for member in &record.members {
            if entities.vis_node(member.original_node).is_some() {
                continue;
            }
            match entities.duplicate_node(GraphNodeId::Duplicate(member.duplicate_node)) {
                Some(dup) => {
                    let node = original_node_from_duplicate(dup);
                    entities.insert_node(node);
                    report.restored_nodes.push(member.original_node);
                }
                None => {
                    warn!(
                        cluster = %id,
                        node = %member.duplicate_node,
                        "duplicate node missing while opening cluster"
                    );
                }
            }
        }

        // Restore the edges the duplicates stood in for.
        for member in &record.members {
            for eid in entities.edges_of(GraphNodeId::Duplicate(member.duplicate_node)) {
                let Some(dup_edge) = entities.duplicate_edge(eid) else {
                    continue;
                };
                let original = original_edge_from_duplicate(dup_edge);
                if entities.vis_edge(original.id).is_none() {
                    let original_id = original.id;
                    if entities.insert_edge(original) {
                        report.restored_edges.push(original_id);
                    }
                }
            }
        }

        self.discard_duplicates(entities, &record, &mut report);
        debug!(
            cluster = %id,
            restored_nodes = report.restored_nodes.len(),
            restored_edges = report.restored_edges.len(),
            "opened cluster"
        );
        Ok(report)
    }

    /// Destroys a cluster outright: duplicates are discarded, nothing is
    /// converted back. Call sites that need the originals restored must open
    /// the cluster instead.
    pub fn destroy(
        &mut self,
        entities: &mut EntityRegistry,
        id: ClusterId,
    ) -> Result<TeardownReport> {
        let record = self
            .records
            .shift_remove(&id)
            .ok_or(Error::UnknownCluster { id })?;
        let mut report = TeardownReport::new(id);
        self.discard_duplicates(entities, &record, &mut report);
        debug!(cluster = %id, "destroyed cluster");
        Ok(report)
    }

    fn discard_duplicates(
        &self,
        entities: &mut EntityRegistry,
        record: &ClusterRecord,
        report: &mut TeardownReport,
    ) {
        for member in &record.members {
            if let Some(removed) =
                entities.remove_node(GraphNodeId::Duplicate(member.duplicate_node))
            {
                report.removed_duplicate_nodes.push(member.duplicate_node);
                for eid in removed {
                    if let GraphEdgeId::Duplicate(dup) = eid {
                        report.removed_duplicate_edges.push(dup);
                    }
                }
            }
        }
    }
}
