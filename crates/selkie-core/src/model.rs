//! Canvas entity model.
//!
//! Two id namespaces coexist on the canvas: database ids (`NodeId`/`EdgeId`,
//! straight from the graph store) and generated ids for the stand-in entities
//! clustering creates (`DuplicateNodeId`/`DuplicateEdgeId`/`ClusterId`). The
//! tagged unions `GraphNodeId`/`GraphEdgeId` keep the two apart without any
//! structural sniffing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::CanvasConfig;

/// Identifier of a node row in the graph database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a relationship row in the graph database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub i64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generated id of a duplicate node created at cluster-build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateNodeId(Uuid);

impl DuplicateNodeId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DuplicateNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicateNode:{}", self.0)
    }
}

/// Generated id of a duplicate edge created at cluster-build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateEdgeId(Uuid);

impl DuplicateEdgeId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DuplicateEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicateEdge:{}", self.0)
    }
}

/// Generated id of an active cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(Uuid);

impl ClusterId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster:{}", self.0)
    }
}

/// Id of any node drawn on the canvas, original or duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphNodeId {
    Node(NodeId),
    Duplicate(DuplicateNodeId),
}

impl GraphNodeId {
    pub fn as_original(self) -> Option<NodeId> {
        match self {
            GraphNodeId::Node(id) => Some(id),
            GraphNodeId::Duplicate(_) => None,
        }
    }

    pub fn is_duplicate(self) -> bool {
        matches!(self, GraphNodeId::Duplicate(_))
    }
}

impl From<NodeId> for GraphNodeId {
    fn from(id: NodeId) -> Self {
        GraphNodeId::Node(id)
    }
}

impl From<DuplicateNodeId> for GraphNodeId {
    fn from(id: DuplicateNodeId) -> Self {
        GraphNodeId::Duplicate(id)
    }
}

impl fmt::Display for GraphNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphNodeId::Node(id) => id.fmt(f),
            GraphNodeId::Duplicate(id) => id.fmt(f),
        }
    }
}

/// Id of any edge drawn on the canvas, original or duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphEdgeId {
    Edge(EdgeId),
    Duplicate(DuplicateEdgeId),
}

impl GraphEdgeId {
    pub fn as_original(self) -> Option<EdgeId> {
        match self {
            GraphEdgeId::Edge(id) => Some(id),
            GraphEdgeId::Duplicate(_) => None,
        }
    }

    pub fn is_duplicate(self) -> bool {
        matches!(self, GraphEdgeId::Duplicate(_))
    }
}

impl From<EdgeId> for GraphEdgeId {
    fn from(id: EdgeId) -> Self {
        GraphEdgeId::Edge(id)
    }
}

impl From<DuplicateEdgeId> for GraphEdgeId {
    fn from(id: DuplicateEdgeId) -> Self {
        GraphEdgeId::Duplicate(id)
    }
}

impl fmt::Display for GraphEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphEdgeId::Edge(id) => id.fmt(f),
            GraphEdgeId::Duplicate(id) => id.fmt(f),
        }
    }
}

/// Which endpoint of an edge a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    From,
    To,
}

/// A node as drawn on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisNode {
    pub id: NodeId,
    /// Canvas display string; long names are abbreviated, see
    /// [`CanvasConfig::max_label_len`].
    pub label: String,
    pub display_name: String,
    pub primary_label: String,
    #[serde(default)]
    pub sub_labels: Vec<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Whether the user has requested this node's neighbors.
    pub expanded: bool,
}

/// Stand-in copy of a [`VisNode`] representing cluster membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateVisNode {
    pub id: DuplicateNodeId,
    pub duplicate_of: NodeId,
    pub label: String,
    pub display_name: String,
    pub primary_label: String,
    #[serde(default)]
    pub sub_labels: Vec<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub expanded: bool,
}

/// An edge as drawn on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisEdge {
    pub id: EdgeId,
    /// Relationship name.
    pub label: String,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl VisEdge {
    /// Which end `node` occupies, if any.
    pub fn direction_from(&self, node: NodeId) -> Option<Direction> {
        if self.from == node {
            Some(Direction::From)
        } else if self.to == node {
            Some(Direction::To)
        } else {
            None
        }
    }

    pub fn other_endpoint(&self, node: NodeId) -> Option<NodeId> {
        if self.from == node {
            Some(self.to)
        } else if self.to == node {
            Some(self.from)
        } else {
            None
        }
    }
}

/// Stand-in copy of a [`VisEdge`].
///
/// `from`/`to` hold the post-substitution endpoints (the cluster origin stays
/// verbatim, the far end becomes a duplicate node); `original_from`/
/// `original_to` always reproduce the pre-duplication endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateVisEdge {
    pub id: DuplicateEdgeId,
    pub duplicate_of: EdgeId,
    pub label: String,
    pub from: GraphNodeId,
    pub to: GraphNodeId,
    pub original_from: NodeId,
    pub original_to: NodeId,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// Any node payload held by the entity registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanvasNode {
    Original(VisNode),
    Duplicate(DuplicateVisNode),
}

impl CanvasNode {
    pub fn id(&self) -> GraphNodeId {
        match self {
            CanvasNode::Original(n) => GraphNodeId::Node(n.id),
            CanvasNode::Duplicate(n) => GraphNodeId::Duplicate(n.id),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CanvasNode::Original(n) => &n.display_name,
            CanvasNode::Duplicate(n) => &n.display_name,
        }
    }

    pub fn primary_label(&self) -> &str {
        match self {
            CanvasNode::Original(n) => &n.primary_label,
            CanvasNode::Duplicate(n) => &n.primary_label,
        }
    }

    pub fn as_original(&self) -> Option<&VisNode> {
        match self {
            CanvasNode::Original(n) => Some(n),
            CanvasNode::Duplicate(_) => None,
        }
    }

    pub fn as_duplicate(&self) -> Option<&DuplicateVisNode> {
        match self {
            CanvasNode::Original(_) => None,
            CanvasNode::Duplicate(n) => Some(n),
        }
    }
}

/// Any edge payload held by the entity registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanvasEdge {
    Original(VisEdge),
    Duplicate(DuplicateVisEdge),
}

impl CanvasEdge {
    pub fn id(&self) -> GraphEdgeId {
        match self {
            CanvasEdge::Original(e) => GraphEdgeId::Edge(e.id),
            CanvasEdge::Duplicate(e) => GraphEdgeId::Duplicate(e.id),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CanvasEdge::Original(e) => &e.label,
            CanvasEdge::Duplicate(e) => &e.label,
        }
    }

    pub fn endpoints(&self) -> (GraphNodeId, GraphNodeId) {
        match self {
            CanvasEdge::Original(e) => (GraphNodeId::Node(e.from), GraphNodeId::Node(e.to)),
            CanvasEdge::Duplicate(e) => (e.from, e.to),
        }
    }

    pub fn as_original(&self) -> Option<&VisEdge> {
        match self {
            CanvasEdge::Original(e) => Some(e),
            CanvasEdge::Duplicate(_) => None,
        }
    }

    pub fn as_duplicate(&self) -> Option<&DuplicateVisEdge> {
        match self {
            CanvasEdge::Original(_) => None,
            CanvasEdge::Duplicate(e) => Some(e),
        }
    }
}

/// One line of cluster-glyph content describing a clustered node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTableRow {
    pub node_id: NodeId,
    pub display_name: String,
    /// Owning (primary) label of the clustered node.
    pub label: String,
    /// Evidence count used for ranking; drives "showing N of M" truncation.
    pub snippet_count: u64,
}

/// Nodes and edges as returned by the graph store (initial load or
/// expansion), before conversion to canvas form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
    #[serde(default)]
    pub nodes: Vec<NodePayload>,
    #[serde(default)]
    pub edges: Vec<EdgePayload>,
}

impl GraphPayload {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePayload {
    pub id: NodeId,
    pub display_name: String,
    pub label: String,
    #[serde(default)]
    pub sub_labels: Vec<String>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl NodePayload {
    /// Converts a store payload into canvas form: collapsed by default, the
    /// store label becomes the primary label, long display names are
    /// abbreviated.
    pub fn into_vis_node(self, config: &CanvasConfig) -> VisNode {
        let label = abbreviate(&self.display_name, config.max_label_len);
        VisNode {
            id: self.id,
            label,
            display_name: self.display_name,
            primary_label: self.label,
            sub_labels: self.sub_labels,
            data: self.data,
            expanded: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgePayload {
    pub id: EdgeId,
    pub label: String,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl EdgePayload {
    pub fn into_vis_edge(self) -> VisEdge {
        VisEdge {
            id: self.id,
            label: self.label,
            from: self.from,
            to: self.to,
            data: self.data,
        }
    }
}

fn abbreviate(name: &str, max_len: usize) -> String {
    if name.chars().count() > max_len {
        let mut out: String = name.chars().take(max_len).collect();
        out.push_str("...");
        out
    } else {
        name.to_string()
    }
}
