//! Duplication of canvas entities for cluster membership.
//!
//! Duplicates are always one level deep: only originals are ever duplicated,
//! which the signatures here make unrepresentable. None of these functions
//! touch the registry.

use crate::model::{
    DuplicateEdgeId, DuplicateNodeId, DuplicateVisEdge, DuplicateVisNode, GraphNodeId, NodeId,
    VisEdge, VisNode,
};

/// Copies all display fields of `original` under a freshly generated id.
pub fn duplicate_node(original: &VisNode) -> DuplicateVisNode {
    DuplicateVisNode {
        id: DuplicateNodeId::generate(),
        duplicate_of: original.id,
        label: original.label.clone(),
        display_name: original.display_name.clone(),
        primary_label: original.primary_label.clone(),
        sub_labels: original.sub_labels.clone(),
        data: original.data.clone(),
        expanded: original.expanded,
    }
}

/// Copies `original` under a fresh id, rewriting the endpoint opposite
/// `cluster_origin` to point at `duplicate`. The true endpoints are kept on
/// the duplicate so the original can be reconstructed later.
///
/// `original` must actually touch `cluster_origin`; the cluster builder only
/// ever duplicates edges it discovered from the origin's adjacency.
pub fn duplicate_edge(
    original: &VisEdge,
    cluster_origin: NodeId,
    duplicate: &DuplicateVisNode,
) -> DuplicateVisEdge {
    debug_assert!(original.from == cluster_origin || original.to == cluster_origin);

    let (from, to) = if original.from == cluster_origin {
        (
            GraphNodeId::Node(cluster_origin),
            GraphNodeId::Duplicate(duplicate.id),
        )
    } else {
        (
            GraphNodeId::Duplicate(duplicate.id),
            GraphNodeId::Node(cluster_origin),
        )
    };

    DuplicateVisEdge {
        id: DuplicateEdgeId::generate(),
        duplicate_of: original.id,
        label: original.label.clone(),
        from,
        to,
        original_from: original.from,
        original_to: original.to,
        data: original.data.clone(),
    }
}

/// Inverse of [`duplicate_node`].
pub fn original_node_from_duplicate(duplicate: &DuplicateVisNode) -> VisNode {
    VisNode {
        id: duplicate.duplicate_of,
        label: duplicate.label.clone(),
        display_name: duplicate.display_name.clone(),
        primary_label: duplicate.primary_label.clone(),
        sub_labels: duplicate.sub_labels.clone(),
        data: duplicate.data.clone(),
        expanded: duplicate.expanded,
    }
}

/// Inverse of [`duplicate_edge`]; restores the recorded endpoints.
pub fn original_edge_from_duplicate(duplicate: &DuplicateVisEdge) -> VisEdge {
    VisEdge {
        id: duplicate.duplicate_of,
        label: duplicate.label.clone(),
        from: duplicate.original_from,
        to: duplicate.original_to,
        data: duplicate.data.clone(),
    }
}
