use rustc_hash::FxHashMap;

use super::support::{edge_payload, node_payload, payload, FakeDriver};
use crate::canvas::VisualizationCanvas;
use crate::config::CanvasConfig;
use crate::detail::{DetailPanel, DetailRequest};
use crate::driver::PointerTarget;
use crate::event::{CanvasEvent, Effect, Notice};
use crate::geom::point;
use crate::model::{Direction, EdgeId, GraphEdgeId, GraphNodeId, NodeId};

fn canvas() -> VisualizationCanvas<FakeDriver> {
    VisualizationCanvas::new(FakeDriver::new(), CanvasConfig::default())
}

/// Nodes {1, 2, 3}, edges 101: 1->2 and 102: 1->3, both "Mock Edge".
fn fan_out_canvas() -> VisualizationCanvas<FakeDriver> {
    let mut canvas = canvas();
    canvas.load(payload(
        vec![
            node_payload(1, "Mock Node 1"),
            node_payload(2, "Mock Node 2"),
            node_payload(3, "Mock Node 3"),
        ],
        vec![
            edge_payload(101, 1, 2, "Mock Edge"),
            edge_payload(102, 1, 3, "Mock Edge"),
        ],
    ));
    canvas
}

fn group_fan_out(canvas: &mut VisualizationCanvas<FakeDriver>) {
    let effects = canvas.group_neighbors_with_relationship(
        NodeId(1),
        "Mock Edge",
        Direction::From,
        &FxHashMap::default(),
    );
    assert!(effects.iter().all(|e| !matches!(e, Effect::Notice(_))));
}

#[test]
fn load_mirrors_the_payload_onto_the_driver() {
    let canvas = fan_out_canvas();
    assert_eq!(canvas.entities().node_count(), 3);
    assert_eq!(canvas.entities().edge_count(), 2);
    assert_eq!(canvas.driver().nodes.len(), 3);
    assert_eq!(canvas.driver().edges.len(), 2);
}

#[test]
fn double_clicking_a_collapsed_node_requests_expansion() {
    let mut canvas = fan_out_canvas();
    let hit = point(1.0, 1.0);
    canvas
        .driver_mut()
        .stub_node_hit(hit, PointerTarget::Node(GraphNodeId::Node(NodeId(1))));

    let effects = canvas.handle_event(CanvasEvent::DoubleClick { point: hit });
    assert_eq!(
        effects,
        vec![Effect::RequestExpansion {
            node: NodeId(1),
            limit: canvas.config().expansion_limit,
        }]
    );
}

#[test]
fn expansion_payload_is_merged_and_marks_the_node_expanded() {
    let mut canvas = fan_out_canvas();
    let effects = canvas.apply_expansion(
        NodeId(1),
        payload(
            vec![node_payload(4, "Mock Node 4")],
            vec![edge_payload(104, 1, 4, "Mock Edge")],
        ),
    );
    assert!(effects.is_empty());
    assert!(canvas.entities().vis_node(NodeId(1)).unwrap().expanded);
    assert!(canvas.entities().vis_node(NodeId(4)).is_some());
    assert!(canvas.entities().vis_edge(EdgeId(104)).is_some());
    assert!(canvas
        .driver()
        .nodes
        .contains(&GraphNodeId::Node(NodeId(4))));
}

#[test]
fn empty_expansion_surfaces_a_no_relationships_notice() {
    let mut canvas = fan_out_canvas();
    let effects = canvas.apply_expansion(NodeId(1), payload(vec![], vec![]));
    assert_eq!(
        effects,
        vec![Effect::Notice(Notice::NoRelationships { node: NodeId(1) })]
    );
    assert!(!canvas.entities().vis_node(NodeId(1)).unwrap().expanded);
}

#[test]
fn expansion_skips_edges_already_absorbed_by_a_cluster() {
    let mut canvas = fan_out_canvas();
    group_fan_out(&mut canvas);

    // The server re-reports node 2 and its edge; the edge is currently
    // represented by a cluster duplicate and must not be re-drawn.
    let effects = canvas.apply_expansion(
        NodeId(1),
        payload(
            vec![node_payload(2, "Mock Node 2")],
            vec![edge_payload(101, 1, 2, "Mock Edge")],
        ),
    );
    assert!(effects.is_empty());
    assert!(canvas.entities().vis_node(NodeId(2)).is_some());
    assert!(canvas.entities().vis_edge(EdgeId(101)).is_none());
}

#[test]
fn double_clicking_an_expanded_node_collapses_its_neighborhood() {
    let mut canvas = fan_out_canvas();
    canvas.apply_expansion(
        NodeId(1),
        payload(
            vec![node_payload(4, "Mock Node 4")],
            vec![edge_payload(104, 1, 4, "Mock Edge")],
        ),
    );

    let hit = point(1.0, 1.0);
    canvas
        .driver_mut()
        .stub_node_hit(hit, PointerTarget::Node(GraphNodeId::Node(NodeId(1))));
    let effects = canvas.handle_event(CanvasEvent::DoubleClick { point: hit });
    assert!(effects.is_empty());

    // Every neighbor had only its edge to node 1, so the canvas shrinks back
    // to the origin.
    assert_eq!(canvas.entities().node_count(), 1);
    assert_eq!(canvas.entities().edge_count(), 0);
    assert!(!canvas.entities().vis_node(NodeId(1)).unwrap().expanded);
    assert_eq!(canvas.driver().nodes, vec![GraphNodeId::Node(NodeId(1))]);
}

#[test]
fn collapsing_opens_clusters_anchored_at_the_node_first() {
    let mut canvas = fan_out_canvas();
    group_fan_out(&mut canvas);

    // Mark expanded so the double-click collapses.
    canvas.apply_expansion(
        NodeId(1),
        payload(
            vec![node_payload(5, "Mock Node 5")],
            vec![edge_payload(105, 1, 5, "Mock Edge 2")],
        ),
    );

    let hit = point(1.0, 1.0);
    canvas
        .driver_mut()
        .stub_node_hit(hit, PointerTarget::Node(GraphNodeId::Node(NodeId(1))));
    canvas.handle_event(CanvasEvent::DoubleClick { point: hit });

    assert!(canvas.clusters().is_empty());
    assert_eq!(canvas.entities().node_count(), 1);
    assert_eq!(canvas.entities().edge_count(), 0);
    assert!(canvas.driver().glyphs.is_empty());
}

#[test]
fn grouping_mirrors_duplicates_and_the_glyph_onto_the_driver() {
    let mut canvas = fan_out_canvas();
    group_fan_out(&mut canvas);

    let record = canvas.clusters().records().next().unwrap();
    let driver = canvas.driver();
    assert_eq!(driver.glyphs.len(), 1);
    let seed = &driver.glyphs[0];
    assert_eq!(seed.origin, NodeId(1));
    assert_eq!(seed.relationship, "Mock Edge");
    assert_eq!(seed.member_nodes.len(), 2);

    for member in &record.members {
        assert!(driver
            .nodes
            .contains(&GraphNodeId::Duplicate(member.duplicate_node)));
        assert!(driver
            .edges
            .contains(&GraphEdgeId::Duplicate(member.duplicate_edge)));
    }
    assert!(!driver.nodes.contains(&GraphNodeId::Node(NodeId(2))));
    assert!(!driver.edges.contains(&GraphEdgeId::Edge(EdgeId(101))));
}

#[test]
fn grouping_nothing_surfaces_a_notice() {
    let mut canvas = fan_out_canvas();
    let effects = canvas.group_neighbors_with_relationship(
        NodeId(1),
        "NO SUCH EDGE",
        Direction::From,
        &FxHashMap::default(),
    );
    assert_eq!(
        effects,
        vec![Effect::Notice(Notice::NoRelationships { node: NodeId(1) })]
    );
}

#[test]
fn ambiguous_grouping_surfaces_a_clustering_error_and_changes_nothing() {
    let mut canvas = fan_out_canvas();
    canvas.apply_expansion(
        NodeId(1),
        payload(vec![], vec![edge_payload(103, 1, 2, "Mock Edge")]),
    );

    let effects = canvas.group_neighbors_with_relationship(
        NodeId(1),
        "Mock Edge",
        Direction::From,
        &FxHashMap::default(),
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notice(Notice::ClusteringError { .. })]
    ));
    assert_eq!(canvas.entities().node_count(), 3);
    assert_eq!(canvas.entities().edge_count(), 3);
    assert!(canvas.clusters().is_empty());
}

#[test]
fn removing_a_node_destroys_its_clusters_before_the_node_goes() {
    let mut canvas = fan_out_canvas();
    group_fan_out(&mut canvas);

    let effects = canvas.remove_nodes(&[NodeId(1)]);
    assert!(effects.is_empty());
    assert!(canvas.clusters().is_empty());
    assert_eq!(canvas.entities().node_count(), 0);
    assert_eq!(canvas.entities().edge_count(), 0);
    assert!(canvas.driver().nodes.is_empty());
    assert!(canvas.driver().edges.is_empty());
    assert!(canvas.driver().glyphs.is_empty());
}

#[test]
fn clicking_a_cluster_requests_its_snippets() {
    let mut canvas = fan_out_canvas();
    group_fan_out(&mut canvas);
    let cluster = canvas.clusters().records().next().unwrap().id;

    let hit = point(3.0, 3.0);
    canvas
        .driver_mut()
        .stub_node_hit(hit, PointerTarget::Cluster(cluster));
    let effects = canvas.handle_event(CanvasEvent::Click { point: hit });

    match effects.as_slice() {
        [Effect::RequestDetail(DetailRequest::ClusterSnippets { cluster: id, edges, .. })] => {
            assert_eq!(*id, cluster);
            assert_eq!(edges.len(), 2);
            assert!(edges.iter().any(|e| e.edge_id == EdgeId(101)));
            assert!(edges.iter().any(|e| e.edge_id == EdgeId(102)));
        }
        other => panic!("expected a cluster snippet request, got {other:?}"),
    }
}

#[test]
fn opening_a_cluster_restores_the_driver_too() {
    let mut canvas = fan_out_canvas();
    group_fan_out(&mut canvas);
    let cluster = canvas.clusters().records().next().unwrap().id;

    canvas.open_cluster(cluster).unwrap();
    let driver = canvas.driver();
    assert!(driver.glyphs.is_empty());
    assert!(driver.nodes.contains(&GraphNodeId::Node(NodeId(2))));
    assert!(driver.nodes.contains(&GraphNodeId::Node(NodeId(3))));
    assert!(driver.edges.contains(&GraphEdgeId::Edge(EdgeId(101))));
    assert_eq!(driver.nodes.len(), 3);
    assert_eq!(driver.edges.len(), 2);
}

#[test]
fn select_neighbors_flows_through_the_tracker() {
    let mut canvas = fan_out_canvas();
    canvas.select_neighbors(GraphNodeId::Node(NodeId(1)));
    assert_eq!(canvas.selection().selected_nodes().len(), 2);
}

#[test]
fn drags_resync_selection_only_after_they_end() {
    let mut canvas = fan_out_canvas();
    canvas.driver_mut().selected_nodes = vec![GraphNodeId::Node(NodeId(1))];

    let effects = canvas.handle_event(CanvasEvent::DragStart {
        point: point(0.0, 0.0),
    });
    assert!(effects.is_empty());
    assert_eq!(canvas.detail_panel(), &DetailPanel::Empty);

    let effects = canvas.handle_event(CanvasEvent::DragEnd);
    assert!(effects.is_empty());
    assert_eq!(canvas.detail_panel(), &DetailPanel::Node { node: NodeId(1) });
}

#[test]
fn single_node_reset_drops_clusters_and_selection() {
    let mut canvas = fan_out_canvas();
    group_fan_out(&mut canvas);

    canvas.update_canvas_with_single_node(node_payload(9, "Mock Node 9"));
    assert_eq!(canvas.entities().node_count(), 1);
    assert_eq!(canvas.entities().edge_count(), 0);
    assert!(canvas.clusters().is_empty());
    assert!(canvas.selection().selected_nodes().is_empty());
    assert_eq!(canvas.driver().nodes, vec![GraphNodeId::Node(NodeId(9))]);
    assert!(canvas.driver().glyphs.is_empty());
}
