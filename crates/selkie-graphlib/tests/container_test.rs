use selkie_graphlib::Graph;

fn graph() -> Graph<&'static str, u32, i32, &'static str> {
    Graph::new()
}

#[test]
fn set_node_inserts_then_replaces() {
    let mut g = graph();
    g.set_node("a", 1);
    g.set_node("a", 2);

    assert_eq!(g.node_count(), 1);
    assert_eq!(g.node(&"a"), Some(&2));
}

#[test]
fn set_edge_requires_both_endpoints() {
    let mut g = graph();
    g.set_node("a", 0);

    assert!(!g.set_edge(1, "a", "b", "rel"));
    assert_eq!(g.edge_count(), 0);

    g.set_node("b", 0);
    assert!(g.set_edge(1, "a", "b", "rel"));
    assert_eq!(g.edge(&1), Some(&"rel"));
    assert_eq!(g.endpoints(&1), Some((&"a", &"b")));
}

#[test]
fn parallel_edges_are_distinct_by_id() {
    let mut g = graph();
    g.set_node("a", 0);
    g.set_node("b", 0);
    g.set_edge(1, "a", "b", "x");
    g.set_edge(2, "a", "b", "y");

    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.edges_between(&"a", &"b"), vec![1, 2]);
}

#[test]
fn adjacency_respects_direction() {
    let mut g = graph();
    g.set_node("a", 0);
    g.set_node("b", 0);
    g.set_node("c", 0);
    g.set_edge(1, "a", "b", "rel");
    g.set_edge(2, "c", "a", "rel");

    assert_eq!(g.out_edges(&"a"), vec![1]);
    assert_eq!(g.in_edges(&"a"), vec![2]);
    assert_eq!(g.node_edges(&"a"), vec![1, 2]);
    assert_eq!(g.degree(&"a"), 2);
    assert_eq!(g.successors(&"a"), vec!["b"]);
    assert_eq!(g.predecessors(&"a"), vec!["c"]);
    assert_eq!(g.neighbors(&"a"), vec!["b", "c"]);
}

#[test]
fn neighbors_deduplicates_two_way_connections() {
    let mut g = graph();
    g.set_node("a", 0);
    g.set_node("b", 0);
    g.set_edge(1, "a", "b", "rel");
    g.set_edge(2, "b", "a", "rel");

    assert_eq!(g.neighbors(&"a"), vec!["b"]);
}

#[test]
fn remove_node_detaches_incident_edges() {
    let mut g = graph();
    g.set_node("a", 0);
    g.set_node("b", 0);
    g.set_node("c", 0);
    g.set_edge(1, "a", "b", "rel");
    g.set_edge(2, "b", "c", "rel");
    g.set_edge(3, "a", "c", "rel");

    let (_, detached) = g.remove_node(&"b").unwrap();
    assert_eq!(detached, vec![1, 2]);
    assert!(!g.has_node(&"b"));
    assert!(!g.has_edge(&1));
    assert!(!g.has_edge(&2));
    assert!(g.has_edge(&3));
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn remove_edge_returns_payload() {
    let mut g = graph();
    g.set_node("a", 0);
    g.set_node("b", 0);
    g.set_edge(1, "a", "b", "rel");

    assert_eq!(g.remove_edge(&1), Some("rel"));
    assert_eq!(g.remove_edge(&1), None);
    assert!(g.has_node(&"a"));
}

#[test]
fn iteration_follows_insertion_order() {
    let mut g = graph();
    g.set_node("c", 0);
    g.set_node("a", 0);
    g.set_node("b", 0);
    g.set_edge(9, "c", "a", "rel");
    g.set_edge(4, "a", "b", "rel");

    assert_eq!(g.node_ids(), vec!["c", "a", "b"]);
    assert_eq!(g.edge_ids(), vec![9, 4]);

    let mut seen = Vec::new();
    g.for_each_edge(|id, from, to, _| seen.push((*id, *from, *to)));
    assert_eq!(seen, vec![(9, "c", "a"), (4, "a", "b")]);
}

#[test]
fn clear_resets_everything() {
    let mut g = graph();
    g.set_node("a", 0);
    g.set_node("b", 0);
    g.set_edge(1, "a", "b", "rel");

    g.clear();
    assert_eq!(g.node_count(), 0);
    assert_eq!(g.edge_count(), 0);
    assert!(!g.has_node(&"a"));
}
