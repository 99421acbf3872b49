//! End-to-end scenarios mirroring the reference walkthroughs used while
//! designing the crate: edges and lookups, through-connections, slice
//! growth with caller-guided branch choice, deletion refusal and
//! shrink-to-degenerate recovery, edge splitting, and division placement.

use trackgraph::division::{CancellationToken, DivisionGraph};
use trackgraph::helpers::split_edge;
use trackgraph::track::TrackGraph;

#[test]
fn edges_and_lookups() {
	let mut g = TrackGraph::<&str, u32>::new();

	assert!(g.add_edge("a", "b", 123).unwrap());
	assert!(!g.add_edge("a", "b", 999).unwrap());
	assert!(g.add_edge("b", "c", 10).unwrap());

	let edge = g.lookup_edge(&"b", &"a").unwrap();
	assert_eq!(edge.low, "a");
	assert_eq!(edge.high, "b");
	assert_eq!(edge.length, 123);
	assert!(edge.slices.is_empty());

	let node = g.lookup_node(&"b");
	assert_eq!(node.other.get(&"a"), Some(&Vec::new()));
	assert_eq!(node.other.get(&"c"), Some(&Vec::new()));
}

#[test]
fn connections() {
	let mut g = TrackGraph::<&str, u32>::new();
	g.add_edge("a", "b", 123).unwrap();
	g.add_edge("b", "c", 10).unwrap();

	assert!(g.connect(&"a", &"b", &"c").unwrap());
	assert!(!g.connect(&"a", &"b", &"c").unwrap());
	assert!(!g.connect(&"c", &"b", &"a").unwrap());

	let node = g.lookup_node(&"b");
	assert_eq!(node.other.get(&"a"), Some(&vec!["c"]));
	assert_eq!(node.other.get(&"c"), Some(&vec!["a"]));

	assert!(g.disconnect(&"c", &"b", &"a").unwrap());
	assert!(!g.disconnect(&"c", &"b", &"a").unwrap());
}

#[test]
fn slice_grow_with_choice() {
	let mut g = TrackGraph::<&str, u32>::new();
	g.add_edge("a", "b", 10).unwrap();
	g.add_edge("b", "c", 17).unwrap();
	g.connect(&"a", &"b", &"c").unwrap();

	assert!(g.add_slice(1u32, "b"));
	let delta = g.modify_slice(&1u32, 1, 3, |choices| {
		assert!(choices.contains(&"c"));
		Some("c")
	});
	assert_eq!(delta, 3);

	let described = g.lookup_slice(&1u32).unwrap();
	assert_eq!(described.along, vec!["b", "c"]);
	assert_eq!(described.back, 0);
	assert_eq!(described.front, 14);
	assert_eq!(described.length, 3);

	// the slice has entered the edge but not yet reached node "c"
	assert!(!g.lookup_node(&"c").slices.contains(&1u32));
}

#[test]
fn deletion_refusal_and_recovery() {
	let mut g = TrackGraph::<&str, u32>::new();
	g.add_edge("a", "b", 10).unwrap();
	g.add_edge("b", "c", 17).unwrap();
	g.connect(&"a", &"b", &"c").unwrap();
	g.add_slice(1u32, "b");
	g.modify_slice(&1u32, 1, 3, |_| Some("c"));

	assert!(!g.delete_edge(&"b", &"c"));

	let delta = g.modify_slice(&1u32, 1, -10, |_| None);
	assert_eq!(delta, -3); // clamped: only 3 units were occupied

	let described = g.lookup_slice(&1u32).unwrap();
	assert_eq!(described.length, 0);

	assert!(g.delete_edge(&"b", &"c"));
}

#[test]
fn split_edge_rehomes_slice_across_two_splits() {
	let mut g = TrackGraph::<&str, u32>::new();
	g.add_edge("a", "b", 10).unwrap();
	g.add_edge("c", "b", 17).unwrap();
	g.connect(&"a", &"b", &"c").unwrap();
	g.add_slice(1u32, "b");
	g.modify_slice(&1u32, 1, 3, |_| Some("c"));

	assert!(split_edge(&mut g, &"c", &"b", 10, "q1").unwrap());
	assert!(split_edge(&mut g, &"b", &"q1", 2, "q2").unwrap());

	let described = g.lookup_slice(&1u32).unwrap();
	assert_eq!(described.along, vec!["b", "q2", "q1"]);
	assert_eq!(described.back, 0);
	assert_eq!(described.front, 4);
	assert_eq!(described.length, 3);
}

#[test]
fn division_placement_and_cancellation() {
	let mut g = TrackGraph::<&str, u32>::new();
	g.add_edge("n1", "n2", 100).unwrap();
	g.add_edge("n2", "n3", 100).unwrap();

	let token = CancellationToken::new();
	let mut div = DivisionGraph::new(&mut g, token.clone());

	let mut before = div.lookup_division_by_edge(&"n1", &"n2");
	before.sort();
	let mut expected = vec![("n1", "n2"), ("n2", "n3")];
	expected.sort();
	assert_eq!(before, expected);

	assert!(div.add_division(&"n2"));
	assert_eq!(div.lookup_division_by_edge(&"n1", &"n2"), vec![("n1", "n2")]);
	assert_eq!(div.lookup_division_by_edge(&"n3", &"n2"), vec![("n2", "n3")]);

	token.cancel();
	assert!(div.lookup_division_by_edge(&"n1", &"n2").is_empty());
}
