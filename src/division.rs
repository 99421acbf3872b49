//==== division ==================================================================

//! # DivisionGraph
//!
//! Edge-level connectivity over a `TrackGraph`, skipping paths that cross a
//! **blocked** node. A division is a block placed on a node; placing one
//! doesn't touch the track topology, only which edges this graph reports
//! as reachable from one another.
//!
//! Representation trick (edge-as-node): each track edge gets a unique
//! surrogate token, paired in a `ComponentGraph` with the two node keys it
//! connects. Two edges share a division iff their tokens share a
//! component. Blocking node `n` removes `n`'s pairings to its incident
//! edge tokens, severing the component there; unblocking restores them.
//! With no nodes blocked, every edge reachable from another through the
//! track topology shares one division — blocking is what carves the graph
//! into disjoint sections.
//!
//! A `DivisionGraph` subscribes to its `TrackGraph`'s edge-change feed to
//! stay in sync with topology edits. Since `TrackGraph::subscribe` offers
//! no unsubscribe, a `DivisionGraph` that should stop tracking is silenced
//! instead: drop its `CancellationToken` clone to flip the shared flag, and
//! every subsequent call becomes a no-op, as if the subscription had been
//! dropped.

use ahash::{AHashMap, AHashSet};
use std::cell::{Cell, RefCell};
use std::hash::Hash;
use std::rc::Rc;

use crate::collections::PairMap;
use crate::component_graph::ComponentGraph;
use crate::track::{EdgeChange, TrackGraph};

/// A shared flag that silences a `DivisionGraph`'s subscription once set.
pub struct CancellationToken(Rc<Cell<bool>>);

impl CancellationToken {
	/// Create a fresh, not-yet-cancelled token.
	pub fn new() -> Self {
		Self(Rc::new(Cell::new(false)))
	}

	/// Flip the flag. May be called more than once; later calls are no-ops.
	pub fn cancel(&self) {
		self.0.set(true);
	}

	/// Whether `cancel` has been called on this token or any of its clones.
	pub fn is_cancelled(&self) -> bool {
		self.0.get()
	}
}

impl Default for CancellationToken {
	fn default() -> Self {
		Self::new()
	}
}

impl Clone for CancellationToken {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum DivKey<K> {
	Node(K),
	Edge(u64),
}

struct DivisionState<K>
where
	K: Clone + Hash + Eq,
{
	component: ComponentGraph<DivKey<K>>,
	edge_tokens: PairMap<K, u64>,
	token_pairs: AHashMap<u64, (K, K)>,
	blocked: AHashSet<K>,
	next_token: u64,
}

impl<K> DivisionState<K>
where
	K: Clone + Hash + Eq,
{
	fn link(&mut self, node: &K, token: u64) {
		if !self.blocked.contains(node) {
			self.component.add(DivKey::Node(node.clone()), DivKey::Edge(token));
		}
	}

	fn token_for(&mut self, a: &K, b: &K) -> u64 {
		if let Some(&t) = self.edge_tokens.get(a, b) {
			return t;
		}
		let t = self.next_token;
		self.next_token += 1;
		self.edge_tokens.set(a, b, t);
		self.token_pairs.insert(t, (a.clone(), b.clone()));
		self.link(a, t);
		self.link(b, t);
		t
	}

	fn on_change(&mut self, change: &EdgeChange<K>) {
		if change.length == 0 {
			if let Some(t) = self.edge_tokens.remove(&change.a, &change.b) {
				self.component.delete(&DivKey::Node(change.a.clone()), &DivKey::Edge(t));
				self.component.delete(&DivKey::Node(change.b.clone()), &DivKey::Edge(t));
				self.token_pairs.remove(&t);
			}
		} else {
			self.token_for(&change.a, &change.b);
		}
	}
}

/// Tracks edge-level connectivity over a `TrackGraph`, respecting blocked
/// nodes (divisions).
///
/// # Examples
///
/// ```
/// use trackgraph::track::TrackGraph;
/// use trackgraph::division::{CancellationToken, DivisionGraph};
///
/// let mut g = TrackGraph::<&str, u32>::new();
/// g.add_edge("n1", "n2", 100).unwrap();
/// g.add_edge("n2", "n3", 100).unwrap();
///
/// let token = CancellationToken::new();
/// let mut div = DivisionGraph::new(&mut g, token.clone());
///
/// // before any division, both edges share one division through n2
/// assert_eq!(div.lookup_division_by_edge(&"n1", &"n2").len(), 2);
///
/// assert!(div.add_division(&"n2"));
/// assert_eq!(div.lookup_division_by_edge(&"n1", &"n2"), vec![("n1", "n2")]);
///
/// token.cancel();
/// assert!(div.lookup_division_by_edge(&"n1", &"n2").is_empty());
/// ```
pub struct DivisionGraph<K>
where
	K: Clone + Hash + Eq,
{
	state: Rc<RefCell<DivisionState<K>>>,
	cancel: CancellationToken,
}

impl<K> DivisionGraph<K>
where
	K: Clone + Hash + Eq + 'static,
{
	/// Build a division graph over `graph`, replaying its current edges and
	/// then subscribing to future changes. `cancel` is the handle whose
	/// cancellation silences this division graph's subscription; clone it
	/// before passing it in if the caller needs to retain one.
	pub fn new<S>(graph: &mut TrackGraph<K, S>, cancel: CancellationToken) -> Self
	where
		S: Clone + Hash + Eq,
	{
		let state = Rc::new(RefCell::new(DivisionState {
			component: ComponentGraph::new(),
			edge_tokens: PairMap::new(),
			token_pairs: AHashMap::new(),
			blocked: AHashSet::new(),
			next_token: 0,
		}));
		for (a, b, _) in graph.edges() {
			state.borrow_mut().token_for(&a, &b);
		}
		let sub_state = Rc::clone(&state);
		let sub_cancel = cancel.clone();
		graph.subscribe(move |change| {
			if sub_cancel.is_cancelled() {
				return;
			}
			sub_state.borrow_mut().on_change(change);
		});
		Self { state, cancel }
	}

	/// Block `at`, severing division connectivity through it. Returns
	/// `false` if cancelled or `at` is already blocked.
	pub fn add_division(&mut self, at: &K) -> bool {
		if self.cancel.is_cancelled() {
			return false;
		}
		let mut state = self.state.borrow_mut();
		if !state.blocked.insert(at.clone()) {
			return false;
		}
		let tokens: Vec<u64> = state.edge_tokens.other_entries(at).map(|(_, &t)| t).collect();
		for t in tokens {
			state.component.delete(&DivKey::Node(at.clone()), &DivKey::Edge(t));
		}
		true
	}

	/// Unblock `at`, restoring division connectivity through it. Returns
	/// `false` if cancelled or `at` is not currently blocked.
	pub fn delete_division(&mut self, at: &K) -> bool {
		if self.cancel.is_cancelled() {
			return false;
		}
		let mut state = self.state.borrow_mut();
		if !state.blocked.remove(at) {
			return false;
		}
		let tokens: Vec<u64> = state.edge_tokens.other_entries(at).map(|(_, &t)| t).collect();
		for t in tokens {
			state.component.add(DivKey::Node(at.clone()), DivKey::Edge(t));
		}
		true
	}

	/// Every edge (as its endpoint pair, `{a, b}` included) sharing a
	/// division with the edge `{a, b}`. Empty if cancelled or `{a, b}` is
	/// not a known edge.
	pub fn lookup_division_by_edge(&self, a: &K, b: &K) -> Vec<(K, K)> {
		if self.cancel.is_cancelled() {
			return Vec::new();
		}
		let state = self.state.borrow();
		let token = match state.edge_tokens.get(a, b) {
			Some(&t) => t,
			None => return Vec::new(),
		};
		let mut result = vec![state
			.token_pairs
			.get(&token)
			.cloned()
			.expect("every token in edge_tokens has a matching entry in token_pairs")];
		for key in state.component.shared_with(&DivKey::Edge(token)) {
			if let DivKey::Edge(t) = key {
				if let Some(pair) = state.token_pairs.get(&t) {
					result.push(pair.clone());
				}
			}
		}
		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_division_spans_the_whole_component() {
		let mut g = TrackGraph::<&str, u32>::new();
		g.add_edge("n1", "n2", 100).unwrap();
		g.add_edge("n2", "n3", 100).unwrap();

		let token = CancellationToken::new();
		let div = DivisionGraph::new(&mut g, token);
		let mut found = div.lookup_division_by_edge(&"n1", &"n2");
		found.sort();
		let mut expected = vec![("n1", "n2"), ("n2", "n3")];
		expected.sort();
		assert_eq!(found, expected);
	}

	#[test]
	fn add_division_severs_connectivity_through_the_blocked_node() {
		let mut g = TrackGraph::<&str, u32>::new();
		g.add_edge("n1", "n2", 100).unwrap();
		g.add_edge("n2", "n3", 100).unwrap();

		let token = CancellationToken::new();
		let mut div = DivisionGraph::new(&mut g, token);
		assert!(div.add_division(&"n2"));
		assert_eq!(div.lookup_division_by_edge(&"n1", &"n2"), vec![("n1", "n2")]);
		assert_eq!(div.lookup_division_by_edge(&"n3", &"n2"), vec![("n2", "n3")]);
		assert!(!div.add_division(&"n2")); // already blocked
	}

	#[test]
	fn lookup_canonicalizes_the_self_pair_as_stored() {
		let mut g = TrackGraph::<&str, u32>::new();
		g.add_edge("n2", "n3", 100).unwrap();

		let token = CancellationToken::new();
		let div = DivisionGraph::new(&mut g, token);
		// queried in reverse order, but the self-pair must come back as stored
		assert_eq!(div.lookup_division_by_edge(&"n3", &"n2"), vec![("n2", "n3")]);
	}

	#[test]
	fn delete_division_restores_connectivity() {
		let mut g = TrackGraph::<&str, u32>::new();
		g.add_edge("n1", "n2", 100).unwrap();
		g.add_edge("n2", "n3", 100).unwrap();

		let token = CancellationToken::new();
		let mut div = DivisionGraph::new(&mut g, token);
		div.add_division(&"n2");
		assert!(div.delete_division(&"n2"));
		assert_eq!(div.lookup_division_by_edge(&"n1", &"n2").len(), 2);
		assert!(!div.delete_division(&"n2")); // not blocked anymore
	}

	#[test]
	fn cancellation_silences_all_queries() {
		let mut g = TrackGraph::<&str, u32>::new();
		g.add_edge("n1", "n2", 100).unwrap();

		let token = CancellationToken::new();
		let mut div = DivisionGraph::new(&mut g, token.clone());
		token.cancel();
		assert!(div.lookup_division_by_edge(&"n1", &"n2").is_empty());
		assert!(!div.add_division(&"n1"));
	}

	#[test]
	fn new_edges_after_construction_are_tracked() {
		let mut g = TrackGraph::<&str, u32>::new();
		g.add_edge("n1", "n2", 100).unwrap();
		let token = CancellationToken::new();
		let div = DivisionGraph::new(&mut g, token);
		g.add_edge("n2", "n3", 100).unwrap();
		assert_eq!(div.lookup_division_by_edge(&"n1", &"n2").len(), 2);
	}

	#[test]
	fn deleting_an_edge_drops_its_token() {
		let mut g = TrackGraph::<&str, u32>::new();
		g.add_edge("n1", "n2", 100).unwrap();
		g.add_edge("n2", "n3", 100).unwrap();
		let token = CancellationToken::new();
		let div = DivisionGraph::new(&mut g, token);
		assert!(g.delete_edge(&"n1", &"n2"));
		assert!(div.lookup_division_by_edge(&"n2", &"n3").len() == 1);
	}
}
