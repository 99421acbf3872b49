//==== track::graph =============================================================

//! # TrackGraph
//!
//! The track topology: nodes, undirected lengthed edges, and the per-node
//! "through" relation that says which pairs of edges meeting at a node a
//! train may pass straight across. Slice storage and the slice engine live
//! in `track::slice`, as a second `impl` block over the same type — the
//! two are one component (C4/C5 in the design notes), split across files
//! purely for size.

use ahash::{AHashMap, AHashSet};
use std::hash::Hash;

use crate::collections::{Multiset, PairMap};
use crate::error::TrackError;
use crate::track::views::{EdgeView, NodeView};

/// Stable identifier for an edge, assigned by `TrackGraph` on `add_edge` and
/// never reused even after `delete_edge` frees the pair.
pub type EdgeId = u64;

/// Payload of a track topology change, delivered to every subscriber
/// registered via `TrackGraph::subscribe`. A `length` of `0` denotes that
/// the edge `{a, b}` was removed; any other value is the edge's length at
/// the moment it was added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeChange<K> {
	pub a: K,
	pub b: K,
	pub length: u64,
}

//==== internal storage =========================================================

pub(crate) struct Side<K> {
	pub(crate) edge: EdgeId,
	pub(crate) through: AHashSet<K>,
}

#[derive(Default)]
pub(crate) struct NodeRecord<K, S>
where
	K: Clone + Hash + Eq,
	S: Clone + Hash + Eq,
{
	pub(crate) other: AHashMap<K, Side<K>>,
	pub(crate) slices: Multiset<S>,
}

pub(crate) struct EdgeSlot<K, S>
where
	S: Clone + Hash + Eq,
{
	pub(crate) low: K,
	pub(crate) high: K,
	pub(crate) length: u64,
	pub(crate) slices: Multiset<S>,
}

/// An in-memory, mutable graph of junctions joined by lengthed edges, with
/// an explicit through-connection relation at each node and an inventory of
/// slices occupying the track.
///
/// `K` is the caller-chosen node key type; `S` is the caller-chosen slice id
/// type. Both must support value equality and hashing — the graph never
/// orders or formats them.
///
/// # Examples
///
/// ```
/// use trackgraph::track::TrackGraph;
///
/// let mut g = TrackGraph::<&str, u32>::new();
///
/// assert!(g.add_edge("a", "b", 123).unwrap());
/// assert!(!g.add_edge("a", "b", 999).unwrap()); // already exists
///
/// let edge = g.lookup_edge(&"b", &"a").unwrap();
/// assert_eq!((edge.low, edge.high, edge.length), ("a", "b", 123));
/// ```
pub struct TrackGraph<K, S>
where
	K: Clone + Hash + Eq,
	S: Clone + Hash + Eq,
{
	pub(crate) nodes: AHashMap<K, NodeRecord<K, S>>,
	pub(crate) edges: AHashMap<EdgeId, EdgeSlot<K, S>>,
	pub(crate) edge_index: PairMap<K, EdgeId>,
	pub(crate) slices: AHashMap<S, crate::track::slice::SliceState<K>>,
	next_edge_id: EdgeId,
	subscribers: Vec<Box<dyn FnMut(&EdgeChange<K>)>>,
}

impl<K, S> Default for TrackGraph<K, S>
where
	K: Clone + Hash + Eq,
	S: Clone + Hash + Eq,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K, S> TrackGraph<K, S>
where
	K: Clone + Hash + Eq,
	S: Clone + Hash + Eq,
{
	/// Create an empty track graph.
	pub fn new() -> Self {
		Self {
			nodes: AHashMap::new(),
			edges: AHashMap::new(),
			edge_index: PairMap::new(),
			slices: AHashMap::new(),
			next_edge_id: 0,
			subscribers: Vec::new(),
		}
	}

	//-- topology ---------------------------------------------------------

	/// Add an undirected edge of the given positive integer `length`
	/// between `low` and `high`, creating both endpoint nodes implicitly.
	///
	/// Returns `Ok(false)` if the unordered pair already has an edge (a
	/// refusal, not an error). Fails with [`TrackError::NonPositiveLength`]
	/// if `length == 0`, or [`TrackError::SelfEdge`] if `low == high`.
	pub fn add_edge(&mut self, low: K, high: K, length: u64) -> Result<bool, TrackError> {
		if length == 0 {
			return Err(TrackError::NonPositiveLength);
		}
		if low == high {
			return Err(TrackError::SelfEdge);
		}
		if self.edge_index.contains(&low, &high) {
			return Ok(false);
		}
		let id = self.next_edge_id;
		self.next_edge_id += 1;
		self.edge_index.set(&low, &high, id);
		self.edges.insert(
			id,
			EdgeSlot { low: low.clone(), high: high.clone(), length, slices: Multiset::new() },
		);
		self.nodes
			.entry(low.clone())
			.or_default()
			.other
			.insert(high.clone(), Side { edge: id, through: AHashSet::new() });
		self.nodes
			.entry(high.clone())
			.or_default()
			.other
			.insert(low.clone(), Side { edge: id, through: AHashSet::new() });
		self.emit(EdgeChange { a: low, b: high, length });
		Ok(true)
	}

	/// Look up the edge between `a` and `b`, regardless of query order.
	/// `low`/`high` in the result reflect the order `add_edge` was called
	/// with, not the order queried.
	pub fn lookup_edge(&self, a: &K, b: &K) -> Option<EdgeView<K, S>> {
		let id = self.edge_index.get(a, b)?;
		let slot = self.edges.get(id)?;
		Some(EdgeView {
			low: slot.low.clone(),
			high: slot.high.clone(),
			length: slot.length,
			slices: slot.slices.uniques().cloned().collect(),
		})
	}

	/// The edge's length, or `None` if it doesn't exist.
	pub(crate) fn edge_length(&self, a: &K, b: &K) -> Option<u64> {
		let id = self.edge_index.get(a, b)?;
		self.edges.get(id).map(|e| e.length)
	}

	/// Delete the edge between `a` and `b`. Refuses (returns `false`,
	/// rather than erroring) if no such edge exists or if any slice
	/// currently occupies it. On success, clears any through-link on
	/// either endpoint that referenced the now-missing neighbour, and
	/// emits an edge-change event with `length = 0`.
	pub fn delete_edge(&mut self, a: &K, b: &K) -> bool {
		let id = match self.edge_index.get(a, b) {
			Some(&id) => id,
			None => return false,
		};
		let (low, high) = match self.edges.get(&id) {
			Some(slot) if slot.slices.total() == 0 => (slot.low.clone(), slot.high.clone()),
			_ => return false,
		};
		self.edge_index.remove(&low, &high);
		self.edges.remove(&id);
		if let Some(rec) = self.nodes.get_mut(&low) {
			for side in rec.other.values_mut() {
				side.through.remove(&high);
			}
			rec.other.remove(&high);
		}
		if let Some(rec) = self.nodes.get_mut(&high) {
			for side in rec.other.values_mut() {
				side.through.remove(&low);
			}
			rec.other.remove(&low);
		}
		self.emit(EdgeChange { a: low, b: high, length: 0 });
		true
	}

	/// Declare that a train may pass straight through `through` between
	/// `a` and `b`. Requires `a`, `through`, `b` pairwise distinct.
	/// Returns `false` if either edge is missing or the connection already
	/// exists.
	pub fn connect(&mut self, a: &K, through: &K, b: &K) -> Result<bool, TrackError> {
		if a == through || through == b || a == b {
			return Err(TrackError::NonDistinctNodes);
		}
		if !self.edge_index.contains(through, a) || !self.edge_index.contains(through, b) {
			return Ok(false);
		}
		let already = self
			.nodes
			.get(through)
			.and_then(|r| r.other.get(a))
			.map(|side| side.through.contains(b))
			.unwrap_or(false);
		if already {
			return Ok(false);
		}
		if let Some(rec) = self.nodes.get_mut(through) {
			if let Some(side) = rec.other.get_mut(a) {
				side.through.insert(b.clone());
			}
			if let Some(side) = rec.other.get_mut(b) {
				side.through.insert(a.clone());
			}
		}
		Ok(true)
	}

	/// Remove a through-connection declared by `connect`. Refuses if the
	/// link is absent, or if any slice currently on `through` traverses it
	/// via `[a, through, b]` or `[b, through, a]`.
	pub fn disconnect(&mut self, a: &K, through: &K, b: &K) -> Result<bool, TrackError> {
		if a == through || through == b || a == b {
			return Err(TrackError::NonDistinctNodes);
		}
		let linked = self
			.nodes
			.get(through)
			.and_then(|r| r.other.get(a))
			.map(|side| side.through.contains(b))
			.unwrap_or(false);
		if !linked {
			return Ok(false);
		}
		if let Some(rec) = self.nodes.get(through) {
			for sid in rec.slices.uniques() {
				if let Some(slice) = self.slices.get(sid) {
					if crate::collections::contains_contiguous(
						&slice.along,
						&[a.clone(), through.clone(), b.clone()],
					) || crate::collections::contains_contiguous(
						&slice.along,
						&[b.clone(), through.clone(), a.clone()],
					) {
						return Ok(false);
					}
				}
			}
		}
		if let Some(rec) = self.nodes.get_mut(through) {
			if let Some(side) = rec.other.get_mut(a) {
				side.through.remove(b);
			}
			if let Some(side) = rec.other.get_mut(b) {
				side.through.remove(a);
			}
		}
		Ok(true)
	}

	/// Snapshot a node's neighbours (each mapped to the other neighbours
	/// currently connected through it) and the slices touching it. Unknown
	/// ids yield the empty record — nodes arise implicitly and are never
	/// explicitly deleted.
	pub fn lookup_node(&self, at: &K) -> NodeView<K, S> {
		match self.nodes.get(at) {
			None => NodeView { other: AHashMap::new(), slices: Vec::new() },
			Some(rec) => NodeView {
				other: rec
					.other
					.iter()
					.map(|(k, side)| (k.clone(), side.through.iter().cloned().collect()))
					.collect(),
				slices: rec.slices.uniques().cloned().collect(),
			},
		}
	}

	/// Every edge currently in the graph, as `(low, high, length)` triples.
	/// Used by the division graph to replay existing topology on
	/// construction.
	pub fn edges(&self) -> impl Iterator<Item = (K, K, u64)> + '_ {
		self.edges.values().map(|e| (e.low.clone(), e.high.clone(), e.length))
	}

	//-- events -------------------------------------------------------------

	/// Register a listener invoked synchronously, after the mutation
	/// commits, on every `add_edge`/`delete_edge`. There is no
	/// unsubscribe — long-lived subscribers (like the division graph) make
	/// themselves inert via a shared cancellation flag instead, since a
	/// subscriber held only by value inside this graph cannot be handed
	/// back out to the caller for removal without breaking the "no
	/// sharing" rule between independent graph instances.
	pub fn subscribe(&mut self, listener: impl FnMut(&EdgeChange<K>) + 'static) {
		self.subscribers.push(Box::new(listener));
	}

	/// Exposed crate-wide so `helpers::split_edge` can emit the removal of
	/// the edge it replaces without going through `delete_edge`'s
	/// occupancy check.
	pub(crate) fn emit(&mut self, change: EdgeChange<K>) {
		for listener in self.subscribers.iter_mut() {
			listener(&change);
		}
	}
}
