//==== helpers ===================================================================

//! # High-level track operations
//!
//! Compound operations built on top of `TrackGraph`'s primitives: splitting
//! an edge in place (rehoming any slice currently occupying it), moving a
//! slice as a unit, duplicating a slice's state under a new id, and seeding
//! a slice from a previously captured `SliceDescribed` snapshot.

use std::cell::Cell;
use std::hash::Hash;

use crate::error::TrackError;
use crate::track::graph::EdgeChange;
use crate::track::slice::SliceState;
use crate::track::views::{Direction, SliceDescribed};
use crate::track::TrackGraph;

/// Insert `new_node` into the edge `{a, b}` at distance `at` from `a`,
/// replacing it with two edges `{a, new_node}` and `{new_node, b}` of
/// lengths `at` and `length - at`. Any slice currently occupying the edge
/// is rehomed in place — its `along` gains `new_node`, and if its back or
/// front anchor lands in the now-shorter segment on the far side of the
/// split, that segment's original endpoint is dropped from `along` and the
/// offset is rebased onto `new_node`. The straight-through connection
/// `{a, new_node, b}` is established automatically so existing slices keep
/// validating across the new junction.
///
/// `at` may be negative, in which case it's interpreted as `length + at`
/// (a distance measured backward from `b`).
///
/// Returns `Ok(false)` if there is no edge between `a` and `b`, if
/// `new_node` is `a` or `b`, or if `new_node` already names a node in the
/// graph. Fails with [`TrackError::InvalidSplitPosition`] if the resolved
/// position does not lie strictly between `0` and the edge's length.
pub fn split_edge<K, S>(graph: &mut TrackGraph<K, S>, a: &K, b: &K, at: i64, new_node: K) -> Result<bool, TrackError>
where
	K: Clone + Hash + Eq,
	S: Clone + Hash + Eq,
{
	let id = match graph.edge_index.get(a, b) {
		Some(&id) => id,
		None => return Ok(false),
	};
	if new_node == *a || new_node == *b || graph.nodes.contains_key(&new_node) {
		return Ok(false);
	}
	let (low, high, length) = {
		let slot = graph.edges.get(&id).expect("edge_index and edges agree");
		(slot.low.clone(), slot.high.clone(), slot.length)
	};
	let at = if at < 0 { at + length as i64 } else { at };
	if at <= 0 || (at as u64) >= length {
		return Err(TrackError::InvalidSplitPosition);
	}
	let len_a_new = at as u64;
	let len_new_b = length - len_a_new;

	let occupants: Vec<S> = {
		let slot = graph.edges.get(&id).expect("checked above");
		slot.slices.uniques().cloned().collect()
	};
	for sid in occupants.iter() {
		let (along, back, front) = {
			let s = graph.slices.get(sid).expect("occupant ids come from this slice map");
			(s.along.clone(), s.back, s.front)
		};
		let (new_along, new_back, new_front) = patch_described(along, back, front, a, b, new_node.clone(), len_a_new, len_new_b);
		let s = graph.slices.get_mut(sid).expect("occupant ids come from this slice map");
		s.along = new_along;
		s.back = new_back;
		s.front = new_front;
	}

	graph.edge_index.remove(&low, &high);
	graph.edges.remove(&id);
	if let Some(rec) = graph.nodes.get_mut(&low) {
		for side in rec.other.values_mut() {
			side.through.remove(&high);
		}
		rec.other.remove(&high);
	}
	if let Some(rec) = graph.nodes.get_mut(&high) {
		for side in rec.other.values_mut() {
			side.through.remove(&low);
		}
		rec.other.remove(&low);
	}
	graph.emit(EdgeChange { a: low.clone(), b: high.clone(), length: 0 });

	let (len_low_new, len_new_high) = if low == *a { (len_a_new, len_new_b) } else { (len_new_b, len_a_new) };
	graph
		.add_edge(low.clone(), new_node.clone(), len_low_new)
		.expect("new_node is fresh and the length is positive");
	graph
		.add_edge(new_node.clone(), high.clone(), len_new_high)
		.expect("new_node is fresh and the length is positive");
	let _ = graph.connect(&low, &new_node, &high);

	for sid in occupants.iter() {
		graph.resync(sid);
	}
	Ok(true)
}

/// Patch one slice's `along`/`back`/`front` for a split of the edge
/// `{a, b}` into `{a, new_node}` (length `len_a_new`) and
/// `{new_node, b}` (length `len_new_b`). `length` (the occupied body size)
/// never changes — only the anchoring does. No-op if `{a, b}` is not a
/// consecutive pair in `along`.
fn patch_described<K: Clone + PartialEq>(
	mut along: Vec<K>,
	mut back: u64,
	mut front: u64,
	a: &K,
	b: &K,
	new_node: K,
	len_a_new: u64,
	len_new_b: u64,
) -> (Vec<K>, u64, u64) {
	let n = along.len();
	let idx = (0..n.saturating_sub(1))
		.find(|&i| (&along[i] == a && &along[i + 1] == b) || (&along[i] == b && &along[i + 1] == a));
	let i = match idx {
		Some(i) => i,
		None => return (along, back, front),
	};
	let near_len = |node: &K| if node == a { len_a_new } else { len_new_b };
	let is_back = i == 0;
	let is_front = i == n - 2;

	if is_back && is_front {
		let total = len_a_new + len_new_b;
		let p = along[0].clone();
		let near_len_p = near_len(&p);
		if back < near_len_p && total - front <= near_len_p {
			front = near_len_p - (total - front);
			along = vec![p, new_node];
		} else if back >= near_len_p {
			let q = along[1].clone();
			back -= near_len_p;
			along = vec![new_node, q];
		} else {
			along.insert(1, new_node);
		}
	} else if is_back {
		let near_len0 = near_len(&along[0]);
		if back >= near_len0 {
			along.remove(0);
			along.insert(0, new_node);
			back -= near_len0;
		} else {
			along.insert(1, new_node);
		}
	} else if is_front {
		let last = n - 1;
		let near_len_last = near_len(&along[last]);
		if front >= near_len_last {
			along.pop();
			along.push(new_node);
			front -= near_len_last;
		} else {
			along.insert(last, new_node);
		}
	} else {
		along.insert(i + 1, new_node);
	}
	(along, back, front)
}

/// Translate a slice as a rigid body: grow one end by `by` and shrink the
/// other by however much of that growth actually landed, keeping its
/// occupied length constant. `by > 0` moves toward the front, `by < 0`
/// toward the back. Returns the signed distance actually moved — `0` if
/// `id` is unknown or growth is blocked immediately (e.g. a dead end).
pub fn move_slice<K, S>(
	graph: &mut TrackGraph<K, S>,
	id: &S,
	by: i64,
	mut where_fn: impl FnMut(&[K]) -> Option<K>,
) -> i64
where
	K: Clone + Hash + Eq,
	S: Clone + Hash + Eq,
{
	if by == 0 {
		return 0;
	}
	let dir = if by > 0 { Direction::Front } else { Direction::Back };
	let grown = graph.modify_slice_dir(id, dir, by.abs(), &mut where_fn);
	if grown == 0 {
		return 0;
	}
	graph.modify_slice_dir(id, dir.opposite(), -grown, |_| None);
	if by > 0 {
		grown
	} else {
		-grown
	}
}

/// Duplicate slice `prev`'s current state under the fresh id `new`,
/// sharing no further bookkeeping with the original. Returns `false` if
/// `prev` is unknown or `new` is already in use.
pub fn clone_slice<K, S>(graph: &mut TrackGraph<K, S>, prev: &S, new: S) -> bool
where
	K: Clone + Hash + Eq,
	S: Clone + Hash + Eq,
{
	if graph.slices.contains_key(&new) {
		return false;
	}
	let (along, back, front, length) = match graph.slices.get(prev) {
		Some(s) => (s.along.clone(), s.back, s.front, s.length),
		None => return false,
	};
	graph.slices.insert(new.clone(), SliceState::new(along, back, front, length));
	graph.resync(&new);
	true
}

/// Seed a fresh slice `id` to match `described`, by replaying growth
/// through the live graph rather than trusting the snapshot's `along`
/// wholesale — this validates that every hop in `described.along` is
/// still a real edge of the graph as currently shaped. At each junction
/// with more than one candidate, the next node named by `described.along`
/// is chosen automatically; the caller's `where_fn` is consulted only if
/// that node is not among the candidates (meaning the graph has changed
/// since `described` was captured).
///
/// Returns `false` if `id` is already in use, `described.along` is empty,
/// or replay cannot reach the described shape (in which case nothing is
/// left behind — the partially grown slice is discarded).
pub fn add_described_slice<K, S>(
	graph: &mut TrackGraph<K, S>,
	id: S,
	described: &SliceDescribed<K>,
	mut where_fn: impl FnMut(&[K]) -> Option<K>,
) -> bool
where
	K: Clone + Hash + Eq,
	S: Clone + Hash + Eq,
{
	if described.along.is_empty() {
		return false;
	}
	let start = described.along[0].clone();
	if !graph.add_slice(id.clone(), start) {
		return false;
	}
	if described.along.len() == 1 {
		return described.back == 0 && described.front == 0 && described.length == 0;
	}

	let cursor = Cell::new(1usize);
	let along = &described.along;
	let total = (described.back + described.length) as i64;
	let grown = {
		let mut replay = |candidates: &[K]| -> Option<K> {
			let start_idx = cursor.get();
			for (offset, cand) in along[start_idx..].iter().enumerate() {
				if candidates.contains(cand) {
					cursor.set(start_idx + offset + 1);
					return Some(cand.clone());
				}
			}
			where_fn(candidates)
		};
		graph.modify_slice(&id, 1, total, &mut replay)
	};
	if grown != total {
		graph.delete_slice(&id);
		return false;
	}
	if described.back > 0 {
		let shrunk = graph.modify_slice(&id, -1, -(described.back as i64), |_| None);
		if shrunk != -(described.back as i64) {
			graph.delete_slice(&id);
			return false;
		}
	}
	debug_assert_eq!(graph.lookup_slice(&id).as_ref(), Some(described), "replay diverged from the described shape");
	true
}
