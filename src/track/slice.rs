//==== track::slice =============================================================

//! # Slice engine
//!
//! A slice is a contiguous occupant of the track: an anchored path `along`
//! plus two inward gaps, `back` and `front`, measured from each end. Growth
//! moves one end outward one round at a time, consuming room on the
//! current edge and, when that room runs out, asking the caller to resolve
//! a branch at the next junction. Shrink is the mirror image and never
//! needs caller input.
//!
//! Edge and node membership (`EdgeSlot::slices`, `NodeRecord::slices`) are
//! not maintained incrementally inside the grow/shrink loops. Instead,
//! every public mutator ends by calling `resync`, which diffs the desired
//! membership computed fresh from `along`/`back`/`front` against the
//! membership recorded the last time this slice was synced, and applies
//! only the difference. This sidesteps having to special-case the
//! two-anchor configuration (`along.len() == 2`, both ends on the same
//! edge) at every call site — it falls out of the diff once.

use ahash::{AHashMap, AHashSet};
use std::hash::Hash;

use crate::track::graph::{EdgeId, TrackGraph};
use crate::track::views::{Direction, SliceDescribed};

pub(crate) struct SliceState<K> {
	pub(crate) along: Vec<K>,
	pub(crate) back: u64,
	pub(crate) front: u64,
	pub(crate) length: u64,
	member_edges: AHashMap<EdgeId, usize>,
	member_nodes: AHashSet<K>,
}

impl<K> SliceState<K> {
	/// Build a state with no recorded edge/node membership yet; the next
	/// `resync` call fills it in from `along`/`back`/`front`.
	pub(crate) fn new(along: Vec<K>, back: u64, front: u64, length: u64) -> Self {
		Self { along, back, front, length, member_edges: AHashMap::new(), member_nodes: AHashSet::new() }
	}
}

impl<K, S> TrackGraph<K, S>
where
	K: Clone + Hash + Eq,
	S: Clone + Hash + Eq,
{
	/// Seed a new slice as a single point on node `on`. Returns `false` if
	/// `id` is already in use.
	pub fn add_slice(&mut self, id: S, on: K) -> bool {
		if self.slices.contains_key(&id) {
			return false;
		}
		self.slices.insert(
			id.clone(),
			SliceState {
				along: vec![on],
				back: 0,
				front: 0,
				length: 0,
				member_edges: AHashMap::new(),
				member_nodes: AHashSet::new(),
			},
		);
		self.resync(&id);
		true
	}

	/// Snapshot a slice's current state, or `None` if `id` is unknown.
	pub fn lookup_slice(&self, id: &S) -> Option<SliceDescribed<K>> {
		self.slices.get(id).map(|s| SliceDescribed {
			along: s.along.clone(),
			back: s.back,
			front: s.front,
			length: s.length,
		})
	}

	/// Remove a slice and release its membership from every edge and node
	/// it touched. Returns `false` if `id` is unknown.
	pub fn delete_slice(&mut self, id: &S) -> bool {
		let removed = match self.slices.remove(id) {
			Some(s) => s,
			None => return false,
		};
		for (eid, &n) in removed.member_edges.iter() {
			if let Some(edge) = self.edges.get_mut(eid) {
				for _ in 0..n {
					edge.slices.delete(id);
				}
			}
		}
		for node in removed.member_nodes.iter() {
			if let Some(rec) = self.nodes.get_mut(node) {
				rec.slices.delete(id);
			}
		}
		true
	}

	/// Grow (`by > 0`) or shrink (`by < 0`) one end of a slice.
	///
	/// `end` is `+1` for the front end, `-1` for the back end. Returns the
	/// signed amount actually applied; `0` if `id` is unknown, `by == 0`,
	/// or the clamped magnitude is zero. Shrinking never needs `where` and
	/// always succeeds up to the slice's current length. Growing calls
	/// `where` only when more than one candidate edge is available at a
	/// junction; if it returns `None` or a key not among the candidates,
	/// growth halts there and the shortfall is reflected in the return
	/// value.
	pub fn modify_slice(
		&mut self,
		id: &S,
		end: i8,
		by: i64,
		mut where_fn: impl FnMut(&[K]) -> Option<K>,
	) -> i64 {
		debug_assert!(end == 1 || end == -1, "end must be +1 (front) or -1 (back)");
		if by == 0 || !self.slices.contains_key(id) {
			return 0;
		}
		if by > 0 {
			self.grow(id, end, by as u64, &mut where_fn) as i64
		} else {
			-(self.shrink(id, end, (-by) as u64) as i64)
		}
	}

	fn grow(&mut self, id: &S, end: i8, by: u64, where_fn: &mut impl FnMut(&[K]) -> Option<K>) -> u64 {
		let mut remaining = by;
		loop {
			if remaining == 0 {
				break;
			}
			let along_len = self.slices.get(id).unwrap().along.len();
			if along_len > 1 {
				let offset =
					if end == -1 { self.slices.get(id).unwrap().back } else { self.slices.get(id).unwrap().front };
				let consume = offset.min(remaining);
				{
					let slice = self.slices.get_mut(id).unwrap();
					if end == -1 {
						slice.back -= consume;
					} else {
						slice.front -= consume;
					}
					slice.length += consume;
				}
				remaining -= consume;
				if offset - consume > 0 {
					break; // still mid-edge; done for this call
				}
				if remaining == 0 {
					break;
				}
				// offset just hit 0 with growth still wanted: fall through to pick
			}

			let along_len = self.slices.get(id).unwrap().along.len();
			let active = if end == -1 {
				self.slices.get(id).unwrap().along[0].clone()
			} else {
				self.slices.get(id).unwrap().along[along_len - 1].clone()
			};
			let candidates: Vec<K> = if along_len == 1 {
				self.nodes.get(&active).map(|n| n.other.keys().cloned().collect()).unwrap_or_default()
			} else {
				let predecessor = if end == -1 {
					self.slices.get(id).unwrap().along[1].clone()
				} else {
					self.slices.get(id).unwrap().along[along_len - 2].clone()
				};
				self.nodes
					.get(&active)
					.and_then(|n| n.other.get(&predecessor))
					.map(|side| side.through.iter().cloned().collect())
					.unwrap_or_default()
			};
			let chosen = match candidates.len() {
				0 => break,
				1 => candidates[0].clone(),
				_ => match where_fn(&candidates) {
					Some(k) if candidates.contains(&k) => k,
					_ => break,
				},
			};
			let new_edge_len = match self.edge_length(&active, &chosen) {
				Some(len) => len,
				None => break,
			};
			let slice = self.slices.get_mut(id).unwrap();
			if end == -1 {
				slice.along.insert(0, chosen);
				slice.back = new_edge_len;
			} else {
				slice.along.push(chosen);
				slice.front = new_edge_len;
			}
		}
		let applied = by - remaining;
		self.resync(id);
		applied
	}

	fn shrink(&mut self, id: &S, end: i8, by: u64) -> u64 {
		let length = self.slices.get(id).unwrap().length;
		let mut remaining = by.min(length);
		let applied = remaining;
		while remaining > 0 {
			let along_len = self.slices.get(id).unwrap().along.len();
			if along_len == 1 {
				break;
			}
			let (lo, hi) = {
				let along = &self.slices.get(id).unwrap().along;
				if end == -1 { (along[0].clone(), along[1].clone()) } else { (along[along_len - 2].clone(), along[along_len - 1].clone()) }
			};
			let edge_len = self.edge_length(&lo, &hi).expect("slice along must name an existing edge");
			let offset = if end == -1 { self.slices.get(id).unwrap().back } else { self.slices.get(id).unwrap().front };
			let room = edge_len - offset;
			let consume = room.min(remaining);
			{
				let slice = self.slices.get_mut(id).unwrap();
				if end == -1 {
					slice.back += consume;
				} else {
					slice.front += consume;
				}
				slice.length -= consume;
			}
			remaining -= consume;
			let new_offset = offset + consume;
			if new_offset == edge_len {
				let slice = self.slices.get_mut(id).unwrap();
				if end == -1 {
					slice.along.remove(0);
					slice.back = 0;
				} else {
					slice.along.pop();
					slice.front = 0;
				}
			}
		}
		self.resync(id);
		applied
	}

	fn desired_edge_counts(&self, along: &[K]) -> AHashMap<EdgeId, usize> {
		let mut counts = AHashMap::new();
		if along.len() < 2 {
			return counts;
		}
		if along.len() == 2 {
			if let Some(&eid) = self.edge_index.get(&along[0], &along[1]) {
				*counts.entry(eid).or_insert(0) += 2;
			}
		} else {
			for w in along.windows(2) {
				if let Some(&eid) = self.edge_index.get(&w[0], &w[1]) {
					*counts.entry(eid).or_insert(0) += 1;
				}
			}
		}
		counts
	}

	fn desired_touched_nodes(along: &[K], back: u64, front: u64) -> AHashSet<K> {
		let mut set = AHashSet::new();
		let n = along.len();
		if n == 1 {
			set.insert(along[0].clone());
			return set;
		}
		if back == 0 {
			set.insert(along[0].clone());
		}
		if front == 0 {
			set.insert(along[n - 1].clone());
		}
		for node in &along[1..n - 1] {
			set.insert(node.clone());
		}
		set
	}

	/// Recompute and apply edge/node membership for `id` from its current
	/// `along`/`back`/`front`. Called automatically by every mutator in
	/// this module; exposed crate-wide so `helpers` can settle membership
	/// after poking a slice's fields directly (`split_edge`, `clone_slice`).
	pub(crate) fn resync(&mut self, id: &S) {
		let (along, back, front) = {
			let s = self.slices.get(id).unwrap();
			(s.along.clone(), s.back, s.front)
		};
		let desired_edges = self.desired_edge_counts(&along);
		let desired_nodes = Self::desired_touched_nodes(&along, back, front);
		let (old_edges, old_nodes) = {
			let s = self.slices.get(id).unwrap();
			(s.member_edges.clone(), s.member_nodes.clone())
		};
		for (eid, &old_n) in old_edges.iter() {
			let new_n = desired_edges.get(eid).copied().unwrap_or(0);
			if new_n < old_n {
				if let Some(edge) = self.edges.get_mut(eid) {
					for _ in 0..(old_n - new_n) {
						edge.slices.delete(id);
					}
				}
			}
		}
		for (eid, &new_n) in desired_edges.iter() {
			let old_n = old_edges.get(eid).copied().unwrap_or(0);
			if new_n > old_n {
				if let Some(edge) = self.edges.get_mut(eid) {
					for _ in 0..(new_n - old_n) {
						edge.slices.add(id.clone());
					}
				}
			}
		}
		for node in old_nodes.difference(&desired_nodes) {
			if let Some(rec) = self.nodes.get_mut(node) {
				rec.slices.delete(id);
			}
		}
		for node in desired_nodes.difference(&old_nodes) {
			self.nodes.entry(node.clone()).or_default().slices.add(id.clone());
		}
		let s = self.slices.get_mut(id).unwrap();
		s.member_edges = desired_edges;
		s.member_nodes = desired_nodes;
	}

	//-- ergonomic wrappers (see DESIGN.md) --------------------------------

	/// Grow or shrink one end of a slice, naming the end with a
	/// [`Direction`] instead of `modify_slice`'s raw `+1`/`-1` convention.
	/// Equivalent to `modify_slice(id, dir.into(), by, where_fn)`.
	pub fn modify_slice_dir(
		&mut self,
		id: &S,
		dir: Direction,
		by: i64,
		where_fn: impl FnMut(&[K]) -> Option<K>,
	) -> i64 {
		self.modify_slice(id, dir.into(), by, where_fn)
	}

	/// Grow the front end. Equivalent to `modify_slice(id, 1, by, where_fn)`.
	pub fn grow_front(&mut self, id: &S, by: u64, where_fn: impl FnMut(&[K]) -> Option<K>) -> i64 {
		self.modify_slice_dir(id, Direction::Front, by as i64, where_fn)
	}

	/// Grow the back end. Equivalent to `modify_slice(id, -1, by, where_fn)`.
	pub fn grow_back(&mut self, id: &S, by: u64, where_fn: impl FnMut(&[K]) -> Option<K>) -> i64 {
		self.modify_slice_dir(id, Direction::Back, by as i64, where_fn)
	}

	/// Shrink the front end. Equivalent to `modify_slice(id, 1, -(by as i64), ...)`.
	pub fn shrink_front(&mut self, id: &S, by: u64) -> i64 {
		self.modify_slice_dir(id, Direction::Front, -(by as i64), |_| None)
	}

	/// Shrink the back end. Equivalent to `modify_slice(id, -1, -(by as i64), ...)`.
	pub fn shrink_back(&mut self, id: &S, by: u64) -> i64 {
		self.modify_slice_dir(id, Direction::Back, -(by as i64), |_| None)
	}
}
