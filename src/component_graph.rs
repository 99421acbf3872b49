//==== component_graph ==========================================================

//! # ComponentGraph
//!
//! A plain undirected adjacency graph with connected-component bookkeeping
//! maintained incrementally: every `add`/`delete` updates a `key -> group`
//! map and a `group -> members` map so that "are these two keys in the same
//! component" is an O(1) lookup instead of a traversal. Used directly by the
//! division graph (`division`), keyed on a small wrapper enum so that both
//! track nodes and track edges can sit in one component space.

use ahash::{AHashMap, AHashSet};
use std::hash::Hash;

type GroupId = u64;

/// An undirected graph over keys `K`, tracking connected components.
pub struct ComponentGraph<K>
where
	K: Clone + Hash + Eq,
{
	neighbors: AHashMap<K, AHashSet<K>>,
	group_of: AHashMap<K, GroupId>,
	groups: AHashMap<GroupId, AHashSet<K>>,
	next_group: GroupId,
}

impl<K> Default for ComponentGraph<K>
where
	K: Clone + Hash + Eq,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K> ComponentGraph<K>
where
	K: Clone + Hash + Eq,
{
	/// Create an empty component graph.
	pub fn new() -> Self {
		Self {
			neighbors: AHashMap::new(),
			group_of: AHashMap::new(),
			groups: AHashMap::new(),
			next_group: 0,
		}
	}

	fn ensure_group(&mut self, k: &K) -> GroupId {
		if let Some(&g) = self.group_of.get(k) {
			return g;
		}
		let g = self.next_group;
		self.next_group += 1;
		self.group_of.insert(k.clone(), g);
		self.groups.entry(g).or_default().insert(k.clone());
		g
	}

	fn merge_groups(&mut self, a: GroupId, b: GroupId) {
		if a == b {
			return;
		}
		let (keep, drop) = if self.groups.get(&a).map(|s| s.len()).unwrap_or(0)
			>= self.groups.get(&b).map(|s| s.len()).unwrap_or(0)
		{
			(a, b)
		} else {
			(b, a)
		};
		if let Some(members) = self.groups.remove(&drop) {
			for k in members.iter() {
				self.group_of.insert(k.clone(), keep);
			}
			self.groups.entry(keep).or_default().extend(members);
		}
	}

	/// Add an undirected edge between `a` and `b`, merging their components
	/// if they were previously separate. Both keys arise implicitly.
	/// Returns `false` if the edge already exists.
	pub fn add(&mut self, a: K, b: K) -> bool {
		if self.neighbors.get(&a).map(|s| s.contains(&b)).unwrap_or(false) {
			return false;
		}
		self.neighbors.entry(a.clone()).or_default().insert(b.clone());
		self.neighbors.entry(b.clone()).or_default().insert(a.clone());
		let ga = self.ensure_group(&a);
		let gb = self.ensure_group(&b);
		self.merge_groups(ga, gb);
		true
	}

	/// Remove the edge between `a` and `b`. If this disconnects their
	/// component, recomputes group membership for the smaller side by a
	/// local BFS. Returns `false` if no such edge exists.
	pub fn delete(&mut self, a: &K, b: &K) -> bool {
		let had = self.neighbors.get(a).map(|s| s.contains(b)).unwrap_or(false);
		if !had {
			return false;
		}
		if let Some(s) = self.neighbors.get_mut(a) {
			s.remove(b);
		}
		if let Some(s) = self.neighbors.get_mut(b) {
			s.remove(a);
		}
		if self.still_connected(a, b) {
			return true;
		}
		self.split_group(a, b);
		true
	}

	fn still_connected(&self, a: &K, b: &K) -> bool {
		let mut seen = AHashSet::new();
		let mut stack = vec![a.clone()];
		seen.insert(a.clone());
		while let Some(cur) = stack.pop() {
			if &cur == b {
				return true;
			}
			if let Some(ns) = self.neighbors.get(&cur) {
				for n in ns.iter() {
					if seen.insert(n.clone()) {
						stack.push(n.clone());
					}
				}
			}
		}
		false
	}

	fn split_group(&mut self, a: &K, b: &K) {
		let old_group = match self.group_of.get(a) {
			Some(&g) => g,
			None => return,
		};
		let mut side_a = AHashSet::new();
		let mut stack = vec![a.clone()];
		side_a.insert(a.clone());
		while let Some(cur) = stack.pop() {
			if let Some(ns) = self.neighbors.get(&cur) {
				for n in ns.iter() {
					if side_a.insert(n.clone()) {
						stack.push(n.clone());
					}
				}
			}
		}
		if side_a.contains(b) {
			return;
		}
		let new_group = self.next_group;
		self.next_group += 1;
		if let Some(members) = self.groups.get_mut(&old_group) {
			for k in side_a.iter() {
				members.remove(k);
			}
		}
		for k in side_a.iter() {
			self.group_of.insert(k.clone(), new_group);
		}
		self.groups.insert(new_group, side_a);
	}

	/// Whether `a` and `b` have a direct edge.
	pub fn has(&self, a: &K, b: &K) -> bool {
		self.neighbors.get(a).map(|s| s.contains(b)).unwrap_or(false)
	}

	/// Size of the component `k` belongs to. `0` if `k` is unknown.
	pub fn group_size(&self, k: &K) -> usize {
		self.group_of.get(k).and_then(|g| self.groups.get(g)).map(|s| s.len()).unwrap_or(0)
	}

	/// Whether every key in `keys` shares a single connected component.
	/// Vacuously `true` for zero or one keys; `false` if any key is unknown.
	pub fn shared_group(&self, keys: &[K]) -> bool {
		let mut first: Option<GroupId> = None;
		for k in keys {
			let g = match self.group_of.get(k) {
				Some(&g) => g,
				None => return false,
			};
			match first {
				None => first = Some(g),
				Some(fg) if fg == g => {}
				Some(_) => return false,
			}
		}
		true
	}

	/// Every other key currently sharing `k`'s component. Empty if `k` is
	/// unknown.
	pub fn shared_with(&self, k: &K) -> Vec<K> {
		match self.group_of.get(k).and_then(|g| self.groups.get(g)) {
			None => Vec::new(),
			Some(members) => members.iter().filter(|&m| m != k).cloned().collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_merges_components() {
		let mut g = ComponentGraph::new();
		assert!(g.add(1, 2));
		assert!(g.add(2, 3));
		assert!(g.shared_group(&[1, 2, 3]));
		assert_eq!(g.group_size(&1), 3);
	}

	#[test]
	fn add_duplicate_refuses() {
		let mut g = ComponentGraph::new();
		assert!(g.add(1, 2));
		assert!(!g.add(1, 2));
	}

	#[test]
	fn delete_splits_when_disconnected() {
		let mut g = ComponentGraph::new();
		g.add(1, 2);
		g.add(2, 3);
		assert!(g.delete(&1, &2));
		assert!(!g.shared_group(&[1, 3]));
		assert!(g.shared_group(&[2, 3]));
		assert_eq!(g.group_size(&1), 1);
	}

	#[test]
	fn delete_keeps_group_when_cycle() {
		let mut g = ComponentGraph::new();
		g.add(1, 2);
		g.add(2, 3);
		g.add(1, 3);
		assert!(g.delete(&1, &2));
		assert!(g.shared_group(&[1, 2, 3]));
	}

	#[test]
	fn shared_with_excludes_self() {
		let mut g = ComponentGraph::new();
		g.add(1, 2);
		g.add(2, 3);
		let mut others = g.shared_with(&2);
		others.sort();
		assert_eq!(others, vec![1, 3]);
	}

	#[test]
	fn unknown_key_has_no_group() {
		let g: ComponentGraph<i32> = ComponentGraph::new();
		assert!(!g.shared_group(&[42]));
		assert_eq!(g.group_size(&42), 0);
	}
}
