//==== collections::pair_map ===================================================

//! # Symmetric pair map
//!
//! A map keyed by unordered pairs `{a, b}`. Backs the per-node "through"
//! relation in the track graph (`N(t).other[a].through` must equal
//! `N(t).other[b].through` read symmetrically) without requiring `K: Ord`.

use ahash::AHashMap;
use std::hash::Hash;

//==== PairMap ==================================================================

/// A symmetric map over unordered pairs of keys.
///
/// `set(a, b, v)` is visible from both `get(a, b)` and `get(b, a)`.
///
/// # Examples
///
/// ```
/// use trackgraph::collections::PairMap;
///
/// let mut m = PairMap::<&str, u32>::new();
///
/// m.set(&"a", &"b", 7);
///
/// assert_eq!(m.get(&"a", &"b"), Some(&7));
/// assert_eq!(m.get(&"b", &"a"), Some(&7));
/// assert_eq!(m.pairs_with(&"a"), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PairMap<K, V>
where
	K: Clone + Hash + Eq,
{
	sides: AHashMap<K, AHashMap<K, V>>,
}

impl<K, V> PairMap<K, V>
where
	K: Clone + Hash + Eq,
	V: Clone,
{
	/// Create an empty pair map.
	pub fn new() -> Self {
		Self { sides: AHashMap::new() }
	}

	/// Record `v` symmetrically for the unordered pair `{a, b}`.
	pub fn set(&mut self, a: &K, b: &K, v: V) {
		self.sides.entry(a.clone()).or_default().insert(b.clone(), v.clone());
		self.sides.entry(b.clone()).or_default().insert(a.clone(), v);
	}

	/// Look up the value recorded for the unordered pair `{a, b}`.
	pub fn get(&self, a: &K, b: &K) -> Option<&V> {
		self.sides.get(a)?.get(b)
	}

	/// Whether the unordered pair `{a, b}` has a recorded value.
	pub fn contains(&self, a: &K, b: &K) -> bool {
		self.get(a, b).is_some()
	}

	/// Remove the value recorded for the unordered pair `{a, b}`, symmetrically.
	pub fn remove(&mut self, a: &K, b: &K) -> Option<V> {
		let removed = self.sides.get_mut(a).and_then(|m| m.remove(b));
		if let Some(side) = self.sides.get_mut(b) {
			side.remove(a);
		}
		removed
	}

	/// Drop every pair that mentions `k`, from every partner's side too.
	pub fn remove_all_with(&mut self, k: &K) {
		if let Some(partners) = self.sides.remove(k) {
			for partner in partners.keys() {
				if let Some(side) = self.sides.get_mut(partner) {
					side.remove(k);
				}
			}
		}
	}

	/// Iterate over every partner of `a` and the value recorded for that pair.
	pub fn other_entries(&self, a: &K) -> impl Iterator<Item = (&K, &V)> {
		self.sides.get(a).into_iter().flat_map(|m| m.iter())
	}

	/// The number of partners `a` currently has.
	pub fn pairs_with(&self, a: &K) -> usize {
		self.sides.get(a).map(|m| m.len()).unwrap_or(0)
	}
}

//==== Tests ====================================================================

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_get_symmetric() {
		let mut m = PairMap::new();
		m.set(&"a", &"b", 1);

		assert_eq!(m.get(&"a", &"b"), Some(&1));
		assert_eq!(m.get(&"b", &"a"), Some(&1));
		assert_eq!(m.get(&"a", &"c"), None);
	}

	#[test]
	fn remove_symmetric() {
		let mut m = PairMap::new();
		m.set(&"a", &"b", ());
		assert!(m.contains(&"a", &"b"));

		m.remove(&"b", &"a");
		assert!(!m.contains(&"a", &"b"));
		assert!(!m.contains(&"b", &"a"));
	}

	#[test]
	fn remove_all_with() {
		let mut m = PairMap::new();
		m.set(&"t", &"a", ());
		m.set(&"t", &"b", ());
		m.set(&"a", &"b", ());

		m.remove_all_with(&"t");

		assert!(!m.contains(&"t", &"a"));
		assert!(!m.contains(&"t", &"b"));
		assert!(m.contains(&"a", &"b"));
		assert_eq!(m.pairs_with(&"t"), 0);
	}

	#[test]
	fn other_entries_and_pairs_with() {
		let mut m = PairMap::new();
		m.set(&"t", &"a", ());
		m.set(&"t", &"b", ());

		let mut partners: Vec<_> = m.other_entries(&"t").map(|(k, _)| *k).collect();
		partners.sort();
		assert_eq!(partners, vec!["a", "b"]);
		assert_eq!(m.pairs_with(&"t"), 2);
	}
}
