//==== collections::multiset ==================================================

//! # Multiset
//!
//! A count-bag over keys. Used throughout the track graph to record how many
//! times a slice anchors into a node or an edge, so that membership can be
//! released one anchor at a time instead of as a single boolean flag.

use ahash::AHashMap;
use std::hash::Hash;

//==== Multiset ================================================================

/// A multiset (count-bag) over keys of type `K`.
///
/// # Examples
///
/// ```
/// use trackgraph::collections::Multiset;
///
/// let mut m = Multiset::<&str>::new();
///
/// assert!(m.add("a"));
/// assert!(m.add("a"));
/// assert!(m.add("b"));
///
/// assert_eq!(m.total(), 3);
/// assert_eq!(m.count(&"a"), 2);
/// assert!(m.delete(&"a"));
/// assert_eq!(m.count(&"a"), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Multiset<K>
where
	K: Clone + Hash + Eq,
{
	counts: AHashMap<K, usize>,
	total: usize,
}

impl<K> Multiset<K>
where
	K: Clone + Hash + Eq,
{
	/// Create an empty multiset.
	pub fn new() -> Self {
		Self { counts: AHashMap::new(), total: 0 }
	}

	/// Add one occurrence of `key`. Always succeeds.
	pub fn add(&mut self, key: K) -> bool {
		*self.counts.entry(key).or_insert(0) += 1;
		self.total += 1;
		true
	}

	/// Remove one occurrence of `key`. Returns whether it was present.
	pub fn delete(&mut self, key: &K) -> bool {
		match self.counts.get_mut(key) {
			Some(count) => {
				*count -= 1;
				self.total -= 1;
				if *count == 0 {
					self.counts.remove(key);
				}
				true
			}
			None => false,
		}
	}

	/// The number of occurrences of `key` currently recorded.
	pub fn count(&self, key: &K) -> usize {
		self.counts.get(key).copied().unwrap_or(0)
	}

	/// Whether `key` has at least one occurrence.
	pub fn contains(&self, key: &K) -> bool {
		self.counts.contains_key(key)
	}

	/// Sum of all occurrence counts.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Iterator over the distinct keys with a nonzero count.
	pub fn uniques(&self) -> impl Iterator<Item = &K> {
		self.counts.keys()
	}

	/// Lazy sequence yielding each key once per count.
	pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
		self.counts.iter().flat_map(|(k, &n)| std::iter::repeat(k.clone()).take(n))
	}
}

//==== Tests ====================================================================

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_and_delete() {
		let mut m = Multiset::new();
		assert!(m.add("x"));
		assert!(m.add("x"));
		assert_eq!(m.total(), 2);
		assert_eq!(m.count(&"x"), 2);

		assert!(m.delete(&"x"));
		assert_eq!(m.total(), 1);
		assert!(m.contains(&"x"));

		assert!(m.delete(&"x"));
		assert_eq!(m.total(), 0);
		assert!(!m.contains(&"x"));

		assert!(!m.delete(&"x"));
	}

	#[test]
	fn uniques_and_keys() {
		let mut m = Multiset::new();
		m.add(1);
		m.add(1);
		m.add(2);

		let mut uniques: Vec<_> = m.uniques().copied().collect();
		uniques.sort();
		assert_eq!(uniques, vec![1, 2]);

		let mut all: Vec<_> = m.keys().collect();
		all.sort();
		assert_eq!(all, vec![1, 1, 2]);
	}
}
