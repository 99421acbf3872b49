//==== track::views ============================================================

//! # Lookup views
//!
//! Read-only snapshots returned by `TrackGraph`'s lookup methods. None of
//! these borrow from the graph — they're owned copies, cheap enough for a
//! library whose nodes and edges number in the thousands, not millions.

use ahash::AHashMap;
use std::hash::Hash;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//==== EdgeView =================================================================

/// A snapshot of an edge as recorded at insertion: `low`/`high` are not
/// re-sorted on lookup, they're whichever order `add_edge` was called with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeView<K, S> {
	pub low: K,
	pub high: K,
	pub length: u64,
	pub slices: Vec<S>,
}

//==== NodeView =================================================================

/// A snapshot of a node: its neighbours, and for each neighbour the other
/// neighbours currently connected through this node, plus the slices
/// touching it. Looking up an id that was never mentioned in an edge, a
/// slice, or a division yields the empty record — nodes are implicit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeView<K, S>
where
	K: Clone + Hash + Eq,
{
	pub other: AHashMap<K, Vec<K>>,
	pub slices: Vec<S>,
}

//==== SliceDescribed ===========================================================

/// A snapshot of a slice's state: the node sequence it's anchored on, the
/// two end offsets, and the occupied body length.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SliceDescribed<K> {
	pub along: Vec<K>,
	pub back: u64,
	pub front: u64,
	pub length: u64,
}

//==== Direction ================================================================

/// A typed alternative to the raw `+1`/`-1` sign convention `modify_slice`
/// uses for `end`. Purely ergonomic — converts losslessly to and from the
/// signed value the core operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
	/// The slice's front end — the side that was last grown forward.
	Front,
	/// The slice's back end — the side anchored on `along[0]`.
	Back,
}

impl Direction {
	pub(crate) fn sign(self) -> i8 {
		match self {
			Direction::Front => 1,
			Direction::Back => -1,
		}
	}

	/// The opposite direction.
	pub fn opposite(self) -> Direction {
		match self {
			Direction::Front => Direction::Back,
			Direction::Back => Direction::Front,
		}
	}
}

impl From<Direction> for i8 {
	fn from(d: Direction) -> i8 {
		d.sign()
	}
}
