//! # trackgraph
//!
//! A railway track network modeled as an undirected, lengthed graph: nodes
//! are junctions, edges are track segments, and an explicit per-node
//! through-relation says which pairs of edges a train may pass straight
//! across. On top of that topology sits a slice engine (trains, or any
//! other contiguous occupant, anchored on a node path with two growable
//! end offsets), a component graph for plain connectivity queries, and a
//! division graph that groups edges into caller-defined sections while
//! staying in sync with topology edits via an event subscription.
//!
//! The four pieces compose as:
//! - [`collections`] — generic building blocks (`Multiset`, `PairMap`)
//!   used throughout the rest of the crate.
//! - [`track`] — `TrackGraph`, the topology and slice engine (C4/C5).
//! - [`component_graph`] — `ComponentGraph`, plain connected-component
//!   bookkeeping (C6).
//! - [`division`] — `DivisionGraph`, edge groupings layered over a
//!   `TrackGraph` (C7).
//! - [`helpers`] — compound operations: `split_edge`, `move_slice`,
//!   `clone_slice`, `add_described_slice` (C8).

pub mod collections;
pub mod component_graph;
pub mod division;
pub mod error;
pub mod helpers;
pub mod track;

pub use component_graph::ComponentGraph;
pub use division::{CancellationToken, DivisionGraph};
pub use error::TrackError;
pub use helpers::{add_described_slice, clone_slice, move_slice, split_edge};
pub use track::{Direction, EdgeChange, EdgeId, EdgeView, NodeView, SliceDescribed, TrackGraph};
