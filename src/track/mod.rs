//==== track ====================================================================

//! # Track topology and slice engine
//!
//! `graph` owns the node/edge topology and the event feed; `slice` adds the
//! slice engine as a second `impl TrackGraph` block; `views` holds the
//! read-only snapshot types returned by lookups.

pub mod graph;
pub mod slice;
pub mod views;

pub use graph::{EdgeChange, EdgeId, TrackGraph};
pub use views::{Direction, EdgeView, NodeView, SliceDescribed};
