//==== error ===================================================================

//! # Errors
//!
//! Hard user errors for the track graph. These are raised only for malformed
//! requests (a non-positive length, a self-edge, a non-distinct node triple).
//! Everything else the core can refuse to do — deleting an occupied edge,
//! disconnecting a junction a slice depends on, adding a duplicate id — is a
//! normal `bool`/`Option` return, not an error (see the method docs on
//! `TrackGraph` for which is which).

use thiserror::Error;

/// Hard failures raised by `TrackGraph` and the `split_edge` helper.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackError {
	/// `add_edge` was called with a length that is not a positive integer.
	#[error("edge length must be a positive integer")]
	NonPositiveLength,

	/// `add_edge` was called with the same node on both ends.
	#[error("an edge cannot join a node to itself")]
	SelfEdge,

	/// `connect`/`disconnect` was called with a node triple that is not
	/// pairwise distinct.
	#[error("connect/disconnect requires three pairwise distinct nodes")]
	NonDistinctNodes,

	/// `split_edge` was called with a position outside the open interval
	/// `(0, length)`.
	#[error("split position must lie strictly between 0 and the edge length")]
	InvalidSplitPosition,
}
