//==== collections =============================================================

//! # Collections
//!
//! Small, pure utility containers shared by the rest of the crate: a
//! count-bag (`Multiset`), a symmetric unordered-pair map (`PairMap`), and a
//! contiguous-subsequence test (`contains_contiguous`).

pub mod multiset;
pub mod pair_map;
pub mod subsequence;

pub use multiset::Multiset;
pub use pair_map::PairMap;
pub use subsequence::contains_contiguous;
