//! Module implement a blocked architecture-sensitive tree, an immutable
//! in-memory index over a sorted array of signed 32-bit keys.
//!
//! Use the [Config] type to parameterize construction and [Index::build]
//! to bulk-build an index from a sorted slice. Once built the index
//! cannot be modified. While strict immutability might seem like an
//! inconvenience, it has certain advantages,
//!
//! * The tree is fully packed, free of per-node pointers.
//! * Keys can be permuted for the machine's memory hierarchy.
//! * Queries allocate nothing and never take a lock, so any number of
//!   threads can read the same index concurrently.
//!
//! **Inventory of features**
//!
//! * API `predecessor()` operation, the sorted position of the largest
//!   key less-than-or-equal to the query.
//! * API `lower_bound()` operation, the sorted position of the smallest
//!   key greater-than-or-equal to the query.
//! * API `key_at()`, `len()` and `as_keys()` to read back the indexed
//!   keys by sorted position.
//! * Vectorized and scalar traversal paths, semantically identical,
//!   selected via [Config::set_simd].
//! * Page blocking parameterized via [Config::set_page_size], so the
//!   same build serves 4 KiB pages and 2 MiB huge pages.
//!
//! **How the index is laid out**
//!
//! The sorted keys are assigned, in-order, to a conceptual complete
//! binary tree of depth `D = ceil(log2(n+1))`; slots past the last real
//! key hold [SENTINEL], which compares greater than every query and so
//! steers traversal away from the padding. The tree is then flattened
//! into one contiguous image in a hierarchically blocked order: page
//! blocks, holding as many levels as fit one virtual-memory page, are
//! split into 15-key cache-line blocks, which are split into 3-key SIMD
//! blocks stored in breadth-first order. A subtree always occupies a
//! contiguous run of slots, which is what keeps the traversal's child
//! arithmetic constant-time.
//!
//! **How a query runs**
//!
//! One lane-parallel compare against a SIMD block resolves two tree
//! levels; the lane mask is decoded to a child index through a fixed
//! lookup table, replacing unpredictable branches. The walk tracks a
//! single linear offset into the image and finishes in a leaf block,
//! whose rank-map entry seeds the answer; a bounded forward scan over
//! the retained sorted keys settles duplicate ties. Within a run of
//! equal keys the reported position lands inside the run, not
//! necessarily at its right edge.

mod config;
mod index;
mod layout;
mod search;
mod stats;

pub use config::{Config, MIN_PAGE_SIZE};
pub use index::Index;
pub use stats::Stats;

/// Tree levels resolved by one SIMD block.
pub const SIMD_DEPTH: usize = 2;
/// Keys held by one SIMD block.
pub const SIMD_KEYS: usize = 3;
/// Tree levels held by one cache-line block.
pub const LINE_DEPTH: usize = 4;
/// Keys held by one cache-line block.
pub const LINE_KEYS: usize = 15;
/// Pad value for slots beyond the last real key. Compares greater than
/// every query key.
pub const SENTINEL: i32 = i32::MAX;
