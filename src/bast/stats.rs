use std::{fmt, result};

#[allow(unused_imports)]
use crate::bast::{Config, Index};

/// Statistic type, for [Index].
pub struct Stats {
    /// Comes from [Config] type.
    pub name: String,
    /// Number of keys indexed.
    pub n_keys: usize,
    /// Levels in the padded tree.
    pub depth: usize,
    /// Slots in the layout image, padding included.
    pub node_count: usize,
    /// Slots holding the sentinel.
    pub n_padded: usize,
    /// Comes from [Config] type.
    pub page_size: usize,
    /// Levels per page block, derived from the page size.
    pub page_depth: usize,
    /// Alignment of the layout image.
    pub align: usize,
    /// Comes from [Config] type.
    pub simd: bool,
    /// Heap bytes owned by the index.
    pub footprint: isize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        writeln!(f, "bast.name = {}", self.name)?;
        writeln!(
            f,
            "bast = {{ n_keys={}, depth={}, node_count={}, n_padded={} }}",
            self.n_keys, self.depth, self.node_count, self.n_padded,
        )?;
        writeln!(
            f,
            "bast.blocking = {{ page_size={}, page_depth={}, align={}, simd={} }}",
            self.page_size, self.page_depth, self.align, self.simd,
        )?;
        writeln!(f, "bast = {{ footprint={} }}", self.footprint)
    }
}
