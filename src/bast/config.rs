use crate::{util, Error, Result};

/// Smallest page size the layout can be blocked for, one cache line.
pub const MIN_PAGE_SIZE: usize = 64;

/// Configuration for building a [Index](crate::bast::Index).
///
/// Configuration is used only while building an index; the index keeps
/// a copy of the configuration it was built with.
#[derive(Clone, Debug)]
pub struct Config {
    /// Name of the index.
    pub name: String,
    /// Page size the layout's outermost blocks are sized and aligned
    /// for. Must be a power of two, at least [MIN_PAGE_SIZE].
    ///
    /// Default: the page size reported by the operating system.
    pub page_size: usize,
    /// Use the lane-parallel comparison path while traversing. The
    /// scalar path produces identical results; only timing differs.
    ///
    /// Default: true on x86_64, false elsewhere.
    pub simd: bool,
}

impl Config {
    /// Create a new configuration value, use the `set_*` methods to
    /// override the environment-derived defaults.
    pub fn new(name: &str) -> Config {
        Config {
            name: name.to_string(),
            page_size: util::os_page_size(),
            simd: cfg!(target_arch = "x86_64"),
        }
    }

    /// Block the layout for `page_size` bytes, typically to match huge
    /// pages on hosts that allocate them.
    pub fn set_page_size(&mut self, page_size: usize) -> &mut Self {
        self.page_size = page_size;
        self
    }

    /// Choose between the vectorized and the scalar comparison path.
    pub fn set_simd(&mut self, simd: bool) -> &mut Self {
        self.simd = simd;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.page_size < MIN_PAGE_SIZE || !self.page_size.is_power_of_two() {
            err_at!(InvalidInput, msg: "page_size {}", self.page_size)
        } else {
            Ok(())
        }
    }
}
