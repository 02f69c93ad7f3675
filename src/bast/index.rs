use std::{convert::TryFrom, mem};

use crate::{
    bast::{
        layout::{Layout, Shape},
        search, Config, Stats, SENTINEL,
    },
    Error, Result,
};

/// Immutable index over a sorted array of signed 32-bit keys, answering
/// predecessor and lower-bound queries by sorted position.
///
/// Refer to module documentation for the layout and query design. An
/// index owns three allocations, the blocked layout image, the rank
/// map and a copy of the sorted keys; all three are created together
/// by [Index::build] and released together on drop. Once built the
/// index is read-only and can be shared among threads.
pub struct Index {
    config: Config,
    shape: Shape,
    layout: Layout,
    keys: Vec<i32>,
}

impl Index {
    /// Build a fresh index over `keys`, which must be non-empty and in
    /// non-decreasing order, duplicates allowed. On failure no partial
    /// state survives.
    pub fn build(config: Config, keys: &[i32]) -> Result<Index> {
        config.validate()?;
        if keys.is_empty() {
            return err_at!(InvalidInput, msg: "empty key set");
        } else if u32::try_from(keys.len()).is_err() {
            return err_at!(FailConvert, msg: "{} keys", keys.len());
        }
        for (i, pair) in keys.windows(2).enumerate() {
            if pair[0] > pair[1] {
                return err_at!(InvalidInput, msg: "keys out of order at {}", i);
            }
        }

        let shape = Shape::new(keys.len(), config.page_size);
        let layout = Layout::build(&shape, keys)?;
        let keys = {
            let mut copy: Vec<i32> = vec![];
            if copy.try_reserve_exact(keys.len()).is_err() {
                return err_at!(OutOfMemory, msg: "key copy {} keys", keys.len());
            }
            copy.extend_from_slice(keys);
            copy
        };

        Ok(Index {
            config,
            shape,
            layout,
            keys,
        })
    }
}

impl Index {
    /// Return the name of the index.
    pub fn to_name(&self) -> String {
        self.config.name.clone()
    }

    /// Return the configuration the index was built with.
    pub fn to_config(&self) -> Config {
        self.config.clone()
    }

    /// Return the number of keys in the index.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Return the key at sorted position `off`.
    pub fn key_at(&self, off: usize) -> Option<i32> {
        self.keys.get(off).copied()
    }

    /// Return the retained sorted keys.
    pub fn as_keys(&self) -> &[i32] {
        &self.keys
    }

    /// Sorted position of the largest key less-than-or-equal to `q`,
    /// None when `q` sorts below every key. Within a run of equal keys
    /// the returned position lands inside the run, not necessarily at
    /// its right edge.
    pub fn predecessor(&self, q: i32) -> Option<usize> {
        let n = self.keys.len();
        if q < self.keys[0] {
            return None;
        } else if q >= self.keys[n - 1] {
            return Some(n - 1);
        }

        let slots = self.layout.as_slots();
        let leaf = search::descend(slots, &self.shape, q, self.config.simd);
        search::resolve(&leaf, self.layout.as_ranks(), &self.keys, q)
    }

    /// Sorted position of the smallest key at-or-above `q`, [Index::len]
    /// when every key is smaller.
    pub fn lower_bound(&self, q: i32) -> usize {
        search::lower_bound(&self.keys, q)
    }

    /// Return heap bytes owned by the index.
    pub fn footprint(&self) -> Result<isize> {
        let keys = self.keys.capacity() * mem::size_of::<i32>();
        Ok(self.layout.footprint()? + err_at!(FailConvert, isize::try_from(keys))?)
    }

    /// Gather statistics for the index.
    pub fn to_stats(&self) -> Result<Stats> {
        Ok(Stats {
            name: self.config.name.clone(),
            n_keys: self.shape.n,
            depth: self.shape.depth,
            node_count: self.shape.node_count,
            n_padded: self.shape.node_count - self.shape.n,
            page_size: self.config.page_size,
            page_depth: self.shape.page_depth,
            align: self.layout.to_align(),
            simd: self.config.simd,
            footprint: self.footprint()?,
        })
    }

    /// Validate the index with following rules:
    ///
    /// * Retained keys are in non-decreasing order.
    /// * Shape arithmetic matches the key count and the page size.
    /// * Layout image and rank map have identical, shape-given length.
    /// * Rank map restricted to real slots is a bijection onto the
    ///   sorted positions, and every real slot holds the key at its
    ///   rank.
    /// * Every padded slot holds the sentinel and is marked as padding
    ///   in the rank map.
    pub fn validate(&self) -> Result<()> {
        let (n, t) = (self.keys.len(), self.shape.node_count);

        for (i, pair) in self.keys.windows(2).enumerate() {
            if pair[0] > pair[1] {
                return err_at!(Fatal, msg: "key copy out of order at {}", i);
            }
        }

        let shape = Shape::new(n, self.config.page_size);
        if shape != self.shape {
            return err_at!(Fatal, msg: "shape drift {:?} != {:?}", shape, self.shape);
        }

        let (slots, ranks) = (self.layout.as_slots(), self.layout.as_ranks());
        if slots.len() != t || ranks.len() != t {
            return err_at!(Fatal, msg: "image length {}/{}/{}", slots.len(), ranks.len(), t);
        }

        let mut seen = vec![false; n];
        let mut n_padded = 0;
        for (pos, (&slot, &rank)) in slots.iter().zip(ranks.iter()).enumerate() {
            let rank = rank as usize;
            if rank < n {
                if seen[rank] {
                    return err_at!(Fatal, msg: "rank {} repeats at slot {}", rank, pos);
                }
                seen[rank] = true;
                if slot != self.keys[rank] {
                    let key = self.keys[rank];
                    return err_at!(Fatal, msg: "slot {} holds {} want {}", pos, slot, key);
                }
            } else if rank == n && slot == SENTINEL {
                n_padded += 1;
            } else {
                return err_at!(Fatal, msg: "slot {} rank {}", pos, rank);
            }
        }
        if n_padded != t - n {
            return err_at!(Fatal, msg: "{} padded slots, want {}", n_padded, t - n);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
