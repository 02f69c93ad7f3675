use std::{cmp, convert::TryFrom};

use crate::{
    bast::{LINE_DEPTH, SENTINEL, SIMD_DEPTH},
    util::{self, AlignedBuf},
    Error, Result,
};

/// Shape of the padded tree, derived from the key count and the page
/// size at build time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Shape {
    /// Number of real keys.
    pub n: usize,
    /// Levels in the padded complete tree.
    pub depth: usize,
    /// Nodes in the padded complete tree, `2^depth - 1`.
    pub node_count: usize,
    /// Levels per page block.
    pub page_depth: usize,
    /// Alignment of the layout image.
    pub align: usize,
}

impl Shape {
    pub fn new(n: usize, page_size: usize) -> Shape {
        let depth = tree_depth(n);
        let align = if depth > LINE_DEPTH { page_size } else { 64 };
        Shape {
            n,
            depth,
            node_count: subtree_size(depth),
            page_depth: util::page_depth(page_size),
            align,
        }
    }
}

/// Levels in the complete binary tree that pads `n` keys, the smallest
/// depth whose tree holds at least `n` nodes.
pub(crate) fn tree_depth(n: usize) -> usize {
    let mut depth = 0;
    while subtree_size(depth) < n {
        depth += 1;
    }
    depth
}

/// Slots occupied by a complete subtree of `depth` levels.
#[inline]
pub(crate) fn subtree_size(depth: usize) -> usize {
    (1 << depth) - 1
}

/// In-order rank of the node at BFS position `b`. `height` counts the
/// levels at and below the node, `depth` the levels of the whole tree;
/// the rank is a pure function of the tree shape.
pub(crate) fn in_order_rank(b: usize, height: usize, depth: usize) -> usize {
    let row = b + 1 - (1 << (depth - height));
    row * (1 << height) + (1 << (height - 1)) - 1
}

// Blocking granularity for one step of the layout recursion. Page
// blocks nest cache-line blocks nest SIMD blocks.
#[derive(Clone, Copy)]
enum Level {
    Page,
    Line,
    Simd,
}

impl Level {
    fn sub_depth(&self, page_depth: usize) -> usize {
        match self {
            Level::Page => page_depth,
            Level::Line => LINE_DEPTH,
            Level::Simd => SIMD_DEPTH,
        }
    }

    fn finer(&self) -> Level {
        match self {
            Level::Page => Level::Line,
            Level::Line | Level::Simd => Level::Simd,
        }
    }
}

/// Hierarchically blocked memory image of the padded tree, along with
/// the rank map tying every slot back to its sorted position.
pub(crate) struct Layout {
    slots: AlignedBuf,
    ranks: Vec<u32>,
}

impl Layout {
    /// Permute `keys` into the blocked image. Slot image and rank map
    /// have identical length and are filled together, one position at
    /// a time.
    pub fn build(shape: &Shape, keys: &[i32]) -> Result<Layout> {
        let mut slots = AlignedBuf::new(shape.node_count, shape.align)?;
        let mut ranks: Vec<u32> = vec![];
        if ranks.try_reserve_exact(shape.node_count).is_err() {
            return err_at!(OutOfMemory, msg: "rank map {} slots", shape.node_count);
        }
        ranks.resize(shape.node_count, 0);

        let mut fill = Fill {
            keys,
            n: shape.n,
            depth: shape.depth,
            page_depth: shape.page_depth,
            slots: slots.as_mut_slice(),
            ranks: &mut ranks,
            pos: 0,
        };
        fill.emit(0, shape.depth, Level::Page)?;
        let pos = fill.pos;
        if pos != shape.node_count {
            return err_at!(Fatal, msg: "layout fill {}/{}", pos, shape.node_count);
        }

        Ok(Layout { slots, ranks })
    }

    pub fn as_slots(&self) -> &[i32] {
        self.slots.as_slice()
    }

    pub fn as_ranks(&self) -> &[u32] {
        &self.ranks
    }

    pub fn to_align(&self) -> usize {
        self.slots.to_align()
    }

    pub fn footprint(&self) -> Result<isize> {
        let slots = err_at!(FailConvert, isize::try_from(self.slots.footprint()))?;
        let ranks = err_at!(FailConvert, isize::try_from(self.ranks.capacity() * 4))?;
        Ok(slots + ranks)
    }
}

// One pass of the layout recursion over the implicit BFS tree. `emit`
// is called with `height` equal to the number of levels at and below
// BFS node `b`, so in-order ranks come out of closed-form arithmetic.
struct Fill<'a> {
    keys: &'a [i32],
    n: usize,
    depth: usize,
    page_depth: usize,
    slots: &'a mut [i32],
    ranks: &'a mut [u32],
    pos: usize,
}

impl<'a> Fill<'a> {
    fn emit(&mut self, b: usize, height: usize, level: Level) -> Result<()> {
        if height <= SIMD_DEPTH {
            // bottom of the recursion, the subtree in BFS order.
            self.write(b, height)?;
            if height == SIMD_DEPTH {
                self.write(2 * b + 1, height - 1)?;
                self.write(2 * b + 2, height - 1)?;
            }
            return Ok(());
        }

        let top = cmp::min(level.sub_depth(self.page_depth), height);
        if top == height {
            // subtree fits one block of this level, emit at the next
            // finer granularity.
            return self.emit(b, height, level.finer());
        }

        self.emit(b, top, level.finer())?;
        let fanout = 1 << top;
        let first = (b << top) + fanout - 1;
        for i in 0..fanout {
            self.emit(first + i, height - top, level)?;
        }
        Ok(())
    }

    fn write(&mut self, b: usize, height: usize) -> Result<()> {
        let rank = in_order_rank(b, height, self.depth);
        let (key, rank) = if rank < self.n {
            (self.keys[rank], rank)
        } else {
            (SENTINEL, self.n)
        };
        self.slots[self.pos] = key;
        self.ranks[self.pos] = err_at!(FailConvert, u32::try_from(rank))?;
        self.pos += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;
