//! Range-compressed transition rows.
//!
//! A fully resolved automaton state maps all 256 byte values to a next
//! state, but most bytes fall back to the start state. A `PackedTable`
//! stores the row as runs: `ceilings[i]` is the exclusive upper bound of run
//! `i` and `steps[i]` its target.

use super::arena::NodeId;

/// One past the largest byte value.
pub const BYTE_CEILING: usize = 256;

/// A compact byte-indexed lookup table of node ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedTable {
    /// Exclusive upper byte bound of each run, ascending, last is 256.
    ceilings: Vec<u16>,
    steps: Vec<NodeId>,
}

impl Default for PackedTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PackedTable {
    /// A table sending every byte to the start state.
    pub fn new() -> Self {
        Self {
            ceilings: vec![BYTE_CEILING as u16],
            steps: vec![NodeId::ROOT],
        }
    }

    /// Build a row from `(byte, target)` pairs in ascending byte order.
    ///
    /// Bytes without an entry go to the start state. Neighbouring bytes with
    /// the same target share a run.
    pub fn from_sparse(entries: impl IntoIterator<Item = (u8, NodeId)>) -> Self {
        let mut table = Self {
            ceilings: Vec::new(),
            steps: Vec::new(),
        };
        // First byte not covered by any run yet.
        let mut floor = 0u16;
        for (byte, target) in entries {
            let byte = u16::from(byte);
            debug_assert!(byte >= floor, "entries must be sorted and unique");
            if byte > floor {
                table.cover(byte, NodeId::ROOT);
            }
            table.cover(byte + 1, target);
            floor = byte + 1;
        }
        if floor < BYTE_CEILING as u16 {
            table.cover(BYTE_CEILING as u16, NodeId::ROOT);
        }
        table
    }

    /// Send every byte below `ceiling` not yet covered to `target`.
    fn cover(&mut self, ceiling: u16, target: NodeId) {
        match (self.ceilings.last_mut(), self.steps.last()) {
            (Some(last), Some(&step)) if step == target => *last = ceiling,
            _ => {
                self.ceilings.push(ceiling);
                self.steps.push(target);
            }
        }
    }

    /// Expand back to one target per byte.
    #[cfg(test)]
    pub(crate) fn unpack(&self) -> [NodeId; BYTE_CEILING] {
        let mut unpacked = [NodeId::ROOT; BYTE_CEILING];
        let mut floor = 0usize;
        for (&ceiling, &target) in self.ceilings.iter().zip(&self.steps) {
            let ceiling = ceiling as usize;
            unpacked[floor..ceiling].fill(target);
            floor = ceiling;
        }
        unpacked
    }

    /// Target for `byte`.
    #[inline]
    pub fn get(&self, byte: u8) -> NodeId {
        let run = self.ceilings.partition_point(|&c| c <= u16::from(byte));
        self.steps[run]
    }

    /// Number of runs.
    #[inline]
    pub fn runs(&self) -> usize {
        self.steps.len()
    }
}
