//! LOUDS-DENSE construction.
//!
//! The builder turns a sorted, truncated key set into the three bitmaps of
//! the dense trie encoding. Nodes are produced in level order (breadth-first,
//! root first; within a level, in the order their parent edges appear when
//! scanning labels 0x00 to 0xFF). Each node occupies a 256-bit block in the
//! label and has-child bitmaps and a single bit in the prefix-key bitmap:
//!
//! - bit `256 * n + b` of the labels bitmap is set iff node `n` has an
//!   outgoing edge labelled `b`;
//! - the same bit of the has-child bitmap is set iff that edge leads to a
//!   further node rather than terminating a key;
//! - bit `n` of the prefix-key bitmap is set iff the path to node `n` is
//!   itself a stored key.
//!
//! With children enumerated in exactly the scan order of set has-child bits,
//! the child of edge `(n, b)` sits at level-order index
//! `rank1(has_child, 256 * n + b)`, the invariant every query walks on.

#[cfg(not(test))]
use alloc::vec::Vec;

use core::mem;

use crate::bitmap::Bitmap;
use crate::error::Error;
use crate::keys::Key;

/// Bits a single node occupies across the three bitmaps.
const BITS_PER_NODE: usize = 256 + 256 + 1;

/// Work item for one prospective node: the keys whose paths run through it,
/// held as indices into the truncated key slice, and whether some key ends
/// exactly at it.
///
/// Tasks are appended as their parent edges are discovered and consumed one
/// level later; a task whose key set stays empty belonged to a pure leaf
/// edge and never becomes a node.
#[derive(Default)]
struct NodeTask {
    keys: Vec<usize>,
    is_prefix_key: bool,
}

/// Builds the LOUDS-DENSE bitmaps from a sorted, truncated key set.
pub(crate) struct Builder {
    pub(crate) labels: Bitmap,
    pub(crate) has_child: Bitmap,
    pub(crate) is_prefix_key: Bitmap,

    /// Task arena; `level_start` marks the window of the level in progress.
    tasks: Vec<NodeTask>,
    /// Index of the task currently being filled (the most recently appended)
    current_task: usize,
    /// Level-order id of the node currently being emitted
    node_id: usize,

    /// Configured budget, reported on overflow
    memory_limit: usize,
}

impl Builder {
    /// Create a builder with a total bit budget for the three bitmaps.
    pub(crate) fn new(memory_limit: usize) -> Self {
        let node_capacity = memory_limit / BITS_PER_NODE;

        Builder {
            labels: Bitmap::new(256, 256 * node_capacity),
            has_child: Bitmap::new(256, 256 * node_capacity),
            is_prefix_key: Bitmap::new(1, node_capacity),
            tasks: Vec::new(),
            current_task: 0,
            node_id: 0,
            memory_limit,
        }
    }

    /// Maximum number of nodes the budget allows.
    #[allow(dead_code)]
    pub(crate) fn node_capacity(&self) -> usize {
        self.memory_limit / BITS_PER_NODE
    }

    /// Build the trie from `keys`, which must be sorted, duplicate-free, and
    /// already truncated.
    ///
    /// May only be called once per builder.
    pub(crate) fn build(&mut self, keys: &[Key]) -> Result<(), Error> {
        // The root's task covers every key
        self.tasks.push(NodeTask {
            keys: (0..keys.len()).collect(),
            is_prefix_key: false,
        });

        let mut level_start = 0;
        for depth in 0..max_key_length(keys) {
            // Tasks appended during this level belong to the next one;
            // freeze the boundary before scanning.
            let level_end = self.tasks.len();

            for i in level_start..level_end {
                let task = mem::take(&mut self.tasks[i]);

                if task.keys.is_empty() {
                    // A single key ended on this edge; no node to emit
                    continue;
                }

                self.initialize_node()?;

                if task.is_prefix_key {
                    self.set_is_prefix_key()?;
                }

                // Keys arrive sorted, so edge labels appear in non-decreasing
                // order and repeated labels are consecutive.
                let mut last_edge = None;
                for &key_index in &task.keys {
                    let key = &keys[key_index];
                    let edge = key[depth];

                    if last_edge != Some(edge) {
                        self.add_edge(edge)?;
                        self.append_task();
                        last_edge = Some(edge);
                    }

                    if depth == key.len() - 1 {
                        // The key terminates at the child of this edge. The
                        // edge's has-child bit stays 0 unless some other key
                        // continues through it.
                        self.tasks[self.current_task].is_prefix_key = true;
                    } else {
                        self.set_has_child(edge)?;
                        self.tasks[self.current_task].keys.push(key_index);
                    }
                }

                self.node_id += 1;
            }

            level_start = level_end;
        }

        Ok(())
    }

    /// Allocate the current node's extents in all three bitmaps.
    ///
    /// Growing up front keeps the bitmap lengths in lockstep with the node
    /// count, which rank/select during queries relies on. Exhausting the
    /// capacity here means the key set does not fit the budget.
    fn initialize_node(&mut self) -> Result<(), Error> {
        let budget = Error::BudgetExceeded {
            limit_bits: self.memory_limit,
        };

        self.labels
            .grow_to_include(self.label_offset() + 255)
            .map_err(|_| budget.clone())?;
        self.has_child
            .grow_to_include(self.has_child_offset() + 255)
            .map_err(|_| budget.clone())?;
        self.is_prefix_key
            .grow_to_include(self.is_prefix_key_offset())
            .map_err(|_| budget)?;

        Ok(())
    }

    /// Record an outgoing edge of the current node.
    fn add_edge(&mut self, edge: u8) -> Result<(), Error> {
        self.labels.set(self.label_offset() + usize::from(edge))
    }

    /// Mark an edge of the current node as leading to a further node.
    fn set_has_child(&mut self, edge: u8) -> Result<(), Error> {
        self.has_child
            .set(self.has_child_offset() + usize::from(edge))
    }

    /// Mark the current node as terminating a stored key.
    fn set_is_prefix_key(&mut self) -> Result<(), Error> {
        self.is_prefix_key.set(self.is_prefix_key_offset())
    }

    fn label_offset(&self) -> usize {
        self.node_id * 256
    }

    fn has_child_offset(&self) -> usize {
        self.node_id * 256
    }

    fn is_prefix_key_offset(&self) -> usize {
        self.node_id
    }

    /// Append a fresh task for the child behind the most recent edge.
    fn append_task(&mut self) {
        self.tasks.push(NodeTask::default());
        self.current_task = self.tasks.len() - 1;
    }

    /// Consume the builder, yielding (labels, has_child, is_prefix_key).
    pub(crate) fn into_bitmaps(self) -> (Bitmap, Bitmap, Bitmap) {
        (self.labels, self.has_child, self.is_prefix_key)
    }
}

/// Length in bytes of the longest key.
fn max_key_length(keys: &[Key]) -> usize {
    keys.iter().map(|k| k.len()).max().unwrap_or(0)
}
