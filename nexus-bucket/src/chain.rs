//! Logical nodes and the insertion-order chain.
//!
//! One node exists per live element. A node records where the element sits
//! (bucket, slot), when it was inserted, and its neighbours in insertion
//! order. Nodes never move: erasing an element releases only its own node,
//! so handles to every other element stay valid.
//!
//! The chain's own `head`/`tail` pair plays the end sentinel. Following
//! `next` from the newest node, or `prev` from the oldest, yields
//! [`NODE_NONE`], which is the end position.

use crate::error::AllocError;

/// Sentinel node index: end of the chain.
pub(crate) const NODE_NONE: u32 = u32::MAX;

/// Timestamp reserved for the end sentinel. Sorts after every element.
pub(crate) const STAMP_END: u64 = u64::MAX;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    pub bucket: u32,
    pub slot: u32,
    pub stamp: u64,
    pub generation: u32,
    pub live: bool,
    pub prev: u32,
    pub next: u32,
}

#[derive(Debug)]
pub(crate) struct Chain {
    nodes: Vec<Node>,
    /// Released node indices, reused LIFO.
    free: Vec<u32>,
    head: u32,
    tail: u32,
    len: usize,
}

impl Chain {
    #[inline]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: NODE_NONE,
            tail: NODE_NONE,
            len: 0,
        }
    }

    #[inline]
    pub fn head(&self) -> u32 {
        self.head
    }

    #[inline]
    pub fn tail(&self) -> u32 {
        self.tail
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Guarantees the next [`link_back`](Self::link_back) does not allocate.
    pub fn try_reserve(&mut self) -> Result<(), AllocError> {
        if !self.free.is_empty() {
            return Ok(());
        }
        self.try_reserve_many(1)
    }

    /// Guarantees the next `additional` links (and the release of every
    /// node) do not allocate.
    pub fn try_reserve_many(&mut self, additional: usize) -> Result<(), AllocError> {
        debug_assert!(self.nodes.len() + additional <= NODE_NONE as usize);
        self.nodes.try_reserve(additional)?;
        // Room to release every node, so unlink never allocates.
        let needed = (self.nodes.len() + additional).saturating_sub(self.free.len());
        self.free.try_reserve(needed)?;
        Ok(())
    }

    /// (node, free-list) buffer capacities.
    #[cfg(test)]
    pub fn reserved(&self) -> (usize, usize) {
        (self.nodes.capacity(), self.free.capacity())
    }

    /// Creates a node for (bucket, slot) and splices it in just before the
    /// end sentinel. Returns the node index and its generation.
    pub fn link_back(&mut self, bucket: u32, slot: u32, stamp: u64) -> (u32, u32) {
        let tail = self.tail;
        let idx = match self.free.pop() {
            Some(idx) => {
                let node = &mut self.nodes[idx as usize];
                debug_assert!(!node.live);
                node.bucket = bucket;
                node.slot = slot;
                node.stamp = stamp;
                node.live = true;
                node.prev = tail;
                node.next = NODE_NONE;
                idx
            }
            None => {
                self.nodes.push(Node {
                    bucket,
                    slot,
                    stamp,
                    generation: 0,
                    live: true,
                    prev: tail,
                    next: NODE_NONE,
                });
                (self.nodes.len() - 1) as u32
            }
        };

        if tail != NODE_NONE {
            self.nodes[tail as usize].next = idx;
        } else {
            self.head = idx;
        }
        self.tail = idx;
        self.len += 1;

        (idx, self.nodes[idx as usize].generation)
    }

    /// Unlinks a live node and releases it. Returns its (bucket, slot).
    ///
    /// The node's generation is bumped so stale handles no longer resolve.
    pub fn unlink(&mut self, idx: u32) -> (u32, u32) {
        let node = self.nodes[idx as usize];
        debug_assert!(node.live, "unlinking released node");

        if node.prev != NODE_NONE {
            self.nodes[node.prev as usize].next = node.next;
        } else {
            self.head = node.next;
        }

        if node.next != NODE_NONE {
            self.nodes[node.next as usize].prev = node.prev;
        } else {
            self.tail = node.prev;
        }

        let released = &mut self.nodes[idx as usize];
        released.live = false;
        released.prev = NODE_NONE;
        released.next = NODE_NONE;
        released.generation = released.generation.wrapping_add(1);
        self.free.push(idx);
        self.len -= 1;

        (node.bucket, node.slot)
    }

    /// Returns the node if `idx` is live and still carries `generation`.
    #[inline]
    pub fn resolve(&self, idx: u32, generation: u32) -> Option<&Node> {
        self.nodes
            .get(idx as usize)
            .filter(|node| node.live && node.generation == generation)
    }

    /// Returns a live node by index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of bounds.
    #[inline]
    pub fn node(&self, idx: u32) -> &Node {
        let node = &self.nodes[idx as usize];
        debug_assert!(node.live);
        node
    }
}
