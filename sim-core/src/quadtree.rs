//! Bounded quadtree over particle positions.
//!
//! The tree is rebuilt from scratch every frame: [`QuadTree::reset`] drops
//! every node and the particles are re-inserted. Nodes live in a flat arena
//! and refer to their children by [`QuadNodeId`], so a rebuild reuses the
//! arena's allocation.
//!
//! Entries carry the position they were inserted with plus a
//! [`ParticleId`] handle back into the pool. Range filtering uses the
//! stored position; callers that need the live position look it up through
//! the handle.

use crate::{
    bound::Bound,
    types::{ParticleId, QuadNodeId},
};
use glam::Vec2;

/// Default number of entries a leaf holds before it splits.
pub const DEFAULT_CAPACITY: usize = 50;

/// Default depth at which leaves stop splitting.
pub const DEFAULT_MAX_DEPTH: u32 = 16;

const ROOT: QuadNodeId = 0;

/// A point stored in the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadEntry {
    pub pos: Vec2,
    pub id: ParticleId,
}

#[derive(Debug)]
struct QuadNode {
    bound: Bound,
    depth: u32,
    entries: Vec<QuadEntry>,
    /// Quadrants in [`Bound::quarter`] order. `None` for leaves.
    children: Option<[QuadNodeId; 4]>,
}

impl QuadNode {
    fn leaf(bound: Bound, depth: u32) -> Self {
        Self {
            bound,
            depth,
            entries: Vec::new(),
            children: None,
        }
    }
}

#[derive(Debug)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    capacity: usize,
    max_depth: u32,
    len: usize,
}

impl QuadTree {
    /// Creates an empty tree covering `bound`.
    ///
    /// A `capacity` of zero is treated as one.
    pub fn new(bound: Bound, capacity: usize, max_depth: u32) -> Self {
        Self {
            nodes: vec![QuadNode::leaf(bound, 0)],
            capacity: capacity.max(1),
            max_depth,
            len: 0,
        }
    }

    pub fn with_bound(bound: Bound) -> Self {
        Self::new(bound, DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH)
    }

    /// Drops every entry and node and re-roots the tree at `bound`.
    pub fn reset(&mut self, bound: Bound) {
        self.nodes.clear();
        self.nodes.push(QuadNode::leaf(bound, 0));
        self.len = 0;
    }

    /// Changes the split threshold. Takes effect on the next [`reset`](Self::reset).
    pub fn set_limits(&mut self, capacity: usize, max_depth: u32) {
        self.capacity = capacity.max(1);
        self.max_depth = max_depth;
    }

    pub fn bound(&self) -> Bound {
        self.nodes[ROOT].bound
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node; a lone root has depth 0.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Bounds of every node, parents before children.
    pub fn bounds(&self) -> impl Iterator<Item = Bound> + '_ {
        self.nodes.iter().map(|n| n.bound)
    }

    /// Inserts a point.
    ///
    /// Returns `false` and stores nothing if `pos` lies outside the root
    /// bound.
    ///
    /// A leaf that is already at capacity splits into four quadrants, moves
    /// its entries down into them and then places the new entry. Leaves at
    /// the maximum depth keep growing instead of splitting, so coincident
    /// points cannot split forever.
    pub fn insert(&mut self, pos: Vec2, id: ParticleId) -> bool {
        if !self.nodes[ROOT].bound.contains_point(pos) {
            return false;
        }

        let entry = QuadEntry { pos, id };
        let mut node = ROOT;
        loop {
            if let Some(children) = self.nodes[node].children {
                node = self.route(children, pos);
                continue;
            }

            let leaf = &mut self.nodes[node];
            if leaf.entries.len() < self.capacity || leaf.depth >= self.max_depth {
                leaf.entries.push(entry);
                self.len += 1;
                return true;
            }

            self.subdivide(node);
        }
    }

    /// Returns every entry whose stored position lies inside `range`.
    ///
    /// Order is unspecified; an entry appears at most once.
    pub fn query(&self, range: &Bound) -> Vec<QuadEntry> {
        let mut out = Vec::new();
        self.query_into(range, &mut out);
        out
    }

    /// Like [`query`](Self::query) but appends into `out`, so a caller can
    /// reuse one buffer for every particle in a frame.
    pub fn query_into(&self, range: &Bound, out: &mut Vec<QuadEntry>) {
        self.query_node(ROOT, range, out);
    }

    fn query_node(&self, id: QuadNodeId, range: &Bound, out: &mut Vec<QuadEntry>) {
        let node = &self.nodes[id];
        if !node.bound.intersects(range) {
            return;
        }
        match node.children {
            Some(children) => {
                for child in children {
                    self.query_node(child, range, out);
                }
            }
            None => out.extend(
                node.entries
                    .iter()
                    .filter(|e| range.contains_point(e.pos))
                    .copied(),
            ),
        }
    }

    /// Picks the child quadrant for `pos` by comparing against the split
    /// point, which is the origin of the bottom-right child.
    #[inline]
    fn route(&self, children: [QuadNodeId; 4], pos: Vec2) -> QuadNodeId {
        let split = self.nodes[children[3]].bound;
        let right = (pos.x >= split.x) as usize;
        let lower = (pos.y >= split.y) as usize;
        children[lower * 2 + right]
    }

    fn subdivide(&mut self, id: QuadNodeId) {
        let bound = self.nodes[id].bound;
        let depth = self.nodes[id].depth + 1;

        let first = self.nodes.len();
        for quadrant in bound.quarter() {
            self.nodes.push(QuadNode::leaf(quadrant, depth));
        }
        let children = [first, first + 1, first + 2, first + 3];

        let entries = std::mem::take(&mut self.nodes[id].entries);
        self.nodes[id].children = Some(children);

        // At most `capacity` entries spread over four empty leaves, so none
        // of them can overflow here.
        for entry in entries {
            let child = self.route(children, entry.pos);
            self.nodes[child].entries.push(entry);
        }
    }
}
