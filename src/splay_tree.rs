//! Splay tree keyed by `i64` with `String` payloads.
//!
//! Nodes live in an arena and point to each other by index. Children are owned
//! through `child`, while `parent` is only a handle used to walk upwards, and is
//! rewritten explicitly on every relink.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt::{Debug, Display, Formatter};

use debug_tree::{add_branch_to, add_leaf_to, AsTree, TreeBuilder};
use derivative::Derivative;

use crate::error::{Result, TreeError};

pub mod print;

pub type Idx = usize;
pub type Key = i64;

fn node_fmt(u: &Idx, f: &mut Formatter) -> std::fmt::Result {
    if *u == SplayTree::EMPTY {
        write!(f, "∅")
    } else {
        write!(f, "{u}")
    }
}
fn node2_fmt([u, v]: &[Idx; 2], f: &mut Formatter) -> std::fmt::Result {
    write!(f, "[")?;
    node_fmt(u, f)?;
    write!(f, ", ")?;
    node_fmt(v, f)?;
    write!(f, "]")
}

/// Used to pretty print a Idx, outputting ∅ if it is EMPTY.
pub struct PrettyIdx(pub Idx);

impl Display for PrettyIdx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        node_fmt(&self.0, f)
    }
}

impl Debug for PrettyIdx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

use PrettyIdx as I;

/// Which child slot of its parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
struct Node {
    key: Key,
    value: String,
    #[derivative(Debug(format_with = "node_fmt"))]
    parent: Idx,
    /// Left and right child
    #[derivative(Debug(format_with = "node2_fmt"))]
    child: [Idx; 2],
}

impl Node {
    fn new(key: Key, value: String, parent: Idx) -> Self {
        Self {
            key,
            value,
            parent,
            child: [SplayTree::EMPTY; 2],
        }
    }
}

/// Where a descent for some key ended.
enum Probe {
    Empty,
    Found(Idx),
    /// The key would hang from `parent` on `side`.
    Missing { parent: Idx, side: Side },
}

/// Self-adjusting binary search tree. Every operation that looks at a key moves
/// the node it found (or the last node it visited) to the root.
pub struct SplayTree {
    nodes: Vec<Node>,
    /// Released slots of `nodes`, reused by `add`.
    free: Vec<Idx>,
    root: Idx,
    len: usize,
}

impl Debug for SplayTree {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let builder = TreeBuilder::new();
        let _b = builder.add_branch("SplayTree");
        if self.root != Self::EMPTY {
            self.tree_preorder_dbg(self.root, &builder);
        }
        writeln!(f, "{}", builder.string())
    }
}

impl Default for SplayTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SplayTree {
    /// Marks a missing node.
    pub const EMPTY: Idx = usize::MAX;

    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: vec![],
            root: Self::EMPTY,
            len: 0,
        }
    }

    fn tree_preorder_dbg<T: AsTree>(&self, u: Idx, tree: &T) {
        let nu = &self.nodes[u];
        add_branch_to!(*tree, "[{u}] {nu:?}");
        if nu.child == [Self::EMPTY, Self::EMPTY] {
            return;
        }
        for c in nu.child {
            if c != Self::EMPTY {
                self.tree_preorder_dbg(c, tree);
            } else {
                add_leaf_to!(*tree, "<no child>");
            }
        }
    }

    fn entry(&self, u: Idx) -> (Key, &str) {
        let n = &self.nodes[u];
        (n.key, n.value.as_str())
    }

    /// Side of `u` under its parent. `u` must not be the root.
    fn side(&self, u: Idx) -> Side {
        let p = self.nodes[u].parent;
        debug_assert_ne!(p, Self::EMPTY, "{u} has no parent");
        if self.nodes[p].child[Side::Left as usize] == u {
            Side::Left
        } else {
            debug_assert_eq!(self.nodes[p].child[Side::Right as usize], u);
            Side::Right
        }
    }

    /// Puts `c` (possibly EMPTY) in the `side` slot of `u` and points it back at `u`.
    fn link(&mut self, u: Idx, side: Side, c: Idx) {
        self.nodes[u].child[side as usize] = c;
        if c != Self::EMPTY {
            self.nodes[c].parent = u;
        }
    }

    /// Rotates `x` down towards `dir`, promoting its child on the other side.
    /// `rotate(x, Side::Left)` is the classic left rotation.
    fn rotate(&mut self, x: Idx, dir: Side) {
        let up = dir.opposite();
        let y = self.nodes[x].child[up as usize];
        debug_assert_ne!(y, Self::EMPTY, "rotate({x}, {dir:?}) has nothing to promote");
        log::trace!(
            "rotate {dir:?} at {} promoting {}",
            self.nodes[x].key,
            self.nodes[y].key
        );
        let p = self.nodes[x].parent;
        let x_side = (p != Self::EMPTY).then(|| self.side(x));
        let moved = self.nodes[y].child[dir as usize];
        self.link(x, up, moved);
        self.link(y, dir, x);
        self.nodes[y].parent = p;
        match x_side {
            Some(side) => self.nodes[p].child[side as usize] = y,
            None => self.root = y,
        }
    }

    fn splay(&mut self, u: Idx) {
        while self.nodes[u].parent != Self::EMPTY {
            let p = self.nodes[u].parent;
            let g = self.nodes[p].parent;
            let side = self.side(u);
            if g == Self::EMPTY {
                log::trace!("zig {}", self.nodes[u].key);
                self.rotate(p, side.opposite());
            } else if self.side(p) == side {
                log::trace!("zig-zig {}", self.nodes[u].key);
                self.rotate(g, side.opposite());
                self.rotate(p, side.opposite());
            } else {
                log::trace!("zig-zag {}", self.nodes[u].key);
                self.rotate(p, side.opposite());
                self.rotate(g, side);
            }
        }
        self.root = u;
    }

    /// Follows `side` links from `u` as far as possible.
    fn extreme(&self, mut u: Idx, side: Side) -> Idx {
        while self.nodes[u].child[side as usize] != Self::EMPTY {
            u = self.nodes[u].child[side as usize];
        }
        u
    }

    fn probe(&self, key: Key) -> Probe {
        let mut u = self.root;
        if u == Self::EMPTY {
            return Probe::Empty;
        }
        loop {
            let side = match key.cmp(&self.nodes[u].key) {
                Ordering::Equal => return Probe::Found(u),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            let c = self.nodes[u].child[side as usize];
            if c == Self::EMPTY {
                return Probe::Missing { parent: u, side };
            }
            u = c;
        }
    }

    /// Looks `key` up and splays whatever the search ended on.
    fn access(&mut self, key: Key) -> Option<Idx> {
        match self.probe(key) {
            Probe::Empty => None,
            Probe::Found(u) => {
                self.splay(u);
                Some(u)
            }
            Probe::Missing { parent, .. } => {
                self.splay(parent);
                None
            }
        }
    }

    fn alloc(&mut self, key: Key, value: String, parent: Idx) -> Idx {
        let node = Node::new(key, value, parent);
        self.len += 1;
        match self.free.pop() {
            Some(u) => {
                self.nodes[u] = node;
                u
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Frees the slot of a node that is no longer linked from anywhere.
    fn release(&mut self, u: Idx) {
        let n = &mut self.nodes[u];
        n.value = String::new();
        n.parent = Self::EMPTY;
        n.child = [Self::EMPTY; 2];
        self.free.push(u);
        self.len -= 1;
    }

    /// Inserts a new key. If the key is already present its node is splayed and
    /// the value is left untouched.
    pub fn add(&mut self, key: Key, value: impl Into<String>) -> Result<()> {
        let u = match self.probe(key) {
            Probe::Found(u) => {
                self.splay(u);
                return Err(TreeError::DuplicateKey(key));
            }
            Probe::Empty => self.alloc(key, value.into(), Self::EMPTY),
            Probe::Missing { parent, side } => {
                let u = self.alloc(key, value.into(), parent);
                self.nodes[parent].child[side as usize] = u;
                u
            }
        };
        log::trace!("add {key} at slot {}", I(u));
        self.splay(u);
        Ok(())
    }

    /// Value stored at `key`. Splays the node found, or the last node visited.
    pub fn search(&mut self, key: Key) -> Option<&str> {
        let u = self.access(key)?;
        Some(self.nodes[u].value.as_str())
    }

    pub fn set(&mut self, key: Key, value: impl Into<String>) -> Result<()> {
        let u = self.access(key).ok_or(TreeError::KeyNotFound(key))?;
        self.nodes[u].value = value.into();
        Ok(())
    }

    /// Removes `key`. The predecessor, splayed to the top of the left subtree,
    /// adopts the right subtree and becomes the root.
    pub fn delete(&mut self, key: Key) -> Result<()> {
        let u = self.access(key).ok_or(TreeError::KeyNotFound(key))?;
        debug_assert_eq!(self.root, u);
        let [l, r] = self.nodes[u].child;
        log::trace!("delete {key}: left {} right {}", I(l), I(r));
        if l == Self::EMPTY {
            self.root = r;
            if r != Self::EMPTY {
                self.nodes[r].parent = Self::EMPTY;
            }
        } else {
            self.nodes[l].parent = Self::EMPTY;
            let m = self.extreme(l, Side::Right);
            self.splay(m);
            debug_assert_eq!(self.nodes[m].child[Side::Right as usize], Self::EMPTY);
            self.link(m, Side::Right, r);
        }
        self.release(u);
        Ok(())
    }

    pub fn min(&mut self) -> Result<(Key, &str)> {
        self.splay_extreme(Side::Left)
    }

    pub fn max(&mut self) -> Result<(Key, &str)> {
        self.splay_extreme(Side::Right)
    }

    fn splay_extreme(&mut self, side: Side) -> Result<(Key, &str)> {
        if self.root == Self::EMPTY {
            return Err(TreeError::EmptyTree);
        }
        let u = self.extreme(self.root, side);
        self.splay(u);
        Ok(self.entry(u))
    }

    /// Entry at the root, without touching the tree.
    pub fn root(&self) -> Option<(Key, &str)> {
        (self.root != Self::EMPTY).then(|| self.entry(self.root))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root == Self::EMPTY
    }

    /// Number of levels, 0 for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level = VecDeque::new();
        if self.root != Self::EMPTY {
            level.push_back(self.root);
        }
        while !level.is_empty() {
            height += 1;
            for _ in 0..level.len() {
                let Some(u) = level.pop_front() else { break };
                level.extend(self.nodes[u].child.into_iter().filter(|&c| c != Self::EMPTY));
            }
        }
        height
    }

    /// In-order traversal. Does not splay.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: vec![],
            next: self.root,
        }
    }
}

pub struct Iter<'a> {
    tree: &'a SplayTree,
    stack: Vec<Idx>,
    next: Idx,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Key, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while self.next != SplayTree::EMPTY {
            self.stack.push(self.next);
            self.next = tree.nodes[self.next].child[Side::Left as usize];
        }
        let u = self.stack.pop()?;
        self.next = tree.nodes[u].child[Side::Right as usize];
        Some(tree.entry(u))
    }
}

impl<'a> IntoIterator for &'a SplayTree {
    type Item = (Key, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
