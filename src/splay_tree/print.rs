//! Level-order dump of a [`SplayTree`].
//!
//! The root gets a line of its own. The line for depth `d` has `2^d` slots,
//! each either `[key value parentKey]` or `_`; children of an empty slot are
//! empty too. Output stops before the first level with no node in it.

use std::fmt::{self, Display, Formatter};

use super::{Idx, Side, SplayTree};

/// Read-only view that formats the tree level by level.
pub struct LevelOrder<'a> {
    tree: &'a SplayTree,
}

impl SplayTree {
    pub fn level_order(&self) -> LevelOrder<'_> {
        LevelOrder { tree: self }
    }
}

/// Writes `_` for every slot in `from..to`.
fn placeholders(f: &mut Formatter<'_>, from: u128, to: u128) -> fmt::Result {
    for pos in from..to {
        f.write_str(if pos == 0 { "_" } else { " _" })?;
    }
    Ok(())
}

impl Display for LevelOrder<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tree = self.tree;
        if tree.root == SplayTree::EMPTY {
            return f.write_str("_");
        }
        let root = &tree.nodes[tree.root];
        write!(f, "[{} {}]", root.key, root.value)?;

        // Occupied slots of the current level, left to right. Slot numbers fit
        // in u128: reaching depth 128 would mean writing 2^127 slots first.
        let mut level: Vec<(u128, Idx)> = vec![];
        let mut next: Vec<(u128, Idx)> = vec![];
        let push_children = |next: &mut Vec<(u128, Idx)>, pos: u128, u: Idx| {
            for side in [Side::Left, Side::Right] {
                let c = tree.nodes[u].child[side as usize];
                if c != SplayTree::EMPTY {
                    next.push((2 * pos + side as u128, c));
                }
            }
        };
        push_children(&mut level, 0, tree.root);
        let mut width: u128 = 2;
        while !level.is_empty() {
            writeln!(f)?;
            let mut cursor = 0;
            for &(pos, u) in &level {
                placeholders(f, cursor, pos)?;
                if pos > 0 {
                    f.write_str(" ")?;
                }
                let n = &tree.nodes[u];
                write!(f, "[{} {} {}]", n.key, n.value, tree.nodes[n.parent].key)?;
                cursor = pos + 1;
                push_children(&mut next, pos, u);
            }
            placeholders(f, cursor, width)?;
            std::mem::swap(&mut level, &mut next);
            next.clear();
            width *= 2;
        }
        Ok(())
    }
}
