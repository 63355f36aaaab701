//! (2,3)-tree sibling-list operations (spec component D).
//!
//! A `List` node's children are always at the same [`AstNode::list_height`];
//! every interior node carries 2 or 3 children, and the tree stays perfectly
//! balanced (all leaves at the same depth) across appends, prepends and
//! merges. The core move is `concat_helper`, which descends along the spine
//! of whichever side is taller until the two heights meet, then carries any
//! resulting overflow back up — the same split-on-overflow shape as a
//! textbook 2-3 tree insert, generalized to join two trees instead of a
//! tree and a single leaf.

use std::rc::Rc;

use super::{empty_list, make_list, AstNode};

/// Appends `item` as the new last leaf of `root`.
pub fn list_append(root: Rc<AstNode>, item: Rc<AstNode>) -> Rc<AstNode> {
    concat(root, item)
}

/// Prepends `item` as the new first leaf of `root`.
pub fn list_prepend(root: Rc<AstNode>, item: Rc<AstNode>) -> Rc<AstNode> {
    concat(item, root)
}

/// Joins two trees (of possibly different `list_height`) into one balanced
/// tree containing every leaf of `a` followed by every leaf of `b`.
pub fn concat(a: Rc<AstNode>, b: Rc<AstNode>) -> Rc<AstNode> {
    if a.is_empty_list() {
        return b;
    }
    if b.is_empty_list() {
        return a;
    }
    match concat_helper(a, b) {
        Ok(n) => n,
        Err((x, y)) => make_list(vec![x, y]),
    }
}

/// Combines an arbitrary number of trees (each independently balanced, of
/// arbitrary and possibly differing heights) into a single balanced tree,
/// in order. Empty input collapses to the canonical empty list; a
/// single-element input is returned unwrapped, matching how a lone
/// top-level pair is the parse root rather than a one-item `List`.
pub fn merge23_trees(items: Vec<Rc<AstNode>>) -> Rc<AstNode> {
    if items.is_empty() {
        return empty_list();
    }
    merge_slice(&items)
}

fn merge_slice(items: &[Rc<AstNode>]) -> Rc<AstNode> {
    if items.len() == 1 {
        return items[0].clone();
    }
    let mid = items.len() / 2;
    let left = merge_slice(&items[..mid]);
    let right = merge_slice(&items[mid..]);
    concat(left, right)
}

/// Joins two non-empty trees. `Ok` when the result fits in one node at the
/// height where `a` and `b` meet; `Err` carries a same-height pair the
/// caller must wrap in a new 2-item `List` (or fold into its own parent, if
/// it's itself recursing).
fn concat_helper(
    a: Rc<AstNode>,
    b: Rc<AstNode>,
) -> Result<Rc<AstNode>, (Rc<AstNode>, Rc<AstNode>)> {
    let ha = a.list_height();
    let hb = b.list_height();

    if ha == hb {
        return Err((a, b));
    }

    if ha > hb {
        let list = a.as_list().expect("list_height > 0 implies List");
        let mut items = list.items.clone();
        let last = items.pop().expect("List always has at least 2 children");
        match concat_helper(last, b) {
            Ok(merged) => {
                items.push(merged);
                Ok(make_list(items))
            }
            Err((x, y)) => {
                items.push(x);
                if items.len() < 3 {
                    items.push(y);
                    Ok(make_list(items))
                } else {
                    let carried = items.pop().expect("just pushed");
                    let left = make_list(items);
                    Err((left, make_list(vec![carried, y])))
                }
            }
        }
    } else {
        let list = b.as_list().expect("list_height > 0 implies List");
        let mut items = list.items.clone();
        let first = items.remove(0);
        match concat_helper(a, first) {
            Ok(merged) => {
                items.insert(0, merged);
                Ok(make_list(items))
            }
            Err((x, y)) => {
                items.insert(0, y);
                if items.len() < 3 {
                    items.insert(0, x);
                    Ok(make_list(items))
                } else {
                    let carried = items.remove(0);
                    let right = make_list(items);
                    Err((make_list(vec![x, carried]), right))
                }
            }
        }
    }
}
