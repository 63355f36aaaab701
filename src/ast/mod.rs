//! The AST node model (spec component C) and the small-set helper the
//! parser uses to track expected closing-bracket categories.
//!
//! Nodes are value-owned and shared through [`Rc`] rather than mutated in
//! place: a subtree reused from the previous parse is re-parented into the
//! new root verbatim, and sharing an `Rc` is how that's made cheap. This
//! matches the single-threaded concurrency model in spec.md §5 — there is
//! no need for `Arc`, atomics, or interior mutability anywhere in the tree.

mod list;

pub use list::{concat, list_append, list_prepend, merge23_trees};

use std::rc::Rc;

use crate::length::Length;
use crate::token::Category;

/// A small, linear-scan set of bracket categories. Bracket families are a
/// handful of small integers in practice (`[]`, `()`, `{}`, ...), so a
/// `SmallVec` beats a `HashSet` the way the teacher crate's own
/// `missing_opening_bracket_ids: SmallVec<[usize; 4]>` does for the same
/// kind of small bracket-id collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpectedClosers(smallvec::SmallVec<[Category; 4]>);

impl ExpectedClosers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains(&category)
    }

    /// Inserts `category` if not already present. Returns whether it was
    /// newly inserted.
    pub fn insert(&mut self, category: Category) -> bool {
        if self.contains(category) {
            false
        } else {
            self.0.push(category);
            true
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextNode {
    pub length: Length,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BracketNode {
    pub length: Length,
    pub category: Category,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidBracketNode {
    pub length: Length,
    pub category: Category,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PairNode {
    pub length: Length,
    pub category: Category,
    pub opening: BracketNode,
    pub child: Option<Rc<AstNode>>,
    pub closing: Option<BracketNode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListNode {
    pub length: Length,
    pub list_height: u32,
    pub items: Vec<Rc<AstNode>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AstNode {
    Text(TextNode),
    Bracket(BracketNode),
    InvalidBracket(InvalidBracketNode),
    Pair(PairNode),
    List(ListNode),
}

impl AstNode {
    pub fn length(&self) -> Length {
        match self {
            AstNode::Text(n) => n.length,
            AstNode::Bracket(n) => n.length,
            AstNode::InvalidBracket(n) => n.length,
            AstNode::Pair(n) => n.length,
            AstNode::List(n) => n.length,
        }
    }

    /// 0 for leaves and `Pair`; for a `List`, `items[0].list_height() + 1`.
    pub fn list_height(&self) -> u32 {
        match self {
            AstNode::List(n) => n.list_height,
            _ => 0,
        }
    }

    pub fn as_list(&self) -> Option<&ListNode> {
        match self {
            AstNode::List(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_empty_list(&self) -> bool {
        matches!(self, AstNode::List(n) if n.items.is_empty())
    }
}

/// The canonical empty root: a height-0 `List` with no items.
pub fn empty_list() -> Rc<AstNode> {
    Rc::new(AstNode::List(ListNode {
        length: Length::ZERO,
        list_height: 0,
        items: Vec::new(),
    }))
}

pub(crate) fn make_list(items: Vec<Rc<AstNode>>) -> Rc<AstNode> {
    debug_assert!(!items.is_empty());
    let height = items[0].list_height() + 1;
    debug_assert!(
        items.iter().all(|i| i.list_height() + 1 == height),
        "List items must share the same list_height"
    );
    let length = items
        .iter()
        .fold(Length::ZERO, |acc, item| acc.add(item.length()));
    Rc::new(AstNode::List(ListNode {
        length,
        list_height: height,
        items,
    }))
}

/// `canBeReused`: recurse into the rightmost non-`List` descendant and
/// return its reuse decision. `expected_closers` is accepted for contract
/// compatibility with a possible future refinement (spec.md §9's Open
/// Question) but unused, per the spec's explicit instruction to pass the
/// empty set until that refinement is specified.
pub fn can_be_reused(node: &Rc<AstNode>, _expected_closers: &ExpectedClosers) -> bool {
    match rightmost_non_list_descendant(node) {
        None => true, // empty list: reusable but uninteresting
        Some(leaf) => match &*leaf {
            AstNode::Text(_) => true,
            AstNode::Bracket(_) | AstNode::InvalidBracket(_) => false,
            AstNode::Pair(p) => p.closing.is_some(),
            AstNode::List(_) => unreachable!("rightmost_non_list_descendant never returns a List"),
        },
    }
}

fn rightmost_non_list_descendant(node: &Rc<AstNode>) -> Option<Rc<AstNode>> {
    let mut current = node.clone();
    loop {
        match &*current {
            AstNode::List(l) => match l.items.last() {
                Some(last) => {
                    let next = last.clone();
                    current = next;
                }
                None => return None,
            },
            _ => return Some(current),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(len: u32) -> Rc<AstNode> {
        Rc::new(AstNode::Text(TextNode {
            length: Length::new(0, len),
        }))
    }

    #[test]
    fn text_is_always_reusable() {
        assert!(can_be_reused(&text(3), &ExpectedClosers::new()));
    }

    #[test]
    fn bracket_is_never_reusable_alone() {
        let b = Rc::new(AstNode::Bracket(BracketNode {
            length: Length::new(0, 1),
            category: 2,
        }));
        assert!(!can_be_reused(&b, &ExpectedClosers::new()));
    }

    #[test]
    fn pair_reusable_iff_closed() {
        let open = BracketNode {
            length: Length::new(0, 1),
            category: 2,
        };
        let closed = Rc::new(AstNode::Pair(PairNode {
            length: Length::new(0, 2),
            category: 2,
            opening: open,
            child: None,
            closing: Some(open),
        }));
        assert!(can_be_reused(&closed, &ExpectedClosers::new()));

        let unclosed = Rc::new(AstNode::Pair(PairNode {
            length: Length::new(0, 1),
            category: 2,
            opening: open,
            child: None,
            closing: None,
        }));
        assert!(!can_be_reused(&unclosed, &ExpectedClosers::new()));
    }

    #[test]
    fn list_defers_to_rightmost_descendant() {
        let l = make_list(vec![text(1), text(2)]);
        assert!(can_be_reused(&l, &ExpectedClosers::new()));

        let open = BracketNode {
            length: Length::new(0, 1),
            category: 1,
        };
        let unclosed = Rc::new(AstNode::Pair(PairNode {
            length: Length::new(0, 1),
            category: 1,
            opening: open,
            child: None,
            closing: None,
        }));
        let l2 = make_list(vec![text(1), unclosed]);
        assert!(!can_be_reused(&l2, &ExpectedClosers::new()));
    }

    #[test]
    fn empty_list_is_reusable() {
        assert!(can_be_reused(&empty_list(), &ExpectedClosers::new()));
    }
}
