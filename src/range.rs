//! Collects bracket leaf ranges for a viewport (spec component H).

use std::rc::Rc;

use crate::ast::AstNode;
use crate::length::Length;
use crate::token::Category;

/// One bracket leaf (an opening or closing token, never a matched pair's
/// full span) whose range intersects the query window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BracketInRange {
    pub start: Length,
    pub end: Length,
    pub category: Category,
    /// Number of enclosing `Pair`s. Both brackets of a pair share the
    /// depth of the pair itself — depth only increases for brackets found
    /// inside the pair's *content*.
    pub depth: u32,
}

/// Walks `root` and reports every `Bracket` leaf — the opening and closing
/// tokens of each closed `Pair` — whose span intersects
/// `[range_start, range_end)`, in document order. `InvalidBracket` leaves
/// and unclosed pairs' lone opening bracket are not emitted, matching the
/// reference collector.
pub fn collect_brackets(
    root: &Rc<AstNode>,
    range_start: Length,
    range_end: Length,
) -> Vec<BracketInRange> {
    let mut out = Vec::new();
    walk(root, Length::ZERO, 0, range_start, range_end, &mut out);
    out
}

fn emit_if_in_range(
    start: Length,
    end: Length,
    category: Category,
    depth: u32,
    range_start: Length,
    range_end: Length,
    out: &mut Vec<BracketInRange>,
) {
    if end > range_start && start < range_end {
        out.push(BracketInRange {
            start,
            end,
            category,
            depth,
        });
    }
}

fn walk(
    node: &Rc<AstNode>,
    node_start: Length,
    depth: u32,
    range_start: Length,
    range_end: Length,
    out: &mut Vec<BracketInRange>,
) {
    let node_end = node_start.add(node.length());
    if node_end <= range_start || node_start >= range_end {
        return;
    }

    match &**node {
        AstNode::List(list) => {
            let mut child_start = node_start;
            for child in &list.items {
                walk(child, child_start, depth, range_start, range_end, out);
                child_start = child_start.add(child.length());
            }
        }
        AstNode::Bracket(b) => {
            emit_if_in_range(
                node_start,
                node_end,
                b.category,
                depth,
                range_start,
                range_end,
                out,
            );
        }
        AstNode::Pair(pair) => {
            if pair.closing.is_some() {
                let opening_end = node_start.add(pair.opening.length);
                emit_if_in_range(
                    node_start,
                    opening_end,
                    pair.category,
                    depth,
                    range_start,
                    range_end,
                    out,
                );

                if let Some(child) = &pair.child {
                    walk(child, opening_end, depth + 1, range_start, range_end, out);
                }

                let child_len = pair.child.as_ref().map_or(Length::ZERO, |c| c.length());
                let closing_start = opening_end.add(child_len);
                let pair_end = node_start.add(pair.length);
                emit_if_in_range(
                    closing_start,
                    pair_end,
                    pair.category,
                    depth,
                    range_start,
                    range_end,
                    out,
                );
            } else if let Some(child) = &pair.child {
                // Unclosed pair: its lone opening bracket is never reported
                // (the reference collector only emits brackets belonging
                // to a closed pair), but its content is still traversed.
                let opening_end = node_start.add(pair.opening.length);
                walk(child, opening_end, depth + 1, range_start, range_end, out);
            }
        }
        AstNode::Text(_) | AstNode::InvalidBracket(_) => {}
    }
}
