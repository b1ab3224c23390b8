//! Breadth-first pretty printer for token trees.
//!
//! Each paired bracket group becomes a block. A block with children is
//! printed as a link of the form `open<index>close` (e.g. `{12}`) where
//! the index is the position of its first child token; the block's own
//! line is emitted later in breadth-first order. Empty groups are
//! printed inline as `openclose` (e.g. `()`). Leaf tokens are rewritten
//! onto one line with the usual snippet escaping.

use std::collections::VecDeque;
use std::io::Write;

use cctt_util::{format_to_oneline, Idx, Result};

use crate::tree::TokenTree;

struct Block {
    first: usize,
    last: usize,
    link: String,
}

/// Print the whole tree to `out`, starting with the synthetic root
/// block `*0*`.
pub fn pretty_print<W: Write>(tree: &TokenTree<'_>, out: &mut W) -> Result<()> {
    let mut blocks = VecDeque::new();
    blocks.push_back(Block {
        first: 0,
        last: tree.end_index(),
        link: "*0*".to_string(),
    });

    while let Some(block) = blocks.pop_front() {
        write!(out, "{}:", block.link)?;

        let mut index = block.first;
        while index < block.last {
            let token = &tree.tokens()[index];
            match token.pair {
                None => write!(out, " {}", format_to_oneline(tree.text_at(index)))?,
                Some(pair) => {
                    let open = tree.text_at(index);
                    let close = tree.text_at(pair.index());
                    let first_child = index + 1;
                    if first_child == pair.index() {
                        write!(out, " {open}{close}")?;
                    } else {
                        let link = format!("{open}{first_child}{close}");
                        write!(out, " {link}")?;
                        blocks.push_back(Block {
                            first: first_child,
                            last: pair.index(),
                            link,
                        });
                    }
                }
            }
            index = tree.next_of(index);
        }

        writeln!(out)?;
    }

    Ok(())
}
