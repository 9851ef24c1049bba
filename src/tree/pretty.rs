use alloc::string::String;
use alloc::vec;
use core::fmt;

use crate::raw::{Handle, RawTree};

/// Renders a [`Tree`](super::Tree) as indented branch art, one key per line.
///
/// The right subtree is drawn above its parent and the left subtree below,
/// so the picture reads as the tree rotated a quarter turn counter-clockwise.
/// This is a debugging aid; the exact layout is not part of the tree's contract.
///
/// This `struct` is created by the [`pretty`](super::Tree::pretty) method on
/// [`Tree`](super::Tree).
///
/// # Examples
///
/// ```
/// use rebal_tree::Tree;
///
/// let tree = Tree::from([1, 2, 3]);
/// let expected = "\
/// │   ┌── 3
/// └── 2
///     └── 1
/// ";
/// assert_eq!(tree.pretty().to_string(), expected);
/// ```
pub struct Pretty<'a, K> {
    tree: &'a RawTree<K>,
}

enum Frame {
    Subtree { node: Handle, prefix: String, is_left: bool },
    Line { node: Handle, prefix: String, is_left: bool },
}

impl<'a, K> Pretty<'a, K> {
    pub(crate) fn new(tree: &'a RawTree<K>) -> Self {
        Self { tree }
    }
}

impl<K: fmt::Display> fmt::Display for Pretty<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.tree.root() else {
            return Ok(());
        };

        let mut stack = vec![Frame::Subtree {
            node: root,
            prefix: String::new(),
            is_left: true,
        }];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Subtree { node, prefix, is_left } => {
                    let current = self.tree.node(node);
                    // Pushed in reverse: right subtree, this line, left subtree.
                    if let Some(left) = current.left() {
                        let guide = if is_left { "    " } else { "│   " };
                        stack.push(Frame::Subtree {
                            node: left,
                            prefix: prefix.clone() + guide,
                            is_left: true,
                        });
                    }
                    if let Some(right) = current.right() {
                        let guide = if is_left { "│   " } else { "    " };
                        stack.push(Frame::Line {
                            node,
                            prefix: prefix.clone(),
                            is_left,
                        });
                        stack.push(Frame::Subtree {
                            node: right,
                            prefix: prefix + guide,
                            is_left: false,
                        });
                    } else {
                        stack.push(Frame::Line { node, prefix, is_left });
                    }
                }
                Frame::Line { node, prefix, is_left } => {
                    let connector = if is_left { "└── " } else { "┌── " };
                    writeln!(f, "{prefix}{connector}{}", self.tree.node(node).value())?;
                }
            }
        }

        Ok(())
    }
}

impl<K> fmt::Debug for Pretty<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pretty").field("len", &self.tree.len()).finish_non_exhaustive()
    }
}
