use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use crate::raw::{Handle, RawTree};

/// A breadth-first iterator over the keys of a [`Tree`](super::Tree).
///
/// This `struct` is created by the [`level_order`] method on [`Tree`](super::Tree)
/// and on [`NodeRef`](super::NodeRef). See its documentation for more.
///
/// # Examples
///
/// ```
/// use rebal_tree::Tree;
///
/// let tree = Tree::from([5, 3, 8, 1, 4, 7, 9]);
/// let keys: Vec<_> = tree.level_order().copied().collect();
/// assert_eq!(keys, [5, 3, 8, 1, 4, 7, 9]);
/// ```
///
/// [`level_order`]: super::Tree::level_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct LevelOrder<'a, K: 'a> {
    tree: &'a RawTree<K>,
    queue: VecDeque<Handle>,
}

/// A left-node-right iterator over the keys of a [`Tree`](super::Tree), in ascending order.
///
/// This `struct` is created by the [`in_order`] and [`iter`] methods on
/// [`Tree`](super::Tree), and by [`NodeRef::in_order`](super::NodeRef::in_order).
///
/// # Examples
///
/// ```
/// use rebal_tree::Tree;
///
/// let tree = Tree::from([3, 1, 2]);
/// let mut iter = tree.in_order();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), Some(&3));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`in_order`]: super::Tree::in_order
/// [`iter`]: super::Tree::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct InOrder<'a, K: 'a> {
    tree: &'a RawTree<K>,
    // Nodes whose left subtree is being (or has been) visited, innermost last.
    stack: Vec<Handle>,
}

/// A node-left-right iterator over the keys of a [`Tree`](super::Tree).
///
/// This `struct` is created by the [`pre_order`] method on [`Tree`](super::Tree).
///
/// # Examples
///
/// ```
/// use rebal_tree::Tree;
///
/// let tree = Tree::from([1, 2, 3]);
/// let keys: Vec<_> = tree.pre_order().copied().collect();
/// assert_eq!(keys, [2, 1, 3]);
/// ```
///
/// [`pre_order`]: super::Tree::pre_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PreOrder<'a, K: 'a> {
    tree: &'a RawTree<K>,
    stack: Vec<Handle>,
}

/// A left-right-node iterator over the keys of a [`Tree`](super::Tree).
///
/// This `struct` is created by the [`post_order`] method on [`Tree`](super::Tree).
///
/// # Examples
///
/// ```
/// use rebal_tree::Tree;
///
/// let tree = Tree::from([1, 2, 3]);
/// let keys: Vec<_> = tree.post_order().copied().collect();
/// assert_eq!(keys, [1, 3, 2]);
/// ```
///
/// [`post_order`]: super::Tree::post_order
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PostOrder<'a, K: 'a> {
    tree: &'a RawTree<K>,
    // `true` once the node's children have been scheduled.
    stack: Vec<(Handle, bool)>,
}

impl<'a, K> LevelOrder<'a, K> {
    pub(crate) fn new(tree: &'a RawTree<K>, start: Option<Handle>) -> Self {
        Self {
            tree,
            queue: start.into_iter().collect(),
        }
    }
}

impl<'a, K> InOrder<'a, K> {
    pub(crate) fn new(tree: &'a RawTree<K>, start: Option<Handle>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
        };
        iter.push_left_spine(start);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.tree.node(handle).left();
        }
    }
}

impl<'a, K> PreOrder<'a, K> {
    pub(crate) fn new(tree: &'a RawTree<K>, start: Option<Handle>) -> Self {
        Self {
            tree,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a, K> PostOrder<'a, K> {
    pub(crate) fn new(tree: &'a RawTree<K>, start: Option<Handle>) -> Self {
        Self {
            tree,
            stack: start.into_iter().map(|handle| (handle, false)).collect(),
        }
    }
}

impl<'a, K> Iterator for LevelOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let handle = self.queue.pop_front()?;
        let node = self.tree.node(handle);
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), Some(self.tree.len()))
    }
}

impl<'a, K> Iterator for InOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let handle = self.stack.pop()?;
        let node = self.tree.node(handle);
        self.push_left_spine(node.right());
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), Some(self.tree.len()))
    }
}

impl<'a, K> Iterator for PreOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let handle = self.stack.pop()?;
        let node = self.tree.node(handle);
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), Some(self.tree.len()))
    }
}

impl<'a, K> Iterator for PostOrder<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        loop {
            let (handle, expanded) = self.stack.pop()?;
            let node = self.tree.node(handle);
            if expanded {
                return Some(node.value());
            }
            self.stack.push((handle, true));
            self.stack.extend(node.right().map(|right| (right, false)));
            self.stack.extend(node.left().map(|left| (left, false)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), Some(self.tree.len()))
    }
}

impl<K> FusedIterator for LevelOrder<'_, K> {}
impl<K> FusedIterator for InOrder<'_, K> {}
impl<K> FusedIterator for PreOrder<'_, K> {}
impl<K> FusedIterator for PostOrder<'_, K> {}

impl<K> Clone for LevelOrder<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            queue: self.queue.clone(),
        }
    }
}

impl<K> Clone for InOrder<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
        }
    }
}

impl<K> Clone for PreOrder<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
        }
    }
}

impl<K> Clone for PostOrder<'_, K> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for LevelOrder<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K: fmt::Debug> fmt::Debug for InOrder<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K: fmt::Debug> fmt::Debug for PreOrder<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K: fmt::Debug> fmt::Debug for PostOrder<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
