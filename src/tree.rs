use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use crate::error::{Result, TreeError};
use crate::raw::{Handle, RawTree};

mod pretty;
mod traversal;

pub use pretty::Pretty;
pub use traversal::{InOrder, LevelOrder, PostOrder, PreOrder};

/// A binary search tree over unique, totally ordered keys.
///
/// Building a tree from a collection (with [`Tree::from_keys`], [`From`] or
/// [`FromIterator`]) discards duplicates and produces a height-balanced tree.
/// [`insert`](Tree::insert) and [`delete`](Tree::delete) do not rebalance, so
/// a tree grown by insertion alone can become arbitrarily skewed;
/// [`rebalance`](Tree::rebalance) rebuilds it from its current keys.
///
/// Nodes are stored in an internal arena and addressed by index, and every
/// traversal runs on an explicit stack or queue, so even a fully degenerate
/// tree is walked without deep recursion.
///
/// A `Tree` is a plain owned value. Sharing one between threads for mutation
/// requires external synchronisation such as a `Mutex`.
///
/// # Examples
///
/// ```
/// use rebal_tree::Tree;
///
/// let mut tree = Tree::from([5, 3, 8, 1, 4, 7, 9]);
/// assert!(tree.is_balanced());
///
/// // Insertion never rebalances.
/// for key in 10..15 {
///     tree.insert(key);
/// }
/// assert!(!tree.is_balanced());
///
/// tree.rebalance();
/// assert!(tree.is_balanced());
/// assert_eq!(tree.len(), 12);
///
/// let keys: Vec<_> = tree.in_order().copied().collect();
/// assert_eq!(keys, [1, 3, 4, 5, 7, 8, 9, 10, 11, 12, 13, 14]);
/// ```
pub struct Tree<K> {
    raw: RawTree<K>,
}

/// A borrowed view of one node in a [`Tree`].
///
/// Returned by [`Tree::root`] and [`Tree::find`]. The view can walk to its
/// children and answer structural questions about the subtree it roots.
///
/// # Examples
///
/// ```
/// use rebal_tree::Tree;
///
/// let tree = Tree::from([1, 2, 3]);
/// let root = tree.root().unwrap();
/// assert_eq!(*root.value(), 2);
/// assert_eq!(root.left().map(|node| *node.value()), Some(1));
/// assert!(root.right().unwrap().is_leaf());
/// ```
pub struct NodeRef<'a, K> {
    tree: &'a RawTree<K>,
    handle: Handle,
}

/// Outcome of [`Tree::rebalance`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Rebalance {
    /// The tree was already balanced and was left untouched.
    AlreadyBalanced,
    /// The tree was rebuilt from its keys.
    Rebuilt {
        /// Number of keys in the rebuilt tree.
        len: usize,
    },
}

impl<K> Tree<K> {
    /// Makes a new, empty `Tree`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::Tree;
    ///
    /// let tree: Tree<i32> = Tree::new();
    /// assert!(tree.is_empty());
    /// assert!(tree.root().is_none());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Tree { raw: RawTree::new() }
    }

    /// Returns the number of keys in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the root node, or `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.node_ref(self.raw.root())
    }

    /// Returns the smallest key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::Tree;
    ///
    /// let tree = Tree::from([4, 9, 2]);
    /// assert_eq!(tree.first(), Some(&2));
    /// assert_eq!(Tree::<i32>::new().first(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        let root = self.raw.root()?;
        Some(self.raw.node(self.raw.leftmost(root)).value())
    }

    /// Returns the largest key.
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        let root = self.raw.root()?;
        Some(self.raw.node(self.raw.rightmost(root)).value())
    }

    /// Returns the canonical height of the tree: zero when empty, otherwise
    /// the number of nodes on the longest root-to-leaf path.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.tree_height(), 0);
    /// for key in 1..=4 {
    ///     tree.insert(key);
    /// }
    /// assert_eq!(tree.tree_height(), 4);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn tree_height(&self) -> usize {
        self.raw.subtree_height(self.raw.root())
    }

    /// Returns `true` if, at every node, the heights of the left and right
    /// subtrees differ by at most one. An empty tree is balanced.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.raw.is_subtree_balanced(self.raw.root())
    }

    /// Gets an iterator over the keys in ascending order.
    ///
    /// Same as [`in_order`](Tree::in_order).
    pub fn iter(&self) -> InOrder<'_, K> {
        self.in_order()
    }

    /// Gets an iterator visiting keys breadth-first: the root, then every key
    /// at depth one from left to right, and so on.
    ///
    /// An empty tree yields nothing.
    pub fn level_order(&self) -> LevelOrder<'_, K> {
        LevelOrder::new(&self.raw, self.raw.root())
    }

    /// Gets an iterator visiting keys left subtree first, then the node, then
    /// the right subtree. This is ascending key order.
    pub fn in_order(&self) -> InOrder<'_, K> {
        InOrder::new(&self.raw, self.raw.root())
    }

    /// Gets an iterator visiting each node before its left and right subtrees.
    pub fn pre_order(&self) -> PreOrder<'_, K> {
        PreOrder::new(&self.raw, self.raw.root())
    }

    /// Gets an iterator visiting each node after its left and right subtrees.
    pub fn post_order(&self) -> PostOrder<'_, K> {
        PostOrder::new(&self.raw, self.raw.root())
    }

    /// Returns a [`Display`](fmt::Display) adapter that draws the tree as
    /// branch art. Intended for debugging.
    #[must_use]
    pub fn pretty(&self) -> Pretty<'_, K> {
        Pretty::new(&self.raw)
    }

    fn node_ref(&self, handle: Option<Handle>) -> Option<NodeRef<'_, K>> {
        handle.map(|handle| NodeRef { tree: &self.raw, handle })
    }
}

impl<K: Ord> Tree<K> {
    /// Builds a balanced tree from `keys`, discarding duplicates.
    ///
    /// The keys are sorted, then the lower-middle key of each run becomes the
    /// root of the subtree built from that run.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::Tree;
    ///
    /// let tree = Tree::from_keys(vec![4, 2, 4, 1, 3]);
    /// assert_eq!(tree.len(), 4);
    /// assert_eq!(tree.root().map(|node| *node.value()), Some(2));
    /// assert!(tree.is_balanced());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n)
    #[must_use]
    pub fn from_keys<I: IntoIterator<Item = K>>(keys: I) -> Self {
        Tree {
            raw: RawTree::from_keys(keys.into_iter().collect()),
        }
    }

    /// Adds `value` as a new leaf.
    ///
    /// Returns `false`, leaving the tree unchanged, if an equal key is
    /// already present. The tree is not rebalanced.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert!(tree.insert(6));
    /// assert!(!tree.insert(6));
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    pub fn insert(&mut self, value: K) -> bool {
        self.raw.insert(value)
    }

    /// Removes `value` from the tree. Returns `false` if it was not present.
    ///
    /// A node with two children takes the key of its in-order successor
    /// (the smallest key of its right subtree), and the successor's node is
    /// removed instead. The tree is not rebalanced.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::Tree;
    ///
    /// let mut tree = Tree::from([5, 3, 8, 1, 4, 7, 9]);
    /// assert!(tree.delete(&5));
    /// assert_eq!(tree.root().map(|node| *node.value()), Some(7));
    /// assert!(!tree.delete(&5));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    pub fn delete<Q>(&mut self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value)
    }

    /// Returns the node holding `value`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::Tree;
    ///
    /// let tree = Tree::from([1, 2, 3]);
    /// assert_eq!(tree.find(&3).map(|node| *node.value()), Some(3));
    /// assert!(tree.find(&4).is_none());
    /// ```
    #[must_use]
    pub fn find<Q>(&self, value: &Q) -> Option<NodeRef<'_, K>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.node_ref(self.raw.find(value))
    }

    /// Returns `true` if the tree holds `value`.
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(value).is_some()
    }

    /// Returns whether the node holding `value` has no children.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `value` is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::{Tree, TreeError};
    ///
    /// let tree = Tree::from([1, 2, 3]);
    /// assert_eq!(tree.is_leaf(&1), Ok(true));
    /// assert_eq!(tree.is_leaf(&2), Ok(false));
    /// assert_eq!(tree.is_leaf(&7), Err(TreeError::KeyNotFound));
    /// ```
    pub fn is_leaf<Q>(&self, value: &Q) -> Result<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.is_leaf(value).ok_or(TreeError::KeyNotFound)
    }

    /// Returns the height of the node holding `value`.
    ///
    /// A leaf has height 1. A node with one child is one taller than that
    /// child. A node with two children is one taller than the **shorter** of
    /// the two, so this is the node count of the shortest path down to a leaf
    /// and can be smaller than the subtree's [`tree_height`](NodeRef::tree_height).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `value` is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::Tree;
    ///
    /// let mut tree = Tree::from([2, 1, 3]);
    /// tree.insert(4);
    /// tree.insert(5);
    ///
    /// assert_eq!(tree.height(&2), Ok(2));
    /// assert_eq!(tree.find(&2).unwrap().tree_height(), 4);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h + m), where m is the size of the subtree rooted at `value`.
    pub fn height<Q>(&self, value: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.min_height(value).ok_or(TreeError::KeyNotFound)
    }

    /// Returns the number of edges between the root and the node holding `value`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::KeyNotFound`] if `value` is not in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::{Tree, TreeError};
    ///
    /// let tree = Tree::from([1, 2, 3]);
    /// assert_eq!(tree.depth(&2), Ok(0));
    /// assert_eq!(tree.depth(&3), Ok(1));
    /// assert_eq!(tree.depth(&4), Err(TreeError::KeyNotFound));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(h), where h is the height of the tree.
    pub fn depth<Q>(&self, value: &Q) -> Result<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.depth(value).ok_or(TreeError::KeyNotFound)
    }

    /// Rebuilds the tree into a minimal-height shape if it is not balanced.
    ///
    /// The current keys are collected, sorted and rebuilt exactly as
    /// [`from_keys`](Tree::from_keys) would. A tree that is already balanced
    /// (including an empty one) is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use rebal_tree::{Rebalance, Tree};
    ///
    /// let mut tree = Tree::new();
    /// for key in 1..=5 {
    ///     tree.insert(key);
    /// }
    /// assert_eq!(tree.rebalance(), Rebalance::Rebuilt { len: 5 });
    /// assert_eq!(tree.rebalance(), Rebalance::AlreadyBalanced);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n)
    pub fn rebalance(&mut self) -> Rebalance {
        if self.raw.rebalance() {
            Rebalance::Rebuilt { len: self.raw.len() }
        } else {
            Rebalance::AlreadyBalanced
        }
    }
}

impl<'a, K> NodeRef<'a, K> {
    /// Returns the key held by this node.
    #[must_use]
    pub fn value(&self) -> &'a K {
        self.tree.node(self.handle).value()
    }

    /// Returns the left child.
    #[must_use]
    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.child(self.tree.node(self.handle).left())
    }

    /// Returns the right child.
    #[must_use]
    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.child(self.tree.node(self.handle).right())
    }

    /// Returns `true` if this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.tree.node(self.handle).is_leaf()
    }

    /// Returns the canonical height of the subtree rooted here: the number
    /// of nodes on its longest downward path.
    #[must_use]
    pub fn tree_height(&self) -> usize {
        self.tree.subtree_height(Some(self.handle))
    }

    /// Returns `true` if the subtree rooted here is balanced.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.tree.is_subtree_balanced(Some(self.handle))
    }

    /// Gets a breadth-first iterator over the subtree rooted here.
    pub fn level_order(&self) -> LevelOrder<'a, K> {
        LevelOrder::new(self.tree, Some(self.handle))
    }

    /// Gets an ascending iterator over the subtree rooted here.
    pub fn in_order(&self) -> InOrder<'a, K> {
        InOrder::new(self.tree, Some(self.handle))
    }

    /// Gets a node-left-right iterator over the subtree rooted here.
    pub fn pre_order(&self) -> PreOrder<'a, K> {
        PreOrder::new(self.tree, Some(self.handle))
    }

    /// Gets a left-right-node iterator over the subtree rooted here.
    pub fn post_order(&self) -> PostOrder<'a, K> {
        PostOrder::new(self.tree, Some(self.handle))
    }

    fn child(&self, handle: Option<Handle>) -> Option<NodeRef<'a, K>> {
        handle.map(|handle| NodeRef { tree: self.tree, handle })
    }
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.value())
            .field("left", &self.left().map(|node| node.value()))
            .field("right", &self.right().map(|node| node.value()))
            .finish()
    }
}

impl<K: Clone> Clone for Tree<K> {
    fn clone(&self) -> Self {
        Tree { raw: self.raw.clone() }
    }
}

impl<K: fmt::Debug> fmt::Debug for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Tree::new()
    }
}

/// Two trees are equal when they hold the same keys, whatever their shape.
impl<K: PartialEq> PartialEq for Tree<K> {
    fn eq(&self, other: &Tree<K>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq> Eq for Tree<K> {}

impl<K: Ord> FromIterator<K> for Tree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Tree::from_keys(iter)
    }
}

impl<K: Ord, const N: usize> From<[K; N]> for Tree<K> {
    fn from(keys: [K; N]) -> Self {
        Tree::from_keys(keys)
    }
}

impl<K: Ord> From<Vec<K>> for Tree<K> {
    fn from(keys: Vec<K>) -> Self {
        Tree {
            raw: RawTree::from_keys(keys),
        }
    }
}

/// Inserts each key in turn, without rebalancing.
impl<K: Ord> Extend<K> for Tree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = InOrder<'a, K>;

    fn into_iter(self) -> InOrder<'a, K> {
        self.iter()
    }
}
