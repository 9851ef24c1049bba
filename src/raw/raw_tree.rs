use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering::{Equal, Greater, Less};

use tracing::{debug, trace};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};

/// The binary search tree engine backing `Tree`.
///
/// Every node lives in `nodes` and is linked from exactly one place: either
/// `root` or a child slot of its parent. Descents are loops and whole-tree
/// walks use explicit stacks, so a fully skewed tree cannot exhaust the call
/// stack. The one recursive routine, [`RawTree::build`], only ever recurses
/// as deep as the balanced tree it produces.
#[derive(Clone)]
pub(crate) struct RawTree<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of keys in the tree.
    len: usize,
}

/// Work item for the post-order height fold.
enum Visit {
    Enter(Option<Handle>),
    Exit,
}

impl<K> RawTree<K> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Builds a height-balanced subtree from an ordered run of keys.
    ///
    /// The lower middle element becomes the subtree root; the elements before
    /// and after it form the left and right subtrees. Each slot is consumed
    /// exactly once.
    fn build(&mut self, keys: &mut [Option<K>]) -> Option<Handle> {
        if keys.is_empty() {
            return None;
        }

        let middle = (keys.len() - 1) / 2;
        let (lower, rest) = keys.split_at_mut(middle);
        let (pivot, upper) = rest.split_first_mut()?;
        let value = pivot.take().expect("`RawTree::build()` - key consumed twice");

        let handle = self.nodes.alloc(Node::leaf(value));
        self.len += 1;

        let left = self.build(lower);
        let right = self.build(upper);
        let node = self.nodes.get_mut(handle);
        node.set_child(Side::Left, left);
        node.set_child(Side::Right, right);
        Some(handle)
    }

    /// Empties the tree, returning its keys in breadth-first order.
    fn drain_level_order(&mut self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len);
        let mut queue: VecDeque<Handle> = self.root.take().into_iter().collect();

        while let Some(handle) = queue.pop_front() {
            let node = self.nodes.take(handle);
            queue.extend(node.left());
            queue.extend(node.right());
            keys.push(node.into_value());
        }

        self.clear();
        keys
    }

    /// Left-most node of the subtree rooted at `handle`.
    pub(crate) fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.nodes.get(handle).left() {
            handle = left;
        }
        handle
    }

    /// Right-most node of the subtree rooted at `handle`.
    pub(crate) fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.nodes.get(handle).right() {
            handle = right;
        }
        handle
    }

    /// Node count of the longest downward path from `subtree`; zero when absent.
    pub(crate) fn subtree_height(&self, subtree: Option<Handle>) -> usize {
        self.fold_heights(subtree, false).unwrap_or_default()
    }

    /// Returns true if no node under `subtree` has child heights differing by more than one.
    pub(crate) fn is_subtree_balanced(&self, subtree: Option<Handle>) -> bool {
        self.fold_heights(subtree, true).is_some()
    }

    /// Computes subtree heights bottom-up with an explicit work stack.
    ///
    /// When `require_balance` is set, returns `None` at the first node whose
    /// child heights differ by more than one.
    fn fold_heights(&self, subtree: Option<Handle>, require_balance: bool) -> Option<usize> {
        let mut work = alloc::vec![Visit::Enter(subtree)];
        let mut heights: Vec<usize> = Vec::new();

        while let Some(visit) = work.pop() {
            match visit {
                Visit::Enter(None) => heights.push(0),
                Visit::Enter(Some(handle)) => {
                    let node = self.nodes.get(handle);
                    work.push(Visit::Exit);
                    work.push(Visit::Enter(node.right()));
                    work.push(Visit::Enter(node.left()));
                }
                Visit::Exit => {
                    let right = heights.pop().unwrap_or_default();
                    let left = heights.pop().unwrap_or_default();
                    if require_balance && left.abs_diff(right) > 1 {
                        return None;
                    }
                    heights.push(1 + left.max(right));
                }
            }
        }

        heights.pop()
    }
}

impl<K: Ord> RawTree<K> {
    /// Builds a balanced tree holding the distinct values of `keys`.
    pub(crate) fn from_keys(mut keys: Vec<K>) -> Self {
        keys.sort_unstable();
        keys.dedup();

        let mut tree = Self {
            nodes: Arena::with_capacity(keys.len()),
            root: None,
            len: 0,
        };
        let mut slots: Vec<Option<K>> = keys.into_iter().map(Some).collect();
        tree.root = tree.build(&mut slots);

        debug!(len = tree.len, height = tree.subtree_height(tree.root), "built tree");
        tree
    }

    /// Returns the node holding `value`, if any.
    pub(crate) fn find<Q>(&self, value: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match value.cmp(node.value().borrow()) {
                Equal => return Some(handle),
                Less => node.left(),
                Greater => node.right(),
            };
        }
        None
    }

    /// Attaches `value` as a new leaf. Returns false, leaving the tree
    /// untouched, if an equal key is already present.
    pub(crate) fn insert(&mut self, value: K) -> bool {
        let Some(mut current) = self.root else {
            self.root = Some(self.nodes.alloc(Node::leaf(value)));
            self.len = 1;
            trace!("inserted root");
            return true;
        };

        loop {
            let node = self.nodes.get(current);
            let side = match value.cmp(node.value()) {
                Equal => {
                    trace!("insert rejected duplicate key");
                    return false;
                }
                Less => Side::Left,
                Greater => Side::Right,
            };

            match node.child(side) {
                Some(child) => current = child,
                None => {
                    let leaf = self.nodes.alloc(Node::leaf(value));
                    self.nodes.get_mut(current).set_child(side, Some(leaf));
                    self.len += 1;
                    trace!(len = self.len, "inserted leaf");
                    return true;
                }
            }
        }
    }

    /// Deletes `value` from the subtree rooted at `subtree` and returns the
    /// root of what remains, for the caller to link back in.
    ///
    /// A missing key leaves the subtree unchanged. A node with at most one
    /// child is spliced out in favour of that child. A node with two children
    /// takes over the key of its in-order successor, whose node is then
    /// spliced out of the right subtree.
    pub(crate) fn delete_from<Q>(&mut self, subtree: Option<Handle>, value: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut link: Option<(Handle, Side)> = None;
        let mut current = subtree;
        let target = loop {
            let Some(handle) = current else {
                return subtree;
            };
            let node = self.nodes.get(handle);
            let side = match value.cmp(node.value().borrow()) {
                Equal => break handle,
                Less => Side::Left,
                Greater => Side::Right,
            };
            link = Some((handle, side));
            current = node.child(side);
        };

        let children = {
            let node = self.nodes.get(target);
            (node.left(), node.right())
        };
        let replacement = match children {
            (None, child) | (child, None) => {
                drop(self.nodes.take(target));
                child
            }
            (Some(_), Some(right)) => {
                self.promote_successor(target, right);
                Some(target)
            }
        };
        self.len -= 1;

        match link {
            None => replacement,
            Some((parent, side)) => {
                self.nodes.get_mut(parent).set_child(side, replacement);
                subtree
            }
        }
    }

    /// Moves the smallest key of `right` (the right child of `target`) into
    /// `target` and frees the node that held it.
    fn promote_successor(&mut self, target: Handle, right: Handle) {
        let mut link = (target, Side::Right);
        let mut successor = right;
        while let Some(left) = self.nodes.get(successor).left() {
            link = (successor, Side::Left);
            successor = left;
        }

        // The successor has no left child, so its right subtree takes its place.
        let donor = self.nodes.take(successor);
        self.nodes.get_mut(link.0).set_child(link.1, donor.right());
        self.nodes.get_mut(target).replace_value(donor.into_value());
    }

    /// Removes `value` from the tree. Returns false if it was not present.
    pub(crate) fn remove<Q>(&mut self, value: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let before = self.len;
        self.root = self.delete_from(self.root, value);
        let removed = self.len < before;
        debug_assert_eq!(self.nodes.len(), self.len, "`RawTree::remove()` - arena out of sync");
        trace!(removed, len = self.len, "delete");
        removed
    }

    /// Returns whether the node holding `value` has no children.
    pub(crate) fn is_leaf<Q>(&self, value: &Q) -> Option<bool>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find(value).map(|handle| self.nodes.get(handle).is_leaf())
    }

    /// Height of the node holding `value`, where a leaf counts 1, a node with
    /// one child counts one more than that child, and a node with two
    /// children counts one more than the *shorter* of them.
    ///
    /// That recurrence is the node count of the shortest path down to a
    /// leaf, so a breadth-first walk stops at the first leaf it meets.
    pub(crate) fn min_height<Q>(&self, value: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let start = self.find(value)?;
        let mut queue = VecDeque::from([(start, 1)]);

        while let Some((handle, height)) = queue.pop_front() {
            let node = self.nodes.get(handle);
            if node.is_leaf() {
                return Some(height);
            }
            queue.extend(node.left().map(|child| (child, height + 1)));
            queue.extend(node.right().map(|child| (child, height + 1)));
        }

        unreachable!("`RawTree::min_height()` - subtree without a leaf")
    }

    /// Number of edges from the root down to the node holding `value`.
    pub(crate) fn depth<Q>(&self, value: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut depth = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match value.cmp(node.value().borrow()) {
                Equal => return Some(depth),
                Less => node.left(),
                Greater => node.right(),
            };
            depth += 1;
        }
        None
    }

    /// Rebuilds the tree from its own keys unless it is already balanced.
    /// Returns true if a rebuild happened.
    pub(crate) fn rebalance(&mut self) -> bool {
        if self.is_subtree_balanced(self.root) {
            debug!(len = self.len, "tree already balanced");
            return false;
        }

        debug!(len = self.len, height = self.subtree_height(self.root), "rebuilding unbalanced tree");
        let keys = self.drain_level_order();
        *self = Self::from_keys(keys);
        true
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use proptest::prelude::*;

    impl<K: Ord + Clone> RawTree<K> {
        /// Keys in left-node-right order.
        fn sorted_keys(&self) -> Vec<K> {
            let mut keys = Vec::with_capacity(self.len);
            let mut stack = Vec::new();
            let mut current = self.root;
            loop {
                while let Some(handle) = current {
                    stack.push(handle);
                    current = self.node(handle).left();
                }
                let Some(handle) = stack.pop() else { break };
                keys.push(self.node(handle).value().clone());
                current = self.node(handle).right();
            }
            keys
        }

        /// Checks ordering bounds at every node and that the node count agrees
        /// with both `len` and the arena.
        fn check_invariants(&self) {
            let mut stack: Vec<(Handle, Option<K>, Option<K>)> = self.root.into_iter().map(|r| (r, None, None)).collect();
            let mut seen = 0;
            while let Some((handle, low, high)) = stack.pop() {
                seen += 1;
                let node = self.node(handle);
                let value = node.value();
                assert!(low.as_ref().is_none_or(|low| low < value), "left bound violated");
                assert!(high.as_ref().is_none_or(|high| value < high), "right bound violated");
                if let Some(left) = node.left() {
                    stack.push((left, low.clone(), Some(value.clone())));
                }
                if let Some(right) = node.right() {
                    stack.push((right, Some(value.clone()), high.clone()));
                }
            }
            assert_eq!(seen, self.len);
            assert_eq!(self.nodes.len(), self.len);
        }
    }

    fn chain(values: impl IntoIterator<Item = i32>) -> RawTree<i32> {
        let mut tree = RawTree::new();
        for value in values {
            assert!(tree.insert(value));
        }
        tree
    }

    #[test]
    fn build_picks_lower_middle() {
        let tree = RawTree::from_keys(alloc::vec![4, 1, 3, 2, 3]);
        let root = tree.root().unwrap();
        assert_eq!(*tree.node(root).value(), 2);
        assert_eq!(*tree.node(tree.node(root).left().unwrap()).value(), 1);
        assert_eq!(*tree.node(tree.node(root).right().unwrap()).value(), 3);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.sorted_keys(), [1, 2, 3, 4]);
        tree.check_invariants();
    }

    #[test]
    fn build_of_nothing_is_empty() {
        let tree: RawTree<i32> = RawTree::from_keys(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.subtree_height(None), 0);
        assert!(tree.is_subtree_balanced(None));
    }

    #[test]
    fn insert_into_empty_creates_root() {
        let mut tree = RawTree::new();
        assert!(tree.insert(10));
        assert!(!tree.insert(10));
        assert_eq!(tree.len(), 1);
        assert!(tree.node(tree.root().unwrap()).is_leaf());
    }

    #[test]
    fn delete_leaf_and_single_child() {
        let mut tree = chain([5, 3, 8, 9]);
        assert!(tree.remove(&3));
        assert_eq!(tree.sorted_keys(), [5, 8, 9]);
        // 8 has only a right child, which takes its place.
        assert!(tree.remove(&8));
        let root = tree.root().unwrap();
        assert_eq!(*tree.node(tree.node(root).right().unwrap()).value(), 9);
        tree.check_invariants();
    }

    #[test]
    fn delete_promotes_deep_successor() {
        let mut tree = chain([50, 30, 70, 60, 80, 65]);
        assert!(tree.remove(&50));
        let root = tree.root().unwrap();
        assert_eq!(*tree.node(root).value(), 60);
        // 65 was the successor's right child and is relinked under 70.
        let seventy = tree.node(root).right().unwrap();
        assert_eq!(*tree.node(tree.node(seventy).left().unwrap()).value(), 65);
        assert_eq!(tree.sorted_keys(), [30, 60, 65, 70, 80]);
        tree.check_invariants();
    }

    #[test]
    fn delete_promotes_immediate_successor() {
        let mut tree = chain([2, 1, 3, 4]);
        assert!(tree.remove(&2));
        let root = tree.root().unwrap();
        assert_eq!(*tree.node(root).value(), 3);
        assert_eq!(*tree.node(tree.node(root).right().unwrap()).value(), 4);
        tree.check_invariants();
    }

    #[test]
    fn delete_from_returns_new_subtree_root() {
        let mut tree = chain([1, 2]);
        let root = tree.root();
        let remaining = tree.delete_from(root, &1);
        assert_ne!(remaining, root);
        assert_eq!(remaining.map(|handle| *tree.node(handle).value()), Some(2));

        let unchanged = tree.delete_from(remaining, &7);
        assert_eq!(unchanged, remaining);
        assert_eq!(tree.delete_from(None, &7), None);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut tree = chain([2, 1, 3]);
        assert!(tree.remove(&1));
        assert!(tree.insert(0));
        assert_eq!(tree.nodes.len(), 3);
        tree.check_invariants();
    }

    #[test]
    fn min_height_follows_shorter_branch() {
        //     4
        //    / \
        //   2   5
        //  / \   \
        // 1   3   6
        //          \
        //           7
        let tree = chain([4, 2, 5, 1, 3, 6, 7]);
        assert_eq!(tree.min_height(&7), Some(1));
        assert_eq!(tree.min_height(&5), Some(3));
        assert_eq!(tree.min_height(&4), Some(3));
        assert_eq!(tree.subtree_height(tree.root()), 4);
        assert_eq!(tree.min_height(&42), None);
    }

    #[test]
    fn depth_counts_edges() {
        let tree = chain([4, 2, 5, 1, 3]);
        assert_eq!(tree.depth(&4), Some(0));
        assert_eq!(tree.depth(&5), Some(1));
        assert_eq!(tree.depth(&3), Some(2));
        assert_eq!(tree.depth(&6), None);
    }

    #[test]
    fn skewed_chain_is_walked_without_recursion() {
        let tree = chain(0..5_000);
        assert_eq!(tree.subtree_height(tree.root()), 5_000);
        assert!(!tree.is_subtree_balanced(tree.root()));
        assert_eq!(tree.depth(&4_999), Some(4_999));
        assert_eq!(tree.min_height(&0), Some(5_000));
    }

    #[test]
    fn rebalance_rebuilds_only_when_needed() {
        let mut tree = chain([1, 2, 3, 4, 5]);
        assert!(tree.rebalance());
        assert!(tree.is_subtree_balanced(tree.root()));
        assert_eq!(tree.sorted_keys(), [1, 2, 3, 4, 5]);
        assert_eq!(tree.subtree_height(tree.root()), 3);
        assert!(!tree.rebalance());
        tree.check_invariants();
    }

    #[test]
    fn leftmost_and_rightmost() {
        let tree = chain([5, 3, 8, 1, 9]);
        let root = tree.root().unwrap();
        assert_eq!(*tree.node(tree.leftmost(root)).value(), 1);
        assert_eq!(*tree.node(tree.rightmost(root)).value(), 9);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i16),
        Remove(i16),
        Rebalance,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (-200i16..200).prop_map(Op::Insert),
            4 => (-200i16..200).prop_map(Op::Remove),
            1 => Just(Op::Rebalance),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn mutations_preserve_ordering(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree = RawTree::new();
            let mut model = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(value) => prop_assert_eq!(tree.insert(value), model.insert(value)),
                    Op::Remove(value) => prop_assert_eq!(tree.remove(&value), model.remove(&value)),
                    Op::Rebalance => {
                        tree.rebalance();
                        prop_assert!(tree.is_subtree_balanced(tree.root()));
                    }
                }
                tree.check_invariants();
            }

            prop_assert_eq!(tree.sorted_keys(), model.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn built_trees_are_balanced(keys in prop::collection::vec(any::<i32>(), 0..512)) {
            let tree = RawTree::from_keys(keys.clone());
            let expected: BTreeSet<i32> = keys.into_iter().collect();
            tree.check_invariants();
            prop_assert!(tree.is_subtree_balanced(tree.root()));
            prop_assert_eq!(tree.sorted_keys(), expected.into_iter().collect::<Vec<_>>());
        }
    }
}
