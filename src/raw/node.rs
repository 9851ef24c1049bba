use super::handle::Handle;

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

/// One key plus links to the (exclusively owned) child subtrees.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    value: K,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a node with no children.
    pub(crate) const fn leaf(value: K) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn value(&self) -> &K {
        &self.value
    }

    /// Replaces the key held by this node, returning the previous one.
    pub(crate) fn replace_value(&mut self, value: K) -> K {
        core::mem::replace(&mut self.value, value)
    }

    pub(crate) fn into_value(self) -> K {
        self.value
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns true if both child slots are empty.
    #[inline]
    pub(crate) const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
