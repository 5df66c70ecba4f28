use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::error::InvariantViolation;
use crate::traverse::{InOrder, IntoIter, LevelOrder, Order, PostOrder, PreOrder, Traverse};

/// An ordered set of distinct values, kept height-balanced as an AVL tree.
///
/// ```
/// use avl_tree::AvlTree;
/// let mut tree = AvlTree::new();
/// tree.insert(2);
/// tree.insert(1);
/// tree.insert(3);
/// assert_eq!(tree.get(&1), Some(&1));
/// assert!(tree.remove(&1));
/// assert!(tree.get(&1).is_none());
/// assert!(tree.is_valid());
/// ```
#[derive(Clone)]
pub struct AvlTree<T> {
    pub(crate) root: Link<T>,
}

pub(crate) type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) element: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// What an insertion did to a subtree, as seen by the subtree's parent.
enum Insertion {
    Duplicate,
    /// The subtree root is the new node.
    Placed,
    /// The new value went down this side of the subtree root.
    Descended(Side),
}

/// The four ways to restore balance at a node whose subtrees differ in height by two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rotation {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

impl<T: Ord> AvlTree<T> {
    /// Creates an empty tree.
    /// No memory is allocated until the first value is inserted.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Returns a reference to the stored value equal to the given one.
    ///
    /// The value may be any borrowed form of the tree's value type, but the ordering
    /// on the borrowed form *must* match the ordering on the value type.
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match element.cmp(node.element.borrow()) {
                Ordering::Equal => return Some(&node.element),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Returns true if the tree holds a value equal to the given one.
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(element).is_some()
    }

    /// Inserts a value into the tree.
    /// Returns false and keeps the stored value if an equal value is already present.
    pub fn insert(&mut self, element: T) -> bool {
        let (root, insertion) = Self::insert_into(self.root.take(), element);
        self.root = Some(root);
        !matches!(insertion, Insertion::Duplicate)
    }

    /// Removes a value from the tree.
    /// Returns whether the value was previously in the tree.
    pub fn remove<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(element).is_some()
    }

    /// Removes a value from the tree.
    /// Returns the stored value if it was previously in the tree.
    pub fn take<Q>(&mut self, element: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (root, removed) = Self::remove_from(self.root.take(), element);
        self.root = root;
        removed
    }

    /// Returns true if ordering, balance and cached heights all hold.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Walks the whole tree, recomputing every height from scratch,
    /// and reports the first broken invariant.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let result = Self::validate_subtree(self.root.as_deref(), None, None, 0).map(|_| ());
        if let Err(violation) = &result {
            debug!(%violation, "tree failed validation");
        }
        result
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        if let Err(violation) = self.validate() {
            panic!("inconsistent tree: {violation}");
        }
    }

    fn insert_into(link: Link<T>, element: T) -> (Box<Node<T>>, Insertion) {
        let mut node = match link {
            None => return (Node::leaf(element), Insertion::Placed),
            Some(node) => node,
        };

        let side = match element.cmp(&node.element) {
            Ordering::Equal => return (node, Insertion::Duplicate),
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
        };

        let slot = node.child_mut(side);
        let (child, below) = Self::insert_into(slot.take(), element);
        *slot = Some(child);
        if let Insertion::Duplicate = below {
            return (node, Insertion::Duplicate);
        }

        node.adjust_height();
        // The new value differs from the child's, so the side it took below the child
        // is the result of comparing the two.
        let node = match below {
            Insertion::Descended(below) => match Rotation::after_insert(node.balance(), below) {
                Some(rotation) => rotation.apply(node, "insert"),
                None => node,
            },
            _ => node,
        };
        (node, Insertion::Descended(side))
    }

    fn remove_from<Q>(link: Link<T>, element: &Q) -> (Link<T>, Option<T>)
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = match link {
            None => return (None, None),
            Some(node) => node,
        };

        let removed = match element.cmp(node.element.borrow()) {
            Ordering::Less => {
                let (left, removed) = Self::remove_from(node.left.take(), element);
                node.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = Self::remove_from(node.right.take(), element);
                node.right = right;
                removed
            }
            Ordering::Equal => {
                let (link, element) = Self::unlink(node);
                return (link, Some(element));
            }
        };

        if removed.is_none() {
            return (Some(node), None);
        }
        (Some(Self::rebalance_after_remove(node)), removed)
    }

    // Returns the subtree that takes the node's place, and the node's value.
    fn unlink(mut node: Box<Node<T>>) -> (Link<T>, T) {
        match (node.left.take(), node.right.take()) {
            (None, None) => (None, node.element),
            (Some(child), None) | (None, Some(child)) => (Some(child), node.element),
            (Some(left), Some(right)) => {
                // Node keeps its slot, in-order successor's node is the one removed
                let (right, successor) = Self::remove_min(right);
                node.left = Some(left);
                node.right = right;
                let element = mem::replace(&mut node.element, successor);
                (Some(Self::rebalance_after_remove(node)), element)
            }
        }
    }

    fn remove_min(mut node: Box<Node<T>>) -> (Link<T>, T) {
        match node.left.take() {
            None => (node.right.take(), node.element),
            Some(left) => {
                let (left, min) = Self::remove_min(left);
                node.left = left;
                (Some(Self::rebalance_after_remove(node)), min)
            }
        }
    }

    fn rebalance_after_remove(mut node: Box<Node<T>>) -> Box<Node<T>> {
        node.adjust_height();
        match Rotation::after_remove(&*node) {
            Some(rotation) => rotation.apply(node, "remove"),
            None => node,
        }
    }

    // Returns the recomputed height of the subtree.
    fn validate_subtree(
        node: Option<&Node<T>>,
        lower: Option<&T>,
        upper: Option<&T>,
        depth: usize,
    ) -> Result<usize, InvariantViolation> {
        let node = match node {
            None => return Ok(0),
            Some(node) => node,
        };

        let above_lower = lower.map_or(true, |lower| *lower < node.element);
        let below_upper = upper.map_or(true, |upper| node.element < *upper);
        if !above_lower || !below_upper {
            return Err(InvariantViolation::Unordered { depth });
        }

        let left =
            Self::validate_subtree(node.left.as_deref(), lower, Some(&node.element), depth + 1)?;
        let right =
            Self::validate_subtree(node.right.as_deref(), Some(&node.element), upper, depth + 1)?;

        if left > right + 1 || right > left + 1 {
            return Err(InvariantViolation::Unbalanced { depth, left, right });
        }

        let actual = 1 + cmp::max(left, right);
        if node.height != actual {
            return Err(InvariantViolation::StaleHeight {
                depth,
                cached: node.height,
                actual,
            });
        }
        Ok(actual)
    }
}

impl<T> AvlTree<T> {
    /// Returns true if the tree contains no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of values in the tree.
    ///
    /// The count is not cached: every call walks the whole tree.
    pub fn len(&self) -> usize {
        Node::count(&self.root)
    }

    /// Returns the height of the tree, 0 if empty and 1 for a single value.
    pub fn height(&self) -> usize {
        Node::height_of(&self.root)
    }

    /// Clears the tree, deallocating all memory.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Gets an iterator over the values of the tree in ascending order.
    pub fn iter(&self) -> InOrder<'_, T> {
        self.inorder()
    }

    /// Visits each node before its left and then its right subtree.
    pub fn preorder(&self) -> PreOrder<'_, T> {
        PreOrder::new(self.root.as_deref())
    }

    /// Visits the values in ascending order.
    pub fn inorder(&self) -> InOrder<'_, T> {
        InOrder::new(self.root.as_deref())
    }

    /// Visits each node after its left and then its right subtree.
    pub fn postorder(&self) -> PostOrder<'_, T> {
        PostOrder::new(self.root.as_deref())
    }

    /// Visits the nodes breadth-first, top level first, left to right within a level.
    pub fn levelorder(&self) -> LevelOrder<'_, T> {
        LevelOrder::new(self.root.as_deref())
    }

    /// Gets an iterator visiting the values in the given order.
    pub fn traverse(&self, order: Order) -> Traverse<'_, T> {
        Traverse::new(self.root.as_deref(), order)
    }
}

impl<T> Node<T> {
    fn leaf(element: T) -> Box<Self> {
        Box::new(Node {
            element,
            left: None,
            right: None,
            height: 1,
        })
    }

    fn height_of(link: &Link<T>) -> usize {
        link.as_ref().map_or(0, |node| node.height)
    }

    fn count(link: &Link<T>) -> usize {
        match link {
            None => 0,
            Some(node) => Self::count(&node.left) + 1 + Self::count(&node.right),
        }
    }

    /// Height of the left subtree minus height of the right subtree.
    pub(crate) fn balance(&self) -> isize {
        Self::height_of(&self.left) as isize - Self::height_of(&self.right) as isize
    }

    fn adjust_height(&mut self) {
        self.height = 1 + cmp::max(Self::height_of(&self.left), Self::height_of(&self.right));
    }

    fn child_mut(&mut self, side: Side) -> &mut Link<T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    //   n          r
    //  / \        / \
    // a   r  ->  n   c
    //    / \    / \
    //   b   c  a   b
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut pivot = match self.right.take() {
            None => return self,
            Some(pivot) => pivot,
        };
        self.right = pivot.left.take();
        self.adjust_height();
        pivot.left = Some(self);
        pivot.adjust_height();
        pivot
    }

    //     n      l
    //    / \    / \
    //   l   c  a   n
    //  / \        / \
    // a   b      b   c
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut pivot = match self.left.take() {
            None => return self,
            Some(pivot) => pivot,
        };
        self.left = pivot.right.take();
        self.adjust_height();
        pivot.right = Some(self);
        pivot.adjust_height();
        pivot
    }
}

impl Rotation {
    /// Picks the rotation for a node on the insertion path,
    /// given the side the new value took below the node's child.
    fn after_insert(balance: isize, below: Side) -> Option<Self> {
        if balance > 1 {
            Some(match below {
                Side::Left => Rotation::LeftLeft,
                Side::Right => Rotation::LeftRight,
            })
        } else if balance < -1 {
            Some(match below {
                Side::Right => Rotation::RightRight,
                Side::Left => Rotation::RightLeft,
            })
        } else {
            None
        }
    }

    /// Picks the rotation for a node on the removal path.
    /// A child with balance 0 gets the single rotation.
    pub(crate) fn after_remove<T>(node: &Node<T>) -> Option<Self> {
        let balance = node.balance();
        if balance > 1 {
            let child = node.left.as_deref().map_or(0, Node::balance);
            Some(if child >= 0 {
                Rotation::LeftLeft
            } else {
                Rotation::LeftRight
            })
        } else if balance < -1 {
            let child = node.right.as_deref().map_or(0, Node::balance);
            Some(if child <= 0 {
                Rotation::RightRight
            } else {
                Rotation::RightLeft
            })
        } else {
            None
        }
    }

    fn apply<T>(self, mut node: Box<Node<T>>, phase: &'static str) -> Box<Node<T>> {
        trace!(rotation = ?self, phase, "rebalancing subtree");
        match self {
            Rotation::LeftLeft => node.rotate_right(),
            Rotation::RightRight => node.rotate_left(),
            Rotation::LeftRight => {
                node.left = node.left.take().map(Node::rotate_left);
                node.rotate_right()
            }
            Rotation::RightLeft => {
                node.right = node.right.take().map(Node::rotate_right);
                node.rotate_left()
            }
        }
    }
}

impl<T: Ord> Default for AvlTree<T> {
    /// Creates an empty tree.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for AvlTree<T> {
    /// Trees are equal when they hold equal values, whatever their shape.
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for AvlTree<T> {}

impl<T: Ord> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for AvlTree<T> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        iter.into_iter().for_each(move |element| {
            self.insert(element);
        });
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T> {
    type Item = &'a T;
    type IntoIter = InOrder<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for AvlTree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.root)
    }
}
