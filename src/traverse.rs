//! Lazy walks over the values of an [`AvlTree`](crate::AvlTree).
//!
//! Every walk keeps its own stack or queue of pending nodes,
//! so the depth of the tree never reaches the call stack.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::tree::{Link, Node};

/// The order in which a traversal visits the values of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, then node, then right subtree: ascending order.
    InOrder,
    /// Left subtree, then right subtree, then node.
    PostOrder,
    /// Breadth-first, one level after the other.
    LevelOrder,
}

/// An iterator over the values of a tree in pre-order.
pub struct PreOrder<'a, T> {
    stack: Vec<&'a Node<T>>,
}

/// An iterator over the values of a tree in ascending order.
pub struct InOrder<'a, T> {
    stack: Vec<&'a Node<T>>,
}

/// An iterator over the values of a tree in post-order.
pub struct PostOrder<'a, T> {
    // Second field is set once the node's children have been pushed.
    stack: Vec<(&'a Node<T>, bool)>,
}

/// An iterator over the values of a tree in level-order.
pub struct LevelOrder<'a, T> {
    queue: VecDeque<&'a Node<T>>,
}

/// An iterator over the values of a tree in an [`Order`] chosen at runtime.
pub enum Traverse<'a, T> {
    PreOrder(PreOrder<'a, T>),
    InOrder(InOrder<'a, T>),
    PostOrder(PostOrder<'a, T>),
    LevelOrder(LevelOrder<'a, T>),
}

/// An owning iterator over the values of a tree in ascending order.
pub struct IntoIter<T> {
    stack: Vec<Box<Node<T>>>,
}

impl<'a, T> PreOrder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        Some(&node.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), None)
    }
}

impl<'a, T> InOrder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<T>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), None)
    }
}

impl<'a, T> PostOrder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            stack: root.map(|node| (node, false)).into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for PostOrder<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                return Some(&node.element);
            }
            self.stack.push((node, true));
            self.stack
                .extend(node.right.as_deref().map(|right| (right, false)));
            self.stack
                .extend(node.left.as_deref().map(|left| (left, false)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), None)
    }
}

impl<'a, T> LevelOrder<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>) -> Self {
        Self {
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a, T> Iterator for LevelOrder<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left.as_deref());
        self.queue.extend(node.right.as_deref());
        Some(&node.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), None)
    }
}

impl<'a, T> Traverse<'a, T> {
    pub(crate) fn new(root: Option<&'a Node<T>>, order: Order) -> Self {
        match order {
            Order::PreOrder => Traverse::PreOrder(PreOrder::new(root)),
            Order::InOrder => Traverse::InOrder(InOrder::new(root)),
            Order::PostOrder => Traverse::PostOrder(PostOrder::new(root)),
            Order::LevelOrder => Traverse::LevelOrder(LevelOrder::new(root)),
        }
    }

    /// Returns the order this traversal visits values in.
    pub fn order(&self) -> Order {
        match self {
            Traverse::PreOrder(_) => Order::PreOrder,
            Traverse::InOrder(_) => Order::InOrder,
            Traverse::PostOrder(_) => Order::PostOrder,
            Traverse::LevelOrder(_) => Order::LevelOrder,
        }
    }
}

impl<'a, T> Iterator for Traverse<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Traverse::PreOrder(iter) => iter.next(),
            Traverse::InOrder(iter) => iter.next(),
            Traverse::PostOrder(iter) => iter.next(),
            Traverse::LevelOrder(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Traverse::PreOrder(iter) => iter.size_hint(),
            Traverse::InOrder(iter) => iter.size_hint(),
            Traverse::PostOrder(iter) => iter.size_hint(),
            Traverse::LevelOrder(iter) => iter.size_hint(),
        }
    }
}

impl<T> IntoIter<T> {
    pub(crate) fn new(root: Link<T>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Link<T>) {
        while let Some(mut node) = current {
            current = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.push_left_spine(node.right.take());
        Some(node.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.stack.len(), None)
    }
}

impl<T> FusedIterator for PreOrder<'_, T> {}
impl<T> FusedIterator for InOrder<'_, T> {}
impl<T> FusedIterator for PostOrder<'_, T> {}
impl<T> FusedIterator for LevelOrder<'_, T> {}
impl<T> FusedIterator for Traverse<'_, T> {}
impl<T> FusedIterator for IntoIter<T> {}

// Auto derived clone seems to have an invalid type bound of T: Clone
impl<T> Clone for PreOrder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<T> Clone for InOrder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<T> Clone for PostOrder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<T> Clone for LevelOrder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
        }
    }
}

impl<T> Clone for Traverse<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Traverse::PreOrder(iter) => Traverse::PreOrder(iter.clone()),
            Traverse::InOrder(iter) => Traverse::InOrder(iter.clone()),
            Traverse::PostOrder(iter) => Traverse::PostOrder(iter.clone()),
            Traverse::LevelOrder(iter) => Traverse::LevelOrder(iter.clone()),
        }
    }
}
