use thiserror::Error;

/// The first broken invariant found while validating a tree.
///
/// Depths count from the root, which sits at depth 0.
/// Element values are not captured, so no `Debug` bound is needed on the element type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("element at depth {depth} is out of order")]
    Unordered { depth: usize },

    #[error("node at depth {depth} is unbalanced: left height {left}, right height {right}")]
    Unbalanced {
        depth: usize,
        left: usize,
        right: usize,
    },

    #[error("node at depth {depth} caches height {cached}, actual height is {actual}")]
    StaleHeight {
        depth: usize,
        cached: usize,
        actual: usize,
    },
}
