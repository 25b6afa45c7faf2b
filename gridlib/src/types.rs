//! Primitive data types.

/// Data type for dense node indices in a loaded topology.
pub type NodeIndex = usize;
/// Data type for probability.
pub type Probability = f64;
/// Data type for distances along a branch.
pub type Kilometers = f64;
/// Data type for BFS depth levels.
pub type Wave = usize;
/// Data type for load epochs of a topology store.
pub type Epoch = u64;
