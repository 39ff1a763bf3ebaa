//! Node tree types and operations.

pub(crate) mod node;
mod operations;

pub use node::{CreateMode, NodeStat};
pub use operations::{ChildEntry, CreateOptions, DeleteOptions, SetOptions, SetOutcome};
