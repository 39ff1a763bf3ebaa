//! Tree operations split into focused modules.

mod browse;
mod create;
mod delete;
mod write;

pub use browse::ChildEntry;
pub use create::CreateOptions;
pub use delete::DeleteOptions;
pub use write::{SetOptions, SetOutcome};
