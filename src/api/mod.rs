//! Session client interface and error codes.

mod client;
pub mod error;
mod memory;

pub use client::SessionClient;
pub use error::ErrorCode;
pub use memory::{MemoryClient, Op, OpKind};
