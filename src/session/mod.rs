//! Session wrapper around a connected client.

mod session;

pub use session::Session;
