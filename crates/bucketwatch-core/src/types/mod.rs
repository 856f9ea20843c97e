//! Core types for Bucketwatch

mod envelope;
mod notification;
mod stack;

pub use envelope::*;
pub use notification::*;
pub use stack::*;
