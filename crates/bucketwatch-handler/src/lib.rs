//! Bucketwatch Handler - object change notification fan-out
//!
//! # Flow
//!
//! ```text
//!  bucket ──► topic (SNS) ──┐
//!                           ├──► envelope batch ──► NotificationDecoder ──► LogSink
//!  bucket ──► queue (SQS) ──┘                              │
//!                                                          └─ one ChangeEntry per record
//! ```
//!
//! Each invocation decodes the whole batch, then runs the [`PackageProbe`].

pub mod decoder;
pub mod lambda;
pub mod probe;
pub mod sink;
pub mod telemetry;

pub use decoder::NotificationDecoder;
pub use lambda::{handle_sns, handle_sqs, HandlerState};
pub use probe::{extract_title, PackageProbe};
pub use sink::{ChangeEntry, LogSink, MemorySink, TracingSink};
