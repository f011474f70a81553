//! Logging infrastructure — structured invocation audit logging.
//!
//! Provides [`JsonlInvocationLogger`], a JSONL file writer that implements
//! the [`InvocationLogger`] audit port.

mod jsonl_logger;

pub use jsonl_logger::JsonlInvocationLogger;
