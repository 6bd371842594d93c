//! Serialized Pipeline
//!
//! This crate provides a small in-process pattern for running independent
//! producers concurrently while applying their results to a shared sink one
//! at a time, in submission order, regardless of completion order.
//!
//! # Core Concepts
//!
//! - **PendingResult**: a single-assignment result slot (one writer, readable
//!   once written)
//! - **SerializedPipeline**: spawns one task per producer and delivers their
//!   values to a sink in strict submission order
//! - **Sink**: the serialized end of the pipeline (e.g. an append-only file)

pub mod error;
pub mod pending;
pub mod pipeline;
pub mod traits;

pub use error::PipelineError;
pub use pending::{PendingResult, ResultSlot, pending};
pub use pipeline::{FailurePolicy, SerializedPipeline, submit};
pub use traits::{FnSink, Sink, sink_fn};
