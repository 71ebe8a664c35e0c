//! # Seine - Bounded Blocking Byte-Stream Channel
//!
//! Seine is an in-process bounded byte-stream channel connecting one
//! producer role to one consumer role, designed for pipe-style data
//! hand-off between threads with strict memory bounds.
//!
//! ## Features
//!
//! - **Bounded capacity**: a hard byte limit fixed at construction
//! - **Blocking and non-blocking transfers**: a per-call flag, freely mixed
//! - **Interruptible waits**: cancel suspended callers without losing data
//! - **Short transfers**: partial writes and reads are results, not errors
//! - **Two storage backends**: contiguous ring buffer, or lazily grown
//!   scatter-gather blocks reclaimed in bulk once drained
//! - **Transfer statistics**: byte, wait, and reclamation accounting
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                   ByteChannel                    │
//! ├──────────────────────────────────────────────────┤
//! │  producer gate │ occupancy + signals │ consumer  │
//! │  (write side)  │  not_full/not_empty │ gate      │
//! └───────┬────────┴──────────┬──────────┴─────┬─────┘
//!         │                   ▼                │
//! ┌───────▼────────┐ ┌─────────────────┐ ┌─────▼─────┐
//! │   Producer     │ │  ByteStorage    │ │ Consumer  │
//! │   endpoint     │ │  Ring │ Scatter │ │ endpoint  │
//! └────────────────┘ └─────────────────┘ └───────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use seine::{ByteChannel, ChannelConfig, TransferMode};
//!
//! let channel = ByteChannel::new(ChannelConfig::ring(1024))?;
//! let producer = channel.producer();
//! let consumer = channel.consumer();
//!
//! producer.write(b"hello", TransferMode::Blocking)?;
//!
//! let mut out = [0u8; 5];
//! let n = consumer.read(&mut out, TransferMode::Blocking)?;
//! assert_eq!(&out[..n], b"hello");
//! # Ok::<(), seine::SeineError>(())
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod stats;
pub mod storage;

pub use channel::{ByteChannel, Consumer, Interrupter, Producer, TransferMode};
pub use config::{BackendKind, ChannelConfig};
pub use error::{Result, SeineError};
pub use stats::ChannelStats;
pub use storage::{ByteStorage, RingBuffer, ScatterStore, StorageStats};
