//! Bounded blocking byte-stream channel core
//!
//! The channel wraps a storage backend, enforces the byte capacity, and
//! coordinates one producer role and one consumer role through independent
//! readiness signals. Producer-side and consumer-side calls are each
//! serialized by their own gate; the backend and occupancy counter live
//! under a single shared lock with one condition variable per direction,
//! so a producer and a consumer only contend inside the brief window where
//! occupancy is committed.

mod endpoint;
mod interrupt;

pub use endpoint::{Consumer, Producer};
pub use interrupt::Interrupter;

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use tracing::{debug, trace};

use crate::config::ChannelConfig;
use crate::error::{Result, SeineError};
use crate::stats::{ChannelStats, StatCounters};
use crate::storage::{self, ByteStorage, StorageStats};

/// Per-call blocking behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Suspend until the transfer can make progress
    #[default]
    Blocking,
    /// Fail with [`SeineError::WouldBlock`] instead of suspending
    NonBlocking,
}

impl TransferMode {
    /// Whether this mode refuses to suspend
    pub fn is_nonblocking(&self) -> bool {
        matches!(self, TransferMode::NonBlocking)
    }
}

/// State guarded by the channel's shared lock
#[derive(Debug)]
struct Shared {
    /// Storage backend, exclusively owned by the channel
    backend: Box<dyn ByteStorage>,
    /// Bytes currently stored; never exceeds the channel capacity
    occupancy: usize,
    /// Producers currently suspended on `not_full`
    producer_waiters: usize,
    /// Consumers currently suspended on `not_empty`
    consumer_waiters: usize,
    /// Pending cancellation tokens for suspended producers
    producer_interrupts: usize,
    /// Pending cancellation tokens for suspended consumers
    consumer_interrupts: usize,
}

/// Bounded blocking byte-stream channel connecting one producer role to one
/// consumer role
///
/// Writes move up to the remaining free space and reads move up to the
/// stored bytes; short transfers are legal and expected, never an error.
/// Blocking calls suspend until the opposite role makes progress, a
/// non-blocking call fails with [`SeineError::WouldBlock`], and an
/// [`Interrupter`] cancels in-flight waits with [`SeineError::Interrupted`].
///
/// Wrap the channel in an [`Arc`] to share the [`Producer`] and [`Consumer`]
/// handles across threads.
#[derive(Debug)]
pub struct ByteChannel {
    config: ChannelConfig,
    capacity: usize,
    shared: Mutex<Shared>,
    not_full: Condvar,
    not_empty: Condvar,
    producer_gate: Mutex<()>,
    consumer_gate: Mutex<()>,
    stats: StatCounters,
}

impl ByteChannel {
    /// Create a new channel from the given configuration
    pub fn new(config: ChannelConfig) -> Result<Self> {
        config.validate()?;
        let backend = storage::build_backend(&config)?;

        debug!(
            capacity = config.capacity,
            backend = config.backend.name(),
            "channel created"
        );

        Ok(Self {
            capacity: config.capacity,
            shared: Mutex::new(Shared {
                backend,
                occupancy: 0,
                producer_waiters: 0,
                consumer_waiters: 0,
                producer_interrupts: 0,
                consumer_interrupts: 0,
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            producer_gate: Mutex::new(()),
            consumer_gate: Mutex::new(()),
            stats: StatCounters::default(),
            config,
        })
    }

    /// Maximum bytes the channel may hold at once
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently stored
    pub fn occupancy(&self) -> usize {
        self.shared.lock().unwrap().occupancy
    }

    /// Bytes that can be written without blocking
    pub fn free_space(&self) -> usize {
        self.capacity - self.occupancy()
    }

    /// Check if the channel holds no bytes
    pub fn is_empty(&self) -> bool {
        self.occupancy() == 0
    }

    /// Check if the channel is at capacity
    pub fn is_full(&self) -> bool {
        self.occupancy() == self.capacity
    }

    /// Get the channel configuration
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Get a transfer statistics snapshot
    pub fn stats(&self) -> ChannelStats {
        self.stats.snapshot()
    }

    /// Get a storage accounting snapshot from the backend
    pub fn storage_stats(&self) -> StorageStats {
        self.shared.lock().unwrap().backend.stats()
    }

    /// Create a producer endpoint handle
    pub fn producer(&self) -> Producer<'_> {
        Producer::new(self)
    }

    /// Create a consumer endpoint handle
    pub fn consumer(&self) -> Consumer<'_> {
        Consumer::new(self)
    }

    /// Create a cancellation handle for this channel's blocking waits
    pub fn interrupter(self: &Arc<Self>) -> Interrupter {
        Interrupter::new(Arc::clone(self))
    }

    /// Write bytes into the channel
    ///
    /// Copies `min(data.len(), free space)` bytes and returns the count; a
    /// short write means the channel filled to capacity. A blocking call on
    /// a full channel suspends until the consumer drains space or the wait
    /// is interrupted.
    pub fn write(&self, data: &[u8], mode: TransferMode) -> Result<usize> {
        let _gate = self.producer_gate.lock().unwrap();

        if data.is_empty() {
            return Ok(0);
        }

        let mut shared = self.shared.lock().unwrap();
        while self.capacity - shared.occupancy == 0 {
            if mode.is_nonblocking() {
                return Err(SeineError::WouldBlock);
            }
            shared = self.wait_not_full(shared)?;
        }

        let want = data.len().min(self.capacity - shared.occupancy);
        let (copied, alloc_error) = Self::copy_in(&mut shared, &data[..want]);
        if copied == 0 {
            if let Some(err) = alloc_error {
                return Err(err);
            }
        }

        shared.occupancy += copied;
        let occupancy = shared.occupancy;
        drop(shared);

        self.stats.record_write(copied, data.len());
        trace!(
            bytes = copied,
            requested = data.len(),
            occupancy,
            "write committed"
        );
        self.not_empty.notify_one();
        Ok(copied)
    }

    /// Write all bytes or nothing
    ///
    /// Fails with [`SeineError::CapacityExceeded`] when the payload can
    /// never fit; otherwise waits for enough free space (or fails with
    /// [`SeineError::WouldBlock`] in non-blocking mode) and commits the
    /// whole payload in one transfer.
    pub fn write_atomic(&self, data: &[u8], mode: TransferMode) -> Result<usize> {
        if data.len() > self.capacity {
            return Err(SeineError::capacity_exceeded(data.len(), self.capacity));
        }

        let _gate = self.producer_gate.lock().unwrap();

        if data.is_empty() {
            return Ok(0);
        }

        let mut shared = self.shared.lock().unwrap();
        while self.capacity - shared.occupancy < data.len() {
            if mode.is_nonblocking() {
                return Err(SeineError::WouldBlock);
            }
            shared = self.wait_not_full(shared)?;
        }

        let (copied, alloc_error) = Self::copy_in(&mut shared, data);
        shared.occupancy += copied;
        drop(shared);

        if copied > 0 {
            self.stats.record_write(copied, data.len());
            self.not_empty.notify_one();
        }
        if let Some(err) = alloc_error {
            return Err(err);
        }
        Ok(copied)
    }

    /// Read bytes out of the channel
    ///
    /// Copies `min(buf.len(), occupancy)` bytes and returns the count; 0 is
    /// returned only for an empty `buf`. A blocking call on an empty channel
    /// suspends until the producer commits data or the wait is interrupted.
    /// Finding the backend fully drained triggers bulk storage reclamation
    /// as a maintenance step before any suspension.
    pub fn read(&self, buf: &mut [u8], mode: TransferMode) -> Result<usize> {
        let _gate = self.consumer_gate.lock().unwrap();

        let mut shared = self.shared.lock().unwrap();
        while shared.occupancy == 0 {
            if shared.backend.is_drained() && shared.backend.has_allocations() {
                shared.backend.trim();
                self.stats.record_trim();
            }
            if buf.is_empty() {
                return Ok(0);
            }
            if mode.is_nonblocking() {
                return Err(SeineError::WouldBlock);
            }
            shared = self.wait_not_empty(shared)?;
        }

        let want = buf.len().min(shared.occupancy);
        let mut copied = 0;
        while copied < want {
            let n = shared.backend.read_span(&mut buf[copied..want]);
            if n == 0 {
                break;
            }
            copied += n;
        }

        shared.occupancy -= copied;
        let occupancy = shared.occupancy;
        drop(shared);

        self.stats.record_read(copied, buf.len());
        trace!(
            bytes = copied,
            requested = buf.len(),
            occupancy,
            "read completed"
        );
        self.not_full.notify_one();
        Ok(copied)
    }

    /// Copy as much of `src` as the backend accepts, span by span
    ///
    /// Bytes copied before an allocation failure stay committed; the error
    /// is only surfaced to the caller when nothing was copied.
    fn copy_in(shared: &mut Shared, src: &[u8]) -> (usize, Option<SeineError>) {
        let mut copied = 0;
        while copied < src.len() {
            match shared.backend.write_span(&src[copied..]) {
                Ok(0) => break,
                Ok(n) => copied += n,
                Err(err) => return (copied, Some(err)),
            }
        }
        (copied, None)
    }

    /// Suspend the producer until space appears or the wait is cancelled
    fn wait_not_full<'a>(
        &'a self,
        mut shared: MutexGuard<'a, Shared>,
    ) -> Result<MutexGuard<'a, Shared>> {
        shared.producer_waiters += 1;
        self.stats.record_producer_wait();
        let mut shared = self.not_full.wait(shared).unwrap();
        shared.producer_waiters -= 1;
        if shared.producer_interrupts > 0 {
            shared.producer_interrupts -= 1;
            self.stats.record_interrupt();
            trace!("producer wait interrupted");
            return Err(SeineError::Interrupted);
        }
        Ok(shared)
    }

    /// Suspend the consumer until data appears or the wait is cancelled
    fn wait_not_empty<'a>(
        &'a self,
        mut shared: MutexGuard<'a, Shared>,
    ) -> Result<MutexGuard<'a, Shared>> {
        shared.consumer_waiters += 1;
        self.stats.record_consumer_wait();
        let mut shared = self.not_empty.wait(shared).unwrap();
        shared.consumer_waiters -= 1;
        if shared.consumer_interrupts > 0 {
            shared.consumer_interrupts -= 1;
            self.stats.record_interrupt();
            trace!("consumer wait interrupted");
            return Err(SeineError::Interrupted);
        }
        Ok(shared)
    }

    /// Cancel every producer currently suspended on `not_full`
    pub(crate) fn interrupt_producer_waiters(&self) {
        let mut shared = self.shared.lock().unwrap();
        if shared.producer_waiters > 0 {
            shared.producer_interrupts = shared.producer_waiters;
            drop(shared);
            // Cancellation must reach every waiter, unlike data signals
            // which wake exactly one.
            self.not_full.notify_all();
        }
    }

    /// Cancel every consumer currently suspended on `not_empty`
    pub(crate) fn interrupt_consumer_waiters(&self) {
        let mut shared = self.shared.lock().unwrap();
        if shared.consumer_waiters > 0 {
            shared.consumer_interrupts = shared.consumer_waiters;
            drop(shared);
            self.not_empty.notify_all();
        }
    }
}
