//! Channel transfer statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time statistics snapshot for a channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Total bytes committed by writes
    pub bytes_written: u64,
    /// Total bytes returned by reads
    pub bytes_read: u64,
    /// Writes that moved fewer bytes than requested
    pub short_writes: u64,
    /// Reads that moved fewer bytes than requested
    pub short_reads: u64,
    /// Times a producer suspended waiting for space
    pub producer_waits: u64,
    /// Times a consumer suspended waiting for data
    pub consumer_waits: u64,
    /// Waits cancelled by an interrupter
    pub interrupts: u64,
    /// Bulk storage reclamations performed
    pub trims: u64,
}

/// Atomic counters backing [`ChannelStats`] snapshots
#[derive(Debug, Default)]
pub(crate) struct StatCounters {
    bytes_written: AtomicU64,
    bytes_read: AtomicU64,
    short_writes: AtomicU64,
    short_reads: AtomicU64,
    producer_waits: AtomicU64,
    consumer_waits: AtomicU64,
    interrupts: AtomicU64,
    trims: AtomicU64,
}

impl StatCounters {
    pub(crate) fn record_write(&self, copied: usize, requested: usize) {
        self.bytes_written.fetch_add(copied as u64, Ordering::Relaxed);
        if copied < requested {
            self.short_writes.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_read(&self, copied: usize, requested: usize) {
        self.bytes_read.fetch_add(copied as u64, Ordering::Relaxed);
        if copied < requested {
            self.short_reads.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_producer_wait(&self) {
        self.producer_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_consumer_wait(&self) {
        self.consumer_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_interrupt(&self) {
        self.interrupts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_trim(&self) {
        self.trims.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ChannelStats {
        ChannelStats {
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            short_writes: self.short_writes.load(Ordering::Relaxed),
            short_reads: self.short_reads.load(Ordering::Relaxed),
            producer_waits: self.producer_waits.load(Ordering::Relaxed),
            consumer_waits: self.consumer_waits.load(Ordering::Relaxed),
            interrupts: self.interrupts.load(Ordering::Relaxed),
            trims: self.trims.load(Ordering::Relaxed),
        }
    }
}
