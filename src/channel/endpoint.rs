//! Producer and consumer endpoint adapters
//!
//! The two endpoints map external read/write calls onto channel operations.
//! Calls in the opposite direction are permitted for pipe compatibility:
//! reading from the producer endpoint reports "no data" and writing to the
//! consumer endpoint accepts and discards the bytes.

use crate::error::Result;

use super::{ByteChannel, TransferMode};

/// Writing end of a byte channel
#[derive(Debug, Clone, Copy)]
pub struct Producer<'a> {
    channel: &'a ByteChannel,
}

impl<'a> Producer<'a> {
    pub(super) fn new(channel: &'a ByteChannel) -> Self {
        Self { channel }
    }

    /// Write bytes into the channel; see [`ByteChannel::write`]
    pub fn write(&self, data: &[u8], mode: TransferMode) -> Result<usize> {
        self.channel.write(data, mode)
    }

    /// Write all bytes or nothing; see [`ByteChannel::write_atomic`]
    pub fn write_atomic(&self, data: &[u8], mode: TransferMode) -> Result<usize> {
        self.channel.write_atomic(data, mode)
    }

    /// Reading at the entry end of the pipe yields no data
    pub fn read(&self, _buf: &mut [u8], _mode: TransferMode) -> Result<usize> {
        Ok(0)
    }

    /// Get the underlying channel
    pub fn channel(&self) -> &ByteChannel {
        self.channel
    }
}

/// Reading end of a byte channel
#[derive(Debug, Clone, Copy)]
pub struct Consumer<'a> {
    channel: &'a ByteChannel,
}

impl<'a> Consumer<'a> {
    pub(super) fn new(channel: &'a ByteChannel) -> Self {
        Self { channel }
    }

    /// Read bytes out of the channel; see [`ByteChannel::read`]
    pub fn read(&self, buf: &mut [u8], mode: TransferMode) -> Result<usize> {
        self.channel.read(buf, mode)
    }

    /// Read up to `max_len` bytes into a freshly allocated buffer
    pub fn read_bytes(&self, max_len: usize, mode: TransferMode) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max_len];
        let n = self.channel.read(&mut buf, mode)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Writing at the exit end of the pipe accepts and discards the bytes
    pub fn write(&self, data: &[u8], _mode: TransferMode) -> Result<usize> {
        Ok(data.len())
    }

    /// Get the underlying channel
    pub fn channel(&self) -> &ByteChannel {
        self.channel
    }
}
