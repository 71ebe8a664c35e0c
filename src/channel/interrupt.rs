//! Wait cancellation for blocked channel callers

use std::sync::Arc;

use tracing::debug;

use super::ByteChannel;

/// Cancels in-flight blocking waits on a channel
///
/// The in-process equivalent of a delivered signal: a caller suspended in a
/// blocking [`ByteChannel::write`] or [`ByteChannel::read`] fails with
/// [`SeineError::Interrupted`](crate::SeineError::Interrupted) and is
/// expected to retry the same call. Cancellation never disturbs committed
/// bytes, the occupancy counter, or backend state. Callers that are not
/// currently suspended are unaffected.
#[derive(Debug, Clone)]
pub struct Interrupter {
    channel: Arc<ByteChannel>,
}

impl Interrupter {
    pub(super) fn new(channel: Arc<ByteChannel>) -> Self {
        Self { channel }
    }

    /// Cancel suspended waits on both sides of the channel
    pub fn interrupt(&self) {
        debug!("interrupting channel waiters");
        self.channel.interrupt_producer_waiters();
        self.channel.interrupt_consumer_waiters();
    }

    /// Cancel a producer suspended waiting for free space
    pub fn interrupt_producer(&self) {
        self.channel.interrupt_producer_waiters();
    }

    /// Cancel a consumer suspended waiting for data
    pub fn interrupt_consumer(&self) {
        self.channel.interrupt_consumer_waiters();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::config::ChannelConfig;
    use crate::error::SeineError;
    use crate::{ByteChannel, TransferMode};

    #[test]
    fn test_interrupt_without_waiters_is_noop() {
        let channel = Arc::new(ByteChannel::new(ChannelConfig::ring(8)).unwrap());
        let interrupter = channel.interrupter();

        interrupter.interrupt();

        // The next blocking-capable call still works normally.
        assert_eq!(channel.write(b"ok", TransferMode::Blocking).unwrap(), 2);
        assert_eq!(channel.stats().interrupts, 0);
    }

    #[test]
    fn test_interrupt_blocked_reader() {
        let channel = Arc::new(ByteChannel::new(ChannelConfig::ring(8)).unwrap());
        let interrupter = channel.interrupter();

        let reader = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || {
                let mut out = [0u8; 4];
                channel.read(&mut out, TransferMode::Blocking)
            })
        };

        // Give the reader time to suspend before cancelling.
        while channel.stats().consumer_waits == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        interrupter.interrupt_consumer();

        let result = reader.join().unwrap();
        assert!(matches!(result, Err(SeineError::Interrupted)));
        assert_eq!(channel.occupancy(), 0);
    }

    #[test]
    fn test_interrupt_blocked_writer() {
        let channel = Arc::new(ByteChannel::new(ChannelConfig::ring(2)).unwrap());
        channel.write(b"xx", TransferMode::Blocking).unwrap();
        let interrupter = channel.interrupter();

        let writer = {
            let channel = Arc::clone(&channel);
            thread::spawn(move || channel.write(b"yy", TransferMode::Blocking))
        };

        while channel.stats().producer_waits == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        interrupter.interrupt_producer();

        let result = writer.join().unwrap();
        assert!(matches!(result, Err(SeineError::Interrupted)));

        // Committed bytes are untouched by the cancellation.
        let mut out = [0u8; 2];
        assert_eq!(channel.read(&mut out, TransferMode::Blocking).unwrap(), 2);
        assert_eq!(&out, b"xx");
    }
}
